//! Static navigation provider.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use trellis_plugin::{NavigationContext, NavigationItem, NavigationProvider, StoreError};

/// A navigation provider contributing a fixed set of root entries.
///
/// Useful for hand-curated menus and as the reference provider in
/// tests; it counts invocations so caching behavior can be asserted.
pub struct StaticNavigationProvider {
    name: String,
    items: Vec<NavigationItem>,
    calls: Arc<AtomicUsize>,
}

impl StaticNavigationProvider {
    /// Creates a provider with the given entries.
    #[must_use]
    pub fn new(name: impl Into<String>, items: Vec<NavigationItem>) -> Self {
        Self {
            name: name.into(),
            items,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared invocation counter.
    #[must_use]
    pub fn call_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl NavigationProvider for StaticNavigationProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn add_root_items(&self, cx: &mut NavigationContext) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        cx.items.extend(self.items.iter().cloned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn providers_append_in_order() {
        let first = StaticNavigationProvider::new(
            "first",
            vec![NavigationItem::link("Home", "/")],
        );
        let second = StaticNavigationProvider::new(
            "second",
            vec![NavigationItem::link("Blog", "/blog")],
        );

        let mut cx = NavigationContext::default();
        first
            .add_root_items(&mut cx)
            .await
            .expect("static provider should not fail");
        second
            .add_root_items(&mut cx)
            .await
            .expect("static provider should not fail");

        let titles: Vec<_> = cx.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Home", "Blog"]);
    }
}
