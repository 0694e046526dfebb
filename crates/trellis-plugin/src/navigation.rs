//! Navigation providers.

use crate::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One entry in the site navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    /// Display title.
    pub title: String,

    /// Link target, if the entry is a link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Child entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationItem>,
}

impl NavigationItem {
    /// Creates a link entry.
    #[must_use]
    pub fn link(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: Some(url.into()),
            children: Vec::new(),
        }
    }

    /// Creates a heading entry with no link target.
    #[must_use]
    pub fn heading(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
            children: Vec::new(),
        }
    }

    /// Adds a child entry (builder style).
    #[must_use]
    pub fn with_child(mut self, child: NavigationItem) -> Self {
        self.children.push(child);
        self
    }
}

/// Context threaded through navigation assembly.
///
/// Providers run in registration order and append to the same list, so
/// a later provider sees (and may order itself after) earlier entries.
#[derive(Debug, Default)]
pub struct NavigationContext {
    /// Root entries accumulated so far.
    pub items: Vec<NavigationItem>,
}

/// Contributes root entries to the site navigation.
///
/// The assembled navigation is cached at site scope until explicitly
/// invalidated; provider errors leave the cache untouched.
#[async_trait]
pub trait NavigationProvider: Send + Sync {
    /// Provider name, for logging and diagnostics.
    fn name(&self) -> &str;

    /// Appends this provider's root entries.
    ///
    /// # Errors
    ///
    /// A returned error aborts assembly; nothing is cached.
    async fn add_root_items(&self, cx: &mut NavigationContext) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_produces_tree() {
        let nav = NavigationItem::heading("Docs")
            .with_child(NavigationItem::link("Intro", "/docs/intro"))
            .with_child(NavigationItem::link("Guide", "/docs/guide"));

        assert_eq!(nav.url, None);
        assert_eq!(nav.children.len(), 2);
        assert_eq!(nav.children[0].url.as_deref(), Some("/docs/intro"));
    }

    #[test]
    fn serde_omits_empty_fields() {
        let json = serde_json::to_value(NavigationItem::heading("Docs"))
            .expect("navigation item should serialize");
        assert!(json.get("url").is_none());
        assert!(json.get("children").is_none());
    }
}
