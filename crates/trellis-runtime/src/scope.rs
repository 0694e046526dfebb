//! Scope state: the two shared caches and their lifetimes.
//!
//! | Scope | Lifetime | Holds |
//! |-------|----------|-------|
//! | [`RequestScope`] | one request | resolved content items |
//! | [`SiteScope`] | the site (until invalidated) | assembled navigation |
//!
//! These are the only mutable shared state in the pipeline. Both are
//! owned values accessed exclusively through their methods; nothing else
//! mutates them.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use trellis_plugin::{NavigationContext, NavigationItem, StoreError};
use trellis_types::{ContentItem, ItemId};

use crate::PluginRegistry;

/// Per-request item cache.
///
/// Items land here after part loaders normalized them and live until the
/// request ends. Failed ids are never inserted: a failed load leaves the
/// id absent, not cached-as-empty.
#[derive(Default)]
pub struct RequestScope {
    items: RwLock<HashMap<ItemId, Arc<ContentItem>>>,
}

impl RequestScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached item for an id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<Arc<ContentItem>> {
        self.items.read().get(id).cloned()
    }

    /// Returns `true` if the id is cached.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.read().contains_key(id)
    }

    /// Caches a loaded item under its own id.
    pub fn insert(&self, item: Arc<ContentItem>) {
        self.items.write().insert(item.id.clone(), item);
    }

    /// Number of cached items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

/// Site-lifetime cache for assembled navigation.
///
/// Navigation is computed lazily from the registered providers (in
/// registration order) and kept until [`invalidate`](Self::invalidate).
/// A provider error leaves the cache untouched, so a later call retries
/// from scratch.
#[derive(Default)]
pub struct SiteScope {
    // tokio lock: held across provider awaits during assembly.
    navigation: tokio::sync::RwLock<Option<Arc<Vec<NavigationItem>>>>,
}

impl SiteScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached navigation, assembling it on first use.
    ///
    /// # Errors
    ///
    /// Propagates the first failing provider; nothing is cached then.
    pub async fn navigation(
        &self,
        registry: &PluginRegistry,
    ) -> Result<Arc<Vec<NavigationItem>>, StoreError> {
        if let Some(cached) = self.navigation.read().await.clone() {
            return Ok(cached);
        }

        let mut slot = self.navigation.write().await;
        // Another task may have assembled while we waited for the lock.
        if let Some(cached) = slot.clone() {
            return Ok(cached);
        }

        let mut cx = NavigationContext::default();
        for provider in registry.navigation_providers() {
            tracing::debug!(provider = provider.name(), "assembling navigation");
            provider.add_root_items(&mut cx).await?;
        }

        let assembled = Arc::new(cx.items);
        *slot = Some(Arc::clone(&assembled));
        Ok(assembled)
    }

    /// Drops the cached navigation; the next call reassembles.
    pub async fn invalidate(&self) {
        *self.navigation.write().await = None;
    }
}
