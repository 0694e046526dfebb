//! In-memory reference content store.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use trellis_plugin::{ContentStore, FetchBatch, StoreError};
use trellis_types::{ContentItem, ItemId};

/// A content store backed by an in-memory map.
///
/// The reference [`ContentStore`] implementation: honors prefix
/// namespacing, claims only the ids it holds, and counts `load_items`
/// calls so tests can assert fetch deduplication. An optional artificial
/// delay turns the store into a real suspension point for concurrency
/// tests.
///
/// # Example
///
/// ```
/// use trellis_runtime::builtin::MemoryStore;
/// use trellis_types::{ContentItem, ItemId};
///
/// let store = MemoryStore::new("file").with_prefix("file");
/// store.insert(ContentItem::new(ItemId::new("file:/readme"), "page"));
/// assert_eq!(store.len(), 1);
/// ```
pub struct MemoryStore {
    name: String,
    prefix: Option<String>,
    delay: Option<Duration>,
    items: RwLock<BTreeMap<ItemId, ContentItem>>,
    load_calls: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            delay: None,
            items: RwLock::new(BTreeMap::new()),
            load_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Namespaces the store: it will only claim ids carrying this
    /// prefix (or unprefixed ids it happens to hold).
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Adds an artificial fetch delay, making every `load_items` call a
    /// genuine suspension point.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Inserts an item under its own id.
    pub fn insert(&self, item: ContentItem) {
        self.items.write().insert(item.id.clone(), item);
    }

    /// Number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the store holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Shared counter of `load_items` invocations.
    #[must_use]
    pub fn load_calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.load_calls)
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    async fn load_items(&self, batch: &mut FetchBatch) -> Result<(), StoreError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        for id in batch.claimable(self.prefix()) {
            let found = self.items.read().get(&id).cloned();
            if let Some(item) = found {
                batch.fulfill(item);
            }
        }
        Ok(())
    }
}
