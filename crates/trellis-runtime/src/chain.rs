//! The store chain: priority-ordered fetch fan-out.

use std::sync::Arc;
use trellis_plugin::{ContentStore, FetchBatch, StoreError};

/// Drives a fetch batch through the registered stores in priority order.
///
/// Each store is offered the batch only after the previous store's
/// future completed; a store therefore sees exactly the ids its
/// predecessors left unresolved. The chain short-circuits once every id
/// is fulfilled or failed.
///
/// # Failure Policy
///
/// A store returning `Err` signals a transport failure: the chain halts
/// and the error is surfaced to the whole load. Per-id failures recorded
/// via [`FetchBatch::fail`] do not stop the chain and reach only that
/// id's waiters.
pub struct StoreChain<'a> {
    stores: &'a [Arc<dyn ContentStore>],
}

impl<'a> StoreChain<'a> {
    /// Creates a chain over the given stores, in priority order.
    #[must_use]
    pub fn new(stores: &'a [Arc<dyn ContentStore>]) -> Self {
        Self { stores }
    }

    /// Runs the batch through the chain.
    ///
    /// # Errors
    ///
    /// Propagates the first store-level transport failure.
    pub async fn run(&self, batch: &mut FetchBatch) -> Result<(), StoreError> {
        for store in self.stores {
            if batch.is_done() {
                tracing::debug!("store chain short-circuit: batch fully resolved");
                break;
            }

            tracing::debug!(
                store = store.name(),
                remaining = batch.remaining().len(),
                "offering batch to store"
            );

            if let Err(err) = store.load_items(batch).await {
                tracing::warn!(store = store.name(), %err, "store failed, halting chain");
                return Err(err);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::Ordering;
    use trellis_types::{ContentItem, ItemId};

    struct BrokenStore;

    #[async_trait]
    impl ContentStore for BrokenStore {
        fn name(&self) -> &str {
            "broken"
        }

        async fn load_items(&self, _batch: &mut FetchBatch) -> Result<(), StoreError> {
            Err(StoreError::Transport("connection refused".into()))
        }
    }

    fn store_with(ids: &[&str]) -> MemoryStore {
        let store = MemoryStore::new("mem");
        for id in ids {
            store.insert(ContentItem::new(ItemId::new(*id), "page"));
        }
        store
    }

    #[tokio::test]
    async fn remainder_forwards_to_next_store() {
        let first = Arc::new(store_with(&["/a"]));
        let second = Arc::new(store_with(&["/b"]));
        let stores: Vec<Arc<dyn ContentStore>> = vec![first, second];

        let mut batch = FetchBatch::new(vec![ItemId::new("/a"), ItemId::new("/b")]);
        StoreChain::new(&stores)
            .run(&mut batch)
            .await
            .expect("chain should succeed");

        let results = batch.into_results();
        assert_eq!(results.resolved.len(), 2);
        assert!(results.unresolved.is_empty());
    }

    #[tokio::test]
    async fn chain_short_circuits_when_done() {
        let first = Arc::new(store_with(&["/a"]));
        let second = Arc::new(store_with(&[]));
        let second_calls = Arc::clone(&second);
        let stores: Vec<Arc<dyn ContentStore>> = vec![first, second];

        let mut batch = FetchBatch::new(vec![ItemId::new("/a")]);
        StoreChain::new(&stores)
            .run(&mut batch)
            .await
            .expect("chain should succeed");

        // Everything resolved by the first store: the second is skipped.
        assert_eq!(second_calls.load_calls().load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transport_failure_halts_chain() {
        let after = Arc::new(store_with(&["/a"]));
        let after_calls = Arc::clone(&after);
        let stores: Vec<Arc<dyn ContentStore>> = vec![Arc::new(BrokenStore), after];

        let mut batch = FetchBatch::new(vec![ItemId::new("/a")]);
        let err = StoreChain::new(&stores)
            .run(&mut batch)
            .await
            .expect_err("broken store should halt the chain");

        assert_eq!(err, StoreError::Transport("connection refused".into()));
        assert_eq!(after_calls.load_calls().load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unclaimed_ids_survive_the_chain() {
        let stores: Vec<Arc<dyn ContentStore>> = vec![Arc::new(store_with(&["/a"]))];

        let mut batch = FetchBatch::new(vec![ItemId::new("/a"), ItemId::new("/missing")]);
        StoreChain::new(&stores)
            .run(&mut batch)
            .await
            .expect("chain should succeed");

        let results = batch.into_results();
        assert!(results.resolved.contains_key(&ItemId::new("/a")));
        assert_eq!(results.unresolved, vec![ItemId::new("/missing")]);
    }
}
