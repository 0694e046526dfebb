//! Content stores and the fetch batch they operate on.

use crate::StoreError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use trellis_types::{ContentItem, ItemId};

/// The shared state one fetch drives through the store chain.
///
/// Each store in priority order is offered the *remaining* unsatisfied
/// ids. A store may fulfill any subset, record per-id failures, and leave
/// the rest for the next store. Fulfilled and failed ids drop out of the
/// remaining set, so the chain can short-circuit once it is empty.
///
/// # Example
///
/// ```
/// use trellis_plugin::FetchBatch;
/// use trellis_types::{ContentItem, ItemId};
///
/// let mut batch = FetchBatch::new(vec![ItemId::new("/a"), ItemId::new("/b")]);
/// assert_eq!(batch.remaining().len(), 2);
///
/// batch.fulfill(ContentItem::new(ItemId::new("/a"), "page"));
/// assert_eq!(batch.remaining(), &[ItemId::new("/b")]);
/// assert!(!batch.is_done());
/// ```
#[derive(Debug, Default)]
pub struct FetchBatch {
    remaining: Vec<ItemId>,
    resolved: BTreeMap<ItemId, ContentItem>,
    failed: BTreeMap<ItemId, StoreError>,
}

impl FetchBatch {
    /// Creates a batch for the given ids, deduplicated, order preserved.
    #[must_use]
    pub fn new(ids: Vec<ItemId>) -> Self {
        let mut remaining = Vec::with_capacity(ids.len());
        for id in ids {
            if !remaining.contains(&id) {
                remaining.push(id);
            }
        }
        Self {
            remaining,
            resolved: BTreeMap::new(),
            failed: BTreeMap::new(),
        }
    }

    /// Ids not yet fulfilled or failed.
    #[must_use]
    pub fn remaining(&self) -> &[ItemId] {
        &self.remaining
    }

    /// Remaining ids claimable by a store with the given prefix.
    ///
    /// Stores should enumerate this rather than `remaining()` so
    /// namespaced ids only reach their own store.
    pub fn claimable(&self, store_prefix: Option<&str>) -> Vec<ItemId> {
        self.remaining
            .iter()
            .filter(|id| id.claimable_by(store_prefix))
            .cloned()
            .collect()
    }

    /// Returns `true` once every id is fulfilled or failed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Records a resolved item and removes its id from the remaining set.
    ///
    /// Fulfilling an id that is not outstanding is a no-op; the first
    /// store to resolve an id wins.
    pub fn fulfill(&mut self, item: ContentItem) {
        let Some(pos) = self.remaining.iter().position(|id| *id == item.id) else {
            return;
        };
        let id = self.remaining.remove(pos);
        self.resolved.insert(id, item);
    }

    /// Records a per-id failure and removes the id from the remaining
    /// set. The failure reaches only this id's waiters.
    pub fn fail(&mut self, id: &ItemId, err: StoreError) {
        let Some(pos) = self.remaining.iter().position(|r| r == id) else {
            return;
        };
        let id = self.remaining.remove(pos);
        self.failed.insert(id, err);
    }

    /// Items resolved so far.
    #[must_use]
    pub fn resolved(&self) -> &BTreeMap<ItemId, ContentItem> {
        &self.resolved
    }

    /// Consumes the batch into its final per-id outcomes.
    #[must_use]
    pub fn into_results(self) -> FetchResults {
        FetchResults {
            resolved: self.resolved,
            failed: self.failed,
            unresolved: self.remaining,
        }
    }
}

/// Final per-id outcomes of a chain run.
#[derive(Debug, Default)]
pub struct FetchResults {
    /// Items some store resolved.
    pub resolved: BTreeMap<ItemId, ContentItem>,
    /// Ids a store failed individually.
    pub failed: BTreeMap<ItemId, StoreError>,
    /// Ids no store claimed: the not-found set.
    pub unresolved: Vec<ItemId>,
}

/// A content store: one link in the priority-ordered fetch chain.
///
/// # Contract
///
/// - Enumerate [`FetchBatch::claimable`] with your own prefix and
///   fulfill/fail the ids you own. Leave the rest untouched.
/// - Return `Ok(())` when done, even if nothing was claimed.
/// - Return `Err(StoreError)` only for a store-level transport failure;
///   this halts the chain and fails the whole load.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use trellis_plugin::{ContentStore, FetchBatch, StoreError};
/// use trellis_types::{ContentItem, ItemId};
///
/// struct SingleItemStore;
///
/// #[async_trait]
/// impl ContentStore for SingleItemStore {
///     fn name(&self) -> &str {
///         "single"
///     }
///
///     async fn load_items(&self, batch: &mut FetchBatch) -> Result<(), StoreError> {
///         for id in batch.claimable(self.prefix()) {
///             if id.as_str() == "/only" {
///                 batch.fulfill(ContentItem::new(id, "page"));
///             }
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store name, for logging and diagnostics.
    fn name(&self) -> &str;

    /// Id namespace this store owns, if any.
    ///
    /// A store with a prefix should only claim ids carrying it;
    /// unprefixed ids are claimable by every store.
    fn prefix(&self) -> Option<&str> {
        None
    }

    /// Offers the batch's remaining ids to this store.
    ///
    /// # Errors
    ///
    /// `Err` signals a transport failure and halts the chain. Per-id
    /// problems go through [`FetchBatch::fail`] instead.
    async fn load_items(&self, batch: &mut FetchBatch) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<ItemId> {
        raw.iter().map(|s| ItemId::new(*s)).collect()
    }

    #[test]
    fn new_dedups_preserving_order() {
        let batch = FetchBatch::new(ids(&["/a", "/b", "/a"]));
        assert_eq!(batch.remaining(), ids(&["/a", "/b"]).as_slice());
    }

    #[test]
    fn fulfill_removes_from_remaining() {
        let mut batch = FetchBatch::new(ids(&["/a", "/b"]));
        batch.fulfill(ContentItem::new(ItemId::new("/a"), "page"));

        assert_eq!(batch.remaining(), ids(&["/b"]).as_slice());
        assert!(batch.resolved().contains_key(&ItemId::new("/a")));
    }

    #[test]
    fn first_store_wins() {
        let mut batch = FetchBatch::new(ids(&["/a"]));
        batch.fulfill(ContentItem::new(ItemId::new("/a"), "page"));

        // A later store fulfilling the same id is a no-op.
        batch.fulfill(ContentItem::new(ItemId::new("/a"), "other"));
        assert_eq!(
            batch.resolved()[&ItemId::new("/a")].content_type,
            "page"
        );
    }

    #[test]
    fn fail_is_per_id() {
        let mut batch = FetchBatch::new(ids(&["/a", "/b"]));
        batch.fail(&ItemId::new("/a"), StoreError::Backend("corrupt".into()));

        // Sibling id unaffected.
        assert_eq!(batch.remaining(), ids(&["/b"]).as_slice());

        let results = batch.into_results();
        assert!(results.failed.contains_key(&ItemId::new("/a")));
        assert_eq!(results.unresolved, ids(&["/b"]));
    }

    #[test]
    fn claimable_respects_prefixes() {
        let batch = FetchBatch::new(ids(&["/a", "archive:/b"]));

        assert_eq!(batch.claimable(None), ids(&["/a"]));
        assert_eq!(batch.claimable(Some("archive")), ids(&["/a", "archive:/b"]));
    }

    #[test]
    fn unclaimed_ids_end_unresolved() {
        let batch = FetchBatch::new(ids(&["/missing"]));
        let results = batch.into_results();
        assert!(results.resolved.is_empty());
        assert_eq!(results.unresolved, ids(&["/missing"]));
    }
}
