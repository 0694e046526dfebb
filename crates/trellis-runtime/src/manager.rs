//! The content manager: load orchestration and the render entry point.

use crate::{
    chain::StoreChain, dispatch, EngineConfig, EventBus, LoadError, PipelineEvent,
    PluginRegistry, RenderError, RenderStream, RenderedPage, RequestScope,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::oneshot;
use trellis_plugin::{FetchBatch, StoreError};
use trellis_shape::Shape;
use trellis_types::{ContentItem, DisplayType, ItemId};

/// Per-id outcome of a load.
pub type LoadOutcome = Result<Arc<ContentItem>, LoadError>;

/// Outcomes of one [`ContentManager::load`] call, keyed by id.
///
/// Only a store-level transport failure fails the call itself;
/// everything per-id (not found, per-id store failure, loader failure)
/// lands here.
#[derive(Debug, Default)]
pub struct LoadResults {
    outcomes: BTreeMap<ItemId, LoadOutcome>,
}

impl LoadResults {
    /// The outcome for an id, if it was part of the request.
    #[must_use]
    pub fn outcome(&self, id: &ItemId) -> Option<&LoadOutcome> {
        self.outcomes.get(id)
    }

    /// The resolved item for an id, if it loaded successfully.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Arc<ContentItem>> {
        match self.outcomes.get(id) {
            Some(Ok(item)) => Some(item),
            _ => None,
        }
    }

    /// Returns `true` if the id's outcome is the not-found class.
    #[must_use]
    pub fn is_not_found(&self, id: &ItemId) -> bool {
        matches!(self.outcomes.get(id), Some(Err(LoadError::NotFound(_))))
    }

    /// Successfully resolved items, in id order.
    pub fn items(&self) -> impl Iterator<Item = (&ItemId, &Arc<ContentItem>)> {
        self.outcomes
            .iter()
            .filter_map(|(id, outcome)| outcome.as_ref().ok().map(|item| (id, item)))
    }

    /// Number of per-id outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns `true` if no outcomes were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Orchestrates fetching and expansion of content items.
///
/// One manager serves one request scope. Its load path guarantees:
///
/// - **At most one in-flight fetch per id**: a second request for an id
///   already being fetched attaches a waiter to the existing fetch
///   instead of re-issuing it, via the in-flight registry.
/// - **Waiter order**: waiters for one id complete in registration
///   order, each exactly once.
/// - **Normalize before cache**: part loaders run before an item is
///   cached or delivered, so consumers only ever see canonical parts.
/// - **No error caching**: a failed id is absent from the cache.
pub struct ContentManager {
    registry: Arc<PluginRegistry>,
    bus: Arc<EventBus>,
    config: EngineConfig,
    scope: Arc<RequestScope>,
    in_flight: Mutex<HashMap<ItemId, Vec<oneshot::Sender<LoadOutcome>>>>,
}

impl ContentManager {
    /// Creates a manager over the given registry, bus, and scope.
    #[must_use]
    pub fn new(
        registry: Arc<PluginRegistry>,
        bus: Arc<EventBus>,
        config: EngineConfig,
        scope: Arc<RequestScope>,
    ) -> Self {
        Self {
            registry,
            bus,
            config,
            scope,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    pub(crate) fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub(crate) fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The request scope this manager caches into.
    #[must_use]
    pub fn scope(&self) -> &Arc<RequestScope> {
        &self.scope
    }

    /// Loads a set of ids, deduplicating against the cache and against
    /// fetches already in flight.
    ///
    /// Resolves once every requested id has been resolved or errored.
    ///
    /// # Errors
    ///
    /// Fails as a whole only on a store transport failure (or a failing
    /// load-items subscriber); per-id failures are reported in the
    /// returned [`LoadResults`].
    pub async fn load(&self, ids: &[ItemId]) -> Result<LoadResults, LoadError> {
        let mut outcomes: BTreeMap<ItemId, LoadOutcome> = BTreeMap::new();
        let mut waiting: Vec<(ItemId, oneshot::Receiver<LoadOutcome>)> = Vec::new();
        let mut to_fetch: Vec<ItemId> = Vec::new();

        {
            let mut in_flight = self.in_flight.lock();
            for id in ids {
                if outcomes.contains_key(id)
                    || waiting.iter().any(|(w, _)| w == id)
                    || to_fetch.contains(id)
                {
                    continue;
                }
                if let Some(item) = self.scope.get(id) {
                    outcomes.insert(id.clone(), Ok(item));
                } else if let Some(waiters) = in_flight.get_mut(id) {
                    // Piggyback on the fetch already in flight.
                    tracing::debug!(%id, "attaching to in-flight fetch");
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    waiting.push((id.clone(), rx));
                } else {
                    in_flight.insert(id.clone(), Vec::new());
                    to_fetch.push(id.clone());
                }
            }
        }

        if !to_fetch.is_empty() {
            let requested: HashSet<ItemId> = to_fetch.iter().cloned().collect();
            match self.fetch(to_fetch.clone()).await {
                Ok(fetched) => {
                    for (id, outcome) in fetched {
                        if let Ok(item) = &outcome {
                            self.scope.insert(Arc::clone(item));
                        }
                        self.deliver(&id, &outcome);
                        if requested.contains(&id) {
                            outcomes.insert(id, outcome);
                        }
                    }
                }
                Err(err) => {
                    // Chain-level failure: every id of this fetch fails,
                    // including piggybacked waiters elsewhere.
                    let waiters: Vec<_> = {
                        let mut in_flight = self.in_flight.lock();
                        to_fetch
                            .iter()
                            .filter_map(|id| in_flight.remove(id))
                            .collect()
                    };
                    for senders in waiters {
                        for tx in senders {
                            let _ = tx.send(Err(err.clone()));
                        }
                    }
                    return Err(err);
                }
            }
        }

        for (id, rx) in waiting {
            let outcome = rx.await.unwrap_or(Err(LoadError::Delivery));
            outcomes.insert(id, outcome);
        }

        Ok(LoadResults { outcomes })
    }

    /// Resolves the item and drives expansion, placement, and streaming
    /// into a finished page.
    ///
    /// An id no store resolves renders as the dedicated not-found shape;
    /// a transport failure aborts the render.
    ///
    /// # Errors
    ///
    /// See [`RenderError`] for the failure classes.
    pub async fn render(
        &self,
        id: &ItemId,
        display_type: DisplayType,
    ) -> Result<RenderedPage, RenderError> {
        let view = self
            .registry
            .view_engine()
            .ok_or(RenderError::ViewEngineMissing)?;

        let mut root = Shape::item_promise(id.clone(), display_type);
        let mut stream = RenderStream::new(self, view);
        stream.walk(&mut root).await?;
        Ok(stream.finish())
    }

    /// Drives one fetch: load-items event, store chain, then part-loader
    /// dispatch per resolved item.
    async fn fetch(
        &self,
        mut ids: Vec<ItemId>,
    ) -> Result<BTreeMap<ItemId, LoadOutcome>, LoadError> {
        let initial: HashSet<ItemId> = ids.iter().cloned().collect();
        self.bus
            .emit(&mut PipelineEvent::LoadItems { ids: &mut ids })
            .await?;

        // Ids added by subscribers join this fetch, unless they are
        // already cached or being fetched elsewhere.
        {
            let mut in_flight = self.in_flight.lock();
            ids.retain(|id| {
                if initial.contains(id) {
                    return true;
                }
                if self.scope.contains(id) || in_flight.contains_key(id) {
                    return false;
                }
                in_flight.insert(id.clone(), Vec::new());
                true
            });
        }
        let extras: Vec<ItemId> = ids
            .iter()
            .filter(|id| !initial.contains(*id))
            .cloned()
            .collect();

        let mut batch = FetchBatch::new(ids);
        if let Err(err) = StoreChain::new(self.registry.stores()).run(&mut batch).await {
            let err = match err {
                StoreError::Transport(msg) | StoreError::Backend(msg) => {
                    LoadError::StoreTransport(msg)
                }
            };
            // Retire the subscriber-added ids this fetch marked; the
            // caller retires (and notifies) the requested ones.
            let waiters: Vec<_> = {
                let mut in_flight = self.in_flight.lock();
                extras
                    .iter()
                    .filter_map(|id| in_flight.remove(id))
                    .collect()
            };
            for senders in waiters {
                for tx in senders {
                    let _ = tx.send(Err(err.clone()));
                }
            }
            return Err(err);
        }

        let results = batch.into_results();
        let mut outcomes = BTreeMap::new();

        // Loader dispatch fans out across items as well as parts; a
        // failing item does not abort its siblings.
        let registry = &self.registry;
        let loaded = futures::future::join_all(results.resolved.into_iter().map(
            |(id, mut item)| async move {
                match dispatch::load_parts(registry, &mut item).await {
                    Ok(()) => (id, Ok(Arc::new(item))),
                    Err(err) => {
                        tracing::warn!(%id, %err, "part loader failed, discarding item");
                        (id, Err(LoadError::Part(err)))
                    }
                }
            },
        ))
        .await;
        for (id, outcome) in loaded {
            outcomes.insert(id, outcome);
        }

        for (id, err) in results.failed {
            outcomes.insert(
                id.clone(),
                Err(LoadError::StoreFailed {
                    id,
                    message: err.to_string(),
                }),
            );
        }

        for id in results.unresolved {
            tracing::debug!(%id, "id unresolved by every store");
            outcomes.insert(id.clone(), Err(LoadError::NotFound(id)));
        }

        Ok(outcomes)
    }

    /// Completes an id's waiters, in registration order, exactly once
    /// each, and retires the in-flight entry.
    fn deliver(&self, id: &ItemId, outcome: &LoadOutcome) {
        let waiters = self.in_flight.lock().remove(id);
        if let Some(waiters) = waiters {
            for tx in waiters {
                let _ = tx.send(outcome.clone());
            }
        }
    }
}
