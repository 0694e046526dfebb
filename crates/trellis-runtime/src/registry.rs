//! Typed plugin registry.
//!
//! The registry maps `(capability, type-key)` to trait objects and is
//! populated at startup by explicit registration calls. Dispatch
//! components look plugins up here; the core never names a concrete
//! plugin type. Once registration is done, the registry is wrapped in an
//! `Arc` and shared read-only across the pipeline.

use std::collections::HashMap;
use std::sync::Arc;
use trellis_placement::{PlacementRule, PlacementSet};
use trellis_plugin::{
    ContentStore, NavigationProvider, PartHandler, PartLoader, ShapeHandler, ViewEngine,
};
use trellis_types::ContentTypeDef;

/// Central plugin registry.
///
/// | Capability | Keyed by | Lookup |
/// |------------|----------|--------|
/// | content stores | registration order (= chain priority) | [`stores`](Self::stores) |
/// | part loaders | part type | [`loader_for`](Self::loader_for) |
/// | part handlers | part type | [`handler_for`](Self::handler_for) |
/// | shape handlers | selector filter | [`shape_handlers`](Self::shape_handlers) |
/// | navigation providers | registration order | [`navigation_providers`](Self::navigation_providers) |
/// | content types | type name | [`content_type`](Self::content_type) |
/// | placement rules | registration order | [`placement`](Self::placement) |
/// | view engine | singleton | [`view_engine`](Self::view_engine) |
#[derive(Default)]
pub struct PluginRegistry {
    stores: Vec<Arc<dyn ContentStore>>,
    loaders: HashMap<String, Arc<dyn PartLoader>>,
    handlers: HashMap<String, Arc<dyn PartHandler>>,
    shape_handlers: Vec<Arc<dyn ShapeHandler>>,
    navigation: Vec<Arc<dyn NavigationProvider>>,
    content_types: HashMap<String, ContentTypeDef>,
    placement: PlacementSet,
    view: Option<Arc<dyn ViewEngine>>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Stores ===

    /// Appends a store to the chain. Registration order is chain
    /// priority: earlier stores are offered ids first.
    pub fn register_store(&mut self, store: Arc<dyn ContentStore>) {
        tracing::debug!(store = store.name(), "registering content store");
        self.stores.push(store);
    }

    /// The store chain, in priority order.
    #[must_use]
    pub fn stores(&self) -> &[Arc<dyn ContentStore>] {
        &self.stores
    }

    // === Part loaders ===

    /// Registers a loader under its declared part type. A later
    /// registration for the same type replaces the earlier one.
    pub fn register_part_loader(&mut self, loader: Arc<dyn PartLoader>) {
        let key = loader.part_type().to_string();
        if self.loaders.insert(key.clone(), loader).is_some() {
            tracing::warn!(part_type = %key, "replacing part loader");
        }
    }

    /// Looks up the loader for a part type.
    #[must_use]
    pub fn loader_for(&self, part_type: &str) -> Option<Arc<dyn PartLoader>> {
        self.loaders.get(part_type).cloned()
    }

    // === Part handlers ===

    /// Registers a handler under its declared part type. A later
    /// registration for the same type replaces the earlier one.
    pub fn register_part_handler(&mut self, handler: Arc<dyn PartHandler>) {
        let key = handler.part_type().to_string();
        if self.handlers.insert(key.clone(), handler).is_some() {
            tracing::warn!(part_type = %key, "replacing part handler");
        }
    }

    /// Looks up the handler for a part type.
    #[must_use]
    pub fn handler_for(&self, part_type: &str) -> Option<Arc<dyn PartHandler>> {
        self.handlers.get(part_type).cloned()
    }

    // === Shape handlers ===

    /// Appends a tree-walk hook. Hooks run in registration order on
    /// every walked shape their selector matches.
    pub fn register_shape_handler(&mut self, handler: Arc<dyn ShapeHandler>) {
        self.shape_handlers.push(handler);
    }

    /// Registered tree-walk hooks, in registration order.
    #[must_use]
    pub fn shape_handlers(&self) -> &[Arc<dyn ShapeHandler>] {
        &self.shape_handlers
    }

    // === Navigation ===

    /// Appends a navigation provider.
    pub fn register_navigation_provider(&mut self, provider: Arc<dyn NavigationProvider>) {
        self.navigation.push(provider);
    }

    /// Navigation providers, in registration order.
    #[must_use]
    pub fn navigation_providers(&self) -> &[Arc<dyn NavigationProvider>] {
        &self.navigation
    }

    // === Content types ===

    /// Registers a content-type schema under its name.
    pub fn register_content_type(&mut self, def: ContentTypeDef) {
        self.content_types.insert(def.name.clone(), def);
    }

    /// Looks up a schema by content-type name.
    #[must_use]
    pub fn content_type(&self, name: &str) -> Option<&ContentTypeDef> {
        self.content_types.get(name)
    }

    // === Placement ===

    /// Registers a placement rule at the end of the chain.
    pub fn register_placement_rule(&mut self, rule: PlacementRule) {
        self.placement.register(rule);
    }

    /// The placement rule chain.
    #[must_use]
    pub fn placement(&self) -> &PlacementSet {
        &self.placement
    }

    /// Mutable placement chain, for enable/disable and unregistration.
    pub fn placement_mut(&mut self) -> &mut PlacementSet {
        &mut self.placement
    }

    // === View engine ===

    /// Sets the view engine. The pipeline holds exactly one.
    pub fn set_view_engine(&mut self, view: Arc<dyn ViewEngine>) {
        self.view = Some(view);
    }

    /// The registered view engine, if any.
    #[must_use]
    pub fn view_engine(&self) -> Option<Arc<dyn ViewEngine>> {
        self.view.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_plugin::testing::{RecordingHandler, RecordingLoader};
    use trellis_types::PartDef;

    #[test]
    fn loader_lookup_by_type() {
        let mut registry = PluginRegistry::new();
        registry.register_part_loader(Arc::new(RecordingLoader::new("text")));

        assert!(registry.loader_for("text").is_some());
        assert!(registry.loader_for("date").is_none());
    }

    #[test]
    fn later_registration_replaces() {
        let mut registry = PluginRegistry::new();
        let first = RecordingLoader::new("text");
        let first_calls = first.call_count();
        registry.register_part_loader(Arc::new(first));
        registry.register_part_loader(Arc::new(RecordingLoader::new("text")));

        // Still exactly one loader for the type; the first is gone.
        assert!(registry.loader_for("text").is_some());
        assert_eq!(first_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn capabilities_are_independent() {
        let mut registry = PluginRegistry::new();
        registry.register_part_loader(Arc::new(RecordingLoader::new("date")));
        registry.register_part_handler(Arc::new(RecordingHandler::new("text")));

        // A type may be loadable without being handleable and vice versa.
        assert!(registry.loader_for("date").is_some());
        assert!(registry.handler_for("date").is_none());
        assert!(registry.handler_for("text").is_some());
        assert!(registry.loader_for("text").is_none());
    }

    #[test]
    fn content_type_lookup() {
        let mut registry = PluginRegistry::new();
        registry.register_content_type(
            ContentTypeDef::new("page").with_part("title", PartDef::new("title")),
        );

        assert!(registry.content_type("page").is_some());
        assert!(registry.content_type("post").is_none());
    }
}
