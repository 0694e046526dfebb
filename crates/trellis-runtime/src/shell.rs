//! The shell: site-lifetime engine state.

use crate::{ContentManager, EngineConfig, EventBus, PluginRegistry, RequestScope, SiteScope};
use std::sync::Arc;
use trellis_plugin::{NavigationItem, StoreError};

/// Site-lifetime owner of the registry, bus, configuration, and the
/// site scope.
///
/// Build one shell at startup, register plugins into its registry and
/// bus beforehand, then mint a [`ContentManager`] per request:
///
/// ```no_run
/// use std::sync::Arc;
/// use trellis_runtime::{EngineConfig, EventBus, PluginRegistry, Shell};
/// use trellis_types::{DisplayType, ItemId};
///
/// # async fn serve() -> Result<(), Box<dyn std::error::Error>> {
/// let mut registry = PluginRegistry::new();
/// // registry.register_store(...); registry.set_view_engine(...);
///
/// let shell = Shell::new(registry, EventBus::new(), EngineConfig::default());
///
/// // Per request:
/// let manager = shell.request();
/// let page = manager.render(&ItemId::new("/about"), DisplayType::main()).await?;
/// println!("{}", page.body);
/// # Ok(())
/// # }
/// ```
pub struct Shell {
    registry: Arc<PluginRegistry>,
    bus: Arc<EventBus>,
    config: EngineConfig,
    site: Arc<SiteScope>,
}

impl Shell {
    /// Creates a shell from a fully registered registry and bus.
    #[must_use]
    pub fn new(registry: PluginRegistry, bus: EventBus, config: EngineConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            bus: Arc::new(bus),
            config,
            site: Arc::new(SiteScope::new()),
        }
    }

    /// The shared plugin registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mints a content manager with a fresh request scope.
    #[must_use]
    pub fn request(&self) -> ContentManager {
        ContentManager::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.bus),
            self.config.clone(),
            Arc::new(RequestScope::new()),
        )
    }

    /// The site navigation, assembled on first use and cached.
    ///
    /// # Errors
    ///
    /// Propagates the first failing provider.
    pub async fn navigation(&self) -> Result<Arc<Vec<NavigationItem>>, StoreError> {
        self.site.navigation(&self.registry).await
    }

    /// Drops the cached navigation.
    pub async fn invalidate_navigation(&self) {
        self.site.invalidate().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::StaticNavigationProvider;

    #[tokio::test]
    async fn each_request_gets_a_fresh_scope() {
        let shell = Shell::new(PluginRegistry::new(), EventBus::new(), EngineConfig::default());

        let first = shell.request();
        let second = shell.request();
        assert!(!Arc::ptr_eq(first.scope(), second.scope()));
    }

    #[tokio::test]
    async fn navigation_flows_through_site_scope() {
        let mut registry = PluginRegistry::new();
        registry.register_navigation_provider(Arc::new(StaticNavigationProvider::new(
            "static",
            vec![NavigationItem::link("Home", "/")],
        )));

        let shell = Shell::new(registry, EventBus::new(), EngineConfig::default());
        let nav = shell
            .navigation()
            .await
            .expect("navigation should assemble");
        assert_eq!(nav[0].title, "Home");

        shell.invalidate_navigation().await;
        let nav = shell
            .navigation()
            .await
            .expect("navigation should reassemble");
        assert_eq!(nav.len(), 1);
    }
}
