//! Generic shape tree-walk hooks.

use crate::PartError;
use async_trait::async_trait;
use trellis_shape::{Shape, ShapeSelector};

/// A hook invoked for every shape the render stream walks whose metadata
/// matches the handler's selector.
///
/// Shape handlers run after a promise has been expanded and placed, and
/// before the view engine emits output for the shape, so they can adjust
/// display data, add alternates, or inject children for any shape type
/// without the producing plugin knowing about them.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use serde_json::json;
/// use trellis_plugin::{PartError, Shape, ShapeHandler, ShapeSelector};
///
/// /// Tags every content shape with a CSS class.
/// struct ContentClassHandler {
///     selector: ShapeSelector,
/// }
///
/// impl ContentClassHandler {
///     fn new() -> Self {
///         Self {
///             selector: ShapeSelector::parse("content")
///                 .expect("static selector is valid"),
///         }
///     }
/// }
///
/// #[async_trait]
/// impl ShapeHandler for ContentClassHandler {
///     fn id(&self) -> &str {
///         "content-class"
///     }
///
///     fn selector(&self) -> &ShapeSelector {
///         &self.selector
///     }
///
///     async fn handle(&self, shape: &mut Shape) -> Result<(), PartError> {
///         shape.data.insert("css_class".into(), json!("content-block"));
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ShapeHandler: Send + Sync {
    /// Stable handler id, for registration bookkeeping and logging.
    fn id(&self) -> &str;

    /// Selector deciding which shapes this handler sees.
    fn selector(&self) -> &ShapeSelector;

    /// Adjusts the shape in place.
    ///
    /// # Errors
    ///
    /// A returned error aborts the enclosing render.
    async fn handle(&self, shape: &mut Shape) -> Result<(), PartError>;
}
