//! View engine interface.

use crate::ViewError;
use async_trait::async_trait;
use trellis_shape::Shape;

/// Turns one shape into output markup.
///
/// The view engine is an external collaborator: Trellis walks the
/// finished shape tree depth-first and asks the engine to emit each node
/// into the shared output buffer. Template lookup follows
/// [`ShapeMeta::template_candidates`](trellis_shape::ShapeMeta::template_candidates):
/// alternates most specific first, then the base shape type.
///
/// Implementations render only the node itself; the stream handles
/// recursion into zones and items.
#[async_trait]
pub trait ViewEngine: Send + Sync {
    /// Engine name, for logging and diagnostics.
    fn name(&self) -> &str;

    /// Emits markup for one shape into the output buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::TemplateMissing`] when no candidate template
    /// exists, or [`ViewError::RenderFailed`] on emission failure. Either
    /// aborts the render; a partial page is never flushed.
    async fn render(&self, shape: &Shape, out: &mut String) -> Result<(), ViewError>;
}
