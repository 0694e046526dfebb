//! Non-persisted shape state.

use crate::{PromiseState, Shape};
use std::sync::Arc;
use trellis_types::{ContentItem, DisplayType};

/// Transient per-render state attached to a shape.
///
/// This is the explicit side-channel for everything the pipeline needs
/// while expanding and placing a shape but must never serialize: the
/// requested display type, the back-reference to the source item, and
/// children produced by handlers that have not been placed yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeScratch {
    /// Display type this shape is being rendered for.
    pub display_type: Option<DisplayType>,

    /// Back-reference to the content item the shape was expanded from.
    pub item: Option<Arc<ContentItem>>,

    /// Children produced by handlers, awaiting placement.
    pub pending: Vec<Shape>,

    /// Lifecycle state for this render pass.
    pub state: PromiseState,
}

impl ShapeScratch {
    /// Scratch for a fresh item promise.
    #[must_use]
    pub fn promise(display_type: DisplayType) -> Self {
        Self {
            display_type: Some(display_type),
            ..Self::default()
        }
    }
}
