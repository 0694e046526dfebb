//! Event bus for the core pipeline events.
//!
//! The bus is the extension seam of the pipeline: stores, loaders,
//! handlers, and placement run through the typed registry, and at four
//! well-defined points the pipeline additionally emits a typed event
//! whose payload subscribers may read and mutate before the pipeline
//! continues.
//!
//! # Core Events
//!
//! | Event | Payload | Fired |
//! |-------|---------|-------|
//! | `LoadItems` | mutable id list | before the store chain runs |
//! | `HandleItem` | item + mutable handler output | after handler dispatch |
//! | `ShapePlacement` | ambient shape + mutable pending list | before placement routes |
//! | `ShapeRender` | shape + mutable output buffer | before the view engine emits |
//!
//! Subscribers for one event run **sequentially in registration order**
//! and are awaited one by one, so a later subscriber observes the
//! mutations of earlier ones. A subscriber error aborts the enclosing
//! operation.

use crate::EventError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use trellis_plugin::HandleOutput;
use trellis_shape::Shape;
use trellis_types::{ContentItem, DisplayType, ItemId};

/// The four core event points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Items are about to be fetched.
    LoadItems,
    /// An item's handlers have produced their output.
    HandleItem,
    /// Produced shapes are about to be routed into zones.
    ShapePlacement,
    /// A shape is about to be emitted by the view engine.
    ShapeRender,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LoadItems => "load-items",
            Self::HandleItem => "handle-item",
            Self::ShapePlacement => "shape-placement",
            Self::ShapeRender => "shape-render",
        };
        f.write_str(name)
    }
}

/// A core pipeline event with its mutable payload.
///
/// Payloads are passed by reference to every subscriber in turn, so
/// mutations accumulate across the chain.
pub enum PipelineEvent<'a> {
    /// Fired before the store chain runs. Subscribers may append ids
    /// to piggyback extra fetches on the same chain run.
    LoadItems {
        /// Ids about to be fetched.
        ids: &'a mut Vec<ItemId>,
    },

    /// Fired after part-handler dispatch for an item, before placement.
    /// Subscribers may append shapes or adjust the page title.
    HandleItem {
        /// The expanded item.
        item: &'a ContentItem,
        /// Display type of this expansion.
        display_type: &'a DisplayType,
        /// Merged handler output, still mutable.
        output: &'a mut HandleOutput,
    },

    /// Fired before the placement engine routes pending shapes.
    ShapePlacement {
        /// The shape whose zones will receive the pending shapes.
        ambient: &'a mut Shape,
        /// Shapes awaiting placement.
        pending: &'a mut Vec<Shape>,
    },

    /// Fired before the view engine emits a shape.
    ShapeRender {
        /// The shape about to be rendered.
        shape: &'a Shape,
        /// The stream's output buffer.
        out: &'a mut String,
    },
}

impl PipelineEvent<'_> {
    /// The event's kind, used for subscription lookup.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::LoadItems { .. } => EventKind::LoadItems,
            Self::HandleItem { .. } => EventKind::HandleItem,
            Self::ShapePlacement { .. } => EventKind::ShapePlacement,
            Self::ShapeRender { .. } => EventKind::ShapeRender,
        }
    }
}

/// A core event subscriber.
#[async_trait]
pub trait PipelineHook: Send + Sync {
    /// Stable subscriber id, for logging and diagnostics.
    fn id(&self) -> &str;

    /// Handles one event; may mutate the payload in place.
    ///
    /// # Errors
    ///
    /// A returned error aborts the operation that emitted the event.
    async fn on_event(&self, event: &mut PipelineEvent<'_>) -> Result<(), EventError>;
}

/// Registration-ordered event dispatcher.
pub struct EventBus {
    subscribers: HashMap<EventKind, Vec<Arc<dyn PipelineHook>>>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
        }
    }

    /// Subscribes a hook to one event kind. The same hook may be
    /// subscribed to several kinds.
    pub fn subscribe(&mut self, kind: EventKind, hook: Arc<dyn PipelineHook>) {
        tracing::debug!(%kind, hook = hook.id(), "subscribing pipeline hook");
        self.subscribers.entry(kind).or_default().push(hook);
    }

    /// Number of subscribers for a kind.
    #[must_use]
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers.get(&kind).map_or(0, Vec::len)
    }

    /// Emits an event to its subscribers, sequentially, in registration
    /// order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing subscriber and returns its error;
    /// later subscribers do not run.
    pub async fn emit(&self, event: &mut PipelineEvent<'_>) -> Result<(), EventError> {
        let Some(hooks) = self.subscribers.get(&event.kind()) else {
            return Ok(());
        };
        for hook in hooks {
            hook.on_event(event).await?;
        }
        Ok(())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
