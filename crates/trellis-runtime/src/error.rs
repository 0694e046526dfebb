//! Runtime layer errors.
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`LoadError::NotFound`] | `LOAD_NOT_FOUND` | No |
//! | [`LoadError::StoreTransport`] | `LOAD_STORE_TRANSPORT` | Yes |
//! | [`LoadError::StoreFailed`] | `LOAD_STORE_FAILED` | Yes |
//! | [`LoadError::Part`] | `LOAD_PART_FAILED` | Yes |
//! | [`LoadError::Event`] | `LOAD_EVENT_FAILED` | Yes |
//! | [`LoadError::Delivery`] | `LOAD_DELIVERY_FAILED` | Yes |
//! | [`RenderError::*`] | `RENDER_*` | mixed |
//! | [`EventError::Subscriber`] | `EVENT_SUBSCRIBER_FAILED` | Yes |
//!
//! `LoadError` is `Clone`: one fetch may have several waiters, and each
//! receives its own copy of the outcome.

use thiserror::Error;
use trellis_plugin::{PartError, ViewError};
use trellis_types::{ErrorCode, ItemId};

/// Event bus error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// A subscriber failed while handling a core event.
    #[error("event subscriber '{hook}' failed: {message}")]
    Subscriber {
        /// Id of the failing subscriber.
        hook: String,
        /// Subscriber-provided detail.
        message: String,
    },
}

impl EventError {
    /// Shorthand constructor.
    #[must_use]
    pub fn subscriber(hook: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Subscriber {
            hook: hook.into(),
            message: message.into(),
        }
    }
}

impl ErrorCode for EventError {
    fn code(&self) -> &'static str {
        match self {
            Self::Subscriber { .. } => "EVENT_SUBSCRIBER_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}

/// Content load error.
///
/// Only `StoreTransport` fails a whole multi-id load; everything else is
/// a per-id outcome. A failed id is never cached: it is absent from the
/// request scope, not present-but-empty.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// No store in the chain resolved the id.
    ///
    /// Non-fatal: the render layer maps this to the dedicated
    /// not-found shape.
    #[error("no store resolved id '{0}'")]
    NotFound(ItemId),

    /// A store could not be communicated with; the chain halted.
    #[error("store transport failure: {0}")]
    StoreTransport(String),

    /// A store failed reading one id; siblings were unaffected.
    #[error("store failed for id '{id}': {message}")]
    StoreFailed {
        /// The id the store failed on.
        id: ItemId,
        /// Store-provided detail.
        message: String,
    },

    /// A part loader failed; the item's load was aborted.
    #[error(transparent)]
    Part(#[from] PartError),

    /// A load-items event subscriber failed.
    #[error(transparent)]
    Event(#[from] EventError),

    /// The fetch driving this id was abandoned before delivering.
    #[error("load result was never delivered")]
    Delivery,
}

impl ErrorCode for LoadError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "LOAD_NOT_FOUND",
            Self::StoreTransport(_) => "LOAD_STORE_TRANSPORT",
            Self::StoreFailed { .. } => "LOAD_STORE_FAILED",
            Self::Part(_) => "LOAD_PART_FAILED",
            Self::Event(_) => "LOAD_EVENT_FAILED",
            Self::Delivery => "LOAD_DELIVERY_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        // An unresolvable id stays unresolvable; the rest is transient.
        !matches!(self, Self::NotFound(_))
    }
}

/// Render error.
///
/// A render either completes or fails whole: transport, handler, view,
/// and subscriber failures all abort before anything partial is
/// observable as a finished page. Not-found ids do **not** surface here;
/// they become not-found shapes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// The item load failed (transport or per-id store/loader failure).
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A part handler or shape handler failed.
    #[error(transparent)]
    Handler(PartError),

    /// The view engine failed to emit output.
    #[error(transparent)]
    View(#[from] ViewError),

    /// A core event subscriber failed during the render.
    #[error(transparent)]
    Event(#[from] EventError),

    /// No view engine is registered.
    #[error("no view engine registered")]
    ViewEngineMissing,

    /// The shape tree recursed past the configured depth limit.
    #[error("render depth {depth} exceeded the configured limit")]
    DepthExceeded {
        /// Depth at which the walk stopped.
        depth: usize,
    },
}

impl ErrorCode for RenderError {
    fn code(&self) -> &'static str {
        match self {
            Self::Load(_) => "RENDER_LOAD_FAILED",
            Self::Handler(_) => "RENDER_HANDLER_FAILED",
            Self::View(_) => "RENDER_VIEW_FAILED",
            Self::Event(_) => "RENDER_EVENT_FAILED",
            Self::ViewEngineMissing => "RENDER_VIEW_ENGINE_MISSING",
            Self::DepthExceeded { .. } => "RENDER_DEPTH_EXCEEDED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Load(e) => e.is_recoverable(),
            Self::Handler(e) => e.is_recoverable(),
            Self::View(e) => e.is_recoverable(),
            Self::Event(e) => e.is_recoverable(),
            // Registration and tree-shape problems need code changes.
            Self::ViewEngineMissing => false,
            Self::DepthExceeded { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_types::assert_error_codes;

    #[test]
    fn load_error_codes() {
        assert_error_codes(
            &[
                LoadError::NotFound(ItemId::new("/x")),
                LoadError::StoreTransport("x".into()),
                LoadError::StoreFailed {
                    id: ItemId::new("/x"),
                    message: "x".into(),
                },
                LoadError::Part(PartError::load("p", "x")),
                LoadError::Event(EventError::subscriber("h", "x")),
                LoadError::Delivery,
            ],
            "LOAD_",
        );
    }

    #[test]
    fn render_error_codes() {
        assert_error_codes(
            &[
                RenderError::Load(LoadError::Delivery),
                RenderError::Handler(PartError::handle("p", "x")),
                RenderError::View(ViewError::RenderFailed("x".into())),
                RenderError::Event(EventError::subscriber("h", "x")),
                RenderError::ViewEngineMissing,
                RenderError::DepthExceeded { depth: 99 },
            ],
            "RENDER_",
        );
    }

    #[test]
    fn event_error_codes() {
        assert_error_codes(&[EventError::subscriber("h", "x")], "EVENT_");
    }

    #[test]
    fn not_found_is_not_recoverable() {
        assert!(!LoadError::NotFound(ItemId::new("/x")).is_recoverable());
        assert!(LoadError::StoreTransport("reset".into()).is_recoverable());
    }

    #[test]
    fn render_recoverability_follows_source() {
        let e = RenderError::Load(LoadError::NotFound(ItemId::new("/x")));
        assert!(!e.is_recoverable());

        let e = RenderError::Load(LoadError::StoreTransport("reset".into()));
        assert!(e.is_recoverable());
    }
}
