//! Plugin layer errors.
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`StoreError::Transport`] | `STORE_TRANSPORT` | Yes |
//! | [`StoreError::Backend`] | `STORE_BACKEND` | Yes |
//! | [`PartError::LoadFailed`] | `PART_LOAD_FAILED` | Yes |
//! | [`PartError::HandleFailed`] | `PART_HANDLE_FAILED` | Yes |
//! | [`PartError::InvalidPayload`] | `PART_INVALID_PAYLOAD` | No |
//! | [`ViewError::TemplateMissing`] | `VIEW_TEMPLATE_MISSING` | No |
//! | [`ViewError::RenderFailed`] | `VIEW_RENDER_FAILED` | Yes |

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trellis_types::ErrorCode;

/// Content store error.
///
/// `Transport` means the store itself could not be reached; the chain
/// halts and the whole load fails. `Backend` is a per-id read failure
/// recorded against that id via [`FetchBatch::fail`](crate::FetchBatch::fail);
/// sibling ids in the same fetch are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum StoreError {
    /// The store could not be communicated with at all.
    ///
    /// Fatal to the current load; surfaced to the caller.
    #[error("store transport failure: {0}")]
    Transport(String),

    /// A backend read failed for a single id.
    ///
    /// Delivered only to that id's waiters.
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl ErrorCode for StoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "STORE_TRANSPORT",
            Self::Backend(_) => "STORE_BACKEND",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Both are transient I/O classes.
        true
    }
}

/// Part loader/handler error.
///
/// A part error aborts the enclosing item's fan-in: siblings already
/// completed are discarded for that item only, and the item is never
/// cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum PartError {
    /// A registered loader failed to normalize its part.
    #[error("part '{part}' failed to load: {message}")]
    LoadFailed {
        /// Name of the failing part.
        part: String,
        /// Loader-provided detail.
        message: String,
    },

    /// A registered handler failed to produce shapes.
    #[error("part '{part}' failed to handle: {message}")]
    HandleFailed {
        /// Name of the failing part.
        part: String,
        /// Handler-provided detail.
        message: String,
    },

    /// The part's stored payload does not match its declared type.
    #[error("part '{part}' has invalid payload: {message}")]
    InvalidPayload {
        /// Name of the offending part.
        part: String,
        /// What was wrong.
        message: String,
    },
}

impl PartError {
    /// Shorthand for a load failure.
    #[must_use]
    pub fn load(part: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LoadFailed {
            part: part.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a handle failure.
    #[must_use]
    pub fn handle(part: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HandleFailed {
            part: part.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an invalid payload.
    #[must_use]
    pub fn invalid(part: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            part: part.into(),
            message: message.into(),
        }
    }
}

impl ErrorCode for PartError {
    fn code(&self) -> &'static str {
        match self {
            Self::LoadFailed { .. } => "PART_LOAD_FAILED",
            Self::HandleFailed { .. } => "PART_HANDLE_FAILED",
            Self::InvalidPayload { .. } => "PART_INVALID_PAYLOAD",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::LoadFailed { .. } => true,
            Self::HandleFailed { .. } => true,
            // The stored payload will not change on retry.
            Self::InvalidPayload { .. } => false,
        }
    }
}

/// View engine error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ViewError {
    /// No template found for any of the shape's candidates.
    #[error("no template for shape '{0}'")]
    TemplateMissing(String),

    /// The template engine failed while emitting output.
    #[error("render failed: {0}")]
    RenderFailed(String),
}

impl ErrorCode for ViewError {
    fn code(&self) -> &'static str {
        match self {
            Self::TemplateMissing(_) => "VIEW_TEMPLATE_MISSING",
            Self::RenderFailed(_) => "VIEW_RENDER_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::RenderFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_types::assert_error_codes;

    #[test]
    fn store_error_codes() {
        assert_error_codes(
            &[
                StoreError::Transport("x".into()),
                StoreError::Backend("x".into()),
            ],
            "STORE_",
        );
    }

    #[test]
    fn part_error_codes() {
        assert_error_codes(
            &[
                PartError::load("p", "x"),
                PartError::handle("p", "x"),
                PartError::invalid("p", "x"),
            ],
            "PART_",
        );
    }

    #[test]
    fn view_error_codes() {
        assert_error_codes(
            &[
                ViewError::TemplateMissing("text".into()),
                ViewError::RenderFailed("x".into()),
            ],
            "VIEW_",
        );
    }

    #[test]
    fn invalid_payload_is_not_recoverable() {
        assert!(!PartError::invalid("p", "bad").is_recoverable());
        assert!(PartError::load("p", "timeout").is_recoverable());
    }

    #[test]
    fn messages_name_the_part() {
        let err = PartError::load("body", "backend down");
        assert!(err.to_string().contains("body"));
        assert!(err.to_string().contains("backend down"));
    }
}
