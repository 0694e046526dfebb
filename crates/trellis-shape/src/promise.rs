//! Placeholder shape lifecycle.

use serde::{Deserialize, Serialize};

/// Lifecycle of a shape across one render pass.
///
/// The states matter most for item-promise shapes, which go through the
/// full progression; plain shapes jump straight from `Unresolved` to
/// `Rendered` when the stream walks them.
///
/// ```text
/// Unresolved ──► Expanding ──► Placed ──► Rendered
/// ```
///
/// | State | Meaning |
/// |-------|---------|
/// | `Unresolved` | only the item id and display type are known |
/// | `Expanding` | item fetched, part-handler dispatch running |
/// | `Placed` | produced shapes distributed into zones |
/// | `Rendered` | the stream has walked this shape and emitted output |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromiseState {
    /// Not yet expanded.
    #[default]
    Unresolved,

    /// Expansion in progress (fetch + handler dispatch).
    Expanding,

    /// Produced shapes have been routed into zones.
    Placed,

    /// Output emitted for this shape.
    Rendered,
}

impl PromiseState {
    /// Returns `true` if expansion has not started.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    /// Returns `true` once output has been emitted.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered)
    }
}
