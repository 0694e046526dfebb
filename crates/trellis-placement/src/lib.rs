//! Zone placement for the Trellis pipeline.
//!
//! When part handlers finish, the expansion of one item has produced a
//! flat list of shapes. This crate routes that list into the named zones
//! of the ambient shape: each [`PlacementRule`] pairs a selector
//! predicate with a target zone and a position, and the [`PlacementSet`]
//! applies the first matching rule per shape in registration order.
//!
//! ```text
//! pending: [ title-shape, text-shape, badge-shape ]
//!     │
//!     ▼  first matching rule per shape, registration order
//! ┌────────────────────────────────────────────────┐
//! │ PlacementSet                                   │
//! │   1. "title"  → zone "header", first           │
//! │   2. "*@main" → zone "main",   after           │
//! └────────────────────────────────────────────────┘
//!     │
//!     ▼
//! ambient.zones["header"] = [ title-shape ]
//! ambient.zones["main"]   = [ text-shape ]
//! unplaced                = [ badge-shape ]   (stays on the parent)
//! ```
//!
//! Shapes matching no rule are returned to the caller, which keeps them
//! attached to their producing parent rather than dropping them. When no
//! custom rules are registered at all, the default policy applies:
//! shapes with display type `main` go to the zone named `main`.

mod position;
mod rule;
mod set;

pub use position::Position;
pub use rule::PlacementRule;
pub use set::PlacementSet;
