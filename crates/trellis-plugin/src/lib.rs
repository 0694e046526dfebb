//! Plugin SDK for the Trellis pipeline.
//!
//! Everything third parties implement lives here: the capability traits
//! the runtime dispatches to, the context objects threaded through each
//! dispatch call, and the error types plugins return. The runtime never
//! knows concrete plugin types; it holds trait objects registered at
//! startup in a typed registry.
//!
//! # Capability Traits
//!
//! | Trait | Keyed / filtered by | Invoked |
//! |-------|---------------------|---------|
//! | [`ContentStore`] | chain order | per fetch batch |
//! | [`PartLoader`] | part type | per part, after fetch |
//! | [`PartHandler`] | part type | per part, during render |
//! | [`ShapeHandler`] | [`ShapeSelector`] | per shape, during the walk |
//! | [`NavigationProvider`] | registration order | on navigation assembly |
//! | [`ViewEngine`] | singleton | per shape, output emission |
//!
//! # Dispatch Flow
//!
//! ```text
//! load(ids)
//!     │
//!     ▼
//! ContentStore chain ──► FetchBatch (fulfill / fail / remaining)
//!     │
//!     ▼
//! PartLoader fan-out ──► LoadContext (normalize payload in place)
//!     │  (item cached only after every loader completed)
//!     ▼
//! render walk
//!     │
//!     ▼
//! PartHandler fan-out ──► HandleContext (produce shapes, set title)
//!     │
//!     ▼
//! placement ──► zones          ViewEngine ──► markup
//! ```
//!
//! # Capability Sets
//!
//! A part type need not implement both sides: a type with only a loader
//! is normalized but produces no shapes; a type with only a handler is
//! handled from its stored payload as-is. Registration is per capability.
//!
//! # Testing
//!
//! The [`testing`] module ships mock plugins (recording loaders, failing
//! loaders, static handlers, a markup view engine) used across the
//! workspace's tests.

mod error;
mod handler;
mod loader;
mod navigation;
mod shape_handler;
mod store;
pub mod testing;
mod view;

pub use error::{PartError, StoreError, ViewError};
pub use handler::{HandleContext, HandleOutput, PartHandler};
pub use loader::{LoadContext, PartLoader};
pub use navigation::{NavigationContext, NavigationItem, NavigationProvider};
pub use shape_handler::ShapeHandler;
pub use store::{ContentStore, FetchBatch, FetchResults};
pub use view::ViewEngine;

// Re-exports plugins almost always need.
pub use trellis_shape::{Shape, ShapeSelector};
pub use trellis_types::{ContentItem, DisplayType, ItemId, Part};
