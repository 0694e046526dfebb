//! Trellis runtime - the composition pipeline.
//!
//! This crate wires the Plugin SDK into the working pipeline: items are
//! fetched through the store chain, normalized by part loaders, expanded
//! into shape trees by part handlers, routed into zones by placement
//! rules, and streamed through the view engine.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Plugin SDK Layer                         │
//! │  (External, SemVer stable)                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  trellis-types     : ItemId, ContentItem, Part              │
//! │  trellis-shape     : Shape tree, zones, selectors           │
//! │  trellis-plugin    : Store/Loader/Handler traits            │
//! │  trellis-placement : Placement rules and routing            │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Runtime Layer (THIS CRATE)                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  registry : typed (capability, type-key) plugin registry    │
//! │  bus      : core pipeline events, registration-order        │
//! │  chain    : priority-ordered store fan-out                  │
//! │  dispatch : loader/handler fan-out + structured join        │
//! │  manager  : load dedup, caching, render entry point         │
//! │  stream   : depth-first walk + promise expansion            │
//! │  scope    : request/site caches                             │
//! │  builtin  : reference plugins (text, title, date, url, ...)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Request Lifecycle
//!
//! ```text
//! Shell::request() ──► ContentManager
//!        │
//!        │ render(id, display_type)
//!        ▼
//! load(id) ── in-flight dedup ── StoreChain ── PartLoader fan-out ── cache
//!        │
//!        ▼
//! item-promise shape ── begin_expansion() ── PartHandler fan-out
//!        │
//!        ▼
//! PlacementSet::route ──► zones ──► RenderStream ──► ViewEngine ──► body
//! ```
//!
//! # Concurrency Model
//!
//! Single-process cooperative async. Fan-out is a set of independent
//! futures; fan-in is a structured join that completes when all siblings
//! finish or the first fails. The request-scope cache and the in-flight
//! registry are lock-guarded; the site-scope navigation cache uses an
//! async lock because assembly awaits providers. "At most one in-flight
//! fetch per id" is enforced by the in-flight registry keyed by id.

mod bus;
mod chain;
mod config;
mod dispatch;
mod error;
mod manager;
mod registry;
mod scope;
mod shell;
mod stream;

pub mod builtin;

pub use bus::{EventBus, EventKind, PipelineEvent, PipelineHook};
pub use chain::StoreChain;
pub use config::{EngineConfig, HandlerOrdering};
pub use error::{EventError, LoadError, RenderError};
pub use manager::{ContentManager, LoadOutcome, LoadResults};
pub use registry::PluginRegistry;
pub use scope::{RequestScope, SiteScope};
pub use shell::Shell;
pub use stream::{RenderStream, RenderedPage};

// Re-export the SDK surface consumers typically need alongside the
// runtime.
pub use trellis_placement::{PlacementRule, PlacementSet, Position};
pub use trellis_plugin::{
    ContentStore, NavigationItem, NavigationProvider, PartHandler, PartLoader, ShapeHandler,
    ViewEngine,
};
pub use trellis_shape::{Shape, ShapeSelector};
pub use trellis_types::{ContentItem, ContentTypeDef, DisplayType, ItemId, Part, PartDef};
