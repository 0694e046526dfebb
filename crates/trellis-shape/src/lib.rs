//! Shape trees for the Trellis pipeline.
//!
//! A [`Shape`] is the unit of renderable output: a typed in-memory node
//! carrying display data, named **zones** (ordered child slots), and a
//! flat `items` list. Shapes form the tree that the render stream walks
//! depth-first and hands, node by node, to a view engine.
//!
//! # Tree Structure
//!
//! ```text
//! Shape "layout"
//!   zones:
//!     "header" ──► [ Shape "navigation" ]
//!     "main"   ──► [ Shape "item-promise" (id: "/about") ]
//!   items: []
//! ```
//!
//! # Placeholder Lifecycle
//!
//! An item-promise shape is a lightweight stand-in carrying only an item
//! id and a display type. It is expanded lazily, and always **morphed in
//! place**: the tree slot is reused, never replaced, so zone references
//! established before expansion stay valid.
//!
//! ```text
//! Unresolved ──► Expanding ──► Placed ──► Rendered
//!      │
//!      └── begin_expansion() succeeds at most once per shape instance
//! ```
//!
//! ```
//! use trellis_shape::{PromiseState, Shape};
//! use trellis_types::{DisplayType, ItemId};
//!
//! let mut shape = Shape::item_promise(ItemId::new("/about"), DisplayType::main());
//! assert_eq!(shape.state(), PromiseState::Unresolved);
//!
//! assert!(shape.begin_expansion());
//! assert!(!shape.begin_expansion()); // guard: at most once
//! ```
//!
//! # Scratch State
//!
//! Transient expansion state (display type, the item back-reference,
//! pending children) lives in [`ShapeScratch`], a side-channel struct
//! skipped during serialization.
//!
//! # Selectors
//!
//! A [`ShapeSelector`] is a small predicate over a shape's metadata,
//! used by placement rules and tree-walk hooks:
//!
//! ```
//! use trellis_shape::ShapeSelector;
//!
//! let sel = ShapeSelector::parse("item-promise@main")
//!     .expect("selector should parse");
//! assert_eq!(sel.to_string(), "item-promise@main");
//! ```

mod meta;
mod promise;
mod scratch;
mod selector;
mod shape;

pub use meta::ShapeMeta;
pub use promise::PromiseState;
pub use scratch::ShapeScratch;
pub use selector::{SelectorError, SelectorSegment, ShapeSelector};
pub use shape::{shape_types, Shape};
