//! Core types for the Trellis content pipeline.
//!
//! This crate provides the identifier and content types shared by every
//! layer of Trellis: the logical item id, the content item with its typed
//! parts, the content-type schema, and the unified error-code interface.
//!
//! # Crate Architecture
//!
//! This crate is the bottom of the **Plugin SDK** layer:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Plugin SDK Layer                          │
//! │  (External, SemVer stable, safe to depend on)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  trellis-types     : ItemId, ContentItem, Part  ◄── HERE    │
//! │  trellis-shape     : Shape tree, zones, selectors           │
//! │  trellis-plugin    : Store/Loader/Handler traits            │
//! │  trellis-placement : Placement rules and routing            │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Runtime Layer                             │
//! │  trellis-runtime   : registry, event bus, pipeline          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Data Model Overview
//!
//! A [`ContentItem`] is a key-ordered mapping from part name to [`Part`].
//! Each part carries an optional inline type tag (`kind`); parts without
//! one resolve their type through the item's [`ContentTypeDef`] schema:
//!
//! ```text
//! ContentItem { id: "/about", content_type: "page" }
//!   ├── "title" : Part { kind: None,         payload: "About us" }
//!   ├── "body"  : Part { kind: Some("text"), payload: {...} }
//!   └── "date"  : Part { kind: None,         payload: "2024-03-01" }
//!                           │
//!                           ▼ (resolved via schema)
//! ContentTypeDef "page"
//!   ├── "title" → PartDef { part_type: "title" }
//!   └── "date"  → PartDef { part_type: "date" }
//! ```
//!
//! # Scratch State
//!
//! Per-operation state that must never reach storage lives in explicit
//! side-channel structs ([`ItemScratch`]) that are skipped during
//! serialization, rather than being intermixed with persisted fields.
//!
//! # Error Handling
//!
//! All Trellis error types implement [`ErrorCode`] for unified handling:
//!
//! ```
//! use trellis_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum FetchError {
//!     NotFound(String),
//!     Backend,
//! }
//!
//! impl ErrorCode for FetchError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::NotFound(_) => "FETCH_NOT_FOUND",
//!             Self::Backend => "FETCH_BACKEND",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Backend)
//!     }
//! }
//!
//! let err = FetchError::Backend;
//! assert_eq!(err.code(), "FETCH_BACKEND");
//! assert!(err.is_recoverable());
//! ```

mod content_type;
mod error;
mod id;
mod item;

pub use content_type::{resolve_part_type, ContentTypeDef, PartDef};
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{DisplayType, ItemId};
pub use item::{ContentItem, ItemScratch, Part};
