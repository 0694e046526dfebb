//! Identifier types for Trellis.
//!
//! Identity in the pipeline is logical, not physical: an [`ItemId`] is a
//! stable string identifier unique within a store namespace, optionally
//! carrying a `store-prefix:` qualifier for multi-store setups.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical identifier of a content item.
///
/// Ids are stable strings such as `"/about"` or `"/blog/2024/hello"`.
/// An id may be namespaced to a specific store with a composite
/// `store-prefix:local-id` form, e.g. `"archive:/about"`.
///
/// # Prefix Rules
///
/// The prefix is everything before the first `:` when that segment is
/// non-empty and contains no `/`. A `:` appearing after the first `/` is
/// part of the local id, not a prefix:
///
/// ```
/// use trellis_types::ItemId;
///
/// let plain = ItemId::new("/about");
/// assert_eq!(plain.store_prefix(), None);
/// assert_eq!(plain.local(), "/about");
///
/// let namespaced = ItemId::new("archive:/about");
/// assert_eq!(namespaced.store_prefix(), Some("archive"));
/// assert_eq!(namespaced.local(), "/about");
///
/// let odd = ItemId::new("/a:b");
/// assert_eq!(odd.store_prefix(), None);
/// ```
///
/// # Ordering
///
/// `ItemId` is `Ord` so item mappings keyed by id stay key-ordered, which
/// is the reference exchange representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates an id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a store-namespaced id from a prefix and a local id.
    ///
    /// ```
    /// use trellis_types::ItemId;
    ///
    /// let id = ItemId::with_prefix("archive", "/about");
    /// assert_eq!(id.as_str(), "archive:/about");
    /// ```
    #[must_use]
    pub fn with_prefix(prefix: &str, local: &str) -> Self {
        Self(format!("{prefix}:{local}"))
    }

    /// Returns the full id string, prefix included.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the store prefix, if the id carries one.
    #[must_use]
    pub fn store_prefix(&self) -> Option<&str> {
        let colon = self.0.find(':')?;
        let prefix = &self.0[..colon];
        if prefix.is_empty() || prefix.contains('/') {
            None
        } else {
            Some(prefix)
        }
    }

    /// Returns the local id with any store prefix stripped.
    #[must_use]
    pub fn local(&self) -> &str {
        match self.store_prefix() {
            Some(prefix) => &self.0[prefix.len() + 1..],
            None => &self.0,
        }
    }

    /// Returns `true` if this id is claimable by a store with the given
    /// prefix. Unprefixed ids are claimable by any store; prefixed ids
    /// only by the matching store.
    #[must_use]
    pub fn claimable_by(&self, store_prefix: Option<&str>) -> bool {
        match self.store_prefix() {
            Some(p) => store_prefix == Some(p),
            None => true,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Named rendering intent for a shape tree, e.g. `"main"` or `"summary"`.
///
/// The display type selects which handlers' output is relevant and which
/// template alternates are considered. The default is `"main"`, the full
/// page rendition.
///
/// ```
/// use trellis_types::DisplayType;
///
/// let main = DisplayType::default();
/// assert!(main.is_main());
/// assert_eq!(main.as_str(), "main");
///
/// let summary = DisplayType::new("summary");
/// assert!(!summary.is_main());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayType(String);

impl DisplayType {
    /// The default display type name.
    pub const MAIN: &'static str = "main";

    /// Creates a display type from any string-like value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The `"main"` display type (full rendition).
    #[must_use]
    pub fn main() -> Self {
        Self(Self::MAIN.to_string())
    }

    /// Returns the display type name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the `"main"` display type.
    #[must_use]
    pub fn is_main(&self) -> bool {
        self.0 == Self::MAIN
    }
}

impl Default for DisplayType {
    fn default() -> Self {
        Self::main()
    }
}

impl fmt::Display for DisplayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DisplayType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
