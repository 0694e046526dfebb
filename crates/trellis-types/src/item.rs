//! Content items and their typed parts.
//!
//! A [`ContentItem`] is the unit of storage and fetching: a key-ordered
//! mapping from part name to [`Part`], plus the identity fields that the
//! reference representation keeps in a `meta` record. Transient state
//! lives in [`ItemScratch`], an explicit side-channel that is never
//! serialized.

use crate::{DisplayType, ItemId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A typed fragment of a content item's data.
///
/// The part payload is an opaque JSON-shaped record owned by the item.
/// Its semantic type is the inline `kind` tag when present, otherwise it
/// is resolved through the item's content-type schema (see
/// [`resolve_part_type`](crate::resolve_part_type)). A part whose type
/// cannot be resolved either way is simply skipped by dispatch - that is
/// not an error.
///
/// # Example
///
/// ```
/// use trellis_types::Part;
/// use serde_json::json;
///
/// // Inline-typed part
/// let body = Part::new("text", json!({"text": "hello"}));
/// assert_eq!(body.kind.as_deref(), Some("text"));
///
/// // Schema-typed part (type comes from the ContentTypeDef)
/// let title = Part::untyped(json!("About us"));
/// assert_eq!(title.kind, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Inline part-type tag. Takes precedence over the schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// The part's data. Loaders normalize this in place.
    pub payload: Value,
}

impl Part {
    /// Creates a part with an inline type tag.
    #[must_use]
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: Some(kind.into()),
            payload,
        }
    }

    /// Creates a part without an inline type tag.
    ///
    /// The part's type, if any, is resolved through the content-type
    /// schema at dispatch time.
    #[must_use]
    pub fn untyped(payload: Value) -> Self {
        Self {
            kind: None,
            payload,
        }
    }

    /// Returns the payload as a string slice, if it is a JSON string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.payload.as_str()
    }

    /// Returns a field of the payload object, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.as_object().and_then(|o| o.get(name))
    }
}

/// Non-persisted scratch state for a content item.
///
/// The reference representation bolted transient data onto a `temp`
/// record inside the item; here it is an explicit struct skipped during
/// serialization, so persisted and transient state can never intermix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemScratch {
    /// Set once part-loader dispatch has normalized every part.
    /// Handlers may rely on this: normalization always precedes handling.
    pub loaded: bool,

    /// The display type the item was most recently expanded for.
    pub display_type: Option<DisplayType>,
}

/// A content item: identity plus a key-ordered mapping of named parts.
///
/// Items are created by a store on fetch, normalized by part loaders,
/// cached for the lifetime of the enclosing request scope, and discarded
/// when that scope ends.
///
/// # Example
///
/// ```
/// use trellis_types::{ContentItem, ItemId, Part};
/// use serde_json::json;
///
/// let item = ContentItem::new(ItemId::new("/about"), "page")
///     .with_part("title", Part::untyped(json!("About us")))
///     .with_part("body", Part::new("text", json!("Our story.")));
///
/// assert_eq!(item.content_type, "page");
/// assert_eq!(item.parts.len(), 2);
/// assert!(item.part("title").is_some());
/// assert!(item.part("missing").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Stable logical identifier, unique within a store namespace.
    pub id: ItemId,

    /// Name of the item's content type, used for schema lookup.
    pub content_type: String,

    /// Named parts, key-ordered.
    #[serde(default)]
    pub parts: BTreeMap<String, Part>,

    /// Transient per-operation state. Never serialized.
    #[serde(skip)]
    pub scratch: ItemScratch,
}

impl ContentItem {
    /// Creates an empty item of the given content type.
    #[must_use]
    pub fn new(id: ItemId, content_type: impl Into<String>) -> Self {
        Self {
            id,
            content_type: content_type.into(),
            parts: BTreeMap::new(),
            scratch: ItemScratch::default(),
        }
    }

    /// Adds a named part (builder style).
    #[must_use]
    pub fn with_part(mut self, name: impl Into<String>, part: Part) -> Self {
        self.parts.insert(name.into(), part);
        self
    }

    /// Returns a part by name.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.get(name)
    }

    /// Returns the part names in key order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_item() -> ContentItem {
        ContentItem::new(ItemId::new("/about"), "page")
            .with_part("title", Part::untyped(json!("About us")))
            .with_part("body", Part::new("text", json!({"text": "Our story."})))
    }

    #[test]
    fn part_accessors() {
        let item = sample_item();
        let title = item.part("title").expect("title part should exist");
        assert_eq!(title.as_str(), Some("About us"));

        let body = item.part("body").expect("body part should exist");
        assert_eq!(body.kind.as_deref(), Some("text"));
        assert_eq!(body.field("text"), Some(&json!("Our story.")));
    }

    #[test]
    fn parts_are_key_ordered() {
        let item = sample_item();
        let names: Vec<_> = item.part_names().collect();
        assert_eq!(names, vec!["body", "title"]);
    }

    #[test]
    fn scratch_is_not_serialized() {
        let mut item = sample_item();
        item.scratch.loaded = true;
        item.scratch.display_type = Some(DisplayType::main());

        let json = serde_json::to_value(&item).expect("item should serialize");
        assert!(json.get("scratch").is_none());

        let back: ContentItem =
            serde_json::from_value(json).expect("item should deserialize");
        assert!(!back.scratch.loaded);
        assert_eq!(back.scratch.display_type, None);
    }

    #[test]
    fn untyped_part_omits_kind() {
        let json = serde_json::to_value(Part::untyped(json!("x")))
            .expect("part should serialize");
        assert!(json.get("kind").is_none());
    }
}
