//! Content-type schemas.
//!
//! A [`ContentTypeDef`] names a content type and maps part names to
//! part-type descriptors. Schemas are read-only reference data registered
//! at startup and looked up by an item's `content_type` name.

use crate::Part;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Part-type descriptor inside a content-type schema.
///
/// ```
/// use trellis_types::PartDef;
///
/// let def: PartDef = serde_json::from_str(r#"{"type": "text", "flavor": "markdown"}"#)
///     .expect("part def should deserialize");
/// assert_eq!(def.part_type, "text");
/// assert_eq!(def.flavor.as_deref(), Some("markdown"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartDef {
    /// The semantic part type, e.g. `"text"`, `"date"`, `"url"`.
    #[serde(rename = "type")]
    pub part_type: String,

    /// Optional rendering flavor hint, e.g. `"markdown"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
}

impl PartDef {
    /// Creates a descriptor for the given part type.
    #[must_use]
    pub fn new(part_type: impl Into<String>) -> Self {
        Self {
            part_type: part_type.into(),
            flavor: None,
        }
    }

    /// Sets the flavor hint (builder style).
    #[must_use]
    pub fn with_flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = Some(flavor.into());
        self
    }
}

/// Named schema mapping part names to part-type descriptors.
///
/// # Example
///
/// ```
/// use trellis_types::{ContentTypeDef, PartDef};
///
/// let page = ContentTypeDef::new("page")
///     .with_part("title", PartDef::new("title"))
///     .with_part("body", PartDef::new("text").with_flavor("markdown"));
///
/// assert_eq!(page.part_def("title").map(|d| d.part_type.as_str()), Some("title"));
/// assert_eq!(page.part_def("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeDef {
    /// The content type name items refer to via `content_type`.
    pub name: String,

    /// Part-name to descriptor mapping, key-ordered.
    #[serde(default)]
    pub parts: BTreeMap<String, PartDef>,
}

impl ContentTypeDef {
    /// Creates an empty schema with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: BTreeMap::new(),
        }
    }

    /// Adds a part descriptor (builder style).
    #[must_use]
    pub fn with_part(mut self, part_name: impl Into<String>, def: PartDef) -> Self {
        self.parts.insert(part_name.into(), def);
        self
    }

    /// Returns the descriptor for a part name.
    #[must_use]
    pub fn part_def(&self, part_name: &str) -> Option<&PartDef> {
        self.parts.get(part_name)
    }
}

/// Resolves a part's semantic type.
///
/// The inline `kind` tag on the part wins; otherwise the content-type
/// schema is consulted by part name. Returns `None` when neither source
/// declares a type - such parts are skipped by dispatch, never errors.
///
/// # Example
///
/// ```
/// use trellis_types::{resolve_part_type, ContentTypeDef, Part, PartDef};
/// use serde_json::json;
///
/// let schema = ContentTypeDef::new("page").with_part("title", PartDef::new("title"));
///
/// // Inline kind wins over the schema.
/// let inline = Part::new("text", json!("x"));
/// assert_eq!(resolve_part_type(&inline, "title", Some(&schema)), Some("text"));
///
/// // Schema fallback.
/// let untyped = Part::untyped(json!("x"));
/// assert_eq!(resolve_part_type(&untyped, "title", Some(&schema)), Some("title"));
///
/// // Unresolvable: no inline kind, no schema entry.
/// assert_eq!(resolve_part_type(&untyped, "extra", Some(&schema)), None);
/// assert_eq!(resolve_part_type(&untyped, "title", None), None);
/// ```
#[must_use]
pub fn resolve_part_type<'a>(
    part: &'a Part,
    part_name: &str,
    schema: Option<&'a ContentTypeDef>,
) -> Option<&'a str> {
    if let Some(kind) = part.kind.as_deref() {
        return Some(kind);
    }
    schema
        .and_then(|s| s.part_def(part_name))
        .map(|d| d.part_type.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inline_kind_wins_over_schema() {
        let schema = ContentTypeDef::new("page").with_part("body", PartDef::new("text"));
        let part = Part::new("html", json!("<p>x</p>"));
        assert_eq!(resolve_part_type(&part, "body", Some(&schema)), Some("html"));
    }

    #[test]
    fn schema_resolves_untyped_part() {
        let schema = ContentTypeDef::new("page")
            .with_part("date", PartDef::new("date"));
        let part = Part::untyped(json!("2024-03-01"));
        assert_eq!(resolve_part_type(&part, "date", Some(&schema)), Some("date"));
    }

    #[test]
    fn unresolvable_part_is_none() {
        let part = Part::untyped(json!("x"));
        assert_eq!(resolve_part_type(&part, "anything", None), None);

        let schema = ContentTypeDef::new("page");
        assert_eq!(resolve_part_type(&part, "anything", Some(&schema)), None);
    }

    #[test]
    fn schema_serde_roundtrip() {
        let schema = ContentTypeDef::new("page")
            .with_part("body", PartDef::new("text").with_flavor("markdown"));

        let json = serde_json::to_string(&schema).expect("schema should serialize");
        let back: ContentTypeDef =
            serde_json::from_str(&json).expect("schema should deserialize");
        assert_eq!(back, schema);
    }

    #[test]
    fn part_def_type_field_renamed() {
        let json = serde_json::to_value(PartDef::new("date"))
            .expect("part def should serialize");
        assert_eq!(json, json!({"type": "date"}));
    }
}
