//! Shape metadata.

use serde::{Deserialize, Serialize};

/// Metadata attached to every shape.
///
/// `alternates` is the ordered list of template-name overrides, most
/// specific first; a view engine tries each alternate before falling back
/// to the base `shape_type` template.
///
/// # Example
///
/// ```
/// use trellis_shape::ShapeMeta;
///
/// let meta = ShapeMeta::new("content")
///     .with_alternate("content-page-main")
///     .with_alternate("content-page");
///
/// // Most specific first.
/// assert_eq!(meta.alternates, vec!["content-page-main", "content-page"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeMeta {
    /// The shape's type, e.g. `"content"`, `"text"`, `"item-promise"`.
    #[serde(rename = "type")]
    pub shape_type: String,

    /// Optional instance name for disambiguation in templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Template-name overrides, most specific first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<String>,
}

impl ShapeMeta {
    /// Creates metadata for the given shape type.
    #[must_use]
    pub fn new(shape_type: impl Into<String>) -> Self {
        Self {
            shape_type: shape_type.into(),
            name: None,
            alternates: Vec::new(),
        }
    }

    /// Sets the instance name (builder style).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a template alternate (builder style).
    ///
    /// Call in most-specific-first order.
    #[must_use]
    pub fn with_alternate(mut self, alternate: impl Into<String>) -> Self {
        self.alternates.push(alternate.into());
        self
    }

    /// Returns template candidates in lookup order: alternates first
    /// (most specific to least), then the base shape type.
    pub fn template_candidates(&self) -> impl Iterator<Item = &str> {
        self.alternates
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.shape_type.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_candidates_order() {
        let meta = ShapeMeta::new("content")
            .with_alternate("content-page-main")
            .with_alternate("content-page");

        let candidates: Vec<_> = meta.template_candidates().collect();
        assert_eq!(
            candidates,
            vec!["content-page-main", "content-page", "content"]
        );
    }

    #[test]
    fn bare_meta_has_single_candidate() {
        let meta = ShapeMeta::new("title");
        let candidates: Vec<_> = meta.template_candidates().collect();
        assert_eq!(candidates, vec!["title"]);
    }

    #[test]
    fn serde_shape_type_renamed() {
        let json = serde_json::to_value(ShapeMeta::new("text"))
            .expect("meta should serialize");
        assert_eq!(json["type"], "text");
        assert!(json.get("alternates").is_none());
    }
}
