//! Shape selector pattern matching.
//!
//! Selectors address shapes by metadata when routing and hooking:
//!
//! ```text
//! selector := <type> [ "@" <display-type> ]
//! ```
//!
//! Each segment is either an exact string or the `*` wildcard. The type
//! segment matches `meta.shape_type`; the optional display segment
//! matches the shape's scratch display type.

use crate::Shape;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use trellis_types::ErrorCode;

/// Selector parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The selector string does not follow the grammar.
    #[error("invalid selector: {0}")]
    Invalid(String),
}

impl ErrorCode for SelectorError {
    fn code(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "SELECTOR_INVALID",
        }
    }

    fn is_recoverable(&self) -> bool {
        // A malformed selector stays malformed.
        false
    }
}

/// A single segment in a selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectorSegment {
    /// Matches exactly the given string.
    Exact(String),
    /// Matches any string.
    Wildcard,
}

impl SelectorSegment {
    /// Returns `true` if this segment matches the given value.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Exact(s) => s == value,
            Self::Wildcard => true,
        }
    }
}

impl fmt::Display for SelectorSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(s) => f.write_str(s),
            Self::Wildcard => f.write_str("*"),
        }
    }
}

/// A parsed shape selector.
///
/// # Examples
///
/// ```text
/// "text"              → shape_type=Exact("text")
/// "*"                 → shape_type=Wildcard
/// "item-promise@main" → + display_type=Exact("main")
/// "*@main"            → any shape rendered for "main"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeSelector {
    /// Shape type segment.
    pub shape_type: SelectorSegment,
    /// Optional display-type filter.
    pub display_type: Option<SelectorSegment>,
}

impl ShapeSelector {
    /// The match-everything selector.
    #[must_use]
    pub fn any() -> Self {
        Self {
            shape_type: SelectorSegment::Wildcard,
            display_type: None,
        }
    }

    /// Parses a selector string.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Invalid`] for empty strings or empty
    /// segments.
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        if selector.is_empty() {
            return Err(SelectorError::Invalid("empty selector".into()));
        }

        let (type_str, display) = match selector.find('@') {
            Some(at) => {
                let display = &selector[at + 1..];
                if display.is_empty() {
                    return Err(SelectorError::Invalid(
                        "empty display-type segment".into(),
                    ));
                }
                (&selector[..at], Some(parse_segment(display)))
            }
            None => (selector, None),
        };

        if type_str.is_empty() {
            return Err(SelectorError::Invalid("empty type segment".into()));
        }

        Ok(Self {
            shape_type: parse_segment(type_str),
            display_type: display,
        })
    }

    /// Returns `true` if this selector matches the given shape.
    ///
    /// A display-type filter only matches shapes that carry a scratch
    /// display type; a wildcard display filter still requires one to be
    /// present.
    #[must_use]
    pub fn matches(&self, shape: &Shape) -> bool {
        if !self.shape_type.matches(&shape.meta.shape_type) {
            return false;
        }
        match (&self.display_type, &shape.scratch.display_type) {
            (Some(pattern), Some(dt)) => pattern.matches(dt.as_str()),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

impl fmt::Display for ShapeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.shape_type)?;
        if let Some(ref display) = self.display_type {
            write!(f, "@{display}")?;
        }
        Ok(())
    }
}

/// Parses a single segment: `"*"` is the wildcard, anything else exact.
fn parse_segment(s: &str) -> SelectorSegment {
    if s == "*" {
        SelectorSegment::Wildcard
    } else {
        SelectorSegment::Exact(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_types::{assert_error_codes, DisplayType, ItemId};

    fn promise(display: &str) -> Shape {
        Shape::item_promise(ItemId::new("/x"), DisplayType::new(display))
    }

    // ── Parsing ──────────────────────────────────────────────

    #[test]
    fn parse_bare_type() {
        let sel = ShapeSelector::parse("text").expect("'text' should parse");
        assert_eq!(sel.shape_type, SelectorSegment::Exact("text".into()));
        assert_eq!(sel.display_type, None);
    }

    #[test]
    fn parse_with_display() {
        let sel = ShapeSelector::parse("item-promise@main")
            .expect("'item-promise@main' should parse");
        assert_eq!(sel.display_type, Some(SelectorSegment::Exact("main".into())));
    }

    #[test]
    fn parse_wildcards() {
        let sel = ShapeSelector::parse("*@*").expect("'*@*' should parse");
        assert_eq!(sel.shape_type, SelectorSegment::Wildcard);
        assert_eq!(sel.display_type, Some(SelectorSegment::Wildcard));
    }

    #[test]
    fn parse_errors() {
        assert!(ShapeSelector::parse("").is_err());
        assert!(ShapeSelector::parse("@main").is_err());
        assert!(ShapeSelector::parse("text@").is_err());
    }

    // ── Matching ─────────────────────────────────────────────

    #[test]
    fn match_type_only() {
        let sel = ShapeSelector::parse("item-promise").expect("selector should parse");
        assert!(sel.matches(&promise("main")));
        assert!(!sel.matches(&Shape::new("text")));
    }

    #[test]
    fn match_display_filter() {
        let sel = ShapeSelector::parse("*@main").expect("selector should parse");
        assert!(sel.matches(&promise("main")));
        assert!(!sel.matches(&promise("summary")));

        // No display type on the shape: display filter cannot match.
        assert!(!sel.matches(&Shape::new("text")));
    }

    #[test]
    fn match_any() {
        let sel = ShapeSelector::any();
        assert!(sel.matches(&promise("main")));
        assert!(sel.matches(&Shape::new("anything")));
    }

    // ── Display / serde ──────────────────────────────────────

    #[test]
    fn display_roundtrip() {
        for s in ["text", "*", "item-promise@main", "*@*"] {
            let sel = ShapeSelector::parse(s).expect("selector should parse");
            assert_eq!(sel.to_string(), s, "display roundtrip failed for {s}");
        }
    }

    #[test]
    fn serde_roundtrip() {
        let sel = ShapeSelector::parse("content@summary").expect("selector should parse");
        let json = serde_json::to_string(&sel).expect("selector should serialize");
        let back: ShapeSelector =
            serde_json::from_str(&json).expect("selector should deserialize");
        assert_eq!(back, sel);
    }

    #[test]
    fn error_codes() {
        assert_error_codes(&[SelectorError::Invalid("x".into())], "SELECTOR_");
    }
}
