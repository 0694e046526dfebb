//! Placement rules.

use crate::Position;
use serde::{Deserialize, Serialize};
use trellis_shape::{Shape, ShapeSelector};

/// A predicate + target-zone + position triple governing where a
/// produced shape is inserted.
///
/// Rules are declarative and serializable, so placement policy can ship
/// in configuration as well as code.
///
/// # Example
///
/// ```
/// use trellis_placement::{PlacementRule, Position};
/// use trellis_shape::{Shape, ShapeSelector};
///
/// let rule = PlacementRule::new(
///     "titles-up-top",
///     "header",
///     ShapeSelector::parse("title").expect("static selector is valid"),
/// )
/// .with_position(Position::First);
///
/// assert!(rule.matches(&Shape::new("title")));
/// assert!(!rule.matches(&Shape::new("text")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRule {
    /// Stable rule id, for unregistration and logging.
    pub id: String,

    /// Target zone name on the ambient shape.
    pub zone: String,

    /// Where in the zone's sequence the shape lands.
    #[serde(default)]
    pub position: Position,

    /// Predicate over the shape's metadata.
    pub selector: ShapeSelector,

    /// Disabled rules are skipped during routing.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl PlacementRule {
    /// Creates an enabled rule with the default (`After`) position.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        zone: impl Into<String>,
        selector: ShapeSelector,
    ) -> Self {
        Self {
            id: id.into(),
            zone: zone.into(),
            position: Position::default(),
            selector,
            enabled: true,
        }
    }

    /// Sets the position (builder style).
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Returns `true` if this rule applies to the given shape.
    #[must_use]
    pub fn matches(&self, shape: &Shape) -> bool {
        self.enabled && self.selector.matches(shape)
    }
}
