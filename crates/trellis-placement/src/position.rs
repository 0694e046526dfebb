//! Zone insertion positions.

use serde::{Deserialize, Serialize};
use trellis_shape::Shape;

/// Where in a zone's ordered sequence a placed shape lands.
///
/// | Position | Effect |
/// |----------|--------|
/// | `First` | insert at the front |
/// | `Before` | insert ahead of existing content (front) |
/// | `After` | append behind existing content (end) |
/// | `Last` | append at the end |
///
/// `After` is the default: repeated placements into one zone preserve
/// their arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Insert at index 0.
    First,
    /// Insert ahead of existing content.
    Before,
    /// Append behind existing content.
    #[default]
    After,
    /// Append at the end.
    Last,
}

impl Position {
    /// Inserts a shape into a zone at this position.
    pub fn insert(self, zone: &mut Vec<Shape>, shape: Shape) {
        match self {
            Self::First | Self::Before => zone.insert(0, shape),
            Self::After | Self::Last => zone.push(shape),
        }
    }
}
