//! The ordered rule chain and routing algorithm.

use crate::{PlacementRule, Position};
use trellis_shape::{Shape, ShapeSelector};
use trellis_types::DisplayType;

/// Ordered chain of placement rules plus the routing algorithm.
///
/// Rules are tested in registration order; the first match places the
/// shape. Routing consumes the pending list and partitions it into
/// placed shapes (inserted into the ambient shape's zones) and an
/// unplaced remainder returned to the caller, so no index arithmetic
/// happens on a list being iterated.
///
/// # Default Policy
///
/// An empty set is not a black hole: with no custom rules registered,
/// shapes carrying display type `main` are placed into the zone named
/// `main` (append). Registering any rule replaces that policy entirely.
pub struct PlacementSet {
    rules: Vec<PlacementRule>,
}

impl PlacementSet {
    /// Creates an empty set (default policy active).
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Registers a rule at the end of the chain.
    pub fn register(&mut self, rule: PlacementRule) {
        if self.rules.iter().any(|r| r.id == rule.id) {
            tracing::warn!(rule_id = %rule.id, "duplicate placement rule id, replacing");
            self.unregister(&rule.id);
        }
        self.rules.push(rule);
    }

    /// Removes a rule by id. Returns `true` if found.
    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.id != id);
        self.rules.len() < before
    }

    /// Enables or disables a rule by id.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) {
        if let Some(rule) = self.rules.iter_mut().find(|r| r.id == id) {
            rule.enabled = enabled;
        }
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no custom rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the first enabled rule matching the shape, in
    /// registration order.
    #[must_use]
    pub fn first_match(&self, shape: &Shape) -> Option<&PlacementRule> {
        self.rules.iter().find(|r| r.matches(shape))
    }

    /// Routes pending shapes into the ambient shape's zones.
    ///
    /// Returns the unplaced remainder, in original order; the caller
    /// keeps those attached to the producing parent. Routing an empty
    /// pending list is a no-op, so re-running placement on an
    /// already-placed expansion does nothing.
    pub fn route(&self, ambient: &mut Shape, pending: Vec<Shape>) -> Vec<Shape> {
        if pending.is_empty() {
            return pending;
        }

        let default_rule = self.is_empty().then(default_main_rule);

        let mut unplaced = Vec::new();
        for shape in pending {
            let rule = self
                .first_match(&shape)
                .or_else(|| default_rule.as_ref().filter(|r| r.matches(&shape)));

            match rule {
                Some(rule) => {
                    tracing::debug!(
                        shape_type = %shape.meta.shape_type,
                        zone = %rule.zone,
                        rule_id = %rule.id,
                        "placing shape"
                    );
                    rule.position.insert(ambient.zone_mut(&rule.zone), shape);
                }
                None => unplaced.push(shape),
            }
        }
        unplaced
    }
}

impl Default for PlacementSet {
    fn default() -> Self {
        Self::new()
    }
}

/// The builtin policy used when no custom rules exist: display type
/// `main` goes to zone `main`, appended.
fn default_main_rule() -> PlacementRule {
    PlacementRule::new(
        "default-main",
        "main",
        ShapeSelector {
            shape_type: trellis_shape::SelectorSegment::Wildcard,
            display_type: Some(trellis_shape::SelectorSegment::Exact(
                DisplayType::MAIN.to_string(),
            )),
        },
    )
    .with_position(Position::After)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_types::ItemId;

    fn main_shape(shape_type: &str) -> Shape {
        let mut shape = Shape::new(shape_type);
        shape.scratch.display_type = Some(DisplayType::main());
        shape
    }

    fn zone_types<'a>(ambient: &'a Shape, zone: &str) -> Vec<&'a str> {
        ambient
            .zone(zone)
            .map(|shapes| shapes.iter().map(|s| s.meta.shape_type.as_str()).collect())
            .unwrap_or_default()
    }

    // ── Default policy ───────────────────────────────────────

    #[test]
    fn default_policy_routes_main_display_type() {
        let set = PlacementSet::new();
        let mut ambient = Shape::new("layout");

        let unplaced = set.route(&mut ambient, vec![main_shape("text"), Shape::new("aside")]);

        assert_eq!(zone_types(&ambient, "main"), vec!["text"]);
        // No display type: default policy does not claim it.
        assert_eq!(unplaced.len(), 1);
        assert_eq!(unplaced[0].meta.shape_type, "aside");
    }

    #[test]
    fn custom_rules_replace_default_policy() {
        let mut set = PlacementSet::new();
        set.register(PlacementRule::new(
            "titles",
            "header",
            ShapeSelector::parse("title").expect("selector should parse"),
        ));

        let mut ambient = Shape::new("layout");
        // A main-display shape no longer matches anything.
        let unplaced = set.route(&mut ambient, vec![main_shape("text")]);
        assert_eq!(unplaced.len(), 1);
        assert_eq!(ambient.zone("main"), None);
    }

    // ── Ordering ─────────────────────────────────────────────

    #[test]
    fn first_match_in_registration_order() {
        let mut set = PlacementSet::new();
        set.register(PlacementRule::new(
            "everything-main",
            "main",
            ShapeSelector::any(),
        ));
        set.register(PlacementRule::new(
            "titles-header",
            "header",
            ShapeSelector::parse("title").expect("selector should parse"),
        ));

        let mut ambient = Shape::new("layout");
        set.route(&mut ambient, vec![Shape::new("title")]);

        // The earlier catch-all wins over the later specific rule.
        assert_eq!(zone_types(&ambient, "main"), vec!["title"]);
        assert_eq!(ambient.zone("header"), None);
    }

    #[test]
    fn append_order_preserved_across_rules() {
        // Two rules targeting the same zone, both appending: arrival
        // order of [S1, S2] must survive.
        let mut set = PlacementSet::new();
        set.register(
            PlacementRule::new(
                "r1",
                "main",
                ShapeSelector::parse("s1").expect("selector should parse"),
            )
            .with_position(Position::After),
        );
        set.register(
            PlacementRule::new(
                "r2",
                "main",
                ShapeSelector::parse("s2").expect("selector should parse"),
            )
            .with_position(Position::After),
        );

        let mut ambient = Shape::new("layout");
        ambient.zone_mut("main").push(Shape::new("existing"));

        set.route(&mut ambient, vec![Shape::new("s1"), Shape::new("s2")]);
        assert_eq!(zone_types(&ambient, "main"), vec!["existing", "s1", "s2"]);
    }

    #[test]
    fn first_position_prepends() {
        let mut set = PlacementSet::new();
        set.register(
            PlacementRule::new("r", "main", ShapeSelector::any())
                .with_position(Position::First),
        );

        let mut ambient = Shape::new("layout");
        ambient.zone_mut("main").push(Shape::new("existing"));

        set.route(&mut ambient, vec![Shape::new("new")]);
        assert_eq!(zone_types(&ambient, "main"), vec!["new", "existing"]);
    }

    // ── Idempotence / registry ops ───────────────────────────

    #[test]
    fn empty_pending_is_a_noop() {
        let set = PlacementSet::new();
        let mut ambient = Shape::new("layout");
        ambient.zone_mut("main").push(main_shape("text"));

        let unplaced = set.route(&mut ambient, Vec::new());
        assert!(unplaced.is_empty());
        assert_eq!(zone_types(&ambient, "main"), vec!["text"]);
    }

    #[test]
    fn disabled_rule_is_skipped() {
        let mut set = PlacementSet::new();
        set.register(PlacementRule::new("r", "main", ShapeSelector::any()));
        set.set_enabled("r", false);

        let mut ambient = Shape::new("layout");
        let unplaced = set.route(&mut ambient, vec![Shape::new("text")]);
        assert_eq!(unplaced.len(), 1);
    }

    #[test]
    fn unregister_by_id() {
        let mut set = PlacementSet::new();
        set.register(PlacementRule::new("r", "main", ShapeSelector::any()));
        assert_eq!(set.len(), 1);

        assert!(set.unregister("r"));
        assert!(set.is_empty());
        assert!(!set.unregister("r"));
    }

    #[test]
    fn duplicate_id_replaces() {
        let mut set = PlacementSet::new();
        set.register(PlacementRule::new("r", "main", ShapeSelector::any()));
        set.register(PlacementRule::new("r", "header", ShapeSelector::any()));

        assert_eq!(set.len(), 1);
        let mut ambient = Shape::new("layout");
        set.route(&mut ambient, vec![Shape::new("text")]);
        assert!(ambient.zone("header").is_some());
    }
}
