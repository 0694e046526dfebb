//! The shape tree node.

use crate::{PromiseState, ShapeMeta, ShapeScratch};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use trellis_types::{ContentItem, DisplayType, ItemId};

/// Well-known shape type names used by the core pipeline.
pub mod shape_types {
    /// Deferred reference to a content item, expanded lazily.
    pub const ITEM_PROMISE: &str = "item-promise";
    /// Expanded content item shape.
    pub const CONTENT: &str = "content";
    /// Rendered when no store resolves an id.
    pub const NOT_FOUND: &str = "not-found";
    /// Root layout shape.
    pub const LAYOUT: &str = "layout";
}

/// One renderable unit of output plus placement metadata.
///
/// Shapes form a tree two ways: through named, ordered **zones** and
/// through the flat `items` list. Zones are created on demand; a zone
/// name is a dynamic slot, not a schema.
///
/// # Example
///
/// ```
/// use trellis_shape::Shape;
///
/// let mut layout = Shape::new("layout");
/// layout.zone_mut("main").push(Shape::new("text"));
///
/// assert_eq!(layout.zone("main").map(<[Shape]>::len), Some(1));
/// assert_eq!(layout.zone("footer"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Type, name, and template alternates.
    pub meta: ShapeMeta,

    /// Arbitrary display data handed to the view engine.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,

    /// Named ordered child slots.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub zones: BTreeMap<String, Vec<Shape>>,

    /// Flat children with no zone assignment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Shape>,

    /// Transient per-render state. Never serialized.
    #[serde(skip)]
    pub scratch: ShapeScratch,
}

impl Shape {
    /// Creates an empty shape of the given type.
    #[must_use]
    pub fn new(shape_type: impl Into<String>) -> Self {
        Self {
            meta: ShapeMeta::new(shape_type),
            data: Map::new(),
            zones: BTreeMap::new(),
            items: Vec::new(),
            scratch: ShapeScratch::default(),
        }
    }

    /// Creates an item-promise shape: a stand-in carrying only the item
    /// id and the desired display type, expanded lazily during the walk.
    #[must_use]
    pub fn item_promise(id: ItemId, display_type: DisplayType) -> Self {
        let mut shape = Self::new(shape_types::ITEM_PROMISE);
        shape
            .data
            .insert("id".into(), Value::String(id.as_str().to_string()));
        shape.scratch = ShapeScratch::promise(display_type);
        shape
    }

    /// Creates the dedicated not-found shape for an unresolvable id.
    #[must_use]
    pub fn not_found(id: &ItemId) -> Self {
        let mut shape = Self::new(shape_types::NOT_FOUND);
        shape
            .data
            .insert("id".into(), Value::String(id.as_str().to_string()));
        shape
            .data
            .insert("title".into(), Value::String("Not found".into()));
        shape
    }

    /// Sets a display-data field (builder style).
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Returns `true` if this shape is an unexpanded-or-expanding
    /// item promise.
    #[must_use]
    pub fn is_item_promise(&self) -> bool {
        self.meta.shape_type == shape_types::ITEM_PROMISE
    }

    /// Returns the promised item id, for item-promise shapes.
    #[must_use]
    pub fn promised_id(&self) -> Option<ItemId> {
        if !self.is_item_promise() {
            return None;
        }
        self.data
            .get("id")
            .and_then(Value::as_str)
            .map(ItemId::new)
    }

    // === Zones ===

    /// Returns a zone's shapes, or `None` if the zone does not exist.
    #[must_use]
    pub fn zone(&self, name: &str) -> Option<&[Shape]> {
        self.zones.get(name).map(Vec::as_slice)
    }

    /// Returns a mutable zone, creating it on demand.
    pub fn zone_mut(&mut self, name: &str) -> &mut Vec<Shape> {
        self.zones.entry(name.to_string()).or_default()
    }

    /// Total number of direct children across zones and items.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.zones.values().map(Vec::len).sum::<usize>() + self.items.len()
    }

    // === Lifecycle ===

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PromiseState {
        self.scratch.state
    }

    /// Attempts the `Unresolved -> Expanding` transition.
    ///
    /// Returns `false` if expansion already started, which makes
    /// re-walking a tree safe: a shape instance expands at most once.
    pub fn begin_expansion(&mut self) -> bool {
        if self.scratch.state.is_unresolved() {
            self.scratch.state = PromiseState::Expanding;
            true
        } else {
            false
        }
    }

    /// Marks produced shapes as distributed into zones.
    ///
    /// Only meaningful from `Expanding`; a no-op otherwise.
    pub fn mark_placed(&mut self) {
        if self.scratch.state == PromiseState::Expanding {
            self.scratch.state = PromiseState::Placed;
        }
    }

    /// Marks output emitted. Valid from any prior state: plain shapes
    /// never pass through `Expanding`/`Placed`.
    pub fn mark_rendered(&mut self) {
        self.scratch.state = PromiseState::Rendered;
    }

    // === Morphing ===

    /// Morphs this shape, in place, into the expanded content shape for
    /// an item.
    ///
    /// The shape's identity (its slot in the parent's zone) is preserved;
    /// only type, alternates, data, and the item back-reference change.
    /// Template alternates are derived most specific first:
    /// `content-<type>-<display>`, `content-<type>`, then the base
    /// `content` template.
    pub fn morph_into_content(&mut self, item: Arc<ContentItem>, display_type: &DisplayType) {
        let content_type = item.content_type.clone();
        self.meta = ShapeMeta::new(shape_types::CONTENT)
            .with_alternate(format!("content-{content_type}-{display_type}"))
            .with_alternate(format!("content-{content_type}"));
        self.data
            .insert("id".into(), Value::String(item.id.as_str().to_string()));
        self.scratch.display_type = Some(display_type.clone());
        self.scratch.item = Some(item);
    }

    /// Morphs this shape, in place, into the not-found shape.
    pub fn morph_into_not_found(&mut self, id: &ItemId) {
        self.meta = ShapeMeta::new(shape_types::NOT_FOUND);
        self.data
            .insert("id".into(), Value::String(id.as_str().to_string()));
        self.data
            .insert("title".into(), Value::String("Not found".into()));
        self.scratch.item = None;
    }
}
