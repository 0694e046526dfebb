//! Part handlers: shape production during render.

use crate::PartError;
use async_trait::async_trait;
use trellis_shape::Shape;
use trellis_types::{ContentItem, DisplayType, Part};

/// What one part handler produced.
///
/// Each handler writes into its own output; the dispatcher merges
/// sibling outputs according to the configured ordering policy, so a
/// handler never observes (or races with) its siblings.
#[derive(Debug, Default)]
pub struct HandleOutput {
    /// Shapes produced by the handler, in push order.
    pub shapes: Vec<Shape>,
    /// Page title requested by the handler, if any.
    pub page_title: Option<String>,
}

impl HandleOutput {
    /// Appends a produced shape.
    pub fn push_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Sets the page title for the enclosing render stream.
    pub fn set_page_title(&mut self, title: impl Into<String>) {
        self.page_title = Some(title.into());
    }

    /// Merges another output into this one. Shapes append; a later
    /// title wins.
    pub fn merge(&mut self, other: HandleOutput) {
        self.shapes.extend(other.shapes);
        if other.page_title.is_some() {
            self.page_title = other.page_title;
        }
    }
}

/// Context threaded through one part-handler call.
#[derive(Debug)]
pub struct HandleContext<'a> {
    /// The item being rendered. Already normalized by loaders.
    pub item: &'a ContentItem,
    /// Name of the part being handled.
    pub part_name: &'a str,
    /// Resolved semantic type of the part.
    pub part_type: &'a str,
    /// Flavor hint from the content-type schema, if any.
    pub flavor: Option<&'a str>,
    /// The part, read-only: handlers consume normalized payloads.
    pub part: &'a Part,
    /// Display type the item is being rendered for.
    pub display_type: &'a DisplayType,
    /// The handler's own output buffer.
    pub output: &'a mut HandleOutput,
}

/// Expands one part type into zero or more display shapes during render.
///
/// Handlers for one item run as independent concurrent futures with
/// all-or-first-error join semantics. Producing no shapes is valid: a
/// handler may exist only for side effects such as setting the page
/// title.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use serde_json::json;
/// use trellis_plugin::{HandleContext, PartError, PartHandler, Shape};
///
/// struct BadgeHandler;
///
/// #[async_trait]
/// impl PartHandler for BadgeHandler {
///     fn part_type(&self) -> &str {
///         "badge"
///     }
///
///     async fn handle(&self, cx: HandleContext<'_>) -> Result<(), PartError> {
///         let label = cx.part.field("label").and_then(|v| v.as_str())
///             .ok_or_else(|| PartError::invalid(cx.part_name, "missing label"))?;
///         cx.output.push_shape(
///             Shape::new("badge").with_data("label", json!(label)),
///         );
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait PartHandler: Send + Sync {
    /// The part type this handler is registered for.
    fn part_type(&self) -> &str;

    /// Produces shapes for the part.
    ///
    /// # Errors
    ///
    /// A returned error aborts the enclosing item's handler fan-in.
    async fn handle(&self, cx: HandleContext<'_>) -> Result<(), PartError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_appends_shapes_in_order() {
        let mut a = HandleOutput::default();
        a.push_shape(Shape::new("s1"));

        let mut b = HandleOutput::default();
        b.push_shape(Shape::new("s2"));
        b.push_shape(Shape::new("s3"));

        a.merge(b);
        let types: Vec<_> = a.shapes.iter().map(|s| s.meta.shape_type.as_str()).collect();
        assert_eq!(types, vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn merge_later_title_wins() {
        let mut a = HandleOutput::default();
        a.set_page_title("First");

        let mut b = HandleOutput::default();
        b.set_page_title("Second");

        a.merge(b);
        assert_eq!(a.page_title.as_deref(), Some("Second"));
    }

    #[test]
    fn merge_without_title_keeps_existing() {
        let mut a = HandleOutput::default();
        a.set_page_title("Kept");

        a.merge(HandleOutput::default());
        assert_eq!(a.page_title.as_deref(), Some("Kept"));
    }
}
