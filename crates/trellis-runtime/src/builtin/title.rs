//! The `title` part: handler only.
//!
//! Title parts are stored plain (a bare string or `{text}` record) and
//! need no normalization, so the type is handleable but not loadable.

use async_trait::async_trait;
use serde_json::{json, Value};
use trellis_plugin::{HandleContext, PartError, PartHandler, Shape};

const PART_TYPE: &str = "title";

/// Sets the render stream's page title and emits a `title` shape.
pub struct TitlePartHandler;

#[async_trait]
impl PartHandler for TitlePartHandler {
    fn part_type(&self) -> &str {
        PART_TYPE
    }

    async fn handle(&self, cx: HandleContext<'_>) -> Result<(), PartError> {
        let title = match &cx.part.payload {
            Value::String(s) => s.as_str(),
            Value::Object(record) => record
                .get("text")
                .and_then(Value::as_str)
                .ok_or_else(|| PartError::invalid(cx.part_name, "missing 'text' field"))?,
            _ => {
                return Err(PartError::invalid(
                    cx.part_name,
                    "expected a string or a {text} record",
                ));
            }
        };

        cx.output.set_page_title(title);

        let mut shape = Shape::new(PART_TYPE).with_data("title", json!(title));
        shape.scratch.display_type = Some(cx.display_type.clone());
        cx.output.push_shape(shape);
        Ok(())
    }
}
