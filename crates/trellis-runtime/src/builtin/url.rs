//! The `url` part: loader and handler.

use async_trait::async_trait;
use serde_json::{json, Value};
use trellis_plugin::{
    HandleContext, LoadContext, PartError, PartHandler, PartLoader, Shape,
};

const PART_TYPE: &str = "url";

/// Normalizes stored urls into the canonical `{url, text}` record.
///
/// A bare string becomes both the target and the link text; a record
/// must carry `url` and gets `text` defaulted to the target.
pub struct UrlPartLoader;

#[async_trait]
impl PartLoader for UrlPartLoader {
    fn part_type(&self) -> &str {
        PART_TYPE
    }

    async fn load(&self, cx: LoadContext<'_>) -> Result<(), PartError> {
        match &cx.part.payload {
            Value::String(url) => {
                cx.part.payload = json!({ "url": url, "text": url });
            }
            Value::Object(record) => {
                let Some(url) = record.get("url").and_then(Value::as_str) else {
                    return Err(PartError::invalid(cx.part_name, "missing 'url' field"));
                };
                if !record.contains_key("text") {
                    let mut record = record.clone();
                    record.insert("text".into(), json!(url));
                    cx.part.payload = Value::Object(record);
                }
            }
            _ => {
                return Err(PartError::invalid(
                    cx.part_name,
                    "expected a string or a {url, text} record",
                ));
            }
        }
        Ok(())
    }
}

/// Emits one `link` shape from the canonical record.
pub struct UrlPartHandler;

#[async_trait]
impl PartHandler for UrlPartHandler {
    fn part_type(&self) -> &str {
        PART_TYPE
    }

    async fn handle(&self, cx: HandleContext<'_>) -> Result<(), PartError> {
        let url = cx
            .part
            .field("url")
            .and_then(Value::as_str)
            .ok_or_else(|| PartError::invalid(cx.part_name, "part is not normalized"))?;
        let text = cx
            .part
            .field("text")
            .and_then(Value::as_str)
            .unwrap_or(url);

        let mut shape = Shape::new("link")
            .with_data("url", json!(url))
            .with_data("text", json!(text));
        shape.scratch.display_type = Some(cx.display_type.clone());
        cx.output.push_shape(shape);
        Ok(())
    }
}
