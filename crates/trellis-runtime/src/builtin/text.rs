//! The `text` part: loader and handler.

use async_trait::async_trait;
use serde_json::{json, Value};
use trellis_plugin::{
    HandleContext, LoadContext, PartError, PartHandler, PartLoader, Shape,
};

const PART_TYPE: &str = "text";
const DEFAULT_FLAVOR: &str = "plain";

/// Normalizes stored text into the canonical `{text, flavor}` record.
///
/// Accepted stored forms:
///
/// - a bare string: wrapped, flavor from the schema or `"plain"`
/// - a `{text, flavor?}` record: flavor filled in if missing
pub struct TextPartLoader;

#[async_trait]
impl PartLoader for TextPartLoader {
    fn part_type(&self) -> &str {
        PART_TYPE
    }

    async fn load(&self, cx: LoadContext<'_>) -> Result<(), PartError> {
        let flavor = cx.flavor.unwrap_or(DEFAULT_FLAVOR);
        match &cx.part.payload {
            Value::String(text) => {
                cx.part.payload = json!({ "text": text, "flavor": flavor });
            }
            Value::Object(record) => {
                if !record.contains_key("text") {
                    return Err(PartError::invalid(cx.part_name, "missing 'text' field"));
                }
                if !record.contains_key("flavor") {
                    let mut record = record.clone();
                    record.insert("flavor".into(), json!(flavor));
                    cx.part.payload = Value::Object(record);
                }
            }
            _ => {
                return Err(PartError::invalid(
                    cx.part_name,
                    "expected a string or a {text, flavor} record",
                ));
            }
        }
        Ok(())
    }
}

/// Emits one `text` shape from the canonical record.
///
/// The shape's alternates carry the flavor (`text-markdown` before
/// `text`), so themes can override per flavor.
pub struct TextPartHandler;

#[async_trait]
impl PartHandler for TextPartHandler {
    fn part_type(&self) -> &str {
        PART_TYPE
    }

    async fn handle(&self, cx: HandleContext<'_>) -> Result<(), PartError> {
        let text = cx
            .part
            .field("text")
            .and_then(Value::as_str)
            .ok_or_else(|| PartError::invalid(cx.part_name, "part is not normalized"))?;
        let flavor = cx
            .part
            .field("flavor")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_FLAVOR);

        let mut shape = Shape::new(PART_TYPE)
            .with_data("text", json!(text))
            .with_data("flavor", json!(flavor));
        shape.meta.alternates.push(format!("text-{flavor}"));
        shape.scratch.display_type = Some(cx.display_type.clone());
        cx.output.push_shape(shape);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_plugin::HandleOutput;
    use trellis_types::{ContentItem, DisplayType, ItemId, Part};

    async fn load(part: &mut Part, flavor: Option<&str>) -> Result<(), PartError> {
        let id = ItemId::new("/x");
        TextPartLoader
            .load(LoadContext {
                item_id: &id,
                content_type: "page",
                part_name: "body",
                part_type: PART_TYPE,
                flavor,
                part,
            })
            .await
    }

    #[tokio::test]
    async fn bare_string_is_wrapped() {
        let mut part = Part::new(PART_TYPE, json!("hello"));
        load(&mut part, Some("markdown"))
            .await
            .expect("text loader should accept a string");
        assert_eq!(
            part.payload,
            json!({"text": "hello", "flavor": "markdown"})
        );
    }

    #[tokio::test]
    async fn record_gets_default_flavor() {
        let mut part = Part::new(PART_TYPE, json!({"text": "hello"}));
        load(&mut part, None)
            .await
            .expect("text loader should accept a record");
        assert_eq!(part.field("flavor"), Some(&json!("plain")));
    }

    #[tokio::test]
    async fn non_text_payload_is_invalid() {
        let mut part = Part::new(PART_TYPE, json!(42));
        let err = load(&mut part, None)
            .await
            .expect_err("numbers are not text parts");

        use trellis_types::ErrorCode;
        assert_eq!(err.code(), "PART_INVALID_PAYLOAD");
    }

    #[tokio::test]
    async fn handler_reads_normalized_record() {
        let item = ContentItem::new(ItemId::new("/x"), "page");
        let part = Part::new(PART_TYPE, json!({"text": "hello", "flavor": "markdown"}));
        let display = DisplayType::main();
        let mut output = HandleOutput::default();

        TextPartHandler
            .handle(HandleContext {
                item: &item,
                part_name: "body",
                part_type: PART_TYPE,
                flavor: None,
                part: &part,
                display_type: &display,
                output: &mut output,
            })
            .await
            .expect("text handler should succeed");

        assert_eq!(output.shapes.len(), 1);
        let shape = &output.shapes[0];
        assert_eq!(shape.meta.shape_type, "text");
        assert_eq!(shape.meta.alternates, vec!["text-markdown"]);
        assert_eq!(shape.data["text"], json!("hello"));
    }
}
