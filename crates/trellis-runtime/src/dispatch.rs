//! Part loader and handler dispatch.
//!
//! Both dispatchers share the enumeration algorithm: walk the item's
//! parts in key order, resolve each part's type (inline `kind` first,
//! content-type schema second), and look the plugin up in the typed
//! registry. Parts with no resolvable type or no registered plugin are
//! skipped silently.
//!
//! Fan-out is a structured join: every sibling part runs as an
//! independent future, and the dispatch completes once all siblings
//! finished or the first one failed.

use crate::{HandlerOrdering, PluginRegistry};
use futures::future;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use trellis_plugin::{HandleContext, HandleOutput, LoadContext, PartError};
use trellis_types::{resolve_part_type, ContentItem, DisplayType};

/// Normalizes every loadable part of a freshly fetched item, in place.
///
/// Runs all loaders for the item concurrently; the item counts as
/// loaded only when every loader completed. On the first loader error
/// the join aborts and the error propagates: the caller discards the
/// item, so partially normalized parts are never observable.
pub(crate) async fn load_parts(
    registry: &PluginRegistry,
    item: &mut ContentItem,
) -> Result<(), PartError> {
    let schema = registry.content_type(&item.content_type);
    let item_id = item.id.clone();
    let content_type = item.content_type.clone();

    let parts = std::mem::take(&mut item.parts);
    let mut untouched = Vec::new();
    let mut jobs = Vec::new();

    for (name, part) in parts {
        let Some(part_type) = resolve_part_type(&part, &name, schema).map(str::to_string)
        else {
            tracing::trace!(part = %name, "part type unresolved, skipping load");
            untouched.push((name, part));
            continue;
        };

        let Some(loader) = registry.loader_for(&part_type) else {
            tracing::trace!(part = %name, %part_type, "no loader registered, skipping");
            untouched.push((name, part));
            continue;
        };

        let flavor = schema
            .and_then(|s| s.part_def(&name))
            .and_then(|d| d.flavor.clone());
        let item_id = item_id.clone();
        let content_type = content_type.clone();

        jobs.push(async move {
            let mut part = part;
            loader
                .load(LoadContext {
                    item_id: &item_id,
                    content_type: &content_type,
                    part_name: &name,
                    part_type: &part_type,
                    flavor: flavor.as_deref(),
                    part: &mut part,
                })
                .await?;
            Ok::<_, PartError>((name, part))
        });
    }

    let loaded = future::try_join_all(jobs).await?;
    item.parts = untouched.into_iter().chain(loaded).collect();
    item.scratch.loaded = true;
    Ok(())
}

/// Expands an item's handleable parts into display shapes.
///
/// Every handler writes into its own [`HandleOutput`]; sibling outputs
/// are merged according to `ordering`:
///
/// - [`HandlerOrdering::CallOrder`]: outputs merge in fan-out call order
///   (part-name order), regardless of completion timing.
/// - [`HandlerOrdering::CompletionOrder`]: outputs merge as handlers
///   complete; relative order is then unspecified.
pub(crate) async fn handle_parts(
    registry: &PluginRegistry,
    item: &Arc<ContentItem>,
    display_type: &DisplayType,
    ordering: HandlerOrdering,
) -> Result<HandleOutput, PartError> {
    debug_assert!(
        item.scratch.loaded || item.parts.is_empty(),
        "handler dispatch requires loader-normalized items"
    );

    let schema = registry.content_type(&item.content_type);
    let mut jobs = Vec::new();

    for (name, part) in &item.parts {
        let Some(part_type) = resolve_part_type(part, name, schema).map(str::to_string)
        else {
            tracing::trace!(part = %name, "part type unresolved, skipping handle");
            continue;
        };

        let Some(handler) = registry.handler_for(&part_type) else {
            tracing::trace!(part = %name, %part_type, "no handler registered, skipping");
            continue;
        };

        let flavor = schema
            .and_then(|s| s.part_def(name))
            .and_then(|d| d.flavor.clone());
        let item_ref: &ContentItem = item.as_ref();
        let name: &str = name.as_str();

        jobs.push(async move {
            let mut output = HandleOutput::default();
            handler
                .handle(HandleContext {
                    item: item_ref,
                    part_name: name,
                    part_type: &part_type,
                    flavor: flavor.as_deref(),
                    part,
                    display_type,
                    output: &mut output,
                })
                .await?;
            Ok::<_, PartError>(output)
        });
    }

    let mut merged = HandleOutput::default();
    match ordering {
        HandlerOrdering::CallOrder => {
            // Index-preserving join: merge order equals call order.
            for output in future::try_join_all(jobs).await? {
                merged.merge(output);
            }
        }
        HandlerOrdering::CompletionOrder => {
            let mut pending: FuturesUnordered<_> = jobs.into_iter().collect();
            while let Some(output) = pending.next().await {
                merged.merge(output?);
            }
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use trellis_plugin::testing::{FailingLoader, RecordingHandler, RecordingLoader};
    use trellis_types::{ContentTypeDef, ItemId, Part, PartDef};

    fn registry_with_text_loader() -> (PluginRegistry, std::sync::Arc<std::sync::atomic::AtomicUsize>)
    {
        let mut registry = PluginRegistry::new();
        let loader = RecordingLoader::new("text");
        let calls = loader.call_count();
        registry.register_part_loader(Arc::new(loader));
        (registry, calls)
    }

    #[tokio::test]
    async fn loads_typed_parts_and_skips_the_rest() {
        let (registry, calls) = registry_with_text_loader();

        let mut item = ContentItem::new(ItemId::new("/a"), "page")
            .with_part("body", Part::new("text", json!("raw")))
            .with_part("mystery", Part::untyped(json!("left alone")));

        load_parts(&registry, &mut item)
            .await
            .expect("load dispatch should succeed");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(item.scratch.loaded);

        // Normalized in place.
        let body = item.part("body").expect("body part should remain");
        assert_eq!(body.field("normalized"), Some(&json!(true)));

        // Untyped part untouched, not an error.
        let mystery = item.part("mystery").expect("mystery part should remain");
        assert_eq!(mystery.payload, json!("left alone"));
    }

    #[tokio::test]
    async fn schema_types_reach_the_loader() {
        let (mut registry, calls) = registry_with_text_loader();
        registry.register_content_type(
            ContentTypeDef::new("page").with_part("body", PartDef::new("text")),
        );

        let mut item = ContentItem::new(ItemId::new("/a"), "page")
            .with_part("body", Part::untyped(json!("raw")));

        load_parts(&registry, &mut item)
            .await
            .expect("load dispatch should succeed");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn loader_failure_aborts_the_item() {
        let mut registry = PluginRegistry::new();
        registry.register_part_loader(Arc::new(RecordingLoader::new("text")));
        registry.register_part_loader(Arc::new(FailingLoader::new("broken")));

        let mut item = ContentItem::new(ItemId::new("/a"), "page")
            .with_part("body", Part::new("text", json!("raw")))
            .with_part("bad", Part::new("broken", json!("boom")));

        let err = load_parts(&registry, &mut item)
            .await
            .expect_err("failing loader should abort the item load");

        use trellis_types::ErrorCode;
        assert_eq!(err.code(), "PART_LOAD_FAILED");
        assert!(!item.scratch.loaded);
    }

    #[tokio::test]
    async fn handlers_merge_in_call_order() {
        let mut registry = PluginRegistry::new();
        registry.register_part_handler(Arc::new(RecordingHandler::new("alpha")));
        registry.register_part_handler(Arc::new(RecordingHandler::new("beta")));

        let mut item = ContentItem::new(ItemId::new("/a"), "page")
            .with_part("one", Part::new("alpha", json!(1)))
            .with_part("two", Part::new("beta", json!(2)));
        item.scratch.loaded = true;
        let item = Arc::new(item);

        let output = handle_parts(
            &registry,
            &item,
            &DisplayType::main(),
            HandlerOrdering::CallOrder,
        )
        .await
        .expect("handler dispatch should succeed");

        // Part-name order: "one" (alpha) before "two" (beta).
        let names: Vec<_> = output
            .shapes
            .iter()
            .map(|s| s.data["part_name"].as_str().expect("part_name is a string"))
            .collect();
        assert_eq!(names, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn zero_shape_handlers_are_valid() {
        let registry = PluginRegistry::new();
        let mut item = ContentItem::new(ItemId::new("/a"), "page")
            .with_part("body", Part::new("text", json!("raw")));
        item.scratch.loaded = true;

        let output = handle_parts(
            &registry,
            &Arc::new(item),
            &DisplayType::main(),
            HandlerOrdering::CallOrder,
        )
        .await
        .expect("dispatch with no handlers should succeed");
        assert!(output.shapes.is_empty());
    }
}
