//! Test helpers: mock plugins.
//!
//! Deterministic plugin implementations used across the workspace's
//! tests. They are part of the public SDK so third-party plugin authors
//! can test against the same dispatch contracts the runtime exercises.

use crate::{
    HandleContext, LoadContext, PartError, PartHandler, PartLoader, ViewEngine, ViewError,
};
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use trellis_shape::Shape;

/// Loader that wraps the raw payload in a `{"normalized": true}` record
/// and counts invocations.
///
/// # Example
///
/// ```
/// use trellis_plugin::testing::RecordingLoader;
///
/// let loader = RecordingLoader::new("text");
/// let calls = loader.call_count();
/// assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
/// ```
pub struct RecordingLoader {
    part_type: String,
    calls: Arc<AtomicUsize>,
}

impl RecordingLoader {
    /// Creates a loader registered under the given part type.
    #[must_use]
    pub fn new(part_type: impl Into<String>) -> Self {
        Self {
            part_type: part_type.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared invocation counter.
    #[must_use]
    pub fn call_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl PartLoader for RecordingLoader {
    fn part_type(&self) -> &str {
        &self.part_type
    }

    async fn load(&self, cx: LoadContext<'_>) -> Result<(), PartError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let original = cx.part.payload.clone();
        cx.part.payload = json!({
            "normalized": true,
            "original": original,
        });
        Ok(())
    }
}

/// Loader that always fails, for fan-in abort tests.
pub struct FailingLoader {
    part_type: String,
}

impl FailingLoader {
    /// Creates a failing loader for the given part type.
    #[must_use]
    pub fn new(part_type: impl Into<String>) -> Self {
        Self {
            part_type: part_type.into(),
        }
    }
}

#[async_trait]
impl PartLoader for FailingLoader {
    fn part_type(&self) -> &str {
        &self.part_type
    }

    async fn load(&self, cx: LoadContext<'_>) -> Result<(), PartError> {
        Err(PartError::load(cx.part_name, "intentional test failure"))
    }
}

/// Handler that emits one shape echoing the part's (post-loader) payload
/// and counts invocations.
///
/// The emitted shape has the handler's part type as its shape type, the
/// part payload under `"payload"`, and the context display type in its
/// scratch, so placement predicates can route it.
pub struct RecordingHandler {
    part_type: String,
    calls: Arc<AtomicUsize>,
}

impl RecordingHandler {
    /// Creates a handler registered under the given part type.
    #[must_use]
    pub fn new(part_type: impl Into<String>) -> Self {
        Self {
            part_type: part_type.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared invocation counter.
    #[must_use]
    pub fn call_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl PartHandler for RecordingHandler {
    fn part_type(&self) -> &str {
        &self.part_type
    }

    async fn handle(&self, cx: HandleContext<'_>) -> Result<(), PartError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut shape = Shape::new(self.part_type.as_str())
            .with_data("payload", cx.part.payload.clone())
            .with_data("part_name", json!(cx.part_name));
        shape.scratch.display_type = Some(cx.display_type.clone());
        cx.output.push_shape(shape);
        Ok(())
    }
}

/// Handler that always fails, for fan-in abort tests.
pub struct FailingHandler {
    part_type: String,
}

impl FailingHandler {
    /// Creates a failing handler for the given part type.
    #[must_use]
    pub fn new(part_type: impl Into<String>) -> Self {
        Self {
            part_type: part_type.into(),
        }
    }
}

#[async_trait]
impl PartHandler for FailingHandler {
    fn part_type(&self) -> &str {
        &self.part_type
    }

    async fn handle(&self, cx: HandleContext<'_>) -> Result<(), PartError> {
        Err(PartError::handle(cx.part_name, "intentional test failure"))
    }
}

/// View engine emitting minimal tag markup, one tag per shape.
///
/// Output per shape: `<{template} .../>` where `{template}` is the first
/// template candidate. Shapes with a `title` or `text` data field get it
/// inlined, which keeps assertions readable:
///
/// ```text
/// <content-page-main/><title>Home</title><text>Our story.</text>
/// ```
pub struct MarkupViewEngine;

#[async_trait]
impl ViewEngine for MarkupViewEngine {
    fn name(&self) -> &str {
        "markup"
    }

    async fn render(&self, shape: &Shape, out: &mut String) -> Result<(), ViewError> {
        let template = shape
            .meta
            .template_candidates()
            .next()
            .ok_or_else(|| ViewError::TemplateMissing(shape.meta.shape_type.clone()))?;

        let inline = shape
            .data
            .get("title")
            .or_else(|| shape.data.get("text"))
            .and_then(|v| v.as_str());

        match inline {
            Some(text) => out.push_str(&format!("<{template}>{text}</{template}>")),
            None => out.push_str(&format!("<{template}/>")),
        }
        Ok(())
    }
}
