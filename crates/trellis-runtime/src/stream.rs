//! The render stream: depth-first tree walk and output emission.

use crate::{dispatch, ContentManager, LoadError, PipelineEvent, RenderError};
use futures::future::BoxFuture;
use std::sync::Arc;
use trellis_plugin::ViewEngine;
use trellis_shape::Shape;

/// A finished render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// The emitted markup.
    pub body: String,
    /// Page title, if a handler set one.
    pub title: Option<String>,
}

/// Walks a shape tree depth-first, expanding item promises on the way,
/// and streams every node through the view engine into one shared
/// output buffer.
///
/// # Walk Order
///
/// For each shape: expansion (if it is an unexpanded promise), then
/// tree-walk hooks, then output emission, then recursion into zones in
/// zone-name order, then into the flat `items` list. Within a zone,
/// placement order.
///
/// # Promise Expansion
///
/// Expansion morphs the promise **in place**: the tree slot keeps its
/// identity. The `begin_expansion` guard makes walking a tree twice
/// safe; an already-expanded shape renders from its existing zones.
pub struct RenderStream<'m> {
    manager: &'m ContentManager,
    view: Arc<dyn ViewEngine>,
    out: String,
    title: Option<String>,
}

impl<'m> RenderStream<'m> {
    pub(crate) fn new(manager: &'m ContentManager, view: Arc<dyn ViewEngine>) -> Self {
        Self {
            manager,
            view,
            out: String::new(),
            title: None,
        }
    }

    /// The page title set so far, if any.
    #[must_use]
    pub fn page_title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Walks the tree from the given root.
    ///
    /// # Errors
    ///
    /// See [`RenderError`]; not-found ids do not error, they morph into
    /// not-found shapes.
    pub async fn walk(&mut self, root: &mut Shape) -> Result<(), RenderError> {
        self.render_shape(root, 0).await
    }

    pub(crate) fn finish(self) -> RenderedPage {
        RenderedPage {
            body: self.out,
            title: self.title,
        }
    }

    fn render_shape<'a>(
        &'a mut self,
        shape: &'a mut Shape,
        depth: usize,
    ) -> BoxFuture<'a, Result<(), RenderError>> {
        Box::pin(async move {
            if depth > self.manager.config().max_render_depth {
                return Err(RenderError::DepthExceeded { depth });
            }

            if shape.is_item_promise() && shape.begin_expansion() {
                self.expand(shape).await?;
            }

            // Tree-walk hooks, filtered by selector.
            let hooks = self.manager.registry().shape_handlers().to_vec();
            for hook in hooks {
                if hook.selector().matches(shape) {
                    hook.handle(shape).await.map_err(RenderError::Handler)?;
                }
            }

            // Emission: render event first, then the view engine.
            let bus = Arc::clone(self.manager.bus());
            bus.emit(&mut PipelineEvent::ShapeRender {
                shape,
                out: &mut self.out,
            })
            .await?;

            let view = Arc::clone(&self.view);
            view.render(shape, &mut self.out)
                .await
                .map_err(RenderError::View)?;

            // Zones in name order, then flat items.
            for children in shape.zones.values_mut() {
                for child in children.iter_mut() {
                    self.render_shape(child, depth + 1).await?;
                }
            }
            for child in shape.items.iter_mut() {
                self.render_shape(child, depth + 1).await?;
            }

            shape.mark_rendered();
            Ok(())
        })
    }

    /// Expands an item promise in place: fetch, handler dispatch,
    /// placement.
    async fn expand(&mut self, shape: &mut Shape) -> Result<(), RenderError> {
        let Some(id) = shape.promised_id() else {
            return Ok(());
        };
        let display_type = shape
            .scratch
            .display_type
            .clone()
            .unwrap_or_else(|| self.manager.config().default_display_type.clone());

        let results = self.manager.load(std::slice::from_ref(&id)).await?;

        let item = match results.outcome(&id) {
            Some(Ok(item)) => Arc::clone(item),
            Some(Err(LoadError::NotFound(_))) | None => {
                tracing::debug!(%id, "rendering not-found shape");
                shape.morph_into_not_found(&id);
                return Ok(());
            }
            Some(Err(err)) => return Err(RenderError::Load(err.clone())),
        };

        shape.morph_into_content(Arc::clone(&item), &display_type);

        let registry = Arc::clone(self.manager.registry());
        let ordering = self.manager.config().handler_ordering;
        let mut output = dispatch::handle_parts(&registry, &item, &display_type, ordering)
            .await
            .map_err(RenderError::Handler)?;

        let bus = Arc::clone(self.manager.bus());
        bus.emit(&mut PipelineEvent::HandleItem {
            item: item.as_ref(),
            display_type: &display_type,
            output: &mut output,
        })
        .await?;

        if let Some(title) = output.page_title.take() {
            self.title = Some(title);
        }

        let mut pending = output.shapes;
        bus.emit(&mut PipelineEvent::ShapePlacement {
            ambient: shape,
            pending: &mut pending,
        })
        .await?;

        // Route into the ambient shape's zones; whatever no rule claims
        // stays attached to the producing parent.
        let unplaced = registry.placement().route(shape, pending);
        shape.items.extend(unplaced);
        shape.mark_placed();
        Ok(())
    }
}
