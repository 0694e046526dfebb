//! Part loaders: normalization after fetch.

use crate::PartError;
use async_trait::async_trait;
use trellis_types::{ItemId, Part};

/// Context threaded through one part-loader call.
///
/// Short-lived and per-call: created for the dispatch, dropped after.
/// The loader owns a mutable view of exactly its part and normalizes the
/// payload in place.
#[derive(Debug)]
pub struct LoadContext<'a> {
    /// Id of the item being loaded.
    pub item_id: &'a ItemId,
    /// The item's content-type name.
    pub content_type: &'a str,
    /// Name of the part being loaded.
    pub part_name: &'a str,
    /// Resolved semantic type of the part.
    pub part_type: &'a str,
    /// Flavor hint from the content-type schema, if any.
    pub flavor: Option<&'a str>,
    /// The part whose payload is normalized in place.
    pub part: &'a mut Part,
}

/// Normalizes one part type's stored data into its canonical in-memory
/// representation, immediately after fetch and before the item is cached
/// or handled.
///
/// All loaders for one item run as independent concurrent futures; the
/// item counts as loaded only once every loader completed, and a single
/// loader error aborts the whole item's load.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use serde_json::json;
/// use trellis_plugin::{LoadContext, PartError, PartLoader};
///
/// /// Wraps bare-string payloads into a canonical record.
/// struct UpperLoader;
///
/// #[async_trait]
/// impl PartLoader for UpperLoader {
///     fn part_type(&self) -> &str {
///         "upper"
///     }
///
///     async fn load(&self, cx: LoadContext<'_>) -> Result<(), PartError> {
///         let raw = cx.part.as_str()
///             .ok_or_else(|| PartError::invalid(cx.part_name, "expected a string"))?;
///         cx.part.payload = json!({ "text": raw.to_uppercase() });
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait PartLoader: Send + Sync {
    /// The part type this loader is registered for.
    fn part_type(&self) -> &str;

    /// Normalizes the part payload in place.
    ///
    /// # Errors
    ///
    /// A returned error aborts the enclosing item's load; siblings
    /// already normalized are discarded for that item.
    async fn load(&self, cx: LoadContext<'_>) -> Result<(), PartError>;
}
