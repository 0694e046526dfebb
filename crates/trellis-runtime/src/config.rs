//! Engine configuration.
//!
//! All fields default individually, so partial configuration files work:
//!
//! ```
//! use trellis_runtime::{EngineConfig, HandlerOrdering};
//!
//! let config: EngineConfig = serde_json::from_str(r#"{"max_render_depth": 8}"#)
//!     .expect("partial config should deserialize");
//! assert_eq!(config.max_render_depth, 8);
//! assert_eq!(config.handler_ordering, HandlerOrdering::CallOrder);
//! ```

use serde::{Deserialize, Serialize};
use trellis_types::DisplayType;

/// How sibling part-handler outputs are ordered into zones.
///
/// Part handlers for one item run as independent concurrent futures.
/// When several of them feed the same zone, something has to define the
/// resulting order, and the two defensible contracts differ:
///
/// | Mode | Contract |
/// |------|----------|
/// | `CallOrder` | zone order equals fan-out call order (part-name order), regardless of which handler finishes first |
/// | `CompletionOrder` | shapes append as handlers complete; zone order is unspecified when handlers truly suspend |
///
/// `CallOrder` is the default: it is deterministic and matches what
/// synchronous handlers produce anyway. `CompletionOrder` exists for
/// deployments that prefer first-ready-first-placed and treat zones as
/// unordered sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerOrdering {
    /// Deterministic: collect handler outputs index-preserving.
    #[default]
    CallOrder,
    /// Append as handlers complete; zone order unspecified.
    CompletionOrder,
}

/// Runtime configuration for the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ordering contract for handler-produced shapes (see
    /// [`HandlerOrdering`]).
    pub handler_ordering: HandlerOrdering,

    /// Display type used when a render does not specify one.
    pub default_display_type: DisplayType,

    /// Maximum shape-tree depth the render stream walks before
    /// aborting. Guards against promise cycles (an item embedding
    /// itself).
    pub max_render_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            handler_ordering: HandlerOrdering::default(),
            default_display_type: DisplayType::main(),
            max_render_depth: 32,
        }
    }
}
