//! The search-query reference document as a tool.

use crate::registry::{ToolFuture, ToolRegistry};
use crate::schema::{ArgumentSchema, ToolDefinition};
use rmcp::model::{CallToolResult, Content, Tool};
use serde_json::Value;

/// Tool name.
pub const SEARCH_QUERY_DOCUMENT: &str = "get_search_query_document";

/// esa search syntax reference, returned verbatim.
pub const SEARCH_QUERY_GUIDE: &str = include_str!("../guide/search_query.md");

/// A registry with the single `get_search_query_document` tool.
///
/// The document is already plain text, so it bypasses YAML rendering.
pub struct GuideTools {
    definition: ToolDefinition,
}

impl GuideTools {
    /// Create the guide tool.
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(
                SEARCH_QUERY_DOCUMENT,
                "Get the esa.io search query syntax document.",
                ArgumentSchema::new(),
            ),
        }
    }
}

impl Default for GuideTools {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry for GuideTools {
    fn tools(&self) -> Vec<Tool> {
        vec![self.definition.to_tool()]
    }

    fn call(&self, name: &str, _args: Value) -> Option<ToolFuture> {
        if name != SEARCH_QUERY_DOCUMENT {
            return None;
        }
        Some(Box::pin(async {
            Ok(CallToolResult::success(vec![Content::text(
                SEARCH_QUERY_GUIDE,
            )]))
        }))
    }
}
