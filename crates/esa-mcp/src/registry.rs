//! Tool registry trait for the MCP server.
//!
//! A `ToolRegistry` lists tool definitions and dispatches calls by name.
//! `CompositeRegistry` combines several registries (post tools, the search
//! guide) into the single registry the server holds.

use rmcp::model::{CallToolResult, ErrorData, Tool};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

/// Type alias for an in-flight tool call.
pub type ToolFuture = Pin<Box<dyn Future<Output = Result<CallToolResult, ErrorData>> + Send>>;

/// Trait for registering and dispatching MCP tools.
///
/// # Example
///
/// ```rust,ignore
/// impl ToolRegistry for MyTools {
///     fn tools(&self) -> Vec<Tool> {
///         self.definitions.iter().map(ToolDefinition::to_tool).collect()
///     }
///
///     fn call(&self, name: &str, args: Value) -> Option<ToolFuture> {
///         match name {
///             "my_tool" => Some(Box::pin(handle_my_tool(args))),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait ToolRegistry: Send + Sync {
    /// Returns information about all available tools.
    fn tools(&self) -> Vec<Tool>;

    /// Dispatches a tool call by name.
    ///
    /// Returns `None` if the tool is not recognized by this registry.
    fn call(&self, name: &str, args: Value) -> Option<ToolFuture>;

    /// Returns the number of registered tools.
    fn tool_count(&self) -> usize {
        self.tools().len()
    }

    /// Check if a tool exists by name.
    fn has_tool(&self, name: &str) -> bool {
        self.tools().iter().any(|t| t.name == name)
    }
}

/// A registry that combines multiple sub-registries.
///
/// Calls go to the first sub-registry that recognizes the name.
pub struct CompositeRegistry {
    registries: Vec<Box<dyn ToolRegistry>>,
}

impl CompositeRegistry {
    /// Create a new empty composite registry.
    pub fn new() -> Self {
        Self {
            registries: Vec::new(),
        }
    }

    /// Add a sub-registry.
    #[allow(clippy::should_implement_trait)]
    pub fn add<R: ToolRegistry + 'static>(mut self, registry: R) -> Self {
        self.registries.push(Box::new(registry));
        self
    }
}

impl Default for CompositeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry for CompositeRegistry {
    fn tools(&self) -> Vec<Tool> {
        self.registries.iter().flat_map(|r| r.tools()).collect()
    }

    fn call(&self, name: &str, args: Value) -> Option<ToolFuture> {
        self.registries
            .iter()
            .find(|r| r.has_tool(name))
            .and_then(|r| r.call(name, args))
    }
}

// ============================================================================
// Tests
// ============================================================================
