//! MCP server implementation.
//!
//! `EsaMcpServer` wraps any [`ToolRegistry`] and implements the `rmcp`
//! `ServerHandler`, so the registry's tools can be served over stdio.

use crate::registry::ToolRegistry;
use esa_core::{Error, Result};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ErrorData, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Name reported in `initialize`.
pub const SERVER_NAME: &str = "esa-server";

const INSTRUCTIONS: &str = "Tools for esa.io posts. Call get_search_query_document for the \
                            search syntax before composing complex search_esa_posts queries.";

/// Server metadata.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
    /// Usage hints for the client.
    pub instructions: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// MCP server over a tool registry.
pub struct EsaMcpServer<R: ToolRegistry> {
    registry: Arc<R>,
    config: ServerConfig,
}

impl<R: ToolRegistry> Clone for EsaMcpServer<R> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            config: self.config.clone(),
        }
    }
}

impl<R: ToolRegistry + 'static> EsaMcpServer<R> {
    /// Create a server with default metadata.
    pub fn new(registry: R) -> Self {
        Self {
            registry: Arc::new(registry),
            config: ServerConfig::default(),
        }
    }

    /// Override the server name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Override the usage instructions.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.config.instructions = Some(instructions.into());
        self
    }

    /// Server metadata.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Dispatch one call, turning unknown names into an error envelope.
    pub async fn dispatch(
        &self,
        name: &str,
        args: Value,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        dispatch(self.registry.as_ref(), name, args).await
    }

    /// Serve over stdin/stdout until the client disconnects.
    pub async fn serve_stdio(self) -> Result<()> {
        log::info!(
            "serving {} {} on stdio with {} tools",
            self.config.name,
            self.config.version,
            self.registry.tool_count()
        );
        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| Error::transport(format!("failed to start MCP server: {e}")))?;
        let reason = service
            .waiting()
            .await
            .map_err(|e| Error::transport_with_source("MCP server task failed", e))?;
        log::info!("MCP server stopped: {reason:?}");
        Ok(())
    }
}

fn dispatch<R: ToolRegistry + ?Sized>(
    registry: &R,
    name: &str,
    args: Value,
) -> impl Future<Output = std::result::Result<CallToolResult, ErrorData>> + Send + use<R> {
    let call = registry.call(name, args);
    let name = name.to_string();
    async move {
        match call {
            Some(future) => future.await,
            None => {
                log::warn!("unknown tool requested: {name}");
                Ok(CallToolResult::error(vec![Content::text(format!(
                    "Error: Unknown tool: {name}"
                ))]))
            }
        }
    }
}

impl<R: ToolRegistry + 'static> ServerHandler for EsaMcpServer<R> {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info.name = self.config.name.clone();
        info.server_info.version = self.config.version.clone();
        info.instructions = self.config.instructions.clone();
        info
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(self.registry.tools())))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<CallToolResult, ErrorData>> + Send + '_ {
        let args = request.arguments.map(Value::Object).unwrap_or(Value::Null);
        log::debug!("call_tool {}", request.name);
        dispatch(self.registry.as_ref(), &request.name, args)
    }
}

// ============================================================================
// Tests
// ============================================================================
