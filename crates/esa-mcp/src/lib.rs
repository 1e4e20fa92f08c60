//! MCP server exposing esa.io posts as tools.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         esa-mcp                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ToolRegistry trait / CompositeRegistry - dispatch by name  │
//! │  ToolDefinition / ArgumentSchema - advertise and validate   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  shape - project posts per tool                             │
//! │  format - YAML success or `Error: <Kind>: <message>`        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PostTools - search/read/create/update/delete               │
//! │  GuideTools - search query reference                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  EsaMcpServer - rmcp ServerHandler over stdio               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use esa_mcp::{CompositeRegistry, EsaMcpServer, GuideTools, PostTools};
//!
//! let registry = CompositeRegistry::new()
//!     .add(PostTools::new(client, &config)?)
//!     .add(GuideTools::new());
//!
//! EsaMcpServer::new(registry).serve_stdio().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod format;
pub mod registry;
pub mod schema;
pub mod server;
pub mod shape;
pub mod tools;

// Re-exports - registry
pub use registry::{CompositeRegistry, ToolFuture, ToolRegistry};

// Re-exports - schema
pub use schema::{ArgumentSchema, Param, ParamKind, ToolDefinition};

// Re-exports - formatting
pub use format::{format_tool, ToolOutput};

// Re-exports - server
pub use server::{EsaMcpServer, ServerConfig, SERVER_NAME};

// Re-exports - tools
pub use tools::{GuideTools, PostTools};
