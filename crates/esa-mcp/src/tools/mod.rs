//! Tool registries served by `esa-mcp`.

pub mod guide;
pub mod posts;

pub use guide::{GuideTools, SEARCH_QUERY_DOCUMENT, SEARCH_QUERY_GUIDE};
pub use posts::{PostTools, SearchResponse};
