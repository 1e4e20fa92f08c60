//! Wire model for the esa.io posts API.
//!
//! Posts are kept as the raw records the remote API sends, with typed
//! accessors for the fields this system reasons about. Payloads and search
//! parameters are fully typed.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Default search page.
pub const DEFAULT_PAGE: u32 = 1;

/// Default number of posts per search page.
pub const DEFAULT_PER_PAGE: u32 = 50;

/// Largest page size the remote API accepts.
pub const MAX_PER_PAGE: u32 = 100;

// ============================================================================
// Posts
// ============================================================================

/// A member reference as embedded in posts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    /// Whether the member is the credential owner.
    pub myself: bool,
    /// Display name.
    pub name: String,
    /// Screen name (`@screen_name`).
    pub screen_name: String,
    /// Avatar URL.
    pub icon: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Markdown body field.
pub const BODY_MD: &str = "body_md";

/// Rendered HTML body field.
pub const BODY_HTML: &str = "body_html";

/// A post exactly as the remote API returned it.
///
/// The record is kept field for field, so a projection can drop the bodies
/// without inventing defaults for fields the remote left out or losing
/// fields this crate never heard of. Documented fields are decoded on
/// demand.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Post {
    fields: Map<String, Value>,
}

impl Post {
    /// Wrap a raw record.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Returns `true` if the record has no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw value of one field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Post number, if the record carries one.
    pub fn number(&self) -> Option<u64> {
        self.get("number").and_then(Value::as_u64)
    }

    /// `category/name` with tags.
    pub fn full_name(&self) -> Option<&str> {
        self.get("full_name").and_then(Value::as_str)
    }

    /// Markdown source.
    pub fn body_md(&self) -> Option<&str> {
        self.get(BODY_MD).and_then(Value::as_str)
    }

    /// Revision counter.
    pub fn revision_number(&self) -> Option<u64> {
        self.get("revision_number").and_then(Value::as_u64)
    }

    /// Last update time; `None` when absent or not RFC 3339.
    pub fn updated_at(&self) -> Option<DateTime<FixedOffset>> {
        self.get("updated_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }

    /// Author, decoded leniently.
    pub fn created_by(&self) -> Option<Author> {
        self.get("created_by")
            .filter(|v| v.is_object())
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// The raw record.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The raw record, consumed.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Every field except `keys`, in the remote order and otherwise unchanged.
    pub fn without(self, keys: &[&str]) -> Map<String, Value> {
        self.fields
            .into_iter()
            .filter(|(key, _)| !keys.contains(&key.as_str()))
            .collect()
    }
}

/// Search response envelope. Pagination fields are not used.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PostList {
    /// Matching posts; absent means none.
    #[serde(default)]
    pub posts: Vec<Post>,
}

// ============================================================================
// Payloads
// ============================================================================

/// Payload for creating a post.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PostInput {
    /// Title, optionally with a `category/` prefix.
    pub name: String,
    /// Markdown body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_md: Option<String>,
    /// Tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Category path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Work-in-progress flag.
    pub wip: bool,
    /// Edit message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Payload for updating a post. Absent fields are left untouched remotely.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New markdown body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_md: Option<String>,
    /// Replacement tag set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// New category path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New work-in-progress flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wip: Option<bool>,
    /// Edit message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PostPatch {
    /// Returns `true` if no field would be sent.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.body_md.is_none()
            && self.tags.is_none()
            && self.category.is_none()
            && self.wip.is_none()
            && self.message.is_none()
    }
}

// ============================================================================
// Search parameters
// ============================================================================

/// Result ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

impl Order {
    /// Wire names of every variant.
    pub const NAMES: &'static [&'static str] = &["asc", "desc"];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    /// Creation time.
    Created,
    /// Last update time.
    Updated,
    /// Post number.
    Number,
    /// Star count.
    Stars,
    /// Comment count.
    Comments,
    /// Relevance.
    #[default]
    BestMatch,
}

impl Sort {
    /// Wire names of every variant.
    pub const NAMES: &'static [&'static str] = &[
        "created",
        "updated",
        "number",
        "stars",
        "comments",
        "best_match",
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Number => "number",
            Self::Stars => "stars",
            Self::Comments => "comments",
            Self::BestMatch => "best_match",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of one search call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchParams {
    /// Query in the remote search mini-language, forwarded verbatim.
    pub query: String,
    /// Result ordering.
    pub order: Order,
    /// Sort key.
    pub sort: Sort,
    /// 1-based page.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
}

impl SearchParams {
    /// Create parameters for `query` with every other value defaulted.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            order: Order::default(),
            sort: Sort::default(),
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Query-string pairs in the names the remote API expects.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.query.clone()),
            ("order", self.order.as_str().to_string()),
            ("sort", self.sort.as_str().to_string()),
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }
}

// ============================================================================
// Tests
// ============================================================================
