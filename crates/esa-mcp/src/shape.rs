//! Projection of remote posts into caller-facing shapes.
//!
//! Rendered bodies are large and rarely useful to an agent with a limited
//! context budget:
//! - search results drop both `body_md` and `body_html`
//! - reads drop only `body_html`
//! - create/update results are pinned to a fixed field allow-list

use esa_client::{Post, BODY_HTML, BODY_MD};
use serde_json::{Map, Value};

/// A caller-facing projection of a post record.
pub type Projection = Map<String, Value>;

/// Fields returned by the create tool, after the synthesized `success`.
pub const CREATED_FIELDS: &[&str] = &[
    "number",
    "full_name",
    "url",
    "wip",
    "created_at",
    "message",
    "kind",
    "tags",
    "category",
    "revision_number",
    "created_by",
];

/// Fields the update tool returns on top of [`CREATED_FIELDS`].
pub const UPDATE_FIELDS: &[&str] = &["updated_at", "updated_by"];

/// Search projection: drop both bodies.
pub fn summarize(post: Post) -> Projection {
    post.without(&[BODY_MD, BODY_HTML])
}

/// Search projection over a result page.
pub fn summarize_all(posts: Vec<Post>) -> Vec<Projection> {
    posts.into_iter().map(summarize).collect()
}

/// Read projection: drop `body_html`, keep `body_md`.
pub fn detail(post: Post) -> Projection {
    post.without(&[BODY_HTML])
}

/// Read projection over several posts, preserving order.
pub fn detail_all(posts: Vec<Post>) -> Vec<Projection> {
    posts.into_iter().map(detail).collect()
}

/// Create projection.
pub fn created(post: Post) -> Projection {
    pick(post, &[CREATED_FIELDS])
}

/// Update projection: the create fields plus `updated_at` and `updated_by`.
pub fn updated(post: Post) -> Projection {
    pick(post, &[CREATED_FIELDS, UPDATE_FIELDS])
}

// Fields the remote left out stay out.
fn pick(post: Post, groups: &[&[&str]]) -> Projection {
    let mut fields = post.into_fields();
    let mut picked = Map::new();
    picked.insert("success".to_string(), Value::Bool(true));
    for &key in groups.iter().flat_map(|group| group.iter()) {
        if let Some(value) = fields.remove(key) {
            picked.insert(key.to_string(), value);
        }
    }
    picked
}
