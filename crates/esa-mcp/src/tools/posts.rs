//! MCP tools for esa.io posts.
//!
//! Provides `PostTools`, a `ToolRegistry` that validates arguments against
//! each tool's schema, calls the [`EsaClient`], projects the result, and
//! wraps everything through [`format_tool`].

use crate::format::format_tool;
use crate::registry::{ToolFuture, ToolRegistry};
use crate::schema::{ArgumentSchema, Param, ParamKind, ToolDefinition};
use crate::shape;

use esa_client::model::{DEFAULT_PAGE, DEFAULT_PER_PAGE, MAX_PER_PAGE};
use esa_client::{EsaClient, Order, PostInput, PostPatch, SearchParams, Sort};
use esa_core::{ConfigSource, Error, Result, DEFAULT_TEAM};
use rmcp::model::Tool;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Search posts.
pub const SEARCH_POSTS: &str = "search_esa_posts";
/// Read one post.
pub const READ_POST: &str = "read_esa_post";
/// Read several posts.
pub const READ_MULTIPLE_POSTS: &str = "read_esa_multiple_posts";
/// Create a post.
pub const CREATE_POST: &str = "create_esa_post";
/// Update a post.
pub const UPDATE_POST: &str = "update_esa_post";
/// Delete a post.
pub const DELETE_POST: &str = "delete_esa_post";

const SEARCH_DESCRIPTION: &str = concat!(
    "Search posts in esa.io. Response is paginated. ",
    "For efficient search, you can use customized queries like the following: ",
    "keyword for partial match, \"keyword\" for exact match, ",
    "keyword1 keyword2 for AND match, ",
    "keyword1 OR keyword2 for OR match, ",
    "-keyword for excluding keywords, ",
    "title:keyword for title match, ",
    "wip:true or wip:false for WIP posts, ",
    "kind:stock or kind:flow for kind match, ",
    "category:category_name for partial match with category name, ",
    "in:category_name for prefix match with category name, ",
    "on:category_name for exact match with category name, ",
    "body:keyword for body match, ",
    "tag:tag_name or tag:tag_name case_sensitive:true for tag match, ",
    "user:screen_name for post author's screen name, ",
    "updated_by:screen_name for post updater's screen name, ",
    "comment:keyword for partial match with comments, ",
    "starred:true or starred:false for starred posts, ",
    "watched:true or watched:false for watched posts, ",
    "watched_by:screen_name for screen name of members watching the post, ",
    "sharing:true or sharing:false for shared posts, ",
    "stars:>3 for posts with more than 3 stars, ",
    "watches:>3 for posts with more than 3 watches, ",
    "comments:>3 for posts with more than 3 comments, ",
    "done:>=3 for posts with 3 or more done items, ",
    "undone:>=3 for posts with 3 or more undone items, ",
    "created:>YYYY-MM-DD for filtering by creation date, ",
    "updated:>YYYY-MM-DD for filtering by update date",
);

// ---------------------------------------------------------------------------
// Argument types
// ---------------------------------------------------------------------------

/// Arguments for `search_esa_posts`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchArgs {
    /// Team to search.
    pub team_name: String,
    /// Query in the esa search syntax.
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

/// Arguments for `read_esa_post` and `delete_esa_post`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRef {
    /// Team owning the post.
    pub team_name: String,
    /// Post number.
    pub post_number: u64,
}

/// Arguments for `read_esa_multiple_posts`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiPostRef {
    /// Team owning the posts.
    pub team_name: String,
    /// Post numbers, in output order.
    pub post_numbers: Vec<u64>,
}

/// Arguments for `create_esa_post`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArgs {
    /// Team to post into.
    pub team_name: String,
    /// The post itself.
    #[serde(flatten)]
    pub post: PostInput,
}

/// Arguments for `update_esa_post`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArgs {
    /// Team owning the post.
    pub team_name: String,
    /// Post number.
    pub post_number: u64,
    /// Fields to change.
    #[serde(flatten)]
    pub patch: PostPatch,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response from `search_esa_posts`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Matching posts without bodies.
    pub posts: Vec<shape::Projection>,
    /// Always `page + 1`, whether or not more results exist.
    pub next_page: u64,
}

// ---------------------------------------------------------------------------
// PostTools
// ---------------------------------------------------------------------------

/// MCP tools for reading and writing esa.io posts.
///
/// Generates six tools:
/// - `search_esa_posts`
/// - `read_esa_post`
/// - `read_esa_multiple_posts`
/// - `create_esa_post`
/// - `update_esa_post`
/// - `delete_esa_post`
///
/// Every tool's `teamName` defaults to `DEFAULT_ESA_TEAM`, read once at
/// construction.
pub struct PostTools {
    client: EsaClient,
    definitions: Arc<Vec<ToolDefinition>>,
}

impl PostTools {
    /// Create post tools.
    ///
    /// Fails with a configuration error if `DEFAULT_ESA_TEAM` is missing.
    pub fn new(client: EsaClient, config: &dyn ConfigSource) -> Result<Self> {
        let default_team = config.get_required(DEFAULT_TEAM)?;
        log::debug!("post tools default to team {default_team}");
        Ok(Self {
            client,
            definitions: Arc::new(definitions(&default_team)),
        })
    }

    fn definition(&self, name: &str) -> Option<ToolDefinition> {
        self.definitions.iter().find(|d| d.name == name).cloned()
    }
}

fn team_param(default_team: &str) -> Param {
    Param::optional("teamName", ParamKind::String, "esa team name").with_default(default_team)
}

fn post_number_param() -> Param {
    Param::required(
        "postNumber",
        ParamKind::bounded(Some(1), None),
        "Post number",
    )
}

fn content_params(schema: ArgumentSchema, name_required: bool) -> ArgumentSchema {
    let name = if name_required {
        Param::required("name", ParamKind::String, "Post title")
    } else {
        Param::optional("name", ParamKind::String, "Post title")
    };
    schema
        .param(name)
        .param(Param::optional("body_md", ParamKind::String, "Post body in markdown"))
        .param(Param::optional("tags", ParamKind::StringList, "Tags"))
        .param(Param::optional("category", ParamKind::String, "Category path"))
}

fn definitions(default_team: &str) -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            SEARCH_POSTS,
            SEARCH_DESCRIPTION,
            ArgumentSchema::new()
                .param(team_param(default_team))
                .param(Param::required("query", ParamKind::String, "Search query"))
                .param(
                    Param::optional("order", ParamKind::OneOf(Order::NAMES), "Result ordering")
                        .with_default(Order::default().as_str()),
                )
                .param(
                    Param::optional("sort", ParamKind::OneOf(Sort::NAMES), "Sort key")
                        .with_default(Sort::default().as_str()),
                )
                .param(
                    Param::optional("page", ParamKind::bounded(Some(1), None), "Page number")
                        .with_default(DEFAULT_PAGE),
                )
                .param(
                    Param::optional(
                        "perPage",
                        ParamKind::bounded(Some(1), Some(i64::from(MAX_PER_PAGE))),
                        "Results per page",
                    )
                    .with_default(DEFAULT_PER_PAGE),
                ),
        ),
        ToolDefinition::new(
            READ_POST,
            "Read a post in esa.io.",
            ArgumentSchema::new()
                .param(team_param(default_team))
                .param(post_number_param()),
        ),
        ToolDefinition::new(
            READ_MULTIPLE_POSTS,
            "Read multiple posts in esa.io.",
            ArgumentSchema::new()
                .param(team_param(default_team))
                .param(Param::required(
                    "postNumbers",
                    ParamKind::bounded_list(Some(1), None),
                    "Post numbers",
                )),
        ),
        ToolDefinition::new(
            CREATE_POST,
            "Create a new post in esa.io. Required parameters: name. Optional parameters: \
             body_md, tags, category, wip (default: true), message.",
            content_params(ArgumentSchema::new().param(team_param(default_team)), true)
                .param(
                    Param::optional("wip", ParamKind::Boolean, "Work in progress")
                        .with_default(true),
                )
                .param(Param::optional("message", ParamKind::String, "Edit message")),
        ),
        ToolDefinition::new(
            UPDATE_POST,
            "Update an existing post in esa.io. Required parameters: postNumber. Optional \
             parameters: name, body_md, tags, category, wip, message.",
            content_params(
                ArgumentSchema::new()
                    .param(team_param(default_team))
                    .param(post_number_param()),
                false,
            )
            .param(Param::optional("wip", ParamKind::Boolean, "Work in progress"))
            .param(Param::optional("message", ParamKind::String, "Edit message")),
        ),
        ToolDefinition::new(
            DELETE_POST,
            "Delete a post in esa.io. Required parameters: postNumber.",
            ArgumentSchema::new()
                .param(team_param(default_team))
                .param(post_number_param()),
        ),
    ]
}

impl ToolRegistry for PostTools {
    fn tools(&self) -> Vec<Tool> {
        self.definitions.iter().map(ToolDefinition::to_tool).collect()
    }

    fn call(&self, name: &str, args: Value) -> Option<ToolFuture> {
        let definition = self.definition(name)?;
        let client = self.client.clone();
        let tool = definition.name;

        match tool {
            SEARCH_POSTS => Some(Box::pin(async move {
                Ok(format_tool(SEARCH_POSTS, async move {
                    let args: SearchArgs = definition.parse(args)?;
                    let params = SearchParams {
                        query: args.query,
                        order: args.order,
                        sort: args.sort,
                        page: args.page,
                        per_page: args.per_page,
                    };
                    let posts = client.search_posts(&args.team_name, &params).await?;
                    Ok(SearchResponse {
                        posts: shape::summarize_all(posts),
                        next_page: u64::from(args.page) + 1,
                    })
                })
                .await)
            })),

            READ_POST => Some(Box::pin(async move {
                Ok(format_tool(READ_POST, async move {
                    let args: PostRef = definition.parse(args)?;
                    let post = client
                        .read_posts(&args.team_name, &[args.post_number])
                        .await?
                        .into_iter()
                        .next()
                        .ok_or_else(|| Error::not_found("post not found"))?;
                    Ok(shape::detail(post))
                })
                .await)
            })),

            READ_MULTIPLE_POSTS => Some(Box::pin(async move {
                Ok(format_tool(READ_MULTIPLE_POSTS, async move {
                    let args: MultiPostRef = definition.parse(args)?;
                    let posts = client.read_posts(&args.team_name, &args.post_numbers).await?;
                    Ok(shape::detail_all(posts))
                })
                .await)
            })),

            CREATE_POST => Some(Box::pin(async move {
                Ok(format_tool(CREATE_POST, async move {
                    let args: CreateArgs = definition.parse(args)?;
                    let post = client.create_post(&args.team_name, &args.post).await?;
                    if let Some(author) = post.created_by() {
                        log::debug!("post {:?} created by {}", post.number(), author.screen_name);
                    }
                    Ok(shape::created(post))
                })
                .await)
            })),

            UPDATE_POST => Some(Box::pin(async move {
                Ok(format_tool(UPDATE_POST, async move {
                    let args: UpdateArgs = definition.parse(args)?;
                    if args.patch.is_empty() {
                        log::debug!("update of post {} carries no fields", args.post_number);
                    }
                    let post = client
                        .update_post(&args.team_name, args.post_number, &args.patch)
                        .await?;
                    log::debug!(
                        "post {} at revision {:?}, updated {:?}",
                        args.post_number,
                        post.revision_number(),
                        post.updated_at()
                    );
                    Ok(shape::updated(post))
                })
                .await)
            })),

            DELETE_POST => Some(Box::pin(async move {
                Ok(format_tool(DELETE_POST, async move {
                    let args: PostRef = definition.parse(args)?;
                    client.delete_post(&args.team_name, args.post_number).await
                })
                .await)
            })),

            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
