use serde::{Deserialize, Serialize};

/// One discussion comment, flattened out of the discussions query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub post_url: String,
    pub discussion_url: String,
    /// Handle of the commenting account.
    pub author: String,
    pub comment_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub name: Option<String>,
    pub url: String,
}

/// Title scraped from a post page. `title` holds an `Error: ...` description
/// when the page could not be fetched or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleResult {
    pub url: String,
    pub title: String,
}

impl TitleResult {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscussionsData {
    pub repository: RepositoryNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryNode {
    pub discussions: DiscussionConnection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscussionConnection {
    pub nodes: Vec<DiscussionNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscussionNode {
    pub title: String,
    pub url: String,
    pub comments: CommentConnection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentConnection {
    pub total_count: u64,
    pub nodes: Vec<CommentNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentNode {
    pub author: ActorNode,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActorNode {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserNode {
    pub login: String,
    pub name: Option<String>,
    pub url: String,
}
