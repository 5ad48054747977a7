use log::{debug, info};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use crate::client::{decode_data, GraphQlTransport};
use crate::error::{CommentsError, Result};
use crate::types::{Comment, DiscussionsData};

/// Reads the discussion-listing GraphQL document.
pub fn load_query(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        CommentsError::ConfigError(format!("Query file not found: {} ({})", path.display(), e))
    })
}

pub struct DiscussionFetcher {
    transport: Arc<dyn GraphQlTransport>,
    query: String,
    website_url: String,
}

impl DiscussionFetcher {
    pub fn new(
        transport: Arc<dyn GraphQlTransport>,
        query: impl Into<String>,
        website_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            query: query.into(),
            website_url: website_url.into(),
        }
    }

    pub async fn fetch_discussions(&self) -> Result<serde_json::Value> {
        info!("Fetching discussions");
        self.transport.post_query(&self.query).await
    }

    /// Flattens the discussions response into comments, in discussion then
    /// comment order, plus the sorted list of unique comment authors.
    pub fn extract_comments(&self, raw: serde_json::Value) -> Result<(Vec<Comment>, Vec<String>)> {
        let data: DiscussionsData = decode_data(raw)?;

        let mut comments = Vec::new();
        let mut authors = BTreeSet::new();

        for discussion in data.repository.discussions.nodes {
            if discussion.comments.total_count == 0 {
                continue;
            }

            let post_url = format!("{}{}", self.website_url, discussion.title);
            debug!(
                "{} has {} comments",
                discussion.title, discussion.comments.total_count
            );

            for comment in discussion.comments.nodes {
                authors.insert(comment.author.login.clone());
                comments.push(Comment {
                    post_url: post_url.clone(),
                    discussion_url: discussion.url.clone(),
                    author: comment.author.login,
                    comment_url: comment.url,
                });
            }
        }

        info!(
            "Collected {} comments from {} authors",
            comments.len(),
            authors.len()
        );

        Ok((comments, authors.into_iter().collect()))
    }
}
