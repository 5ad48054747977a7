use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CommentsError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchConfig {
    pub github: GitHubConfig,
    pub titles: TitleConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    pub token_env_var: String,
    pub graphql_url: String,
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token_env_var: "TOKEN".to_string(),
            graphql_url: "https://api.github.com/graphql".to_string(),
            user_agent: "discussion-comments/0.1.0".to_string(),
        }
    }
}

impl GitHubConfig {
    /// Reads the bearer token from `token_env_var`.
    pub fn resolve_token(&self) -> Result<String> {
        match std::env::var(&self.token_env_var) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(CommentsError::ConfigError(format!(
                "GitHub token not available in environment variable {}",
                self.token_env_var
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleConfig {
    pub concurrency: usize,
    pub timeout_seconds: u64,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            timeout_seconds: 5,
        }
    }
}

impl TitleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Prefix joined with a discussion title to form the post URL.
    pub website_url: String,
    pub query_path: PathBuf,
    pub html_path: PathBuf,
    pub render: RenderConfig,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            website_url: "https://aprd.ir/".to_string(),
            query_path: PathBuf::from("discussion.query"),
            html_path: PathBuf::from("comments.html"),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub heading: String,
    /// Word placed between the author link and the post link.
    pub connector: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            heading: "آخرین دیدگاه‌ها".to_string(),
            connector: "در".to_string(),
        }
    }
}
