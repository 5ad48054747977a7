use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::GitHubConfig;
use crate::error::{CommentsError, Result};
use crate::types::GraphQlResponse;

/// Sends a GraphQL document and returns the raw JSON response.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    async fn post_query(&self, query: &str) -> Result<serde_json::Value>;
}

pub struct GitHubClient {
    client: reqwest::Client,
    config: GitHubConfig,
}

impl GitHubClient {
    /// Resolves the token from `config.token_env_var`. Fails before any
    /// request is made when the variable is not set.
    pub fn with_config(config: GitHubConfig) -> Result<Self> {
        let token = config.resolve_token()?;
        Self::with_token(config, token)
    }

    pub fn with_token(config: GitHubConfig, token: impl AsRef<str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token.as_ref()))
                .map_err(|e| CommentsError::ConfigError(format!("Invalid token: {}", e)))?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| CommentsError::ConfigError(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| CommentsError::ConfigError(format!("Invalid HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl GraphQlTransport for GitHubClient {
    async fn post_query(&self, query: &str) -> Result<serde_json::Value> {
        debug!("POST {} ({} bytes of query)", self.config.graphql_url, query.len());

        let request_body = json!({
            "query": query
        });

        let response = self
            .client
            .post(&self.config.graphql_url)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CommentsError::ApiError(format!(
                "GitHub GraphQL API request failed with {}: {}",
                status, error_text
            )));
        }

        Ok(response.json().await?)
    }
}

/// Decodes the `data` member of a GraphQL response into `T`.
///
/// A non-empty `errors` array is an [`CommentsError::ApiError`]; GitHub
/// reports these with a success status. A missing `data` member or a shape
/// that does not match `T` is a [`CommentsError::MalformedResponse`].
pub fn decode_data<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    let response: GraphQlResponse<T> = serde_json::from_value(value)?;

    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(CommentsError::ApiError(format!(
            "GraphQL query failed: {}",
            messages.join("; ")
        )));
    }

    response
        .data
        .ok_or_else(|| CommentsError::MalformedResponse("response has no data".to_string()))
}
