use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommentsError {
    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unexpected GraphQL response: {0}")]
    MalformedResponse(String),

    #[error("No author information for {0}")]
    MissingAuthor(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CommentsError {
    /// Errors that are reported to the user without failing the process.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, CommentsError::IoError(_))
    }
}

impl From<reqwest::Error> for CommentsError {
    fn from(e: reqwest::Error) -> Self {
        CommentsError::ApiError(format!("Failed to query GitHub API: {}", e))
    }
}

impl From<serde_json::Error> for CommentsError {
    fn from(e: serde_json::Error) -> Self {
        CommentsError::MalformedResponse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CommentsError>;
