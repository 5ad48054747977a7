pub mod authors;
pub mod client;
pub mod config;
pub mod discussion;
pub mod error;
pub mod render;
pub mod titles;
pub mod types;

#[cfg(test)]
mod testing;

use log::info;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

pub use authors::{build_user_query, AuthorResolver};
pub use client::{GitHubClient, GraphQlTransport};
pub use config::{FetchConfig, GitHubConfig, OutputConfig, RenderConfig, TitleConfig};
pub use discussion::{load_query, DiscussionFetcher};
pub use error::{CommentsError, Result};
pub use render::{clean_title, display_name, render_html, render_report, write_html};
pub use titles::{extract_title, HttpPageFetcher, PageFetcher, TitleResolver, NO_TITLE};
pub use types::{AuthorInfo, Comment, TitleResult};

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct Report {
    pub comments: Vec<Comment>,
    pub titles: Vec<TitleResult>,
    pub authors: HashMap<String, AuthorInfo>,
    pub html: String,
    pub text: String,
}

/// Runs discussion fetch, author resolution, title resolution and rendering
/// one after the other.
pub struct CommentsExtractor {
    discussions: DiscussionFetcher,
    authors: AuthorResolver,
    titles: TitleResolver,
    output: OutputConfig,
}

impl CommentsExtractor {
    /// Builds the GitHub client first so a missing token is reported before
    /// the query file is read or anything is sent.
    pub fn with_config(config: FetchConfig) -> Result<Self> {
        let transport: Arc<dyn GraphQlTransport> =
            Arc::new(GitHubClient::with_config(config.github)?);
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(&config.titles)?);
        let query = load_query(&config.output.query_path)?;

        Ok(Self::from_parts(
            transport,
            fetcher,
            query,
            config.titles.concurrency,
            config.output,
        ))
    }

    pub fn from_parts(
        transport: Arc<dyn GraphQlTransport>,
        fetcher: Arc<dyn PageFetcher>,
        query: impl Into<String>,
        concurrency: usize,
        output: OutputConfig,
    ) -> Self {
        Self {
            discussions: DiscussionFetcher::new(
                transport.clone(),
                query,
                output.website_url.clone(),
            ),
            authors: AuthorResolver::new(transport),
            titles: TitleResolver::new(fetcher, concurrency),
            output,
        }
    }

    /// Produces the HTML fragment and console report without touching disk.
    pub async fn collect(&self) -> Result<Report> {
        let raw = self.discussions.fetch_discussions().await?;
        let (comments, authors) = self.discussions.extract_comments(raw)?;
        let authors = self.authors.resolve(&authors).await?;

        if let Some(comment) = comments.iter().find(|c| !authors.contains_key(&c.author)) {
            return Err(CommentsError::MissingAuthor(comment.author.clone()));
        }

        let urls: Vec<String> = comments.iter().map(|c| c.post_url.clone()).collect();
        info!("Resolving titles of {} posts", urls.len());
        let titles = self.titles.resolve_titles(&urls).await;

        let html = render_html(&comments, &titles, &authors, &self.output.render)?;
        let text = render_report(&comments, &titles, &authors)?;

        Ok(Report {
            comments,
            titles,
            authors,
            html,
            text,
        })
    }

    /// Collects and writes the HTML fragment to the configured output path.
    pub async fn run(&self) -> Result<Report> {
        let report = self.collect().await?;
        write_html(&self.output.html_path, &report.html)?;
        Ok(report)
    }
}

pub struct CommentsExtractorBuilder {
    config: FetchConfig,
}

impl CommentsExtractorBuilder {
    pub fn new() -> Self {
        Self {
            config: FetchConfig::default(),
        }
    }

    pub fn token_env_var(mut self, var_name: impl Into<String>) -> Self {
        self.config.github.token_env_var = var_name.into();
        self
    }

    pub fn graphql_url(mut self, url: impl Into<String>) -> Self {
        self.config.github.graphql_url = url.into();
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.github.user_agent = agent.into();
        self
    }

    pub fn website_url(mut self, url: impl Into<String>) -> Self {
        self.config.output.website_url = url.into();
        self
    }

    pub fn query_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output.query_path = path.into();
        self
    }

    pub fn html_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output.html_path = path.into();
        self
    }

    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.config.output.render.heading = heading.into();
        self
    }

    pub fn connector(mut self, connector: impl Into<String>) -> Self {
        self.config.output.render.connector = connector.into();
        self
    }

    pub fn concurrency(mut self, workers: usize) -> Self {
        self.config.titles.concurrency = workers;
        self
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.titles.timeout_seconds = seconds;
        self
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn build(self) -> Result<CommentsExtractor> {
        CommentsExtractor::with_config(self.config)
    }
}

impl Default for CommentsExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
