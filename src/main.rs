use clap::Parser;
use std::path::PathBuf;

use discussion_comments::{CommentsExtractorBuilder, RenderConfig};

/// Render the latest GitHub Discussions comments of a blog as an HTML snippet.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File holding the discussion-listing GraphQL query.
    #[arg(long, default_value = "discussion.query")]
    query: PathBuf,

    /// Prefix joined with each discussion title to form the post URL.
    #[arg(long, default_value = "https://aprd.ir/")]
    website_url: String,

    /// Where the HTML fragment is written.
    #[arg(long, default_value = "comments.html")]
    output: PathBuf,

    /// Environment variable holding the GitHub token.
    #[arg(long, default_value = "TOKEN")]
    token_env: String,

    /// GraphQL endpoint.
    #[arg(long, default_value = "https://api.github.com/graphql")]
    graphql_url: String,

    /// Maximum number of post pages fetched at once.
    #[arg(long, default_value_t = 10)]
    concurrency: usize,

    /// Timeout for each post page request in seconds.
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// Heading of the comment list.
    #[arg(long)]
    heading: Option<String>,

    /// Word placed between the author and the post title.
    #[arg(long)]
    connector: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let render = RenderConfig::default();

    let builder = CommentsExtractorBuilder::new()
        .query_path(cli.query)
        .website_url(cli.website_url)
        .html_path(cli.output)
        .token_env_var(cli.token_env)
        .graphql_url(cli.graphql_url)
        .concurrency(cli.concurrency)
        .timeout(cli.timeout)
        .heading(cli.heading.unwrap_or(render.heading))
        .connector(cli.connector.unwrap_or(render.connector));

    let result = match builder.build() {
        Ok(extractor) => extractor.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            print!("{}", report.text);
            Ok(())
        }
        Err(e) if e.is_reportable() => {
            println!("Error: {}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
