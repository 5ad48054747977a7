use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::Arc;

use crate::config::TitleConfig;
use crate::error::{CommentsError, Result};
use crate::types::TitleResult;

pub const NO_TITLE: &str = "No title found";

const TITLE_SELECTOR: &str = "title";

/// Downloads the HTML body of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> anyhow::Result<String>;
}

pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(config: &TitleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CommentsError::ConfigError(format!("Invalid HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> anyhow::Result<String> {
        // Error pages carry titles too, so the status is not checked.
        let body = self.client.get(url).send().await?.text().await?;
        Ok(body)
    }
}

/// Extract the trimmed text of the first `<title>` element.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(TITLE_SELECTOR).ok()?;
    let title = document
        .select(&selector)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

pub struct TitleResolver {
    fetcher: Arc<dyn PageFetcher>,
    concurrency: usize,
}

impl TitleResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, concurrency: usize) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetches at most `concurrency` pages at a time. The output is aligned
    /// with `urls` whatever order the fetches complete in, and a failed fetch
    /// only affects its own entry.
    pub async fn resolve_titles(&self, urls: &[String]) -> Vec<TitleResult> {
        let mut indexed = stream::iter(urls.iter().enumerate())
            .map(|(i, url)| async move { (i, self.resolve_title(url).await) })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        indexed.sort_by_key(|(i, _)| *i);
        indexed.into_iter().map(|(_, result)| result).collect()
    }

    async fn resolve_title(&self, url: &str) -> TitleResult {
        match self.fetcher.fetch_page(url).await {
            Ok(html) => {
                let title = extract_title(&html).unwrap_or_else(|| NO_TITLE.to_string());
                debug!("{} -> {}", url, title);
                TitleResult::new(url, title)
            }
            Err(e) => {
                warn!("Failed to fetch title of {}: {}", url, e);
                TitleResult::new(url, format!("Error: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Serves `<title>{url} | Blog</title>`. URLs containing "hang" take
    /// 300ms, "slow" 100ms, the rest 5ms; "broken" ones fail.
    struct FakeFetcher {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        finished: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                finished: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch_page(&self, url: &str) -> anyhow::Result<String> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let delay = if url.contains("hang") {
                300
            } else if url.contains("slow") {
                100
            } else {
                5
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.finished.lock().unwrap().push(url.to_string());

            if url.contains("broken") {
                anyhow::bail!("operation timed out");
            }
            Ok(format!("<html><head><title>{} | Blog</title></head></html>", url))
        }
    }

    fn urls(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_title() {
        let html = r#"
            <!DOCTYPE html>
            <html>
            <head><title>
                Test Title
            </title></head>
            <body><h1>Hello</h1></body>
            </html>
        "#;
        assert_eq!(extract_title(html), Some("Test Title".to_string()));
    }

    #[test]
    fn test_extract_title_no_title() {
        let html = "<html><head></head><body><h1>Hello</h1></body></html>";
        assert_eq!(extract_title(html), None);
    }

    #[test]
    fn test_extract_title_decodes_entities() {
        let html = "<html><head><title>Tom &amp; Jerry</title></head></html>";
        assert_eq!(extract_title(html), Some("Tom & Jerry".to_string()));
    }

    #[tokio::test]
    async fn test_order_survives_a_slow_middle_fetch() {
        let resolver = TitleResolver::new(Arc::new(FakeFetcher::new()), 10);
        let input = urls(&["a", "b", "slow-c", "d", "e"]);

        let results = resolver.resolve_titles(&input).await;

        assert_eq!(results.len(), input.len());
        for (url, result) in input.iter().zip(&results) {
            assert_eq!(&result.url, url);
            assert_eq!(result.title, format!("{} | Blog", url));
        }
    }

    #[tokio::test]
    async fn test_failure_is_isolated_to_its_position() {
        let resolver = TitleResolver::new(Arc::new(FakeFetcher::new()), 3);
        let input = urls(&["first", "broken-second", "third"]);

        let results = resolver.resolve_titles(&input).await;

        assert_eq!(results[0].title, "first | Blog");
        assert_eq!(results[1].url, "broken-second");
        assert_eq!(results[1].title, "Error: operation timed out");
        assert_eq!(results[2].title, "third | Blog");
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let fetcher = Arc::new(FakeFetcher::new());
        let resolver = TitleResolver::new(fetcher.clone(), 2);
        let input: Vec<String> = (0..8).map(|i| format!("slow-{}", i)).collect();

        let results = resolver.resolve_titles(&input).await;

        assert_eq!(results.len(), 8);
        assert!(fetcher.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_hanging_first_fetch_does_not_stall_the_rest() {
        let fetcher = Arc::new(FakeFetcher::new());
        let resolver = TitleResolver::new(fetcher.clone(), 2);
        let mut input = urls(&["hang-0"]);
        input.extend((1..12).map(|i| format!("fast-{}", i)));

        let results = resolver.resolve_titles(&input).await;

        // The free slot works through every fast page while the first one hangs.
        let finished = fetcher.finished.lock().unwrap().clone();
        assert_eq!(finished.len(), 12);
        assert_eq!(finished.last().map(String::as_str), Some("hang-0"));

        assert_eq!(results.len(), 12);
        for (url, result) in input.iter().zip(&results) {
            assert_eq!(&result.url, url);
        }
        assert_eq!(results[0].title, "hang-0 | Blog");
    }

    #[tokio::test]
    async fn test_empty_input() {
        let resolver = TitleResolver::new(Arc::new(FakeFetcher::new()), 10);
        assert!(resolver.resolve_titles(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_title_uses_sentinel() {
        struct Untitled;

        #[async_trait]
        impl PageFetcher for Untitled {
            async fn fetch_page(&self, _url: &str) -> anyhow::Result<String> {
                Ok("<html><body>no head</body></html>".to_string())
            }
        }

        let resolver = TitleResolver::new(Arc::new(Untitled), 1);
        let results = resolver.resolve_titles(&urls(&["x"])).await;
        assert_eq!(results, vec![TitleResult::new("x", NO_TITLE)]);
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_error_title() {
        let fetcher = HttpPageFetcher::new(&TitleConfig {
            concurrency: 1,
            timeout_seconds: 1,
        })
        .unwrap();
        let resolver = TitleResolver::new(Arc::new(fetcher), 1);

        let results = resolver
            .resolve_titles(&urls(&["http://127.0.0.1:9/unreachable"]))
            .await;

        assert_eq!(results.len(), 1);
        assert!(results[0].title.starts_with("Error: "));
    }
}
