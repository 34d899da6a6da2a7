//! # Google News RSS
//!
//! Queries the Google News search feed for a topic and projects each entry
//! to an [`Article`].

use std::time::Duration;

use anyhow::Context;
use feed_rs::model::Entry;
use scraper::Html;
use url::Url;

use crate::{feed::FeedSource, Article};

#[derive(Debug, Clone)]
pub struct GoogleNewsFeed {
    client: reqwest::Client,
    base_url: String,
    max_articles: usize,
}

impl GoogleNewsFeed {
    pub const BASE_URL: &str = "https://news.google.com";
    pub const DEFAULT_MAX_ARTICLES: usize = 10;
    const TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .user_agent(concat!("news-ninja/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build feed HTTP client")?;

        Ok(GoogleNewsFeed {
            client,
            base_url: Self::BASE_URL.into(),
            max_articles: Self::DEFAULT_MAX_ARTICLES,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_articles(mut self, max_articles: usize) -> Self {
        self.max_articles = max_articles;
        self
    }

    /// Builds the search feed URL, form-encoding the topic (spaces become `+`)
    pub fn search_url(&self, topic: &str) -> anyhow::Result<Url> {
        let endpoint = format!("{}/rss/search", self.base_url.trim_end_matches('/'));
        Url::parse_with_params(
            &endpoint,
            &[("q", topic), ("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")],
        )
        .with_context(|| format!("Invalid feed URL: {endpoint}"))
    }

    async fn fetch_feed(&self, topic: &str) -> anyhow::Result<Vec<Article>> {
        if topic.trim().is_empty() {
            anyhow::bail!("Topic must not be empty");
        }

        let url = self.search_url(topic)?;
        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to request RSS feed")?
            .error_for_status()
            .context("RSS feed returned an error status")?
            .bytes()
            .await
            .context("Failed to read RSS feed body")?;

        let feed = feed_rs::parser::parse(&bytes[..]).context("Failed to parse RSS feed")?;

        Ok(project_entries(feed.entries, self.max_articles))
    }
}

impl FeedSource for GoogleNewsFeed {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, topic: &str) -> anyhow::Result<Vec<Article>> {
        match self.fetch_feed(topic).await {
            Ok(articles) => {
                tracing::debug!(count = articles.len(), "Fetched articles");
                Ok(articles)
            }
            Err(e) => {
                tracing::warn!(error = ?e, "RSS fetch failed, reporting no articles");
                Ok(Vec::new())
            }
        }
    }
}

fn project_entries(entries: Vec<Entry>, max_articles: usize) -> Vec<Article> {
    entries
        .into_iter()
        .take(max_articles)
        .map(|entry| {
            let title = entry.title.map(|t| t.content).unwrap_or_default();
            let summary = entry
                .summary
                .map(|s| strip_markup(&s.content))
                .unwrap_or_default();
            Article::new(title, summary)
        })
        .collect()
}

/// Reduces an HTML fragment to its visible text with collapsed whitespace
fn strip_markup(fragment: &str) -> String {
    let html = Html::parse_fragment(fragment);
    let text = html.root_element().text().collect::<String>();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
