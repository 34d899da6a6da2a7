//! # Reddit search
//!
//! Thin client over Reddit's public `search.json` listing. Only the fields the
//! discussion digest needs are kept.

use std::{future::Future, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

use crate::{truncate_chars, Thread};

/// A source of community discussion threads that can be searched by topic.
pub trait ThreadSource {
    fn search(&self, query: &str) -> impl Future<Output = anyhow::Result<Vec<Thread>>> + Send;
}

impl<T: ThreadSource + Send + Sync> ThreadSource for &T {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<Thread>> {
        (**self).search(query).await
    }
}

#[derive(Debug, Clone)]
pub struct RedditClient {
    client: reqwest::Client,
    base_url: String,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    title: String,
    #[serde(default)]
    subreddit: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: u64,
    #[serde(default)]
    over_18: bool,
}

impl From<Post> for Thread {
    fn from(post: Post) -> Self {
        Thread {
            title: post.title,
            subreddit: post.subreddit,
            selftext: truncate_chars(post.selftext.trim(), Thread::SELFTEXT_MAX_CHARS),
            score: post.score,
            num_comments: post.num_comments,
        }
    }
}

impl RedditClient {
    pub const BASE_URL: &str = "https://www.reddit.com";
    pub const DEFAULT_LIMIT: usize = 10;
    const TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new() -> anyhow::Result<Self> {
        // Reddit rejects requests without a descriptive user agent
        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .user_agent(concat!(
                "news-ninja/",
                env!("CARGO_PKG_VERSION"),
                " (topic digest bot)"
            ))
            .build()
            .context("Failed to build reddit HTTP client")?;

        Ok(RedditClient {
            client,
            base_url: Self::BASE_URL.into(),
            limit: Self::DEFAULT_LIMIT,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn search_url(&self, query: &str) -> anyhow::Result<Url> {
        let endpoint = format!("{}/search.json", self.base_url.trim_end_matches('/'));
        let limit = self.limit.to_string();
        Url::parse_with_params(
            &endpoint,
            &[
                ("q", query),
                ("sort", "relevance"),
                ("t", "week"),
                ("limit", limit.as_str()),
            ],
        )
        .with_context(|| format!("Invalid reddit URL: {endpoint}"))
    }
}

impl ThreadSource for RedditClient {
    #[tracing::instrument(skip(self))]
    async fn search(&self, query: &str) -> anyhow::Result<Vec<Thread>> {
        let url = self.search_url(query)?;

        let listing = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))
            .context("Failed to request reddit search")?
            .error_for_status()
            .context("Reddit search returned an error status")?
            .json::<Listing>()
            .await
            .context("Failed to decode reddit search listing")?;

        let threads = listing
            .data
            .children
            .into_iter()
            .map(|child| child.data)
            .filter(|post| !post.over_18)
            .take(self.limit)
            .map(Thread::from)
            .collect::<Vec<_>>();

        tracing::debug!(count = threads.len(), "Fetched reddit threads");
        Ok(threads)
    }
}
