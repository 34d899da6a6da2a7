use std::{sync::Arc, time::Duration};

use itertools::Itertools;
use news_feeds::{Article, FeedSource};

use crate::{LanguageModel, Prompt, RateLimiter, RetryPolicy, SourceBundle, Topic, TopicDigest};

/// Fetches headlines per topic and condenses them into speech-ready digests.
///
/// Topics are processed one at a time with a pause between them. Each topic's
/// fetch-and-summarize step is retried as a unit; a topic that still fails is
/// reported as [`TopicDigest::Failed`] without affecting its siblings.
#[derive(Debug)]
pub struct NewsAggregator<F> {
    feed: F,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
    topic_pause: Duration,
}

impl<F> NewsAggregator<F>
where
    F: FeedSource + Send + Sync,
{
    pub fn new(feed: F, limiter: Arc<RateLimiter>) -> Self {
        NewsAggregator {
            feed,
            limiter,
            retry: RetryPolicy::default(),
            topic_pause: Duration::from_secs(1),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_topic_pause(mut self, pause: Duration) -> Self {
        self.topic_pause = pause;
        self
    }

    #[tracing::instrument(skip_all, fields(topics = topics.len(), model = model.model_name()))]
    pub async fn aggregate<M>(&self, model: &M, topics: &[Topic]) -> SourceBundle
    where
        M: LanguageModel + Sync,
    {
        let mut bundle = SourceBundle::default();

        for (idx, topic) in topics.iter().enumerate() {
            if idx > 0 {
                tokio::time::sleep(self.topic_pause).await;
            }

            let digest = self
                .retry
                .retry(|| self.digest_topic(model, topic))
                .await
                .unwrap_or_else(|e| {
                    tracing::error!(error = %e, %topic, "Giving up on topic");
                    TopicDigest::Failed(e.to_string())
                });

            bundle.insert(topic.clone(), digest);
        }

        bundle
    }

    async fn digest_topic<M>(&self, model: &M, topic: &Topic) -> anyhow::Result<TopicDigest>
    where
        M: LanguageModel + Sync,
    {
        self.limiter.acquire().await;

        let articles = self.feed.fetch(topic).await?;
        if articles.is_empty() {
            tracing::info!(%topic, "No articles found");
            return Ok(TopicDigest::NoRecentNews);
        }

        let digest = model
            .complete(Prompt::news_editor(format_headlines(&articles)))
            .await
            .map_err(|e| anyhow::anyhow!("{e}"))?;

        Ok(TopicDigest::Summary(digest))
    }
}

fn format_headlines(articles: &[Article]) -> String {
    articles
        .iter()
        .map(|a| format!("{}\n{}", a.title, a.summary))
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    struct FlakyFeed {
        failures: u32,
        calls: AtomicU32,
    }

    impl FeedSource for FlakyFeed {
        async fn fetch(&self, _topic: &str) -> anyhow::Result<Vec<Article>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                anyhow::bail!("connection reset");
            }
            Ok(vec![Article::new("Headline", "Body")])
        }
    }

    struct Parrot;

    impl LanguageModel for Parrot {
        type Error = String;

        fn model_name(&self) -> &str {
            "parrot"
        }

        async fn complete(&self, prompt: Prompt) -> Result<String, String> {
            Ok(format!("digest of {}", prompt.user.len()))
        }
    }

    fn aggregator(failures: u32) -> NewsAggregator<FlakyFeed> {
        let feed = FlakyFeed {
            failures,
            calls: AtomicU32::new(0),
        };
        NewsAggregator::new(feed, Arc::new(RateLimiter::default()))
    }

    #[test]
    fn test_headlines_are_title_then_summary() {
        let articles = [Article::new("A", "first"), Article::new("B", "second")];
        assert_eq!(format_headlines(&articles), "A\nfirst\n\nB\nsecond");
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failures() {
        let aggregator = aggregator(2);
        let topics = [Topic::new("AI").unwrap()];

        let bundle = aggregator.aggregate(&Parrot, &topics).await;

        assert!(matches!(bundle.get(&topics[0]), Some(TopicDigest::Summary(_))));
        assert_eq!(aggregator.feed.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_mark_topic_failed() {
        let aggregator = aggregator(u32::MAX);
        let topics = [Topic::new("AI").unwrap()];

        let bundle = aggregator.aggregate(&Parrot, &topics).await;

        let digest = bundle.get(&topics[0]).unwrap();
        assert!(digest.is_failed());
        assert_eq!(digest.to_string(), "Error: connection reset");
        assert_eq!(aggregator.feed.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_topics_are_spaced_apart() {
        let aggregator = aggregator(0);
        let topics = [Topic::new("AI").unwrap(), Topic::new("Space").unwrap()];
        let start = tokio::time::Instant::now();

        let bundle = aggregator.aggregate(&Parrot, &topics).await;

        assert_eq!(bundle.len(), 2);
        assert!(start.elapsed() >= Duration::from_secs(1));
    }
}
