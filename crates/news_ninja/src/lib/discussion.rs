use std::{future::Future, time::Duration};

use itertools::Itertools;
use news_feeds::{Thread, ThreadSource};

use crate::{LanguageModel, Prompt, SourceBundle, Topic, TopicDigest};

/// Capability for producing per-topic digests of community discussion.
///
/// Selected at wiring time: [`RedditDiscussion`] when discussion is enabled,
/// [`NoDiscussion`] otherwise.
pub trait DiscussionSource {
    /// Whether this source can produce real digests
    fn is_available(&self) -> bool;

    fn discuss(
        &self,
        topics: &[Topic],
    ) -> impl Future<Output = anyhow::Result<SourceBundle>> + Send;
}

/// Reports every topic as unavailable without touching the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiscussion;

impl DiscussionSource for NoDiscussion {
    fn is_available(&self) -> bool {
        false
    }

    async fn discuss(&self, topics: &[Topic]) -> anyhow::Result<SourceBundle> {
        Ok(SourceBundle::uniform(topics, TopicDigest::Unavailable))
    }
}

/// Searches a thread source per topic and condenses the threads with a language model.
#[derive(Debug)]
pub struct RedditDiscussion<C, M> {
    threads: C,
    model: M,
    topic_pause: Duration,
}

impl<C, M> RedditDiscussion<C, M>
where
    C: ThreadSource + Send + Sync,
    M: LanguageModel + Send + Sync,
{
    pub fn new(threads: C, model: M) -> Self {
        RedditDiscussion {
            threads,
            model,
            topic_pause: Duration::from_secs(1),
        }
    }

    pub fn with_topic_pause(mut self, pause: Duration) -> Self {
        self.topic_pause = pause;
        self
    }

    async fn digest_topic(&self, topic: &Topic) -> anyhow::Result<TopicDigest> {
        let threads = self.threads.search(topic).await?;
        if threads.is_empty() {
            return Ok(TopicDigest::NoRecentNews);
        }

        let digest = self
            .model
            .complete(Prompt::discussion_analyst(format_threads(topic, &threads)))
            .await
            .map_err(|e| anyhow::anyhow!("{e}"))?;

        Ok(TopicDigest::Summary(digest))
    }
}

impl<C, M> DiscussionSource for RedditDiscussion<C, M>
where
    C: ThreadSource + Send + Sync,
    M: LanguageModel + Send + Sync,
{
    fn is_available(&self) -> bool {
        true
    }

    #[tracing::instrument(skip_all, fields(topics = topics.len()))]
    async fn discuss(&self, topics: &[Topic]) -> anyhow::Result<SourceBundle> {
        let mut bundle = SourceBundle::default();

        for (idx, topic) in topics.iter().enumerate() {
            if idx > 0 {
                tokio::time::sleep(self.topic_pause).await;
            }

            let digest = self.digest_topic(topic).await.unwrap_or_else(|e| {
                tracing::error!(error = %e, %topic, "Failed to digest discussion");
                TopicDigest::Failed(e.to_string())
            });
            bundle.insert(topic.clone(), digest);
        }

        Ok(bundle)
    }
}

fn format_threads(topic: &Topic, threads: &[Thread]) -> String {
    let body = threads
        .iter()
        .map(|t| {
            let mut entry = format!(
                "r/{} ({} points, {} comments): {}",
                t.subreddit, t.score, t.num_comments, t.title
            );
            if !t.selftext.is_empty() {
                entry.push('\n');
                entry.push_str(&t.selftext);
            }
            entry
        })
        .join("\n\n");

    format!("Discussions about {topic}:\n\n{body}")
}
