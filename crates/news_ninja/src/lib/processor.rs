pub mod builder;

use crate::{
    compose_broadcast, merge_sources, AudioRenderer, BroadcastRequest, DiscussionSource, Error,
    FeedSource, LanguageModel, NewsAggregator, SourceBundle, SourceType, SpeechSynthesizer, Topic,
    TopicDigest,
};

/// A finished broadcast: the spoken script and its encoded audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Broadcast {
    pub script: String,
    pub audio: Vec<u8>,
}

// Topics in, audio out
#[derive(Debug)]
pub struct Broadcaster<F, M, D, S>
where
    F: FeedSource + Send + Sync,
    M: LanguageModel + Send + Sync,
    D: DiscussionSource + Send + Sync,
    S: SpeechSynthesizer + Send + Sync,
{
    aggregator: NewsAggregator<F>,
    model: M,
    discussion: D,
    renderer: AudioRenderer<S>,
    language: String,
}

impl<F, M, D, S> Broadcaster<F, M, D, S>
where
    F: FeedSource + Send + Sync,
    M: LanguageModel + Send + Sync,
    D: DiscussionSource + Send + Sync,
    S: SpeechSynthesizer + Send + Sync,
{
    /// Whether community discussion can contribute real digests
    pub fn reddit_available(&self) -> bool {
        self.discussion.is_available()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Gathers digests for the requested sources, tolerating per-topic and
    /// discussion failures.
    #[tracing::instrument(skip(self, topics), fields(topics = topics.len()))]
    async fn gather(
        &self,
        topics: &[Topic],
        source_type: SourceType,
    ) -> (Option<SourceBundle>, Option<SourceBundle>) {
        let news = if source_type.includes_news() {
            Some(self.aggregator.aggregate(&self.model, topics).await)
        } else {
            None
        };

        let discussion = if source_type.includes_discussion() {
            let bundle = self
                .discussion
                .discuss(topics)
                .await
                .unwrap_or_else(|e| {
                    tracing::error!(error = ?e, "Discussion source failed, marking unavailable");
                    SourceBundle::uniform(topics, TopicDigest::Unavailable)
                });
            Some(bundle)
        } else {
            None
        };

        (news, discussion)
    }

    /// Runs the whole pipeline for one request.
    ///
    /// Only an invalid request, a failed composition or a failed rendering
    /// abort the broadcast; everything upstream degrades per topic.
    #[tracing::instrument(skip_all, fields(source_type = ?request.source_type))]
    pub async fn run(&self, request: &BroadcastRequest) -> Result<Broadcast, Error> {
        let topics = request.topics()?;
        tracing::info!(?topics, "Starting broadcast");

        let (news, discussion) = self.gather(&topics, request.source_type).await;
        let context = merge_sources(news.as_ref(), discussion.as_ref(), &topics);

        let script = compose_broadcast(&self.model, &context).await?;

        let artifact = self
            .renderer
            .render(&script, &self.language)
            .await
            .ok_or(Error::Rendering)?;
        let audio = artifact
            .consume()
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to read rendered audio"))?;

        tracing::info!(bytes = audio.len(), "Broadcast ready");
        Ok(Broadcast { script, audio })
    }
}
