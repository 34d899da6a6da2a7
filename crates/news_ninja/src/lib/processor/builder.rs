use std::{path::PathBuf, sync::Arc, time::Duration};

use crate::{
    AudioRenderer, Broadcaster, DiscussionSource, FeedSource, LanguageModel, NewsAggregator,
    NoDiscussion, RateLimiter, RetryPolicy, SpeechSynthesizer,
};

pub struct BroadcasterBuilder<F = (), M = (), D = NoDiscussion, S = ()> {
    audio_dir: PathBuf,
    feed: F,
    model: M,
    discussion: D,
    speech: S,
    limiter: Option<Arc<RateLimiter>>,
    retry: RetryPolicy,
    topic_pause: Duration,
    language: String,
}

impl BroadcasterBuilder {
    pub fn new(audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            audio_dir: audio_dir.into(),
            feed: (),
            model: (),
            discussion: NoDiscussion,
            speech: (),
            limiter: None,
            retry: RetryPolicy::default(),
            topic_pause: Duration::from_secs(1),
            language: "en".to_string(),
        }
    }
}

impl<F, M, D, S> BroadcasterBuilder<F, M, D, S> {
    pub fn feed<F2: FeedSource + Send + Sync>(self, feed: F2) -> BroadcasterBuilder<F2, M, D, S> {
        BroadcasterBuilder {
            audio_dir: self.audio_dir,
            feed,
            model: self.model,
            discussion: self.discussion,
            speech: self.speech,
            limiter: self.limiter,
            retry: self.retry,
            topic_pause: self.topic_pause,
            language: self.language,
        }
    }

    pub fn model<M2: LanguageModel + Send + Sync>(
        self,
        model: M2,
    ) -> BroadcasterBuilder<F, M2, D, S> {
        BroadcasterBuilder {
            audio_dir: self.audio_dir,
            feed: self.feed,
            model,
            discussion: self.discussion,
            speech: self.speech,
            limiter: self.limiter,
            retry: self.retry,
            topic_pause: self.topic_pause,
            language: self.language,
        }
    }

    pub fn discussion<D2: DiscussionSource + Send + Sync>(
        self,
        discussion: D2,
    ) -> BroadcasterBuilder<F, M, D2, S> {
        BroadcasterBuilder {
            audio_dir: self.audio_dir,
            feed: self.feed,
            model: self.model,
            discussion,
            speech: self.speech,
            limiter: self.limiter,
            retry: self.retry,
            topic_pause: self.topic_pause,
            language: self.language,
        }
    }

    pub fn speech<S2: SpeechSynthesizer + Send + Sync>(
        self,
        speech: S2,
    ) -> BroadcasterBuilder<F, M, D, S2> {
        BroadcasterBuilder {
            audio_dir: self.audio_dir,
            feed: self.feed,
            model: self.model,
            discussion: self.discussion,
            speech,
            limiter: self.limiter,
            retry: self.retry,
            topic_pause: self.topic_pause,
            language: self.language,
        }
    }

    /// Shares a process-wide limiter; a fresh default one is created otherwise
    pub fn rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn topic_pause(mut self, pause: Duration) -> Self {
        self.topic_pause = pause;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

impl<F, M, D, S> BroadcasterBuilder<F, M, D, S>
where
    F: FeedSource + Send + Sync,
    M: LanguageModel + Send + Sync,
    D: DiscussionSource + Send + Sync,
    S: SpeechSynthesizer + Send + Sync,
{
    pub fn build(self) -> Broadcaster<F, M, D, S> {
        let limiter = self
            .limiter
            .unwrap_or_else(|| Arc::new(RateLimiter::default()));

        Broadcaster {
            aggregator: NewsAggregator::new(self.feed, limiter)
                .with_retry(self.retry)
                .with_topic_pause(self.topic_pause),
            model: self.model,
            discussion: self.discussion,
            renderer: AudioRenderer::new(self.speech, self.audio_dir),
            language: self.language,
        }
    }
}
