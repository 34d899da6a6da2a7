//! Synchronous front for callers without an async runtime.
//!
//! Every suspension point in the pipeline (rate limiting, topic pauses, retry
//! waits) becomes a real blocking wait on the calling thread.

use crate::{
    Broadcast, BroadcastRequest, DiscussionSource, Error, FeedSource, LanguageModel,
    SpeechSynthesizer,
};

#[derive(Debug)]
pub struct Broadcaster<F, M, D, S>
where
    F: FeedSource + Send + Sync,
    M: LanguageModel + Send + Sync,
    D: DiscussionSource + Send + Sync,
    S: SpeechSynthesizer + Send + Sync,
{
    inner: crate::Broadcaster<F, M, D, S>,
    runtime: tokio::runtime::Runtime,
}

impl<F, M, D, S> Broadcaster<F, M, D, S>
where
    F: FeedSource + Send + Sync,
    M: LanguageModel + Send + Sync,
    D: DiscussionSource + Send + Sync,
    S: SpeechSynthesizer + Send + Sync,
{
    /// Wraps `inner` with its own single-threaded runtime.
    ///
    /// Must not be called (nor [`Broadcaster::run`]) from within an async context.
    pub fn new(inner: crate::Broadcaster<F, M, D, S>) -> Result<Self, Error> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Broadcaster { inner, runtime })
    }

    pub fn reddit_available(&self) -> bool {
        self.inner.reddit_available()
    }

    /// Blocks until the broadcast is produced or fails
    pub fn run(&self, request: &BroadcastRequest) -> Result<Broadcast, Error> {
        self.runtime.block_on(self.inner.run(request))
    }
}
