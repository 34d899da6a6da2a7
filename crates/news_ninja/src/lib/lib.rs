mod aggregator;
pub mod blocking;
mod composer;
mod discussion;
mod error;
mod limiter;
mod llm;
mod merger;
mod processor;
mod renderer;
mod retry;
pub mod server;
pub mod tracing;
pub mod tts;
pub mod types;

pub use aggregator::NewsAggregator;
pub use composer::{compose_broadcast, NO_INFORMATION};
pub use discussion::{DiscussionSource, NoDiscussion, RedditDiscussion};
pub use error::Error;
pub use limiter::RateLimiter;
pub use llm::{openai, LanguageModel, Prompt};
pub use merger::{merge_sources, MergedContext, TopicBlock};
pub use processor::{builder::BroadcasterBuilder, Broadcast, Broadcaster};
pub use renderer::{AudioArtifact, AudioRenderer};
pub use retry::RetryPolicy;
pub use tts::SpeechSynthesizer;
pub use types::{BroadcastRequest, SourceBundle, SourceType, Topic, TopicDigest};

pub use news_feeds::{Article, FeedSource, GoogleNewsFeed, RedditClient, Thread, ThreadSource};
