//! # News Feeds
//!
//! External content adapters for the news broadcaster: the Google News RSS
//! search feed and the Reddit search client.
//!
//! Both adapters are read-only and stateless apart from their HTTP client.
//! Callers talk to the feed through the [`FeedSource`] trait so the processing
//! crate can swap in fakes during testing.

mod domain;
pub mod feed;
pub mod reddit;

pub use domain::{truncate_chars, Article, Thread};
pub use feed::{google::GoogleNewsFeed, FeedSource};
pub use reddit::{RedditClient, ThreadSource};
