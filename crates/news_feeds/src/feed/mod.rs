pub mod google;

use std::future::Future;

use crate::Article;

/// A source of news articles that can be queried by topic.
///
/// Implementations own their failure policy: the production feed swallows
/// transport and parse errors and reports an empty result, while an `Err`
/// is reserved for callers that want the failure to surface.
pub trait FeedSource {
    fn fetch(&self, topic: &str) -> impl Future<Output = anyhow::Result<Vec<Article>>> + Send;
}

impl<T: FeedSource + Send + Sync> FeedSource for &T {
    async fn fetch(&self, topic: &str) -> anyhow::Result<Vec<Article>> {
        (**self).fetch(topic).await
    }
}

impl<T: FeedSource + Send + Sync> FeedSource for std::sync::Arc<T> {
    async fn fetch(&self, topic: &str) -> anyhow::Result<Vec<Article>> {
        (**self).fetch(topic).await
    }
}
