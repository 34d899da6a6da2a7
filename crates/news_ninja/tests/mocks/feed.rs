use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use news_ninja::{Article, FeedSource};
use tokio::time::Instant;

#[derive(Clone, Default)]
pub struct MockFeed {
    pub articles: HashMap<String, Vec<Article>>,
    /// topic -> (remaining failures, message)
    pub failures: Arc<Mutex<HashMap<String, (u32, String)>>>,
    pub calls: Arc<Mutex<Vec<(String, Instant)>>>,
}

impl MockFeed {
    pub fn with_articles(mut self, topic: &str, articles: Vec<Article>) -> Self {
        self.articles.insert(topic.to_string(), articles);
        self
    }

    /// Fails the first `times` fetches for `topic`
    pub fn failing(self, topic: &str, times: u32, msg: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(topic.to_string(), (times, msg.to_string()));
        self
    }

    pub fn calls_for(&self, topic: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == topic)
            .count()
    }
}

impl FeedSource for MockFeed {
    async fn fetch(&self, topic: &str) -> anyhow::Result<Vec<Article>> {
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((topic.to_string(), Instant::now()));
            calls.iter().filter(|(t, _)| t == topic).count()
        };

        if let Some((remaining, msg)) = self.failures.lock().unwrap().get_mut(topic) {
            if *remaining > 0 {
                *remaining -= 1;
                anyhow::bail!("{msg} (attempt {attempt})");
            }
        }

        Ok(self.articles.get(topic).cloned().unwrap_or_default())
    }
}
