use std::sync::{Arc, Mutex};

use news_ninja::{DiscussionSource, SourceBundle, Topic, TopicDigest};

#[derive(Clone)]
pub struct MockDiscussion {
    pub digest: String,
    pub calls: Arc<Mutex<Vec<Vec<Topic>>>>,
    pub fail_with: Option<String>,
}

impl MockDiscussion {
    pub fn new(digest: &str) -> Self {
        Self {
            digest: digest.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            digest: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl DiscussionSource for MockDiscussion {
    fn is_available(&self) -> bool {
        true
    }

    async fn discuss(&self, topics: &[Topic]) -> anyhow::Result<SourceBundle> {
        self.calls.lock().unwrap().push(topics.to_vec());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(SourceBundle::uniform(
            topics,
            TopicDigest::Summary(self.digest.clone()),
        ))
    }
}
