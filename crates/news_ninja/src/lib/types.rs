use std::{collections::HashMap, fmt, ops::Deref};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A caller-supplied subject used to query the feed and discussion sources.
///
/// Always trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, Error> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidRequest("topic must not be blank".into()));
        }
        Ok(Topic(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Topic {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Topic {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Topic::new(value)
    }
}

impl From<Topic> for String {
    fn from(value: Topic) -> Self {
        value.0
    }
}

/// Which sources contribute to a broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    News,
    Reddit,
    Both,
}

impl SourceType {
    pub fn includes_news(self) -> bool {
        matches!(self, SourceType::News | SourceType::Both)
    }

    pub fn includes_discussion(self) -> bool {
        matches!(self, SourceType::Reddit | SourceType::Both)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastRequest {
    pub topics: Vec<String>,
    #[serde(default)]
    pub source_type: SourceType,
}

impl BroadcastRequest {
    pub fn new<I, T>(topics: I, source_type: SourceType) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        BroadcastRequest {
            topics: topics.into_iter().map(Into::into).collect(),
            source_type,
        }
    }

    /// Validates the raw topics, dropping repeats while keeping first-seen order
    pub fn topics(&self) -> Result<Vec<Topic>, Error> {
        let topics = self
            .topics
            .iter()
            .map(Topic::new)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .unique()
            .collect::<Vec<_>>();

        if topics.is_empty() {
            return Err(Error::InvalidRequest("at least one topic is required".into()));
        }

        Ok(topics)
    }
}

/// The condensed outcome for one topic from one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum TopicDigest {
    /// Narrative produced by the language model
    Summary(String),
    /// The source answered but had nothing for this topic
    NoRecentNews,
    /// The source is not wired in this deployment
    Unavailable,
    /// Fetching or summarizing failed; never forwarded as content
    Failed(String),
}

impl TopicDigest {
    pub const NO_RECENT_NEWS: &str = "No recent news found.";
    pub const UNAVAILABLE: &str = "Reddit discussions not available.";

    pub fn is_failed(&self) -> bool {
        matches!(self, TopicDigest::Failed(_))
    }

    /// Text that may be handed to the composer, `None` for failed or blank digests
    pub fn context(&self) -> Option<&str> {
        match self {
            TopicDigest::Summary(text) if !text.trim().is_empty() => Some(text.trim()),
            TopicDigest::Summary(_) | TopicDigest::Failed(_) => None,
            TopicDigest::NoRecentNews => Some(Self::NO_RECENT_NEWS),
            TopicDigest::Unavailable => Some(Self::UNAVAILABLE),
        }
    }
}

impl fmt::Display for TopicDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicDigest::Summary(text) => f.write_str(text),
            TopicDigest::NoRecentNews => f.write_str(Self::NO_RECENT_NEWS),
            TopicDigest::Unavailable => f.write_str(Self::UNAVAILABLE),
            TopicDigest::Failed(message) => write!(f, "Error: {message}"),
        }
    }
}

/// Per-source map from topic to digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceBundle {
    digests: HashMap<Topic, TopicDigest>,
}

impl SourceBundle {
    /// A bundle reporting the same digest for every topic
    pub fn uniform(topics: &[Topic], digest: TopicDigest) -> Self {
        topics.iter().map(|t| (t.clone(), digest.clone())).collect()
    }

    pub fn insert(&mut self, topic: Topic, digest: TopicDigest) {
        self.digests.insert(topic, digest);
    }

    pub fn get(&self, topic: &Topic) -> Option<&TopicDigest> {
        self.digests.get(topic)
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Topic, &TopicDigest)> {
        self.digests.iter()
    }
}

impl FromIterator<(Topic, TopicDigest)> for SourceBundle {
    fn from_iter<I: IntoIterator<Item = (Topic, TopicDigest)>>(iter: I) -> Self {
        SourceBundle {
            digests: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_is_trimmed_and_rejects_blank() {
        assert_eq!(Topic::new("  AI  ").unwrap().as_str(), "AI");
        assert!(matches!(Topic::new("   "), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_request_topics_dedupes_in_order() {
        let request = BroadcastRequest::new(["AI", "Space", " AI", "Climate"], SourceType::News);
        let topics = request.topics().unwrap();
        let names = topics.iter().map(Topic::as_str).collect::<Vec<_>>();
        assert_eq!(names, ["AI", "Space", "Climate"]);
    }

    #[test]
    fn test_request_without_topics_is_invalid() {
        let request = BroadcastRequest::new(Vec::<String>::new(), SourceType::Both);
        assert!(matches!(request.topics(), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_request_deserializes_with_default_source() {
        let request: BroadcastRequest = serde_json::from_str(r#"{"topics": ["AI"]}"#).unwrap();
        assert_eq!(request.source_type, SourceType::News);

        let request: BroadcastRequest =
            serde_json::from_str(r#"{"topics": ["AI"], "source_type": "both"}"#).unwrap();
        assert!(request.source_type.includes_news());
        assert!(request.source_type.includes_discussion());
    }

    #[test]
    fn test_failed_digest_renders_error_prefix_and_has_no_context() {
        let digest = TopicDigest::Failed("feed timed out".into());
        assert!(digest.to_string().starts_with("Error:"));
        assert!(digest.to_string().contains("feed timed out"));
        assert_eq!(digest.context(), None);
    }

    #[test]
    fn test_markers_are_usable_context() {
        assert_eq!(
            TopicDigest::NoRecentNews.context(),
            Some(TopicDigest::NO_RECENT_NEWS)
        );
        assert_eq!(
            TopicDigest::Unavailable.context(),
            Some(TopicDigest::UNAVAILABLE)
        );
        assert_eq!(TopicDigest::Summary("   ".into()).context(), None);
    }

    #[test]
    fn test_uniform_bundle_covers_every_topic() {
        let topics = vec![Topic::new("AI").unwrap(), Topic::new("Space").unwrap()];
        let bundle = SourceBundle::uniform(&topics, TopicDigest::Unavailable);
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.get(&topics[1]), Some(&TopicDigest::Unavailable));
    }
}
