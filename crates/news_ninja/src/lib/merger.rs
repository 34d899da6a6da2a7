use std::fmt;

use itertools::Itertools;

use crate::{SourceBundle, Topic};

/// Usable context for one topic, labeled by source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicBlock {
    pub topic: Topic,
    pub news: Option<String>,
    pub reddit: Option<String>,
}

impl fmt::Display for TopicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TOPIC: {}", self.topic)?;
        if let Some(news) = &self.news {
            write!(f, "\nNEWS: {news}")?;
        }
        if let Some(reddit) = &self.reddit {
            write!(f, "\nREDDIT: {reddit}")?;
        }
        Ok(())
    }
}

/// What the composer receives after merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergedContext {
    /// Retained topics in request order, never empty
    Topics(Vec<TopicBlock>),
    /// Every topic was dropped
    NoInformation,
}

impl MergedContext {
    pub fn blocks(&self) -> &[TopicBlock] {
        match self {
            MergedContext::Topics(blocks) => blocks,
            MergedContext::NoInformation => &[],
        }
    }

    /// Blocks rendered and separated by blank lines
    pub fn render(&self) -> String {
        self.blocks().iter().join("\n\n")
    }
}

/// Combines per-topic digests into labeled blocks, following `topics` order.
///
/// A topic is kept when at least one source has a usable digest for it. Failed
/// digests never reach the composer.
pub fn merge_sources(
    news: Option<&SourceBundle>,
    discussion: Option<&SourceBundle>,
    topics: &[Topic],
) -> MergedContext {
    let usable = |bundle: Option<&SourceBundle>, topic: &Topic| {
        bundle
            .and_then(|b| b.get(topic))
            .and_then(|digest| digest.context())
            .map(str::to_owned)
    };

    let blocks = topics
        .iter()
        .filter_map(|topic| {
            let news = usable(news, topic);
            let reddit = usable(discussion, topic);
            if news.is_none() && reddit.is_none() {
                tracing::warn!(%topic, "No usable context, dropping topic");
                return None;
            }
            Some(TopicBlock {
                topic: topic.clone(),
                news,
                reddit,
            })
        })
        .collect::<Vec<_>>();

    if blocks.is_empty() {
        MergedContext::NoInformation
    } else {
        MergedContext::Topics(blocks)
    }
}
