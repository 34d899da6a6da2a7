use serde::{Deserialize, Serialize};

/// A single feed entry reduced to what the summarizer needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub summary: String,
}

impl Article {
    pub const SUMMARY_MAX_CHARS: usize = 200;

    /// Builds an article, truncating `summary` to [`Article::SUMMARY_MAX_CHARS`] characters
    pub fn new(title: impl Into<String>, summary: impl AsRef<str>) -> Self {
        Article {
            title: title.into(),
            summary: truncate_chars(summary.as_ref(), Self::SUMMARY_MAX_CHARS),
        }
    }
}

/// A discussion thread returned by a community search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub title: String,
    pub subreddit: String,
    pub selftext: String,
    pub score: i64,
    pub num_comments: u64,
}

impl Thread {
    pub const SELFTEXT_MAX_CHARS: usize = 300;
}

/// Returns at most `max` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
