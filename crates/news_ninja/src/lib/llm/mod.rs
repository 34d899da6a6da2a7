pub mod openai;

use std::{fmt, future::Future};

/// A single chat-style completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Prompt {
    /// Headlines block to a terse, speech-ready digest for one topic
    pub fn news_editor(headlines: impl Into<String>) -> Self {
        Prompt {
            system: include_str!("./prompts/news_editor.txt").trim().into(),
            user: headlines.into(),
            temperature: 0.4,
            max_tokens: 1000,
        }
    }

    /// Discussion threads to a spoken-style digest of community sentiment
    pub fn discussion_analyst(threads: impl Into<String>) -> Self {
        Prompt {
            system: include_str!("./prompts/discussion_analyst.txt").trim().into(),
            user: threads.into(),
            temperature: 0.4,
            max_tokens: 1000,
        }
    }

    /// Merged topic blocks to one broadcast script covering every topic
    pub fn broadcast_anchor(topic_blocks: impl AsRef<str>) -> Self {
        Prompt {
            system: include_str!("./prompts/broadcast_anchor.txt").trim().into(),
            user: format!("Create broadcast:\n\n{}", topic_blocks.as_ref()),
            temperature: 0.3,
            max_tokens: 4000,
        }
    }
}

/// An opaque language-model service.
pub trait LanguageModel {
    type Error: fmt::Debug + fmt::Display + Send + Sync + 'static;

    fn model_name(&self) -> &str;

    fn complete(&self, prompt: Prompt) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

impl<T: LanguageModel + Send + Sync> LanguageModel for &T {
    type Error = T::Error;

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    async fn complete(&self, prompt: Prompt) -> Result<String, Self::Error> {
        (**self).complete(prompt).await
    }
}
