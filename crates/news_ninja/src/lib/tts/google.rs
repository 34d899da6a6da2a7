use std::{sync::LazyLock, time::Duration};

use itertools::Itertools;
use regex::Regex;

use crate::tts::SpeechSynthesizer;

/// Clause-ending punctuation; only counts when followed by whitespace or the end
/// of the text, so `3.5` and `1,200` stay whole
static CLAUSE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?;:,]+(?:\s+|$)").unwrap());

/// Google Translate's public speech endpoint, returning MP3.
#[derive(Debug, Clone)]
pub struct GoogleTts {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Nothing to speak: text is empty")]
    EmptyText,
    #[error("TTS service returned no audio")]
    EmptyAudio,
}

impl GoogleTts {
    pub const BASE_URL: &str = "https://translate.google.com";
    /// The endpoint rejects longer inputs
    pub const MAX_CHUNK_CHARS: usize = 100;
    const TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new() -> Result<Self, TtsError> {
        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) news-ninja")
            .build()?;

        Ok(GoogleTts {
            client,
            base_url: Self::BASE_URL.into(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        language: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, TtsError> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let bytes = self
            .client
            .get(format!(
                "{}/translate_tts",
                self.base_url.trim_end_matches('/')
            ))
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }
}

impl SpeechSynthesizer for GoogleTts {
    type Error = TtsError;

    #[tracing::instrument(skip(self, text), fields(chars = text.len()))]
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, Self::Error> {
        let chunks = split_text(text, Self::MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(TtsError::EmptyText);
        }

        let total = chunks.len();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, language, idx, total).await?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(TtsError::EmptyAudio);
        }

        tracing::debug!(chunks = total, bytes = audio.len(), "Synthesized speech");
        Ok(audio)
    }
}

/// Splits `text` into pieces of at most `max_chars` characters, preferring
/// clause boundaries, then word boundaries. Whitespace is collapsed.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    let clauses = clauses(text)
        .map(|clause| clause.split_whitespace().join(" "))
        .filter(|clause| !clause.is_empty());

    for clause in clauses {
        if clause.chars().count() <= max_chars {
            push_piece(&mut chunks, &mut current, &clause, max_chars);
            continue;
        }

        for word in clause.split_whitespace() {
            if word.chars().count() <= max_chars {
                push_piece(&mut chunks, &mut current, word, max_chars);
            } else {
                for part in &word.chars().chunks(max_chars) {
                    push_piece(&mut chunks, &mut current, &part.collect::<String>(), max_chars);
                }
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn clauses(text: &str) -> impl Iterator<Item = &str> {
    let mut start = 0;
    CLAUSE_END_RE
        .find_iter(text)
        .map(|m| m.end())
        .chain(std::iter::once(text.len()))
        .map(move |end| {
            let clause = &text[start..end];
            start = end;
            clause
        })
}

fn push_piece(chunks: &mut Vec<String>, current: &mut String, piece: &str, max_chars: usize) {
    let separator = usize::from(!current.is_empty());
    if !current.is_empty()
        && current.chars().count() + separator + piece.chars().count() > max_chars
    {
        chunks.push(std::mem::take(current));
    }

    if !current.is_empty() {
        current.push(' ');
    }
    current.push_str(piece);
}
