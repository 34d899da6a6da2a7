//! Text-to-speech services.

pub mod google;

use std::{fmt, future::Future};

pub use google::{split_text, GoogleTts, TtsError};

/// An opaque text-to-speech service returning encoded audio.
pub trait SpeechSynthesizer {
    type Error: fmt::Debug + fmt::Display + Send + Sync + 'static;

    fn synthesize(
        &self,
        text: &str,
        language: &str,
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send;
}
