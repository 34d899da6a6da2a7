use std::sync::{Arc, Mutex};

use news_ninja::SpeechSynthesizer;

/// An MPEG frame header followed by padding
pub const AUDIO: &[u8] = &[0xFF, 0xFB, 0x90, 0x64, 0x00, 0x00];

#[derive(Clone)]
pub struct MockSpeech {
    pub audio: Vec<u8>,
    /// (text, language)
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
    pub fail_with: Option<String>,
}

impl Default for MockSpeech {
    fn default() -> Self {
        Self {
            audio: AUDIO.to_vec(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }
}

impl MockSpeech {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl SpeechSynthesizer for MockSpeech {
    type Error = anyhow::Error;

    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), language.to_string()));
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.audio.clone())
    }
}
