use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use tokio::io::AsyncWriteExt;

use crate::tts::SpeechSynthesizer;

/// Disambiguates renders that land on the same timestamp
static RENDER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Renders broadcast scripts to MP3 files in a working audio directory.
///
/// The renderer never deletes what it writes: whoever receives the
/// [`AudioArtifact`] consumes it, which reads the bytes and removes the file.
#[derive(Debug)]
pub struct AudioRenderer<S> {
    synthesizer: S,
    audio_dir: PathBuf,
}

impl<S> AudioRenderer<S>
where
    S: SpeechSynthesizer + Send + Sync,
{
    pub fn new(synthesizer: S, audio_dir: impl Into<PathBuf>) -> Self {
        AudioRenderer {
            synthesizer,
            audio_dir: audio_dir.into(),
        }
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// Synthesizes `script` and persists it under a timestamped file name.
    /// Returns `None` (after logging) if synthesis or the write fails.
    #[tracing::instrument(skip(self, script), fields(chars = script.len()))]
    pub async fn render(&self, script: &str, language: &str) -> Option<AudioArtifact> {
        let audio = match self.synthesizer.synthesize(script, language).await {
            Ok(audio) if !audio.is_empty() => audio,
            Ok(_) => {
                tracing::error!("TTS returned an empty payload");
                return None;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to synthesize speech");
                return None;
            }
        };

        let path = self.audio_dir.join(artifact_file_name());

        let written = async {
            tokio::fs::create_dir_all(&self.audio_dir).await?;
            let mut file = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await?;
            file.write_all(&audio).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            tracing::error!(error = %e, path = ?path, "Failed to write audio file");
            return None;
        }

        tracing::info!(path = ?path, bytes = audio.len(), "Rendered audio");
        Some(AudioArtifact { path })
    }
}

/// `tts_<timestamp>_<pid>_<seq>.mp3`, unique within the audio directory
fn artifact_file_name() -> String {
    format!(
        "tts_{}_{}_{}.mp3",
        chrono::Local::now().format("%Y%m%d_%H%M%S_%3f"),
        std::process::id(),
        RENDER_SEQ.fetch_add(1, Ordering::Relaxed)
    )
}

/// A rendered audio file awaiting its single read.
#[derive(Debug)]
#[must_use = "the audio file stays on disk until the artifact is consumed"]
pub struct AudioArtifact {
    path: PathBuf,
}

impl AudioArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the audio bytes and deletes the file.
    pub async fn consume(self) -> std::io::Result<Vec<u8>> {
        let bytes = tokio::fs::read(&self.path).await?;

        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!(error = ?e, path = ?self.path, "Failed to remove audio file");
        }

        Ok(bytes)
    }
}
