//! Speech-to-text for finished recordings.
//!
//! The engine is an injectable capability constructed once by the composing
//! application and reused across calls. [`Transcriber`] wraps it with the
//! input validation the pipeline relies on: a missing file and a zero-length
//! recording are distinct, named failures rather than engine errors.

use crate::config::SpeechConfig;
use crate::error::PipelineError;
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

pub mod remote;
pub mod whisper_cli;

pub use remote::RemoteSpeechEngine;
pub use whisper_cli::WhisperCliEngine;

/// Speech-recognition capability. Expensive to construct, cheap to reuse.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    fn name(&self) -> &'static str;

    async fn transcribe(&self, audio_path: &Path, language: &str)
        -> Result<String, PipelineError>;
}

pub struct Transcriber {
    engine: Box<dyn SpeechEngine>,
    language: String,
}

impl Transcriber {
    pub fn new(engine: Box<dyn SpeechEngine>, language: impl Into<String>) -> Self {
        Self {
            engine,
            language: language.into(),
        }
    }

    /// Build a transcriber from config by provider name.
    pub fn from_config(config: &SpeechConfig) -> Result<Self> {
        let language = config.language.clone().unwrap_or_else(|| "en".to_string());

        let engine: Box<dyn SpeechEngine> = match config.provider.as_deref() {
            Some("whisper-cli") | None => Box::new(WhisperCliEngine::new(
                config.command_path.clone(),
                config.model_path.clone(),
            )?),
            Some("remote") => Box::new(RemoteSpeechEngine::new(
                config.api_endpoint.clone(),
                config.api_key.clone(),
            )?),
            Some(other) => bail!(
                "Unknown speech provider '{}'. Supported providers: whisper-cli, remote",
                other
            ),
        };

        info!("Using {} for transcription", engine.name());

        Ok(Self { engine, language })
    }

    /// Transcribe a finished audio file to trimmed plain text.
    ///
    /// An empty transcript is a valid result, not an error: it means the
    /// engine produced no recognizable speech.
    pub async fn transcribe(&self, audio_path: &Path) -> Result<String, PipelineError> {
        if !audio_path.exists() {
            return Err(PipelineError::FileNotFound {
                path: audio_path.to_path_buf(),
            });
        }

        probe_audio(audio_path)?;

        info!(
            "Transcribing audio file: {:?} with {}",
            audio_path,
            self.engine.name()
        );

        let text = self.engine.transcribe(audio_path, &self.language).await?;
        Ok(text.trim().to_string())
    }
}

/// Reject recordings with no audio content before handing them to an engine.
fn probe_audio(audio_path: &Path) -> Result<(), PipelineError> {
    let len = std::fs::metadata(audio_path)
        .map(|m| m.len())
        .unwrap_or(0);
    if len == 0 {
        return Err(PipelineError::EmptyAudio {
            path: audio_path.to_path_buf(),
        });
    }

    // For WAV input, also reject files whose data chunk holds zero frames
    if audio_path.extension().is_some_and(|ext| ext == "wav") {
        if let Ok(reader) = hound::WavReader::open(audio_path) {
            if reader.duration() == 0 {
                return Err(PipelineError::EmptyAudio {
                    path: audio_path.to_path_buf(),
                });
            }
        }
    }

    Ok(())
}
