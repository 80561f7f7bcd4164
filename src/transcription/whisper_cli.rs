//! whisper.cpp-style CLI engine.
//!
//! Invokes an external whisper binary per transcription and reads the
//! recognized text from stdout. The binary is resolved once at construction.

use crate::error::PipelineError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::SpeechEngine;

pub struct WhisperCliEngine {
    command_path: PathBuf,
    model_path: PathBuf,
}

impl WhisperCliEngine {
    pub fn new(command_path: Option<String>, model_path: Option<String>) -> Result<Self> {
        let command_path = match command_path {
            Some(path) => PathBuf::from(path),
            None => which::which("whisper-cli")
                .context("whisper-cli binary not found on PATH; set speech.command_path")?,
        };

        let model_path = model_path
            .map(PathBuf::from)
            .context("speech.model_path is required for the whisper-cli engine")?;

        info!("Initialized whisper-cli engine: {:?}", command_path);

        Ok(Self {
            command_path,
            model_path,
        })
    }
}

#[async_trait]
impl SpeechEngine for WhisperCliEngine {
    fn name(&self) -> &'static str {
        "whisper-cli"
    }

    async fn transcribe(
        &self,
        audio_path: &Path,
        language: &str,
    ) -> Result<String, PipelineError> {
        debug!("Running {:?} on {:?}", self.command_path, audio_path);

        let output = tokio::process::Command::new(&self.command_path)
            .arg("-m")
            .arg(&self.model_path)
            .arg("-f")
            .arg(audio_path)
            .args(["--language", language])
            .args(["--no-timestamps"])
            .output()
            .await
            .map_err(|e| PipelineError::model_failure("whisper-cli", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::model_failure(
                "whisper-cli",
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        info!("Transcription complete: {} chars", text.len());
        Ok(text)
    }
}
