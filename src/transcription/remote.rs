//! Remote speech-recognition engine.
//!
//! Posts base64-encoded audio to an HTTP transcription endpoint and parses
//! the recognized text from the JSON response.

use crate::error::PipelineError;
use anyhow::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{debug, error, info};

use super::SpeechEngine;

#[derive(Debug, Serialize)]
struct TranscriptionPayload {
    content: String, // base64 audio bytes
    language: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    result: TranscriptionResult,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResult {
    text: String,
}

pub struct RemoteSpeechEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RemoteSpeechEngine {
    pub fn new(endpoint: Option<String>, api_key: Option<String>) -> Result<Self> {
        let endpoint = endpoint
            .unwrap_or_else(|| "http://127.0.0.1:8084/api/v1/transcriptions".to_string());

        info!("Initialized remote speech engine with endpoint: {}", endpoint);

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl SpeechEngine for RemoteSpeechEngine {
    fn name(&self) -> &'static str {
        "remote-speech"
    }

    async fn transcribe(
        &self,
        audio_path: &Path,
        language: &str,
    ) -> Result<String, PipelineError> {
        let bytes = fs::read(audio_path)
            .await
            .map_err(|e| PipelineError::model_failure("remote-speech", e))?;

        let body = TranscriptionPayload {
            content: BASE64.encode(&bytes),
            language: language.to_string(),
        };

        debug!("Sending {} bytes of audio to {}", bytes.len(), self.endpoint);

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PipelineError::model_failure("remote-speech", e))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| PipelineError::model_failure("remote-speech", e))?;

        if !status.is_success() {
            error!(
                "Remote transcription request failed with status {}: {}",
                status, response_text
            );
            return Err(PipelineError::model_failure(
                "remote-speech",
                format!("request failed with status {}", status),
            ));
        }

        let transcription: TranscriptionResponse = serde_json::from_str(&response_text)
            .map_err(|e| PipelineError::model_failure("remote-speech", e))?;

        let text = transcription.result.text.trim().to_string();
        info!("Transcription complete: {} chars", text.len());
        Ok(text)
    }
}
