//! Pipeline error taxonomy.
//!
//! Every failure that can drive a session to `Failed` is a named variant so
//! callers can distinguish recoverable conditions (busy device, missing file)
//! from engine-level failures without inspecting error chains.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no capture command is known for platform '{os}'")]
    UnsupportedPlatform { os: String },

    #[error("failed to launch capture process: {source}")]
    LaunchFailure {
        #[source]
        source: std::io::Error,
    },

    #[error("the capture device is already in use by another session")]
    CaptureBusy,

    #[error("no audio was captured to {path:?}")]
    NoAudioCaptured { path: PathBuf },

    #[error("audio file not found: {path:?}")]
    FileNotFound { path: PathBuf },

    #[error("audio file contains no audio data: {path:?}")]
    EmptyAudio { path: PathBuf },

    #[error("{engine} engine failed: {message}")]
    ModelFailure { engine: String, message: String },
}

impl PipelineError {
    /// Stable machine-readable kind, carried into session state and API
    /// responses so callers can present a specific message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedPlatform { .. } => "unsupported_platform",
            Self::LaunchFailure { .. } => "launch_failure",
            Self::CaptureBusy => "capture_busy",
            Self::NoAudioCaptured { .. } => "no_audio_captured",
            Self::FileNotFound { .. } => "file_not_found",
            Self::EmptyAudio { .. } => "empty_audio",
            Self::ModelFailure { .. } => "model_failure",
        }
    }

    pub fn model_failure(engine: impl Into<String>, message: impl ToString) -> Self {
        Self::ModelFailure {
            engine: engine.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_stable() {
        assert_eq!(
            PipelineError::UnsupportedPlatform {
                os: "macos".to_string()
            }
            .kind(),
            "unsupported_platform"
        );
        assert_eq!(PipelineError::CaptureBusy.kind(), "capture_busy");
        assert_eq!(
            PipelineError::NoAudioCaptured {
                path: PathBuf::from("/tmp/x.wav")
            }
            .kind(),
            "no_audio_captured"
        );
        assert_eq!(
            PipelineError::model_failure("whisper-cli", "exit code 1").kind(),
            "model_failure"
        );
    }

    #[test]
    fn test_model_failure_message_includes_engine() {
        let err = PipelineError::model_failure("summarizer", "connection refused");
        assert_eq!(
            err.to_string(),
            "summarizer engine failed: connection refused"
        );
    }
}
