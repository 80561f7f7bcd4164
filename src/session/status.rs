//! Session state types and shared status handle.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Phase of a session's capture-transcribe-summarize lifecycle.
///
/// `Summarized` and `Failed` are terminal: a new session must be created to
/// retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Recording,
    Stopped,
    Transcribed,
    Summarized,
    Failed,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Stopped => "stopped",
            Self::Transcribed => "transcribed",
            Self::Summarized => "summarized",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Summarized | Self::Failed)
    }
}

/// Current session state, readable by API handlers.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub id: Option<Uuid>,
    pub meeting_link: Option<String>,
    pub audio_path: Option<PathBuf>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub stopped_at: Option<chrono::DateTime<chrono::Utc>>,
    pub transcript: Option<String>,
    pub bullets: Option<Vec<String>>,
    pub error_kind: Option<&'static str>,
    pub last_error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            id: None,
            meeting_link: None,
            audio_path: None,
            started_at: None,
            stopped_at: None,
            transcript: None,
            bullets: None,
            error_kind: None,
            last_error: None,
        }
    }
}

impl SessionState {
    /// Recording duration in seconds. Grows while recording, frozen once the
    /// session leaves `Recording`.
    pub fn duration_seconds(&self) -> Option<u64> {
        self.started_at.map(|started| {
            let end = self.stopped_at.unwrap_or_else(chrono::Utc::now);
            (end - started).num_seconds().max(0) as u64
        })
    }
}

/// Thread-safe handle sharing session state between the machine, the
/// background processing task, and API handlers.
#[derive(Clone, Default)]
pub struct SessionStatusHandle {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionStatusHandle {
    pub async fn get(&self) -> SessionState {
        self.inner.lock().await.clone()
    }

    /// Replace any previous session with a fresh one in `Recording`.
    pub async fn start_recording(
        &self,
        id: Uuid,
        meeting_link: Option<String>,
        audio_path: PathBuf,
    ) {
        let mut state = self.inner.lock().await;
        *state = SessionState {
            phase: SessionPhase::Recording,
            id: Some(id),
            meeting_link,
            audio_path: Some(audio_path),
            started_at: Some(chrono::Utc::now()),
            ..Default::default()
        };
    }

    pub async fn set_phase(&self, phase: SessionPhase) {
        let mut state = self.inner.lock().await;
        if state.phase == SessionPhase::Recording && phase != SessionPhase::Recording {
            state.stopped_at = Some(chrono::Utc::now());
        }
        state.phase = phase;
    }

    pub async fn set_transcript(&self, transcript: String) {
        let mut state = self.inner.lock().await;
        state.transcript = Some(transcript);
        state.phase = SessionPhase::Transcribed;
    }

    pub async fn set_bullets(&self, bullets: Vec<String>) {
        let mut state = self.inner.lock().await;
        state.bullets = Some(bullets);
        state.phase = SessionPhase::Summarized;
    }

    /// Drive the session to `Failed`, recording the originating error kind.
    pub async fn fail(&self, error: &PipelineError) {
        let mut state = self.inner.lock().await;
        if state.phase == SessionPhase::Recording {
            state.stopped_at = Some(chrono::Utc::now());
        }
        state.phase = SessionPhase::Failed;
        state.error_kind = Some(error.kind());
        state.last_error = Some(error.to_string());
    }
}
