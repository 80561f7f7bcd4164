//! Session lifecycle orchestrator.
//!
//! Drives one session through
//! begin → end → process (transcribe → summarize → export).
//!
//! All capabilities are injected via the constructor. `begin`/`end` are
//! cheap control operations; `process` spawns the slow transcription and
//! summarization work onto a background task and publishes transitions
//! through the shared status handle.

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::capture::AudioCapture;
use crate::error::PipelineError;
use crate::export::{ArtifactExporter, PostSessionHook, SessionArtifact};
use crate::summary::Summarizer;
use crate::transcription::Transcriber;

use super::status::{SessionPhase, SessionState, SessionStatusHandle};

/// Byte length of a WAV header with no sample data behind it.
const WAV_HEADER_LEN: u64 = 44;

#[derive(Debug, Clone, Default)]
pub struct SessionStartOptions {
    pub meeting_link: Option<String>,
}

pub struct SessionMachine {
    capture: Arc<dyn AudioCapture>,
    transcriber: Arc<Transcriber>,
    summarizer: Arc<Summarizer>,
    exporter: Arc<dyn ArtifactExporter>,
    hook: Option<Arc<dyn PostSessionHook>>,
    status: SessionStatusHandle,
    recordings_dir: PathBuf,
}

impl SessionMachine {
    pub fn new(
        capture: Arc<dyn AudioCapture>,
        transcriber: Arc<Transcriber>,
        summarizer: Arc<Summarizer>,
        exporter: Arc<dyn ArtifactExporter>,
        hook: Option<Arc<dyn PostSessionHook>>,
        status: SessionStatusHandle,
        recordings_dir: PathBuf,
    ) -> Self {
        Self {
            capture,
            transcriber,
            summarizer,
            exporter,
            hook,
            status,
            recordings_dir,
        }
    }

    pub fn status(&self) -> SessionStatusHandle {
        self.status.clone()
    }

    /// Start a new session: generate a fresh audio path and launch capture.
    ///
    /// Fails with `CaptureBusy` while a session is recording or still being
    /// processed. Concurrent calls from an idle state race only on the
    /// capture device slot; exactly one wins.
    pub async fn begin(
        &self,
        options: SessionStartOptions,
    ) -> Result<SessionState, PipelineError> {
        let current = self.status.get().await;
        if current.phase != SessionPhase::Idle && !current.phase.is_terminal() {
            return Err(PipelineError::CaptureBusy);
        }

        let session_id = Uuid::new_v4();
        let audio_path = self
            .recordings_dir
            .join(format!("meeting-{}.wav", session_id));

        tokio::fs::create_dir_all(&self.recordings_dir)
            .await
            .map_err(|source| PipelineError::LaunchFailure { source })?;

        self.capture.start(&audio_path).await?;

        self.status
            .start_recording(session_id, options.meeting_link, audio_path.clone())
            .await;

        info!("Session {} recording started: {:?}", session_id, audio_path);

        Ok(self.status.get().await)
    }

    /// Stop the session's capture and finalize the audio file.
    ///
    /// Idempotent: calling `end` when nothing is recording changes nothing
    /// and does not fail. If the destination file is missing or holds no
    /// audio payload, the session fails with `NoAudioCaptured` and never
    /// proceeds to processing.
    pub async fn end(&self) -> Result<SessionState, PipelineError> {
        let state = self.status.get().await;
        if state.phase != SessionPhase::Recording {
            info!(
                "Stop requested while {}, nothing to do",
                state.phase.as_str()
            );
            return Ok(state);
        }

        self.capture.stop().await?;

        let audio_path = state.audio_path.clone().unwrap_or_default();
        let payload_len = tokio::fs::metadata(&audio_path)
            .await
            .map(|m| m.len())
            .unwrap_or(0);

        if payload_len <= WAV_HEADER_LEN {
            let err = PipelineError::NoAudioCaptured { path: audio_path };
            self.status.fail(&err).await;
            return Err(err);
        }

        self.status.set_phase(SessionPhase::Stopped).await;
        info!(
            "Session {} stopped after {}s, audio finalized ({} bytes)",
            state.id.unwrap_or_default(),
            state.duration_seconds().unwrap_or(0),
            payload_len
        );

        Ok(self.status.get().await)
    }

    /// Transcribe and summarize the stopped session on a background task.
    ///
    /// Returns as soon as the work is spawned; callers observe completion by
    /// polling the status handle. Valid only from `Stopped`.
    pub async fn process(&self) -> Result<JoinHandle<()>> {
        let state = self.status.get().await;
        if state.phase != SessionPhase::Stopped {
            bail!(
                "Cannot process a session in phase '{}'",
                state.phase.as_str()
            );
        }

        let Some(audio_path) = state.audio_path.clone() else {
            bail!("Stopped session has no audio path");
        };

        let transcriber = Arc::clone(&self.transcriber);
        let summarizer = Arc::clone(&self.summarizer);
        let exporter = Arc::clone(&self.exporter);
        let hook = self.hook.clone();
        let status = self.status.clone();
        let session_id = state.id.unwrap_or_default();
        let meeting_link = state.meeting_link.clone();

        let handle = tokio::spawn(async move {
            let result = Self::run_pipeline(
                transcriber,
                summarizer,
                exporter,
                hook,
                status.clone(),
                session_id,
                meeting_link,
                audio_path,
            )
            .await;

            if let Err(e) = result {
                error!("Session {} pipeline failed: {}", session_id, e);
                status.fail(&e).await;
            }
        });

        Ok(handle)
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_pipeline(
        transcriber: Arc<Transcriber>,
        summarizer: Arc<Summarizer>,
        exporter: Arc<dyn ArtifactExporter>,
        hook: Option<Arc<dyn PostSessionHook>>,
        status: SessionStatusHandle,
        session_id: Uuid,
        meeting_link: Option<String>,
        audio_path: PathBuf,
    ) -> Result<(), PipelineError> {
        let transcript = transcriber.transcribe(&audio_path).await?;
        status.set_transcript(transcript.clone()).await;
        info!(
            "Session {} transcribed: {} chars",
            session_id,
            transcript.len()
        );

        let bullets = summarizer.summarize(&transcript).await?;
        status.set_bullets(bullets.clone()).await;
        info!(
            "Session {} summarized: {} bullet(s)",
            session_id,
            bullets.len()
        );

        // Terminal hand-off: export and delivery failures are logged but do
        // not change the session outcome
        let artifact = SessionArtifact {
            session_id,
            meeting_link,
            transcript_text: transcript,
            bullets,
            audio_path,
        };

        match exporter.export(&artifact).await {
            Ok(artifact_path) => {
                if let Some(hook) = hook {
                    if let Err(e) = hook.deliver(&artifact, &artifact_path).await {
                        warn!("Post-session hook failed: {}", e);
                    }
                }
            }
            Err(e) => warn!("Artifact export failed: {}", e),
        }

        Ok(())
    }
}
