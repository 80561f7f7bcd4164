//! Artifact export boundary.
//!
//! The pipeline hands `(meeting link, transcript, bullet list)` to an
//! exporter and receives a file path back. The exporter is a terminal
//! collaborator: the session reaches `Summarized` whether or not export
//! succeeds.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

pub mod hook;

pub use hook::{PostSessionHook, ShellCommandHook};

/// Finished session output handed to export and delivery collaborators.
#[derive(Debug, Clone)]
pub struct SessionArtifact {
    pub session_id: Uuid,
    pub meeting_link: Option<String>,
    pub transcript_text: String,
    pub bullets: Vec<String>,
    pub audio_path: PathBuf,
}

#[async_trait]
pub trait ArtifactExporter: Send + Sync {
    async fn export(&self, artifact: &SessionArtifact) -> Result<PathBuf>;
}

/// Renders the artifact as plain text: meeting link, transcript, bullets.
pub fn render_summary(artifact: &SessionArtifact) -> String {
    let mut out = String::from("Meeting Summary\n");
    if let Some(link) = &artifact.meeting_link {
        out.push_str(&format!("Meeting Link: {}\n", link));
    }
    out.push_str("\nTranscript:\n");
    out.push_str(&artifact.transcript_text);
    out.push_str("\n\nBullet Points:\n");
    for bullet in &artifact.bullets {
        out.push_str(&format!("- {}\n", bullet));
    }
    out
}

/// Writes the rendered summary to a per-session text file.
pub struct SummaryFileExporter {
    artifacts_dir: PathBuf,
}

impl SummaryFileExporter {
    pub fn new(artifacts_dir: impl Into<PathBuf>) -> Self {
        Self {
            artifacts_dir: artifacts_dir.into(),
        }
    }

    fn artifact_path(&self, session_id: Uuid) -> PathBuf {
        self.artifacts_dir
            .join(format!("summary-{}.txt", session_id.simple()))
    }
}

#[async_trait]
impl ArtifactExporter for SummaryFileExporter {
    async fn export(&self, artifact: &SessionArtifact) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.artifacts_dir)
            .await
            .context("Failed to create artifacts directory")?;

        let path = self.artifact_path(artifact.session_id);
        tokio::fs::write(&path, render_summary(artifact))
            .await
            .with_context(|| format!("Failed to write artifact {:?}", path))?;

        info!("Session artifact written: {:?}", path);
        Ok(path)
    }
}
