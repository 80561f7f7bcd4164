//! Capture process lifecycle.
//!
//! [`FfmpegCapture`] owns at most one live ffmpeg child at a time. The slot
//! mutex is the single authoritative lock for the capture device: concurrent
//! `start` calls race only on acquiring it, and exactly one wins.

use crate::capture::command;
use crate::config::CaptureConfig;
use crate::error::PipelineError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Start/stop lifecycle of the external capture process.
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Launch a capture process writing to `destination`. Writing begins
    /// immediately; the file may not exist until the process produces data.
    async fn start(&self, destination: &Path) -> Result<(), PipelineError>;

    /// Request graceful termination and wait for exit, force-killing after a
    /// bounded grace period. Stopping with no active capture is a no-op.
    async fn stop(&self) -> Result<(), PipelineError>;
}

struct ActiveCapture {
    child: Child,
    destination: PathBuf,
}

pub struct FfmpegCapture {
    config: CaptureConfig,
    slot: Mutex<Option<ActiveCapture>>,
}

impl FfmpegCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AudioCapture for FfmpegCapture {
    async fn start(&self, destination: &Path) -> Result<(), PipelineError> {
        let mut slot = self.slot.lock().await;
        if slot.is_some() {
            return Err(PipelineError::CaptureBusy);
        }

        let args = command::capture_args(&self.config, destination)?;

        if !command::ffmpeg_available() {
            return Err(PipelineError::LaunchFailure {
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "ffmpeg binary not found on PATH",
                ),
            });
        }

        let child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PipelineError::LaunchFailure { source })?;

        info!("Capture started, writing to {:?}", destination);

        *slot = Some(ActiveCapture {
            child,
            destination: destination.to_path_buf(),
        });

        Ok(())
    }

    async fn stop(&self) -> Result<(), PipelineError> {
        let mut slot = self.slot.lock().await;
        let Some(mut active) = slot.take() else {
            debug!("Stop requested with no active capture");
            return Ok(());
        };

        // ffmpeg finalizes the output and exits cleanly when it reads `q`
        if let Some(mut stdin) = active.child.stdin.take() {
            let _ = stdin.write_all(b"q").await;
            let _ = stdin.shutdown().await;
        }

        let grace = Duration::from_secs(self.config.stop_grace_seconds);
        match tokio::time::timeout(grace, active.child.wait()).await {
            Ok(Ok(status)) => {
                info!(
                    "Capture process exited with {} ({:?})",
                    status, active.destination
                );
            }
            Ok(Err(e)) => {
                warn!("Failed to wait on capture process: {}", e);
            }
            Err(_) => {
                warn!(
                    "Capture process did not exit within {}s, killing it",
                    self.config.stop_grace_seconds
                );
                if let Err(e) = active.child.kill().await {
                    warn!("Failed to kill capture process: {}", e);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stop_without_start_is_noop() {
        let capture = FfmpegCapture::new(CaptureConfig::default());
        assert!(capture.stop().await.is_ok());
        // Still a no-op the second time
        assert!(capture.stop().await.is_ok());
    }

    #[cfg(not(windows))]
    #[tokio::test]
    async fn test_start_on_unsupported_platform_leaves_slot_free() {
        let capture = FfmpegCapture::new(CaptureConfig::default());

        let result = capture.start(Path::new("/tmp/capture-test.wav")).await;
        assert!(matches!(
            result,
            Err(PipelineError::UnsupportedPlatform { .. })
        ));

        // A failed start must not occupy the device slot
        assert!(capture.slot.lock().await.is_none());
        assert!(capture.stop().await.is_ok());
    }
}
