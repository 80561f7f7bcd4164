//! Post-session delivery hook.
//!
//! After the summary artifact is written, an optional hook can forward it to
//! delivery collaborators (mail it, file it, post it to a calendar event).
//! Hook failure never affects the session outcome.

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use super::{render_summary, SessionArtifact};

/// Environment variable names for session metadata passed to hooks.
pub mod hook_env {
    pub const SESSION_ID: &str = "BRIEFLY_SESSION_ID";
    pub const MEETING_LINK: &str = "BRIEFLY_MEETING_LINK";
    pub const AUDIO_PATH: &str = "BRIEFLY_AUDIO_PATH";
    pub const ARTIFACT_PATH: &str = "BRIEFLY_ARTIFACT_PATH";
}

#[async_trait]
pub trait PostSessionHook: Send + Sync {
    async fn deliver(&self, artifact: &SessionArtifact, artifact_path: &Path) -> Result<()>;
}

/// Executes a shell command with session data.
/// - Pipes the rendered summary to stdin
/// - Sets environment variables for session metadata
/// - Kills the process on timeout
/// - Non-zero exit code logs a warning but does not fail
pub struct ShellCommandHook {
    command: String,
    timeout: Duration,
}

impl ShellCommandHook {
    pub fn new(command: String, timeout_seconds: u64) -> Self {
        Self {
            command,
            timeout: Duration::from_secs(timeout_seconds),
        }
    }
}

#[async_trait]
impl PostSessionHook for ShellCommandHook {
    async fn deliver(&self, artifact: &SessionArtifact, artifact_path: &Path) -> Result<()> {
        info!(
            "Running post-session hook for session {}: {}",
            artifact.session_id, self.command
        );

        let mut child = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .env(hook_env::SESSION_ID, artifact.session_id.to_string())
            .env(
                hook_env::MEETING_LINK,
                artifact.meeting_link.as_deref().unwrap_or(""),
            )
            .env(
                hook_env::AUDIO_PATH,
                artifact.audio_path.to_string_lossy().as_ref(),
            )
            .env(
                hook_env::ARTIFACT_PATH,
                artifact_path.to_string_lossy().as_ref(),
            )
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            use tokio::io::AsyncWriteExt;
            let _ = stdin.write_all(render_summary(artifact).as_bytes()).await;
            // Drop stdin to signal EOF
        }

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                if output.status.success() {
                    info!("Post-session hook completed successfully");
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!(
                        "Post-session hook exited with status {}: {}",
                        output.status,
                        stderr.trim()
                    );
                }
            }
            Ok(Err(e)) => {
                warn!("Post-session hook failed to execute: {}", e);
            }
            Err(_) => {
                warn!(
                    "Post-session hook timed out after {}s (process will be killed)",
                    self.timeout.as_secs()
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn artifact() -> SessionArtifact {
        SessionArtifact {
            session_id: Uuid::new_v4(),
            meeting_link: None,
            transcript_text: "Hello world".to_string(),
            bullets: vec!["Hello world".to_string()],
            audio_path: PathBuf::from("/tmp/test.wav"),
        }
    }

    #[test]
    fn test_hook_env_constants() {
        assert_eq!(hook_env::SESSION_ID, "BRIEFLY_SESSION_ID");
        assert_eq!(hook_env::MEETING_LINK, "BRIEFLY_MEETING_LINK");
        assert_eq!(hook_env::AUDIO_PATH, "BRIEFLY_AUDIO_PATH");
        assert_eq!(hook_env::ARTIFACT_PATH, "BRIEFLY_ARTIFACT_PATH");
    }

    #[tokio::test]
    async fn test_shell_hook_success() {
        // `cat` reads the rendered summary from stdin and exits zero
        let hook = ShellCommandHook::new("cat".to_string(), 10);
        assert!(hook
            .deliver(&artifact(), Path::new("/tmp/summary.txt"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_shell_hook_nonzero_exit_is_not_an_error() {
        let hook = ShellCommandHook::new("exit 1".to_string(), 10);
        assert!(hook
            .deliver(&artifact(), Path::new("/tmp/summary.txt"))
            .await
            .is_ok());
    }
}
