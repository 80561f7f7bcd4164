//! Capture command construction.
//!
//! Builds the ffmpeg argument list for the platform's capture backend. Only
//! the DirectShow backend is known; other platforms fail fast with
//! `UnsupportedPlatform` rather than attempting a best-effort capture.

use crate::config::CaptureConfig;
use crate::error::PipelineError;
use std::path::Path;

/// Sample rate the pipeline records and transcribes at.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Check if ffmpeg is available on the system.
pub fn ffmpeg_available() -> bool {
    which::which("ffmpeg").is_ok()
}

/// Build the ffmpeg argument list that mixes the two configured audio
/// inputs into a mono 16 kHz stream written to `output`.
pub fn capture_args(config: &CaptureConfig, output: &Path) -> Result<Vec<String>, PipelineError> {
    capture_args_for(std::env::consts::OS, config, output)
}

/// Platform-explicit variant of [`capture_args`], split out so the argument
/// construction stays testable on any host.
pub fn capture_args_for(
    os: &str,
    config: &CaptureConfig,
    output: &Path,
) -> Result<Vec<String>, PipelineError> {
    if os != "windows" {
        return Err(PipelineError::UnsupportedPlatform { os: os.to_string() });
    }

    Ok(vec![
        "-y".to_string(),
        "-f".to_string(),
        "dshow".to_string(),
        "-i".to_string(),
        format!("audio={}", config.mic_input),
        "-f".to_string(),
        "dshow".to_string(),
        "-i".to_string(),
        format!("audio={}", config.system_input),
        "-filter_complex".to_string(),
        "[0:a][1:a]amix=inputs=2:duration=longest".to_string(),
        "-ar".to_string(),
        TARGET_SAMPLE_RATE.to_string(),
        "-ac".to_string(),
        "1".to_string(),
        output.to_string_lossy().to_string(),
    ])
}
