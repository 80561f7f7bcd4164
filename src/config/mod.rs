use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub speech: SpeechConfig,
    pub summary: SummaryConfig,
    pub export: ExportConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Name of the microphone input device as known to the capture backend.
    pub mic_input: String,
    /// Name of the system loopback input device.
    pub system_input: String,
    /// Seconds to wait for the capture process to exit gracefully before
    /// force-killing it.
    pub stop_grace_seconds: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            mic_input: "Microphone Array (2- Realtek(R) Audio)".to_string(),
            system_input: "Stereo Mix (2- Realtek(R) Audio)".to_string(),
            stop_grace_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub provider: Option<String>,
    pub language: Option<String>,
    pub command_path: Option<String>,
    pub model_path: Option<String>,
    pub api_endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            provider: Some("whisper-cli".to_string()),
            language: Some("en".to_string()),
            command_path: None,
            model_path: None,
            api_endpoint: None,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Endpoint of the summarization inference server.
    pub api_endpoint: String,
    /// Maximum characters per transcript chunk fed to the engine.
    pub max_chunk_chars: usize,
    /// Maximum generated length per chunk summary.
    pub max_length: usize,
    /// Minimum generated length per chunk summary.
    pub min_length: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "http://127.0.0.1:8085/summarize".to_string(),
            max_chunk_chars: 1000,
            max_length: 160,
            min_length: 25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Shell command to run after a session summary is written.
    /// Receives the rendered summary via stdin.
    /// Env vars: BRIEFLY_SESSION_ID, BRIEFLY_MEETING_LINK,
    /// BRIEFLY_AUDIO_PATH, BRIEFLY_ARTIFACT_PATH
    pub post_command: String,
    /// Timeout in seconds for the post_command (default: 600)
    pub post_command_timeout_seconds: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            post_command: String::new(),
            post_command_timeout_seconds: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { port: 3839 }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_defaults_match_engine_bounds() {
        let config = SummaryConfig::default();
        assert_eq!(config.max_chunk_chars, 1000);
        assert_eq!(config.max_length, 160);
        assert_eq!(config.min_length, 25);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.capture.stop_grace_seconds, 5);
        assert_eq!(parsed.speech.provider.as_deref(), Some("whisper-cli"));
        assert_eq!(parsed.api.port, 3839);
    }

    #[test]
    fn test_unknown_speech_keys_are_ignored() {
        // Config files written by older builds may carry retired keys
        let parsed: Config =
            toml::from_str("[speech]\nmodel = \"base\"\nprovider = \"whisper-cli\"\n").unwrap();
        assert_eq!(parsed.speech.provider.as_deref(), Some("whisper-cli"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Config = toml::from_str("[summary]\nmax_chunk_chars = 500\n").unwrap();
        assert_eq!(parsed.summary.max_chunk_chars, 500);
        assert_eq!(parsed.summary.max_length, 160);
        assert!(!parsed.capture.mic_input.is_empty());
    }
}
