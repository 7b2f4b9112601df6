//! Configuration management for Hanyu Tutor
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, TutorError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the completion service credential
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Main configuration structure for Hanyu Tutor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion service configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Pronunciation playback configuration
    #[serde(default)]
    pub speech: SpeechConfig,
}

/// Completion service configuration
///
/// The request shape is fixed; these values only say where it goes and with
/// which sampling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the OpenAI-compatible API (`/chat/completions` is appended)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Bearer credential. Prefer the `OPENROUTER_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Value of the `HTTP-Referer` header
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Value of the `X-Title` header
    #[serde(default = "default_title")]
    pub title: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum completion length in tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_api_base() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "tngtech/deepseek-r1t2-chimera:free".to_string()
}

fn default_referer() -> String {
    "http://localhost".to_string()
}

fn default_title() -> String {
    "Chinese Tutor Bot".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    800
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            api_key: None,
            referer: default_referer(),
            title: default_title(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Pronunciation playback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// espeak-ng compatible synthesizer binary
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Speaking rate relative to the engine default (1.0 = normal)
    #[serde(default = "default_rate")]
    pub rate: f32,

    /// Language tag requested for utterances and the remote fallback
    #[serde(default = "default_language")]
    pub language: String,

    /// Remote text-to-speech endpoint used when no Chinese voice is installed
    #[serde(default = "default_remote_tts_url")]
    pub remote_tts_url: String,

    /// Client identifier sent to the remote endpoint
    #[serde(default = "default_remote_tts_client")]
    pub remote_tts_client: String,

    /// Audio player fed with the remote audio on stdin
    #[serde(default = "default_player")]
    pub player: String,

    /// Arguments passed to the audio player
    #[serde(default = "default_player_args")]
    pub player_args: Vec<String>,
}

fn default_engine() -> String {
    "espeak-ng".to_string()
}

fn default_rate() -> f32 {
    0.8
}

fn default_language() -> String {
    "zh-CN".to_string()
}

fn default_remote_tts_url() -> String {
    "https://translate.google.com/translate_tts".to_string()
}

fn default_remote_tts_client() -> String {
    "tw-ob".to_string()
}

fn default_player() -> String {
    "ffplay".to_string()
}

fn default_player_args() -> Vec<String> {
    ["-nodisp", "-autoexit", "-loglevel", "quiet", "-"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            rate: default_rate(),
            language: default_language(),
            remote_tts_url: default_remote_tts_url(),
            remote_tts_client: default_remote_tts_client(),
            player: default_player(),
            player_args: default_player_args(),
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and CLI
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command line, applied last
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Parse a configuration file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not valid YAML
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TutorError::Config(format!("Failed to read {}: {}", path, e)))?;
        let config: Config = serde_yaml::from_str(&contents).map_err(TutorError::from)?;
        tracing::debug!("Loaded configuration from {}", path);
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_key) = std::env::var(API_KEY_ENV) {
            if !api_key.trim().is_empty() {
                self.provider.api_key = Some(api_key);
            }
        }

        if let Ok(api_base) = std::env::var("HANYU_TUTOR_API_BASE") {
            self.provider.api_base = api_base;
        }

        if let Ok(model) = std::env::var("HANYU_TUTOR_MODEL") {
            self.provider.model = model;
        }

        if let Ok(engine) = std::env::var("HANYU_TUTOR_SPEECH_ENGINE") {
            self.speech.engine = engine;
        }

        if let Ok(player) = std::env::var("HANYU_TUTOR_PLAYER") {
            self.speech.player = player;
        }

        if let Ok(rate) = std::env::var("HANYU_TUTOR_SPEECH_RATE") {
            if let Ok(value) = rate.parse() {
                self.speech.rate = value;
            } else {
                tracing::warn!("Invalid HANYU_TUTOR_SPEECH_RATE: {}", rate);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate configuration values
    ///
    /// The credential is not checked here; commands that call the completion
    /// service check it when building the client.
    ///
    /// # Errors
    ///
    /// Returns a `TutorError::Config` describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        if self.provider.api_base.trim().is_empty() {
            return Err(TutorError::Config("provider.api_base cannot be empty".to_string()).into());
        }

        if self.provider.model.trim().is_empty() {
            return Err(TutorError::Config("provider.model cannot be empty".to_string()).into());
        }

        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(TutorError::Config(
                "provider.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.provider.max_tokens == 0 {
            return Err(TutorError::Config(
                "provider.max_tokens must be greater than 0".to_string(),
            )
            .into());
        }

        if self.speech.rate <= 0.0 || self.speech.rate > 4.0 {
            return Err(TutorError::Config(
                "speech.rate must be greater than 0.0 and at most 4.0".to_string(),
            )
            .into());
        }

        if url::Url::parse(&self.speech.remote_tts_url).is_err() {
            return Err(TutorError::Config(format!(
                "speech.remote_tts_url is not a valid URL: {}",
                self.speech.remote_tts_url
            ))
            .into());
        }

        Ok(())
    }
}
