//! Error types for Hanyu Tutor
//!
//! This module defines the error types used across the crate, using
//! `thiserror` for the typed variants and `anyhow` for propagation.

use thiserror::Error;

/// Main error type for Hanyu Tutor operations
///
/// None of these reach the chat transcript directly: completion failures are
/// converted into fallback replies and playback failures are only logged.
/// They surface at startup (configuration, credentials) or from the one-shot
/// CLI commands.
#[derive(Error, Debug)]
pub enum TutorError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Completion provider errors (non-success status, malformed body, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Missing credentials for the completion service
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// On-device speech synthesis errors
    #[error("Speech error: {0}")]
    Speech(String),

    /// Remote audio fetch or player errors
    #[error("Playback error: {0}")]
    Playback(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Hanyu Tutor operations
///
/// Uses `anyhow::Error` so callers can attach context while the typed
/// [`TutorError`] variants remain downcastable.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = TutorError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_provider_error_display() {
        let error = TutorError::Provider("status 500".to_string());
        assert_eq!(error.to_string(), "Provider error: status 500");
    }

    #[test]
    fn test_missing_credentials_error_display() {
        let error = TutorError::MissingCredentials("openrouter".to_string());
        assert_eq!(
            error.to_string(),
            "Missing credentials for provider: openrouter"
        );
    }

    #[test]
    fn test_speech_and_playback_error_display() {
        assert_eq!(
            TutorError::Speech("no voices".to_string()).to_string(),
            "Speech error: no voices"
        );
        assert_eq!(
            TutorError::Playback("player exited".to_string()).to_string(),
            "Playback error: player exited"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "espeak-ng");
        let error: TutorError = io_error.into();
        assert!(matches!(error, TutorError::Io(_)));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: TutorError = json_error.into();
        assert!(matches!(error, TutorError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("a: [unclosed").unwrap_err();
        let error: TutorError = yaml_error.into();
        assert!(matches!(error, TutorError::Yaml(_)));
    }

    #[test]
    fn test_error_downcast_through_anyhow() {
        let result: Result<()> = Err(TutorError::Config("bad".to_string()).into());
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TutorError>(),
            Some(TutorError::Config(_))
        ));
    }
}
