//! Test utilities for Hanyu Tutor
//!
//! This module provides temporary config files and in-memory stand-ins for
//! the completion service, notifier, synthesizer and audio sink.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Notify;

use crate::error::{Result, TutorError};
use crate::notify::{Notification, Notifier};
use crate::providers::CompletionClient;
use crate::speech::{AudioSink, Utterance, Voice, VoiceSynthesizer};

/// Write `contents` to a `config.yaml` inside a fresh temporary directory
///
/// # Panics
///
/// Panics if the directory or file cannot be created
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, contents).expect("Failed to write test config");
    (dir, path)
}

/// Create a test configuration YAML string
pub fn test_config_yaml() -> String {
    r#"
provider:
  api_base: http://127.0.0.1:9/api/v1
  model: test/model
  temperature: 0.5
  max_tokens: 256

speech:
  engine: espeak-ng
  rate: 0.9
  player: mpv
  player_args: ["--no-video", "-"]
"#
    .to_string()
}

/// Completion client returning a fixed reply or a fixed failure
#[derive(Debug, Default)]
pub struct StubClient {
    reply: Option<String>,
    received: Mutex<Vec<String>>,
}

impl StubClient {
    /// A client that always answers `reply`
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            received: Mutex::new(Vec::new()),
        }
    }

    /// A client whose every request fails
    pub fn failing() -> Self {
        Self::default()
    }

    /// Texts received so far
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for StubClient {
    async fn try_complete(&self, user_text: &str) -> Result<String> {
        self.received.lock().unwrap().push(user_text.to_string());
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(TutorError::Provider("stub failure".to_string()).into()),
        }
    }
}

/// Completion client that holds every request until released
#[derive(Debug)]
pub struct GatedClient {
    reply: String,
    gate: Notify,
}

impl GatedClient {
    /// A gated client answering `reply` once released
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            gate: Notify::new(),
        }
    }

    /// Let the waiting request complete
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl CompletionClient for GatedClient {
    async fn try_complete(&self, _user_text: &str) -> Result<String> {
        self.gate.notified().await;
        Ok(self.reply.clone())
    }
}

/// Completion client whose request task panics
#[derive(Debug, Default)]
pub struct PanickingClient;

#[async_trait]
impl CompletionClient for PanickingClient {
    async fn try_complete(&self, _user_text: &str) -> Result<String> {
        panic!("completion client crashed");
    }
}

/// Notifier that records what it was asked to show
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Notifications raised so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.seen.lock().unwrap().push(notification.clone());
    }
}

/// Synthesizer with a fixed voice list that records utterances
#[derive(Debug, Default)]
pub struct FakeSynthesizer {
    voices: Vec<Voice>,
    fail_speak: bool,
    spoken: Mutex<Vec<Utterance>>,
    cancels: Mutex<usize>,
}

impl FakeSynthesizer {
    /// A synthesizer reporting `voices`
    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            ..Self::default()
        }
    }

    /// A synthesizer reporting `voices` whose speak always fails
    pub fn failing_speak(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            fail_speak: true,
            ..Self::default()
        }
    }

    /// Utterances spoken so far
    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap().clone()
    }

    /// Number of cancel calls
    pub fn cancel_count(&self) -> usize {
        *self.cancels.lock().unwrap()
    }
}

#[async_trait]
impl VoiceSynthesizer for FakeSynthesizer {
    fn name(&self) -> &str {
        "fake"
    }

    async fn voices(&self) -> Result<Vec<Voice>> {
        Ok(self.voices.clone())
    }

    async fn cancel(&self) {
        *self.cancels.lock().unwrap() += 1;
    }

    async fn speak(&self, utterance: Utterance) -> Result<()> {
        if self.fail_speak {
            return Err(TutorError::Speech("fake speak failure".to_string()).into());
        }
        self.spoken.lock().unwrap().push(utterance);
        Ok(())
    }
}

/// Audio sink that keeps the clips it was given
#[derive(Debug, Default)]
pub struct RecordingSink {
    clips: Mutex<Vec<Vec<u8>>>,
}

impl RecordingSink {
    /// Clips played so far
    pub fn clips(&self) -> Vec<Vec<u8>> {
        self.clips.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioSink for RecordingSink {
    async fn play(&self, audio: Vec<u8>) -> Result<()> {
        self.clips.lock().unwrap().push(audio);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_temp_config_file() {
        let (_dir, path) = temp_config_file("a: 1");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "a: 1");
    }

    #[test]
    fn test_test_config_yaml_is_valid() {
        let config: Config = serde_yaml::from_str(&test_config_yaml()).unwrap();
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_stub_client_records_requests() {
        let client = StubClient::replying("ok");
        assert_eq!(client.try_complete("hi").await.unwrap(), "ok");
        assert_eq!(client.received(), vec!["hi".to_string()]);
        assert!(StubClient::failing().try_complete("hi").await.is_err());
    }
}
