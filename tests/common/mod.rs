use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use hanyu_tutor::config::{ProviderConfig, SpeechConfig};
use hanyu_tutor::error::Result;
use hanyu_tutor::notify::{Notification, Notifier};
use hanyu_tutor::speech::{AudioSink, Utterance, Voice, VoiceSynthesizer};

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Provider config pointing at a mock server
#[allow(dead_code)]
pub fn provider_config(server_uri: &str) -> ProviderConfig {
    ProviderConfig {
        api_base: format!("{}/api/v1", server_uri),
        api_key: Some("sk-or-test".to_string()),
        ..ProviderConfig::default()
    }
}

/// Speech config whose remote endpoint is a mock server
#[allow(dead_code)]
pub fn speech_config(server_uri: &str) -> SpeechConfig {
    SpeechConfig {
        remote_tts_url: format!("{}/translate_tts", server_uri),
        ..SpeechConfig::default()
    }
}

#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.seen.lock().unwrap().push(notification.clone());
    }
}

#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingSink {
    clips: Mutex<Vec<Vec<u8>>>,
}

#[allow(dead_code)]
impl RecordingSink {
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

/// Synthesizer with a fixed voice list
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedSynthesizer {
    voices: Vec<Voice>,
    spoken: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedSynthesizer {
    pub fn new(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            spoken: Mutex::new(Vec::new()),
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl VoiceSynthesizer for ScriptedSynthesizer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn voices(&self) -> Result<Vec<Voice>> {
        Ok(self.voices.clone())
    }

    async fn cancel(&self) {}

    async fn speak(&self, utterance: Utterance) -> Result<()> {
        self.spoken.lock().unwrap().push(utterance.text);
        Ok(())
    }
}
