//! Pronunciation playback with a fallback chain
//!
//! Order of preference:
//!
//! 1. An installed Chinese voice on the local synthesizer.
//! 2. Audio fetched from the remote endpoint, piped to the audio sink.
//!
//! With no synthesizer at all the learner is told that playback is not
//! supported and nothing is played.

use std::sync::Arc;

use crate::config::SpeechConfig;
use crate::error::Result;
use crate::notify::{Notification, Notifier};
use crate::speech::remote::RemoteTts;
use crate::speech::sink::{AudioSink, CommandSink};
use crate::speech::synthesizer::{
    select_chinese_voice, EspeakSynthesizer, Utterance, VoiceSynthesizer,
};

/// Which branch of the fallback chain handled a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// Spoken by the local synthesizer with this voice
    Played {
        /// Voice name
        voice: String,
    },
    /// Handed to the remote endpoint; playback errors are only logged
    FellBack {
        /// Request URL
        url: String,
    },
    /// No synthesizer exists; the learner was notified
    Unsupported,
}

/// Pronounces Chinese text
pub struct SpeechPlayer {
    synthesizer: Option<Arc<dyn VoiceSynthesizer>>,
    remote: RemoteTts,
    sink: Arc<dyn AudioSink>,
    notifier: Arc<dyn Notifier>,
    language: String,
    rate: f32,
}

impl SpeechPlayer {
    /// Assemble a player from its parts
    ///
    /// # Arguments
    ///
    /// * `synthesizer` - Local engine, or `None` if the machine has none
    /// * `remote` - Remote endpoint used when no Chinese voice is installed
    /// * `sink` - Output for remote audio
    /// * `notifier` - Destination for the unsupported-speech notification
    /// * `config` - Language and rate settings
    pub fn new(
        synthesizer: Option<Arc<dyn VoiceSynthesizer>>,
        remote: RemoteTts,
        sink: Arc<dyn AudioSink>,
        notifier: Arc<dyn Notifier>,
        config: &SpeechConfig,
    ) -> Self {
        Self {
            synthesizer,
            remote,
            sink,
            notifier,
            language: config.language.clone(),
            rate: config.rate,
        }
    }

    /// Build a player for this machine
    ///
    /// Probes for the configured synthesizer; a missing engine is not an
    /// error, it only disables playback.
    ///
    /// # Errors
    ///
    /// Returns error if the remote endpoint URL is invalid
    pub async fn from_config(config: &SpeechConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let synthesizer = EspeakSynthesizer::detect(&config.engine)
            .await
            .map(|s| Arc::new(s) as Arc<dyn VoiceSynthesizer>);
        if synthesizer.is_none() {
            tracing::warn!(
                "Speech synthesizer {} not found, pronunciation is disabled",
                config.engine
            );
        }

        Ok(Self::new(
            synthesizer,
            RemoteTts::new(config)?,
            Arc::new(CommandSink::from_config(config)),
            notifier,
            config,
        ))
    }

    /// Returns true if a local synthesizer was found
    pub fn is_supported(&self) -> bool {
        self.synthesizer.is_some()
    }

    /// Pronounce `text`, walking the fallback chain
    ///
    /// Any utterance already playing is cancelled first. Playback failures
    /// are logged, never returned.
    pub async fn speak(&self, text: &str) -> SpeechOutcome {
        let Some(synthesizer) = &self.synthesizer else {
            self.notifier.notify(&Notification::speech_unsupported());
            return SpeechOutcome::Unsupported;
        };

        synthesizer.cancel().await;

        match synthesizer.voices().await {
            Ok(voices) => {
                if let Some(voice) = select_chinese_voice(&voices, &self.language) {
                    let voice_name = voice.name.clone();
                    let utterance = Utterance {
                        text: text.to_string(),
                        voice: voice.clone(),
                        language: self.language.clone(),
                        rate: self.rate,
                    };
                    match synthesizer.speak(utterance).await {
                        Ok(()) => return SpeechOutcome::Played { voice: voice_name },
                        Err(e) => tracing::warn!(
                            "{} failed to speak, using remote audio: {:#}",
                            synthesizer.name(),
                            e
                        ),
                    }
                } else {
                    tracing::debug!("No Chinese voice installed, using remote audio");
                }
            }
            Err(e) => tracing::warn!("Could not list voices, using remote audio: {:#}", e),
        }

        self.play_remote(text).await
    }

    async fn play_remote(&self, text: &str) -> SpeechOutcome {
        let url = self.remote.url_for(text);
        let result = async {
            let audio = self.remote.fetch(&url).await?;
            self.sink.play(audio).await
        }
        .await;

        if let Err(e) = result {
            tracing::error!("Remote pronunciation failed: {:#}", e);
        }

        SpeechOutcome::FellBack {
            url: url.to_string(),
        }
    }

    /// Wait until whatever is playing has finished
    ///
    /// Used by one-shot commands so the process does not exit mid-word.
    pub async fn wait_idle(&self) {
        if let Some(synthesizer) = &self.synthesizer {
            if let Err(e) = synthesizer.wait().await {
                tracing::debug!("Synthesizer wait failed: {:#}", e);
            }
        }
        if let Err(e) = self.sink.wait().await {
            tracing::debug!("Audio sink wait failed: {:#}", e);
        }
    }
}
