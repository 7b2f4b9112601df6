//! On-device speech synthesis
//!
//! The [`VoiceSynthesizer`] trait is the seam between the playback fallback
//! chain and whatever engine is installed. [`EspeakSynthesizer`] drives the
//! `espeak-ng` command line (or any binary with the same flags).

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use crate::error::{Result, TutorError};
use crate::speech::piped_command;

/// espeak-ng speed in words per minute at rate 1.0
const ESPEAK_DEFAULT_WPM: f32 = 175.0;

/// An installed synthesizer voice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Human-readable voice name
    pub name: String,
    /// BCP-47 style language tag, as reported by the engine
    pub language: String,
}

impl Voice {
    /// Creates a voice description
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
        }
    }
}

/// A request to speak one piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Text to pronounce
    pub text: String,
    /// Voice to use
    pub voice: Voice,
    /// Requested language tag
    pub language: String,
    /// Speaking rate relative to normal (1.0)
    pub rate: f32,
}

/// A speech engine able to pronounce text on this machine
#[async_trait]
pub trait VoiceSynthesizer: Send + Sync {
    /// Engine name for logs
    fn name(&self) -> &str;

    /// List installed voices
    ///
    /// # Errors
    ///
    /// Returns error if the engine cannot be queried
    async fn voices(&self) -> Result<Vec<Voice>>;

    /// Halt any utterance in progress. Never fails.
    async fn cancel(&self);

    /// Start speaking an utterance
    ///
    /// Returns once speech has started; it does not wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns error if the engine could not be started
    async fn speak(&self, utterance: Utterance) -> Result<()>;

    /// Wait for the current utterance to finish
    async fn wait(&self) -> Result<()> {
        Ok(())
    }
}

/// Pick the voice used for Chinese playback
///
/// A voice whose language matches `preferred` exactly (ignoring case and
/// `_`/`-`) wins; otherwise the first voice whose primary language subtag is
/// Chinese (`zh`, `cmn` or `yue`).
///
/// # Examples
///
/// ```
/// use hanyu_tutor::speech::{select_chinese_voice, Voice};
///
/// let voices = vec![
///     Voice::new("English", "en-US"),
///     Voice::new("Chinese_(Mandarin)", "cmn"),
///     Voice::new("Mandarin", "zh_CN"),
/// ];
/// assert_eq!(select_chinese_voice(&voices, "zh-CN").unwrap().name, "Mandarin");
/// ```
pub fn select_chinese_voice<'a>(voices: &'a [Voice], preferred: &str) -> Option<&'a Voice> {
    let preferred = normalize_tag(preferred);
    voices
        .iter()
        .find(|v| normalize_tag(&v.language) == preferred)
        .or_else(|| {
            voices.iter().find(|v| {
                let tag = normalize_tag(&v.language);
                let primary = tag.split('-').next().unwrap_or_default();
                matches!(primary, "zh" | "cmn" | "yue")
            })
        })
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_ascii_lowercase().replace('_', "-")
}

/// Parse the table printed by `espeak-ng --voices`
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File          Other Languages
///  5  cmn             --/M      Chinese_(Mandarin) sit/cmn       (zh-cmn 5)(zh 5)
/// ```
pub fn parse_espeak_voices(output: &str) -> Vec<Voice> {
    output
        .lines()
        .filter(|line| !line.trim_start().starts_with("Pty"))
        .filter_map(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 4 {
                return None;
            }
            Some(Voice::new(tokens[3], tokens[1]))
        })
        .collect()
}

/// Convert a relative rate to espeak-ng words per minute
fn words_per_minute(rate: f32) -> u32 {
    (ESPEAK_DEFAULT_WPM * rate).round().max(1.0) as u32
}

/// Synthesizer backed by the `espeak-ng` command line
///
/// Only one utterance plays at a time: starting a new one kills the previous
/// process.
#[derive(Debug)]
pub struct EspeakSynthesizer {
    program: String,
    current: Mutex<Option<Child>>,
}

impl EspeakSynthesizer {
    /// Wrap a synthesizer binary without probing it
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            current: Mutex::new(None),
        }
    }

    /// Probe for the binary and wrap it if it runs
    ///
    /// # Returns
    ///
    /// `None` when the binary is missing or exits with an error
    ///
    /// # Examples
    ///
    /// ```
    /// use hanyu_tutor::speech::EspeakSynthesizer;
    ///
    /// # tokio_test::block_on(async {
    /// let missing = EspeakSynthesizer::detect("no-such-speech-engine").await;
    /// assert!(missing.is_none());
    /// # });
    /// ```
    pub async fn detect(program: &str) -> Option<Self> {
        let status = Command::new(program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => {
                tracing::debug!("Found speech synthesizer: {}", program);
                Some(Self::new(program))
            }
            Ok(status) => {
                tracing::debug!("{} --version exited with {}", program, status);
                None
            }
            Err(e) => {
                tracing::debug!("Speech synthesizer {} not available: {}", program, e);
                None
            }
        }
    }
}

#[async_trait]
impl VoiceSynthesizer for EspeakSynthesizer {
    fn name(&self) -> &str {
        &self.program
    }

    async fn voices(&self) -> Result<Vec<Voice>> {
        let output = Command::new(&self.program)
            .arg("--voices")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| TutorError::Speech(format!("Failed to list voices: {}", e)))?;

        if !output.status.success() {
            return Err(TutorError::Speech(format!(
                "{} --voices exited with {}",
                self.program, output.status
            ))
            .into());
        }

        let voices = parse_espeak_voices(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!("{} reports {} voices", self.program, voices.len());
        Ok(voices)
    }

    async fn cancel(&self) {
        if let Some(mut child) = self.current.lock().await.take() {
            if let Err(e) = child.kill().await {
                tracing::debug!("Previous utterance already finished: {}", e);
            }
        }
    }

    async fn speak(&self, utterance: Utterance) -> Result<()> {
        let mut current = self.current.lock().await;
        if let Some(mut previous) = current.take() {
            let _ = previous.kill().await;
        }

        let mut child = piped_command(&self.program)
            .arg("-v")
            .arg(&utterance.voice.language)
            .arg("-s")
            .arg(words_per_minute(utterance.rate).to_string())
            .arg("--stdin")
            .spawn()
            .map_err(|e| TutorError::Speech(format!("Failed to start {}: {}", self.program, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TutorError::Speech("synthesizer stdin unavailable".to_string()))?;
        stdin
            .write_all(utterance.text.as_bytes())
            .await
            .map_err(|e| TutorError::Speech(format!("Failed to send text: {}", e)))?;
        drop(stdin);

        tracing::debug!(
            voice = %utterance.voice.name,
            rate = utterance.rate,
            "Speaking {} chars",
            utterance.text.chars().count()
        );
        *current = Some(child);
        Ok(())
    }

    async fn wait(&self) -> Result<()> {
        let child = self.current.lock().await.take();
        if let Some(mut child) = child {
            child.wait().await?;
        }
        Ok(())
    }
}
