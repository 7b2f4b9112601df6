//! Remote text-to-speech fallback
//!
//! When no Chinese voice is installed, pronunciation audio is fetched from a
//! public endpoint that takes the text in the query string and returns MP3.

use reqwest::Client;
use url::Url;

use crate::config::SpeechConfig;
use crate::error::{Result, TutorError};

/// Client for the remote text-to-speech endpoint
#[derive(Debug, Clone)]
pub struct RemoteTts {
    client: Client,
    base_url: Url,
    language: String,
    client_id: String,
}

impl RemoteTts {
    /// Create a remote TTS client from configuration
    ///
    /// # Errors
    ///
    /// Returns `TutorError::Config` if the endpoint URL does not parse, or
    /// `TutorError::Playback` if the HTTP client cannot be built
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        let base_url = Url::parse(&config.remote_tts_url).map_err(|e| {
            TutorError::Config(format!(
                "Invalid remote TTS URL {}: {}",
                config.remote_tts_url, e
            ))
        })?;

        let client = Client::builder()
            .user_agent("hanyu-tutor/0.1.0")
            .build()
            .map_err(|e| TutorError::Playback(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            language: config.language.clone(),
            client_id: config.remote_tts_client.clone(),
        })
    }

    /// Build the request URL for a piece of text
    ///
    /// The text is percent-encoded into the `q` parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// use hanyu_tutor::config::SpeechConfig;
    /// use hanyu_tutor::speech::RemoteTts;
    ///
    /// let tts = RemoteTts::new(&SpeechConfig::default()).unwrap();
    /// let url = tts.url_for("你好");
    /// assert_eq!(
    ///     url.as_str(),
    ///     "https://translate.google.com/translate_tts?ie=UTF-8&tl=zh-CN&client=tw-ob&q=%E4%BD%A0%E5%A5%BD"
    /// );
    /// ```
    pub fn url_for(&self, text: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("ie", "UTF-8")
            .append_pair("tl", &self.language)
            .append_pair("client", &self.client_id)
            .append_pair("q", text);
        url
    }

    /// Download the audio at `url`
    ///
    /// # Errors
    ///
    /// Returns `TutorError::Playback` on transport failure or a non-success
    /// status
    pub async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        tracing::debug!("Fetching remote pronunciation audio: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TutorError::Playback(format!("Remote TTS request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TutorError::Playback(format!(
                "Remote TTS returned error {}: {}",
                status, body
            ))
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TutorError::Playback(format!("Failed to read remote audio: {}", e)))?;
        tracing::debug!("Fetched {} bytes of audio", bytes.len());
        Ok(bytes.to_vec())
    }
}
