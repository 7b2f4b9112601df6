//! OpenRouter completion client
//!
//! Sends the persona prompt plus the learner's latest message to an
//! OpenAI-compatible `/chat/completions` endpoint and extracts the first
//! choice's content.

use crate::config::ProviderConfig;
use crate::error::{Result, TutorError};
use crate::prompts::{generate_tutor_prompt, EMPTY_REPLY_FALLBACK};
use crate::providers::{ChatMessage, CompletionClient};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OpenRouter chat completion client
///
/// # Examples
///
/// ```no_run
/// use hanyu_tutor::config::ProviderConfig;
/// use hanyu_tutor::providers::{CompletionClient, OpenRouterClient};
///
/// # async fn example() -> hanyu_tutor::error::Result<()> {
/// let config = ProviderConfig {
///     api_key: Some("sk-or-...".to_string()),
///     ..ProviderConfig::default()
/// };
/// let client = OpenRouterClient::new(config)?;
/// let reply = client.complete("Xin chào bằng tiếng Trung là gì?").await;
/// println!("{}", reply);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    config: ProviderConfig,
    api_key: String,
    system_prompt: String,
}

/// Request body for `/chat/completions`
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

/// Response body; every level is optional so partial bodies degrade to the
/// empty-reply fallback
#[derive(Debug, Default, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Option<Choice>>,
}

#[derive(Debug, Default, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionResponse {
    fn into_reply(self) -> String {
        self.choices
            .into_iter()
            .next()
            .flatten()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string())
    }
}

impl OpenRouterClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `config` - Provider configuration; `api_key` must be set
    ///
    /// # Errors
    ///
    /// Returns `TutorError::MissingCredentials` if no API key is configured,
    /// or `TutorError::Provider` if the HTTP client cannot be built
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| TutorError::MissingCredentials("openrouter".to_string()))?
            .to_string();

        let client = Client::builder()
            .user_agent("hanyu-tutor/0.1.0")
            .build()
            .map_err(|e| TutorError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized OpenRouter client: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self {
            client,
            config,
            api_key,
            system_prompt: generate_tutor_prompt(),
        })
    }

    /// Full URL of the completion endpoint
    ///
    /// # Examples
    ///
    /// ```
    /// use hanyu_tutor::config::ProviderConfig;
    /// use hanyu_tutor::providers::OpenRouterClient;
    ///
    /// let config = ProviderConfig {
    ///     api_key: Some("key".to_string()),
    ///     ..ProviderConfig::default()
    /// };
    /// let client = OpenRouterClient::new(config).unwrap();
    /// assert_eq!(client.endpoint(), "https://openrouter.ai/api/v1/chat/completions");
    /// ```
    pub fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    fn build_request(&self, user_text: &str) -> CompletionRequest<'_> {
        CompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage::system(self.system_prompt.as_str()),
                ChatMessage::user(user_text),
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn try_complete(&self, user_text: &str) -> Result<String> {
        let url = self.endpoint();
        let request = self.build_request(user_text);

        tracing::debug!(
            "Sending completion request to {}: model={}, {} chars",
            url,
            request.model,
            user_text.chars().count()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OpenRouter request failed: {}", e);
                TutorError::Provider(format!("OpenRouter request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("OpenRouter returned error {}: {}", status, error_text);
            return Err(TutorError::Provider(format!(
                "OpenRouter returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: CompletionResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse OpenRouter response: {}", e);
            TutorError::Provider(format!("Failed to parse OpenRouter response: {}", e))
        })?;

        let reply = body.into_reply();
        tracing::debug!("OpenRouter reply: {} chars", reply.chars().count());
        Ok(reply)
    }
}
