//! Completion client trait and request message type
//!
//! This module defines the [`CompletionClient`] trait that the conversation
//! session talks to, and the [`ChatMessage`] shape sent on the wire.

use crate::error::Result;
use crate::prompts::NETWORK_FALLBACK_REPLY;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message in an OpenAI-style chat completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the sender (system, user, assistant)
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message
    ///
    /// # Examples
    ///
    /// ```
    /// use hanyu_tutor::providers::ChatMessage;
    ///
    /// let msg = ChatMessage::system("You are a tutor");
    /// assert_eq!(msg.role, "system");
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Client for the tutor's completion service
///
/// Each call is independent: only the persona prompt and the latest learner
/// message are sent, never earlier turns.
///
/// # Examples
///
/// ```
/// use hanyu_tutor::providers::CompletionClient;
/// use hanyu_tutor::error::Result;
/// use async_trait::async_trait;
///
/// struct Echo;
///
/// #[async_trait]
/// impl CompletionClient for Echo {
///     async fn try_complete(&self, user_text: &str) -> Result<String> {
///         Ok(user_text.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Request a tutor reply for one learner message
    ///
    /// # Arguments
    ///
    /// * `user_text` - The learner's message, already trimmed
    ///
    /// # Returns
    ///
    /// The reply text. A well-formed response without completion text yields
    /// the empty-reply fallback rather than an error.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status, or a body
    /// that is not valid JSON
    async fn try_complete(&self, user_text: &str) -> Result<String>;

    /// Request a tutor reply, substituting the network fallback on failure
    ///
    /// This never fails; the failure is logged.
    async fn complete(&self, user_text: &str) -> String {
        match self.try_complete(user_text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Completion request failed: {:#}", e);
                NETWORK_FALLBACK_REPLY.to_string()
            }
        }
    }
}
