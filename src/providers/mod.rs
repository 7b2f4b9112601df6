//! Completion provider module for Hanyu Tutor
//!
//! This module contains the completion client abstraction and the OpenRouter
//! implementation.

pub mod base;
pub mod openrouter;

pub use base::{ChatMessage, CompletionClient};
pub use openrouter::OpenRouterClient;

use crate::config::ProviderConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create a completion client from configuration
///
/// # Arguments
///
/// * `config` - Provider configuration
///
/// # Returns
///
/// Returns a shared client instance
///
/// # Errors
///
/// Returns error if credentials are missing or the HTTP client cannot be built
pub fn create_client(config: &ProviderConfig) -> Result<Arc<dyn CompletionClient>> {
    Ok(Arc::new(OpenRouterClient::new(config.clone())?))
}
