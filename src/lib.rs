//! Hanyu Tutor - a Chinese tutor you chat with in the terminal
//!
//! This library provides the pieces behind the `hanyu-tutor` binary: a
//! persona-driven completion client, a two-phase conversation state machine,
//! extraction of Chinese text from replies, and pronunciation playback with
//! a fallback chain.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `extract`: Finds runs of CJK Unified Ideographs in text
//! - `conversation`: Transcript, state machine and the session driver
//! - `providers`: Completion client abstraction and the OpenRouter client
//! - `speech`: Local synthesizer, remote TTS fallback and audio output
//! - `prompts`: Persona prompt and fixed Vietnamese text
//! - `notify`: User-visible notifications
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use hanyu_tutor::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     hanyu_tutor::commands::chat::run_chat(config, None).await
//! }
//! ```

pub mod chat_phase;
pub mod cli;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;
pub mod extract;
pub mod notify;
pub mod prompts;
pub mod providers;
pub mod speech;

// Re-export commonly used types
pub use chat_phase::ChatPhase;
pub use config::Config;
pub use conversation::{ConversationState, Message, Sender, Session};
pub use error::{Result, TutorError};
pub use extract::extract_chinese_runs;
pub use providers::{CompletionClient, OpenRouterClient};
pub use speech::{SpeechOutcome, SpeechPlayer};

#[cfg(test)]
pub mod test_utils;
