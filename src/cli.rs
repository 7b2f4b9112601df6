//! Command-line interface definition for Hanyu Tutor
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand};

/// Hanyu Tutor - chat with a Chinese teacher in your terminal
///
/// Ask questions in Vietnamese, get the Chinese sentence with pinyin and
/// explanations, and listen to each Chinese phrase.
#[derive(Parser, Debug, Clone)]
#[command(name = "hanyu-tutor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive lesson
    Chat {
        /// Skip the name question and start chatting as NAME
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Ask a single question and print the reply
    Ask {
        /// The question to send
        text: String,
    },

    /// Pronounce a piece of Chinese text
    Speak {
        /// Text to pronounce
        text: String,
    },

    /// Print the Chinese runs found in a piece of text
    Extract {
        /// Text to scan
        text: String,
    },

    /// List installed synthesizer voices and the one that would be used
    Voices,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Chat { name: None },
        }
    }
}
