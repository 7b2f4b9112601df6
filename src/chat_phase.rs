//! Interaction phases of a lesson
//!
//! A session starts in `AwaitingName`, where the only accepted input is the
//! learner's name, and moves to `Chatting` once a non-blank name is given.
//! There is no way back.

use colored::Colorize;
use std::fmt;

use crate::prompts::{CHAT_INPUT_PLACEHOLDER, NAME_INPUT_PLACEHOLDER};

/// Phase of the two-step interaction flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatPhase {
    /// Waiting for the learner to type a display name
    #[default]
    AwaitingName,

    /// Free-form chat with the tutor
    Chatting,
}

impl fmt::Display for ChatPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingName => write!(f, "NAME"),
            Self::Chatting => write!(f, "CHAT"),
        }
    }
}

impl ChatPhase {
    /// Input hint shown to the learner in this phase
    ///
    /// # Examples
    ///
    /// ```
    /// use hanyu_tutor::chat_phase::ChatPhase;
    ///
    /// assert_eq!(ChatPhase::AwaitingName.placeholder(), "Nhập tên của bạn...");
    /// ```
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::AwaitingName => NAME_INPUT_PLACEHOLDER,
            Self::Chatting => CHAT_INPUT_PLACEHOLDER,
        }
    }

    /// Returns true once the learner can send messages
    pub fn is_chatting(&self) -> bool {
        matches!(self, Self::Chatting)
    }

    /// Get a colored tag representation of this phase
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use hanyu_tutor::chat_phase::ChatPhase;
    ///
    /// println!("{}", ChatPhase::Chatting.colored_tag()); // "[CHAT]" in red
    /// ```
    pub fn colored_tag(&self) -> String {
        match self {
            Self::AwaitingName => format!("[{}]", "NAME".yellow()),
            Self::Chatting => format!("[{}]", "CHAT".red()),
        }
    }

    /// Format the readline prompt for this phase
    ///
    /// # Examples
    ///
    /// ```
    /// use hanyu_tutor::chat_phase::ChatPhase;
    ///
    /// colored::control::set_override(false);
    /// let prompt = ChatPhase::Chatting.format_colored_prompt();
    /// assert_eq!(prompt, "[CHAT] Hỏi Thầy Quân về tiếng Trung... >> ");
    /// ```
    pub fn format_colored_prompt(&self) -> String {
        format!("{} {} >> ", self.colored_tag(), self.placeholder().dimmed())
    }
}
