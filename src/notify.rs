//! User-visible notifications
//!
//! A few situations are reported to the learner outside the transcript: a
//! message that could not be delivered, a machine with no speech synthesizer,
//! and pronunciation served from the remote endpoint. All go through the [`Notifier`] trait so the terminal renderer and tests
//! can decide how they appear.

use colored::Colorize;

use crate::prompts::{
    REMOTE_PRONUNCIATION_DESCRIPTION, REMOTE_PRONUNCIATION_TITLE, SEND_FAILED_DESCRIPTION,
    SEND_FAILED_TITLE, SPEECH_UNSUPPORTED_DESCRIPTION, SPEECH_UNSUPPORTED_TITLE,
};

/// How prominently a notification should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational
    Info,
    /// Something the learner asked for did not happen
    Destructive,
}

/// A transient message shown outside the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short headline
    pub title: String,
    /// One-sentence explanation
    pub description: String,
    /// Display severity
    pub severity: Severity,
}

impl Notification {
    /// Notification raised when a completion request failed
    pub fn send_failed() -> Self {
        Self {
            title: SEND_FAILED_TITLE.to_string(),
            description: SEND_FAILED_DESCRIPTION.to_string(),
            severity: Severity::Destructive,
        }
    }

    /// Notification raised when pronunciation playback is impossible
    pub fn speech_unsupported() -> Self {
        Self {
            title: SPEECH_UNSUPPORTED_TITLE.to_string(),
            description: SPEECH_UNSUPPORTED_DESCRIPTION.to_string(),
            severity: Severity::Destructive,
        }
    }

    /// Notice that a clip was played from the remote endpoint
    pub fn remote_pronunciation() -> Self {
        Self {
            title: REMOTE_PRONUNCIATION_TITLE.to_string(),
            description: REMOTE_PRONUNCIATION_DESCRIPTION.to_string(),
            severity: Severity::Info,
        }
    }
}

/// Channel for user-visible notifications
pub trait Notifier: Send + Sync {
    /// Show a notification to the learner
    fn notify(&self, notification: &Notification);
}

/// Prints notifications to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    /// Render a notification as a single terminal line
    pub fn render(notification: &Notification) -> String {
        let title = match notification.severity {
            Severity::Info => notification.title.cyan().bold(),
            Severity::Destructive => notification.title.red().bold(),
        };
        format!("{} {}", title, notification.description)
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::debug!(title = %notification.title, "notification raised");
        eprintln!("{}", Self::render(notification));
    }
}
