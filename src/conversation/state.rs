//! Conversation state machine
//!
//! [`ConversationState`] owns the transcript, the learner's name and the
//! pending-request flag. Every change goes through [`ConversationState::apply`],
//! which consumes one [`Event`] and returns the [`Effect`] the driver must
//! perform. The state itself never touches the network.
//!
//! # Transitions
//!
//! ```text
//! AwaitingName --SetName(non-blank)--> Chatting
//! Chatting --SendMessage(non-blank, idle)--> Chatting [pending]
//! Chatting [pending] --CompletionResolved--> Chatting
//! ```
//!
//! Anything else is a silent no-op.

use crate::chat_phase::ChatPhase;
use crate::conversation::message::Message;
use crate::notify::Notification;
use crate::prompts::welcome_message;

/// Outcome of one completion request, posted back to the state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    /// Text to append as the bot reply
    pub reply: String,
    /// False when the request failed and `reply` is the network fallback
    pub delivered: bool,
}

impl CompletionResult {
    /// A reply produced by the completion service
    pub fn delivered(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            delivered: true,
        }
    }

    /// A fallback reply standing in for a failed request
    pub fn failed(fallback: impl Into<String>) -> Self {
        Self {
            reply: fallback.into(),
            delivered: false,
        }
    }
}

/// Input to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Raw input submission, routed by the current phase
    Submit(String),
    /// Set the learner's display name
    SetName(String),
    /// Send a message to the tutor
    SendMessage(String),
    /// The in-flight completion finished
    CompletionResolved(CompletionResult),
}

/// Work the driver must do after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Nothing to do
    None,
    /// Start a completion for this text and post the result back
    RequestCompletion(String),
    /// Show a notification
    Notify(Notification),
}

/// Bot message with the Chinese runs it offers for playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speakable<'a> {
    /// Position of the message in the transcript
    pub message_index: usize,
    /// Chinese runs in left-to-right order
    pub runs: Vec<&'a str>,
}

/// Conversation held for one session
///
/// Created empty, mutated only through [`ConversationState::apply`] and its
/// wrappers, discarded with the session.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    transcript: Vec<Message>,
    display_name: Option<String>,
    pending_request: bool,
}

impl ConversationState {
    /// Creates an empty conversation awaiting the learner's name
    ///
    /// # Examples
    ///
    /// ```
    /// use hanyu_tutor::conversation::ConversationState;
    /// use hanyu_tutor::chat_phase::ChatPhase;
    ///
    /// let state = ConversationState::new();
    /// assert_eq!(state.phase(), ChatPhase::AwaitingName);
    /// assert!(state.transcript().is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in chronological order
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// The learner's name once onboarding is done
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// True iff a non-empty display name has been set
    pub fn onboarding_complete(&self) -> bool {
        self.display_name.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// True while a completion request is in flight
    pub fn pending_request(&self) -> bool {
        self.pending_request
    }

    /// Current interaction phase
    pub fn phase(&self) -> ChatPhase {
        if self.onboarding_complete() {
            ChatPhase::Chatting
        } else {
            ChatPhase::AwaitingName
        }
    }

    /// Most recent tutor message, if any
    pub fn last_bot_message(&self) -> Option<&Message> {
        self.transcript.iter().rev().find(|m| m.is_bot())
    }

    /// Tutor messages that contain Chinese, with their runs
    ///
    /// Learner messages are never offered for playback.
    pub fn speakable(&self) -> Vec<Speakable<'_>> {
        self.transcript
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_bot())
            .filter_map(|(message_index, m)| {
                let runs = m.chinese_runs();
                (!runs.is_empty()).then_some(Speakable {
                    message_index,
                    runs,
                })
            })
            .collect()
    }

    /// Apply one event and return the effect to perform
    ///
    /// # Examples
    ///
    /// ```
    /// use hanyu_tutor::conversation::{ConversationState, Effect, Event};
    ///
    /// let mut state = ConversationState::new();
    /// assert_eq!(state.apply(Event::Submit("An".into())), Effect::None);
    /// assert_eq!(
    ///     state.apply(Event::Submit(" 你好吗 ".into())),
    ///     Effect::RequestCompletion("你好吗".into())
    /// );
    /// assert!(state.pending_request());
    /// ```
    pub fn apply(&mut self, event: Event) -> Effect {
        match event {
            Event::Submit(raw) => match self.phase() {
                ChatPhase::AwaitingName => {
                    self.set_name(&raw);
                    Effect::None
                }
                ChatPhase::Chatting => self
                    .send_message(&raw)
                    .map(Effect::RequestCompletion)
                    .unwrap_or(Effect::None),
            },
            Event::SetName(raw) => {
                self.set_name(&raw);
                Effect::None
            }
            Event::SendMessage(raw) => self
                .send_message(&raw)
                .map(Effect::RequestCompletion)
                .unwrap_or(Effect::None),
            Event::CompletionResolved(result) => self.resolve(result),
        }
    }

    /// Set the learner's name and append the welcome message
    ///
    /// Blank input, or a second call once chatting, is ignored.
    ///
    /// # Returns
    ///
    /// True if the transition happened
    pub fn set_name(&mut self, raw: &str) -> bool {
        let name = raw.trim();
        if name.is_empty() || self.onboarding_complete() {
            return false;
        }

        tracing::info!("Learner onboarded as {}", name);
        self.display_name = Some(name.to_string());
        self.transcript.push(Message::bot(welcome_message(name)));
        true
    }

    /// Append a learner message and mark a request as pending
    ///
    /// Ignored when the input is blank, a request is already pending, or the
    /// learner has not given a name yet.
    ///
    /// # Returns
    ///
    /// The trimmed text to send to the completion service, if accepted
    pub fn send_message(&mut self, raw: &str) -> Option<String> {
        let text = raw.trim();
        if text.is_empty() || self.pending_request || !self.onboarding_complete() {
            if self.pending_request && !text.is_empty() {
                tracing::debug!("Ignoring message while a reply is pending");
            }
            return None;
        }

        self.transcript.push(Message::user(text));
        self.pending_request = true;
        Some(text.to_string())
    }

    /// Append the bot reply for the in-flight request
    ///
    /// A result arriving with no request pending is dropped.
    pub fn resolve(&mut self, result: CompletionResult) -> Effect {
        if !self.pending_request {
            tracing::warn!("Dropping completion result with no pending request");
            return Effect::None;
        }

        self.transcript.push(Message::bot(result.reply));
        self.pending_request = false;

        if result.delivered {
            Effect::None
        } else {
            Effect::Notify(Notification::send_failed())
        }
    }
}
