//! Transcript messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::extract_chinese_runs;

/// Who wrote a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The learner
    User,
    /// The tutor persona
    Bot,
}

/// One entry of the transcript
///
/// Messages are immutable once created: fields are private and there are
/// no setters. Insertion order in the transcript is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: Uuid,
    content: String,
    sender: Sender,
    timestamp: DateTime<Utc>,
}

impl Message {
    fn new(content: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    /// Creates a message written by the learner
    ///
    /// # Examples
    ///
    /// ```
    /// use hanyu_tutor::conversation::{Message, Sender};
    ///
    /// let msg = Message::user("你好吗");
    /// assert_eq!(msg.sender(), Sender::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, Sender::User)
    }

    /// Creates a message written by the tutor
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(content, Sender::Bot)
    }

    /// Opaque unique identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Message text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Author of the message
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Creation time
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns true for tutor messages
    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }

    /// Chinese runs in the content, recomputed on every call
    ///
    /// # Examples
    ///
    /// ```
    /// use hanyu_tutor::conversation::Message;
    ///
    /// let msg = Message::bot("你好！📝 ni hao");
    /// assert_eq!(msg.chinese_runs(), vec!["你好"]);
    /// ```
    pub fn chinese_runs(&self) -> Vec<&str> {
        extract_chinese_runs(&self.content)
    }
}
