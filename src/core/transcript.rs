//! # Transcript
//!
//! The ordered list of messages exchanged in the chat. Insertion order is
//! display order. Messages are never removed one at a time; the only way to
//! shrink a transcript is [`Transcript::clear`].
//!
//! ```text
//! Transcript
//! └── messages: Vec<Message>
//!     ├── [0] User      "Hello"   Complete
//!     └── [1] Assistant "Hi!"     Pending → Complete | Error
//! ```
//!
//! `append` hands back a [`MessageHandle`], which is how the controller
//! mutates a message after it has been rendered (reveal ticks, errors).

use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

/// Lifecycle of a message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Waiting for the reply, or reply still being revealed.
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "complete")]
    #[default]
    Complete,
    /// Text holds the error description instead of a reply.
    #[serde(rename = "error")]
    Error,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub text: String,
    #[serde(default)]
    pub status: Status,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            status: Status::Complete,
        }
    }

    /// An empty assistant message waiting for its reply.
    pub fn pending_reply() -> Self {
        Self {
            role: Role::Assistant,
            text: String::new(),
            status: Status::Pending,
        }
    }
}

/// Opaque reference to a message returned by [`Transcript::append`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHandle(usize);

impl MessageHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns a handle to it.
    pub fn append(&mut self, message: Message) -> MessageHandle {
        self.messages.push(message);
        MessageHandle(self.messages.len() - 1)
    }

    pub fn get(&self, handle: MessageHandle) -> Option<&Message> {
        self.messages.get(handle.0)
    }

    /// Replaces the text of a message. Returns `false` for a stale handle.
    pub fn set_text(&mut self, handle: MessageHandle, text: impl Into<String>) -> bool {
        match self.messages.get_mut(handle.0) {
            Some(message) => {
                message.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Appends one reveal token after a single space. The first token of a
    /// reply goes through `set_text` instead.
    pub fn push_token(&mut self, handle: MessageHandle, token: &str) -> bool {
        match self.messages.get_mut(handle.0) {
            Some(message) => {
                message.text.push(' ');
                message.text.push_str(token);
                true
            }
            None => false,
        }
    }

    pub fn set_status(&mut self, handle: MessageHandle, status: Status) -> bool {
        match self.messages.get_mut(handle.0) {
            Some(message) => {
                message.status = status;
                true
            }
            None => false,
        }
    }

    /// Drops every message. Outstanding handles become stale.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Serializes the whole transcript for the store.
    pub fn to_snapshot(&self) -> String {
        // A Vec of plain enums and strings cannot fail to serialize.
        serde_json::to_string(&self.messages).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn from_snapshot(snapshot: &str) -> Result<Self, serde_json::Error> {
        let messages: Vec<Message> = serde_json::from_str(snapshot)?;
        Ok(Self { messages })
    }
}
