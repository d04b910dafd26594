use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::TranscriptError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    /// Lowercase label used as the role column in the exported transcript.
    pub fn label(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only conversation history. The first element is always the
/// system/context message; later messages can only be appended, never edited.
/// Deserialization enforces the same invariant, so a transcript read back
/// from JSON is as well-formed as a constructed one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawTranscript")]
pub struct Transcript {
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct RawTranscript {
    messages: Vec<Message>,
}

impl TryFrom<RawTranscript> for Transcript {
    type Error = TranscriptError;

    fn try_from(raw: RawTranscript) -> Result<Self, Self::Error> {
        match raw.messages.first() {
            Some(first) if first.role == MessageRole::System => Ok(Self {
                messages: raw.messages,
            }),
            Some(first) => Err(TranscriptError::MissingContext(first.role.label().into())),
            None => Err(TranscriptError::Empty),
        }
    }
}

impl Transcript {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(context)],
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn context(&self) -> &Message {
        // Constructor guarantees the seed system message exists.
        &self.messages[0]
    }

    /// Messages after the system context, in conversation order.
    pub fn exchanges(&self) -> &[Message] {
        &self.messages[1..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
