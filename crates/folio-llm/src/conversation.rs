use async_trait::async_trait;

use crate::document::DocumentHandle;
use crate::error::Error;
use crate::turn::{Role, Turn};

/// One entry of a conversation seed: a role plus the parts that make up the
/// message. Only the opening user message ever carries a document part.
#[derive(Debug, Clone)]
pub struct SeedMessage {
    pub role: Role,
    pub parts: Vec<SeedPart>,
}

#[derive(Debug, Clone)]
pub enum SeedPart {
    Text(String),
    Document(DocumentHandle),
}

impl SeedMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![SeedPart::Text(text.into())],
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            parts: vec![SeedPart::Text(text.into())],
        }
    }
}

impl From<&Turn> for SeedMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            parts: vec![SeedPart::Text(turn.content.clone())],
        }
    }
}

/// A concrete, type-erased live conversation handle.
///
/// Wraps a [`ConversationBackend`] so callers never need generics. The handle
/// accumulates turns provider-side (or client-side, for stateless REST
/// providers) and is **not** durable — it must be rebuilt from the stored
/// turn log after a session load or process restart.
pub struct Conversation {
    inner: Box<dyn ConversationBackend>,
}

impl Conversation {
    /// Wrap any backend implementation into a conversation.
    pub fn new(backend: impl ConversationBackend + 'static) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    /// The model this conversation runs against.
    pub fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    /// Append a user turn, obtain exactly one reply turn, and return its
    /// text. On failure the conversation context is left as it was before
    /// the call.
    pub async fn send(&mut self, text: &str) -> Result<String, Error> {
        self.inner.send(text).await
    }
}

/// Trait that provider crates implement for a live conversation.
#[async_trait]
pub trait ConversationBackend: Send {
    fn model_id(&self) -> &str;
    async fn send(&mut self, text: &str) -> Result<String, Error>;
}
