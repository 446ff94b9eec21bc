use serde::{Deserialize, Serialize};

/// Provider-side processing state of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentState {
    Processing,
    Ready,
    Failed,
}

/// A provider-side reference to an uploaded document, usable inside a
/// conversation seed.
///
/// Handles have a provider-defined lifetime and may expire at any point;
/// expiry surfaces as a failure on the next use, never proactively. They are
/// never persisted — a reloaded session re-uploads from `document_path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentHandle {
    /// Provider resource name (e.g. `"files/abc123"`).
    pub name: String,
    /// URI to reference the document from a conversation.
    pub uri: String,
    pub mime_type: String,
    pub state: DocumentState,
}
