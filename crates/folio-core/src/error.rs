use std::path::PathBuf;

/// Failure taxonomy surfaced to the UI layer. All variants are recoverable:
/// they are reported to the user and never terminate the process.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid provider credential; blocks all remote operations.
    #[error("configuration error: {0}")]
    Config(String),

    /// Upload or transfer failure while ingesting a document.
    #[error("document ingestion failed: {0}")]
    Ingestion(#[source] folio_llm::Error),

    /// The provider accepted the upload but reported a terminal processing
    /// failure. Retrying means re-uploading.
    #[error("the provider failed to process the document")]
    DocumentProcessingFailed,

    /// Remote failure during summarize/ask. The durable log is untouched.
    #[error("generation failed: {0}")]
    Generation(#[source] folio_llm::Error),

    /// Local persistence failure. In-memory state remains usable.
    #[error("session storage failed: {0}")]
    Storage(#[from] folio_store::Error),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("document not found: {0}")]
    DocumentNotFound(PathBuf),

    /// Chat was attempted before a document was attached and ingested.
    #[error("no document attached to this session")]
    DocumentMissing,
}

pub type Result<T> = std::result::Result<T, Error>;
