use std::path::Path;

use async_trait::async_trait;

use crate::conversation::{Conversation, SeedMessage};
use crate::document::DocumentHandle;
use crate::error::Error;
use crate::model::ModelInfo;

/// A concrete, type-erased document-chat provider.
///
/// Wraps a [`DocumentChatProviderBackend`] behind a `Box<dyn ...>` so that
/// callers never need generic parameters and tests can swap in mock
/// backends freely.
pub struct DocumentChatProvider {
    inner: Box<dyn DocumentChatProviderBackend>,
}

impl DocumentChatProvider {
    /// Wrap any backend implementation into a provider.
    pub fn new(backend: impl DocumentChatProviderBackend + 'static) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    /// The provider name (e.g. `"gemini"`).
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// List the models the provider advertises.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, Error> {
        self.inner.list_models().await
    }

    /// Transmit a local file and return its remote handle. The returned
    /// handle may still be in the `Processing` state; callers poll
    /// [`document_state`](Self::document_state) until it settles.
    ///
    /// Every upload creates a fresh remote resource — there is no
    /// content-addressed dedup, so callers cache the handle themselves.
    pub async fn upload_file(&self, path: &Path, mime_type: &str) -> Result<DocumentHandle, Error> {
        self.inner.upload_file(path, mime_type).await
    }

    /// Query the current processing state of an uploaded document.
    pub async fn document_state(&self, handle: &DocumentHandle) -> Result<DocumentHandle, Error> {
        self.inner.document_state(handle).await
    }

    /// Open a live conversation against `model_id`, seeded with the given
    /// messages. Seeding never invokes the model — it only establishes the
    /// context future turns are answered against.
    pub fn start_conversation(&self, model_id: &str, seed: Vec<SeedMessage>) -> Conversation {
        self.inner.start_conversation(model_id, seed)
    }
}

/// Trait that provider crates implement.
#[async_trait]
pub trait DocumentChatProviderBackend: Send + Sync {
    fn name(&self) -> &str;
    async fn list_models(&self) -> Result<Vec<ModelInfo>, Error>;
    async fn upload_file(&self, path: &Path, mime_type: &str) -> Result<DocumentHandle, Error>;
    async fn document_state(&self, handle: &DocumentHandle) -> Result<DocumentHandle, Error>;
    fn start_conversation(&self, model_id: &str, seed: Vec<SeedMessage>) -> Conversation;
}
