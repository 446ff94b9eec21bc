//! The application controller: one [`Workspace`] per process, holding the
//! active session's durable record plus its ephemeral remote handles.

use std::path::Path;

use chrono::Utc;
use folio_llm::{Conversation, DocumentChatProvider, DocumentHandle, Turn};
use folio_store::{SessionRecord, SessionStore, SessionSummary, derive_title};
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine;
use crate::error::{Error, Result};
use crate::ingest;

/// Session-scoped context object. Created on start, replaced wholesale on a
/// session switch, discarded on process exit.
///
/// The remote document handle and conversation are working state only: they
/// are dropped on every load and rebuilt from the durable record, never
/// reused across sessions. Every mutating operation takes `&mut self`,
/// which keeps at most one remote call in flight per session.
pub struct Workspace {
    provider: DocumentChatProvider,
    store: SessionStore,
    model_id: String,
    session_id: String,
    record: SessionRecord,
    document: Option<DocumentHandle>,
    conversation: Option<Conversation>,
}

impl Workspace {
    /// Start with a fresh, empty session.
    pub fn new(provider: DocumentChatProvider, store: SessionStore, model_id: Option<String>) -> Self {
        Self {
            provider,
            store,
            model_id: model_id.unwrap_or_else(|| engine::DEFAULT_MODEL_ID.to_string()),
            session_id: Uuid::new_v4().to_string(),
            record: SessionRecord::default(),
            document: None,
            conversation: None,
        }
    }

    // -- accessors for the UI layer --

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.record.turns
    }

    pub fn summary(&self) -> Option<&str> {
        self.record.summary.as_deref()
    }

    pub fn instructions(&self) -> &str {
        &self.record.instructions
    }

    /// Set the system directive. Takes effect on the next rehydration, not
    /// on the live conversation.
    pub fn set_instructions(&mut self, instructions: impl Into<String>) {
        self.record.instructions = instructions.into();
    }

    /// Whether a remote document handle is held and ready for chat.
    pub fn document_ready(&self) -> bool {
        self.document.is_some()
    }

    /// The session's local document path, if the file still exists on disk.
    /// A recorded path whose file has since been deleted counts as absent.
    pub fn local_document(&self) -> Option<&Path> {
        self.record
            .document_path
            .as_deref()
            .filter(|path| path.exists())
    }

    // -- session lifecycle --

    /// Allocate a fresh session id and reset all durable and working state.
    pub fn new_session(&mut self) {
        self.session_id = Uuid::new_v4().to_string();
        self.record = SessionRecord::default();
        self.document = None;
        self.conversation = None;
    }

    pub fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        Ok(self.store.list()?)
    }

    /// Switch to a stored session. Remote handles are always rebuilt after a
    /// load, never carried over.
    pub fn load_session(&mut self, id: &str) -> Result<()> {
        let record = self
            .store
            .load(id)?
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;

        self.session_id = id.to_string();
        self.record = record;
        self.document = None;
        self.conversation = None;
        Ok(())
    }

    /// Permanently remove a stored session. Deleting the active session also
    /// resets to a fresh one.
    pub fn delete_session(&mut self, id: &str) -> Result<()> {
        self.store.delete(id)?;
        if id == self.session_id {
            self.new_session();
        }
        Ok(())
    }

    // -- document handling --

    /// Attach a document to the session: upload it if no valid remote handle
    /// exists, rehydrate the conversation from the stored turns, and
    /// generate + persist the summary if the record has none.
    pub async fn attach_document(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::DocumentNotFound(path.to_path_buf()));
        }

        if self.record.document_path.as_deref() != Some(path) {
            // A new document invalidates everything derived from the old one.
            self.record.document_path = Some(path.to_path_buf());
            self.record.summary = None;
            self.document = None;
            self.conversation = None;
        }

        if self.document.is_none() {
            self.document = Some(ingest::upload(&self.provider, path).await?);
        }
        let document = self.document.clone().ok_or(Error::DocumentMissing)?;

        if self.conversation.is_none() {
            self.conversation = Some(engine::rehydrate(
                &self.provider,
                &self.model_id,
                &document,
                &self.record.instructions,
                &self.record.turns,
            ));
        }

        if self.record.summary.is_none() {
            let conversation = self.conversation.as_mut().ok_or(Error::DocumentMissing)?;
            let summary = engine::summarize(conversation)
                .await
                .map_err(Error::Generation)?;
            info!(session = %self.session_id, "summary generated");
            self.record.summary = Some(summary);
            self.persist()?;
        }

        Ok(())
    }

    /// Re-attach the document of a loaded session, if its local file is
    /// still present. Returns whether a document is now ready.
    pub async fn resume_document(&mut self) -> Result<bool> {
        let Some(path) = self.local_document().map(Path::to_path_buf) else {
            return Ok(false);
        };
        self.attach_document(&path).await?;
        Ok(true)
    }

    // -- chat --

    /// Submit a user message and return the reply. On success both turns are
    /// appended to the durable log and persisted; on failure the log is
    /// untouched and the message is rolled back entirely — it is neither
    /// persisted nor kept in the visible transcript.
    pub async fn send(&mut self, text: &str) -> Result<String> {
        let first_attempt = {
            let conversation = self.conversation.as_mut().ok_or(Error::DocumentMissing)?;
            conversation.send(text).await
        };

        let reply = match first_attempt {
            Ok(reply) => reply,
            Err(err) if err.is_expired_document() => self.refresh_and_retry(text, err).await?,
            Err(err) => return Err(Error::Generation(err)),
        };

        self.record.turns.push(Turn::user(text));
        self.record.turns.push(Turn::assistant(&reply));
        if self.record.title.is_empty()
            && let Some(title) = derive_title(&self.record.turns)
        {
            self.record.title = title;
        }
        self.persist()?;

        Ok(reply)
    }

    /// Check-and-refresh for expired remote handles: re-upload the local
    /// document, rehydrate from the durable log, and retry the send once.
    async fn refresh_and_retry(
        &mut self,
        text: &str,
        original: folio_llm::Error,
    ) -> Result<String> {
        let Some(path) = self.local_document().map(Path::to_path_buf) else {
            return Err(Error::Generation(original));
        };
        warn!(session = %self.session_id, "remote document handle expired; re-uploading");

        let document = ingest::upload(&self.provider, &path).await?;
        let mut conversation = engine::rehydrate(
            &self.provider,
            &self.model_id,
            &document,
            &self.record.instructions,
            &self.record.turns,
        );
        let reply = conversation.send(text).await.map_err(Error::Generation)?;

        self.document = Some(document);
        self.conversation = Some(conversation);
        Ok(reply)
    }

    fn persist(&mut self) -> Result<()> {
        self.record.timestamp = Utc::now();
        self.store.save(&self.session_id, &self.record)?;
        Ok(())
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("session_id", &self.session_id)
            .field("model_id", &self.model_id)
            .field("turns", &self.record.turns.len())
            .field("document_ready", &self.document.is_some())
            .finish()
    }
}
