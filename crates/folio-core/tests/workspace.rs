//! End-to-end controller tests against a scripted in-memory provider.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use folio_core::{SUMMARY_INSTRUCTION, Workspace};
use folio_llm::{
    Conversation, ConversationBackend, DocumentChatProvider, DocumentChatProviderBackend,
    DocumentHandle, DocumentState, Error, ModelInfo, SeedMessage,
};
use folio_store::{SessionRecord, SessionStore};

#[derive(Default)]
struct MockState {
    uploads: AtomicUsize,
    summary_calls: AtomicUsize,
    questions: Mutex<Vec<String>>,
    seeds: Mutex<Vec<Vec<SeedMessage>>>,
    fail_sends: AtomicBool,
    expired_sends: AtomicUsize,
}

struct MockProvider {
    state: Arc<MockState>,
}

#[async_trait]
impl DocumentChatProviderBackend for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, Error> {
        Ok(Vec::new())
    }

    async fn upload_file(&self, _path: &Path, mime_type: &str) -> Result<DocumentHandle, Error> {
        let n = self.state.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(DocumentHandle {
            name: format!("files/mock-{n}"),
            uri: format!("https://mock/files/mock-{n}"),
            mime_type: mime_type.to_string(),
            state: DocumentState::Ready,
        })
    }

    async fn document_state(&self, handle: &DocumentHandle) -> Result<DocumentHandle, Error> {
        Ok(handle.clone())
    }

    fn start_conversation(&self, model_id: &str, seed: Vec<SeedMessage>) -> Conversation {
        self.state.seeds.lock().unwrap().push(seed);
        Conversation::new(MockConversation {
            state: Arc::clone(&self.state),
            model_id: model_id.to_string(),
        })
    }
}

struct MockConversation {
    state: Arc<MockState>,
    model_id: String,
}

#[async_trait]
impl ConversationBackend for MockConversation {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn send(&mut self, text: &str) -> Result<String, Error> {
        if self.state.expired_sends.load(Ordering::SeqCst) > 0 {
            self.state.expired_sends.fetch_sub(1, Ordering::SeqCst);
            return Err(Error::Api {
                code: "403".into(),
                message: "PERMISSION_DENIED: File mock has expired".into(),
            });
        }
        if self.state.fail_sends.load(Ordering::SeqCst) {
            return Err(Error::Api {
                code: "429".into(),
                message: "rate limited".into(),
            });
        }

        if text == SUMMARY_INSTRUCTION {
            self.state.summary_calls.fetch_add(1, Ordering::SeqCst);
            return Ok("S".to_string());
        }

        self.state.questions.lock().unwrap().push(text.to_string());
        Ok("Gradient descent.".to_string())
    }
}

struct Fixture {
    state: Arc<MockState>,
    workspace: Workspace,
    sessions_dir: std::path::PathBuf,
    _dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let sessions_dir = dir.path().join("sessions");
        let state = Arc::new(MockState::default());
        let provider = DocumentChatProvider::new(MockProvider {
            state: Arc::clone(&state),
        });
        let store = SessionStore::open(&sessions_dir).expect("store");
        let workspace = Workspace::new(provider, store, None);
        Self {
            state,
            workspace,
            sessions_dir,
            _dir: dir,
        }
    }

    fn write_pdf(&self, name: &str) -> std::path::PathBuf {
        let path = self._dir.path().join(name);
        std::fs::write(&path, b"%PDF-1.4 test").expect("write pdf");
        path
    }

    /// A second store handle onto the same directory, to inspect what was
    /// actually persisted.
    fn reader(&self) -> SessionStore {
        SessionStore::open(&self.sessions_dir).expect("reader")
    }
}

#[tokio::test]
async fn upload_summarize_then_ask_persists_the_exchange() {
    let mut fx = Fixture::new();
    let pdf = fx.write_pdf("paper.pdf");

    fx.workspace.attach_document(&pdf).await.expect("attach");
    assert!(fx.workspace.document_ready());
    assert_eq!(fx.workspace.summary(), Some("S"));
    assert!(fx.workspace.turns().is_empty());

    // The summary alone is already persisted.
    let stored = fx
        .reader()
        .load(fx.workspace.session_id())
        .unwrap()
        .expect("record");
    assert_eq!(stored.summary.as_deref(), Some("S"));
    assert!(stored.turns.is_empty());

    let reply = fx.workspace.send("What is the method?").await.expect("send");
    assert_eq!(reply, "Gradient descent.");

    let turns = fx.workspace.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].content, "What is the method?");
    assert_eq!(turns[1].content, "Gradient descent.");

    let stored = fx
        .reader()
        .load(fx.workspace.session_id())
        .unwrap()
        .expect("record");
    assert_eq!(stored.turns, fx.workspace.turns());
    assert_eq!(stored.title, "What is the method?");
}

#[tokio::test]
async fn summary_is_never_regenerated_for_a_resumed_session() {
    let mut fx = Fixture::new();
    let pdf = fx.write_pdf("paper.pdf");

    fx.workspace.attach_document(&pdf).await.expect("attach");
    fx.workspace.send("q1").await.expect("send");
    assert_eq!(fx.state.summary_calls.load(Ordering::SeqCst), 1);
    let id = fx.workspace.session_id().to_string();

    // Simulate a restart: load the session and resume its document.
    fx.workspace.new_session();
    fx.workspace.load_session(&id).expect("load");
    assert!(!fx.workspace.document_ready());
    let resumed = fx.workspace.resume_document().await.expect("resume");
    assert!(resumed);

    // The cached summary was reused, not regenerated.
    assert_eq!(fx.state.summary_calls.load(Ordering::SeqCst), 1);

    // Rehydration replayed the stored turns: instructions pair + 2 turns.
    let seeds = fx.state.seeds.lock().unwrap();
    let last_seed = seeds.last().expect("seed");
    assert_eq!(last_seed.len(), 2 + 2);
}

#[tokio::test]
async fn failed_ask_leaves_the_durable_log_unchanged() {
    let mut fx = Fixture::new();
    let pdf = fx.write_pdf("paper.pdf");
    fx.workspace.attach_document(&pdf).await.expect("attach");

    fx.state.fail_sends.store(true, Ordering::SeqCst);
    let err = fx.workspace.send("doomed question").await.unwrap_err();
    assert!(err.to_string().contains("generation failed"));

    assert!(fx.workspace.turns().is_empty());
    let stored = fx
        .reader()
        .load(fx.workspace.session_id())
        .unwrap()
        .expect("record");
    assert!(stored.turns.is_empty());

    // The session recovers once the provider does.
    fx.state.fail_sends.store(false, Ordering::SeqCst);
    fx.workspace.send("second try").await.expect("send");
    assert_eq!(fx.workspace.turns().len(), 2);
}

#[tokio::test]
async fn expired_handle_is_refreshed_with_a_single_reupload() {
    let mut fx = Fixture::new();
    let pdf = fx.write_pdf("paper.pdf");
    fx.workspace.attach_document(&pdf).await.expect("attach");
    assert_eq!(fx.state.uploads.load(Ordering::SeqCst), 1);

    fx.state.expired_sends.store(1, Ordering::SeqCst);
    let reply = fx.workspace.send("still there?").await.expect("send");
    assert_eq!(reply, "Gradient descent.");

    assert_eq!(fx.state.uploads.load(Ordering::SeqCst), 2);
    assert_eq!(fx.workspace.turns().len(), 2);
}

#[tokio::test]
async fn missing_local_document_blocks_chat_but_not_reads() {
    let fx = Fixture::new();
    let mut record = SessionRecord::default();
    record.document_path = Some(fx._dir.path().join("deleted.pdf"));
    record.summary = Some("cached summary".into());
    record.turns = vec![
        folio_llm::Turn::user("old q"),
        folio_llm::Turn::assistant("old a"),
    ];
    fx.reader().save("stale", &record).unwrap();

    let mut fx = fx;
    fx.workspace.load_session("stale").expect("load");

    // The document is treated as absent; nothing was uploaded.
    assert!(!fx.workspace.resume_document().await.expect("resume"));
    assert!(fx.workspace.local_document().is_none());
    assert_eq!(fx.state.uploads.load(Ordering::SeqCst), 0);

    // Persisted data stays readable, but chat requires a document.
    assert_eq!(fx.workspace.summary(), Some("cached summary"));
    assert_eq!(fx.workspace.turns().len(), 2);
    let err = fx.workspace.send("anyone home?").await.unwrap_err();
    assert!(matches!(err, folio_core::Error::DocumentMissing));
}

#[tokio::test]
async fn deleting_the_active_session_resets_to_a_fresh_one() {
    let mut fx = Fixture::new();
    let pdf = fx.write_pdf("paper.pdf");
    fx.workspace.attach_document(&pdf).await.expect("attach");
    fx.workspace.send("q").await.expect("send");

    let id = fx.workspace.session_id().to_string();
    assert_eq!(fx.workspace.list_sessions().unwrap().len(), 1);

    fx.workspace.delete_session(&id).expect("delete");
    assert!(fx.workspace.list_sessions().unwrap().is_empty());
    assert_ne!(fx.workspace.session_id(), id);
    assert!(fx.workspace.turns().is_empty());
    assert!(fx.workspace.summary().is_none());
}
