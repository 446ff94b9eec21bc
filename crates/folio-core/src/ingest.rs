//! Document ingestion: upload a local file and wait for the provider to
//! finish processing it.

use std::path::Path;
use std::time::Duration;

use folio_llm::{DocumentChatProvider, DocumentHandle, DocumentState};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub const PDF_MIME: &str = "application/pdf";

/// Fixed readiness poll interval.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Upload `path` and block until the remote file leaves the `Processing`
/// state. Returns the ready handle, or [`Error::DocumentProcessingFailed`]
/// if the provider reports a terminal failure.
///
/// The poll has no attempt bound here; callers wanting a deadline wrap this
/// in a timeout. Every call creates a fresh remote resource — the caller is
/// responsible for caching the handle while it remains valid.
pub async fn upload(provider: &DocumentChatProvider, path: &Path) -> Result<DocumentHandle> {
    let mut handle = provider
        .upload_file(path, PDF_MIME)
        .await
        .map_err(Error::Ingestion)?;

    loop {
        match handle.state {
            DocumentState::Ready => {
                info!(document = %handle.name, "document ready");
                return Ok(handle);
            }
            DocumentState::Failed => return Err(Error::DocumentProcessingFailed),
            DocumentState::Processing => {
                debug!(document = %handle.name, "document still processing");
                tokio::time::sleep(POLL_INTERVAL).await;
                handle = provider
                    .document_state(&handle)
                    .await
                    .map_err(Error::Ingestion)?;
            }
        }
    }
}
