//! Resumable media upload against the Gemini Files API.
//!
//! Two round trips: a `start` request that returns a session URL in the
//! `x-goog-upload-url` header, then a single `upload, finalize` request
//! carrying the file bytes. The returned file is usually still PROCESSING;
//! readiness polling is the caller's concern.

use std::path::Path;

use folio_llm::{DocumentHandle, Error};
use tracing::debug;

use crate::types::{FileEnvelope, FileResource};
use crate::{ProviderState, api_error, to_handle};

pub(crate) async fn upload(
    state: &ProviderState,
    path: &Path,
    mime_type: &str,
) -> Result<DocumentHandle, Error> {
    let bytes = tokio::fs::read(path).await?;
    let display_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let session_url = begin_session(state, &display_name, mime_type, bytes.len()).await?;
    debug!(file = %display_name, bytes = bytes.len(), "uploading document");

    let response = state
        .client
        .post(&session_url)
        .header("X-Goog-Upload-Offset", "0")
        .header("X-Goog-Upload-Command", "upload, finalize")
        .body(bytes)
        .send()
        .await
        .map_err(|e| Error::Http(Box::new(e)))?;
    let envelope: FileEnvelope = crate::read_json(response).await?;

    Ok(to_handle(envelope.file, mime_type))
}

async fn begin_session(
    state: &ProviderState,
    display_name: &str,
    mime_type: &str,
    num_bytes: usize,
) -> Result<String, Error> {
    let url = format!("{}/files", state.config.upload_base_url());
    let metadata = FileEnvelope {
        file: FileResource {
            display_name: Some(display_name.to_string()),
            ..Default::default()
        },
    };

    let response = state
        .authorized(state.client.post(&url))
        .header("X-Goog-Upload-Protocol", "resumable")
        .header("X-Goog-Upload-Command", "start")
        .header("X-Goog-Upload-Header-Content-Length", num_bytes)
        .header("X-Goog-Upload-Header-Content-Type", mime_type)
        .json(&metadata)
        .send()
        .await
        .map_err(|e| Error::Http(Box::new(e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(api_error(status, &body));
    }

    response
        .headers()
        .get("x-goog-upload-url")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| Error::Other("upload session URL missing from start response".into()))
}
