mod chat;
mod convert;
mod types;
mod upload;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use folio_llm::{
    Conversation, DocumentChatProvider, DocumentChatProviderBackend, DocumentHandle, DocumentState,
    Error, ModelInfo, SeedMessage,
};

use crate::types::{FileResource, ListModelsResponse};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub const PROVIDER_NAME: &str = "gemini";

/// Configuration for the Gemini provider.
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
        }
    }
}

impl GeminiConfig {
    /// Media uploads live under `/upload/v1beta` rather than `/v1beta`.
    fn upload_base_url(&self) -> String {
        match self.base_url.strip_suffix("/v1beta") {
            Some(root) => format!("{root}/upload/v1beta"),
            None => format!("{}/upload", self.base_url),
        }
    }
}

/// Create a Gemini provider with the given config.
pub fn provider(config: GeminiConfig) -> DocumentChatProvider {
    DocumentChatProvider::new(GeminiProvider {
        state: Arc::new(ProviderState {
            client: reqwest::Client::new(),
            config,
        }),
    })
}

/// Create a Gemini provider reading `GEMINI_API_KEY` from the environment.
pub fn from_env() -> DocumentChatProvider {
    provider(GeminiConfig {
        api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
        ..Default::default()
    })
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

pub(crate) struct ProviderState {
    pub(crate) client: reqwest::Client,
    pub(crate) config: GeminiConfig,
}

impl ProviderState {
    pub(crate) fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("x-goog-api-key", &self.config.api_key)
    }
}

struct GeminiProvider {
    state: Arc<ProviderState>,
}

#[async_trait]
impl DocumentChatProviderBackend for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, Error> {
        let url = format!("{}/models?pageSize=1000", self.state.config.base_url);
        let response = self
            .state
            .authorized(self.state.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::Http(Box::new(e)))?;
        let parsed: ListModelsResponse = read_json(response).await?;

        Ok(parsed
            .models
            .into_iter()
            .map(|entry| ModelInfo {
                supports_generation: entry
                    .supported_generation_methods
                    .iter()
                    .any(|method| method == "generateContent"),
                name: entry.name,
                display_name: entry.display_name,
            })
            .collect())
    }

    async fn upload_file(&self, path: &Path, mime_type: &str) -> Result<DocumentHandle, Error> {
        upload::upload(&self.state, path, mime_type).await
    }

    async fn document_state(&self, handle: &DocumentHandle) -> Result<DocumentHandle, Error> {
        let url = format!("{}/{}", self.state.config.base_url, handle.name);
        let response = self
            .state
            .authorized(self.state.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::Http(Box::new(e)))?;
        let file: FileResource = read_json(response).await?;
        Ok(to_handle(file, &handle.mime_type))
    }

    fn start_conversation(&self, model_id: &str, seed: Vec<SeedMessage>) -> Conversation {
        Conversation::new(chat::GeminiConversation::new(
            Arc::clone(&self.state),
            model_id,
            &seed,
        ))
    }
}

pub(crate) fn to_handle(file: FileResource, fallback_mime: &str) -> DocumentHandle {
    let state = match file.state.as_str() {
        "ACTIVE" => DocumentState::Ready,
        "FAILED" => DocumentState::Failed,
        _ => DocumentState::Processing,
    };
    DocumentHandle {
        name: file.name,
        uri: file.uri,
        mime_type: file
            .mime_type
            .unwrap_or_else(|| fallback_mime.to_string()),
        state,
    }
}

/// Deserialize a successful response body, or map an API error envelope to
/// [`Error::Api`] with the HTTP status as the code.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, Error> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| Error::Http(Box::new(e)));
    }

    let body = response.text().await.unwrap_or_default();
    Err(api_error(status, &body))
}

pub(crate) fn api_error(status: reqwest::StatusCode, body: &str) -> Error {
    let message = match serde_json::from_str::<types::ApiErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => {
            if envelope.error.status.is_empty() {
                envelope.error.message
            } else {
                format!("{}: {}", envelope.error.status, envelope.error.message)
            }
        }
        _ => body.to_string(),
    };
    Error::Api {
        code: status.as_str().to_string(),
        message,
    }
}
