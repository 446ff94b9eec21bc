//! Client-side conversation state over the stateless `generateContent`
//! endpoint.
//!
//! Gemini holds no durable conversation object; the "handle" is the
//! accumulated `contents` vector, replayed in full on every request. Seeding
//! therefore costs no generation — only the `send` calls invoke the model.

use std::sync::Arc;

use async_trait::async_trait;
use folio_llm::{ConversationBackend, Error, SeedMessage};
use tracing::warn;

use crate::ProviderState;
use crate::convert::{self, seed_to_contents};
use crate::types::{Content, GenerateContentRequest, GenerateContentResponse, Part};

pub(crate) struct GeminiConversation {
    state: Arc<ProviderState>,
    model_id: String,
    contents: Vec<Content>,
}

impl GeminiConversation {
    pub(crate) fn new(state: Arc<ProviderState>, model_id: &str, seed: &[SeedMessage]) -> Self {
        Self {
            state,
            model_id: model_id.to_string(),
            contents: seed_to_contents(seed),
        }
    }

    async fn generate(&self) -> Result<String, Error> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.state.config.base_url, self.model_id
        );
        let request = GenerateContentRequest {
            contents: &self.contents,
        };

        let response = self
            .state
            .authorized(self.state.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Http(Box::new(e)))?;
        let parsed: GenerateContentResponse = crate::read_json(response).await?;

        extract_reply(parsed)
    }
}

#[async_trait]
impl ConversationBackend for GeminiConversation {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn send(&mut self, text: &str) -> Result<String, Error> {
        self.contents.push(convert::user_text(text));

        match self.generate().await {
            Ok(reply) => {
                self.contents.push(Content {
                    role: "model".to_string(),
                    parts: vec![Part::Text(reply.clone())],
                });
                Ok(reply)
            }
            Err(err) => {
                // Keep the context consistent with the durable log: a failed
                // exchange leaves no trace in the conversation.
                self.contents.pop();
                Err(err)
            }
        }
    }
}

fn extract_reply(response: GenerateContentResponse) -> Result<String, Error> {
    if let Some(feedback) = &response.prompt_feedback
        && let Some(reason) = &feedback.block_reason
    {
        return Err(Error::Other(format!("prompt blocked ({reason})")));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(Error::Other("no candidates in response".into()));
    };

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| match part {
                    Part::Text(text) => Some(text),
                    Part::FileData(_) => None,
                })
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
        warn!(%reason, "candidate returned no text");
        return Err(Error::Other(format!(
            "model returned no text (finish reason: {reason})"
        )));
    }

    Ok(text)
}
