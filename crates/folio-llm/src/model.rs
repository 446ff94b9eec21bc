use serde::{Deserialize, Serialize};

/// A model advertised by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Provider-qualified model name (e.g. `"models/gemini-1.5-flash"`).
    pub name: String,
    /// Human-friendly display name, if the provider supplies one.
    pub display_name: Option<String>,
    /// Whether the model supports conversational generation. Models that
    /// don't (embedding models, rerankers) are filtered out of the picker.
    pub supports_generation: bool,
}

impl ModelInfo {
    /// The bare model id with any `models/` prefix stripped.
    pub fn id(&self) -> &str {
        self.name.strip_prefix("models/").unwrap_or(&self.name)
    }
}
