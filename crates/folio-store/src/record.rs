use std::path::PathBuf;

use chrono::{DateTime, Utc};
use folio_llm::Turn;
use serde::{Deserialize, Serialize};

const TITLE_MAX_CHARS: usize = 50;

pub const DEFAULT_INSTRUCTIONS: &str = "Analyze this paper.";

/// The durable state of one session: one document plus its conversation.
///
/// Serialized as one JSON file per session id. Every field has a default so
/// that records written by older versions (or with keys missing) still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Creation or last-save instant.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    /// Preview string derived from the first stored turn.
    #[serde(default)]
    pub title: String,

    /// Local path of the source document, if one was ever attached.
    #[serde(default)]
    pub document_path: Option<PathBuf>,

    /// The conversation log, in order. Append-only during a live session.
    #[serde(default)]
    pub turns: Vec<Turn>,

    /// Generated document summary; produced once per document and cached.
    #[serde(default)]
    pub summary: Option<String>,

    /// System directive used to seed the conversation.
    #[serde(default = "default_instructions")]
    pub instructions: String,
}

fn default_instructions() -> String {
    DEFAULT_INSTRUCTIONS.to_string()
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self {
            timestamp: Utc::now(),
            title: String::new(),
            document_path: None,
            turns: Vec::new(),
            summary: None,
            instructions: default_instructions(),
        }
    }
}

/// One row of the session list.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub preview: String,
}

/// Derive a session title from the first turn's content, truncated.
pub fn derive_title(turns: &[Turn]) -> Option<String> {
    let first = turns.first()?;
    let normalized = first.content.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return None;
    }
    Some(truncate_chars(&normalized, TITLE_MAX_CHARS))
}

fn truncate_chars(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    input.chars().take(max_chars).collect()
}
