//! Converts between folio-llm generic types and the Gemini wire format.

use folio_llm::{Role, SeedMessage, SeedPart};

use crate::types::{Content, FileData, Part};

/// Gemini names the assistant role `"model"`.
pub fn role_name(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

pub fn seed_to_contents(seed: &[SeedMessage]) -> Vec<Content> {
    seed.iter().map(message_to_content).collect()
}

pub fn message_to_content(message: &SeedMessage) -> Content {
    Content {
        role: role_name(message.role).to_string(),
        parts: message
            .parts
            .iter()
            .map(|part| match part {
                SeedPart::Text(text) => Part::Text(text.clone()),
                SeedPart::Document(handle) => Part::FileData(FileData {
                    mime_type: handle.mime_type.clone(),
                    file_uri: handle.uri.clone(),
                }),
            })
            .collect(),
    }
}

pub fn user_text(text: &str) -> Content {
    Content {
        role: "user".to_string(),
        parts: vec![Part::Text(text.to_string())],
    }
}
