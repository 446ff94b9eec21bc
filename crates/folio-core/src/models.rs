//! Model discovery helpers for the picker: filter to conversational models
//! and choose a sensible default. The engine itself never ranks models.

use folio_llm::ModelInfo;

/// Families tried in order when choosing a default.
const PREFERRED_FAMILIES: [&str; 2] = ["gemini-2.5-flash", "gemini-1.5-flash"];

/// Models that support conversational generation, sorted descending by name
/// so the newest variants list first.
pub fn generation_models(models: &[ModelInfo]) -> Vec<ModelInfo> {
    let mut usable: Vec<ModelInfo> = models
        .iter()
        .filter(|model| model.supports_generation)
        .cloned()
        .collect();
    usable.sort_by(|a, b| b.name.cmp(&a.name));
    usable
}

/// Pick the default model id from an already-filtered list: the first
/// preferred family that matches, otherwise the first entry.
pub fn default_model(models: &[ModelInfo]) -> Option<String> {
    for family in PREFERRED_FAMILIES {
        if let Some(model) = models.iter().find(|m| m.name.contains(family)) {
            return Some(model.id().to_string());
        }
    }
    models.first().map(|model| model.id().to_string())
}
