pub mod engine;
pub mod error;
pub mod ingest;
pub mod models;
pub mod workspace;

pub use engine::{ACKNOWLEDGEMENT, DEFAULT_MODEL_ID, SUMMARY_INSTRUCTION};
pub use error::{Error, Result};
pub use models::{default_model, generation_models};
pub use workspace::Workspace;
