pub mod conversation;
pub mod document;
pub mod error;
pub mod model;
pub mod provider;
pub mod turn;

pub use conversation::{Conversation, ConversationBackend, SeedMessage, SeedPart};
pub use document::{DocumentHandle, DocumentState};
pub use error::Error;
pub use model::ModelInfo;
pub use provider::{DocumentChatProvider, DocumentChatProviderBackend};
pub use turn::{Role, Turn};
