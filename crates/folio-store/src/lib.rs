pub mod error;
pub mod record;
pub mod store;

pub use error::{Error, Result};
pub use record::{SessionRecord, SessionSummary, derive_title};
pub use store::SessionStore;
