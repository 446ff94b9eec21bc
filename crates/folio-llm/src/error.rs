/// Errors that can occur when interacting with the document-chat provider.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("http error: {0}")]
    Http(Box<dyn std::error::Error + Send + Sync>),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("api error ({code}): {message}")]
    Api { code: String, message: String },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error indicates that a previously uploaded document
    /// handle is no longer usable (the provider expired or deleted it).
    ///
    /// Gemini reports these as 403 PERMISSION_DENIED on the file URI, or as
    /// 400 with a "not in an ACTIVE state" message once the file lapses.
    pub fn is_expired_document(&self) -> bool {
        match self {
            Error::Api { code, message } => {
                code == "403"
                    || message.contains("PERMISSION_DENIED")
                    || message.contains("not in an ACTIVE state")
                    || (message.contains("File ") && message.contains("not exist"))
            }
            _ => false,
        }
    }
}
