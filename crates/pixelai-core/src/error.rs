use thiserror::Error;

#[derive(Error, Debug)]
pub enum PixelError {
    #[error("conversation history is empty")]
    InvalidHistory,

    #[error("Invalid response from API - no content generated")]
    MalformedResponse,

    #[error("API key is missing or invalid")]
    MissingCredential,

    #[error("{0}")]
    Transport(String),

    #[error("API request failed: {status} {reason}. {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },

    #[error("Unknown conversation: {0}")]
    UnknownConversation(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PixelError {
    pub fn api(status: u16, reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            reason: reason.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PixelError>;
