pub mod error;
pub mod chat;
pub mod llm;
pub mod context;
pub mod config;
pub mod session;

// Re-export key types
pub use error::PixelError;
pub use chat::{Attachment, AttachmentKind, Message, Speaker};
pub use llm::{build_request, parse_response, GeminiClient, GenerateContentRequest, LlmClient};
pub use context::{Conversation, ConversationSet};
pub use config::Settings;
pub use session::{ChatSession, PendingRequest, SendStart};
