mod store;

pub use store::{Conversation, ConversationSet, DEFAULT_TITLE, TITLE_CHARS};
