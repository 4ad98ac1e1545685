use crate::chat::{Message, Speaker};
use crate::error::PixelError;

pub const DEFAULT_TITLE: &str = "New Conversation";
/// Number of characters of the opening user turn kept in a title.
pub const TITLE_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: u64,
    pub title: String,
    messages: Vec<Message>,
    titled: bool,
}

impl Conversation {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            titled: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    fn push(&mut self, message: Message) {
        if !self.titled && message.speaker == Speaker::Assistant {
            if let Some(prev) = self.messages.last().filter(|m| m.speaker == Speaker::User) {
                self.title = title_from(&prev.text);
                self.titled = true;
            }
        }
        self.messages.push(message);
    }
}

fn title_from(text: &str) -> String {
    let mut title: String = text.chars().take(TITLE_CHARS).collect();
    title.push_str("...");
    title
}

/// Every conversation of the running session plus the active pointer.
///
/// The set is never empty and the active id always names a live entry.
#[derive(Debug, Clone)]
pub struct ConversationSet {
    conversations: Vec<Conversation>,
    active_id: u64,
    // never reset, so an id is never handed out twice
    next_id: u64,
}

impl ConversationSet {
    pub fn new() -> Self {
        Self {
            conversations: vec![Conversation::new(1)],
            active_id: 1,
            next_id: 2,
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn active_id(&self) -> u64 {
        self.active_id
    }

    pub fn active(&self) -> &Conversation {
        // active_id is kept pointing at a live entry by every mutation
        self.get(self.active_id)
            .unwrap_or_else(|| &self.conversations[0])
    }

    pub fn get(&self, id: u64) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Conversation> {
        self.conversations.iter()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    pub fn create_conversation(&mut self) -> u64 {
        let id = self.allocate_id();
        self.conversations.push(Conversation::new(id));
        self.active_id = id;
        tracing::info!(id, "created conversation");
        id
    }

    /// Returns whether the active conversation changed; unknown ids are ignored.
    pub fn switch_active(&mut self, id: u64) -> bool {
        if !self.contains(id) {
            tracing::debug!(id, "ignoring switch to unknown conversation");
            return false;
        }
        self.active_id = id;
        true
    }

    /// Returns whether the active conversation changed as a result.
    pub fn delete_conversation(&mut self, id: u64) -> bool {
        if !self.contains(id) {
            return false;
        }

        if self.conversations.len() == 1 {
            let fresh = self.allocate_id();
            self.conversations = vec![Conversation::new(fresh)];
            self.active_id = fresh;
            tracing::info!(id, fresh, "deleted last conversation, starting fresh");
            return true;
        }

        self.conversations.retain(|c| c.id != id);
        tracing::info!(id, "deleted conversation");

        if self.active_id == id {
            if let Some(last) = self.conversations.last() {
                self.active_id = last.id;
            }
            return true;
        }
        false
    }

    pub fn append_message(&mut self, conversation_id: u64, message: Message) -> Result<(), PixelError> {
        let conversation = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
            .ok_or(PixelError::UnknownConversation(conversation_id))?;
        conversation.push(message);
        Ok(())
    }
}

impl Default for ConversationSet {
    fn default() -> Self {
        Self::new()
    }
}
