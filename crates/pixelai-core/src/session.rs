//! Send pipeline for the chat front end.
//!
//! A send is split in two halves so that a UI can keep handling input while
//! the request is in flight: [`ChatSession::begin_send`] records the user turn
//! and hands back a [`PendingRequest`], and [`ChatSession::complete`] files
//! the reply. The reply always lands in the conversation that was active when
//! the send started, even if the user has switched away since.

use serde_json::Value;

use crate::chat::{Attachment, Message};
use crate::config::{validate_api_key, DEFAULT_API_KEY_ENV};
use crate::context::ConversationSet;
use crate::error::PixelError;
use crate::llm::{build_request, parse_response, GenerateContentRequest, LlmClient};

/// An accepted send waiting on the inference endpoint.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub conversation_id: u64,
    pub request: GenerateContentRequest,
    pub attachment_count: usize,
}

#[derive(Debug, Clone)]
pub enum SendStart {
    /// Nothing to send, or a request is already in flight.
    Ignored,
    /// No usable credential; a warning turn was appended instead.
    Refused,
    Dispatched(PendingRequest),
}

pub struct ChatSession {
    store: ConversationSet,
    drafts: Vec<Attachment>,
    busy: bool,
    api_key: Option<String>,
    api_key_env: String,
}

impl ChatSession {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            store: ConversationSet::new(),
            drafts: Vec::new(),
            busy: false,
            api_key,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }

    /// Name of the environment variable quoted in the missing-key warning.
    pub fn with_api_key_env(mut self, env: impl Into<String>) -> Self {
        self.api_key_env = env.into();
        self
    }

    pub fn store(&self) -> &ConversationSet {
        &self.store
    }

    /// Messages of the active conversation, i.e. what the view shows.
    pub fn messages(&self) -> &[Message] {
        self.store.active().messages()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn has_credential(&self) -> bool {
        validate_api_key(self.api_key.as_deref()).is_ok()
    }

    pub fn pending_attachments(&self) -> &[Attachment] {
        &self.drafts
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.drafts.push(attachment);
    }

    pub fn remove_attachment(&mut self, index: usize) -> Option<Attachment> {
        (index < self.drafts.len()).then(|| self.drafts.remove(index))
    }

    pub fn new_conversation(&mut self) -> u64 {
        self.drafts.clear();
        self.store.create_conversation()
    }

    pub fn switch_conversation(&mut self, id: u64) -> bool {
        let switched = self.store.switch_active(id);
        if switched {
            self.drafts.clear();
        }
        switched
    }

    pub fn delete_conversation(&mut self, id: u64) {
        if self.store.delete_conversation(id) {
            self.drafts.clear();
        }
    }

    /// Whether the send control should be enabled for `text`.
    pub fn can_send(&self, text: &str) -> bool {
        !self.busy && (!text.trim().is_empty() || !self.drafts.is_empty())
    }

    pub fn begin_send(&mut self, text: &str) -> SendStart {
        if !self.can_send(text) {
            return SendStart::Ignored;
        }

        if !self.has_credential() {
            tracing::warn!("refusing to send: {}", PixelError::MissingCredential);
            let warning = Message::assistant(missing_key_text(&self.api_key_env));
            let active = self.store.active_id();
            if let Err(e) = self.store.append_message(active, warning) {
                tracing::warn!("could not record credential warning: {e}");
            }
            return SendStart::Refused;
        }

        let attachments = std::mem::take(&mut self.drafts);
        let attachment_count = attachments.len();
        let conversation_id = self.store.active_id();
        if let Err(e) = self
            .store
            .append_message(conversation_id, Message::user_with_attachments(text, attachments))
        {
            tracing::warn!("could not record user turn: {e}");
            return SendStart::Ignored;
        }

        let history = self
            .store
            .get(conversation_id)
            .map(|c| c.messages())
            .unwrap_or_default();
        let request = match build_request(history) {
            Ok(request) => request,
            Err(e) => {
                self.file_reply(conversation_id, error_text(&e, attachment_count));
                return SendStart::Ignored;
            }
        };

        self.busy = true;
        tracing::debug!(conversation_id, attachment_count, "dispatching request");
        SendStart::Dispatched(PendingRequest {
            conversation_id,
            request,
            attachment_count,
        })
    }

    /// File the outcome of a dispatched request and release the send control.
    /// Returns the text of the assistant turn that was produced.
    pub fn complete(
        &mut self,
        pending: PendingRequest,
        outcome: Result<Value, PixelError>,
    ) -> String {
        let text = match outcome.and_then(|raw| parse_response(&raw)) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(conversation_id = pending.conversation_id, "request failed: {e}");
                error_text(&e, pending.attachment_count)
            }
        };
        self.file_reply(pending.conversation_id, text.clone());
        self.busy = false;
        text
    }

    /// Run a whole send against `client`. Returns `None` when the send was
    /// ignored or refused before any request was made.
    pub async fn send(&mut self, text: &str, client: &dyn LlmClient) -> Option<String> {
        match self.begin_send(text) {
            SendStart::Dispatched(pending) => {
                let outcome = client.generate_content(&pending.request).await;
                Some(self.complete(pending, outcome))
            }
            SendStart::Ignored | SendStart::Refused => None,
        }
    }

    fn file_reply(&mut self, conversation_id: u64, text: String) {
        if let Err(e) = self
            .store
            .append_message(conversation_id, Message::assistant(text))
        {
            tracing::warn!("dropping reply: {e}");
        }
    }
}

fn missing_key_text(env: &str) -> String {
    format!(
        "⚠️ API key is missing or invalid. Please set your {env} environment variable \
         with a valid Google AI API key. Get one from https://aistudio.google.com/app/apikey"
    )
}

/// The assistant turn shown in place of a reply when a request fails.
pub fn error_text(err: &PixelError, attachment_count: usize) -> String {
    let files = if attachment_count > 0 {
        format!(" I can see you uploaded {attachment_count} file(s).")
    } else {
        String::new()
    };

    match err {
        PixelError::Api { .. } => format!("❌ API Error: {err}{files}"),
        PixelError::MalformedResponse | PixelError::InvalidHistory => format!(
            "⚠️ Invalid API response. Please check your API key and try again.{files}"
        ),
        PixelError::MissingCredential => missing_key_text(DEFAULT_API_KEY_ENV),
        other => format!("❌ Network Error: {other}{files}"),
    }
}
