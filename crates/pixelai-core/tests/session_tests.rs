use pixelai_core::{
    Attachment, ChatSession, GenerateContentRequest, LlmClient, Message, PixelError, SendStart,
    Speaker,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

const VALID_KEY: &str = "AIzaTestKey-0123456789abcdef";

/// Mock endpoint that replays canned outcomes and records every request.
struct MockLlm {
    outcomes: Mutex<Vec<Result<Value, PixelError>>>,
    requests: Arc<Mutex<Vec<GenerateContentRequest>>>,
}

impl MockLlm {
    fn new(outcomes: Vec<Result<Value, PixelError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn replying(text: &str) -> Self {
        Self::new(vec![Ok(reply(text))])
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlm {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Value, PixelError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            return Ok(reply("default"));
        }
        outcomes.remove(0)
    }
}

fn reply(text: &str) -> Value {
    json!({"candidates":[{"content":{"parts":[{"text": text}]}}]})
}

fn session() -> ChatSession {
    ChatSession::new(Some(VALID_KEY.to_string()))
}

#[tokio::test]
async fn test_send_appends_user_and_assistant_turns() {
    let mock = MockLlm::replying("Hello!");
    let mut session = session();

    let text = session.send("Hi", &mock).await;

    assert_eq!(text.as_deref(), Some("Hello!"));
    assert_eq!(
        session.messages(),
        &[Message::user("Hi"), Message::assistant("Hello!")]
    );
    assert_eq!(session.store().active().title, "Hi...");
    assert!(!session.is_busy());
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_send_replays_history_to_endpoint() {
    let mock = MockLlm::new(vec![Ok(reply("one")), Ok(reply("two"))]);
    let mut session = session();

    session.send("first", &mock).await;
    session.send("second", &mock).await;

    let requests = mock.requests.lock().unwrap();
    assert_eq!(requests[0].contents.len(), 1);
    assert_eq!(requests[1].contents.len(), 3);
}

#[tokio::test]
async fn test_missing_credential_appends_warning_without_network() {
    let mock = MockLlm::replying("never");
    let mut session = ChatSession::new(None);

    let text = session.send("Hello", &mock).await;

    assert!(text.is_none());
    assert_eq!(mock.calls(), 0);
    let messages = session.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].speaker, Speaker::Assistant);
    assert!(messages[0].text.contains("API key"));
    assert!(messages[0].text.contains("GOOGLE_AI_API_KEY"));
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_short_credential_is_refused() {
    let mut session = ChatSession::new(Some("too-short".to_string())).with_api_key_env("MY_KEY");
    assert!(!session.has_credential());

    assert!(matches!(session.begin_send("Hello"), SendStart::Refused));
    assert!(session.messages()[0].text.contains("MY_KEY"));
}

#[test]
fn test_blank_input_without_attachments_is_ignored() {
    let mut session = session();
    assert!(!session.can_send("   "));
    assert!(matches!(session.begin_send("   "), SendStart::Ignored));
    assert!(session.messages().is_empty());
}

#[test]
fn test_send_while_busy_is_noop() {
    let mut session = session();

    let first = match session.begin_send("first") {
        SendStart::Dispatched(pending) => pending,
        other => panic!("expected dispatch, got {other:?}"),
    };
    assert!(session.is_busy());

    assert!(matches!(session.begin_send("second"), SendStart::Ignored));
    assert_eq!(session.messages(), &[Message::user("first")]);

    session.complete(first, Ok(reply("done")));
    assert!(!session.is_busy());
    assert!(matches!(session.begin_send("second"), SendStart::Dispatched(_)));
}

#[test]
fn test_reply_goes_to_conversation_active_at_send_time() {
    let mut session = session();

    let pending = match session.begin_send("question in 1") {
        SendStart::Dispatched(pending) => pending,
        other => panic!("expected dispatch, got {other:?}"),
    };
    assert_eq!(pending.conversation_id, 1);

    let second = session.new_conversation();
    assert_eq!(session.store().active_id(), second);

    session.complete(pending, Ok(reply("answer for 1")));

    assert!(session.messages().is_empty());
    let first = session.store().get(1).unwrap();
    assert_eq!(
        first.messages(),
        &[Message::user("question in 1"), Message::assistant("answer for 1")]
    );
}

#[test]
fn test_reply_for_deleted_conversation_is_dropped() {
    let mut session = session();
    session.new_conversation(); // 2

    let pending = match session.begin_send("doomed") {
        SendStart::Dispatched(pending) => pending,
        other => panic!("expected dispatch, got {other:?}"),
    };
    session.delete_conversation(2);

    session.complete(pending, Ok(reply("late")));

    assert!(!session.is_busy());
    assert_eq!(session.store().len(), 1);
    assert!(session.messages().is_empty());
}

#[test]
fn test_reply_for_deleted_conversation_skips_recreated_one() {
    let mut session = session();
    session.new_conversation(); // 2

    let pending = match session.begin_send("doomed") {
        SendStart::Dispatched(pending) => pending,
        other => panic!("expected dispatch, got {other:?}"),
    };
    session.delete_conversation(2);
    let fresh = session.new_conversation();
    assert_ne!(fresh, pending.conversation_id);

    session.complete(pending, Ok(reply("late")));

    assert!(!session.is_busy());
    assert!(session.store().get(fresh).unwrap().is_empty());
    assert!(session.store().get(1).unwrap().is_empty());
}

#[test]
fn test_reply_for_deleted_sole_conversation_is_dropped() {
    let mut session = session();

    let pending = match session.begin_send("doomed") {
        SendStart::Dispatched(pending) => pending,
        other => panic!("expected dispatch, got {other:?}"),
    };
    assert_eq!(pending.conversation_id, 1);
    session.delete_conversation(1);
    assert_eq!(session.store().len(), 1);
    assert_ne!(session.store().active_id(), 1);

    session.complete(pending, Ok(reply("late")));

    assert!(!session.is_busy());
    assert!(session.messages().is_empty());
}

#[tokio::test]
async fn test_api_error_becomes_assistant_turn() {
    let mock = MockLlm::new(vec![Err(PixelError::api(
        400,
        "Bad Request",
        "API key not valid.",
    ))]);
    let mut session = session();

    let text = session.send("Hi", &mock).await.unwrap();

    assert_eq!(
        text,
        "❌ API Error: API request failed: 400 Bad Request. API key not valid."
    );
    assert_eq!(session.messages().last().unwrap().speaker, Speaker::Assistant);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_transport_error_mentions_uploaded_files() {
    let mock = MockLlm::new(vec![Err(PixelError::Transport(
        "connection reset".to_string(),
    ))]);
    let mut session = session();
    session.attach(Attachment::from_bytes("a.png", "image/png", b"png"));
    session.attach(Attachment::from_bytes("b.txt", "text/plain", b"txt"));

    let text = session.send("", &mock).await.unwrap();

    assert_eq!(
        text,
        "❌ Network Error: connection reset I can see you uploaded 2 file(s)."
    );
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_malformed_response_becomes_invalid_response_turn() {
    let mock = MockLlm::new(vec![Ok(json!({"candidates": []}))]);
    let mut session = session();

    let text = session.send("Hi", &mock).await.unwrap();

    assert!(text.starts_with("⚠️ Invalid API response"));
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_attachments_move_from_drafts_to_user_turn() {
    let mock = MockLlm::replying("A chart.");
    let mut session = session();
    session.attach(Attachment::from_bytes("chart.png", "image/png", b"img"));
    session.attach(Attachment::from_bytes("data.csv", "text/csv", b"a,b"));
    assert!(session.can_send(""));

    session.send("", &mock).await;

    assert!(session.pending_attachments().is_empty());
    assert_eq!(session.messages()[0].attachments.len(), 2);

    let requests = mock.requests.lock().unwrap();
    assert_eq!(requests[0].contents[0].parts.len(), 2);
}

#[test]
fn test_remove_attachment_by_index() {
    let mut session = session();
    session.attach(Attachment::from_bytes("a.png", "image/png", b"a"));
    session.attach(Attachment::from_bytes("b.png", "image/png", b"b"));

    assert!(session.remove_attachment(5).is_none());
    let removed = session.remove_attachment(0).unwrap();
    assert_eq!(removed.display_name, "a.png");
    assert_eq!(session.pending_attachments().len(), 1);
}

#[test]
fn test_switching_conversation_clears_drafts() {
    let mut session = session();
    session.new_conversation();
    session.attach(Attachment::from_bytes("a.png", "image/png", b"a"));

    assert!(!session.switch_conversation(42));
    assert_eq!(session.pending_attachments().len(), 1);

    assert!(session.switch_conversation(1));
    assert!(session.pending_attachments().is_empty());
}
