use crate::error::PixelError;
use crate::llm::request::GenerateContentRequest;
use serde_json::Value;

/// The inference endpoint seam. Implementations perform exactly one request
/// per call and hand back the raw JSON body of a successful response;
/// extracting the reply text is left to [`crate::llm::parse_response`].
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate_content(&self, request: &GenerateContentRequest)
        -> Result<Value, PixelError>;
}
