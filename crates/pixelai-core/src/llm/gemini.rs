use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::PixelError;
use crate::llm::request::GenerateContentRequest;
use crate::llm::traits::LlmClient;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Turn a non-2xx response into an `Api` error, keeping `error.message`
/// from the body when the server sent one.
pub(crate) fn map_http_error(status: reqwest::StatusCode, body: &str) -> PixelError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|w| w.error.message)
        .unwrap_or_default();

    PixelError::api(
        status.as_u16(),
        status.canonical_reason().unwrap_or(""),
        message,
    )
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Value, PixelError> {
        let url = self.endpoint();
        tracing::debug!(
            model = %self.model,
            turns = request.contents.len(),
            "sending generateContent request"
        );

        let mut builder = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("content-type", "application/json")
            .json(request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PixelError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| PixelError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Gemini API returned an error status");
            return Err(map_http_error(status, &response_text));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::warn!("Gemini API returned a non-JSON body: {e}");
            PixelError::MalformedResponse
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn http_error_keeps_server_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        match map_http_error(StatusCode::BAD_REQUEST, body) {
            PixelError::Api {
                status,
                reason,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(reason, "Bad Request");
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn http_error_without_json_body_has_empty_message() {
        let err = map_http_error(StatusCode::SERVICE_UNAVAILABLE, "<html>down</html>");
        assert_eq!(
            err.to_string(),
            "API request failed: 503 Service Unavailable. "
        );
    }

    #[test]
    fn endpoint_joins_model_and_method() {
        let client = GeminiClient::new("k")
            .with_base_url("http://localhost:9000/v1beta/models/")
            .with_model("gemini-test");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-test:generateContent"
        );
    }
}
