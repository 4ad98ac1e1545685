//! Wire payload assembly and response extraction for `generateContent`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chat::{Message, Speaker};
use crate::error::PixelError;

/// Sent in place of empty text on the newest turn (image-only messages).
pub const IMAGE_PROMPT_FALLBACK: &str = "What is in this image?";
pub const TEMPERATURE: f64 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 1024;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Model,
}

impl From<Speaker> for WireRole {
    fn from(speaker: Speaker) -> Self {
        match speaker {
            Speaker::User => WireRole::User,
            Speaker::Assistant => WireRole::Model,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    pub role: WireRole,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

/// Map a conversation history onto the `generateContent` body.
///
/// Earlier turns are replayed as text only. The newest turn is always sent
/// with the `user` role and carries inline data for its image attachments;
/// non-image attachments stay local and are never uploaded.
pub fn build_request(history: &[Message]) -> Result<GenerateContentRequest, PixelError> {
    let (last, earlier) = history.split_last().ok_or(PixelError::InvalidHistory)?;

    let mut contents: Vec<Content> = earlier
        .iter()
        .map(|m| Content {
            role: m.speaker.into(),
            parts: vec![Part::Text {
                text: m.text.clone(),
            }],
        })
        .collect();

    let text = if last.text.is_empty() {
        IMAGE_PROMPT_FALLBACK.to_string()
    } else {
        last.text.clone()
    };
    let mut parts = vec![Part::Text { text }];
    parts.extend(
        last.attachments
            .iter()
            .filter(|a| a.is_image())
            .map(|a| Part::InlineData {
                inline_data: InlineData {
                    mime_type: a.mime_type.clone(),
                    data: a.base64_data().to_string(),
                },
            }),
    );
    contents.push(Content {
        role: WireRole::User,
        parts,
    });

    Ok(GenerateContentRequest {
        contents,
        generation_config: GenerationConfig::default(),
    })
}

/// Pull `candidates[0].content.parts[0].text` out of a raw response body.
pub fn parse_response(raw: &Value) -> Result<String, PixelError> {
    raw.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(PixelError::MalformedResponse)
}
