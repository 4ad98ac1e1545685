mod traits;
mod gemini;
pub mod request;

pub use traits::*;
pub use gemini::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use request::{
    build_request, parse_response, Content, GenerateContentRequest, GenerationConfig,
    InlineData, Part, WireRole,
};
