use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::PixelError;
use crate::llm::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Keys shorter than this are treated as missing.
pub const MIN_API_KEY_LEN: usize = 20;
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_AI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub model: String,
    pub api_key_env: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    pub dark_mode: bool,
    pub sidebar_open: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            sidebar_open: true,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                model: DEFAULT_MODEL.to_string(),
                api_key_env: DEFAULT_API_KEY_ENV.to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: 60,
            },
            ui: UiSettings::default(),
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pixelai")
            .join("config.toml")
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Read settings from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("ignoring invalid config {}: {e}", path.display()),
                },
                Err(e) => tracing::warn!("could not read config {}: {e}", path.display()),
            }
        }
        Self::default()
    }

    /// Get the API key from the environment variable specified in settings.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api.api_key_env).ok()
    }

    /// The environment credential, trimmed, or `None` if it would be refused.
    pub fn credential(&self) -> Option<String> {
        let key = self.api_key();
        validate_api_key(key.as_deref()).ok().map(str::to_string)
    }

    pub fn build_client(&self, api_key: impl Into<String>) -> GeminiClient {
        GeminiClient::new(api_key)
            .with_model(self.api.model.clone())
            .with_base_url(self.api.base_url.clone())
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
    }
}

/// Accept a credential only if it is present and plausibly long.
pub fn validate_api_key(key: Option<&str>) -> Result<&str, PixelError> {
    match key.map(str::trim) {
        Some(k) if k.chars().count() >= MIN_API_KEY_LEN => Ok(k),
        _ => Err(PixelError::MissingCredential),
    }
}
