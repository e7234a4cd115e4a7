use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::generator::openai;
use crate::translate::mymemory;

const MIN_FEEDBACK_DELAY_MS: u64 = 100;
const MAX_FEEDBACK_DELAY_MS: u64 = 10_000;
const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub ultra_mode: bool,
    #[serde(default = "default_feedback_delay_ms")]
    pub feedback_delay_ms: u64,
    #[serde(default = "default_source_language")]
    pub default_source_language: String,
    #[serde(default = "default_target_language")]
    pub default_target_language: String,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    #[serde(default = "default_llm_base_url")]
    pub llm_base_url: String,
    #[serde(default = "default_llm_api_key_env")]
    pub llm_api_key_env: String,
    #[serde(default = "default_translator_url")]
    pub translator_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vokab")
        .join("lessons")
        .to_string_lossy()
        .to_string()
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_feedback_delay_ms() -> u64 {
    1000
}
fn default_source_language() -> String {
    "Dutch".to_string()
}
fn default_target_language() -> String {
    "English".to_string()
}
fn default_llm_model() -> String {
    openai::DEFAULT_MODEL.to_string()
}
fn default_llm_base_url() -> String {
    openai::DEFAULT_BASE_URL.to_string()
}
fn default_llm_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_translator_url() -> String {
    mymemory::DEFAULT_URL.to_string()
}
fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            theme: default_theme(),
            ultra_mode: false,
            feedback_delay_ms: default_feedback_delay_ms(),
            default_source_language: default_source_language(),
            default_target_language: default_target_language(),
            llm_model: default_llm_model(),
            llm_base_url: default_llm_base_url(),
            llm_api_key_env: default_llm_api_key_env(),
            translator_url: default_translator_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vokab")
            .join("config.toml")
    }

    /// Clamp numeric settings and restore blank strings to their defaults.
    pub fn validate(&mut self) {
        self.feedback_delay_ms = self
            .feedback_delay_ms
            .clamp(MIN_FEEDBACK_DELAY_MS, MAX_FEEDBACK_DELAY_MS);
        self.request_timeout_secs = self
            .request_timeout_secs
            .clamp(MIN_REQUEST_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS);
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
        if self.default_source_language.trim().is_empty() {
            self.default_source_language = default_source_language();
        }
        if self.default_target_language.trim().is_empty() {
            self.default_target_language = default_target_language();
        }
        if self.llm_model.trim().is_empty() {
            self.llm_model = default_llm_model();
        }
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
