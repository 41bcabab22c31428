//! Configuration for the external collaborators.
//!
//! Credentials come from the environment and are checked before any network
//! call; a missing variable is a [`DocnormError::Configuration`]. A `.env`
//! file in the working directory is loaded on first lookup.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{DocnormError, DocnormResult};
use crate::traits::TRANSCRIPTION_MODEL;

/// API key for the transcription service.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Optional base URL override for the transcription service.
pub const OPENAI_BASE_URL_VAR: &str = "OPENAI_BASE_URL";
/// API key for the document-analysis service.
pub const DOCUMENT_INTELLIGENCE_KEY_VAR: &str = "DOCUMENTINTELLIGENCE_API_KEY";
/// Endpoint of the document-analysis service.
pub const DOCUMENT_INTELLIGENCE_ENDPOINT_VAR: &str = "DOCUMENTINTELLIGENCE_ENDPOINT";

static DOTENV: Lazy<()> = Lazy::new(|| {
    dotenvy::dotenv().ok();
});

fn env_lookup(name: &str) -> Option<String> {
    Lazy::force(&DOTENV);
    std::env::var(name).ok()
}

fn required<F>(lookup: &F, name: &str) -> DocnormResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .ok_or_else(|| DocnormError::Configuration(format!("{} environment variable is not set", name)))
}

/// Transcription service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    pub api_key: String,
    /// Base URL override (e.g. a proxy); `None` uses the public API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model identifier; always `whisper-1` unless overridden in code.
    #[serde(default = "default_transcription_model")]
    pub model: String,
}

fn default_transcription_model() -> String {
    TRANSCRIPTION_MODEL.to_string()
}

impl TranscriptionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            model: default_transcription_model(),
        }
    }

    /// Load from `OPENAI_API_KEY` and `OPENAI_BASE_URL`.
    pub fn from_env() -> DocnormResult<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Load using a custom variable lookup.
    pub fn from_lookup<F>(lookup: F) -> DocnormResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, OPENAI_API_KEY_VAR)?;
        Ok(Self {
            api_key,
            base_url: lookup(OPENAI_BASE_URL_VAR),
            model: default_transcription_model(),
        })
    }
}

/// Document-analysis service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentIntelligenceConfig {
    pub api_key: String,
    pub endpoint: String,
    pub api_version: String,
    pub model_id: String,
    /// First delay between status polls.
    pub poll_interval_ms: u64,
    /// Upper bound for the doubling poll delay.
    pub max_poll_interval_ms: u64,
    /// Give up waiting for the analysis after this long.
    pub poll_timeout_ms: u64,
}

impl Default for DocumentIntelligenceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            api_version: "2024-11-30".to_string(),
            model_id: "prebuilt-read".to_string(),
            poll_interval_ms: 1_000,
            max_poll_interval_ms: 10_000,
            poll_timeout_ms: 300_000,
        }
    }
}

impl DocumentIntelligenceConfig {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Load from `DOCUMENTINTELLIGENCE_API_KEY` and
    /// `DOCUMENTINTELLIGENCE_ENDPOINT`. The key is checked first.
    pub fn from_env() -> DocnormResult<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Load using a custom variable lookup.
    pub fn from_lookup<F>(lookup: F) -> DocnormResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, DOCUMENT_INTELLIGENCE_KEY_VAR)?;
        let endpoint = required(&lookup, DOCUMENT_INTELLIGENCE_ENDPOINT_VAR)?;
        Ok(Self::new(api_key, endpoint))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn max_poll_interval(&self) -> Duration {
        Duration::from_millis(self.max_poll_interval_ms)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}
