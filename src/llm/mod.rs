pub mod inference;
use serde::{ Deserialize, Serialize };
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PRIMARY_URL: &str =
    "https://api-inference.huggingface.co/models/mistralai/Mixtral-8x7B-Instruct-v0.1";
pub const DEFAULT_FALLBACK_URL: &str =
    "https://api-inference.huggingface.co/models/microsoft/DialoGPT-large";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderRole {
    Primary,
    Fallback,
}

impl fmt::Display for ProviderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderRole::Primary => write!(f, "primary"),
            ProviderRole::Fallback => write!(f, "fallback"),
        }
    }
}

/// Sampling settings sent alongside the prompt to text-generation hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub return_full_text: bool,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: 500,
            temperature: 0.7,
            top_p: 0.95,
            return_full_text: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub role: ProviderRole,
    pub endpoint: String,
    pub api_token: Option<String>,
    /// `None` sends the bare `{ "inputs": ... }` body.
    pub parameters: Option<GenerationParameters>,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn primary(endpoint: impl Into<String>) -> Self {
        Self {
            role: ProviderRole::Primary,
            endpoint: endpoint.into(),
            api_token: None,
            parameters: Some(GenerationParameters::default()),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn fallback(endpoint: impl Into<String>) -> Self {
        Self {
            role: ProviderRole::Fallback,
            endpoint: endpoint.into(),
            api_token: None,
            parameters: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("upstream {endpoint} returned status {status}")]
    Status {
        endpoint: String,
        status: u16,
    },
    #[error("request to upstream failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid inference client configuration: {0}")]
    Config(String),
}

impl InferenceError {
    /// True when the upstream answered, but with a non-success status.
    pub fn is_status(&self) -> bool {
        matches!(self, InferenceError::Status { .. })
    }
}
