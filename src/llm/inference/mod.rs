pub mod huggingface;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use super::{ InferenceError, ProviderConfig };
use self::huggingface::HuggingFaceClient;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedText {
    pub generated_text: Option<String>,
}

impl From<&JsonValue> for GeneratedText {
    fn from(value: &JsonValue) -> Self {
        Self {
            generated_text: value
                .get("generated_text")
                .and_then(JsonValue::as_str)
                .map(str::to_owned),
        }
    }
}

/// Body returned by a text-generation host. Hosts disagree on whether the
/// result is wrapped in an array, so every shape is accepted and resolved
/// by the accessors below.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(from = "JsonValue")]
pub enum InferenceResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
    Other(JsonValue),
}

impl From<JsonValue> for InferenceResponse {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Array(items) => {
                InferenceResponse::Batch(items.iter().map(GeneratedText::from).collect())
            }
            JsonValue::Object(_) => InferenceResponse::Single(GeneratedText::from(&value)),
            other => InferenceResponse::Other(other),
        }
    }
}

impl InferenceResponse {
    /// Text of the first element of a batch response.
    pub fn first_generated_text(&self) -> Option<&str> {
        match self {
            InferenceResponse::Batch(items) => items.first().and_then(non_empty_text),
            InferenceResponse::Single(_) | InferenceResponse::Other(_) => None,
        }
    }

    /// Text of the first batch element, else of a top-level object.
    pub fn generated_text(&self) -> Option<&str> {
        match self {
            InferenceResponse::Batch(_) => self.first_generated_text(),
            InferenceResponse::Single(item) => non_empty_text(item),
            InferenceResponse::Other(_) => None,
        }
    }
}

fn non_empty_text(item: &GeneratedText) -> Option<&str> {
    item.generated_text.as_deref().filter(|text| !text.is_empty())
}

#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<InferenceResponse, InferenceError>;

    fn endpoint(&self) -> &str;
}

pub fn new_client(config: &ProviderConfig) -> Result<Arc<dyn InferenceClient>, InferenceError> {
    let client = HuggingFaceClient::from_config(config)?;
    Ok(Arc::new(client))
}
