use crate::llm::inference::InferenceClient;
use crate::llm::InferenceError;
use crate::models::chat::{ ChatMessage, ChatReply };

use axum::http::StatusCode;
use axum::response::{ IntoResponse, Response };
use axum::Json;
use log::{ info, warn, error };
use std::sync::Arc;
use thiserror::Error;

pub const GENERATION_PLACEHOLDER: &str = "I apologize, but I had trouble generating a response.";
pub const FALLBACK_PLACEHOLDER: &str = "I apologize, but I had trouble processing that request.";
pub const UNAVAILABLE_MESSAGE: &str =
    "AI service temporarily unavailable. Please try again in a moment.";
pub const INTERNAL_MESSAGE: &str = "Failed to get AI response. Please try again.";
pub const EMPTY_CONVERSATION_MESSAGE: &str = "Conversation must contain at least one message.";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("conversation is empty")]
    EmptyConversation,
    #[error("primary and fallback providers both failed: {0}")]
    UpstreamUnavailable(InferenceError),
    #[error("chat request failed: {0}")]
    Internal(#[from] InferenceError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::EmptyConversation => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the user. Upstream details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            GatewayError::EmptyConversation => EMPTY_CONVERSATION_MESSAGE,
            GatewayError::UpstreamUnavailable(_) => UNAVAILABLE_MESSAGE,
            GatewayError::Internal(_) => INTERNAL_MESSAGE,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ChatReply::Error { error: self.public_message().to_string() };
        (self.status(), Json(body)).into_response()
    }
}

/// Stateless relay from a conversation to the primary provider, with one
/// fallback provider used when the primary answers with a non-success status.
#[derive(Clone)]
pub struct ChatGateway {
    primary: Arc<dyn InferenceClient>,
    fallback: Arc<dyn InferenceClient>,
}

impl ChatGateway {
    pub fn new(primary: Arc<dyn InferenceClient>, fallback: Arc<dyn InferenceClient>) -> Self {
        Self { primary, fallback }
    }

    /// Answers the last message of `messages`; earlier turns are ignored.
    pub async fn respond(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        let last = messages.last().ok_or(GatewayError::EmptyConversation)?;

        let result = self.relay(&last.content).await;
        if let Err(GatewayError::Internal(ref e)) = result {
            error!("Chat API error: {}", e);
        }
        result
    }

    async fn relay(&self, prompt: &str) -> Result<String, GatewayError> {
        match self.primary.generate(prompt).await {
            Ok(data) => {
                let text = data.generated_text().unwrap_or(GENERATION_PLACEHOLDER);
                Ok(text.to_string())
            }
            Err(e) if e.is_status() => {
                warn!("Primary provider failed ({}), trying fallback {}", e, self.fallback.endpoint());
                self.relay_fallback(prompt).await
            }
            Err(e) => Err(GatewayError::Internal(e)),
        }
    }

    async fn relay_fallback(&self, prompt: &str) -> Result<String, GatewayError> {
        match self.fallback.generate(prompt).await {
            Ok(data) => {
                info!("Fallback provider answered");
                let text = data.first_generated_text().unwrap_or(FALLBACK_PLACEHOLDER);
                Ok(text.to_string())
            }
            Err(e) if e.is_status() => {
                warn!("Fallback provider failed: {}", e);
                Err(GatewayError::UpstreamUnavailable(e))
            }
            Err(e) => Err(GatewayError::Internal(e)),
        }
    }
}
