pub mod repl;

use crate::models::chat::{ ChatMessage, ChatReply, ChatRequest };
use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::Client as HttpClient;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

pub const THINKING_PLACEHOLDER: &str = "Thinking...";
pub const CONNECTION_ERROR_MESSAGE: &str = "Error connecting to AI service.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("gateway returned an unreadable body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Sends a conversation to a gateway and returns its reply.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    async fn send(&self, messages: &[ChatMessage]) -> Result<ChatReply, ClientError>;
}

pub struct HttpGatewayClient {
    http: HttpClient,
    chat_url: String,
}

impl HttpGatewayClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            chat_url: format!("{}/api/chat", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl GatewayTransport for HttpGatewayClient {
    async fn send(&self, messages: &[ChatMessage]) -> Result<ChatReply, ClientError> {
        let req = ChatRequest { messages: messages.to_vec() };
        let resp = self.http.post(&self.chat_url).json(&req).send().await?;
        debug!("Gateway answered with status {}", resp.status());
        // Error bodies come with 4xx/5xx statuses; the body decides, not the status.
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice::<ChatReply>(&body)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResponse,
}

/// In-memory conversation for one user session.
///
/// Messages only ever get appended; [`ChatSession::clear`] is the one way to
/// drop them. At most one gateway call is outstanding at a time.
#[derive(Debug)]
pub struct ChatSession {
    id: Uuid,
    messages: Vec<ChatMessage>,
    input: String,
    state: SessionState,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            input: String::new(),
            state: SessionState::Idle,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn can_submit(&self) -> bool {
        self.state == SessionState::Idle && !self.input.trim().is_empty()
    }

    /// Transient assistant line shown while a reply is pending.
    pub fn pending_placeholder(&self) -> Option<&'static str> {
        match self.state {
            SessionState::AwaitingResponse => Some(THINKING_PLACEHOLDER),
            SessionState::Idle => None,
        }
    }

    /// Commits the current input as a user message and returns the
    /// conversation to send, or `None` when nothing should be sent.
    pub fn begin_submit(&mut self) -> Option<Vec<ChatMessage>> {
        if !self.can_submit() {
            return None;
        }
        let text = std::mem::take(&mut self.input);
        self.append(ChatMessage::user(text));
        self.state = SessionState::AwaitingResponse;
        Some(self.messages.clone())
    }

    /// Records the outcome of the pending call and returns to idle.
    pub fn finish_submit(&mut self, outcome: Result<ChatReply, ClientError>) -> &ChatMessage {
        let reply = match outcome {
            Ok(ChatReply::Message { message }) => ChatMessage::assistant(message),
            Ok(ChatReply::Error { error }) => ChatMessage::assistant(format!("Error: {}", error)),
            Err(e) => {
                warn!("Session {}: {}", self.id, e);
                ChatMessage::assistant(CONNECTION_ERROR_MESSAGE)
            }
        };
        self.state = SessionState::Idle;
        self.append(reply)
    }

    /// Sends the current input through `transport`. Returns the appended
    /// assistant message, or `None` if the submit was a no-op.
    pub async fn submit<T>(&mut self, transport: &T) -> Option<&ChatMessage>
        where T: GatewayTransport + ?Sized
    {
        let conversation = self.begin_submit()?;
        let outcome = transport.send(&conversation).await;
        Some(self.finish_submit(outcome))
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn append(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}
