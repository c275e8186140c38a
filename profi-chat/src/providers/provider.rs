/// Core ChatProvider trait and types
///
/// This module defines the contract the chat collaborator exposes to the
/// rest of the system. A provider takes a role-tagged message history and
/// produces a finite sequence of text fragments over a channel; the whole
/// call is the unit of restart (there is no resume, re-issue the call).
///
/// # Provider Contract
///
/// All providers must:
/// 1. Implement the `ChatProvider` trait (async)
/// 2. Accept a `ChatContext` carrying the history, an event channel, and a
///    cancellation token
/// 3. Emit `Started`, then zero or more `Fragment` events
/// 4. Finish with exactly one of `Completed`, `Failed`, or `Cancelled`
/// 5. Check the cancel token between fragments and stop promptly when it
///    fires; the consumer discards partial output on cancellation
///
/// # Event Flow
///
/// ```text
/// ChatProvider::complete()
///   ├─> Emit "started"
///   ├─> Emit "fragment" events (token text)
///   ├─> Emit "completed" on success
///   ├─> Emit "failed" on upstream error
///   └─> Emit "cancelled" when the token fires
/// ```
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Chat provider error types
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The upstream completion call failed
    #[error("upstream completion failed: {0}")]
    Upstream(String),

    /// The request history was unusable
    #[error("invalid chat request: {0}")]
    InvalidRequest(String),

    /// Event emission failed (consumer went away)
    #[error("failed to emit chat event: {0}")]
    ChannelClosed(String),
}

/// Chat result type alias
pub type ChatResult<T> = Result<T, ChatError>;

/// Message role in a chat history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message in a chat history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Chat event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatEventKind {
    /// The provider accepted the request
    Started,

    /// A piece of response text
    Fragment,

    /// The response finished cleanly
    Completed,

    /// The upstream call failed
    Failed,

    /// The request was cancelled before completion
    Cancelled,
}

impl fmt::Display for ChatEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatEventKind::Started => write!(f, "started"),
            ChatEventKind::Fragment => write!(f, "fragment"),
            ChatEventKind::Completed => write!(f, "completed"),
            ChatEventKind::Failed => write!(f, "failed"),
            ChatEventKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Event emitted by a provider during one completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    /// Event kind
    pub kind: ChatEventKind,

    /// Fragment text, or the error message for `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ChatEvent {
    /// Creates a started event
    pub fn started() -> Self {
        ChatEvent {
            kind: ChatEventKind::Started,
            text: None,
        }
    }

    /// Creates a fragment event
    pub fn fragment(text: impl Into<String>) -> Self {
        ChatEvent {
            kind: ChatEventKind::Fragment,
            text: Some(text.into()),
        }
    }

    /// Creates a completed event
    pub fn completed() -> Self {
        ChatEvent {
            kind: ChatEventKind::Completed,
            text: None,
        }
    }

    /// Creates a failed event
    pub fn failed(error: impl Into<String>) -> Self {
        ChatEvent {
            kind: ChatEventKind::Failed,
            text: Some(error.into()),
        }
    }

    /// Creates a cancelled event
    pub fn cancelled() -> Self {
        ChatEvent {
            kind: ChatEventKind::Cancelled,
            text: None,
        }
    }
}

/// Completion execution context
///
/// Carries the history, the fragment channel, and the cancellation token.
pub struct ChatContext {
    /// Request id (for log correlation)
    pub request_id: Uuid,

    /// Role-tagged message history, oldest first
    pub history: Vec<ChatMessage>,

    /// Event sender
    event_tx: mpsc::UnboundedSender<ChatEvent>,

    /// Cancellation token; fires when the consumer goes away or times out
    pub cancel_token: CancellationToken,
}

impl ChatContext {
    /// Creates a new chat context
    pub fn new(
        history: Vec<ChatMessage>,
        event_tx: mpsc::UnboundedSender<ChatEvent>,
        cancel_token: CancellationToken,
    ) -> Self {
        ChatContext {
            request_id: Uuid::new_v4(),
            history,
            event_tx,
            cancel_token,
        }
    }

    /// Emits an event
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::ChannelClosed`] if the consumer dropped the
    /// receiving end.
    pub async fn emit(&self, event: ChatEvent) -> ChatResult<()> {
        self.event_tx
            .send(event)
            .map_err(|_| ChatError::ChannelClosed("event channel closed".to_string()))
    }

    /// Checks if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Waits for cancellation
    pub async fn cancelled(&self) {
        self.cancel_token.cancelled().await
    }
}

/// Core ChatProvider trait
///
/// The one seam between ProFi and whichever LLM backend serves it.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Returns the provider name (for logging and config)
    fn name(&self) -> &str;

    /// Runs one completion
    ///
    /// The provider should validate the history, emit `Started`, stream
    /// `Fragment` events, check the cancel token between fragments, and
    /// finish with one terminal event.
    ///
    /// Returns `Ok(())` on completion or cancellation (cancellation is not
    /// a failure); `Err` when the upstream call fails.
    async fn complete(&self, ctx: ChatContext) -> ChatResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::Upstream("502 from upstream".to_string());
        assert_eq!(err.to_string(), "upstream completion failed: 502 from upstream");

        let err = ChatError::InvalidRequest("empty history".to_string());
        assert_eq!(err.to_string(), "invalid chat request: empty history");

        let err = ChatError::ChannelClosed("event channel closed".to_string());
        assert_eq!(err.to_string(), "failed to emit chat event: event channel closed");
    }

    #[test]
    fn test_chat_event_kind_display() {
        assert_eq!(ChatEventKind::Started.to_string(), "started");
        assert_eq!(ChatEventKind::Fragment.to_string(), "fragment");
        assert_eq!(ChatEventKind::Completed.to_string(), "completed");
        assert_eq!(ChatEventKind::Failed.to_string(), "failed");
        assert_eq!(ChatEventKind::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_chat_event_constructors() {
        let started = ChatEvent::started();
        assert_eq!(started.kind, ChatEventKind::Started);
        assert!(started.text.is_none());

        let fragment = ChatEvent::fragment("hello ");
        assert_eq!(fragment.kind, ChatEventKind::Fragment);
        assert_eq!(fragment.text.as_deref(), Some("hello "));

        let failed = ChatEvent::failed("boom");
        assert_eq!(failed.kind, ChatEventKind::Failed);
        assert_eq!(failed.text.as_deref(), Some("boom"));
    }

    #[test]
    fn test_chat_event_serialization() {
        let event = ChatEvent::fragment("word ");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"fragment\""));
        assert!(json.contains("word "));

        let completed = ChatEvent::completed();
        let json = serde_json::to_string(&completed).unwrap();
        assert!(!json.contains("text"), "empty text must be skipped");
    }

    #[test]
    fn test_chat_message_roles() {
        let json = serde_json::to_string(&ChatMessage::system("be brief")).unwrap();
        assert!(json.contains("\"role\":\"system\""));

        let json = serde_json::to_string(&ChatMessage::user("hi")).unwrap();
        assert!(json.contains("\"role\":\"user\""));
    }

    #[test]
    fn test_chat_context_cancellation() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let cancel_token = CancellationToken::new();
        let ctx = ChatContext::new(vec![], tx, cancel_token.clone());

        assert!(!ctx.is_cancelled());
        cancel_token.cancel();
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_chat_context_emit() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ctx = ChatContext::new(vec![], tx, CancellationToken::new());

        ctx.emit(ChatEvent::fragment("test")).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, ChatEventKind::Fragment);
        assert_eq!(received.text.as_deref(), Some("test"));
    }

    #[tokio::test]
    async fn test_chat_context_emit_after_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let ctx = ChatContext::new(vec![], tx, CancellationToken::new());
        drop(rx);

        let err = ctx.emit(ChatEvent::started()).await.unwrap_err();
        assert!(matches!(err, ChatError::ChannelClosed(_)));
    }
}
