/// Chat endpoints (SSE)
///
/// # Endpoints
///
/// - `POST /v1/chat` - Run one completion, streamed as Server-Sent Events
/// - `GET /v1/chat/history` - Recent completed exchanges
///
/// # SSE Event Format
///
/// ```text
/// event: started
/// data: {"kind":"started"}
///
/// event: fragment
/// data: {"kind":"fragment","text":"Save "}
///
/// event: completed
/// data: {"kind":"completed"}
/// ```
///
/// The stream always ends with exactly one terminal event (`completed`,
/// `failed`, or `cancelled`). An exchange is persisted to the interaction
/// log only when it completes; cancelled or failed output is discarded.
///
/// # Cancellation
///
/// Disconnecting the SSE stream cancels the in-flight completion (the
/// response body owns a token drop-guard). A server-side deadline from
/// `CHAT_TIMEOUT_SECONDS` cancels requests that outlive it.
///
/// # Example
///
/// ```bash
/// curl -N -H "Content-Type: application/json" \
///   -d '{"username":"alice","messages":[{"role":"user","content":"How do I budget?"}]}' \
///   "http://localhost:8080/v1/chat"
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{self, Stream};
use profi_chat::{ChatContext, ChatEvent, ChatEventKind, ChatMessage, Role, SYSTEM_PROMPT};
use profi_shared::models::interaction::Interaction;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};
use validator::Validate;

/// Chat request
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Conversation so far, oldest first; the last message is the question
    #[validate(length(min = 1, message = "At least one message is required"))]
    pub messages: Vec<IncomingMessage>,
}

/// One incoming conversation message
#[derive(Debug, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub role: Role,
    pub content: String,
}

/// History query parameters
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub username: String,

    /// Maximum exchanges to return, newest first
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_history_limit() -> i64 {
    50
}

/// Internal state threaded through the SSE stream
struct ChatStreamState {
    rx: mpsc::UnboundedReceiver<ChatEvent>,
    transcript: String,
    db: SqlitePool,
    username: String,
    question: String,
    /// Cancels the completion when the stream (client connection) is dropped
    _guard: DropGuard,
}

/// Chat completion handler
///
/// Seeds the history with the ProFi persona, hands it to the configured
/// provider, and relays provider events as SSE until a terminal event.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Empty username or message list
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    req.validate()?;

    let question = req
        .messages
        .iter()
        .rev()
        .find(|m| matches!(m.role, Role::User))
        .map(|m| m.content.clone())
        .unwrap_or_default();

    let mut history = Vec::with_capacity(req.messages.len() + 1);
    history.push(ChatMessage::system(SYSTEM_PROMPT));
    history.extend(
        req.messages
            .into_iter()
            .map(|m| ChatMessage { role: m.role, content: m.content }),
    );

    let (tx, rx) = mpsc::unbounded_channel();
    let cancel_token = CancellationToken::new();
    let ctx = ChatContext::new(history, tx, cancel_token.clone());
    let request_id = ctx.request_id;

    tracing::info!(
        request_id = %request_id,
        username = %req.username,
        provider = state.chat.name(),
        "Chat completion starting"
    );

    // Run the provider detached; its lifetime is governed by the token.
    let provider = state.chat.clone();
    tokio::spawn(async move {
        if let Err(e) = provider.complete(ctx).await {
            tracing::warn!(request_id = %request_id, error = %e, "Chat completion errored");
        }
    });

    // Server-side deadline.
    let deadline_token = cancel_token.clone();
    let timeout = Duration::from_secs(state.config.chat.timeout_seconds);
    tokio::spawn(async move {
        tokio::select! {
            _ = deadline_token.cancelled() => {}
            _ = tokio::time::sleep(timeout) => {
                tracing::warn!(request_id = %request_id, "Chat deadline elapsed, cancelling");
                deadline_token.cancel();
            }
        }
    });

    let stream_state = ChatStreamState {
        rx,
        transcript: String::new(),
        db: state.db.clone(),
        username: req.username,
        question,
        _guard: cancel_token.drop_guard(),
    };

    let stream = stream::unfold(stream_state, |mut s| async move {
        let event = s.rx.recv().await?;

        if event.kind == ChatEventKind::Fragment {
            if let Some(text) = &event.text {
                s.transcript.push_str(text);
            }
        }

        // Persist only completed exchanges. Failures here must not break
        // the stream the client is still reading.
        if event.kind == ChatEventKind::Completed {
            let answer = s.transcript.trim_end().to_string();
            if let Err(e) = Interaction::record(&s.db, &s.username, &s.question, &answer).await {
                tracing::error!(error = %e, "Failed to record chat interaction");
            }
        }

        Some((Ok(to_sse_event(&event)), s))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(25))))
}

/// Converts a provider event into an SSE frame.
fn to_sse_event(event: &ChatEvent) -> Event {
    let data = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(event.kind.to_string()).data(data)
}

/// Interaction history handler
///
/// Returns recent completed exchanges for a user, newest first.
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<Interaction>>> {
    let limit = query.limit.clamp(1, 500);
    let history = Interaction::list_for_user(&state.db, &query.username, limit).await?;
    Ok(Json(history))
}
