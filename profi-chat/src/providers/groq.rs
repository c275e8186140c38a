/// Groq chat provider
///
/// Calls the Groq OpenAI-compatible chat completions endpoint once (no
/// upstream streaming), then replays the answer as word fragments with a
/// short pause between them. The pause gives consumers a typing cadence and
/// gives cancellation a place to land mid-response.
///
/// # Configuration
///
/// See [`GroqConfig`]. The defaults match the hosted Groq API; only the
/// api key has no default.
///
/// # Example
///
/// ```no_run
/// use profi_chat::providers::{ChatContext, ChatMessage, ChatProvider, GroqConfig, GroqProvider};
/// use tokio::sync::mpsc;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = GroqProvider::new(GroqConfig::new("gsk_...".to_string()));
///
/// let (tx, mut rx) = mpsc::unbounded_channel();
/// let history = vec![ChatMessage::user("How much should I save each month?")];
/// let ctx = ChatContext::new(history, tx, CancellationToken::new());
///
/// provider.complete(ctx).await?;
///
/// while let Some(event) = rx.recv().await {
///     println!("{}: {:?}", event.kind, event.text);
/// }
/// # Ok(())
/// # }
/// ```
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Duration};

use crate::providers::{
    ChatContext, ChatError, ChatEvent, ChatMessage, ChatProvider, ChatResult,
};

const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Groq provider configuration
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key (bearer token)
    pub api_key: String,

    /// Chat completions endpoint URL
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Response length cap, in tokens
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Pause between replayed word fragments, in milliseconds
    pub fragment_delay_ms: u64,
}

impl GroqConfig {
    /// Creates a config with the hosted-API defaults
    pub fn new(api_key: String) -> Self {
        GroqConfig {
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 300,
            temperature: 1.2,
            fragment_delay_ms: 50,
        }
    }
}

/// Request body for the completions endpoint
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

/// Response body (only the fields we read)
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

/// Groq provider implementation
pub struct GroqProvider {
    config: GroqConfig,
    client: reqwest::Client,
}

impl GroqProvider {
    /// Creates a new Groq provider
    pub fn new(config: GroqConfig) -> Self {
        GroqProvider {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// One completion round-trip against the Groq API.
    async fn fetch_completion(&self, history: &[ChatMessage]) -> ChatResult<String> {
        let body = CompletionRequest {
            model: &self.config.model,
            messages: history,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Upstream(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ChatError::Upstream(format!(
                "completion returned {}: {}",
                status, detail
            )));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Upstream(format!("unreadable response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ChatError::Upstream("completion returned no choices".to_string()))
    }
}

#[async_trait]
impl ChatProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, ctx: ChatContext) -> ChatResult<()> {
        if ctx.history.is_empty() {
            return Err(ChatError::InvalidRequest(
                "history must contain at least one message".to_string(),
            ));
        }

        tracing::info!(request_id = %ctx.request_id, model = %self.config.model, "Groq completion starting");
        ctx.emit(ChatEvent::started()).await?;

        // The HTTP round-trip races the cancel token so a consumer that
        // walks away does not leave the request hanging.
        let answer = tokio::select! {
            _ = ctx.cancelled() => {
                tracing::info!(request_id = %ctx.request_id, "Groq completion cancelled mid-request");
                ctx.emit(ChatEvent::cancelled()).await?;
                return Ok(());
            }
            result = self.fetch_completion(&ctx.history) => {
                match result {
                    Ok(answer) => answer,
                    Err(e) => {
                        tracing::warn!(request_id = %ctx.request_id, error = %e, "Groq completion failed");
                        ctx.emit(ChatEvent::failed(e.to_string())).await?;
                        return Err(e);
                    }
                }
            }
        };

        // Replay as word fragments, trailing space preserved so the
        // consumer can concatenate fragments verbatim.
        for word in answer.split_whitespace() {
            if ctx.is_cancelled() {
                tracing::info!(request_id = %ctx.request_id, "Groq completion cancelled mid-replay");
                ctx.emit(ChatEvent::cancelled()).await?;
                return Ok(());
            }

            ctx.emit(ChatEvent::fragment(format!("{} ", word))).await?;
            sleep(Duration::from_millis(self.config.fragment_delay_ms)).await;
        }

        ctx.emit(ChatEvent::completed()).await?;
        tracing::info!(request_id = %ctx.request_id, "Groq completion finished");
        Ok(())
    }
}
