/// Mock chat provider for testing and demos
///
/// Emits a deterministic fragment sequence without any network access.
/// Useful for:
/// - Testing the API server without an upstream key
/// - Demonstrating the fragment streaming contract
/// - Exercising cancellation in tests
///
/// # Event Sequence
///
/// 1. **started**
/// 2. One **fragment** per word of the configured response
/// 3. **completed** (or **failed** at the configured fragment index)
///
/// # Example
///
/// ```no_run
/// use profi_chat::providers::{ChatContext, ChatMessage, ChatProvider, MockConfig, MockProvider};
/// use tokio::sync::mpsc;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = MockProvider::new(MockConfig::default());
///
/// let (tx, mut rx) = mpsc::unbounded_channel();
/// let history = vec![ChatMessage::user("hello")];
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
use tokio::time::{sleep, Duration};

use crate::providers::{
    ChatContext, ChatError, ChatEvent, ChatProvider, ChatResult,
};

/// Mock provider configuration
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Response text, replayed one word per fragment
    pub response: String,

    /// Pause between fragments, in milliseconds
    pub fragment_delay_ms: u64,

    /// Fail before emitting the fragment at this index
    pub fail_at_fragment: Option<usize>,
}

impl Default for MockConfig {
    fn default() -> Self {
        MockConfig {
            response: "Track your spending before you try to change it.".to_string(),
            fragment_delay_ms: 5,
            fail_at_fragment: None,
        }
    }
}

/// Mock provider implementation
pub struct MockProvider {
    config: MockConfig,
}

impl MockProvider {
    /// Creates a new mock provider
    pub fn new(config: MockConfig) -> Self {
        MockProvider { config }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, ctx: ChatContext) -> ChatResult<()> {
        if ctx.history.is_empty() {
            return Err(ChatError::InvalidRequest(
                "history must contain at least one message".to_string(),
            ));
        }

        tracing::info!(request_id = %ctx.request_id, "Mock provider starting");
        ctx.emit(ChatEvent::started()).await?;

        for (i, word) in self.config.response.split_whitespace().enumerate() {
            if ctx.is_cancelled() {
                tracing::info!(request_id = %ctx.request_id, "Mock provider cancelled");
                ctx.emit(ChatEvent::cancelled()).await?;
                return Ok(());
            }

            if self.config.fail_at_fragment == Some(i) {
                let message = format!("simulated failure at fragment {}", i);
                ctx.emit(ChatEvent::failed(message.clone())).await?;
                return Err(ChatError::Upstream(message));
            }

            ctx.emit(ChatEvent::fragment(format!("{} ", word))).await?;
            sleep(Duration::from_millis(self.config.fragment_delay_ms)).await;
        }

        ctx.emit(ChatEvent::completed()).await?;
        tracing::info!(request_id = %ctx.request_id, "Mock provider completed");
        Ok(())
    }
}
