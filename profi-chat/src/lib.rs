//! # ProFi Chat Library
//!
//! The chat collaborator behind ProFi: a provider abstraction over LLM
//! backends plus the assistant persona the API server seeds every
//! conversation with.
//!
//! ## Module Organization
//!
//! - `providers`: the `ChatProvider` trait, the Groq implementation, and a
//!   deterministic mock

pub mod providers;

pub use providers::{
    ChatContext, ChatError, ChatEvent, ChatEventKind, ChatMessage, ChatProvider, ChatResult,
    GroqConfig, GroqProvider, MockConfig, MockProvider, Role,
};

/// Persona prompt prepended as the system message of every conversation.
///
/// ProFi answers personal-finance questions only: budgeting, saving,
/// investing basics, debt. Anything else gets redirected.
pub const SYSTEM_PROMPT: &str = "You are ProFi, a friendly and knowledgeable personal finance \
assistant. You help people with budgeting, saving, everyday money decisions, debt management, \
and the basics of investing. Keep answers short, practical, and encouraging. If a question is \
not about personal finance, politely steer the conversation back to money topics. Never present \
yourself as a licensed financial advisor and never recommend specific securities.";

/// Current version of the ProFi chat library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_system_prompt_names_the_assistant() {
        assert!(SYSTEM_PROMPT.contains("ProFi"));
    }
}
