/// Provider system for chat completions
///
/// This module defines the provider trait and the implementations that back
/// the ProFi chat surface.
///
/// # Architecture
///
/// Providers are the LLM layer of ProFi. Each provider:
/// - Implements the `ChatProvider` trait
/// - Turns a role-tagged history into fragment events over a channel
/// - Supports cancellation between fragments
///
/// # Provider Types
///
/// - **Groq**: one-shot completion against the Groq API, replayed as word
///   fragments with a typing cadence
/// - **Mock**: deterministic fragments for testing and demos

pub mod groq;
pub mod mock;
pub mod provider;

// Re-export main types
pub use groq::{GroqConfig, GroqProvider};
pub use mock::{MockConfig, MockProvider};
pub use provider::{
    ChatContext, ChatError, ChatEvent, ChatEventKind, ChatMessage, ChatProvider, ChatResult, Role,
};
