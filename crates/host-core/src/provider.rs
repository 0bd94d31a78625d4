//! Reasoning Client
//!
//! Common interface for reasoning model backends. Given the conversation so
//! far and the capability catalog, a provider returns one assistant message:
//! either a final answer or a set of tool invocations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use host_core::provider::{GenerationOptions, LlmProvider};
//!
//! let completion = provider.complete(state.messages(), &capabilities, &options).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::{AssistantMessage, Message};
use crate::tool::CapabilityDescriptor;

/// Configuration for model generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gpt-4o", "llama3.2")
    pub model: String,

    /// Temperature for sampling
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// System prompt sent ahead of the conversation
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o".into(),
            temperature: None,
            max_tokens: None,
            system_prompt: None,
        }
    }
}

/// Token usage statistics
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response from one reasoning call
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The assistant message to append to the conversation
    pub message: AssistantMessage,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,
}

impl Completion {
    pub fn new(message: AssistantMessage, model: impl Into<String>) -> Self {
        Self {
            message,
            model: model.into(),
            usage: None,
        }
    }
}

/// Strategy trait for reasoning model providers
///
/// Implementations do not retry. Transient failures surface as
/// `HostError::ReasoningUnavailable` and retry policy belongs to the caller.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Check if the provider is reachable and configured
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    /// Ask the model for its next step
    async fn complete(
        &self,
        history: &[Message],
        capabilities: &[CapabilityDescriptor],
        options: &GenerationOptions,
    ) -> Result<Completion>;
}
