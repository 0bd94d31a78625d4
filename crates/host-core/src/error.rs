//! Error Types

use std::time::Duration;

use thiserror::Error;

/// Result type alias for host operations
pub type Result<T> = std::result::Result<T, HostError>;

/// Host error types
#[derive(Error, Debug)]
pub enum HostError {
    /// Tool provider process could not be started or the handshake failed
    #[error("Tool channel startup failed: {0}")]
    ChannelStartup(String),

    /// Tool name absent from the cached catalog
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool provider returned an error or the channel closed mid-call
    #[error("Tool '{tool}' failed: {message}")]
    ToolInvocation { tool: String, message: String },

    /// No response from the tool provider within the bound
    #[error("Tool '{tool}' timed out after {timeout:?}")]
    ToolTimeout { tool: String, timeout: Duration },

    /// Reasoning model unreachable or transiently failing
    #[error("Reasoning model unavailable: {0}")]
    ReasoningUnavailable(String),

    /// No response from the reasoning model within the bound
    #[error("Reasoning model timed out after {0:?}")]
    ReasoningTimeout(Duration),

    /// Reasoning model rejected the request
    #[error("Provider error: {0}")]
    Provider(String),

    /// Tool-cycle cap reached within one user turn
    #[error("Maximum tool cycles ({0}) exceeded")]
    MaxIterationsExceeded(usize),

    /// Turn aborted by the caller
    #[error("Turn cancelled")]
    Cancelled,

    /// Malformed message on the tool channel
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Session persistence error
    #[error("Session error: {0}")]
    Session(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl HostError {
    /// Errors scoped to a single invocation. The agent loop hands these back
    /// to the model as failed tool results instead of aborting the turn.
    pub const fn is_tool_level(&self) -> bool {
        matches!(
            self,
            Self::ToolNotFound(_) | Self::ToolInvocation { .. } | Self::ToolTimeout { .. }
        )
    }

    /// Check if error is retryable by the caller
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ReasoningUnavailable(_) | Self::ReasoningTimeout(_) | Self::Io(_)
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::ChannelStartup(msg) => format!("Could not start the tool provider: {msg}"),
            Self::ToolNotFound(name) => format!("The tool '{name}' is not available."),
            Self::ToolInvocation { tool, message } => format!("Tool '{tool}' failed: {message}"),
            Self::ToolTimeout { tool, .. } => format!("Tool '{tool}' did not respond in time."),
            Self::ReasoningUnavailable(_) | Self::ReasoningTimeout(_) => {
                "The reasoning model is currently unavailable. Please try again.".into()
            }
            Self::Provider(msg) => format!("The reasoning model rejected the request: {msg}"),
            Self::MaxIterationsExceeded(max) => format!(
                "Stopped after {max} tool cycles without a final answer. The conversation so far has been kept."
            ),
            Self::Cancelled => "The request was cancelled.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for HostError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
