//! # host-runtime
//!
//! Concrete backends for the `host-core` seams.
//!
//! ## Components
//!
//! - **MCP** (`McpChannel`): tool provider spawned as a child process,
//!   JSON-RPC over its stdio
//! - **OpenAI** (`OpenAiProvider`): Chat Completions with function calling;
//!   also speaks to OpenAI-compatible servers such as Ollama
//! - **Filesystem store** (`FsSessionStore`): one JSON snapshot per thread
//!
//! ## Usage
//!
//! ```rust,ignore
//! use host_runtime::{McpChannel, McpServerConfig, OpenAiProvider};
//!
//! let channel = McpChannel::open(&McpServerConfig::from_env()).await?;
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(OpenAiProvider::from_env()?))
//!     .channel(Arc::new(channel))
//!     .build()?;
//! ```

pub mod mcp;
pub mod openai;
pub mod store;

pub use mcp::{McpChannel, McpServerConfig};
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use store::FsSessionStore;

// Re-export core types for convenience
pub use host_core::{
    Agent, AgentBuilder, ChatSession, HostError, LlmProvider, Message, Result, SessionStore,
    ThreadId, ToolChannel,
};
