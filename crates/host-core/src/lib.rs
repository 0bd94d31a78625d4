//! # host-core
//!
//! Host-side agent loop that lets a reasoning model call tools exposed by a
//! separate tool-provider process.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         ChatSession                          │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐  │
//! │  │ Conversation │   │    Agent     │   │   SessionStore   │  │
//! │  │    State     │◀──│    Loop      │──▶│   (checkpoint)   │  │
//! │  └──────────────┘   └──────────────┘   └──────────────────┘  │
//! │                      │           │                           │
//! │              ┌───────▼─────┐ ┌───▼──────────┐                │
//! │              │ LlmProvider │ │ ToolChannel  │                │
//! │              └─────────────┘ └──────────────┘                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! `LlmProvider` and `ToolChannel` are the two remote seams; concrete
//! implementations live in `host-runtime`.

pub mod chat;
pub mod error;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod session;
pub mod tool;

#[cfg(test)]
mod testing;

pub use chat::ChatSession;
pub use error::{HostError, Result};
pub use message::{AssistantMessage, ConversationState, Decision, InvocationRequest, Message, ThreadId};
pub use provider::LlmProvider;
pub use reasoning::{Agent, AgentBuilder, AgentConfig, AgentEvent, LoopState, TurnOutcome};
pub use session::{MemorySessionStore, Session, SessionStore};
pub use tool::{translate, CapabilityDescriptor, InvocationResult, ToolCatalog, ToolChannel, ToolDescriptor};
