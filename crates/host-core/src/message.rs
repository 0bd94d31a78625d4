//! Conversation Messages
//!
//! The message log shared by the agent loop, the reasoning client and the
//! session store. A conversation only ever grows: messages are appended and
//! never reordered or edited in place.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique conversation thread identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ThreadId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One model-requested call to a named tool
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// Correlation id, unique within the requesting message
    pub id: String,

    /// Tool to call, as named in the catalog
    pub tool_name: String,

    /// Structured arguments, validated by the tool provider
    #[serde(default)]
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

impl InvocationRequest {
    pub fn new(
        id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// A reasoning model response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    /// Free text (final answer, or commentary alongside tool requests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Requested tool invocations, in the order the model listed them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invocation_requests: Vec<InvocationRequest>,
}

/// What the agent loop does with an assistant response
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decision<'a> {
    /// No invocations requested; the text is this turn's answer
    Final(&'a str),
    /// One or more invocations must run before the model is asked again
    WantsTools(&'a [InvocationRequest]),
}

impl AssistantMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            invocation_requests: Vec::new(),
        }
    }

    pub fn invocations(requests: Vec<InvocationRequest>) -> Self {
        Self {
            text: None,
            invocation_requests: requests,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Branch on the response. Invocation requests win over text.
    pub fn decision(&self) -> Decision<'_> {
        if self.invocation_requests.is_empty() {
            Decision::Final(self.text.as_deref().unwrap_or_default())
        } else {
            Decision::WantsTools(&self.invocation_requests)
        }
    }
}

/// Output of one invocation, correlated to its request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResultMessage {
    pub invocation_id: String,
    pub tool_name: String,
    pub content: String,
    #[serde(default)]
    pub is_error: bool,
}

/// A single message in a conversation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    User { content: String },
    Assistant(AssistantMessage),
    ToolResult(ToolResultMessage),
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    pub const fn assistant(message: AssistantMessage) -> Self {
        Self::Assistant(message)
    }

    pub fn tool_success(request: &InvocationRequest, content: impl Into<String>) -> Self {
        Self::ToolResult(ToolResultMessage {
            invocation_id: request.id.clone(),
            tool_name: request.tool_name.clone(),
            content: content.into(),
            is_error: false,
        })
    }

    pub fn tool_failure(request: &InvocationRequest, content: impl Into<String>) -> Self {
        Self::ToolResult(ToolResultMessage {
            invocation_id: request.id.clone(),
            tool_name: request.tool_name.clone(),
            content: content.into(),
            is_error: true,
        })
    }

    pub const fn role(&self) -> &'static str {
        match self {
            Self::User { .. } => "user",
            Self::Assistant(_) => "assistant",
            Self::ToolResult(_) => "tool",
        }
    }
}

/// Ordered, append-only message log for one thread
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    thread_id: ThreadId,
    #[serde(default)]
    messages: Vec<Message>,
}

impl ConversationState {
    pub const fn new(thread_id: ThreadId) -> Self {
        Self {
            thread_id,
            messages: Vec::new(),
        }
    }

    pub const fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    /// Append a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages appended at or after `index`
    pub fn since(&self, index: usize) -> &[Message] {
        self.messages.get(index..).unwrap_or_default()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// First user message, used for session titles
    pub fn first_user_text(&self) -> Option<&str> {
        self.messages.iter().find_map(|m| match m {
            Message::User { content } => Some(content.as_str()),
            _ => None,
        })
    }
}
