//! Test doubles shared by the command and handler tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use host_core::message::{AssistantMessage, Message};
use host_core::provider::{Completion, GenerationOptions};
use host_core::{
    Agent, AgentBuilder, CapabilityDescriptor, InvocationResult, LlmProvider, ToolChannel,
    ToolDescriptor,
};

/// Replays scripted model responses in order
pub struct Replies {
    queue: Mutex<VecDeque<host_core::Result<AssistantMessage>>>,
    calls: Mutex<usize>,
}

impl Replies {
    pub fn new(replies: Vec<host_core::Result<AssistantMessage>>) -> Self {
        Self {
            queue: Mutex::new(replies.into()),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl LlmProvider for Replies {
    fn name(&self) -> &str {
        "replies"
    }

    async fn complete(
        &self,
        _history: &[Message],
        _capabilities: &[CapabilityDescriptor],
        options: &GenerationOptions,
    ) -> host_core::Result<Completion> {
        *self.calls.lock().unwrap() += 1;
        let next = self.queue.lock().unwrap().pop_front().unwrap();
        next.map(|message| Completion::new(message, options.model.clone()))
    }
}

/// One-tool channel that always returns the same ordering
pub struct Scheduler;

#[async_trait]
impl ToolChannel for Scheduler {
    async fn list_tools(&self) -> host_core::Result<Vec<ToolDescriptor>> {
        Ok(vec![ToolDescriptor {
            name: "schedule_tasks".into(),
            description: "Order tasks".into(),
            input_schema: json!({"type": "object"}),
        }])
    }

    async fn invoke(
        &self,
        _tool_name: &str,
        _arguments: &serde_json::Map<String, Value>,
    ) -> host_core::Result<InvocationResult> {
        Ok(InvocationResult::success("Order: A, C, B"))
    }

    async fn close(&self) -> host_core::Result<()> {
        Ok(())
    }
}

pub fn agent(provider: Arc<Replies>) -> Arc<Agent> {
    Arc::new(
        AgentBuilder::new()
            .provider(provider)
            .channel(Arc::new(Scheduler))
            .build()
            .unwrap(),
    )
}
