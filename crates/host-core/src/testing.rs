//! Test doubles for the reasoning provider and the tool channel.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{HostError, Result};
use crate::message::{AssistantMessage, InvocationRequest, Message};
use crate::provider::{Completion, GenerationOptions, LlmProvider};
use crate::tool::{CapabilityDescriptor, InvocationResult, ToolCatalog, ToolChannel, ToolDescriptor};

pub fn call(id: &str, tool: &str, args: serde_json::Value) -> InvocationRequest {
    InvocationRequest::new(id, tool, args.as_object().cloned().unwrap_or_default())
}

/// Replays a fixed list of responses and records every history it was sent
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<AssistantMessage>>>,
    histories: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Result<AssistantMessage>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            histories: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.histories.lock().unwrap().len()
    }

    /// History passed on the `n`th call
    pub fn history(&self, n: usize) -> Vec<Message> {
        self.histories.lock().unwrap()[n].clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        history: &[Message],
        _capabilities: &[CapabilityDescriptor],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        self.histories.lock().unwrap().push(history.to_vec());
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(HostError::Other("script exhausted".into())));
        next.map(|message| Completion::new(message, options.model.clone()))
    }
}

pub enum MockReply {
    Ok(String),
    Failure(String),
    Err(String),
    Hang,
}

/// In-memory tool channel with a fixed catalog
pub struct MockChannel {
    catalog: ToolCatalog,
    replies: HashMap<String, MockReply>,
    sent: Mutex<Vec<String>>,
}

impl MockChannel {
    pub fn new(tools: &[&str]) -> Self {
        let descriptors = tools
            .iter()
            .map(|name| ToolDescriptor {
                name: (*name).to_string(),
                description: format!("{name} tool"),
                input_schema: serde_json::json!({"type": "object"}),
            })
            .collect();
        Self {
            catalog: ToolCatalog::new(descriptors),
            replies: HashMap::new(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(mut self, tool: &str, reply: MockReply) -> Self {
        self.replies.insert(tool.to_string(), reply);
        self
    }

    /// Tool names that actually reached the provider
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolChannel for MockChannel {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        Ok(self.catalog.descriptors().to_vec())
    }

    async fn invoke(
        &self,
        tool_name: &str,
        _arguments: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<InvocationResult> {
        self.catalog.ensure(tool_name)?;
        self.sent.lock().unwrap().push(tool_name.to_string());

        match self.replies.get(tool_name) {
            Some(MockReply::Ok(text)) => Ok(InvocationResult::success(text.clone())),
            Some(MockReply::Failure(text)) => Ok(InvocationResult::failure(text.clone())),
            Some(MockReply::Err(text)) => Err(HostError::ToolInvocation {
                tool: tool_name.to_string(),
                message: text.clone(),
            }),
            Some(MockReply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(InvocationResult::success("late"))
            }
            None => Ok(InvocationResult::success("")),
        }
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
