//! Agent Loop
//!
//! Turn-taking between the reasoning model and the tool channel:
//!
//! ```text
//! AWAITING_INPUT ─▶ MODEL_PENDING ─┬─▶ DONE ─▶ (AWAITING_INPUT)
//!                        ▲         │
//!                        └─ TOOLS_PENDING ◀┘
//! ```
//!
//! Each user turn appends the user message, then alternates model calls and
//! tool execution until the model answers without requesting tools. Tool
//! failures are fed back to the model as tool results; reasoning failures end
//! the turn.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{HostError, Result};
use crate::message::{ConversationState, Decision, InvocationRequest, Message, ThreadId};
use crate::provider::{Completion, GenerationOptions, LlmProvider};
use crate::tool::{translate, CapabilityDescriptor, InvocationResult, ToolChannel};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Maximum tool cycles per user turn before giving up
    pub max_tool_cycles: usize,

    /// Bound on a single reasoning call
    pub reasoning_timeout: Duration,

    /// Bound on a single tool invocation
    pub tool_timeout: Duration,

    /// Generation options
    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_cycles: 10,
            reasoning_timeout: Duration::from_secs(120),
            tool_timeout: Duration::from_secs(60),
            generation: GenerationOptions {
                system_prompt: Some(DEFAULT_SYSTEM_PROMPT.into()),
                ..GenerationOptions::default()
            },
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant with access to external tools. \
Call a tool whenever it can answer part of the request more reliably than you can. \
If a tool reports an error, explain what went wrong or try again with corrected arguments.";

/// Where a turn currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    AwaitingInput,
    ModelPending,
    ToolsPending,
    Done,
}

/// Progress notices emitted while a turn runs. Observational only.
#[derive(Clone, Debug, PartialEq)]
pub enum AgentEvent {
    State(LoopState),
    /// Text the model sent alongside tool requests
    Commentary(String),
    ToolStarted { invocation_id: String, tool: String },
    ToolFinished { invocation_id: String, tool: String, is_error: bool },
}

/// Callback receiving progress notices
pub type EventCallback = Arc<dyn Fn(&AgentEvent) + Send + Sync>;

/// Persists the conversation after each completed iteration
#[async_trait]
pub trait Checkpoint: Send + Sync {
    async fn checkpoint(&self, state: &ConversationState) -> Result<()>;
}

/// Result of one completed user turn
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Final answer text
    pub text: String,
    /// Reasoning calls made during the turn
    pub model_calls: usize,
    /// Tool invocations resolved during the turn
    pub tool_calls: usize,
    /// Messages appended to the conversation
    pub appended: usize,
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    channel: Arc<dyn ToolChannel>,
    config: AgentConfig,
    on_event: Option<EventCallback>,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        channel: Arc<dyn ToolChannel>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            channel,
            config,
            on_event: None,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>, channel: Arc<dyn ToolChannel>) -> Self {
        Self::new(provider, channel, AgentConfig::default())
    }

    /// Capability catalog for the model, in tool-provider order
    pub async fn capabilities(&self) -> Result<Vec<CapabilityDescriptor>> {
        let descriptors = self.channel.list_tools().await?;
        Ok(translate(&descriptors))
    }

    /// Single-shot: answer one question in a fresh conversation
    pub async fn ask(&self, question: &str) -> Result<String> {
        let mut state = ConversationState::new(ThreadId::new());
        let outcome = self
            .run_turn(&mut state, question, &CancellationToken::new(), None)
            .await?;
        Ok(outcome.text)
    }

    /// Run one user turn to completion.
    ///
    /// Everything appended before an error or cancellation stays in `state`.
    pub async fn run_turn(
        &self,
        state: &mut ConversationState,
        input: &str,
        cancel: &CancellationToken,
        checkpoint: Option<&dyn Checkpoint>,
    ) -> Result<TurnOutcome> {
        let capabilities = self.capabilities().await?;
        let start = state.len();

        state.push(Message::user(input));

        let mut model_calls = 0;
        let mut tool_calls = 0;
        let mut tool_cycles = 0;

        loop {
            self.emit(AgentEvent::State(LoopState::ModelPending));
            model_calls += 1;

            let completion = self.request_completion(state, &capabilities, cancel).await?;
            debug!(
                thread_id = %state.thread_id(),
                model = %completion.model,
                requests = completion.message.invocation_requests.len(),
                "model responded"
            );
            state.push(Message::assistant(completion.message.clone()));

            match completion.message.decision() {
                Decision::Final(text) => {
                    self.save(checkpoint, state).await;
                    self.emit(AgentEvent::State(LoopState::Done));
                    info!(
                        thread_id = %state.thread_id(),
                        model_calls,
                        tool_calls,
                        "turn complete"
                    );
                    return Ok(TurnOutcome {
                        text: text.to_string(),
                        model_calls,
                        tool_calls,
                        appended: state.len() - start,
                    });
                }
                Decision::WantsTools(requests) => {
                    self.emit(AgentEvent::State(LoopState::ToolsPending));
                    if let Some(text) = completion.message.text.as_deref().filter(|t| !t.trim().is_empty()) {
                        self.emit(AgentEvent::Commentary(text.to_string()));
                    }

                    if tool_cycles >= self.config.max_tool_cycles {
                        warn!(
                            thread_id = %state.thread_id(),
                            max = self.config.max_tool_cycles,
                            "tool cycle limit reached"
                        );
                        for request in requests {
                            state.push(Message::tool_failure(
                                request,
                                "Not executed: tool cycle limit reached",
                            ));
                        }
                        self.save(checkpoint, state).await;
                        return Err(HostError::MaxIterationsExceeded(self.config.max_tool_cycles));
                    }

                    for (index, request) in requests.iter().enumerate() {
                        match self.execute(request, cancel).await {
                            Ok(message) => {
                                state.push(message);
                                tool_calls += 1;
                            }
                            Err(HostError::Cancelled) => {
                                for pending in &requests[index..] {
                                    state.push(Message::tool_failure(
                                        pending,
                                        "Invocation cancelled before completion",
                                    ));
                                }
                                return Err(HostError::Cancelled);
                            }
                            Err(e) => return Err(e),
                        }
                    }

                    tool_cycles += 1;
                    self.save(checkpoint, state).await;
                }
            }
        }
    }

    async fn request_completion(
        &self,
        state: &ConversationState,
        capabilities: &[CapabilityDescriptor],
        cancel: &CancellationToken,
    ) -> Result<Completion> {
        let timeout = self.config.reasoning_timeout;
        let call = self
            .provider
            .complete(state.messages(), capabilities, &self.config.generation);

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(HostError::Cancelled),
            result = tokio::time::timeout(timeout, call) => match result {
                Ok(result) => result,
                Err(_) => Err(HostError::ReasoningTimeout(timeout)),
            },
        }
    }

    /// Execute one invocation and wrap the outcome as a tool result message
    async fn execute(&self, request: &InvocationRequest, cancel: &CancellationToken) -> Result<Message> {
        self.emit(AgentEvent::ToolStarted {
            invocation_id: request.id.clone(),
            tool: request.tool_name.clone(),
        });
        debug!(tool = %request.tool_name, id = %request.id, "executing tool");

        let timeout = self.config.tool_timeout;
        let call = self.channel.invoke(&request.tool_name, &request.arguments);

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(HostError::Cancelled),
            result = tokio::time::timeout(timeout, call) => match result {
                Ok(result) => result,
                Err(_) => Err(HostError::ToolTimeout {
                    tool: request.tool_name.clone(),
                    timeout,
                }),
            },
        };

        let message = match result {
            Ok(InvocationResult::Success(text)) => Message::tool_success(request, text),
            Ok(InvocationResult::Failure(detail)) => {
                warn!(tool = %request.tool_name, error = %detail.message, "tool reported failure");
                Message::tool_failure(request, detail.message)
            }
            Err(e) if e.is_tool_level() => {
                warn!(tool = %request.tool_name, error = %e, "tool invocation failed");
                Message::tool_failure(request, format!("Error: {e}"))
            }
            Err(e) => return Err(e),
        };

        let is_error = matches!(&message, Message::ToolResult(r) if r.is_error);
        self.emit(AgentEvent::ToolFinished {
            invocation_id: request.id.clone(),
            tool: request.tool_name.clone(),
            is_error,
        });

        Ok(message)
    }

    async fn save(&self, checkpoint: Option<&dyn Checkpoint>, state: &ConversationState) {
        if let Some(checkpoint) = checkpoint {
            if let Err(e) = checkpoint.checkpoint(state).await {
                warn!(thread_id = %state.thread_id(), error = %e, "checkpoint failed");
            }
        }
    }

    fn emit(&self, event: AgentEvent) {
        if let Some(cb) = &self.on_event {
            cb(&event);
        }
    }

    /// Get the tool channel
    pub fn channel(&self) -> &Arc<dyn ToolChannel> {
        &self.channel
    }

    /// Get the reasoning provider
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    channel: Option<Arc<dyn ToolChannel>>,
    config: AgentConfig,
    on_event: Option<EventCallback>,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            channel: None,
            config: AgentConfig::default(),
            on_event: None,
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn channel(mut self, channel: Arc<dyn ToolChannel>) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.generation.system_prompt = Some(prompt.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub const fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = Some(temp);
        self
    }

    pub const fn max_tool_cycles(mut self, max: usize) -> Self {
        self.config.max_tool_cycles = max;
        self
    }

    pub const fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.config.tool_timeout = timeout;
        self
    }

    pub const fn reasoning_timeout(mut self, timeout: Duration) -> Self {
        self.config.reasoning_timeout = timeout;
        self
    }

    pub fn on_event(mut self, cb: EventCallback) -> Self {
        self.on_event = Some(cb);
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| HostError::Config("Provider is required".into()))?;
        let channel = self
            .channel
            .ok_or_else(|| HostError::Config("Tool channel is required".into()))?;
        if self.config.max_tool_cycles == 0 {
            return Err(HostError::Config("max_tool_cycles must be at least 1".into()));
        }

        let mut agent = Agent::new(provider, channel, self.config);
        agent.on_event = self.on_event;
        Ok(agent)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::message::AssistantMessage;
    use crate::testing::{call, MockChannel, MockReply, ScriptedProvider};

    fn agent(provider: &Arc<ScriptedProvider>, channel: &Arc<MockChannel>) -> Agent {
        AgentBuilder::new()
            .provider(provider.clone())
            .channel(channel.clone())
            .tool_timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn final_answer_without_tools() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(AssistantMessage::text("4"))]));
        let channel = Arc::new(MockChannel::new(&["schedule_tasks"]));
        let agent = agent(&provider, &channel);

        let mut state = ConversationState::new(ThreadId::from_string("t"));
        let outcome = agent
            .run_turn(&mut state, "What's 2+2?", &CancellationToken::new(), None)
            .await
            .unwrap();

        assert_eq!(outcome.text, "4");
        assert_eq!(outcome.model_calls, 1);
        assert_eq!(outcome.tool_calls, 0);
        assert_eq!(provider.call_count(), 1);
        assert!(channel.sent().is_empty());
        assert_eq!(state.len(), 2);
    }

    #[tokio::test]
    async fn tool_result_is_fed_back_to_model() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(AssistantMessage::invocations(vec![call(
                "c1",
                "schedule_tasks",
                json!({"tasks": ["A", "B", "C"]}),
            )])),
            Ok(AssistantMessage::text("Do A first, then C, then B.")),
        ]));
        let channel = Arc::new(
            MockChannel::new(&["schedule_tasks"])
                .reply("schedule_tasks", MockReply::Ok("Order: A, C, B".into())),
        );
        let agent = agent(&provider, &channel);

        let mut state = ConversationState::new(ThreadId::from_string("t"));
        let outcome = agent
            .run_turn(&mut state, "Plan my day", &CancellationToken::new(), None)
            .await
            .unwrap();

        assert_eq!(outcome.model_calls, 2);
        assert_eq!(outcome.tool_calls, 1);
        assert_eq!(channel.sent(), vec!["schedule_tasks".to_string()]);

        let second = provider.history(1);
        assert_eq!(second.len(), 3);
        match &second[2] {
            Message::ToolResult(r) => {
                assert_eq!(r.invocation_id, "c1");
                assert_eq!(r.content, "Order: A, C, B");
                assert!(!r.is_error);
            }
            other => panic!("expected tool result, got {other:?}"),
        }
        assert_eq!(state.len(), 4);
    }

    #[tokio::test]
    async fn unknown_tool_becomes_failure_result() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(AssistantMessage::invocations(vec![call("c1", "launch_rocket", json!({}))])),
            Ok(AssistantMessage::text("I can't do that.")),
        ]));
        let channel = Arc::new(MockChannel::new(&["schedule_tasks"]));
        let agent = agent(&provider, &channel);

        let mut state = ConversationState::new(ThreadId::from_string("t"));
        let outcome = agent
            .run_turn(&mut state, "Launch", &CancellationToken::new(), None)
            .await
            .unwrap();

        assert_eq!(outcome.text, "I can't do that.");
        assert!(channel.sent().is_empty());
        match &state.messages()[2] {
            Message::ToolResult(r) => {
                assert!(r.is_error);
                assert!(r.content.contains("launch_rocket"));
            }
            other => panic!("expected tool result, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn tool_timeout_becomes_failure_result() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(AssistantMessage::invocations(vec![call("c1", "slow", json!({}))])),
            Ok(AssistantMessage::text("The tool timed out.")),
        ]));
        let channel = Arc::new(MockChannel::new(&["slow"]).reply("slow", MockReply::Hang));
        let agent = agent(&provider, &channel);

        let mut state = ConversationState::new(ThreadId::from_string("t"));
        let outcome = agent
            .run_turn(&mut state, "Go", &CancellationToken::new(), None)
            .await
            .unwrap();

        assert_eq!(outcome.model_calls, 2);
        match &state.messages()[2] {
            Message::ToolResult(r) => {
                assert!(r.is_error);
                assert!(r.content.contains("timed out"));
            }
            other => panic!("expected tool result, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invocations_resolve_in_request_order() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(AssistantMessage::invocations(vec![
                call("c1", "echo", json!({"v": 1})),
                call("c2", "broken", json!({})),
                call("c3", "echo", json!({"v": 3})),
            ])),
            Ok(AssistantMessage::text("done")),
        ]));
        let channel = Arc::new(
            MockChannel::new(&["echo", "broken"])
                .reply("echo", MockReply::Ok("ok".into()))
                .reply("broken", MockReply::Err("provider crashed".into())),
        );
        let agent = agent(&provider, &channel);

        let mut state = ConversationState::new(ThreadId::from_string("t"));
        let outcome = agent
            .run_turn(&mut state, "Go", &CancellationToken::new(), None)
            .await
            .unwrap();

        // user + tools request + 3 results + final answer
        assert_eq!(outcome.appended, 6);
        let ids: Vec<_> = state
            .messages()
            .iter()
            .filter_map(|m| match m {
                Message::ToolResult(r) => Some((r.invocation_id.as_str(), r.is_error)),
                _ => None,
            })
            .collect();
        assert_eq!(ids, [("c1", false), ("c2", true), ("c3", false)]);
    }

    #[tokio::test]
    async fn cycle_limit_keeps_history() {
        let responses = (0..5)
            .map(|i| Ok(AssistantMessage::invocations(vec![call(&format!("c{i}"), "echo", json!({}))])))
            .collect();
        let provider = Arc::new(ScriptedProvider::new(responses));
        let channel = Arc::new(MockChannel::new(&["echo"]).reply("echo", MockReply::Ok("again".into())));
        let agent = AgentBuilder::new()
            .provider(provider.clone())
            .channel(channel.clone())
            .max_tool_cycles(2)
            .build()
            .unwrap();

        let mut state = ConversationState::new(ThreadId::from_string("t"));
        let err = agent
            .run_turn(&mut state, "Loop", &CancellationToken::new(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, HostError::MaxIterationsExceeded(2)));
        // Two full cycles, then the model sees their results once more
        assert_eq!(provider.call_count(), 3);
        assert_eq!(provider.history(2).len(), 5);
        assert_eq!(channel.sent().len(), 2);
        assert_eq!(state.len(), 7);
        match state.last() {
            Some(Message::ToolResult(r)) => {
                assert_eq!(r.invocation_id, "c2");
                assert!(r.is_error);
            }
            other => panic!("expected tool result, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn single_cycle_cap_allows_final_answer() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(AssistantMessage::invocations(vec![call("c1", "schedule_tasks", json!({}))])),
            Ok(AssistantMessage::text("Order is A, C, B.")),
        ]));
        let channel = Arc::new(
            MockChannel::new(&["schedule_tasks"])
                .reply("schedule_tasks", MockReply::Ok("Order: A, C, B".into())),
        );
        let agent = AgentBuilder::new()
            .provider(provider.clone())
            .channel(channel)
            .max_tool_cycles(1)
            .build()
            .unwrap();

        let mut state = ConversationState::new(ThreadId::from_string("t"));
        let outcome = agent
            .run_turn(&mut state, "Plan A, B, C", &CancellationToken::new(), None)
            .await
            .unwrap();

        assert_eq!(outcome.text, "Order is A, C, B.");
        assert_eq!(outcome.model_calls, 2);
        assert_eq!(outcome.tool_calls, 1);
        assert_eq!(state.len(), 4);
    }

    #[tokio::test]
    async fn reasoning_failure_ends_turn() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(HostError::ReasoningUnavailable(
            "connection refused".into(),
        ))]));
        let channel = Arc::new(MockChannel::new(&[]));
        let agent = agent(&provider, &channel);

        let mut state = ConversationState::new(ThreadId::from_string("t"));
        let err = agent
            .run_turn(&mut state, "Hello", &CancellationToken::new(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, HostError::ReasoningUnavailable(_)));
        assert_eq!(state.len(), 1);
    }

    #[tokio::test]
    async fn cancelled_turn_keeps_partial_state() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(AssistantMessage::text("never"))]));
        let channel = Arc::new(MockChannel::new(&[]));
        let agent = agent(&provider, &channel);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut state = ConversationState::new(ThreadId::from_string("t"));
        let err = agent.run_turn(&mut state, "Hello", &cancel, None).await.unwrap_err();

        assert!(matches!(err, HostError::Cancelled));
        assert_eq!(state.len(), 1);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_tools_closes_out_pending_requests() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(AssistantMessage::invocations(vec![
            call("c1", "slow", json!({})),
            call("c2", "echo", json!({})),
        ]))]));
        let channel = Arc::new(
            MockChannel::new(&["slow", "echo"])
                .reply("slow", MockReply::Hang)
                .reply("echo", MockReply::Ok("hi".into())),
        );
        let agent = AgentBuilder::new()
            .provider(provider.clone())
            .channel(channel.clone())
            .tool_timeout(Duration::from_secs(600))
            .build()
            .unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let mut state = ConversationState::new(ThreadId::from_string("t"));
        let err = agent.run_turn(&mut state, "Go", &cancel, None).await.unwrap_err();

        assert!(matches!(err, HostError::Cancelled));
        assert_eq!(channel.sent(), vec!["slow".to_string()]);
        assert_eq!(state.len(), 4);

        let results: Vec<_> = state
            .since(2)
            .iter()
            .map(|m| match m {
                Message::ToolResult(r) => (r.invocation_id.as_str(), r.is_error, r.content.as_str()),
                other => panic!("expected tool result, got {other:?}"),
            })
            .collect();
        assert_eq!(
            results,
            [
                ("c1", true, "Invocation cancelled before completion"),
                ("c2", true, "Invocation cancelled before completion"),
            ]
        );
    }

    #[tokio::test]
    async fn commentary_is_reported_not_returned() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(AssistantMessage::invocations(vec![call("c1", "echo", json!({}))])
                .with_text("Let me check.")),
            Ok(AssistantMessage::text("Checked.")),
        ]));
        let channel = Arc::new(MockChannel::new(&["echo"]).reply("echo", MockReply::Ok("hi".into())));

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let agent = AgentBuilder::new()
            .provider(provider)
            .channel(channel)
            .on_event(Arc::new(move |e: &AgentEvent| sink.lock().unwrap().push(e.clone())))
            .build()
            .unwrap();

        let answer = agent.ask("Check").await.unwrap();

        assert_eq!(answer, "Checked.");
        let events = events.lock().unwrap();
        assert!(events.contains(&AgentEvent::Commentary("Let me check.".into())));
        assert!(events.contains(&AgentEvent::ToolFinished {
            invocation_id: "c1".into(),
            tool: "echo".into(),
            is_error: false,
        }));
        assert_eq!(events.last(), Some(&AgentEvent::State(LoopState::Done)));
    }

    #[test]
    fn builder_requires_channel() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let err = AgentBuilder::new().provider(provider).build().err().unwrap();
        assert!(matches!(err, HostError::Config(_)));
    }
}
