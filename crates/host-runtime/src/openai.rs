//! OpenAI Reasoning Provider
//!
//! Implementation of `LlmProvider` for the Chat Completions API. Works with
//! any OpenAI-compatible endpoint, including Ollama's `/v1` surface.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use host_core::{
    error::{HostError, Result},
    message::{AssistantMessage, InvocationRequest, Message},
    provider::{Completion, GenerationOptions, LlmProvider, TokenUsage},
    tool::CapabilityDescriptor,
};

/// OpenAI provider configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// Bearer token; may be empty for local endpoints
    pub api_key: String,

    /// Endpoint root, without `/v1`
    pub base_url: String,

    /// Default model
    pub model: String,

    /// HTTP request timeout
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com".into(),
            model: "gpt-4o".into(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl OpenAiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            base_url: std::env::var("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.model),
            timeout: std::env::var("OPENAI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map_or(defaults.timeout, Duration::from_secs),
        }
    }
}

/// OpenAI Chat Completions provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| HostError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_config(OpenAiConfig::from_env())
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.config.api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.config.api_key)
        }
    }

    fn transport_error(&self, e: &reqwest::Error) -> HostError {
        if e.is_timeout() {
            HostError::ReasoningTimeout(self.config.timeout)
        } else {
            HostError::ReasoningUnavailable(e.to_string())
        }
    }
}

/// Convert the conversation to Chat Completions messages
pub fn convert_messages(history: &[Message], system_prompt: Option<&str>) -> Vec<Value> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    if let Some(prompt) = system_prompt {
        messages.push(json!({"role": "system", "content": prompt}));
    }

    for message in history {
        match message {
            Message::User { content } => {
                messages.push(json!({"role": "user", "content": content}));
            }
            // content may only be null alongside tool_calls
            Message::Assistant(assistant) if assistant.invocation_requests.is_empty() => {
                messages.push(json!({
                    "role": "assistant",
                    "content": assistant.text.as_deref().unwrap_or_default(),
                }));
            }
            Message::Assistant(assistant) => {
                let calls: Vec<Value> = assistant
                    .invocation_requests
                    .iter()
                    .map(|call| {
                        json!({
                            "id": call.id,
                            "type": "function",
                            "function": {
                                "name": call.tool_name,
                                "arguments": Value::Object(call.arguments.clone()).to_string(),
                            }
                        })
                    })
                    .collect();
                messages.push(json!({
                    "role": "assistant",
                    "content": assistant.text,
                    "tool_calls": calls,
                }));
            }
            Message::ToolResult(result) => {
                messages.push(json!({
                    "role": "tool",
                    "tool_call_id": result.invocation_id,
                    "content": result.content,
                }));
            }
        }
    }

    messages
}

/// Build the request body for `/v1/chat/completions`
pub fn build_request_body(
    history: &[Message],
    capabilities: &[CapabilityDescriptor],
    options: &GenerationOptions,
) -> Value {
    let mut body = json!({
        "model": options.model,
        "messages": convert_messages(history, options.system_prompt.as_deref()),
        "stream": false,
    });

    if let Some(temperature) = options.temperature {
        body["temperature"] = json!(temperature);
    }
    if let Some(max_tokens) = options.max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }

    if !capabilities.is_empty() {
        let tools: Vec<Value> = capabilities
            .iter()
            .map(|cap| {
                json!({
                    "type": cap.kind,
                    "function": {
                        "name": cap.name,
                        "description": cap.description,
                        "parameters": cap.parameters_schema,
                    }
                })
            })
            .collect();
        body["tools"] = Value::Array(tools);
    }

    body
}

/// Extract the assistant message from a Chat Completions response
pub fn parse_completion(response: &Value, fallback_model: &str) -> Result<Completion> {
    let message = response
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| HostError::Provider(format!("response has no choices: {response}")))?;

    let text = message
        .get("content")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(String::from);

    let invocation_requests = message
        .get("tool_calls")
        .and_then(Value::as_array)
        .map(|calls| calls.iter().filter_map(parse_tool_call).collect())
        .unwrap_or_default();

    let usage = response.get("usage").map(|usage| {
        let count = |key: &str| {
            usage
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or_default()
        };
        TokenUsage {
            prompt_tokens: count("prompt_tokens"),
            completion_tokens: count("completion_tokens"),
            total_tokens: count("total_tokens"),
        }
    });

    let model = response
        .get("model")
        .and_then(Value::as_str)
        .unwrap_or(fallback_model);

    let mut completion = Completion::new(
        AssistantMessage {
            text,
            invocation_requests,
        },
        model,
    );
    completion.usage = usage;
    Ok(completion)
}

fn parse_tool_call(call: &Value) -> Option<InvocationRequest> {
    let function = call.get("function")?;
    let name = function.get("name").and_then(Value::as_str)?;

    let id = call
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map_or_else(|| format!("call_{}", Uuid::new_v4().simple()), String::from);

    // Arguments arrive as a JSON-encoded string; some servers send an object
    let arguments = match function.get("arguments") {
        Some(Value::String(raw)) => serde_json::from_str::<Value>(raw).ok(),
        Some(other) => Some(other.clone()),
        None => None,
    }
    .and_then(|value| value.as_object().cloned())
    .unwrap_or_default();

    Some(InvocationRequest::new(id, name, arguments))
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn health_check(&self) -> Result<bool> {
        match self.request(self.client.get(self.url("models"))).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn complete(
        &self,
        history: &[Message],
        capabilities: &[CapabilityDescriptor],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let body = build_request_body(history, capabilities, options);
        let url = self.url("chat/completions");

        debug!(
            model = %options.model,
            messages = history.len(),
            tools = capabilities.len(),
            "calling chat completions"
        );

        let response = self
            .request(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let message = format!("HTTP {}: {detail}", status.as_u16());
            return Err(
                if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                    HostError::ReasoningUnavailable(message)
                } else {
                    HostError::Provider(message)
                },
            );
        }

        let parsed: Value = response
            .json()
            .await
            .map_err(|e| HostError::Provider(format!("invalid response body: {e}")))?;

        parse_completion(&parsed, &options.model)
    }
}
