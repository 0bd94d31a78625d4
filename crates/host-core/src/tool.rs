//! Tool Channel
//!
//! Tools live in a separate provider process. The host only needs two
//! operations from it, listing the catalog and invoking a tool by name, and
//! one pure translation from the provider's descriptors into the capability
//! shape the reasoning model understands.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{HostError, Result};

/// Tool description as published by the tool provider
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool identifier within one catalog snapshot
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// JSON Schema of the arguments object
    pub input_schema: serde_json::Value,
}

/// Kind tag for model-facing capabilities
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    #[default]
    Function,
}

/// Invocable capability as presented to the reasoning model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    pub kind: CapabilityKind,
    pub name: String,
    pub description: String,
    pub parameters_schema: serde_json::Value,
}

/// Translate provider descriptors into model capabilities.
///
/// One-to-one and order preserving; catalog order is presentation order.
pub fn translate(descriptors: &[ToolDescriptor]) -> Vec<CapabilityDescriptor> {
    descriptors
        .iter()
        .map(|d| CapabilityDescriptor {
            kind: CapabilityKind::Function,
            name: d.name.clone(),
            description: d.description.clone(),
            parameters_schema: d.input_schema.clone(),
        })
        .collect()
}

/// Failure reported by the tool provider for one call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

/// Outcome of a completed invocation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationResult {
    Success(String),
    Failure(ErrorDetail),
}

impl InvocationResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success(text.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(ErrorDetail {
            message: message.into(),
        })
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Snapshot of the provider's catalog, fetched once per channel
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToolCatalog {
    tools: Vec<ToolDescriptor>,
}

impl ToolCatalog {
    /// Build a catalog, keeping the first descriptor for any duplicated name
    pub fn new(descriptors: Vec<ToolDescriptor>) -> Self {
        let mut tools: Vec<ToolDescriptor> = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if tools.iter().any(|t| t.name == descriptor.name) {
                tracing::warn!(tool = %descriptor.name, "duplicate tool name in catalog, ignoring");
                continue;
            }
            tools.push(descriptor);
        }
        Self { tools }
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Fail with `ToolNotFound` unless `name` is in the catalog
    pub fn ensure(&self, name: &str) -> Result<&ToolDescriptor> {
        self.get(name)
            .ok_or_else(|| HostError::ToolNotFound(name.to_string()))
    }

    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn capabilities(&self) -> Vec<CapabilityDescriptor> {
        translate(&self.tools)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Bidirectional channel to a running tool provider
///
/// Implementations own the underlying transport exclusively and serialize
/// concurrent calls themselves when the transport cannot multiplex.
#[async_trait]
pub trait ToolChannel: Send + Sync {
    /// Catalog advertised by the provider, cached for the channel lifetime
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>>;

    /// Invoke one tool and await its correlated response.
    ///
    /// Fails with `ToolNotFound` before sending anything when the tool is
    /// not in the cached catalog.
    async fn invoke(
        &self,
        tool_name: &str,
        arguments: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<InvocationResult>;

    /// Release the channel and the provider process
    async fn close(&self) -> Result<()>;
}
