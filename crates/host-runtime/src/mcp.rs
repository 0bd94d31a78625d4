//! MCP Tool Channel
//!
//! `ToolChannel` over the Model Context Protocol: JSON-RPC 2.0, one message
//! per line, on the stdio of a spawned tool-provider process.
//!
//! The channel performs the `initialize` handshake and fetches the tool
//! catalog once on open. Calls are serialized behind a mutex because the
//! stdio transport carries one request at a time; responses are matched by
//! id, so notifications and late replies to timed-out requests are skipped.

use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use host_core::error::{HostError, Result};
use host_core::tool::{InvocationResult, ToolCatalog, ToolChannel, ToolDescriptor};

const PROTOCOL_VERSION: &str = "2024-11-05";

/// How to launch and talk to the tool provider
#[derive(Clone, Debug)]
pub struct McpServerConfig {
    /// Display name for logs
    pub name: String,

    /// Executable to spawn
    pub command: String,

    /// Command-line arguments
    pub args: Vec<String>,

    /// Extra environment variables for the child
    pub env: HashMap<String, String>,

    /// Bound on spawn + handshake + catalog fetch
    pub startup_timeout: Duration,

    /// Bound on each tool call
    pub request_timeout: Duration,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            name: "tools".into(),
            command: "mcp-server".into(),
            args: Vec::new(),
            env: HashMap::new(),
            startup_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl McpServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secs = |key: &str, fallback: Duration| {
            std::env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .map_or(fallback, Duration::from_secs)
        };

        Self {
            name: std::env::var("MCP_SERVER_NAME").unwrap_or(defaults.name),
            command: std::env::var("MCP_SERVER_COMMAND").unwrap_or(defaults.command),
            args: std::env::var("MCP_SERVER_ARGS")
                .map(|v| v.split_whitespace().map(String::from).collect())
                .unwrap_or_default(),
            env: HashMap::new(),
            startup_timeout: secs("MCP_STARTUP_TIMEOUT_SECS", defaults.startup_timeout),
            request_timeout: secs("MCP_REQUEST_TIMEOUT_SECS", defaults.request_timeout),
        }
    }
}

#[derive(Debug, Error)]
enum RpcError {
    #[error("channel closed by tool provider")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("server error {code}: {message}")]
    Server { code: i64, message: String },
}

type Reader = BufReader<Box<dyn AsyncRead + Send + Unpin>>;
type Writer = Box<dyn AsyncWrite + Send + Unpin>;

/// One JSON-RPC session with the provider
struct McpConnection {
    server: String,
    child: Option<Child>,
    reader: Reader,
    writer: Writer,
    /// Read buffer. A read cut off by a request timeout loses what it had
    /// consumed; the tail of that line is then skipped as non-JSON.
    line: String,
    next_id: i64,
    closed: bool,
}

impl McpConnection {
    async fn initialize(&mut self) -> std::result::Result<(), RpcError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": "mcp-host",
                "version": env!("CARGO_PKG_VERSION"),
            }
        });
        let response = self.request("initialize", params).await?;
        debug!(server = %self.server, response = %response, "initialize response");

        self.notify("notifications/initialized", json!({})).await
    }

    async fn discover_tools(&mut self) -> std::result::Result<Vec<ToolDescriptor>, RpcError> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let params = cursor.as_ref().map_or_else(|| json!({}), |c| json!({ "cursor": c }));
            let result = self.request("tools/list", params).await?;

            if let Some(items) = result.get("tools").and_then(Value::as_array) {
                tools.extend(items.iter().filter_map(parse_tool));
            }

            cursor = result
                .get("nextCursor")
                .and_then(Value::as_str)
                .map(String::from);
            if cursor.is_none() {
                return Ok(tools);
            }
        }
    }

    /// Send a request and wait for the response carrying its id
    async fn request(&mut self, method: &str, params: Value) -> std::result::Result<Value, RpcError> {
        let id = self.next_id;
        self.next_id += 1;

        let message = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        self.write(&message).await?;

        loop {
            let response = self.read_message().await?;
            if response.get("id").and_then(Value::as_i64) != Some(id) {
                debug!(server = %self.server, message = %response, "skipping unrelated message");
                continue;
            }

            if let Some(err) = response.get("error") {
                return Err(RpcError::Server {
                    code: err.get("code").and_then(Value::as_i64).unwrap_or_default(),
                    message: err
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown error")
                        .to_string(),
                });
            }

            return Ok(response.get("result").cloned().unwrap_or(Value::Null));
        }
    }

    /// Send a notification (no response expected)
    async fn notify(&mut self, method: &str, params: Value) -> std::result::Result<(), RpcError> {
        let message = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
        });
        self.write(&message).await
    }

    async fn write(&mut self, message: &Value) -> std::result::Result<(), RpcError> {
        let mut line = serde_json::to_vec(message)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Next JSON message from the provider. Non-JSON output lines (banners,
    /// stray prints) are logged and skipped.
    async fn read_message(&mut self) -> std::result::Result<Value, RpcError> {
        loop {
            let read = self.reader.read_line(&mut self.line).await?;
            if read == 0 && self.line.is_empty() {
                self.closed = true;
                return Err(RpcError::Closed);
            }
            if read != 0 && !self.line.ends_with('\n') {
                continue;
            }

            let line = std::mem::take(&mut self.line);
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<Value>(trimmed) {
                Ok(value) => return Ok(value),
                Err(_) => debug!(server = %self.server, line = %trimmed, "ignoring non-JSON output"),
            }
        }
    }

    /// Whether the provider process has exited
    fn exited(&mut self) -> bool {
        self.child
            .as_mut()
            .is_some_and(|child| !matches!(child.try_wait(), Ok(None)))
    }
}

fn parse_tool(tool: &Value) -> Option<ToolDescriptor> {
    let name = tool.get("name").and_then(Value::as_str)?;
    Some(ToolDescriptor {
        name: name.to_string(),
        description: tool
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        input_schema: tool
            .get("inputSchema")
            .cloned()
            .unwrap_or_else(|| json!({"type": "object"})),
    })
}

/// Map a `tools/call` result to an invocation outcome
fn parse_call_result(result: &Value) -> InvocationResult {
    let text = result
        .get("content")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| result.to_string());

    if result.get("isError").and_then(Value::as_bool).unwrap_or(false) {
        InvocationResult::failure(text)
    } else {
        InvocationResult::Success(text)
    }
}

/// Tool channel backed by an MCP server
pub struct McpChannel {
    name: String,
    catalog: ToolCatalog,
    request_timeout: Duration,
    conn: Mutex<McpConnection>,
}

impl McpChannel {
    /// Spawn the provider process, handshake and fetch its catalog.
    ///
    /// The child is killed when the channel is dropped, whatever the exit path.
    pub async fn open(config: &McpServerConfig) -> Result<Self> {
        info!(name = %config.name, command = %config.command, "spawning MCP server");

        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args)
            .envs(&config.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            HostError::ChannelStartup(format!(
                "failed to spawn '{}' ({}): {e}",
                config.name, config.command
            ))
        })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(HostError::ChannelStartup("child stdio was not piped".into()));
        };

        Self::connect(config, stdout, stdin, Some(child)).await
    }

    /// Handshake over an already-established transport
    pub async fn connect<R, W>(
        config: &McpServerConfig,
        reader: R,
        writer: W,
        child: Option<Child>,
    ) -> Result<Self>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let mut conn = McpConnection {
            server: config.name.clone(),
            child,
            reader: BufReader::new(Box::new(reader)),
            writer: Box::new(writer),
            line: String::new(),
            next_id: 1,
            closed: false,
        };

        let startup = async {
            conn.initialize().await?;
            conn.discover_tools().await
        };
        let tools = match tokio::time::timeout(config.startup_timeout, startup).await {
            Ok(Ok(tools)) => tools,
            Ok(Err(e)) => {
                return Err(HostError::ChannelStartup(format!("{}: {e}", config.name)));
            }
            Err(_) => {
                return Err(HostError::ChannelStartup(format!(
                    "{}: handshake did not complete within {:?}",
                    config.name, config.startup_timeout
                )));
            }
        };

        let catalog = ToolCatalog::new(tools);
        info!(name = %config.name, tools = catalog.len(), "MCP server connected");

        Ok(Self {
            name: config.name.clone(),
            catalog,
            request_timeout: config.request_timeout,
            conn: Mutex::new(conn),
        })
    }

    /// Cached catalog
    pub const fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl ToolChannel for McpChannel {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        Ok(self.catalog.descriptors().to_vec())
    }

    async fn invoke(
        &self,
        tool_name: &str,
        arguments: &serde_json::Map<String, Value>,
    ) -> Result<InvocationResult> {
        self.catalog.ensure(tool_name)?;

        let invocation_error = |message: String| HostError::ToolInvocation {
            tool: tool_name.to_string(),
            message,
        };

        let mut conn = self.conn.lock().await;
        if conn.closed {
            return Err(invocation_error("channel is closed".into()));
        }
        if conn.exited() {
            warn!(server = %self.name, "MCP server has exited");
            conn.closed = true;
            return Err(invocation_error("tool provider process has exited".into()));
        }

        let params = json!({ "name": tool_name, "arguments": arguments });
        match tokio::time::timeout(self.request_timeout, conn.request("tools/call", params)).await {
            Ok(Ok(result)) => Ok(parse_call_result(&result)),
            Ok(Err(e)) => Err(invocation_error(e.to_string())),
            Err(_) => Err(HostError::ToolTimeout {
                tool: tool_name.to_string(),
                timeout: self.request_timeout,
            }),
        }
    }

    async fn close(&self) -> Result<()> {
        let mut conn = self.conn.lock().await;
        if conn.closed {
            return Ok(());
        }
        conn.closed = true;
        conn.writer.shutdown().await.ok();

        if let Some(child) = conn.child.as_mut() {
            info!(name = %self.name, "shutting down MCP server");
            child.kill().await?;
        }
        Ok(())
    }
}
