//! Command-line configuration
//!
//! Every flag is optional and overrides the matching environment variable;
//! anything unset falls back to the `from_env()` defaults of each backend.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use host_core::AgentBuilder;
use host_runtime::{McpServerConfig, OpenAiConfig};

#[derive(Debug, Parser)]
#[command(
    name = "mcp-host",
    about = "Let a reasoning model call the tools of an MCP server",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub host: HostArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer one request and exit
    Ask {
        /// Request text; the built-in scheduling request when omitted
        prompt: Vec<String>,
    },

    /// Interactive multi-turn session
    Chat {
        /// Resume this thread instead of starting a new one
        #[arg(short, long)]
        thread: Option<String>,

        /// Keep history in memory only
        #[arg(long)]
        ephemeral: bool,
    },

    /// List the tools the server exposes
    Tools,

    /// Serve the chat API over HTTP
    Serve {
        /// Address to bind
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
        bind: String,
    },
}

#[derive(Debug, Args)]
pub struct HostArgs {
    /// Tool server executable [env: MCP_SERVER_COMMAND]
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Argument for the tool server, repeatable [env: MCP_SERVER_ARGS]
    #[arg(long = "server-arg", global = true, allow_hyphen_values = true)]
    pub server_args: Vec<String>,

    /// Model name [env: OPENAI_MODEL]
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// OpenAI-compatible endpoint [env: OPENAI_BASE_URL]
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// System prompt sent ahead of every conversation
    #[arg(long, global = true)]
    pub system_prompt: Option<String>,

    /// Tool cycles allowed per turn
    #[arg(long, global = true, default_value_t = 10)]
    pub max_tool_cycles: usize,

    /// Seconds allowed for one tool call
    #[arg(long, global = true, default_value_t = 60)]
    pub tool_timeout: u64,

    /// Seconds allowed for one reasoning call
    #[arg(long, global = true, default_value_t = 120)]
    pub reasoning_timeout: u64,

    /// Directory for persisted chat sessions
    #[arg(long, global = true, env = "MCP_HOST_SESSIONS_DIR", default_value = ".mcp-host/sessions")]
    pub sessions_dir: PathBuf,
}

impl HostArgs {
    pub fn server_config(&self) -> McpServerConfig {
        let mut config = McpServerConfig::from_env();
        if let Some(command) = &self.server {
            command.clone_into(&mut config.command);
        }
        if !self.server_args.is_empty() {
            config.args.clone_from(&self.server_args);
        }
        config.request_timeout = config.request_timeout.min(self.tool_timeout());
        config
    }

    pub fn openai_config(&self) -> OpenAiConfig {
        let mut config = OpenAiConfig::from_env();
        if let Some(model) = &self.model {
            model.clone_into(&mut config.model);
        }
        if let Some(url) = &self.base_url {
            url.trim_end_matches('/').clone_into(&mut config.base_url);
        }
        config.timeout = config.timeout.max(self.reasoning_timeout());
        config
    }

    /// Agent settings shared by every command
    pub fn agent_builder(&self, model: &str) -> AgentBuilder {
        let builder = AgentBuilder::new()
            .model(model)
            .max_tool_cycles(self.max_tool_cycles)
            .tool_timeout(self.tool_timeout())
            .reasoning_timeout(self.reasoning_timeout());

        match &self.system_prompt {
            Some(prompt) => builder.system_prompt(prompt),
            None => builder,
        }
    }

    const fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout)
    }

    const fn reasoning_timeout(&self) -> Duration {
        Duration::from_secs(self.reasoning_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_environment() {
        let cli = Cli::try_parse_from([
            "mcp-host",
            "--server",
            "./tardigo",
            "--server-arg",
            "--stdio",
            "--model",
            "llama3.2",
            "--base-url",
            "http://localhost:11434/",
            "--tool-timeout",
            "5",
            "tools",
        ])
        .unwrap();

        let server = cli.host.server_config();
        assert_eq!(server.command, "./tardigo");
        assert_eq!(server.args, ["--stdio"]);
        assert!(server.request_timeout <= Duration::from_secs(5));

        let openai = cli.host.openai_config();
        assert_eq!(openai.model, "llama3.2");
        assert_eq!(openai.base_url, "http://localhost:11434");
        assert!(matches!(cli.command, Command::Tools));
    }

    #[test]
    fn ask_collects_prompt_words() {
        let cli = Cli::try_parse_from(["mcp-host", "ask", "plan", "my", "day"]).unwrap();
        match cli.command {
            Command::Ask { prompt } => assert_eq!(prompt.join(" "), "plan my day"),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.host.max_tool_cycles, 10);
    }

    #[test]
    fn chat_accepts_thread_after_subcommand() {
        let cli = Cli::try_parse_from(["mcp-host", "chat", "--thread", "thread-5", "--model", "gpt-4o-mini"])
            .unwrap();
        match cli.command {
            Command::Chat { thread, ephemeral } => {
                assert_eq!(thread.as_deref(), Some("thread-5"));
                assert!(!ephemeral);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.host.model.as_deref(), Some("gpt-4o-mini"));
    }
}
