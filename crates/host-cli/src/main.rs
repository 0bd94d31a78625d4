//! mcp-host
//!
//! Connects a reasoning model to the tools of an MCP server.
//!
//! Commands:
//! - `ask`: answer one request and exit
//! - `chat`: interactive session, persisted per thread
//! - `tools`: list the server's tool catalog
//! - `serve`: HTTP chat API

mod commands;
mod config;
mod handlers;
mod state;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use host_core::{Agent, LlmProvider, SessionStore, ToolChannel};
use host_runtime::{FsSessionStore, McpChannel, OpenAiProvider};

use crate::config::{Cli, Command, HostArgs};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr; stdout carries answers
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let server = cli.host.server_config();
    let channel = Arc::new(
        McpChannel::open(&server)
            .await
            .with_context(|| format!("could not start tool server '{}'", server.command))?,
    );

    let result = run(cli.command, &cli.host, channel.clone()).await;

    if let Err(e) = channel.close().await {
        tracing::warn!(error = %e, "failed to shut down tool server");
    }
    result
}

async fn run(command: Command, host: &HostArgs, channel: Arc<McpChannel>) -> anyhow::Result<()> {
    if matches!(command, Command::Tools) {
        return commands::tools(channel.as_ref()).await;
    }

    let openai = host.openai_config();
    let model = openai.model.clone();
    let provider = Arc::new(OpenAiProvider::from_config(openai)?);

    if !provider.health_check().await.unwrap_or(false) {
        tracing::warn!(model = %model, "reasoning endpoint did not answer the health check");
    }

    let builder = host
        .agent_builder(&model)
        .provider(provider)
        .channel(channel as Arc<dyn ToolChannel>);

    match command {
        Command::Ask { prompt } => {
            let agent = builder.on_event(commands::progress_printer()).build()?;
            commands::ask(Arc::new(agent), &prompt).await
        }
        Command::Chat { thread, ephemeral } => {
            let agent = builder.on_event(commands::progress_printer()).build()?;
            let store = if ephemeral {
                None
            } else {
                let store: Arc<dyn SessionStore> =
                    Arc::new(FsSessionStore::new(&host.sessions_dir).await?);
                Some(store)
            };
            commands::chat(Arc::new(agent), store, thread).await
        }
        Command::Serve { bind } => serve(builder.build()?, host, &bind).await,
        Command::Tools => Ok(()),
    }
}

async fn serve(agent: Agent, host: &HostArgs, bind: &str) -> anyhow::Result<()> {
    let store = Arc::new(FsSessionStore::new(&host.sessions_dir).await?);
    let state = AppState::new(Arc::new(agent), store);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = handlers::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(bind).await?;

    tracing::info!("mcp-host listening on http://{}", bind);
    tracing::info!("  GET  /health     - Health check");
    tracing::info!("  GET  /api/tools  - Tool catalog");
    tracing::info!("  POST /api/chat   - Run one turn");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
