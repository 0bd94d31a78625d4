//! Terminal commands: single-shot, interactive session and catalog listing.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use host_core::reasoning::EventCallback;
use host_core::{Agent, AgentEvent, ChatSession, HostError, SessionStore, ThreadId, ToolChannel};

/// Request sent by `ask` when no prompt is given
pub const DEMO_REQUEST: &str = "I woke up at 8:00 AM today. \
I need to do the following tasks: 'Refactor Go Concurrency' which takes 90 minutes and is \
high effort (level 10), 'Weekly Sync' which takes 30 minutes and is low effort (level 3), \
and 'Write Documentation' which takes 60 minutes and is medium effort (level 5). \
Please plan my schedule based on my biological energy levels.";

/// Progress notices on stderr, keeping stdout for answers
pub fn progress_printer() -> EventCallback {
    Arc::new(|event: &AgentEvent| match event {
        AgentEvent::Commentary(text) => eprintln!("  {text}"),
        AgentEvent::ToolStarted { tool, .. } => eprintln!("  → invoking tool '{tool}'"),
        AgentEvent::ToolFinished { tool, is_error: true, .. } => {
            eprintln!("  ✗ tool '{tool}' reported an error");
        }
        AgentEvent::ToolFinished { .. } | AgentEvent::State(_) => {}
    })
}

/// Single-shot mode
pub async fn ask(agent: Arc<Agent>, prompt: &[String]) -> anyhow::Result<()> {
    let request = if prompt.is_empty() {
        DEMO_REQUEST.to_string()
    } else {
        prompt.join(" ")
    };

    let cancel = CancellationToken::new();
    let mut chat = ChatSession::ephemeral(agent);
    let result = with_interrupt(&cancel, ctrl_c(), chat.send(&request, &cancel)).await;

    match result {
        Ok(outcome) => {
            println!("{}", outcome.text);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}

/// Interactive mode; `exit`, `quit`, end of input or Ctrl-C at the prompt
/// leaves the loop
pub async fn chat(
    agent: Arc<Agent>,
    store: Option<Arc<dyn SessionStore>>,
    thread: Option<String>,
) -> anyhow::Result<()> {
    let thread_id = thread.map_or_else(ThreadId::new, ThreadId::from_string);
    let persisted = store.is_some();
    let mut chat = ChatSession::open(agent, store, thread_id).await?;

    eprintln!(
        "thread {} ({} messages). Type 'exit' or press Ctrl-C at the prompt to quit; \
         Ctrl-C during a reply cancels it.",
        chat.thread_id(),
        chat.state().len()
    );

    repl(&mut chat, BufReader::new(tokio::io::stdin()), ctrl_c).await?;

    if persisted {
        eprintln!("resume with: mcp-host chat --thread {}", chat.thread_id());
    }
    Ok(())
}

/// Read-eval loop over `input`. `interrupt` is polled while waiting for a
/// line (ends the loop) and while a turn runs (cancels the turn).
async fn repl<R, I, F>(chat: &mut ChatSession, input: R, interrupt: I) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    I: Fn() -> F,
    F: Future<Output = ()>,
{
    let mut lines = input.lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            () = interrupt() => {
                eprintln!();
                break;
            }
        };
        let Some(line) = line else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "exit" | "quit") {
            break;
        }

        let cancel = CancellationToken::new();
        match with_interrupt(&cancel, interrupt(), chat.send(input, &cancel)).await {
            Ok(outcome) => println!("{}\n", outcome.text),
            Err(HostError::Cancelled) => eprintln!("(cancelled)\n"),
            Err(e) => {
                warn!(error = %e, "turn failed");
                eprintln!("{}\n", e.user_message());
            }
        }
    }
    Ok(())
}

/// Print the tool catalog
pub async fn tools(channel: &dyn ToolChannel) -> anyhow::Result<()> {
    let tools = channel.list_tools().await?;
    if tools.is_empty() {
        println!("The tool server exposes no tools.");
        return Ok(());
    }

    for tool in tools {
        println!("{}", tool.name);
        if !tool.description.is_empty() {
            println!("    {}", tool.description);
        }
        println!("    schema: {}", tool.input_schema);
    }
    Ok(())
}

async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Drive `turn`, cancelling it on `interrupt` and waiting for it to unwind
async fn with_interrupt<T>(
    cancel: &CancellationToken,
    interrupt: impl Future<Output = ()>,
    turn: impl Future<Output = host_core::Result<T>>,
) -> host_core::Result<T> {
    tokio::pin!(turn);
    tokio::select! {
        result = &mut turn => result,
        () = interrupt => {
            cancel.cancel();
            turn.await
        }
    }
}
