//! `agentry chat`: interactive session in ask or agent mode.
//!
//! Every line is an independent invocation: nothing is remembered between
//! turns. `/exit`, `/quit`, end of input or Ctrl+C ends the session.
//! Ctrl+C never cancels a turn that is already running.

use std::future::Future;
use std::io::{BufRead, Write};
use std::path::Path;

use agentry_agent::{AskAgent, PromptManager, ToolAgent};
use tokio::sync::mpsc;
use tracing::warn;

use super::{CommandResult, load_config, resolve_backend, tool_catalog};
use crate::{ChatMode, ModelArgs};

/// The agent answering chat lines.
pub enum Session {
    Ask(AskAgent),
    Agent(ToolAgent),
}

impl Session {
    async fn reply(&self, line: &str) -> agentry_core::Result<String> {
        match self {
            Session::Ask(agent) => agent.ask(line).await,
            Session::Agent(agent) => agent.run(line).await,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Exit,
    EndOfInput,
    Interrupted,
}

pub async fn run(
    config_path: &Path,
    target: &ModelArgs,
    mode: ChatMode,
    max_steps: Option<u32>,
) -> CommandResult {
    let config = load_config(config_path)?;
    let backend = resolve_backend(&config, target)?;
    let prompts = PromptManager::new(&config.prompts);

    let session = match mode {
        ChatMode::Ask => Session::Ask(AskAgent::new(backend, &prompts)),
        ChatMode::Agent => Session::Agent(
            ToolAgent::new(backend, tool_catalog(&config)?, &prompts)
                .with_max_steps(max_steps.unwrap_or(config.agent.max_steps)),
        ),
    };

    let mode_label = match mode {
        ChatMode::Ask => "ASK",
        ChatMode::Agent => "AGENT",
    };
    println!();
    println!("[Interactive chat started in {mode_label} mode]");
    println!("Provider: {}", target.provider);
    println!("Model   : {}", target.model);
    println!("Type /exit or press Ctrl+C to end the session.");
    println!();

    let lines = spawn_stdin_reader();
    let interrupt = async {
        // If the handler cannot be installed, only /exit and EOF end the session.
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    drive(&session, lines, interrupt, &mut std::io::stdout()).await?;
    Ok(())
}

/// Read stdin lines on a dedicated thread.
///
/// A blocking thread keeps the runtime free to notice Ctrl+C while the user
/// is typing. The channel closes at end of input.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(32);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run the prompt/answer loop until the user leaves.
pub async fn drive<W: Write>(
    session: &Session,
    mut lines: mpsc::Receiver<String>,
    interrupt: impl Future<Output = ()>,
    out: &mut W,
) -> std::io::Result<SessionEnd> {
    tokio::pin!(interrupt);

    loop {
        write!(out, "You> ")?;
        out.flush()?;

        let line = tokio::select! {
            line = lines.recv() => line,
            _ = &mut interrupt => return interrupted(out),
        };
        let Some(line) = line else {
            writeln!(out)?;
            return Ok(SessionEnd::EndOfInput);
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "/exit" | "/quit") {
            writeln!(out, "Bye 👋")?;
            return Ok(SessionEnd::Exit);
        }

        // A turn in flight always completes; Ctrl+C pressed meanwhile is
        // seen at the next prompt.
        match session.reply(input).await {
            Ok(text) => writeln!(out, "Assistant> {text}")?,
            Err(e) => {
                warn!(error = %e, "Chat turn failed");
                eprintln!("  [Error] {e}");
            }
        }
    }
}

fn interrupted<W: Write>(out: &mut W) -> std::io::Result<SessionEnd> {
    writeln!(out)?;
    writeln!(out, "[Session interrupted by user, exiting chat]")?;
    Ok(SessionEnd::Interrupted)
}
