//! `agentry agent`: run one task through the tool-calling loop.

use std::path::Path;

use agentry_agent::{PromptManager, Termination, ToolAgent};
use tracing::info;

use super::{CommandResult, load_config, resolve_backend, tool_catalog};
use crate::ModelArgs;

pub async fn run(
    config_path: &Path,
    target: &ModelArgs,
    max_steps: Option<u32>,
    task: &str,
) -> CommandResult {
    let config = load_config(config_path)?;
    let backend = resolve_backend(&config, target)?;
    let catalog = tool_catalog(&config)?;

    let agent = ToolAgent::new(backend, catalog, &PromptManager::new(&config.prompts))
        .with_max_steps(max_steps.unwrap_or(config.agent.max_steps));

    let run = agent.run_task(task).await?;
    info!(
        steps = run.steps_used,
        termination = ?run.termination,
        "Task finished"
    );
    if run.termination == Termination::MalformedLimit {
        eprintln!("  [Warning] the model stopped replying in JSON; showing its last reply");
    }
    println!("{}", run.answer);
    Ok(())
}
