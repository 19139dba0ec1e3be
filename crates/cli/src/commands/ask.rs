//! `agentry ask`: one question, one model call.

use std::path::Path;

use agentry_agent::{AskAgent, PromptManager};

use super::{CommandResult, load_config, resolve_backend};
use crate::ModelArgs;

pub async fn run(config_path: &Path, target: &ModelArgs, question: &str) -> CommandResult {
    let config = load_config(config_path)?;
    let backend = resolve_backend(&config, target)?;
    let agent = AskAgent::new(backend, &PromptManager::new(&config.prompts));

    let answer = agent.ask(question).await?;
    println!("{answer}");
    Ok(())
}
