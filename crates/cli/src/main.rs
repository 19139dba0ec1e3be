//! Agentry CLI, the main entry point.
//!
//! Commands:
//! - `ask`: Single question, no tools
//! - `agent`: Run one task through the tool-calling loop
//! - `chat`: Interactive session in ask or agent mode
//! - `tools`: List the enabled tools
//! - `config`: Validate or show the configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(
    name = "agentry",
    about = "Agentry: multi-provider LLM agent (ask mode, agent mode, interactive chat)",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file (TOML, or YAML by extension)
    #[arg(
        short,
        long,
        global = true,
        env = "AGENTRY_CONFIG",
        default_value = "agentry.toml"
    )]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Which configured model to talk to.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Provider name (e.g. openai, perplexity, anthropic)
    #[arg(short, long)]
    pub provider: String,

    /// Model key as defined under the provider's `models` table
    #[arg(short, long)]
    pub model: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    /// Plain question answering, no tools
    Ask,
    /// Tool-using agent
    Agent,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question (no tools)
    Ask {
        #[command(flatten)]
        target: ModelArgs,

        /// Question to send to the model
        question: String,
    },

    /// Run a single agent task (with tools)
    Agent {
        #[command(flatten)]
        target: ModelArgs,

        /// Maximum model round-trips (defaults to `[agent] max_steps`)
        #[arg(long)]
        max_steps: Option<u32>,

        /// Task description for the agent
        task: String,
    },

    /// Interactive chat session
    Chat {
        #[command(flatten)]
        target: ModelArgs,

        /// Chat mode
        #[arg(long, value_enum, default_value_t = ChatMode::Ask)]
        mode: ChatMode,

        /// Maximum model round-trips per message in agent mode
        #[arg(long)]
        max_steps: Option<u32>,
    },

    /// List the enabled tools
    Tools,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Load and validate the configuration, then print a summary
    Validate,
    /// Print the effective configuration as TOML
    Show,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Answers go to stdout, logs to stderr
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Ask { target, question } => {
            commands::ask::run(&cli.config, &target, &question).await?
        }
        Commands::Agent {
            target,
            max_steps,
            task,
        } => commands::agent::run(&cli.config, &target, max_steps, &task).await?,
        Commands::Chat {
            target,
            mode,
            max_steps,
        } => commands::chat::run(&cli.config, &target, mode, max_steps).await?,
        Commands::Tools => commands::tools::run(&cli.config).await?,
        Commands::Config { action } => match action {
            ConfigAction::Validate => commands::config_cmd::validate(&cli.config).await?,
            ConfigAction::Show => commands::config_cmd::show(&cli.config).await?,
        },
    }

    Ok(())
}
