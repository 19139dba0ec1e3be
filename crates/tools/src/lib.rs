//! Built-in tool implementations for Agentry.
//!
//! Tools give the agent the ability to interact with the world:
//! run shell commands, read/write files inside a workspace, search the web,
//! and fetch web pages.

mod args;
pub mod file_read;
pub mod file_write;
pub mod shell;
pub mod web_fetch;
pub mod web_search;

use std::path::Path;

use agentry_config::ToolsConfig;
use agentry_core::error::Error;
use agentry_core::tool::ToolCatalog;

pub use file_read::ReadFileTool;
pub use file_write::WriteFileTool;
pub use shell::ShellTool;
pub use web_fetch::WebFetchTool;
pub use web_search::WebSearchTool;

/// Build the tool catalog from configuration.
///
/// Only enabled tools are registered, always in the order shell_command,
/// read_file, write_file, web_search, web_fetch. Working and root
/// directories are created if missing.
pub fn build_catalog(config: &ToolsConfig) -> Result<ToolCatalog, Error> {
    let mut catalog = ToolCatalog::new();

    if config.shell.enabled {
        ensure_dir(&config.shell.working_dir)?;
        catalog.register(Box::new(ShellTool::new(
            config.shell.allowed_commands.clone(),
            &config.shell.working_dir,
        )));
    }

    if config.read_file.enabled {
        ensure_dir(&config.read_file.root_dir)?;
        catalog.register(Box::new(ReadFileTool::new(&config.read_file.root_dir)));
    }

    if config.write_file.enabled {
        ensure_dir(&config.write_file.root_dir)?;
        catalog.register(Box::new(WriteFileTool::new(&config.write_file.root_dir)));
    }

    if config.web_search.enabled {
        let endpoint = config.web_search.resolved_endpoint().ok_or_else(|| Error::Config {
            message: "web_search requires SEARCH_API_ENDPOINT or tools.web_search.endpoint"
                .into(),
        })?;
        catalog.register(Box::new(WebSearchTool::new(endpoint)));
    }

    if config.web_fetch.enabled {
        catalog.register(Box::new(WebFetchTool::new()));
    }

    tracing::debug!(tools = ?catalog.names(), "Built tool catalog");
    Ok(catalog)
}

fn ensure_dir(dir: &Path) -> Result<(), Error> {
    std::fs::create_dir_all(dir).map_err(|e| Error::Config {
        message: format!("cannot create workspace directory '{}': {e}", dir.display()),
    })
}
