//! `agentry config`: Configuration management commands.

use std::path::Path;

use agentry_config::AppConfig;

use super::CommandResult;

pub async fn validate(config_path: &Path) -> CommandResult {
    println!("🔍 Validating {}...", config_path.display());

    let config = match AppConfig::load_from(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    };
    println!("   ✅ Config parsed successfully");

    let warnings = warnings(&config, |var| std::env::var(var).is_ok());
    if warnings.is_empty() {
        println!("   ✅ All checks passed");
    } else {
        println!();
        for w in &warnings {
            println!("   ⚠️  {w}");
        }
    }

    println!();
    for line in summary(&config) {
        println!("   {line}");
    }
    Ok(())
}

pub async fn show(config_path: &Path) -> CommandResult {
    let config = AppConfig::load_from(config_path)
        .map_err(|e| format!("Failed to load config: {e}"))?;
    println!("{}", config.to_toml()?);
    Ok(())
}

/// Non-fatal problems: things that load fine but will fail at run time.
fn warnings(config: &AppConfig, env_is_set: impl Fn(&str) -> bool) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.enabled_providers().is_empty() {
        warnings.push("No provider is enabled".to_string());
    }

    for name in config.enabled_providers() {
        let provider = &config.providers[name];
        let key_env = provider.api_key_env_for(name);
        if !env_is_set(&key_env) {
            warnings.push(format!("{name}: environment variable {key_env} is not set"));
        }
        if provider.models.is_empty() {
            warnings.push(format!("{name}: no models configured"));
        }
    }

    if config.agent.max_steps == 0 {
        warnings.push("agent.max_steps is 0; agent mode will never call the model".into());
    }

    warnings
}

fn summary(config: &AppConfig) -> Vec<String> {
    let providers = config.enabled_providers();
    let mut lines = vec![format!(
        "Providers: {}",
        if providers.is_empty() {
            "(none)".to_string()
        } else {
            providers.join(", ")
        }
    )];

    for name in &providers {
        let mut models: Vec<String> = config.providers[*name]
            .models
            .iter()
            .map(|(key, model)| format!("{key} → {}", model.name))
            .collect();
        models.sort();
        if !models.is_empty() {
            lines.push(format!("  {name}: {}", models.join(", ")));
        }
    }

    let tools = &config.tools;
    let enabled: Vec<&str> = [
        ("shell_command", tools.shell.enabled),
        ("read_file", tools.read_file.enabled),
        ("write_file", tools.write_file.enabled),
        ("web_search", tools.web_search.enabled),
        ("web_fetch", tools.web_fetch.enabled),
    ]
    .into_iter()
    .filter_map(|(name, on)| on.then_some(name))
    .collect();
    lines.push(format!(
        "Tools:     {}",
        if enabled.is_empty() {
            "(none)".to_string()
        } else {
            enabled.join(", ")
        }
    ));
    lines.push(format!("Max steps: {}", config.agent.max_steps));
    lines.push(format!("Temperature: {}", config.agent.temperature));
    lines
}
