//! Connectivity and workflow command handlers

use anyhow::{Context, Result};
use lex_eval_core::connectors::{LexDbConnector, LexLlmConnector, ServiceConnector};
use lex_eval_core::models::Configuration;
use lex_eval_core::services::logging;
use std::path::PathBuf;
use std::sync::Once;

static LOGGING: Once = Once::new();

/// Load and validate the effective configuration
pub(crate) fn load_config() -> Result<Configuration> {
    let config = Configuration::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    if let Err(errors) = config.validate() {
        return Err(anyhow::anyhow!(
            "Invalid configuration: {}",
            errors.join("; ")
        ));
    }
    Ok(config)
}

pub(crate) fn init_logging_once(config: &Configuration) {
    LOGGING.call_once(|| {
        let _ = logging::init_logging(config.log_level);
    });
}

/// Build the lex-llm connector, preferring an explicit --server URL
pub(crate) fn llm_connector(server: &str, config: &Configuration) -> LexLlmConnector {
    let connector = if server.is_empty() {
        LexLlmConnector::with_base_url(config.lex_llm_host.clone())
    } else {
        LexLlmConnector::with_base_url(server)
    };
    connector.with_timeout(std::time::Duration::from_secs(
        config.workflow_timeout_seconds as u64,
    ))
}

/// Truncate text to a preview of at most `limit` characters
pub(crate) fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(limit).collect();
        format!("{}...", truncated)
    }
}

fn mark(healthy: bool) -> &'static str {
    if healthy {
        "✅"
    } else {
        "❌"
    }
}

/// Handle the check command
pub async fn handle_check(
    workflow: Option<String>,
    query: Option<String>,
    server: String,
    json: bool,
) -> Result<()> {
    let config = load_config()?;
    init_logging_once(&config);

    let llm = llm_connector(&server, &config);
    let db = LexDbConnector::with_base_url(config.lex_db_host.clone());

    let llm_healthy = llm.health_check().await;
    let db_healthy = db.health_check().await;

    let mut report = serde_json::json!({
        "lex_llm": {"url": llm.base_url(), "healthy": llm_healthy},
        "lex_db": {"url": db.base_url(), "healthy": db_healthy},
    });

    if !json {
        println!("Checking lex services");
        println!("=====================");
        println!("{} {} at {}", mark(llm_healthy), llm.name(), llm.base_url());
        println!("{} {} at {}", mark(db_healthy), db.name(), db.base_url());
    }

    if !llm_healthy {
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        return Err(anyhow::anyhow!(
            "lex-llm service is not reachable at {}",
            llm.base_url()
        ));
    }

    let workflows = llm
        .list_workflows()
        .await
        .context("Failed to list workflows")?;
    report["workflows"] = serde_json::json!(workflows
        .iter()
        .map(|w| w.workflow_id.clone())
        .collect::<Vec<_>>());

    if !json {
        println!();
        println!("Found {} workflows:", workflows.len());
        for wf in &workflows {
            println!("  - {}: {}", wf.workflow_id, wf.name);
        }
    }

    if let Some(workflow_id) = workflow {
        // metadata trouble is reported but does not fail the check
        match llm.get_workflow_metadata(&workflow_id).await {
            Ok(metadata) => {
                report["metadata"] = serde_json::to_value(&metadata)?;
                if !json {
                    println!();
                    println!("Workflow: {}", metadata.name);
                    println!("  Description: {}", metadata.description);
                    println!("  Version:     {}", metadata.version);
                    if let Some(tags) = &metadata.tags {
                        println!("  Tags:        {}", tags.join(", "));
                    }
                }
            }
            Err(e) => {
                tracing::warn!(workflow_id = %workflow_id, error = %e, "metadata fetch failed");
                if !json {
                    println!();
                    println!("⚠️  Failed to get metadata for '{}': {}", workflow_id, e);
                }
            }
        }

        if let Some(query) = query {
            let conversation_id = config.generate_conversation_id();
            let result = llm
                .run_workflow(&workflow_id, &query, &conversation_id, &[])
                .await
                .context("Smoke query failed")?;

            report["run"] = serde_json::json!({
                "conversation_id": result.conversation_id,
                "run_id": result.run_id,
                "response_length": result.response.chars().count(),
                "num_sources": result.sources.len(),
            });

            if !json {
                println!();
                println!("✅ Smoke query completed");
                println!("  Conversation ID: {}", result.conversation_id);
                println!("  Run ID:          {}", result.run_id);
                println!(
                    "  Response length: {} characters",
                    result.response.chars().count()
                );
                println!("  Sources:         {}", result.sources.len());
                println!();
                println!("Response preview:");
                println!("  {}", preview(&result.response, 200));
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        println!("Check complete");
    }

    Ok(())
}

/// Handle the workflows command
pub async fn handle_workflows(server: String, json: bool) -> Result<()> {
    let config = load_config()?;
    init_logging_once(&config);

    let llm = llm_connector(&server, &config);
    let workflows = llm
        .list_workflows()
        .await
        .context("Failed to list workflows")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&workflows)?);
    } else if workflows.is_empty() {
        println!("No workflows available");
    } else {
        println!("Found {} workflows:", workflows.len());
        for wf in &workflows {
            println!("  - {}: {}", wf.workflow_id, wf.name);
        }
    }

    Ok(())
}

/// Handle the metadata command
pub async fn handle_metadata(workflow_id: String, server: String, json: bool) -> Result<()> {
    let config = load_config()?;
    init_logging_once(&config);

    let llm = llm_connector(&server, &config);
    let metadata = llm
        .get_workflow_metadata(&workflow_id)
        .await
        .with_context(|| format!("Failed to get metadata for workflow '{}'", workflow_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
    } else {
        println!("Workflow Metadata");
        println!("=================");
        println!("ID:          {}", metadata.workflow_id);
        println!("Name:        {}", metadata.name);
        println!("Description: {}", metadata.description);
        println!("Version:     {}", metadata.version);
        if let Some(author) = &metadata.author {
            println!("Author:      {}", author);
        }
        if let Some(tags) = &metadata.tags {
            println!("Tags:        {}", tags.join(", "));
        }
    }

    Ok(())
}

/// Handle the run command
pub async fn handle_run(
    workflow_id: String,
    query: String,
    conversation_id: Option<String>,
    server: String,
    json: bool,
) -> Result<()> {
    let config = load_config()?;
    init_logging_once(&config);

    let llm = llm_connector(&server, &config);
    let conversation_id =
        conversation_id.unwrap_or_else(|| config.generate_conversation_id());

    let result = llm
        .run_workflow(&workflow_id, &query, &conversation_id, &[])
        .await
        .with_context(|| format!("Failed to run workflow '{}'", workflow_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("✅ Workflow completed");
        println!("  Conversation ID: {}", result.conversation_id);
        println!("  Run ID:          {}", result.run_id);
        println!();
        if result.sources.is_empty() {
            println!("No sources retrieved");
        } else {
            println!("Sources retrieved:");
            for source in &result.sources {
                println!("  - [{}] {}", source.id, source.title);
                println!("    URL: {}", source.url);
            }
        }
        println!();
        println!("Response:");
        println!("{}", result.response);
    }

    Ok(())
}

fn resolve_config_path(config_file: &str) -> Result<PathBuf> {
    if config_file == "~/.config/lex-eval/config.toml" {
        // Use XDG default
        Configuration::default_config_path()
            .map_err(|e| anyhow::anyhow!("Failed to get default config path: {}", e))
    } else if let Some(rest) = config_file.strip_prefix("~/") {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        Ok(PathBuf::from(home).join(rest))
    } else {
        Ok(PathBuf::from(config_file))
    }
}

/// Handle the config command
pub async fn handle_config(init: bool, show: bool, config_file: String) -> Result<()> {
    let config_path = resolve_config_path(&config_file)?;

    if init {
        if config_path.exists() {
            println!(
                "⚠️  Configuration file already exists: {}",
                config_path.display()
            );
        } else {
            let config = Configuration::default();
            config
                .save_to_file(&config_path)
                .map_err(|e| anyhow::anyhow!("Failed to write config: {}", e))?;
            println!("✅ Wrote default configuration to {}", config_path.display());
        }
    }

    if show {
        let config = Configuration::load_from_file(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?
            .with_env_overrides();
        if let Err(errors) = config.validate() {
            for error in &errors {
                eprintln!("⚠️  {}", error);
            }
        }
        print!("{}", toml::to_string_pretty(&config)?);
    }

    if !init && !show {
        println!("Config command requires --init or --show");
        println!("Usage: lex-eval config --init [--config-file PATH]");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_is_unchanged() {
        assert_eq!(preview("kort svar", 200), "kort svar");
    }

    #[test]
    fn test_preview_truncates_on_character_boundaries() {
        let text = "æøå".repeat(100);
        let shortened = preview(&text, 5);
        assert_eq!(shortened, "æøåæø...");
    }

    #[test]
    fn test_resolve_config_path_expands_home() {
        std::env::set_var("HOME", "/home/lex");
        let path = resolve_config_path("~/custom/config.toml").unwrap();
        assert_eq!(path, PathBuf::from("/home/lex/custom/config.toml"));
    }

    #[test]
    fn test_resolve_config_path_passes_absolute_paths_through() {
        let path = resolve_config_path("/etc/lex-eval/config.toml").unwrap();
        assert_eq!(path, PathBuf::from("/etc/lex-eval/config.toml"));
    }
}
