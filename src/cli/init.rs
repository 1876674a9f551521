//! Init command - write a default md-audit.json

use anyhow::{Context, Result};
use console::style;
use md_audit::config::{AuditConfig, DEFAULT_CONFIG_FILE};
use std::path::Path;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let dir = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let config_path = dir.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() {
        println!(
            "{} Config already exists at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    let template = AuditConfig::default().to_json_template()?;
    std::fs::write(&config_path, template)
        .with_context(|| format!("Failed to create {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    println!(
        "\n{} Set {} to enable AI scoring, or set \"llm_api_key\".",
        style("Tip:").bold(),
        style("MD_AUDIT_LLM_API_KEY").yellow()
    );

    Ok(())
}
