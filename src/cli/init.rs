//! Init command - write a starter scorecard.toml

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# Scorecard configuration
#
# Category weights must sum to 100 when all seven categories are enabled.
# Defaults: structure 20, quality 20, performance 15, testing 15,
# security 15, devexp 10, completeness 5.

# [categories.quality]
# weight = 25

# [categories.completeness]
# enabled = false

# Gate thresholds. "overall" gates the composite score (0-100); category
# gates use the category's own point scale. warn must be >= min.
[gates.overall]
min = 70
warn = 80
block = true

# [gates.security]
# min = 12
# warn = 14
# block = true

[defaults]
# Output format for `scorecard score`: console, json, html
format = "console"
# Parallel analyzer workers (1-16)
workers = 8
# Whether `scorecard gates` exits non-zero on a failed blocking gate
blocking = true
"#;

/// Run the init command
pub(crate) fn run(path: &Path) -> Result<()> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    let config_path = root.join("scorecard.toml");
    if config_path.exists() {
        println!(
            "{} scorecard.toml already exists at {}",
            style("!").yellow(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| "Failed to write scorecard.toml")?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    println!("\nNext steps:");
    println!("  {} Score the project", style("scorecard score .").cyan());
    println!("  {} Gate a CI pipeline", style("scorecard gates .").cyan());

    Ok(())
}
