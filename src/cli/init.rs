//! Init command - write a default engine configuration

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use teampulse::config::CONFIG_FILE_NAME;
use teampulse::EngineConfig;

const HEADER: &str = "\
# TeamPulse engine configuration
# Every value below is the built-in default. Delete what you don't change.

";

/// Run the init command
pub fn run(path: &Path, force: bool) -> Result<()> {
    let dir = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    println!("\n{} Initializing TeamPulse\n", style("📈").bold());

    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        println!(
            "{} Already initialized at {} (use --force to overwrite)",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    let body = EngineConfig::default()
        .to_toml_string()
        .context("Failed to render default config")?;
    std::fs::write(&config_path, format!("{HEADER}{body}"))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    println!("\nNext steps:");
    println!("  {} Score a team", style("teampulse score team.json").cyan());
    println!("  {} Full report", style("teampulse report team.json").cyan());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use teampulse::load_config_file;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), false).unwrap();

        let written = dir.path().join(CONFIG_FILE_NAME);
        let config = load_config_file(&written).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_init_keeps_existing_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[community]\nseed = 7\n").unwrap();

        run(dir.path(), false).unwrap();
        assert_eq!(load_config_file(&path).unwrap().community.seed, 7);

        run(dir.path(), true).unwrap();
        assert_eq!(load_config_file(&path).unwrap().community.seed, 42);
    }

    #[test]
    fn test_init_rejects_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&dir.path().join("nope"), false).is_err());
    }
}
