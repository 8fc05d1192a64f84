//! `steep config` subcommands

use crate::cli::ConfigCommands;
use crate::status;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use steep_config::{ConfigLoader, SteepConfig};
use tracing::{error, info};

pub fn handle_config(command: &ConfigCommands, config: &SteepConfig) -> Result<()> {
    match command {
        ConfigCommands::Validate { config_file } => handle_config_validate(config_file),
        ConfigCommands::Generate { output, force } => handle_config_generate(output, *force),
        ConfigCommands::Show { format } => handle_config_show(config, format),
    }
}

/// Handle configuration validation
fn handle_config_validate(config_file: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", config_file);

    if !config_file.exists() {
        return Err(anyhow::anyhow!("Configuration file not found: {:?}", config_file));
    }

    match ConfigLoader::new().from_file(config_file) {
        Ok(_config) => {
            status::ok("Configuration file is valid");
            Ok(())
        }
        Err(e) => {
            status::failed(&format!("Configuration validation failed: {}", e));
            error!("Configuration validation failed: {}", e);
            Err(e.into())
        }
    }
}

/// Write every default to `output`
fn handle_config_generate(output: &Path, force: bool) -> Result<()> {
    info!("Generating configuration at: {:?}", output);

    if output.exists() && !force {
        return Err(anyhow::anyhow!(
            "Output file already exists: {:?}. Use --force to overwrite.",
            output
        ));
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    let content = format!(
        "# steep configuration\n# Environment variables (STEEP_*, HOST, PORT, BASE_PATH) override these values.\n{}",
        SteepConfig::generate_sample()
    );
    fs::write(output, content).context("Failed to write configuration file")?;

    status::ok(&format!("Configuration generated at: {:?}", output));
    status::detail(&format!("Validate with: steep config validate --config-file {:?}", output));
    Ok(())
}

/// Print the configuration in effect
fn handle_config_show(config: &SteepConfig, format: &str) -> Result<()> {
    let rendered = match format.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml::to_string(config).context("Failed to serialize to YAML")?,
        "json" => serde_json::to_string_pretty(config).context("Failed to serialize to JSON")?,
        _ => {
            return Err(anyhow::anyhow!(
                "Unknown output format: {}. Valid formats: yaml, json",
                format
            ));
        }
    };
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf/steep.yaml");

        handle_config_generate(&path, false).unwrap();
        assert!(handle_config_validate(&path).is_ok());

        // refuses to overwrite without --force
        assert!(handle_config_generate(&path, false).is_err());
        assert!(handle_config_generate(&path, true).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "load:\n  users: 0\n").unwrap();
        assert!(handle_config_validate(&path).is_err());
        assert!(handle_config_validate(&dir.path().join("absent.yaml")).is_err());
    }

    #[test]
    fn test_show_formats() {
        let config = SteepConfig::default();
        assert!(handle_config_show(&config, "json").is_ok());
        assert!(handle_config_show(&config, "YAML").is_ok());
        assert!(handle_config_show(&config, "toml").is_err());
    }
}
