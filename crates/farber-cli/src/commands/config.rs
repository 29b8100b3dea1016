//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use farber_core::Config;

use crate::output::{Output, OutputFormat};

/// Sections the panel can open on
const SECTIONS: [&str; 7] = [
    "dashboard", "budgets", "clients", "orders", "products", "history", "config",
];

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "default_section": config.default_section,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:        {}", config.data_dir.display());
            println!("  default_section: {}", config.default_section);
            println!(
                "  log_file:        {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match key.as_str() {
        "data_dir" => {
            config.data_dir = value.clone().into();
        }
        "default_section" => {
            if !SECTIONS.contains(&value.as_str()) {
                bail!(
                    "Unknown section: '{}'\nValid sections: {}",
                    value,
                    SECTIONS.join(", ")
                );
            }
            config.default_section = value.clone();
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.clone().into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, default_section, log_file",
                key
            );
        }
    }

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(temp_dir: &TempDir) -> PathBuf {
        let config_path = temp_dir.path().join("config.toml");
        let data_dir = temp_dir.path().join("data");
        std::fs::write(
            &config_path,
            format!("data_dir = {:?}\n", data_dir.display().to_string()),
        )
        .unwrap();
        config_path
    }

    #[test]
    fn test_set_default_section_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = config_in(&temp_dir);
        let output = Output::new(OutputFormat::Quiet);

        set(
            "default_section".to_string(),
            "orders".to_string(),
            Some(&config_path),
            &output,
        )
        .unwrap();

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("default_section = \"orders\""));
    }

    #[test]
    fn test_set_rejects_unknown_key_and_section() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = config_in(&temp_dir);
        let before = std::fs::read_to_string(&config_path).unwrap();
        let output = Output::new(OutputFormat::Quiet);

        assert!(set("theme".to_string(), "dark".to_string(), Some(&config_path), &output).is_err());
        assert!(set(
            "default_section".to_string(),
            "reports".to_string(),
            Some(&config_path),
            &output
        )
        .is_err());
        assert_eq!(std::fs::read_to_string(&config_path).unwrap(), before);
    }
}
