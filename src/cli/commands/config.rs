//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use crate::error::{RegneError, Result as RegneResult};
use anyhow::Result;
use url::Url;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            let mut settings = settings;
            apply_set(&mut settings, key, value)?;
            settings.save()?;
            Output::success(&format!("Set {} = {}", key, value));
            Output::info(&format!(
                "Saved to {}",
                Settings::default_config_path().display()
            ));
        }

        ConfigAction::Edit => {
            let config_path = Settings::default_config_path();

            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save()?;
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(&config_path)
                .status();

            match status {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Apply a dotted-key assignment to the settings.
fn apply_set(settings: &mut Settings, key: &str, value: &str) -> RegneResult<()> {
    match key {
        "general.log_level" => settings.general.log_level = value.to_string(),
        "llm.model" => settings.llm.model = value.to_string(),
        "llm.base_url" => {
            Url::parse(value)
                .map_err(|e| RegneError::Config(format!("Invalid URL '{}': {}", value, e)))?;
            settings.llm.base_url = value.to_string();
        }
        "llm.temperature" => settings.llm.temperature = parse_value(key, value)?,
        "llm.timeout_seconds" => settings.llm.timeout_seconds = parse_value(key, value)?,
        "llm.api_key" => {
            return Err(RegneError::Config(format!(
                "Refusing to write the API key to disk. Use the {} environment variable instead.",
                crate::credential::API_KEY_ENV
            )))
        }
        "wikipedia.api_url" => {
            Url::parse(value)
                .map_err(|e| RegneError::Config(format!("Invalid URL '{}': {}", value, e)))?;
            settings.wikipedia.api_url = value.to_string();
        }
        "wikipedia.max_results" => settings.wikipedia.max_results = parse_value(key, value)?,
        "wikipedia.max_chars" => settings.wikipedia.max_chars = parse_value(key, value)?,
        "wikipedia.timeout_seconds" => {
            settings.wikipedia.timeout_seconds = parse_value(key, value)?
        }
        "agent.max_iterations" => settings.agent.max_iterations = parse_value(key, value)?,
        _ => {
            return Err(RegneError::Config(format!(
                "Unknown configuration key: {}",
                key
            )))
        }
    }
    Ok(())
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> RegneResult<T> {
    value
        .parse()
        .map_err(|_| RegneError::Config(format!("Invalid value '{}' for {}", value, key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_set_known_keys() {
        let mut settings = Settings::default();
        apply_set(&mut settings, "llm.model", "llama-3.3-70b-versatile").unwrap();
        apply_set(&mut settings, "agent.max_iterations", "5").unwrap();

        assert_eq!(settings.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(settings.agent.max_iterations, 5);
    }

    #[test]
    fn test_apply_set_unknown_key() {
        let mut settings = Settings::default();
        assert!(apply_set(&mut settings, "nope.nothing", "x").is_err());
    }

    #[test]
    fn test_apply_set_refuses_api_key() {
        let mut settings = Settings::default();
        let err = apply_set(&mut settings, "llm.api_key", "gsk_secret").unwrap_err();
        assert!(err.to_string().contains("Refusing"));
        assert!(settings.llm.api_key.is_none());
    }

    #[test]
    fn test_apply_set_validates_numbers_and_urls() {
        let mut settings = Settings::default();
        assert!(apply_set(&mut settings, "agent.max_iterations", "lots").is_err());
        assert!(apply_set(&mut settings, "llm.base_url", "not a url").is_err());
    }
}
