//! Doctor command - verify configuration and credentials.

use crate::cli::Output;
use crate::config::Settings;
use crate::credential::{self, API_KEY_ENV};
use console::style;
use url::Url;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Regne Doctor");
    println!();
    println!("Checking configuration and credentials...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_check = check_api_key(settings);
    api_check.print();
    checks.push(api_check);

    println!();

    println!("{}", style("Endpoints").bold());
    let endpoint_checks = check_endpoints(settings);
    for check in &endpoint_checks {
        check.print();
    }
    checks.extend(endpoint_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Regne.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Regne is ready to use.");
    }

    Ok(())
}

/// Check whether an API key is resolvable, without revealing it.
fn check_api_key(settings: &Settings) -> CheckResult {
    match credential::resolve(None, settings) {
        Some(key) if key.expose().starts_with("gsk_") => {
            CheckResult::ok(API_KEY_ENV, &format!("configured ({})", key.masked()))
        }
        Some(key) => CheckResult::warning(
            API_KEY_ENV,
            &format!("set but format looks unusual ({})", key.masked()),
            "Expected format: gsk_... (Groq API key)",
        ),
        None => CheckResult::warning(
            API_KEY_ENV,
            "not set",
            "Set it with: export GROQ_API_KEY='gsk_...' (chat and the web UI also accept it interactively)",
        ),
    }
}

/// Validate the configured endpoint URLs.
fn check_endpoints(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    match Url::parse(&settings.llm.base_url) {
        Ok(_) if !settings.llm.model.trim().is_empty() => {
            results.push(CheckResult::ok(
                "LLM endpoint",
                &format!("{} ({})", settings.llm.base_url, settings.llm.model),
            ));
        }
        Ok(_) => {
            results.push(CheckResult::error(
                "LLM endpoint",
                "model is empty",
                "Set one with: regne config set llm.model gemma2-9b-it",
            ));
        }
        Err(e) => {
            results.push(CheckResult::error(
                "LLM endpoint",
                &format!("invalid URL: {}", e),
                "Fix with: regne config set llm.base_url https://api.groq.com/openai/v1",
            ));
        }
    }

    match Url::parse(&settings.wikipedia.api_url) {
        Ok(_) => {
            results.push(CheckResult::ok("Wikipedia endpoint", &settings.wikipedia.api_url));
        }
        Err(e) => {
            results.push(CheckResult::error(
                "Wikipedia endpoint",
                &format!("invalid URL: {}", e),
                "Fix with: regne config set wikipedia.api_url https://en.wikipedia.org/w/api.php",
            ));
        }
    }

    results
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: regne init (or regne config edit)",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_endpoint_checks_flag_bad_urls() {
        let mut settings = Settings::default();
        settings.wikipedia.api_url = "not a url".to_string();

        let results = check_endpoints(&settings);
        assert!(results
            .iter()
            .any(|c| c.name == "Wikipedia endpoint" && c.status == CheckStatus::Error));
    }

    #[test]
    fn test_endpoint_checks_pass_defaults() {
        let results = check_endpoints(&Settings::default());
        assert!(results.iter().all(|c| c.status == CheckStatus::Ok));
    }
}
