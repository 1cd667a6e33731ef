//! Pre-flight checks before remote operations.
//!
//! Validates that a credential is resolvable before starting
//! non-interactive operations that would otherwise fail midway.

use crate::config::Settings;
use crate::credential;
use crate::error::{RegneError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// One-shot solving needs a key up front.
    Solve,
    /// Chat gathers the key interactively.
    Chat,
    /// The web UI gathers the key per request.
    Serve,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Solve => check_api_key(settings)?,
        Operation::Chat | Operation::Serve => {}
    }
    Ok(())
}

/// Check that an API key is resolvable without user interaction.
fn check_api_key(settings: &Settings) -> Result<()> {
    match credential::resolve(None, settings) {
        Some(_) => Ok(()),
        None => Err(RegneError::Credential(format!(
            "No API key found. Set it with: export {}='gsk_...'",
            credential::API_KEY_ENV
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_operations_have_no_requirements() {
        let settings = Settings::default();
        assert!(check(Operation::Chat, &settings).is_ok());
        assert!(check(Operation::Serve, &settings).is_ok());
    }

    #[test]
    fn test_solve_requires_resolvable_key() {
        let mut settings = Settings::default();
        settings.llm.api_key = Some("gsk_test".to_string());
        assert!(check(Operation::Solve, &settings).is_ok());
    }
}
