//! API key handling.
//!
//! The key gates every agent invocation: nothing downstream runs
//! without one. Resolution order is explicit value, then the
//! `GROQ_API_KEY` environment variable, then the config file. The key
//! is held in memory for the session and never written to disk.

use crate::config::Settings;
use crate::error::{RegneError, Result};

/// Environment variable consulted when no explicit key is given.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// An opaque API key. Masked in all formatting output.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a key from user input. Empty or whitespace-only input is
    /// rejected so an absent credential can never masquerade as one.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(RegneError::Credential("API key is empty".to_string()));
        }
        Ok(Self(value.trim().to_string()))
    }

    /// The raw key, for request authentication only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Masked rendering for logs and diagnostics.
    pub fn masked(&self) -> String {
        if self.0.len() > 11 {
            format!("{}...{}", &self.0[..7], &self.0[self.0.len() - 4..])
        } else {
            "***".to_string()
        }
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey({})", self.masked())
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.masked())
    }
}

/// Resolve a key from the available sources, most specific first.
///
/// Returns `None` when no source yields a usable key; callers decide
/// whether to prompt interactively or block with a notice.
pub fn resolve(explicit: Option<&str>, settings: &Settings) -> Option<ApiKey> {
    if let Some(value) = explicit {
        if let Ok(key) = ApiKey::new(value) {
            return Some(key);
        }
    }

    if let Ok(value) = std::env::var(API_KEY_ENV) {
        if let Ok(key) = ApiKey::new(value) {
            return Some(key);
        }
    }

    settings
        .llm
        .api_key
        .as_deref()
        .and_then(|value| ApiKey::new(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_key() {
        assert!(ApiKey::new("").is_err());
        assert!(ApiKey::new("   ").is_err());
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let key = ApiKey::new("  gsk_abc123  ").unwrap();
        assert_eq!(key.expose(), "gsk_abc123");
    }

    #[test]
    fn test_masks_in_debug_and_display() {
        let key = ApiKey::new("gsk_1234567890abcdef").unwrap();
        assert!(!format!("{:?}", key).contains("1234567890abcdef"));
        assert!(!format!("{}", key).contains("1234567890abcdef"));
        assert!(format!("{}", key).contains("..."));
    }

    #[test]
    fn test_short_key_fully_masked() {
        let key = ApiKey::new("abc").unwrap();
        assert_eq!(key.masked(), "***");
    }

    #[test]
    fn test_explicit_value_wins() {
        let settings = Settings::default();
        let key = resolve(Some("gsk_explicit"), &settings).unwrap();
        assert_eq!(key.expose(), "gsk_explicit");
    }

    #[test]
    fn test_config_key_used_when_no_explicit() {
        let mut settings = Settings::default();
        settings.llm.api_key = Some("gsk_from_config".to_string());
        // Explicit empty input falls through to the next source.
        let key = resolve(Some("   "), &settings);
        if std::env::var(API_KEY_ENV).is_err() {
            assert_eq!(key.unwrap().expose(), "gsk_from_config");
        }
    }
}
