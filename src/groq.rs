//! Groq client configuration.
//!
//! Groq exposes an OpenAI-compatible chat completions API, so the
//! client is the standard OpenAI one pointed at the Groq base URL with
//! the session-supplied key.

use crate::config::LlmSettings;
use crate::credential::ApiKey;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create a chat completions client for the configured endpoint.
pub fn create_client(key: &ApiKey, settings: &LlmSettings) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_seconds))
        .build()
        .expect("Failed to create HTTP client");

    let config = OpenAIConfig::new()
        .with_api_key(key.expose())
        .with_api_base(&settings.base_url);

    Client::with_config(config).with_http_client(http_client)
}
