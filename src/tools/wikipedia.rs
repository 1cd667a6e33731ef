//! Wikipedia lookup tool.
//!
//! Queries the MediaWiki API: a full-text search for the top titles,
//! then the plain-text intro extract for each. Results are passed back
//! to the model uninterpreted; HTTP failures and empty result sets are
//! whatever the remote service returned.

use super::{required_str, Tool};
use crate::config::WikipediaSettings;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

pub struct WikipediaTool {
    http: reqwest::Client,
    api_url: String,
    max_results: u32,
    max_chars: usize,
}

impl WikipediaTool {
    pub fn new(settings: &WikipediaSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            api_url: settings.api_url.clone(),
            max_results: settings.max_results,
            max_chars: settings.max_chars,
        })
    }

    /// Top page titles for a search query.
    async fn search_titles(&self, query: &str) -> Result<Vec<String>> {
        let limit = self.max_results.to_string();
        let response: Value = self
            .http
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let titles = response["query"]["search"]
            .as_array()
            .map(|hits| {
                hits.iter()
                    .filter_map(|hit| hit["title"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        debug!("Wikipedia search '{}' matched {:?}", query, titles);
        Ok(titles)
    }

    /// Plain-text intro extract for a page, if the page has one.
    async fn fetch_summary(&self, title: &str) -> Result<Option<String>> {
        let response: Value = self
            .http
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let summary = response["query"]["pages"].as_object().and_then(|pages| {
            pages
                .values()
                .find_map(|page| page["extract"].as_str())
                .map(|extract| extract.trim().to_string())
                .filter(|extract| !extract.is_empty())
        });

        Ok(summary)
    }
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    fn description(&self) -> &'static str {
        "Use this tool to search Wikipedia for information on the topics mentioned in the question."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let query = required_str(&args, "query")?;

        let titles = self.search_titles(query).await?;
        if titles.is_empty() {
            return Ok(format!("No Wikipedia results found for '{}'.", query));
        }

        let mut pages = Vec::new();
        for title in titles {
            if let Some(summary) = self.fetch_summary(&title).await? {
                pages.push((title, summary));
            }
        }

        if pages.is_empty() {
            return Ok(format!("No Wikipedia results found for '{}'.", query));
        }

        Ok(format_pages(&pages, self.max_chars))
    }
}

/// Join page summaries into the text handed back to the model.
fn format_pages(pages: &[(String, String)], max_chars: usize) -> String {
    let combined = pages
        .iter()
        .map(|(title, summary)| format!("Page: {}\nSummary: {}", title, summary))
        .collect::<Vec<_>>()
        .join("\n\n");

    truncate_chars(&combined, max_chars)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pages_blocks() {
        let pages = vec![
            ("Ada Lovelace".to_string(), "English mathematician.".to_string()),
            ("Charles Babbage".to_string(), "English polymath.".to_string()),
        ];

        let formatted = format_pages(&pages, 4000);
        assert!(formatted.starts_with("Page: Ada Lovelace\nSummary: English mathematician."));
        assert!(formatted.contains("\n\nPage: Charles Babbage"));
    }

    #[test]
    fn test_format_pages_respects_budget() {
        let pages = vec![("Pi".to_string(), "x".repeat(500))];
        let formatted = format_pages(&pages, 100);
        assert_eq!(formatted.chars().count(), 100);
    }

    #[test]
    fn test_truncate_handles_multibyte() {
        let text = "π".repeat(10);
        let truncated = truncate_chars(&text, 4);
        assert_eq!(truncated, "ππππ");
    }

    #[test]
    fn test_schema_requires_query() {
        let tool = WikipediaTool::new(&WikipediaSettings::default()).unwrap();
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"][0], "query");
    }
}
