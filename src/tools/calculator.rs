//! Calculator tool.
//!
//! Two-step math chain: one completion translates the question into a
//! bare arithmetic expression, then the expression is evaluated
//! numerically in-process. Only the translation step talks to the
//! network.

use super::{required_str, Tool};
use crate::config::{LlmSettings, Prompts};
use crate::error::{RegneError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::debug;

pub struct CalculatorTool {
    client: Client<OpenAIConfig>,
    model: String,
    prompts: Prompts,
}

impl CalculatorTool {
    pub fn new(client: Client<OpenAIConfig>, llm: &LlmSettings, prompts: Prompts) -> Self {
        Self {
            client,
            model: llm.model.clone(),
            prompts,
        }
    }

    /// Ask the model to rewrite the question as a single expression.
    async fn translate(&self, question: &str) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.calculator.user, &vars);

        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| RegneError::Tool(e.to_string()))?
                .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.0)
            .build()
            .map_err(|e| RegneError::Tool(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| RegneError::Llm(format!("Expression translation failed: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| RegneError::Tool("Empty response from expression translation".to_string()))
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &'static str {
        "calculator"
    }

    fn description(&self) -> &'static str {
        "Use this tool to calculate the answer to a math-related question. Only mathematical input needs to be provided."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "The mathematical question or expression to evaluate"
                }
            },
            "required": ["expression"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let question = required_str(&args, "expression")?;

        let raw = self.translate(question).await?;
        let expression = extract_expression(&raw);
        if expression.is_empty() {
            return Err(RegneError::Tool(format!(
                "Could not derive an expression from: {}",
                raw.trim()
            )));
        }

        let value = meval::eval_str(&expression).map_err(|e| {
            RegneError::Tool(format!("Could not evaluate '{}': {}", expression, e))
        })?;

        debug!("Calculator evaluated '{}' = {}", expression, value);
        Ok(format!("Answer: {}", format_number(value)))
    }
}

/// Pull the expression out of the model's reply. Models wrap answers in
/// code fences or add a trailing period despite the prompt.
fn extract_expression(text: &str) -> String {
    let fence = Regex::new(r"```(?:[a-zA-Z]*\n)?([^`]+)```").expect("Invalid regex");

    let candidate = match fence.captures(text) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(text),
        None => text,
    };

    candidate
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .trim_end_matches('.')
        .trim()
        .to_string()
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_expression() {
        assert_eq!(extract_expression("320 + 270"), "320 + 270");
        assert_eq!(extract_expression("  320 + 270.  "), "320 + 270");
    }

    #[test]
    fn test_extract_from_code_fence() {
        assert_eq!(extract_expression("```\n320 + 270\n```"), "320 + 270");
        assert_eq!(extract_expression("```text\n25 * 4\n```"), "25 * 4");
    }

    #[test]
    fn test_extract_first_nonempty_line() {
        assert_eq!(extract_expression("\n\n12 / 3\nThat is the answer."), "12 / 3");
    }

    #[test]
    fn test_extract_empty_input() {
        assert_eq!(extract_expression("   \n  "), "");
    }

    #[test]
    fn test_evaluates_extracted_expression() {
        let expression = extract_expression("```\n320 + 270\n```");
        let value = meval::eval_str(&expression).unwrap();
        assert_eq!(format_number(value), "590");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-3.0), "-3");
    }
}
