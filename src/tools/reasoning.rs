//! Free-form reasoning tool.
//!
//! Formats the question into a fixed step-by-step solver template and
//! forwards it to the model for one completion. The reply is returned
//! verbatim.

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
use serde_json::{json, Value};
use std::collections::HashMap;

pub struct ReasoningTool {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    prompts: Prompts,
}

impl ReasoningTool {
    pub fn new(client: Client<OpenAIConfig>, llm: &LlmSettings, prompts: Prompts) -> Self {
        Self {
            client,
            model: llm.model.clone(),
            temperature: llm.temperature,
            prompts,
        }
    }
}

#[async_trait]
impl Tool for ReasoningTool {
    fn name(&self) -> &'static str {
        "reasoning"
    }

    fn description(&self) -> &'static str {
        "A tool for answering logic-based and reasoning-based questions."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "The question to reason about"
                }
            },
            "required": ["question"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let question = required_str(&args, "question")?;

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.reasoning.user, &vars);

        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| RegneError::Tool(e.to_string()))?
                .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| RegneError::Tool(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| RegneError::Llm(format!("Reasoning request failed: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| RegneError::Tool("Empty response from reasoning".to_string()))?;

        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_question() {
        let client = Client::with_config(OpenAIConfig::default());
        let tool = ReasoningTool::new(client, &LlmSettings::default(), Prompts::default());
        assert_eq!(tool.name(), "reasoning");
        assert_eq!(tool.parameters_schema()["required"][0], "question");
    }

    #[test]
    fn test_template_renders_question() {
        let prompts = Prompts::default();
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "Why is 6 afraid of 7?".to_string());

        let rendered = prompts.render_with_custom(&prompts.reasoning.user, &vars);
        assert!(rendered.contains("Question: Why is 6 afraid of 7?"));
        assert!(rendered.ends_with("Answer:"));
    }
}
