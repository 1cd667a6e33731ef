//! Tools the agent can call.
//!
//! Three fixed capabilities exist for the process lifetime: a
//! Wikipedia lookup, an arithmetic calculator, and a free-form
//! reasoning prompt. Each sits behind the same `Tool` interface so the
//! registry can hand uniform definitions to the model and dispatch its
//! tool calls by name.

mod calculator;
mod reasoning;
mod wikipedia;

pub use calculator::CalculatorTool;
pub use reasoning::ReasoningTool;
pub use wikipedia::WikipediaTool;

use crate::config::{Prompts, Settings};
use crate::credential::ApiKey;
use crate::error::{RegneError, Result};
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// A named, described capability with string-in/string-out semantics.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    /// Natural-language contract shown to the model. This is the only
    /// thing steering tool selection; nothing is validated locally.
    fn description(&self) -> &'static str;

    fn parameters_schema(&self) -> Value;

    async fn execute(&self, args: Value) -> Result<String>;
}

/// Owns the tool instances and dispatches calls by name.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// The standard registry: wikipedia, calculator, reasoning.
    pub fn standard(key: &ApiKey, settings: &Settings, prompts: &Prompts) -> Result<Self> {
        let client = crate::groq::create_client(key, &settings.llm);

        Ok(Self {
            tools: vec![
                Arc::new(WikipediaTool::new(&settings.wikipedia)?),
                Arc::new(CalculatorTool::new(
                    client.clone(),
                    &settings.llm,
                    prompts.clone(),
                )),
                Arc::new(ReasoningTool::new(client, &settings.llm, prompts.clone())),
            ],
        })
    }

    /// Registry over an arbitrary tool set.
    pub fn from_tools(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Function definitions in the shape the chat completions API expects.
    pub fn definitions(&self) -> Vec<ChatCompletionTool> {
        self.tools
            .iter()
            .map(|tool| ChatCompletionTool {
                r#type: ChatCompletionToolType::Function,
                function: FunctionObject {
                    name: tool.name().to_string(),
                    description: Some(tool.description().to_string()),
                    parameters: Some(tool.parameters_schema()),
                    strict: None,
                },
            })
            .collect()
    }

    /// Execute a tool call from the model. `arguments` is the raw JSON
    /// string from the completion response.
    pub async fn dispatch(&self, name: &str, arguments: &str) -> Result<String> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| RegneError::Tool(format!("Unknown tool: {}", name)))?;

        let args: Value = serde_json::from_str(arguments)
            .map_err(|e| RegneError::Tool(format!("Invalid tool arguments: {}", e)))?;

        info!("Executing tool: {} with args: {}", name, arguments);
        tool.execute(args).await
    }
}

/// Extract a required non-empty string argument.
pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args[key]
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| RegneError::Tool(format!("Missing '{}' argument", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echoes its input back."
        }

        fn parameters_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            })
        }

        async fn execute(&self, args: Value) -> Result<String> {
            Ok(required_str(&args, "text")?.to_string())
        }
    }

    fn echo_registry() -> ToolRegistry {
        ToolRegistry::from_tools(vec![Arc::new(EchoTool)])
    }

    #[tokio::test]
    async fn test_dispatch_known_tool() {
        let registry = echo_registry();
        let result = registry.dispatch("echo", r#"{"text": "hi"}"#).await.unwrap();
        assert_eq!(result, "hi");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let registry = echo_registry();
        let err = registry.dispatch("nope", "{}").await.unwrap_err();
        assert!(err.to_string().contains("Unknown tool"));
    }

    #[tokio::test]
    async fn test_dispatch_malformed_arguments() {
        let registry = echo_registry();
        let err = registry.dispatch("echo", "not json").await.unwrap_err();
        assert!(err.to_string().contains("Invalid tool arguments"));
    }

    #[test]
    fn test_definitions_carry_names_and_schemas() {
        let registry = echo_registry();
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].function.name, "echo");
        assert!(defs[0].function.parameters.is_some());
    }

    #[test]
    fn test_required_str_missing_and_empty() {
        assert!(required_str(&json!({}), "query").is_err());
        assert!(required_str(&json!({"query": "  "}), "query").is_err());
        assert_eq!(required_str(&json!({"query": "x"}), "query").unwrap(), "x");
    }
}
