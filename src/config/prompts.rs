//! Prompt templates for Regne.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub agent: AgentPrompts,
    pub calculator: CalculatorPrompts,
    pub reasoning: ReasoningPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// System prompt driving the tool-selecting agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentPrompts {
    pub system: String,
}

impl Default for AgentPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a math problem solver. You are given a question and you need to solve it using the tools provided.
Logically break down the question into smaller steps and solve it step by step.

Guidelines:
- Use 'wikipedia' to look up facts, dates, and figures mentioned in the question
- Use 'calculator' to compute the answer to a math-related question; only mathematical input needs to be provided
- Use 'reasoning' for logic-based and reasoning-based questions that need no external facts

When you have worked out the answer, reply with a short explanation of the steps and the final result."#
                .to_string(),
        }
    }
}

/// Prompt that turns a word problem into a bare arithmetic expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorPrompts {
    pub user: String,
}

impl Default for CalculatorPrompts {
    fn default() -> Self {
        Self {
            user: r#"Translate the following math problem into a single arithmetic expression that can be evaluated numerically.
Use only numbers, parentheses, and the operators + - * / ^.

Problem: {{question}}

Reply with the expression on one line and nothing else."#
                .to_string(),
        }
    }
}

/// Prompt for open-ended step-by-step reasoning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningPrompts {
    pub user: String,
}

impl Default for ReasoningPrompts {
    fn default() -> Self {
        Self {
            user: r#"You are a math problem solver. You are given a question and you need to solve it.
Logically break down the question into smaller steps and solve it step by step.

Question: {{question}}
Answer:"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = super::Settings::expand_path(dir);

            let agent_path = custom_path.join("agent.toml");
            if agent_path.exists() {
                let content = std::fs::read_to_string(&agent_path)?;
                prompts.agent = toml::from_str(&content)?;
            }

            let calculator_path = custom_path.join("calculator.toml");
            if calculator_path.exists() {
                let content = std::fs::read_to_string(&calculator_path)?;
                prompts.calculator = toml::from_str(&content)?;
            }

            let reasoning_path = custom_path.join("reasoning.toml");
            if reasoning_path.exists() {
                let content = std::fs::read_to_string(&reasoning_path)?;
                prompts.reasoning = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.agent.system.is_empty());
        assert!(prompts.calculator.user.contains("{{question}}"));
        assert!(prompts.reasoning.user.contains("{{question}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Question: {{question}}\nAnswer:";
        let mut vars = std::collections::HashMap::new();
        vars.insert("question".to_string(), "What is 2+2?".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Question: What is 2+2?\nAnswer:");
    }

    #[test]
    fn test_render_with_custom_precedence() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("question".to_string(), "stale".to_string());

        let mut vars = std::collections::HashMap::new();
        vars.insert("question".to_string(), "fresh".to_string());

        let result = prompts.render_with_custom("{{question}}", &vars);
        assert_eq!(result, "fresh");
    }
}
