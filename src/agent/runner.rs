//! Agent runner with tool calling loop.
//!
//! The decision procedure lives in the hosted model: each iteration
//! sends the conversation plus tool definitions and executes whatever
//! tool calls come back, until the model answers in plain text.

use crate::config::{Prompts, Settings};
use crate::error::{RegneError, Result};
use crate::session::{Conversation, Role};
use crate::tools::ToolRegistry;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use std::collections::HashMap;
use tracing::{debug, info};

/// Agent that answers questions by selecting among the registered tools.
pub struct Agent {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    tools: ToolRegistry,
    max_iterations: usize,
    system_prompt: String,
}

impl Agent {
    /// Create an agent over the given tool registry.
    pub fn new(
        client: async_openai::Client<async_openai::config::OpenAIConfig>,
        tools: ToolRegistry,
        settings: &Settings,
        prompts: &Prompts,
    ) -> Self {
        let system_prompt = prompts.render_with_custom(&prompts.agent.system, &HashMap::new());

        Self {
            client,
            model: settings.llm.model.clone(),
            temperature: settings.llm.temperature,
            tools,
            max_iterations: settings.agent.max_iterations,
            system_prompt,
        }
    }

    /// Run the agent over the conversation so far and produce an answer.
    ///
    /// The caller appends the pending user question to the conversation
    /// before invoking this; the runner itself never mutates the store.
    pub async fn run(&self, conversation: &Conversation) -> Result<AgentOutcome> {
        let mut messages = request_messages(&self.system_prompt, conversation)?;

        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(RegneError::Agent(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Agent iteration {}", iterations);

            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages(messages.clone())
                .tools(self.tools.definitions())
                .temperature(self.temperature)
                .build()
                .map_err(|e| RegneError::Agent(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| RegneError::Llm(format!("Agent API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| RegneError::Agent("No response from model".to_string()))?;

            if let Some(ref tool_calls) = choice.message.tool_calls {
                if tool_calls.is_empty() {
                    return Ok(build_outcome(&choice.message.content, tool_calls_made, iterations));
                }

                let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                    .tool_calls(tool_calls.clone())
                    .build()
                    .map_err(|e| RegneError::Agent(e.to_string()))?;
                messages.push(assistant_msg.into());

                for tool_call in tool_calls {
                    let record = self.execute_tool_call(tool_call).await;

                    let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                        .tool_call_id(&tool_call.id)
                        .content(record.result.clone())
                        .build()
                        .map_err(|e| RegneError::Agent(e.to_string()))?;
                    messages.push(tool_msg.into());

                    tool_calls_made.push(record);
                }
            } else {
                return Ok(build_outcome(&choice.message.content, tool_calls_made, iterations));
            }
        }
    }

    /// Execute a single tool call and return a record of it.
    ///
    /// Failures become tool-result text fed back to the model, never
    /// loop aborts; the model retries or rephrases on its own.
    async fn execute_tool_call(&self, tool_call: &ChatCompletionMessageToolCall) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Agent calling tool: {} with args: {}", name, arguments);

        let result = match self.tools.dispatch(name, arguments).await {
            Ok(output) => output,
            Err(e) => format!("Tool error: {}", e),
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }
}

/// Map the transcript into request messages, system prompt first.
fn request_messages(
    system_prompt: &str,
    conversation: &Conversation,
) -> Result<Vec<ChatCompletionRequestMessage>> {
    let mut messages: Vec<ChatCompletionRequestMessage> = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt)
            .build()
            .map_err(|e| RegneError::Agent(e.to_string()))?
            .into(),
    ];

    for message in conversation.messages() {
        let mapped: ChatCompletionRequestMessage = match message.role {
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(message.content.clone())
                .build()
                .map_err(|e| RegneError::Agent(e.to_string()))?
                .into(),
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(message.content.clone())
                .build()
                .map_err(|e| RegneError::Agent(e.to_string()))?
                .into(),
        };
        messages.push(mapped);
    }

    Ok(messages)
}

fn build_outcome(
    content: &Option<String>,
    tool_calls: Vec<ToolCallRecord>,
    iterations: usize,
) -> AgentOutcome {
    AgentOutcome {
        answer: content.clone().unwrap_or_default(),
        tool_calls,
        iterations,
    }
}

/// Result of an agent run.
#[derive(Debug)]
pub struct AgentOutcome {
    /// The final answer text from the agent.
    pub answer: String,
    /// Record of all tool calls made during the run.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of model round-trips used.
    pub iterations: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Conversation;

    #[test]
    fn test_request_messages_prepends_system_prompt() {
        let mut conversation = Conversation::new();
        conversation.push_user("What is 2+2?");

        let messages = request_messages("You solve math.", &conversation).unwrap();
        // system + greeting + user question
        assert_eq!(messages.len(), 3);
        assert!(matches!(
            messages[0],
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(
            messages[1],
            ChatCompletionRequestMessage::Assistant(_)
        ));
        assert!(matches!(messages[2], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_build_outcome_defaults_empty_answer() {
        let outcome = build_outcome(&None, Vec::new(), 1);
        assert_eq!(outcome.answer, "");
        assert_eq!(outcome.iterations, 1);
    }

    #[test]
    fn test_tool_call_record_display() {
        let record = ToolCallRecord {
            name: "calculator".to_string(),
            arguments: r#"{"expression": "2+2"}"#.to_string(),
            result: "Answer: 4".to_string(),
        };
        assert_eq!(format!("{}", record), r#"calculator({"expression": "2+2"})"#);
    }
}
