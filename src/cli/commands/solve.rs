//! Solve command - one-shot question answering.

use crate::agent::Agent;
use crate::cli::output::truncate;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::credential;
use crate::groq;
use crate::session::Conversation;
use crate::tools::ToolRegistry;
use anyhow::Result;

/// Run the solve command.
pub async fn run_solve(question: &str, model: Option<String>, settings: Settings) -> Result<()> {
    if question.trim().is_empty() {
        Output::warning("Please enter a question to solve.");
        return Ok(());
    }

    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Solve, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'regne doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let mut settings = settings;
    if let Some(model) = model {
        settings.llm.model = model;
    }

    let key = credential::resolve(None, &settings)
        .ok_or_else(|| anyhow::anyhow!("No API key available"))?;

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;

    let registry = ToolRegistry::standard(&key, &settings, &prompts)?;
    let client = groq::create_client(&key, &settings.llm);
    let agent = Agent::new(client, registry, &settings, &prompts);

    let mut conversation = Conversation::new();
    conversation.push_user(question.trim());

    let spinner = Output::spinner("Solving the problem...");

    match agent.run(&conversation).await {
        Ok(outcome) => {
            spinner.finish_and_clear();
            conversation.push_assistant(&outcome.answer);

            println!("\n{}\n", outcome.answer);

            if !outcome.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", outcome.tool_calls.len()));
                for call in &outcome.tool_calls {
                    Output::tool_call(&call.name, &truncate(&call.arguments, 60));
                }
                println!();
            }

            Output::info(&format!("Completed in {} iteration(s)", outcome.iterations));
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to solve: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
