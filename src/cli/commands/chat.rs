//! Interactive chat command.
//!
//! The terminal presentation loop: render the transcript, accept a
//! question, hand the conversation to the agent, append and print the
//! answer. Two states only: waiting for input, or solving.

use crate::agent::Agent;
use crate::cli::output::truncate;
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::credential::{self, ApiKey};
use crate::error::Result as RegneResult;
use crate::groq;
use crate::session::{Conversation, DEFAULT_QUESTION, GREETING};
use crate::tools::ToolRegistry;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, settings: Settings) -> Result<()> {
    let mut settings = settings;
    if let Some(model) = model {
        settings.llm.model = model;
    }

    // Credential gate: nothing runs until a key is present.
    let key = match credential::resolve(None, &settings) {
        Some(key) => key,
        None => match prompt_api_key()? {
            Some(key) => key,
            None => {
                Output::info("Please enter your Groq API key to continue.");
                return Ok(());
            }
        },
    };

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;

    let registry = ToolRegistry::standard(&key, &settings, &prompts)?;
    let client = groq::create_client(&key, &settings.llm);
    let agent = Agent::new(client, registry, &settings, &prompts);

    let mut conversation = Conversation::new();

    println!("\n{}", style("Regne Chat").bold().cyan());
    println!(
        "{}",
        style("Type a question, 'history' to re-render the transcript, 'clear' to reset, 'exit' to quit.")
            .dim()
    );
    println!("{}\n", style(format!("Try: {}", DEFAULT_QUESTION)).dim());

    println!("{} {}\n", style("Regne:").cyan().bold(), GREETING);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            Output::warning("Please enter a question to solve.");
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            conversation.reset();
            Output::info("Conversation history cleared.");
            continue;
        }

        if input.eq_ignore_ascii_case("history") {
            println!("\n{}\n", conversation.render());
            continue;
        }

        solve_turn(&agent, &mut conversation, input).await;
    }

    Ok(())
}

/// One idle -> solving -> idle transition.
async fn solve_turn(agent: &Agent, conversation: &mut Conversation, question: &str) {
    conversation.push_user(question);

    let spinner = Output::spinner("Solving the problem...");

    match agent.run(conversation).await {
        Ok(outcome) => {
            spinner.finish_and_clear();
            conversation.push_assistant(&outcome.answer);

            for call in &outcome.tool_calls {
                Output::tool_call(&call.name, &truncate(&call.arguments, 60));
            }

            println!("\n{} {}\n", style("Regne:").cyan().bold(), outcome.answer);
        }
        Err(e) => {
            // The user message stays; only the answer is withheld.
            spinner.finish_and_clear();
            Output::error(&format!("Error: {}", e));
        }
    }
}

/// Ask for a key on stdin. One empty answer means absent.
fn prompt_api_key() -> RegneResult<Option<ApiKey>> {
    print!("{} ", style("Enter your Groq API key:").yellow().bold());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    ApiKey::new(input).map(Some)
}
