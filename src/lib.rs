//! Regne - Math Problem Solver and Data Search Assistant
//!
//! A chat assistant that forwards natural-language math and reasoning
//! questions to a hosted LLM agent, which selects among three tools (a
//! Wikipedia lookup, a calculator, and a free-form reasoning prompt)
//! to produce an answer.
//!
//! The name "Regne" comes from the Norwegian/Scandinavian word for
//! "calculate."
//!
//! # Overview
//!
//! Regne lets you:
//! - Ask math and reasoning questions from the terminal or a web page
//! - Let the model route each question through the right tool
//! - Keep a per-session transcript of the conversation
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `credential` - API key resolution and masking
//! - `groq` - Chat completions client for the Groq endpoint
//! - `session` - Append-only conversation state
//! - `tools` - The Wikipedia, calculator, and reasoning tools
//! - `agent` - The tool-calling agent runner
//! - `cli` - Command-line surface and presentation loops
//!
//! # Example
//!
//! ```rust,no_run
//! use regne::agent::Agent;
//! use regne::config::{Prompts, Settings};
//! use regne::credential::ApiKey;
//! use regne::session::Conversation;
//! use regne::tools::ToolRegistry;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let prompts = Prompts::default();
//!     let key = ApiKey::new("gsk_...")?;
//!
//!     let registry = ToolRegistry::standard(&key, &settings, &prompts)?;
//!     let client = regne::groq::create_client(&key, &settings.llm);
//!     let agent = Agent::new(client, registry, &settings, &prompts);
//!
//!     let mut conversation = Conversation::new();
//!     conversation.push_user("What is 320 + 270?");
//!     let outcome = agent.run(&conversation).await?;
//!     conversation.push_assistant(&outcome.answer);
//!     println!("{}", outcome.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod credential;
pub mod error;
pub mod groq;
pub mod session;
pub mod tools;

pub use error::{RegneError, Result};
