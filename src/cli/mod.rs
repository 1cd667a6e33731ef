//! CLI module for Regne.

pub mod commands;
pub(crate) mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Regne - Math Problem Solver and Data Search Assistant
///
/// A chat assistant that solves math and reasoning questions by letting a
/// hosted LLM pick among a Wikipedia lookup, a calculator, and a
/// free-form reasoning prompt. The name "Regne" comes from the
/// Norwegian/Scandinavian word for "calculate."
#[derive(Parser, Debug)]
#[command(name = "regne")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Regne and verify the setup
    Init,

    /// Check configuration and API key
    Doctor,

    /// Solve a single question and print the answer
    Solve {
        /// The question to solve
        question: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start an interactive chat session
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Serve the single-page chat UI over HTTP
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "llm.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
