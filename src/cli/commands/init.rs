//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use crate::credential::{self, API_KEY_ENV};
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Regne Setup");
    println!();
    println!("Welcome to Regne! Let's make sure everything is configured correctly.\n");

    // Step 1: Check API key
    println!("{}", style("Step 1: Checking API configuration").bold().cyan());
    println!();

    if credential::resolve(None, settings).is_none() {
        Output::warning(&format!("{} environment variable is not set.", API_KEY_ENV));
        println!();
        println!("  Regne uses a Groq API key for the agent and its tools.");
        println!(
            "  Get your API key from: {}",
            style("https://console.groq.com/keys").underlined()
        );
        println!();
        println!("  Set it in your shell configuration (~/.bashrc, ~/.zshrc, etc.):");
        println!("  {}", style("export GROQ_API_KEY='gsk_...'").green());
        println!();
        println!("  You can also enter it interactively in 'regne chat' or the web UI.");
        println!();

        if !prompt_continue("Continue without API key?")? {
            println!();
            Output::info("Setup cancelled. Set your API key and run 'regne init' again.");
            return Ok(());
        }
    } else {
        Output::success("Groq API key is configured!");
    }

    println!();

    // Step 2: Create config file
    println!("{}", style("Step 2: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!();
        println!("  Edit your config with: {}", style("regne config edit").green());
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check configuration", style("regne doctor").cyan());
    println!("  {} Solve a single question", style("regne solve \"<question>\"").cyan());
    println!("  {} Start an interactive chat", style("regne chat").cyan());
    println!("  {} Open the web chat", style("regne serve").cyan());
    println!();
    println!("For more help: {}", style("regne --help").cyan());

    Ok(())
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y" || input.trim().to_lowercase() == "yes")
}
