//! Acumen CLI - Interactive account-intelligence REPL
//!
//! A terminal session against the full tool catalog. Type a question, watch
//! the routed tool calls, read the cited answer.

use acumen::agent::{
    run_turn, Conversation, LoopConfig, OpenAiClient, TurnObserver, prompts::SYSTEM_PROMPT,
};
use acumen::config::Config;
use acumen::search::GleanClient;
use acumen::tools::account_tools;
use acumen::Result;

use async_trait::async_trait;
use clap::Parser;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use serde_json::Value;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Acumen - Interactive account-intelligence agent
#[derive(Parser, Debug)]
#[command(name = "acumen")]
#[command(about = "Conversational account-intelligence agent over enterprise search")]
#[command(version)]
struct Args {
    /// Model to use (overrides .env default)
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum reasoning round-trips per question
    #[arg(long, default_value_t = 10)]
    max_iterations: u32,

    /// Show tool arguments and result previews
    #[arg(short, long)]
    verbose: bool,
}

/// Prints tool activity to the terminal as the loop runs
struct CliObserver {
    verbose: bool,
}

#[async_trait]
impl TurnObserver for CliObserver {
    async fn on_tool_call(&self, name: &str, arguments: &Value) {
        println!("  {} {}", style("->").dim(), style(name).cyan().bold());
        if self.verbose {
            if let Some(query) = arguments.get("query").and_then(|v| v.as_str()) {
                println!("     {}", style(format!("query: \"{}\"", query)).dim());
            }
            if let Some(url) = arguments.get("url").and_then(|v| v.as_str()) {
                println!("     {}", style(format!("url: {}", url)).dim());
            }
        }
    }

    async fn on_tool_result(&self, _name: &str, result: &str) {
        if self.verbose {
            let preview: String = result.chars().take(200).collect();
            println!("     {}", style(preview.replace('\n', " ")).dim());
        }
    }
}

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    if format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env()?;
    init_tracing(&config.log.level, &config.log.format);
    config.validate()?;

    if let Some(model) = args.model {
        config.reasoning.model = model;
    }

    let llm_client = OpenAiClient::new(&config.reasoning)?;
    let glean = Arc::new(GleanClient::new(&config.glean)?);
    let tools = account_tools(glean);
    let mut conversation = Conversation::new(SYSTEM_PROMPT);
    let loop_config = LoopConfig {
        max_iterations: args.max_iterations,
    };
    let observer = CliObserver {
        verbose: args.verbose,
    };

    println!(
        "{}",
        style(format!("Acumen v{} - Account Intelligence Agent", acumen::VERSION))
            .cyan()
            .bold()
    );
    println!("Model: {}", style(llm_client.model()).green());
    println!(
        "{}",
        style("Commands: 'quit' to exit, 'reset' to clear history").dim()
    );

    loop {
        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| acumen::Error::Io(std::io::Error::other(e)))?;

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        match trimmed.to_lowercase().as_str() {
            "quit" | "exit" | "q" => break,
            "reset" => {
                conversation.reset();
                println!("{}", style("Conversation reset.").dim());
                continue;
            }
            _ => {}
        }

        match run_turn(
            &mut conversation,
            trimmed,
            &llm_client,
            &tools,
            &loop_config,
            &observer,
        )
        .await
        {
            Ok(answer) => {
                println!("\n{}", style("Agent:").blue().bold());
                println!("{}\n", answer);
            }
            Err(e) => {
                // Turn aborted; the session stays usable
                println!("{}\n", style(format!("Error: {}", e)).red());
            }
        }
    }

    println!("{}", style("Goodbye!").dim());
    Ok(())
}
