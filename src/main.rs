//! DreamRoom - Entry Point
//!
//! `serve` runs the HTTP API. `repl` edits a local room interactively,
//! resolving each line as a design command.

use clap::{Parser, Subcommand};
use dreamroom::command::{CommandExecutor, CommandResolver};
use dreamroom::core::config::{AppConfig, AssistantMode};
use dreamroom::core::error::Result;
use dreamroom::room::{summarize, DesignState};
use dreamroom::server;

use std::io::{self, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dreamroom")]
#[command(about = "Room redesign assistant with natural language commands")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Command interpretation mode (keyword or llm)
    #[arg(long, global = true)]
    mode: Option<AssistantMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to bind, overrides the config file
        #[arg(long)]
        listen: Option<String>,
    },
    /// Edit a room interactively
    Repl,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dreamroom=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(mode) = cli.mode {
        config.assistant.mode = mode;
    }

    let rt = Runtime::new()?;

    match cli.command {
        Command::Serve { listen } => {
            if let Some(listen) = listen {
                config.server.listen_addr = listen;
            }
            config.validate()?;
            rt.block_on(server::serve(config))
        }
        Command::Repl => run_repl(&rt, &config),
    }
}

fn run_repl(rt: &Runtime, config: &AppConfig) -> Result<()> {
    let resolver = CommandResolver::from_config(config);
    let mut state = DesignState::new();

    println!("\n=== DREAMROOM ===");
    println!("Describe changes to your room in plain words.");
    println!();
    println!("Commands:");
    println!("  state / s       - Show the full room state");
    println!("  reset           - Start over with an empty room");
    println!("  quit / q        - Exit");
    println!("  <any text>      - Design command ({:?} mode)", resolver.mode());
    println!();

    loop {
        println!("--- {} ---", summarize(&state.to_room_state()));

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "state" || input == "s" {
            println!("{}", serde_json::to_string_pretty(&state)?);
            continue;
        }

        if input == "reset" {
            state = DesignState::new();
            println!("Room cleared.");
            continue;
        }

        let result = rt.block_on(CommandExecutor::execute(&resolver, &mut state, input));
        println!();
        println!("  Action: {}", result.descriptor.action);
        if let Some(item) = &result.descriptor.item {
            println!("  Item: {}", item);
        }
        if let Some(position) = &result.descriptor.position {
            println!(
                "  Position: ({}, {}, {})",
                position.x, position.y, position.z
            );
        }
        println!("  {}", result.descriptor.message);
        if result.descriptor.action.is_mutation() && !result.applied {
            println!("  (nothing to apply)");
        }
        println!();
    }

    println!(
        "\nGoodbye! Final room: {}",
        summarize(&state.to_room_state())
    );
    Ok(())
}
