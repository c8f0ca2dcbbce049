pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "lagobot",
    about = "Lagobot operator CLI",
    long_about = "Operate the Lagobot sales assistant: simulate conversations, \
                  query the catalog, inspect configuration, and run readiness checks.",
    after_help = "Examples:\n  lagobot chat\n  lagobot search nevera\n  lagobot doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Talk to the assistant interactively from the terminal (type 'salir' to exit)")]
    Chat,
    #[command(about = "Run one catalog search and print the matching products")]
    Search {
        #[arg(required = true, help = "Search text, e.g. 'nevera' or 'tv samsung'")]
        query: Vec<String>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, catalog reachability, and credential readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Chat => commands::chat::run(),
        Command::Search { query } => commands::search::run(&query.join(" ")),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
