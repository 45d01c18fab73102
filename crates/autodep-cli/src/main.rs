//! autodep CLI
//!
//! Inspect, install, and acquire npm dependencies from the command line.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::Context;
use error::{CliError, Result};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    autodep_core::logging::init(level).map_err(|e| CliError::user(e.to_string()))?;
    tracing::debug!("Verbose mode enabled");

    let Some(cmd) = cli.command.clone() else {
        // No command provided - show help hint
        println!("{} lazy npm dependency installer", "autodep".green().bold());
        println!();
        println!("Run {} for available commands.", "autodep --help".cyan());
        return Ok(());
    };

    let ctx = Context::from_cli(&cli)?;
    execute_command(&ctx, cmd).await
}

async fn execute_command(ctx: &Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Info { name } => commands::run_info(ctx, &name).await,
        Commands::Status { name } => commands::run_status(ctx, &name).await,
        Commands::Install { name, options } => commands::run_install(ctx, &name, &options).await,
        Commands::Expire { name, ttl } => commands::run_expire(ctx, &name, ttl).await,
        Commands::Acquire { name, ttl, options } => {
            commands::run_acquire(ctx, &name, ttl, &options).await
        }
    }
}
