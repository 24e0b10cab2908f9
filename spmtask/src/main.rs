mod commands;
mod formatting;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "spmtask")]
#[command(about = "Detects build, run and test tasks for Swift packages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root containing Package.swift
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, action)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect tasks once and print them
    Discover {
        #[arg(long, action)]
        json: bool,
        /// Describe timeout in milliseconds (0 disables it)
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Turn a task definition back into a runnable task
    Resolve {
        task: String,
        #[arg(long)]
        target: Option<String>,
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Re-detect tasks whenever Package.swift changes
    Watch {
        #[arg(long)]
        timeout_ms: Option<u64>,
        #[arg(long, default_value = "300")]
        debounce_ms: u64,
        /// Also launch the language server
        #[arg(long, action)]
        server: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Discover { json, timeout_ms } => {
            commands::cmd_discover(cli.root, json, timeout_ms).await?
        }
        Commands::Resolve { task, target, args } => commands::cmd_resolve(task, target, args)?,
        Commands::Watch {
            timeout_ms,
            debounce_ms,
            server,
        } => commands::cmd_watch(cli.root, timeout_ms, debounce_ms, server).await?,
    }

    Ok(())
}
