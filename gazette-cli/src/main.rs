mod commands;
mod config;

use clap::{Parser, Subcommand};
use gazette_core::GazetteError;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gazette")]
#[command(about = "Gazette Games - daily newsroom puzzles in the terminal")]
#[command(version)]
struct Cli {
    /// Data directory for progress storage
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play today's rounds of a game
    Play(commands::PlayArgs),

    /// Show daily progress across the games
    Status,

    /// Content pool inspection commands
    #[command(subcommand)]
    Pool(commands::PoolCommands),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "gazette={}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get data directory
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config::CliConfig::default().data_dir);

    // Ensure data directory exists
    std::fs::create_dir_all(&data_dir)?;

    // Execute command
    let result = match cli.command {
        Commands::Play(args) => commands::handle_play_command(args, &data_dir),
        Commands::Status => commands::handle_status_command(&data_dir),
        Commands::Pool(cmd) => commands::handle_pool_command(cmd),
    };

    if let Err(e) = result {
        match e {
            GazetteError::Content(msg) => {
                eprintln!("Error: {}", msg);
                eprintln!("Use 'gazette pool check <file>' to inspect the pool");
            }
            GazetteError::InvalidDateKey(key) => {
                eprintln!("Error: invalid date: {}", key);
                eprintln!("Dates take the form YYYY-MM-DD");
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
