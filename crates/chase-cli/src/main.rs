//! Chase CLI - run seeker/hunter games from the command line.

mod commands;
mod config;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use commands::presets::Preset;
use commands::run::RunOptions;

#[derive(Parser)]
#[command(name = "chase")]
#[command(author, version, about = "Chase - a concurrent seeker/hunter grid game", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a game with one of the presets
    Run {
        /// Preset number (see `chase presets`)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        preset: u8,

        /// Map file (default: the map of chase.toml, or the built-in board)
        #[arg(short, long)]
        map: Option<PathBuf>,

        /// Print the final statistics as JSON
        #[arg(long)]
        json: bool,

        /// Redraw the board while the game runs
        #[arg(long)]
        show_board: bool,

        /// Stop the game after this many seconds
        #[arg(short, long)]
        time_limit: Option<u64>,
    },

    /// List the available presets
    Presets,

    /// Initialize a new Chase project
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            preset,
            map,
            json,
            show_board,
            time_limit,
        } => {
            let preset = Preset::from_number(preset)
                .ok_or_else(|| anyhow!("Unknown preset: {preset}"))?;
            commands::run::run(RunOptions {
                preset,
                map,
                json,
                show_board,
                time_limit,
            })
            .await
        }
        Commands::Presets => commands::presets::run(),
        Commands::Init { path } => commands::init::run(path),
    }
}
