//! Run a game to completion.

use anyhow::{Context, Result};
use chase::prelude::*;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::commands::presets::Preset;
use crate::config::Config;

/// Board used when neither `--map` nor the config names a map file.
pub const BUILTIN_BOARD: &str = include_str!("../../assets/board.txt");

/// Options of `chase run`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub preset: Preset,
    pub map: Option<PathBuf>,
    pub json: bool,
    pub show_board: bool,
    pub time_limit: Option<u64>,
}

/// How the run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Finished { won: bool },
    Interrupted,
    TimeUp,
}

pub async fn run(options: RunOptions) -> Result<()> {
    let mut config = Config::load()?;
    options.preset.apply(&mut config.game);

    let map_path = options.map.clone().or_else(|| config.map.path.clone());
    let grid = load_grid(map_path.as_deref())?;

    if !options.json {
        println!(
            "{} Starting {} game on {}...",
            "→".blue(),
            options.preset.name().cyan(),
            map_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "the built-in board".to_string())
        );
    }

    let controller = new_game(grid, config.game.clone())
        .await
        .context("Failed to set up the game")?;
    if !options.json {
        println!(
            "  {} {} agents, {} points to collect",
            "✓".green(),
            controller.agents().await.len().to_string().cyan(),
            controller.total_points().await.to_string().cyan()
        );
    }

    let board = options.show_board.then(|| {
        let controller = controller.clone();
        let period = Duration::from_millis(config.display.board_refresh_ms.max(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                // Clear screen and move home.
                println!("\x1b[2J\x1b[H{}", controller.render().await);
            }
        })
    });

    controller.start().await;

    let time_limit = options.time_limit.or(config.display.time_limit_secs);
    let outcome = tokio::select! {
        won = controller.waiting_for_game_to_end() => Outcome::Finished { won },
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!("Failed to listen for Ctrl-C: {}", e);
            }
            Outcome::Interrupted
        }
        _ = deadline(time_limit) => Outcome::TimeUp,
    };
    debug!(?outcome, "Run finished");

    if !matches!(outcome, Outcome::Finished { .. }) {
        controller.stop().await;
    }
    controller.join_agents().await;
    if let Some(board) = board {
        board.abort();
        println!("{}", controller.render().await);
    }

    let stats = controller.stats().await;
    if options.json {
        let json = serde_json::to_string_pretty(&stats).context("Failed to serialize stats")?;
        println!("{json}");
    } else {
        print_outcome(outcome, &stats);
    }

    Ok(())
}

/// Read the map file, or fall back to the built-in board.
pub fn load_grid(path: Option<&Path>) -> Result<CharGrid> {
    match path {
        Some(path) => CharGrid::load(path, Legend::default())
            .with_context(|| format!("Failed to load map: {}", path.display())),
        None => CharGrid::parse(BUILTIN_BOARD, Legend::default())
            .context("Failed to parse the built-in board"),
    }
}

async fn deadline(limit: Option<u64>) {
    match limit {
        Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
        None => std::future::pending().await,
    }
}

fn print_outcome(outcome: Outcome, stats: &GameStats) {
    println!();
    match outcome {
        Outcome::Finished { won: true } => {
            println!("{} The seekers win!", "✓".green().bold())
        }
        Outcome::Finished { won: false } => {
            println!("{} The hunters win.", "✗".red().bold())
        }
        Outcome::Interrupted => println!("{} Game interrupted.", "•".yellow()),
        Outcome::TimeUp => println!("{} Time is up.", "•".yellow()),
    }
    println!(
        "  Points: {}/{}",
        stats.points.to_string().green(),
        stats.total_points.to_string().cyan()
    );
    let lives = match stats.lives {
        Lives::Limited(n) => n.to_string(),
        Lives::Unlimited => "unlimited".to_string(),
    };
    println!("  Lives left: {}", lives.yellow());
    println!(
        "  Hunters caught: {}  Seekers caught: {}  Respawns: {}",
        stats.hunters_killed.to_string().cyan(),
        stats.seekers_killed.to_string().cyan(),
        stats.respawns.to_string().cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chase::runtime::controller::Portals;

    #[test]
    fn builtin_board_parses() {
        let grid = load_grid(None).unwrap();
        let legend = Legend::default();
        assert_eq!(grid.positions_of(legend.seeker).len(), 1);
        for hunter in &legend.hunters {
            assert_eq!(grid.positions_of(*hunter).len(), 1);
        }
        assert!(!grid.positions_of(legend.bonus).is_empty());
        assert!(Portals::locate(&grid, &legend).unwrap().is_some());
    }

    #[tokio::test]
    async fn every_preset_builds_on_the_builtin_board() {
        for preset in Preset::ALL {
            let mut config = GameConfig::default();
            preset.apply(&mut config);
            let grid = load_grid(None).unwrap();
            let controller = new_game(grid, config.clone()).await.unwrap();
            let agents = controller.agents().await;
            assert_eq!(
                agents.len(),
                1 + config.hunters.len() + config.extra_hunters + config.extra_seekers,
                "{}",
                preset.name()
            );
        }
    }

    #[test]
    fn missing_map_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        let err = load_grid(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("nope.txt"));
    }

    #[test]
    fn map_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.txt");
        std::fs::write(&path, "#####\n#X.$#\n#####\n").unwrap();
        let grid = load_grid(Some(&path)).unwrap();
        assert_eq!(grid.positions_of('.').len(), 1);
    }
}
