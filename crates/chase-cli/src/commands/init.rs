//! Initialize a Chase project directory.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::commands::run::BUILTIN_BOARD;
use crate::config::{Config, CONFIG_FILE};

/// Map file written next to the config.
const BOARD_FILE: &str = "board.txt";

pub fn run(path: Option<String>) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to resolve the current directory")?,
    };

    println!("{} Initializing Chase project...", "→".blue());
    init_at(&base_path)?;

    println!();
    println!("{} Chase project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} edit {} to tune the game", "1.".blue(), CONFIG_FILE);
    println!("  {} chase presets", "2.".blue());
    println!("  {} chase run 1 --show-board", "3.".blue());

    Ok(())
}

/// Write the config and a copy of the built-in board, keeping existing files.
pub fn init_at(base_path: &Path) -> Result<()> {
    std::fs::create_dir_all(base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let board_path = base_path.join(BOARD_FILE);
    if !board_path.exists() {
        std::fs::write(&board_path, BUILTIN_BOARD)
            .with_context(|| format!("Failed to write {}", board_path.display()))?;
        println!("  {} Created {}", "✓".green(), board_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), board_path.display());
    }

    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        let mut config = Config::default();
        config.map.path = Some(PathBuf::from(BOARD_FILE));
        config.save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_config_and_board() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("game");
        init_at(&base).unwrap();

        let config = Config::load_from(&base.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.map.path, Some(PathBuf::from(BOARD_FILE)));
        assert_eq!(config.game, chase::prelude::GameConfig::default());
        let board = std::fs::read_to_string(base.join(BOARD_FILE)).unwrap();
        assert_eq!(board, BUILTIN_BOARD);
    }

    #[test]
    fn keeps_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE);
        std::fs::write(&config_path, "[game]\nseeker_lives = 9\n").unwrap();
        init_at(dir.path()).unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.game.seeker_lives, 9);
        assert!(config.map.path.is_none());
    }
}
