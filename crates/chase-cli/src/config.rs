//! Configuration management for the Chase CLI.

use anyhow::{Context, Result};
use chase::prelude::GameConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file looked up by every command.
pub const CONFIG_FILE: &str = "chase.toml";

/// Chase project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    /// Map file; the built-in board is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Board refresh period for `--show-board`, in milliseconds.
    #[serde(default = "default_board_refresh_ms")]
    pub board_refresh_ms: u64,
    /// Optional wall-clock limit for a run, in seconds.
    #[serde(default)]
    pub time_limit_secs: Option<u64>,
}

// Default value functions
fn default_board_refresh_ms() -> u64 { 250 }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            board_refresh_ms: default_board_refresh_ms(),
            time_limit_secs: None,
        }
    }
}

impl Config {
    /// Load config from chase.toml in the current or parent directories.
    ///
    /// A relative map path is taken relative to the config file.
    pub fn load() -> Result<Self> {
        let Some(path) = find_config_file() else {
            return Ok(Config::default());
        };
        let mut config = Self::load_from(&path)?;
        if let (Some(map), Some(dir)) = (config.map.path.as_mut(), path.parent()) {
            if map.is_relative() {
                *map = dir.join(&*map);
            }
        }
        Ok(config)
    }

    /// Load config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Find chase.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [game]
            seeker_lives = 5
            hunter_slowdown = 2

            [display]
            time_limit_secs = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.game.seeker_lives, 5);
        assert_eq!(config.game.hunter_slowdown, 2);
        assert_eq!(config.game.hunters.len(), 4);
        assert_eq!(config.display.board_refresh_ms, 250);
        assert_eq!(config.display.time_limit_secs, Some(60));
        assert!(config.map.path.is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = Config::default();
        config.game.endless = true;
        config.map.path = Some(PathBuf::from("boards/small.txt"));
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.game.endless);
        assert_eq!(loaded.map.path, Some(PathBuf::from("boards/small.txt")));
        assert_eq!(loaded.game, config.game);
    }

    #[test]
    fn broken_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[game\nseeker_lives = ").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("chase.toml"));
    }
}
