//! Game configuration.
//!
//! All tunables the simulation needs at startup. Defaults reproduce the
//! classic game: three lives, four named hunters, a 5000-unit attack window
//! counted in 1 ms units.

use chase_core::error::{ChaseError, Result};
use chase_core::legend::Legend;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sentinel for `seeker_lives` meaning unlimited lives (and invulnerability).
pub const UNLIMITED_LIVES: i32 = -1;

/// A named hunter of the classic cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HunterConfig {
    pub name: String,
    pub symbol: char,
    /// Pacing interval between moves, in milliseconds.
    pub speed_ms: u64,
}

impl HunterConfig {
    pub fn new(name: &str, symbol: char, speed_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            symbol,
            speed_ms,
        }
    }
}

/// Inclusive range of pacing intervals, sampled per extra agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl SpeedRange {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        rng.gen_range(self.min_ms..=self.max_ms)
    }
}

/// Remaining seeker lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Lives {
    Limited(u32),
    Unlimited,
}

impl Lives {
    pub fn from_config(lives: i32) -> Self {
        if lives == UNLIMITED_LIVES {
            Lives::Unlimited
        } else {
            Lives::Limited(lives.max(0) as u32)
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Lives::Unlimited)
    }

    /// Whether at least one life is left.
    pub fn any_left(&self) -> bool {
        match self {
            Lives::Limited(n) => *n > 0,
            Lives::Unlimited => true,
        }
    }

    /// Take one life away. Unlimited lives are unaffected.
    pub fn lose_one(&mut self) {
        if let Lives::Limited(n) = self {
            *n = n.saturating_sub(1);
        }
    }
}

/// Configuration for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seeker lives; `-1` means unlimited (default: 3).
    pub seeker_lives: i32,
    /// Attack window length in metronome units (default: 5000).
    pub attack_duration: u64,
    /// Length of one metronome unit in milliseconds (default: 1).
    pub attack_unit_ms: u64,
    /// When set, collecting every point does not end the game and seekers
    /// never lose lives (default: false).
    pub endless: bool,
    /// Generic hunters added at random point cells (default: 0).
    pub extra_hunters: usize,
    /// Seekers added at the seeker spawn cell (default: 0).
    pub extra_seekers: usize,
    /// Pacing of the main seeker (default: 125).
    pub seeker_speed_ms: u64,
    /// The named hunters (default: inky, pinky, clyde, blinky).
    pub hunters: Vec<HunterConfig>,
    pub generic_hunter_speed: SpeedRange,
    pub extra_seeker_speed: SpeedRange,
    /// Pacing multiplier applied to hunters under attack (default: 3).
    pub hunter_slowdown: u32,
    /// Blink toggle period of hunters under attack (default: 500).
    pub blink_period_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seeker_lives: 3,
            attack_duration: 5000,
            attack_unit_ms: 1,
            endless: false,
            extra_hunters: 0,
            extra_seekers: 0,
            seeker_speed_ms: 125,
            hunters: vec![
                HunterConfig::new("inky", 'C', 125),
                HunterConfig::new("pinky", 'P', 175),
                HunterConfig::new("clyde", 'O', 250),
                HunterConfig::new("blinky", 'R', 100),
            ],
            generic_hunter_speed: SpeedRange::new(125, 500),
            extra_seeker_speed: SpeedRange::new(80, 90),
            hunter_slowdown: 3,
            blink_period_ms: 500,
        }
    }
}

impl GameConfig {
    pub fn lives(&self) -> Lives {
        Lives::from_config(self.seeker_lives)
    }

    pub fn attack_unit(&self) -> Duration {
        Duration::from_millis(self.attack_unit_ms)
    }

    /// Check every field, and that hunter symbols are known to the legend.
    pub fn validate(&self, legend: &Legend) -> Result<()> {
        if self.seeker_lives != UNLIMITED_LIVES && self.seeker_lives < 1 {
            return Err(ChaseError::invalid_config(
                "seeker_lives",
                self.seeker_lives,
                "must be -1 (unlimited) or at least 1",
            ));
        }
        if self.attack_duration == 0 {
            return Err(ChaseError::invalid_config("attack_duration", 0, "must be positive"));
        }
        if self.attack_unit_ms == 0 {
            return Err(ChaseError::invalid_config("attack_unit_ms", 0, "must be positive"));
        }
        if self.seeker_speed_ms == 0 {
            return Err(ChaseError::invalid_config("seeker_speed_ms", 0, "must be positive"));
        }
        if self.hunter_slowdown == 0 {
            return Err(ChaseError::invalid_config("hunter_slowdown", 0, "must be positive"));
        }
        if self.blink_period_ms == 0 {
            return Err(ChaseError::invalid_config("blink_period_ms", 0, "must be positive"));
        }
        for (field, range) in [
            ("generic_hunter_speed", self.generic_hunter_speed),
            ("extra_seeker_speed", self.extra_seeker_speed),
        ] {
            if range.min_ms == 0 || range.min_ms > range.max_ms {
                return Err(ChaseError::invalid_config(
                    field,
                    format!("{}..={}", range.min_ms, range.max_ms),
                    "must be a non-empty range of positive values",
                ));
            }
        }
        for hunter in &self.hunters {
            if hunter.speed_ms == 0 {
                return Err(ChaseError::invalid_config(
                    format!("hunters.{}.speed_ms", hunter.name),
                    0,
                    "must be positive",
                ));
            }
            if !legend.hunters.contains(&hunter.symbol) {
                return Err(ChaseError::invalid_config(
                    format!("hunters.{}.symbol", hunter.name),
                    hunter.symbol,
                    "not a hunter symbol of the legend",
                ));
            }
        }
        Ok(())
    }
}
