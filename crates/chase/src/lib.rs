//! # Chase
//!
//! A concurrent chase on a character grid. Seekers collect points, hunters
//! chase them, and every agent runs as its own task. A single controller,
//! a monitor, serializes their moves and enforces collisions, scoring,
//! lives, respawns and the attack window opened by a bonus.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chase::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> chase::core::Result<()> {
//!     let map = "\
//! #########
//! #X...$..#
//! #.##%##.#
//! #...R...#
//! #########";
//!     let config = GameConfig {
//!         hunters: vec![HunterConfig::new("blinky", 'R', 100)],
//!         ..Default::default()
//!     };
//!
//!     let grid = CharGrid::parse(map, Legend::default())?;
//!     let controller = new_game(grid, config).await?;
//!     controller.start().await;
//!
//!     let won = controller.waiting_for_game_to_end().await;
//!     println!("{}", if won { "seeker wins" } else { "hunters win" });
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`chase_core`] - grid, legend, positions, error types
//! - [`chase_runtime`] - controller, agent tasks, attack mode and timer
//!
//! ## Rules
//!
//! | Meeting | Outcome |
//! |---------|---------|
//! | seeker and hunter, no attack | seeker dies, loses a life |
//! | seeker and hunter under attack | hunter dies, respawns at its spawn |
//! | seeker with unlimited lives | hunter always dies |
//! | two agents of the same side | nothing happens |

// Re-export the subcrates
pub use chase_core as core;
pub use chase_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use chase::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use chase_core::types::{AgentId, Direction, Position, Role};
    pub use chase_core::legend::Legend;
    pub use chase_core::grid::{CharGrid, GridService};
    pub use chase_core::error::{ChaseError, Result};

    // Runtime
    pub use chase_runtime::controller::{Controller, GameStats};
    pub use chase_runtime::agent::{AgentSnapshot, AgentSpec};
    pub use chase_runtime::attack_timer::AttackTimer;
    pub use chase_runtime::config::{GameConfig, HunterConfig, Lives, SpeedRange, UNLIMITED_LIVES};
    pub use chase_runtime::roster::new_game;
}
