//! # Chase Runtime
//!
//! The concurrency engine of the Chase simulation.
//!
//! Every agent runs as its own Tokio task and reports each move to a single
//! [`Controller`](controller::Controller), the monitor that owns the grid,
//! the occupancy map, scoring, lives and the attack window. Agents never
//! talk to each other; they only see the grid through the controller.
//!
//! - **controller** - the monitor, collision and scoring rules, game end
//! - **agent** - spawn parameters, agent records, the walking task
//! - **role** - seeker and hunter policies
//! - **attack_mode** - hunter blinking and reversion
//! - **attack_timer** - the countdown of the attack window
//! - **roster** - building the cast from a map and a config

pub mod agent;
pub mod attack_mode;
pub mod attack_timer;
pub mod cancel;
pub mod config;
pub mod controller;
pub mod prelude;
pub mod role;
pub mod roster;
