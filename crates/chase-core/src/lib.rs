//! # Chase Core
//!
//! Core types for the Chase simulation, shared by the runtime and the CLI:
//!
//! - **Position / Direction**: integer grid coordinates and the four moves
//! - **AgentId / Role**: agent identity and its fixed role (seeker or hunter)
//! - **Legend**: the fixed table of reserved symbols
//! - **GridService**: the authoritative character grid the controller drives
//! - **ChaseError**: recoverable setup errors (map, config)
//!
//! ## Quick Start
//!
//! ```rust
//! use chase_core::prelude::*;
//!
//! let grid = CharGrid::parse("#####\n#X.$#\n#####", Legend::default()).unwrap();
//! assert!(grid.is_road(Position::new(1, 2)));
//! assert_eq!(grid.positions_of('.'), vec![Position::new(1, 2)]);
//! ```

pub mod types;
pub mod legend;
pub mod grid;
pub mod error;
pub mod prelude;

pub use error::{ChaseError, Result};
