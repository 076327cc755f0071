//! Chase Runtime Prelude: convenient imports for common usage.
//!
//! ```rust
//! use chase_runtime::prelude::*;
//! ```

// Re-export the controller
pub use crate::controller::{Controller, GameStats, Portals};

// Re-export agents and roles
pub use crate::agent::{AgentRecord, AgentSnapshot, AgentSpec, AgentTask, PathCache};
pub use crate::role::{policy_for, HunterPolicy, RolePolicy, SeekerPolicy};
pub use crate::attack_mode::AttackPhase;

// Re-export timing
pub use crate::attack_timer::{AttackTimer, AttackWindow, Metronome};
pub use crate::cancel::{CancelSignal, Cancelled};

// Re-export configuration
pub use crate::config::{GameConfig, HunterConfig, Lives, SpeedRange, UNLIMITED_LIVES};
pub use crate::roster::new_game;
