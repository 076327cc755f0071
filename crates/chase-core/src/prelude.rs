//! Chase Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use chase_core::prelude::*;
//! ```

pub use crate::types::{AgentId, Direction, Position, Role};

pub use crate::legend::Legend;

pub use crate::grid::{CharGrid, GridService};

pub use crate::error::{ChaseError, Result};
