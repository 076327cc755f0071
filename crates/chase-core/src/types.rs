//! Shared types used across all Chase crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an agent.
///
/// A respawned agent is a new agent and gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Deterministic id, for tests and fixtures.
    pub fn from_seed(seed: u64) -> Self {
        Self(Uuid::from_u128(seed as u128))
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.simple().to_string();
        write!(f, "{}", &s[s.len() - 8..])
    }
}

/// A cell on the grid, addressed by row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell in the given direction. May be off the grid.
    pub fn step(&self, direction: Direction) -> Position {
        let (dr, dc) = direction.delta();
        Position::new(self.row + dr, self.col + dc)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four grid-relative moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Row and column delta of this move.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// The role of an agent. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Collects points, has a lives budget.
    Seeker,
    /// One of the named hunters.
    Hunter,
    /// An extra hunter added on top of the named ones.
    GenericHunter,
}

impl Role {
    pub fn is_hunter(&self) -> bool {
        matches!(self, Role::Hunter | Role::GenericHunter)
    }

    /// Whether two agents of these roles can kill each other when they meet.
    pub fn opposes(&self, other: &Role) -> bool {
        self.is_hunter() != other.is_hunter()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Seeker => write!(f, "seeker"),
            Role::Hunter => write!(f, "hunter"),
            Role::GenericHunter => write!(f, "generic hunter"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_one_cell() {
        let p = Position::new(3, 3);
        assert_eq!(p.step(Direction::Up), Position::new(2, 3));
        assert_eq!(p.step(Direction::Down), Position::new(4, 3));
        assert_eq!(p.step(Direction::Left), Position::new(3, 2));
        assert_eq!(p.step(Direction::Right), Position::new(3, 4));
    }

    #[test]
    fn step_can_leave_the_grid() {
        assert_eq!(Position::new(0, 0).step(Direction::Up), Position::new(-1, 0));
    }

    #[test]
    fn roles_oppose_across_sides_only() {
        assert!(Role::Seeker.opposes(&Role::Hunter));
        assert!(Role::GenericHunter.opposes(&Role::Seeker));
        assert!(!Role::Hunter.opposes(&Role::GenericHunter));
        assert!(!Role::Seeker.opposes(&Role::Seeker));
    }

    #[test]
    fn seeded_ids_are_stable() {
        assert_eq!(AgentId::from_seed(7), AgentId::from_seed(7));
        assert_ne!(AgentId::from_seed(7), AgentId::from_seed(8));
        assert_ne!(AgentId::new(), AgentId::new());
    }
}
