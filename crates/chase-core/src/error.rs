//! Error types for Chase setup operations.
//!
//! Only recoverable failures live here (bad maps, bad configuration).
//! Broken invariants inside a running simulation are assertions.

use thiserror::Error;

/// Result type for Chase operations.
pub type Result<T> = std::result::Result<T, ChaseError>;

/// Errors that can occur while setting up a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChaseError {
    #[error("Map is empty")]
    EmptyMap,

    #[error("Map row {row} has width {found}, expected {expected}")]
    RaggedMap {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Map has no '{symbol}' cell to spawn the {role}")]
    MissingSpawn { role: String, symbol: char },

    #[error("Expected two '{entry}' and two '{exit}' portal cells, found {entries} and {exits}")]
    PortalMismatch {
        entry: char,
        exit: char,
        entries: usize,
        exits: usize,
    },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ChaseError {
    fn from(e: std::io::Error) -> Self {
        ChaseError::Io(e.to_string())
    }
}

impl ChaseError {
    pub fn invalid_config(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ChaseError::InvalidConfig {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = ChaseError::invalid_config("seeker_lives", 0, "must be -1 or at least 1");
        assert_eq!(
            e.to_string(),
            "Invalid value for seeker_lives: 0 (must be -1 or at least 1)"
        );

        let e = ChaseError::RaggedMap { row: 2, expected: 5, found: 4 };
        assert_eq!(e.to_string(), "Map row 2 has width 4, expected 5");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "board.txt");
        let e: ChaseError = io.into();
        assert!(matches!(e, ChaseError::Io(msg) if msg.contains("board.txt")));
    }
}
