//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors cover session construction and command parsing.
/// Game moves themselves never fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cannot start a game on an empty tree")]
    EmptyTree,

    #[error("root value {root} is already the floor of the target")]
    TrivialStart { root: i32 },

    #[error("unknown command: {0:?} (expected less, greater or reset)")]
    UnknownCommand(String),

    #[error("invalid game parameters: {0}")]
    InvalidParams(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
