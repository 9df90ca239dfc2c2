//! Domain layer: tree, game rules, and session generation
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod generator;
pub mod session;
pub mod tree;

pub use error::{DomainError, DomainResult};
pub use generator::{generate_session, GameParams, Generated};
pub use session::{Command, GameSession, GameState, Outcome};
pub use tree::{BstNode, BstTree, Direction};
