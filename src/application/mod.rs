//! Application layer: game orchestration
//!
//! Drives sessions from commands and owns the regeneration policy.

pub mod controller;
pub mod error;

pub use controller::{GameController, GameStats, Snapshot, StatusMessage};
pub use error::{ApplicationError, ApplicationResult};
