//! Find-the-floor game on a random binary search tree.
//!
//! A tree is built from random inserts and a random target is drawn. The
//! player starts at the root and answers "less than" / "greater than" for
//! each node until landing on the floor of the target: the largest stored
//! value not above it.
//!
//! - [`domain`]: the tree, the game state machine, session generation
//! - [`application`]: the controller that regenerates finished games
//! - [`config`]: layered settings
//! - [`cli`]: argument parsing, the interactive loop, terminal rendering

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
