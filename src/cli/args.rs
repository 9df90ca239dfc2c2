//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Find the floor of a target by walking a random binary search tree
#[derive(Parser, Debug)]
#[command(name = "bst-floor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output on stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// RNG seed for reproducible games
    #[arg(short, long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play interactively (default)
    Play {
        /// Number of random inserts per tree
        #[arg(long)]
        size: Option<usize>,
        /// Smallest value drawn
        #[arg(long, allow_negative_numbers = true)]
        min: Option<i32>,
        /// Largest value drawn
        #[arg(long, allow_negative_numbers = true)]
        max: Option<i32>,
    },

    /// Print the floor of TARGET in the tree built from VALUES
    Floor {
        /// Value to find the floor of
        #[arg(allow_negative_numbers = true)]
        target: i32,
        /// Values inserted in order
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        values: Vec<i32>,
    },

    /// Show the tree built from VALUES
    Tree {
        /// Values inserted in order
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        values: Vec<i32>,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
