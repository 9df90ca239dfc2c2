//! Interactive play loop over any line-oriented input.

use std::io::{BufRead, Write};

use colored::Colorize;
use rand::Rng;
use tracing::debug;

use crate::application::{GameController, GameStats};
use crate::cli::error::{CliError, CliResult};
use crate::cli::render::render_snapshot;
use crate::domain::Command;

const HELP: &str = "\
Commands:
  l, less     target is greater than the current node: move right
  g, greater  target is less than or equal to the current node: move left
  r, reset    no floor exists for the target: start over
  ?, help     show this help
  q, quit     leave the game";

fn emit<W: Write>(out: &mut W, text: &str) -> CliResult<()> {
    write!(out, "{}", text).map_err(|e| CliError::io("write output", e))
}

fn prompt<W: Write>(out: &mut W) -> CliResult<()> {
    emit(out, &format!("{} ", ">".cyan()))?;
    out.flush().map_err(|e| CliError::io("flush output", e))
}

/// Runs commands read from `input` until it ends or the player quits.
///
/// Returns the tally of games touched during the loop.
pub fn play<R, I, W>(controller: &mut GameController<R>, input: I, out: &mut W) -> CliResult<GameStats>
where
    R: Rng,
    I: BufRead,
    W: Write,
{
    emit(out, &format!("{}\n{}\n\n", "Find the floor in the BST".cyan().bold(), HELP))?;
    emit(out, &render_snapshot(&controller.snapshot()))?;
    prompt(out)?;

    for line in input.lines() {
        let line = line.map_err(|e| CliError::io("read command", e))?;
        let entry = line.trim();
        match entry {
            "" => {
                prompt(out)?;
                continue;
            }
            "q" | "quit" | "exit" => break,
            "?" | "h" | "help" => {
                emit(out, &format!("{}\n", HELP))?;
                prompt(out)?;
                continue;
            }
            _ => {}
        }

        match entry.parse::<Command>() {
            Ok(command) => {
                let outcome = controller.handle(command)?;
                debug!(%command, ?outcome, "handled");
                emit(out, &render_snapshot(&controller.snapshot()))?;
            }
            Err(e) => emit(out, &format!("{}: {}\n", "error".red().bold(), e))?,
        }
        prompt(out)?;
    }

    let stats = controller.stats();
    emit(
        out,
        &format!(
            "\nGames: {}, won: {}, lost: {}\n",
            stats.games, stats.wins, stats.losses
        ),
    )?;
    Ok(stats)
}
