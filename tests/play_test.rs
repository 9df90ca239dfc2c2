//! Tests for the interactive play loop and CLI error mapping

use std::io::Cursor;

use rand::rngs::StdRng;
use rand::SeedableRng;

use bst_floor::application::{ApplicationError, GameController};
use bst_floor::cli::commands::make_rng;
use bst_floor::cli::play::play;
use bst_floor::cli::CliError;
use bst_floor::domain::{BstTree, DomainError, GameParams, GameSession};
use bst_floor::exitcode;

fn controller_with(values: &[i32], target: i32) -> GameController<StdRng> {
    let session = GameSession::new(BstTree::from_values(values.iter().copied()), target).unwrap();
    GameController::from_session(GameParams::default(), StdRng::seed_from_u64(5), session).unwrap()
}

fn run(controller: &mut GameController<StdRng>, script: &str) -> (String, bst_floor::application::GameStats) {
    colored::control::set_override(false);
    let mut out = Vec::new();
    let stats = play(controller, Cursor::new(script.to_string()), &mut out).unwrap();
    (String::from_utf8(out).unwrap(), stats)
}

#[test]
fn given_winning_script_when_playing_then_reports_floor_and_new_target() {
    let mut controller = controller_with(&[50, 30, 70], 40);

    let (output, stats) = run(&mut controller, "g\nq\n");

    assert!(output.contains("Target: 40"));
    assert!(output.contains("[50]"));
    assert!(output.contains("Congratulations! You found the floor value: 30"));
    assert!(output.contains("New target:"));
    assert_eq!(stats.wins, 1);
    assert_eq!(stats.games, 2);
}

#[test]
fn given_unknown_and_blank_lines_when_playing_then_reports_error_and_continues() {
    let mut controller = controller_with(&[50, 20, 60, 10, 35, 30, 40], 33);

    let (output, stats) = run(&mut controller, "\nsideways\nhelp\ngreater\n");

    assert!(output.contains("unknown command: \"sideways\""));
    assert!(output.contains("Moved left to 20"));
    assert!(output.contains("[20]"));
    assert_eq!(stats.games, 1);
    assert_eq!(controller.session().moves(), 1);
}

#[test]
fn given_floorless_target_when_falling_off_then_shows_off_tree_until_reset() {
    let mut controller = controller_with(&[50], 10);

    let (output, stats) = run(&mut controller, "greater\nless\nreset\n");

    assert!(output.contains("Fell off the tree"));
    assert!(output.contains("You are off the tree."));
    assert!(output.contains("No node to move from. Hit reset."));
    assert!(output.contains("Floor value is none. Resetting game."));
    assert_eq!(stats.games, 2);
    assert_eq!(stats.losses, 0);
}

#[test]
fn given_quit_when_playing_then_ignores_remaining_input() {
    let mut controller = controller_with(&[50, 30, 70], 40);

    let (_, stats) = run(&mut controller, "quit\nl\n");

    assert_eq!(stats.games, 1);
    assert_eq!(stats.losses, 0);
}

#[test]
fn given_same_seed_when_making_rng_then_games_match() {
    let a = GameController::new(GameParams::default(), make_rng(Some(8))).unwrap();
    let b = GameController::new(GameParams::default(), make_rng(Some(8))).unwrap();
    assert_eq!(a.session().tree().values(), b.session().tree().values());
    assert_eq!(a.session().target(), b.session().target());
}

#[test]
fn given_cli_errors_when_mapping_exit_codes_then_follow_sysexits() {
    let config = CliError::from(ApplicationError::Config {
        message: "bad".into(),
    });
    let params = CliError::from(ApplicationError::from(DomainError::InvalidParams("bad".into())));
    let io = CliError::io("read", std::io::Error::other("boom"));
    let args = CliError::InvalidArgs("x".into());

    assert_eq!(config.exit_code(), exitcode::CONFIG);
    assert_eq!(params.exit_code(), exitcode::CONFIG);
    assert_eq!(io.exit_code(), exitcode::IOERR);
    assert_eq!(args.exit_code(), exitcode::USAGE);
}
