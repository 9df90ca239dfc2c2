//! Game controller
//!
//! Feeds commands into the live session, starts a new game whenever one
//! ends, and exposes an immutable snapshot for rendering.

use std::fmt;

use generational_arena::Index;
use rand::Rng;
use tracing::{debug, info, instrument};

use crate::application::ApplicationResult;
use crate::domain::{
    generate_session, BstTree, Command, Direction, GameParams, GameSession, GameState, Outcome,
};

/// Player-facing status line produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Moved { direction: Direction, value: i32 },
    Incorrect,
    FloorFound { floor: i32 },
    FellOffTree,
    NoFloorFellOff,
    AwaitingReset,
    ResetIgnored,
    NoFloorReset,
    NewTarget { target: i32 },
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Moved { direction, value } => {
                write!(f, "Moved {} to {}", direction, value)
            }
            StatusMessage::Incorrect => write!(f, "Incorrect! Game reset."),
            StatusMessage::FloorFound { floor } => {
                write!(f, "Congratulations! You found the floor value: {}", floor)
            }
            StatusMessage::FellOffTree => {
                write!(f, "Reached a leaf without finding the floor. Game reset.")
            }
            StatusMessage::NoFloorFellOff => {
                write!(f, "Fell off the tree: no value is <= the target. Hit reset.")
            }
            StatusMessage::AwaitingReset => write!(f, "No node to move from. Hit reset."),
            StatusMessage::ResetIgnored => write!(f, "Floor value exists. Continue playing."),
            StatusMessage::NoFloorReset => write!(f, "Floor value is none. Resetting game."),
            StatusMessage::NewTarget { target } => {
                write!(f, "New target: {}. Navigate the tree again.", target)
            }
        }
    }
}

/// Running tally across generated games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStats {
    /// Sessions started, including the live one
    pub games: u64,
    pub wins: u64,
    pub losses: u64,
}

/// Read-only view of the live game.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub tree: &'a BstTree,
    pub current: Option<Index>,
    pub target: i32,
    pub floor: Option<i32>,
    pub state: GameState,
    pub messages: &'a [StatusMessage],
    pub stats: GameStats,
}

pub struct GameController<R: Rng> {
    params: GameParams,
    rng: R,
    session: GameSession,
    messages: Vec<StatusMessage>,
    stats: GameStats,
}

impl<R: Rng> GameController<R> {
    /// Create a controller with a freshly generated session.
    pub fn new(params: GameParams, mut rng: R) -> ApplicationResult<Self> {
        let generated = generate_session(&params, &mut rng)?;
        Self::from_session(params, rng, generated.session)
    }

    /// Create a controller around a caller-built session.
    ///
    /// Later games are still generated from `params` and `rng`.
    pub fn from_session(params: GameParams, rng: R, session: GameSession) -> ApplicationResult<Self> {
        params.validate()?;
        let target = session.target();
        Ok(Self {
            params,
            rng,
            session,
            messages: vec![StatusMessage::NewTarget { target }],
            stats: GameStats {
                games: 1,
                ..GameStats::default()
            },
        })
    }

    pub fn params(&self) -> &GameParams {
        &self.params
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn stats(&self) -> GameStats {
        self.stats
    }

    /// Status lines produced by the most recent command.
    pub fn messages(&self) -> &[StatusMessage] {
        &self.messages
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            tree: self.session.tree(),
            current: self.session.current(),
            target: self.session.target(),
            floor: self.session.floor(),
            state: self.session.state(),
            messages: &self.messages,
            stats: self.stats,
        }
    }

    /// Apply `command` to the live session.
    ///
    /// A session that ends (won, lost, fell off with a floor, or reset
    /// without a floor) is replaced before this returns, so the snapshot
    /// always shows a playable game.
    #[instrument(level = "debug", skip(self))]
    pub fn handle(&mut self, command: Command) -> ApplicationResult<Outcome> {
        self.messages.clear();
        let outcome = self.session.apply(command);
        debug!(?outcome, state = %self.session.state(), "command applied");

        match outcome {
            Outcome::Moved {
                direction, value, ..
            } => self.messages.push(StatusMessage::Moved { direction, value }),
            Outcome::Won { floor, .. } => {
                self.stats.wins += 1;
                self.messages.push(StatusMessage::FloorFound { floor });
            }
            Outcome::Lost => {
                self.stats.losses += 1;
                self.messages.push(StatusMessage::Incorrect);
            }
            Outcome::FellOff { .. } if self.session.is_terminal() => {
                self.stats.losses += 1;
                self.messages.push(StatusMessage::FellOffTree);
            }
            Outcome::FellOff { .. } => self.messages.push(StatusMessage::NoFloorFellOff),
            Outcome::AwaitingReset => self.messages.push(StatusMessage::AwaitingReset),
            Outcome::ResetIgnored => self.messages.push(StatusMessage::ResetIgnored),
            Outcome::RegenerationRequested => self.messages.push(StatusMessage::NoFloorReset),
            Outcome::Finished => {}
        }

        if self.session.is_terminal() || outcome == Outcome::RegenerationRequested {
            self.regenerate()?;
        }
        Ok(outcome)
    }

    fn regenerate(&mut self) -> ApplicationResult<()> {
        let generated = generate_session(&self.params, &mut self.rng)?;
        let target = generated.session.target();
        self.session = generated.session;
        self.stats.games += 1;
        info!(
            game = self.stats.games,
            attempts = generated.attempts,
            target,
            "new game"
        );
        self.messages.push(StatusMessage::NewTarget { target });
        Ok(())
    }
}
