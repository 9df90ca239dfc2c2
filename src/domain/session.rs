//! Game session: one tree, one target, and the player's walk from the root.

use std::fmt;
use std::str::FromStr;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::{BstTree, Direction};

/// Player input. The vocabulary is closed: every value maps to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Claims `target > current`; a valid claim moves right.
    LessThan,
    /// Claims `target <= current`; a valid claim moves left.
    GreaterThan,
    /// Ends a game whose target has no floor; ignored otherwise.
    Reset,
}

impl Command {
    pub const ALL: [Command; 3] = [Command::LessThan, Command::GreaterThan, Command::Reset];

    /// Side a valid move descends to; `None` for `Reset`.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Command::LessThan => Some(Direction::Right),
            Command::GreaterThan => Some(Direction::Left),
            Command::Reset => None,
        }
    }

    /// Whether the claim is true for `target` at a node holding `node_value`.
    /// `Reset` makes no claim and always holds.
    pub fn claim_holds(self, target: i32, node_value: i32) -> bool {
        match self {
            Command::LessThan => target > node_value,
            Command::GreaterThan => target <= node_value,
            Command::Reset => true,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::LessThan => write!(f, "Less than"),
            Command::GreaterThan => write!(f, "Greater than"),
            Command::Reset => write!(f, "Reset"),
        }
    }
}

impl FromStr for Command {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "<" | "less" | "less than" | "lt" => Ok(Command::LessThan),
            "g" | ">" | "greater" | "greater than" | "gt" => Ok(Command::GreaterThan),
            "r" | "reset" => Ok(Command::Reset),
            _ => Err(DomainError::UnknownCommand(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Standing on a node, moves accepted.
    Active,
    /// Moved past a leaf.
    FellOff,
    /// Landed on the floor node.
    Won,
    /// Made a false claim.
    Lost,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::Active => write!(f, "active"),
            GameState::FellOff => write!(f, "fell off"),
            GameState::Won => write!(f, "won"),
            GameState::Lost => write!(f, "lost"),
        }
    }
}

/// Result of applying one command to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Moved {
        to: Index,
        value: i32,
        direction: Direction,
    },
    Won {
        node: Index,
        floor: i32,
    },
    Lost,
    FellOff {
        direction: Direction,
    },
    /// Move attempted after falling off a tree without a floor.
    AwaitingReset,
    /// Move attempted on a finished session.
    Finished,
    /// Reset on a session whose target has a floor.
    ResetIgnored,
    /// Reset on a session whose target has no floor: start a new game.
    RegenerationRequested,
}

#[derive(Debug)]
pub struct GameSession {
    tree: BstTree,
    target: i32,
    floor: Option<i32>,
    current: Option<Index>,
    state: GameState,
    trail: Vec<Index>,
    moves: usize,
}

impl GameSession {
    /// Starts a session at the root of `tree`.
    ///
    /// Fails with [`DomainError::TrivialStart`] when the root already holds
    /// the floor of `target`, since the player would have nothing to do.
    #[instrument(level = "debug", skip(tree))]
    pub fn new(tree: BstTree, target: i32) -> DomainResult<Self> {
        let floor = Self::check_start(&tree, target)?;
        let root = tree.root().ok_or(DomainError::EmptyTree)?;
        debug!("Floor value for target {} is {:?}", target, floor);

        Ok(Self {
            tree,
            target,
            floor,
            current: Some(root),
            state: GameState::Active,
            trail: vec![root],
            moves: 0,
        })
    }

    /// Computes the floor of `target` and rejects unplayable starts.
    pub fn check_start(tree: &BstTree, target: i32) -> DomainResult<Option<i32>> {
        let root = tree
            .root()
            .and_then(|idx| tree.value(idx))
            .ok_or(DomainError::EmptyTree)?;
        let floor = tree.floor(target);
        if floor == Some(root) {
            return Err(DomainError::TrivialStart { root });
        }
        Ok(floor)
    }

    pub fn tree(&self) -> &BstTree {
        &self.tree
    }

    pub fn target(&self) -> i32 {
        self.target
    }

    /// Floor of the target, `None` when no stored value is `<= target`.
    pub fn floor(&self) -> Option<i32> {
        self.floor
    }

    pub fn current(&self) -> Option<Index> {
        self.current
    }

    pub fn current_value(&self) -> Option<i32> {
        self.current.and_then(|idx| self.tree.value(idx))
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Nodes visited so far, root first.
    pub fn trail(&self) -> &[Index] {
        &self.trail
    }

    /// Number of valid moves made.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// No command can change this session any more.
    pub fn is_terminal(&self) -> bool {
        match self.state {
            GameState::Active => false,
            GameState::FellOff => self.floor.is_some(),
            GameState::Won | GameState::Lost => true,
        }
    }

    /// Fell off a tree without a floor: only `Reset` resolves this.
    pub fn awaiting_reset(&self) -> bool {
        self.state == GameState::FellOff && self.floor.is_none()
    }

    /// The command a perfect player would issue next, if any.
    pub fn expected_command(&self) -> Option<Command> {
        if self.awaiting_reset() {
            return Some(Command::Reset);
        }
        if self.state != GameState::Active {
            return None;
        }
        let value = self.current_value()?;
        if Command::LessThan.claim_holds(self.target, value) {
            Some(Command::LessThan)
        } else {
            Some(Command::GreaterThan)
        }
    }

    /// Applies one command. Total over every state and command.
    #[instrument(level = "debug", skip(self), fields(state = %self.state, target = self.target))]
    pub fn apply(&mut self, command: Command) -> Outcome {
        match command.direction() {
            None => self.reset(),
            Some(direction) => self.navigate(command, direction),
        }
    }

    fn reset(&self) -> Outcome {
        if self.floor.is_none() {
            debug!("floor is none, regeneration requested");
            Outcome::RegenerationRequested
        } else {
            debug!("floor exists, reset ignored");
            Outcome::ResetIgnored
        }
    }

    fn navigate(&mut self, command: Command, direction: Direction) -> Outcome {
        if self.awaiting_reset() {
            return Outcome::AwaitingReset;
        }
        if self.state != GameState::Active {
            return Outcome::Finished;
        }
        let (Some(idx), Some(value)) = (self.current, self.current_value()) else {
            return Outcome::Finished;
        };

        if !command.claim_holds(self.target, value) {
            debug!(value, %command, "incorrect claim");
            self.state = GameState::Lost;
            return Outcome::Lost;
        }

        self.moves += 1;
        match self.tree.child(idx, direction) {
            None => {
                debug!(value, %direction, "fell off the tree");
                self.current = None;
                self.state = GameState::FellOff;
                Outcome::FellOff { direction }
            }
            Some(next) => {
                self.current = Some(next);
                self.trail.push(next);
                let landed = self.tree.value(next).unwrap_or_default();
                if Some(landed) == self.floor {
                    self.state = GameState::Won;
                    Outcome::Won {
                        node: next,
                        floor: landed,
                    }
                } else {
                    Outcome::Moved {
                        to: next,
                        value: landed,
                        direction,
                    }
                }
            }
        }
    }
}
