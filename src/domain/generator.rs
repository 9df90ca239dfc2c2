//! Random session generation with bounded retries.

use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::session::GameSession;
use crate::domain::tree::BstTree;

/// Shape of generated games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameParams {
    /// Number of random inserts (duplicates are dropped, so the tree may be smaller)
    pub tree_size: usize,
    /// Smallest value drawn, inclusive
    pub value_min: i32,
    /// Largest value drawn, inclusive
    pub value_max: i32,
    /// Candidates drawn before falling back to the deterministic fix-up
    pub max_attempts: u32,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            tree_size: 10,
            value_min: 0,
            value_max: 99,
            max_attempts: 1000,
        }
    }
}

impl GameParams {
    pub fn validate(&self) -> DomainResult<()> {
        if self.tree_size == 0 {
            return Err(DomainError::InvalidParams(
                "tree_size must be at least 1".into(),
            ));
        }
        if self.value_min >= self.value_max {
            return Err(DomainError::InvalidParams(format!(
                "value_min ({}) must be below value_max ({})",
                self.value_min, self.value_max
            )));
        }
        if self.max_attempts == 0 {
            return Err(DomainError::InvalidParams(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// A freshly generated session and the number of candidates it took.
#[derive(Debug)]
pub struct Generated {
    pub session: GameSession,
    pub attempts: u32,
}

/// Draws trees and targets until the root is not already the floor.
///
/// After `max_attempts` rejected candidates the last tree is repaired by
/// [`fix_up`] instead of drawing again.
#[instrument(level = "debug", skip(rng))]
pub fn generate_session<R>(params: &GameParams, rng: &mut R) -> DomainResult<Generated>
where
    R: Rng + ?Sized,
{
    params.validate()?;

    let mut rejected = None;
    for attempt in 1..=params.max_attempts {
        let tree = random_tree(params, rng);
        let target = rng.random_range(params.value_min..=params.value_max);

        match GameSession::check_start(&tree, target) {
            Ok(_) => {
                let session = GameSession::new(tree, target)?;
                debug!(attempt, target, nodes = session.tree().len(), "generated session");
                return Ok(Generated {
                    session,
                    attempts: attempt,
                });
            }
            Err(DomainError::TrivialStart { root }) => {
                debug!(attempt, root, target, "starting node is already the floor, regenerating");
                rejected = Some(tree);
            }
            Err(e) => return Err(e),
        }
    }

    let tree = rejected.ok_or(DomainError::EmptyTree)?;
    warn!(
        attempts = params.max_attempts,
        "generator kept producing trivial starts, repairing last candidate"
    );
    Ok(Generated {
        session: fix_up(tree, params)?,
        attempts: params.max_attempts,
    })
}

/// Inserts `tree_size` uniformly drawn values.
pub fn random_tree<R>(params: &GameParams, rng: &mut R) -> BstTree
where
    R: Rng + ?Sized,
{
    let mut tree = BstTree::new();
    for _ in 0..params.tree_size {
        tree.insert(rng.random_range(params.value_min..=params.value_max));
    }
    tree
}

/// Turns a trivial start into a playable one without drawing randomness.
///
/// The target becomes the smallest non-root value, whose floor is itself.
/// A single-node tree first gains a neighbour of the root inside the value
/// domain, which then serves as the target.
pub fn fix_up(mut tree: BstTree, params: &GameParams) -> DomainResult<GameSession> {
    let root = tree
        .root()
        .and_then(|idx| tree.value(idx))
        .ok_or(DomainError::EmptyTree)?;

    let target = match tree.values().into_iter().find(|&value| value != root) {
        Some(value) => value,
        None => {
            let neighbour = if root > params.value_min {
                root - 1
            } else {
                root + 1
            };
            tree.insert(neighbour);
            neighbour
        }
    };

    GameSession::new(tree, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_tree_stays_in_domain() {
        let params = GameParams {
            value_min: -5,
            value_max: 5,
            ..GameParams::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let tree = random_tree(&params, &mut rng);
        assert!(!tree.is_empty());
        assert!(tree.len() <= params.tree_size);
        assert!(tree.values().iter().all(|v| (-5..=5).contains(v)));
    }

    #[test]
    fn test_fix_up_single_node_at_domain_minimum() {
        let params = GameParams::default();
        let session = fix_up(BstTree::from_values([0]), &params).unwrap();
        assert_eq!(session.target(), 1);
        assert_eq!(session.floor(), Some(1));
    }

    #[test]
    fn test_fix_up_single_node_uses_lower_neighbour() {
        let params = GameParams::default();
        let session = fix_up(BstTree::from_values([40]), &params).unwrap();
        assert_eq!(session.target(), 39);
        assert_eq!(session.floor(), Some(39));
    }

    #[test]
    fn test_fix_up_prefers_existing_value() {
        let params = GameParams::default();
        let session = fix_up(BstTree::from_values([50, 70, 20]), &params).unwrap();
        assert_eq!(session.target(), 20);
    }

    #[test]
    fn test_validate_rejects_empty_domain() {
        let params = GameParams {
            value_min: 3,
            value_max: 3,
            ..GameParams::default()
        };
        assert!(matches!(params.validate(), Err(DomainError::InvalidParams(_))));
    }
}
