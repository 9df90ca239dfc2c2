//! Terminal rendering of the game tree and snapshot.

use std::fmt::Write as _;

use colored::Colorize;
use generational_arena::Index;
use termtree::Tree;

use crate::application::Snapshot;
use crate::domain::{BstTree, Direction};

pub trait TreeRender {
    /// Builds a termtree; the `highlight` node is shown as `[value]`.
    fn to_termtree(&self, highlight: Option<Index>) -> Tree<String>;
}

impl TreeRender for BstTree {
    fn to_termtree(&self, highlight: Option<Index>) -> Tree<String> {
        let Some(root_idx) = self.root() else {
            return Tree::new("(empty tree)".to_string());
        };

        fn label(tree: &BstTree, idx: Index, side: Option<Direction>, highlight: Option<Index>) -> String {
            let value = tree.value(idx).map(|v| v.to_string()).unwrap_or_default();
            let value = if highlight == Some(idx) {
                format!("[{}]", value).red().bold().to_string()
            } else {
                value
            };
            match side {
                Some(Direction::Left) => format!("L {}", value),
                Some(Direction::Right) => format!("R {}", value),
                None => value,
            }
        }

        fn build_tree(tree: &BstTree, idx: Index, parent: &mut Tree<String>, highlight: Option<Index>) {
            for side in [Direction::Left, Direction::Right] {
                if let Some(child_idx) = tree.child(idx, side) {
                    let mut child_tree = Tree::new(label(tree, child_idx, Some(side), highlight));
                    build_tree(tree, child_idx, &mut child_tree, highlight);
                    parent.push(child_tree);
                }
            }
        }

        let mut root = Tree::new(label(self, root_idx, None, highlight));
        build_tree(self, root_idx, &mut root, highlight);
        root
    }
}

/// Full screen for one snapshot: tree, target line, then status messages.
pub fn render_snapshot(snapshot: &Snapshot<'_>) -> String {
    let mut out = snapshot.tree.to_termtree(snapshot.current).to_string();
    let _ = writeln!(
        out,
        "{} {}   (game {}, won {}, lost {})",
        "Target:".cyan().bold(),
        snapshot.target,
        snapshot.stats.games,
        snapshot.stats.wins,
        snapshot.stats.losses
    );
    if snapshot.current.is_none() {
        let _ = writeln!(out, "{}", "You are off the tree.".yellow());
    }
    for message in snapshot.messages {
        let _ = writeln!(out, "{}", message);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termtree_labels_sides() {
        colored::control::set_override(false);
        let tree = BstTree::from_values([50, 30, 70, 60]);
        let rendered = tree.to_termtree(tree.find(60)).to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "50");
        assert!(lines[1].ends_with("L 30"));
        assert!(lines[2].ends_with("R 70"));
        assert!(lines[3].ends_with("L [60]"));
    }

    #[test]
    fn test_empty_tree_placeholder() {
        let rendered = BstTree::new().to_termtree(None).to_string();
        assert_eq!(rendered.trim(), "(empty tree)");
    }
}
