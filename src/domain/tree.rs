//! Arena-backed binary search tree.
//!
//! Nodes live in a generational arena and refer to each other by `Index`.
//! The handle doubles as node identity: two nodes holding the same value are
//! never confused, and a handle stays valid for the lifetime of the tree.

use std::cmp::Ordering;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{instrument, trace};

/// Side of a node a move descends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Tree node in the arena.
#[derive(Debug)]
pub struct BstNode {
    /// Stored key
    pub value: i32,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Subtree of strictly smaller values
    pub left: Option<Index>,
    /// Subtree of strictly greater values
    pub right: Option<Index>,
}

impl BstNode {
    fn new(value: i32, parent: Option<Index>) -> Self {
        Self {
            value,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn child(&self, direction: Direction) -> Option<Index> {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

/// Binary search tree with unique keys.
///
/// Built by a sequence of [`insert`](BstTree::insert) calls and never mutated
/// otherwise: there is no deletion or rebalancing, so the shape is fully
/// determined by insertion order.
#[derive(Debug)]
pub struct BstTree {
    arena: Arena<BstNode>,
    root: Option<Index>,
}

impl Default for BstTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BstTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Builds a tree by inserting `values` in iteration order.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let mut tree = Self::new();
        for value in values {
            tree.insert(value);
        }
        tree
    }

    /// Inserts `value` and returns the handle of the new node.
    ///
    /// Returns `None` when the value is already present; the tree is left
    /// unchanged in that case.
    #[instrument(level = "trace", skip(self))]
    pub fn insert(&mut self, value: i32) -> Option<Index> {
        let Some(mut cursor) = self.root else {
            let idx = self.arena.insert(BstNode::new(value, None));
            self.root = Some(idx);
            return Some(idx);
        };

        loop {
            let node = self.arena.get(cursor)?;
            let direction = match value.cmp(&node.value) {
                Ordering::Less => Direction::Left,
                Ordering::Greater => Direction::Right,
                Ordering::Equal => {
                    trace!(value, "duplicate value dropped");
                    return None;
                }
            };

            match node.child(direction) {
                Some(next) => cursor = next,
                None => {
                    let idx = self.arena.insert(BstNode::new(value, Some(cursor)));
                    let parent = self.arena.get_mut(cursor)?;
                    match direction {
                        Direction::Left => parent.left = Some(idx),
                        Direction::Right => parent.right = Some(idx),
                    }
                    return Some(idx);
                }
            }
        }
    }

    /// Largest stored value that is `<= target`, or `None` if every value is
    /// greater than `target`.
    ///
    /// Single root-to-leaf walk: an exact match returns immediately, a larger
    /// node sends the search left, and a smaller node becomes the candidate
    /// before the search continues right.
    #[instrument(level = "trace", skip(self))]
    pub fn floor(&self, target: i32) -> Option<i32> {
        let mut candidate = None;
        let mut cursor = self.root;

        while let Some(node) = cursor.and_then(|idx| self.arena.get(idx)) {
            match node.value.cmp(&target) {
                Ordering::Equal => return Some(node.value),
                Ordering::Greater => cursor = node.left,
                Ordering::Less => {
                    candidate = Some(node.value);
                    cursor = node.right;
                }
            }
        }

        candidate
    }

    /// Handle of the node holding `value`.
    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, value: i32) -> Option<Index> {
        let mut cursor = self.root;
        while let Some(idx) = cursor {
            let node = self.arena.get(idx)?;
            cursor = match value.cmp(&node.value) {
                Ordering::Equal => return Some(idx),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&BstNode> {
        self.arena.get(idx)
    }

    pub fn value(&self, idx: Index) -> Option<i32> {
        self.get_node(idx).map(|node| node.value)
    }

    /// Child of `idx` on the given side; `None` if there is no such child.
    pub fn child(&self, idx: Index, direction: Direction) -> Option<Index> {
        self.get_node(idx).and_then(|node| node.child(direction))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Smallest stored value.
    pub fn min(&self) -> Option<i32> {
        let mut node = self.get_node(self.root?)?;
        while let Some(left) = node.left.and_then(|idx| self.get_node(idx)) {
            node = left;
        }
        Some(node.value)
    }

    /// Number of nodes on the longest root-to-leaf path.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.root.map_or(0, |root| self.calculate_depth(root))
    }

    fn calculate_depth(&self, idx: Index) -> usize {
        match self.get_node(idx) {
            Some(node) => {
                let left = node.left.map_or(0, |l| self.calculate_depth(l));
                let right = node.right.map_or(0, |r| self.calculate_depth(r));
                1 + left.max(right)
            }
            None => 0,
        }
    }

    /// Ascending traversal yielding handles alongside nodes.
    pub fn iter_inorder(&self) -> InOrderIterator<'_> {
        InOrderIterator::new(self)
    }

    /// Stored values in ascending order.
    pub fn values(&self) -> Vec<i32> {
        self.iter_inorder().map(|(_, node)| node.value).collect()
    }
}

pub struct InOrderIterator<'a> {
    tree: &'a BstTree,
    stack: Vec<Index>,
    cursor: Option<Index>,
}

impl<'a> InOrderIterator<'a> {
    fn new(tree: &'a BstTree) -> Self {
        Self {
            tree,
            stack: Vec::new(),
            cursor: tree.root(),
        }
    }
}

impl<'a> Iterator for InOrderIterator<'a> {
    type Item = (Index, &'a BstNode);

    fn next(&mut self) -> Option<Self::Item> {
        // Descend left as far as possible, stacking the path
        while let Some(idx) = self.cursor {
            self.stack.push(idx);
            self.cursor = self.tree.get_node(idx).and_then(|node| node.left);
        }

        let idx = self.stack.pop()?;
        let node = self.tree.get_node(idx)?;
        self.cursor = node.right;
        Some((idx, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_links_parent_and_children() {
        let mut tree = BstTree::new();
        let root = tree.insert(50).unwrap();
        let left = tree.insert(30).unwrap();
        let right = tree.insert(70).unwrap();

        let root_node = tree.get_node(root).unwrap();
        assert_eq!(root_node.left, Some(left));
        assert_eq!(root_node.right, Some(right));
        assert_eq!(tree.get_node(left).unwrap().parent, Some(root));
        assert_eq!(tree.get_node(right).unwrap().parent, Some(root));
    }

    #[test]
    fn test_duplicate_insert_returns_none() {
        let mut tree = BstTree::from_values([5, 3]);
        assert_eq!(tree.insert(3), None);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_empty_tree_queries() {
        let tree = BstTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.floor(10), None);
        assert_eq!(tree.min(), None);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.iter_inorder().count(), 0);
    }

    #[test]
    fn test_depth_of_degenerate_chain() {
        let tree = BstTree::from_values([1, 2, 3, 4]);
        assert_eq!(tree.depth(), 4);
        assert_eq!(tree.min(), Some(1));
    }

    #[test]
    fn test_child_follows_direction() {
        let tree = BstTree::from_values([50, 30, 70]);
        let root = tree.root().unwrap();
        assert_eq!(tree.value(tree.child(root, Direction::Left).unwrap()), Some(30));
        assert_eq!(tree.value(tree.child(root, Direction::Right).unwrap()), Some(70));
        let leaf = tree.find(30).unwrap();
        assert_eq!(tree.child(leaf, Direction::Left), None);
        assert_eq!(tree.child(leaf, Direction::Right), None);
    }
}
