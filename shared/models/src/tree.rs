//! Display forest of bricks.
//!
//! Trees borrow their bricks from the [`Project`](crate::project::Project)
//! that built them and cannot outlive it.

use serde::Serialize;

use crate::brick::Brick;

/// A brick and the sub-bricks displayed beneath it. Each brick appears at
/// most once in a forest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrickTree<'a> {
    pub brick: &'a Brick,
    pub children: Vec<BrickTree<'a>>,
}

impl<'a> BrickTree<'a> {
    pub fn new(brick: &'a Brick) -> Self {
        Self {
            brick,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(BrickTree::len).sum::<usize>()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Levels below and including this node.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(BrickTree::depth).max().unwrap_or(0)
    }

    /// Brick ids in pre-order.
    pub fn brick_ids(&self) -> Vec<&'a str> {
        let mut ids = vec![self.brick.id.as_str()];
        for child in &self.children {
            ids.extend(child.brick_ids());
        }
        ids
    }
}
