//! Search-tree nodes stored in an arena.
//!
//! Parents are referenced by [`NodeId`] rather than owned, so the whole tree
//! lives in one `Vec` for the duration of a search and path reconstruction is
//! a walk over indices.

use crate::puzzle::{Move, State};

/// Handle of a node inside a [`NodeArena`].
///
/// Ids grow in allocation order, so comparing two ids tells which node was
/// created first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node in the search tree.
///
/// Everything except `score` is fixed once the node is created.
#[derive(Debug, Clone)]
pub struct Node {
    pub state: State,
    pub parent: Option<NodeId>,
    pub mov: Option<Move>,
    pub depth: u32,
    /// Strategy-dependent evaluation; 0 until a scorer sets it
    pub score: u32,
}

impl Node {
    pub fn root(state: State) -> Self {
        Self {
            state,
            parent: None,
            mov: None,
            depth: 0,
            score: 0,
        }
    }
}

/// Owns every node created by one search invocation
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn set_score(&mut self, id: NodeId, score: u32) {
        self.nodes[id.index()].score = score;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Moves from the root down to `id`, each paired with the score recorded
    /// on the node it produced. The root itself contributes nothing.
    pub fn path_to(&self, id: NodeId) -> Vec<(Move, u32)> {
        let mut path = Vec::with_capacity(self.get(id).depth as usize);
        let mut current = Some(id);
        while let Some(cur) = current {
            let node = self.get(cur);
            if let Some(mov) = node.mov {
                path.push((mov, node.score));
            }
            current = node.parent;
        }
        path.reverse();
        path
    }
}
