//! Pending-node containers.
//!
//! The access discipline is the only thing that differs between the three
//! strategies: BFS uses a FIFO queue, Greedy and A* a queue kept stably sorted
//! by score.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::node::{NodeArena, NodeId};
use crate::puzzle::State;
use crate::scorer::Scorer;

/// How a best-first frontier refreshes scores after new nodes arrive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RescoreMode {
    /// Re-evaluate every queued node and re-sort the whole queue, O(n) per step
    #[default]
    Full,
    /// Evaluate only the new nodes and keep them in a heap keyed by
    /// `(score, NodeId)`, O(log n) per node. Produces the same pop order as
    /// `Full`.
    Incremental,
}

pub trait Frontier {
    /// Queue a node without scoring it (the root)
    fn push(&mut self, id: NodeId);

    /// Queue freshly generated children, scoring them if the frontier is ordered
    fn extend(&mut self, arena: &mut NodeArena, goal: &State, children: &[NodeId]);

    fn pop(&mut self) -> Option<NodeId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First-in, first-out queue for breadth-first search
#[derive(Debug, Default)]
pub struct FifoFrontier {
    queue: VecDeque<NodeId>,
}

impl FifoFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for FifoFrontier {
    fn push(&mut self, id: NodeId) {
        self.queue.push_back(id);
    }

    fn extend(&mut self, _arena: &mut NodeArena, _goal: &State, children: &[NodeId]) {
        self.queue.extend(children.iter().copied());
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Queue ordered ascending by score; equal scores keep insertion order
#[derive(Debug)]
pub struct BestFirstFrontier<S> {
    /// Used by `RescoreMode::Full`
    queue: VecDeque<NodeId>,
    /// Used by `RescoreMode::Incremental`. Children are allocated in the
    /// order they are queued, so the id breaks score ties by insertion order.
    heap: BinaryHeap<Reverse<(u32, NodeId)>>,
    scorer: S,
    mode: RescoreMode,
}

impl<S: Scorer> BestFirstFrontier<S> {
    pub fn new(scorer: S, mode: RescoreMode) -> Self {
        Self {
            queue: VecDeque::new(),
            heap: BinaryHeap::new(),
            scorer,
            mode,
        }
    }

    fn rescore_all(&mut self, arena: &mut NodeArena, goal: &State) {
        for &id in &self.queue {
            let score = self.scorer.score(arena.get(id), goal);
            arena.set_score(id, score);
        }
        // sort_by_key is stable
        self.queue
            .make_contiguous()
            .sort_by_key(|&id| arena.get(id).score);
    }

    fn push_scored(&mut self, arena: &mut NodeArena, goal: &State, children: &[NodeId]) {
        for &id in children {
            let score = self.scorer.score(arena.get(id), goal);
            arena.set_score(id, score);
            self.heap.push(Reverse((score, id)));
        }
    }
}

impl<S: Scorer> Frontier for BestFirstFrontier<S> {
    fn push(&mut self, id: NodeId) {
        match self.mode {
            RescoreMode::Full => self.queue.push_back(id),
            RescoreMode::Incremental => self.heap.push(Reverse((0, id))),
        }
    }

    fn extend(&mut self, arena: &mut NodeArena, goal: &State, children: &[NodeId]) {
        match self.mode {
            RescoreMode::Full => {
                self.queue.extend(children.iter().copied());
                self.rescore_all(arena, goal);
            }
            RescoreMode::Incremental => self.push_scored(arena, goal, children),
        }
    }

    fn pop(&mut self) -> Option<NodeId> {
        match self.mode {
            RescoreMode::Full => self.queue.pop_front(),
            RescoreMode::Incremental => self.heap.pop().map(|Reverse((_, id))| id),
        }
    }

    fn len(&self) -> usize {
        self.queue.len() + self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expander::expand;
    use crate::node::Node;
    use crate::puzzle::Move;
    use crate::scorer::GreedyScorer;

    #[test]
    fn test_fifo_order() {
        let mut arena = NodeArena::new();
        let root = arena.push(Node::root(State::goal()));
        let children = expand(&mut arena, root);

        let mut frontier = FifoFrontier::new();
        frontier.push(root);
        assert_eq!(frontier.pop(), Some(root));
        assert!(frontier.pop().is_none());

        frontier.extend(&mut arena, &State::goal(), &children);
        assert_eq!(frontier.len(), 4);
        let popped: Vec<NodeId> = std::iter::from_fn(|| frontier.pop()).collect();
        assert_eq!(popped, children.to_vec());
    }

    #[test]
    fn test_best_first_sorts_by_score_and_keeps_ties_stable() {
        // Goal is one move right of the root, so the right child scores 0
        // and the other two tie at 3
        let goal = State::goal();
        let start = goal.apply(Move::Left).unwrap();

        for mode in [RescoreMode::Full, RescoreMode::Incremental] {
            let mut arena = NodeArena::new();
            let root = arena.push(Node::root(start));
            let children = expand(&mut arena, root);

            let mut frontier = BestFirstFrontier::new(GreedyScorer, mode);
            frontier.extend(&mut arena, &goal, &children);

            let order: Vec<(Move, u32)> = std::iter::from_fn(|| frontier.pop())
                .map(|id| (arena.get(id).mov.unwrap(), arena.get(id).score))
                .collect();
            assert_eq!(
                order,
                vec![(Move::Right, 0), (Move::Up, 3), (Move::Down, 3)],
                "mode {:?}",
                mode
            );
        }
    }

    #[test]
    fn test_incremental_matches_full_over_several_expansions() {
        let goal = State::goal();
        let start = State::new(&[2, 8, 3, 1, 6, 4, 7, 0, 5]).unwrap();

        let mut orders = Vec::new();
        for mode in [RescoreMode::Full, RescoreMode::Incremental] {
            let mut arena = NodeArena::new();
            let root = arena.push(Node::root(start));
            let mut frontier = BestFirstFrontier::new(GreedyScorer, mode);
            frontier.push(root);

            let mut popped = Vec::new();
            for _ in 0..20 {
                let Some(current) = frontier.pop() else { break };
                popped.push(current);
                let children = expand(&mut arena, current);
                frontier.extend(&mut arena, &goal, &children);
            }
            orders.push(popped);
        }
        assert_eq!(orders[0], orders[1]);
    }
}
