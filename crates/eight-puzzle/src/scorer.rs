//! Node evaluation for the informed strategies.

use crate::node::Node;
use crate::puzzle::State;

/// Count of cells whose value differs from `goal`.
///
/// The blank is compared like any other tile, so a state one move away from
/// the goal scores 2, not 1.
pub fn heuristic(state: &State, goal: &State) -> u32 {
    state
        .cells()
        .iter()
        .zip(goal.cells())
        .filter(|(a, b)| a != b)
        .count() as u32
}

/// Computes the ordering key of a frontier node. Lower is expanded first.
///
/// Scores must depend only on the node and the goal; the incremental
/// rescoring mode relies on that to reproduce full rescoring exactly.
pub trait Scorer {
    fn score(&self, node: &Node, goal: &State) -> u32;

    /// Field name for the score column of a solution trace
    fn label(&self) -> &'static str;
}

/// f(x) = h(x)
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyScorer;

impl Scorer for GreedyScorer {
    fn score(&self, node: &Node, goal: &State) -> u32 {
        heuristic(&node.state, goal)
    }

    fn label(&self) -> &'static str {
        "heuristic"
    }
}

/// f(x) = g(x) + h(x), with g the node depth
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarScorer;

impl Scorer for AStarScorer {
    fn score(&self, node: &Node, goal: &State) -> u32 {
        heuristic(&node.state, goal) + node.depth
    }

    fn label(&self) -> &'static str {
        "path cost"
    }
}
