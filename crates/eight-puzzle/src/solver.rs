//! Search drivers: breadth-first, greedy best-first and A*.
//!
//! All three share one loop: pop a node, stop if it holds the goal, otherwise
//! expand it and hand the children to the frontier. The frontier decides the
//! order; the loop never looks at scores.
//!
//! No closed set is kept unless [`SolverConfig::skip_revisits`] is set, so the
//! tree may contain the same state many times. Node counts depend on this.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::expander::expand;
use crate::frontier::{BestFirstFrontier, FifoFrontier, Frontier, RescoreMode};
use crate::node::{Node, NodeArena, NodeId};
use crate::puzzle::{Move, State};
use crate::scorer::{AStarScorer, GreedyScorer, Scorer};

/// Search strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Bfs,
    Greedy,
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Bfs, Strategy::Greedy, Strategy::AStar];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Bfs => "bfs",
            Strategy::Greedy => "greedy",
            Strategy::AStar => "a_star",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(Strategy::Bfs),
            "greedy" => Ok(Strategy::Greedy),
            "a_star" | "astar" | "a*" => Ok(Strategy::AStar),
            _ => Err(Error::UnknownStrategy {
                name: s.to_string(),
            }),
        }
    }
}

/// Node budget used by `SolverConfig::default()` and the plain entry points
pub const DEFAULT_MAX_NODES: usize = 2_000_000;

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Stop once this much wall time has passed
    pub timeout: Option<Duration>,
    /// Stop once this many nodes have been generated
    pub max_nodes: Option<usize>,
    /// Never generate a state that was generated before. Makes the frontier
    /// finite (unsolvable inputs end in `Exhausted`) but changes node counts.
    pub skip_revisits: bool,
    /// Rescoring strategy for Greedy and A*
    pub rescore: RescoreMode,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(15)),
            max_nodes: Some(DEFAULT_MAX_NODES),
            skip_revisits: false,
            rescore: RescoreMode::Full,
        }
    }
}

impl SolverConfig {
    /// Node budget but no clock, so results do not depend on machine speed.
    /// Used by `search_bfs`, `search_greedy` and `search_astar`.
    pub fn untimed() -> Self {
        Self {
            timeout: None,
            max_nodes: Some(DEFAULT_MAX_NODES),
            skip_revisits: false,
            rescore: RescoreMode::Incremental,
        }
    }

    /// No limits, no pruning, full rescoring. Never returns on an unsolvable
    /// start.
    pub fn unbounded() -> Self {
        Self {
            timeout: None,
            max_nodes: None,
            skip_revisits: false,
            rescore: RescoreMode::Full,
        }
    }
}

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    /// A popped node held the goal
    Solved,
    /// The frontier emptied first; the goal is unreachable
    Exhausted,
    /// `max_nodes` was reached
    NodeLimit,
    /// `timeout` elapsed
    Timeout,
}

/// One step of an annotated solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    #[serde(rename = "move")]
    pub mov: Move,
    pub score: u32,
}

/// Solution annotated with the score each node had when it was chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreTrace {
    /// Field names, e.g. `["operator", "heuristic"]`
    pub header: [&'static str; 2],
    pub entries: Vec<TraceEntry>,
}

/// Cost of a solution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cost {
    /// Path length (BFS)
    Steps(usize),
    /// Per-move scores (Greedy, A*); there is no single number
    Trace(ScoreTrace),
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Steps(n) => write!(f, "{}", n),
            Cost::Trace(trace) => write!(f, "See {} values in path", trace.header[1]),
        }
    }
}

/// Bookkeeping that does not affect the solution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nodes_expanded: usize,
    pub max_frontier: usize,
    pub time_elapsed_ms: u64,
}

/// Result of one search.
///
/// When `outcome` is not `Solved`, `moves` is empty and `cost` is `None`.
/// A start equal to the goal is `Solved` with empty `moves` and a cost.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub strategy: Strategy,
    pub outcome: SearchOutcome,
    pub moves: Vec<Move>,
    /// Root included, so at least 1
    pub nodes_generated: usize,
    pub cost: Option<Cost>,
    pub stats: SearchStats,
}

impl SearchResult {
    pub fn is_solved(&self) -> bool {
        self.outcome == SearchOutcome::Solved
    }

    pub fn trace(&self) -> Option<&ScoreTrace> {
        match &self.cost {
            Some(Cost::Trace(trace)) => Some(trace),
            _ => None,
        }
    }
}

/// Breadth-first search under [`SolverConfig::untimed`]
pub fn search_bfs(start: &State, goal: &State) -> SearchResult {
    solve(Strategy::Bfs, start, goal, &SolverConfig::untimed())
}

/// Greedy best-first search (f = h) under [`SolverConfig::untimed`]
pub fn search_greedy(start: &State, goal: &State) -> SearchResult {
    solve(Strategy::Greedy, start, goal, &SolverConfig::untimed())
}

/// A* search (f = g + h) under [`SolverConfig::untimed`]
pub fn search_astar(start: &State, goal: &State) -> SearchResult {
    solve(Strategy::AStar, start, goal, &SolverConfig::untimed())
}

/// Run `strategy` from `start` to `goal` under `config`
pub fn solve(
    strategy: Strategy,
    start: &State,
    goal: &State,
    config: &SolverConfig,
) -> SearchResult {
    match strategy {
        Strategy::Bfs => run(strategy, start, goal, config, FifoFrontier::new(), None),
        Strategy::Greedy => best_first(strategy, start, goal, config, GreedyScorer),
        Strategy::AStar => best_first(strategy, start, goal, config, AStarScorer),
    }
}

fn best_first<S: Scorer>(
    strategy: Strategy,
    start: &State,
    goal: &State,
    config: &SolverConfig,
    scorer: S,
) -> SearchResult {
    let label = scorer.label();
    let frontier = BestFirstFrontier::new(scorer, config.rescore);
    run(strategy, start, goal, config, frontier, Some(label))
}

/// The shared expansion loop. `trace_label` selects a trace-annotated cost.
fn run<F: Frontier>(
    strategy: Strategy,
    start: &State,
    goal: &State,
    config: &SolverConfig,
    mut frontier: F,
    trace_label: Option<&'static str>,
) -> SearchResult {
    let start_time = Instant::now();
    let deadline = config.timeout.map(|t| start_time + t);

    let mut arena = NodeArena::new();
    let root = arena.push(Node::root(*start));
    frontier.push(root);

    let mut seen: HashSet<State> = HashSet::new();
    if config.skip_revisits {
        seen.insert(*start);
    }

    let mut nodes_generated: usize = 1;
    let mut stats = SearchStats {
        max_frontier: 1,
        ..Default::default()
    };

    let (outcome, goal_node) = loop {
        let Some(current) = frontier.pop() else {
            break (SearchOutcome::Exhausted, None);
        };

        if arena.get(current).state == *goal {
            break (SearchOutcome::Solved, Some(current));
        }

        if deadline.is_some_and(|d| Instant::now() >= d) {
            break (SearchOutcome::Timeout, None);
        }
        if config.max_nodes.is_some_and(|max| nodes_generated >= max) {
            break (SearchOutcome::NodeLimit, None);
        }

        let mut children = expand(&mut arena, current);
        if config.skip_revisits {
            children.retain(|id| seen.insert(arena.get(*id).state));
        }

        nodes_generated += children.len();
        stats.nodes_expanded += 1;
        frontier.extend(&mut arena, goal, &children);
        stats.max_frontier = stats.max_frontier.max(frontier.len());
    };

    stats.time_elapsed_ms = start_time.elapsed().as_millis() as u64;

    let (moves, cost) = match goal_node {
        Some(id) => reconstruct(&arena, id, trace_label),
        None => (Vec::new(), None),
    };

    SearchResult {
        strategy,
        outcome,
        moves,
        nodes_generated,
        cost,
        stats,
    }
}

fn reconstruct(
    arena: &NodeArena,
    goal_node: NodeId,
    trace_label: Option<&'static str>,
) -> (Vec<Move>, Option<Cost>) {
    let path = arena.path_to(goal_node);
    let moves: Vec<Move> = path.iter().map(|&(mov, _)| mov).collect();
    let cost = match trace_label {
        None => Cost::Steps(moves.len()),
        Some(label) => Cost::Trace(ScoreTrace {
            header: ["operator", label],
            entries: path
                .into_iter()
                .map(|(mov, score)| TraceEntry { mov, score })
                .collect(),
        }),
    };
    (moves, Some(cost))
}
