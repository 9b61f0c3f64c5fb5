//! Child generation.

use smallvec::SmallVec;

use crate::node::{Node, NodeArena, NodeId};
use crate::puzzle::Move;

/// At most four children per node
pub type Children = SmallVec<[NodeId; 4]>;

/// Create one child per legal move of `parent`, in `Move::ALL` order.
///
/// Children are allocated in `arena` with score 0 and returned in the order
/// they were created.
pub fn expand(arena: &mut NodeArena, parent: NodeId) -> Children {
    let (state, depth) = {
        let node = arena.get(parent);
        (node.state, node.depth)
    };

    let mut children = Children::new();
    for mov in Move::ALL {
        if let Some(next) = state.apply(mov) {
            children.push(arena.push(Node {
                state: next,
                parent: Some(parent),
                mov: Some(mov),
                depth: depth + 1,
                score: 0,
            }));
        }
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::State;

    fn expand_state(cells: [u8; 9]) -> (NodeArena, Children) {
        let mut arena = NodeArena::new();
        let root = arena.push(Node::root(State::new(&cells).unwrap()));
        let children = expand(&mut arena, root);
        (arena, children)
    }

    #[test]
    fn test_corner_edge_centre_counts() {
        assert_eq!(expand_state([0, 1, 2, 3, 4, 5, 6, 7, 8]).1.len(), 2);
        assert_eq!(expand_state([1, 2, 3, 4, 5, 0, 6, 7, 8]).1.len(), 3);
        assert_eq!(expand_state([1, 2, 3, 8, 0, 4, 7, 6, 5]).1.len(), 4);
    }

    #[test]
    fn test_children_keep_fixed_order_and_provenance() {
        // Blank on the left edge: up, down and right are legal
        let (arena, children) = expand_state([1, 2, 3, 0, 8, 4, 7, 6, 5]);
        let moves: Vec<Move> = children
            .iter()
            .map(|&id| arena.get(id).mov.unwrap())
            .collect();
        assert_eq!(moves, vec![Move::Up, Move::Down, Move::Right]);

        for &id in &children {
            let child = arena.get(id);
            assert_eq!(child.parent.map(NodeId::index), Some(0));
            assert_eq!(child.depth, 1);
            assert_eq!(child.score, 0);
        }
    }
}
