//! Chain connectivity graph over fix nodes

use crate::puzzle::{Fix, FixLibrary, NodeId};

/// Decides whether the chain may continue from `head` directly into
/// `tail`. The builders never assume the domino rule, so path puzzles
/// over arbitrary compatibility relations reuse the same graph.
pub trait ConnectRule {
    fn connects(&self, head: &Fix, tail: &Fix) -> bool;
}

impl<F> ConnectRule for F
where
    F: Fn(&Fix, &Fix) -> bool,
{
    fn connects(&self, head: &Fix, tail: &Fix) -> bool {
        self(head, tail)
    }
}

/// The standard domino rule: the trailing value of one tile must equal
/// the leading value of the next.
pub fn domino_rule(head: &Fix, tail: &Fix) -> bool {
    head.tail == tail.head
}

/// Directed graph whose nodes are fixes and whose arcs are the legal
/// chain continuations between fixes of *different* pieces.
///
/// Arcs between the same node pair cannot repeat: fixes are unique keys,
/// so no deduplication pass is needed.
#[derive(Debug, Clone)]
pub struct ChainGraph {
    node_count: usize,
    arcs: Vec<(NodeId, NodeId)>,
    outgoing: Vec<Vec<NodeId>>,
}

impl ChainGraph {
    /// Build the graph for `library` under `rule`.
    pub fn build(library: &FixLibrary, rule: impl ConnectRule) -> Self {
        let node_count = library.node_count();
        let mut arcs = Vec::new();
        let mut outgoing = vec![Vec::new(); node_count];

        for (head_id, head) in library.fixes().iter().enumerate() {
            for (tail_id, tail) in library.fixes().iter().enumerate() {
                if head.piece == tail.piece {
                    continue;
                }
                if rule.connects(head, tail) {
                    arcs.push((head_id, tail_id));
                    outgoing[head_id].push(tail_id);
                }
            }
        }

        Self {
            node_count,
            arcs,
            outgoing,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn arcs(&self) -> &[(NodeId, NodeId)] {
        &self.arcs
    }

    /// Nodes reachable in one chain step from `node`.
    pub fn successors(&self, node: NodeId) -> &[NodeId] {
        &self.outgoing[node]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::PieceSet;

    #[test]
    fn test_domino_rule() {
        let a = Fix {
            piece: 0,
            head: 1,
            tail: 3,
        };
        let b = Fix {
            piece: 1,
            head: 3,
            tail: 2,
        };
        let c = Fix {
            piece: 1,
            head: 2,
            tail: 3,
        };
        assert!(domino_rule(&a, &b));
        assert!(!domino_rule(&a, &c));
    }

    #[test]
    fn test_graph_excludes_same_piece_arcs() {
        let set = PieceSet::complete(1);
        let library = FixLibrary::new(&set);
        let graph = ChainGraph::build(&library, domino_rule);

        for &(head, tail) in graph.arcs() {
            assert_ne!(library.fix(head).piece, library.fix(tail).piece);
            assert_eq!(library.fix(head).tail, library.fix(tail).head);
        }
    }

    #[test]
    fn test_size_one_graph_shape() {
        // fixes: [0:0], [0:1], [1:0], [1:1]
        let set = PieceSet::complete(1);
        let library = FixLibrary::new(&set);
        let graph = ChainGraph::build(&library, domino_rule);

        assert_eq!(graph.node_count(), 4);
        // 0:0 -> 0:1; 0:1 -> 1:1; 1:0 -> 0:0; 1:1 -> 1:0
        assert_eq!(graph.arc_count(), 4);

        let zero_zero = library.piece_nodes(0)[0];
        assert_eq!(graph.successors(zero_zero).len(), 1);
        assert_eq!(
            *library.fix(graph.successors(zero_zero)[0]),
            Fix {
                piece: 1,
                head: 0,
                tail: 1
            }
        );
    }

    #[test]
    fn test_pluggable_rule() {
        let set = PieceSet::complete(1);
        let library = FixLibrary::new(&set);
        // a rule that connects everything gives arcs between all 12
        // ordered fix pairs except the 2 within the non-double piece
        let graph = ChainGraph::build(&library, |_: &Fix, _: &Fix| true);
        assert_eq!(graph.arc_count(), 10);
    }
}
