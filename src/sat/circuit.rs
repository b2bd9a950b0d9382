//! Circuit-ordering constraints over the chain graph

use crate::puzzle::FixLibrary;
use crate::sat::graph::ChainGraph;
use crate::sat::model::{CircuitArc, Model};
use crate::sat::variables::VariableArena;

/// Builds the "one closed tour through every piece" side of the model.
///
/// Every fix node gets an activity variable; every graph arc a used
/// variable. Fixes of multi-fix pieces additionally get a self-loop so
/// the unchosen orientation can drop out of the tour; a piece with a
/// single fix is always in the tour and never self-loops.
pub struct CircuitBuilder<'a> {
    library: &'a FixLibrary,
    graph: &'a ChainGraph,
}

impl<'a> CircuitBuilder<'a> {
    pub fn new(library: &'a FixLibrary, graph: &'a ChainGraph) -> Self {
        Self { library, graph }
    }

    pub fn build(&self, model: &mut Model, arena: &mut VariableArena) {
        self.create_activity_variables(model, arena);
        self.create_arc_variables(model, arena);
        self.create_self_loops(model, arena);
        self.constrain_piece_degrees(model, arena);
        self.add_circuit(model, arena);
    }

    fn create_activity_variables(&self, model: &mut Model, arena: &mut VariableArena) {
        for _ in 0..self.library.node_count() {
            let var = model.new_var();
            arena.push_activity(var);
        }
        // exactly one orientation of each piece is the one in play
        for piece in 0..self.library.piece_count() {
            let lits: Vec<_> = self
                .library
                .piece_nodes(piece)
                .iter()
                .map(|&node| arena.activity(node).positive())
                .collect();
            model.add_exactly_one(&lits);
        }
    }

    fn create_arc_variables(&self, model: &mut Model, arena: &mut VariableArena) {
        for &(head, tail) in self.graph.arcs() {
            let var = model.new_var();
            arena.add_arc(head, tail, var);
            // a used arc commits both of its endpoint orientations
            model.add_implication(var.positive(), arena.activity(head).positive());
            model.add_implication(var.positive(), arena.activity(tail).positive());
        }
    }

    fn create_self_loops(&self, model: &mut Model, arena: &mut VariableArena) {
        for node in 0..self.library.node_count() {
            if !self.library.has_mirror(node) {
                continue;
            }
            let var = model.new_var();
            arena.set_self_loop(node, var);
            // the loop is taken exactly when this orientation sits out
            model.add_iff_negation(var, arena.activity(node));
        }
    }

    fn constrain_piece_degrees(&self, model: &mut Model, arena: &VariableArena) {
        // each piece contributes exactly one chain step, whichever of
        // its orientations is active
        for piece in 0..self.library.piece_count() {
            let lits: Vec<_> = self
                .library
                .piece_nodes(piece)
                .iter()
                .flat_map(|&node| arena.arcs_from(node).map(|arc| arc.var.positive()))
                .collect();
            model.add_exactly_one(&lits);
        }

        // and the tour as a whole is exactly one step per piece
        let all_arcs: Vec<_> = arena.arcs().iter().map(|arc| arc.var.positive()).collect();
        model.add_sum_eq(&all_arcs, self.library.piece_count());
    }

    fn add_circuit(&self, model: &mut Model, arena: &VariableArena) {
        let mut arcs: Vec<CircuitArc> = arena
            .arcs()
            .iter()
            .map(|arc| CircuitArc {
                head: arc.head,
                tail: arc.tail,
                var: arc.var,
            })
            .collect();
        for node in 0..self.library.node_count() {
            if let Some(var) = arena.self_loop(node) {
                arcs.push(CircuitArc {
                    head: node,
                    tail: node,
                    var,
                });
            }
        }
        model.add_circuit(self.library.node_count(), arcs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{PieceSet, Region};
    use crate::sat::graph::domino_rule;

    fn build_size(max_value: u8) -> (FixLibrary, Model, VariableArena) {
        let set = PieceSet::complete(max_value);
        let library = FixLibrary::new(&set);
        let graph = ChainGraph::build(&library, domino_rule);
        let mut model = Model::new();
        let mut arena = VariableArena::new(library.node_count(), &Region::rect(1, 1));
        CircuitBuilder::new(&library, &graph).build(&mut model, &mut arena);
        (library, model, arena)
    }

    #[test]
    fn test_variable_counts() {
        let (library, _, arena) = build_size(2);
        // 9 fixes, loops only on the 6 mirror fixes
        assert_eq!(arena.node_count(), library.node_count());
        assert_eq!(arena.self_loop_count(), 6);
        assert!(arena.arc_count() > 0);
    }

    #[test]
    fn test_singleton_fixes_never_loop() {
        let (library, _, arena) = build_size(2);
        for node in 0..library.node_count() {
            assert_eq!(
                arena.self_loop(node).is_some(),
                library.has_mirror(node)
            );
        }
    }

    #[test]
    fn test_circuit_registered_before_lowering() {
        let (_, mut model, _) = build_size(1);
        let before = model.clause_count();
        model.lower();
        // lowering the circuit adds degree and ordering clauses
        assert!(model.clause_count() > before);
    }
}
