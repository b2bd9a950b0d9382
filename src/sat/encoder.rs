//! Pipeline that assembles the chain model and runs the engine

use crate::puzzle::{Cell, FixLibrary, NodeId, PieceSet, Region, Role};
use crate::sat::circuit::CircuitBuilder;
use crate::sat::glue::GlueBuilder;
use crate::sat::graph::{domino_rule, ChainGraph};
use crate::sat::model::Model;
use crate::sat::placement::PlacementBuilder;
use crate::sat::solver::{Assignment, SatSolver, SolveOutcome, SolverOptions};
use crate::sat::variables::VariableArena;

/// The raw truth of a satisfying assignment, translated back into the
/// model's own identities. Chain reconstruction happens downstream.
#[derive(Debug, Clone)]
pub struct DecodedAssignment {
    pub active_nodes: Vec<NodeId>,
    pub used_arcs: Vec<(NodeId, NodeId)>,
    pub chosen_loops: Vec<NodeId>,
    pub placements: Vec<(Cell, NodeId, Role)>,
}

/// Size of the encoded model, captured when the model is built.
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub piece_count: usize,
    pub fix_count: usize,
    pub arc_count: usize,
    pub cell_count: usize,
    pub clue_count: usize,
    pub placement_count: usize,
    pub variable_count: usize,
    pub clause_count: usize,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Encoding statistics:")?;
        writeln!(f, "  Pieces: {}", self.piece_count)?;
        writeln!(f, "  Fixes: {}", self.fix_count)?;
        writeln!(f, "  Chain arcs: {}", self.arc_count)?;
        writeln!(
            f,
            "  Cells: {} ({} with clues)",
            self.cell_count, self.clue_count
        )?;
        writeln!(f, "  Placements: {}", self.placement_count)?;
        writeln!(f, "  Variables: {}", self.variable_count)?;
        writeln!(f, "  Clauses (before lowering): {}", self.clause_count)?;
        Ok(())
    }
}

/// Owns the model for exactly one puzzle instance, built once and
/// submitted once. Build order is fixed: graph, circuit, placements,
/// glue; no stage re-enters an earlier one.
pub struct ChainEncoder {
    region: Region,
    library: FixLibrary,
    graph: ChainGraph,
    model: Option<Model>,
    arena: Option<VariableArena>,
    statistics: Option<EncodingStatistics>,
}

impl ChainEncoder {
    pub fn new(piece_set: &PieceSet, region: Region) -> Self {
        let library = FixLibrary::new(piece_set);
        let graph = ChainGraph::build(&library, domino_rule);
        Self {
            region,
            library,
            graph,
            model: None,
            arena: None,
            statistics: None,
        }
    }

    pub fn library(&self) -> &FixLibrary {
        &self.library
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Build the complete model. Idempotent: repeated calls keep the
    /// first build.
    pub fn encode(&mut self) {
        if self.model.is_some() {
            return;
        }

        let mut model = Model::new();
        let mut arena = VariableArena::new(self.library.node_count(), &self.region);

        CircuitBuilder::new(&self.library, &self.graph).build(&mut model, &mut arena);
        PlacementBuilder::new(&self.library, &self.region).build(&mut model, &mut arena);
        GlueBuilder::new(&self.region).build(&mut model, &arena);

        self.statistics = Some(EncodingStatistics {
            piece_count: self.library.piece_count(),
            fix_count: self.library.node_count(),
            arc_count: arena.arc_count(),
            cell_count: self.region.cell_count(),
            clue_count: self.region.clue_count(),
            placement_count: arena.placement_count(),
            variable_count: model.var_count(),
            clause_count: model.clause_count(),
        });
        self.model = Some(model);
        self.arena = Some(arena);
    }

    /// Submit the model to the engine and translate any assignment back
    /// into fixes, arcs, and placements. The model is consumed; the
    /// encoder keeps only the read-side indexes.
    pub fn solve(
        &mut self,
        options: &SolverOptions,
    ) -> (SolveOutcome, Option<DecodedAssignment>) {
        self.encode();
        let model = self
            .model
            .take()
            .expect("encode() always leaves a model behind");

        let outcome = SatSolver::new(options.clone()).solve(model);
        let decoded = outcome
            .assignment
            .as_ref()
            .map(|assignment| self.extract(assignment));
        (outcome, decoded)
    }

    pub fn statistics(&self) -> Option<&EncodingStatistics> {
        self.statistics.as_ref()
    }

    fn extract(&self, assignment: &Assignment) -> DecodedAssignment {
        let arena = self
            .arena
            .as_ref()
            .expect("extraction requires an encoded model");

        let active_nodes = (0..arena.node_count())
            .filter(|&node| assignment.value(arena.activity(node)))
            .collect();
        let used_arcs = arena
            .arcs()
            .iter()
            .filter(|arc| assignment.value(arc.var))
            .map(|arc| (arc.head, arc.tail))
            .collect();
        let chosen_loops = (0..arena.node_count())
            .filter(|&node| {
                arena
                    .self_loop(node)
                    .is_some_and(|var| assignment.value(var))
            })
            .collect();
        let placements = arena
            .placements()
            .iter()
            .filter(|p| assignment.value(p.var))
            .map(|p| (p.cell, p.node, p.role))
            .collect();

        DecodedAssignment {
            active_nodes,
            used_arcs,
            chosen_loops,
            placements,
        }
    }
}
