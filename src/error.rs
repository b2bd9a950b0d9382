//! Error taxonomy for the chain-tiling solver

use std::time::Duration;
use thiserror::Error;

/// Terminal outcomes of a solve attempt that do not produce a solution.
///
/// `Infeasible` and `Timeout` come from the solving engine; a
/// `Reconstruction` error means the engine reported a satisfying
/// assignment but decoding it exposed a defect in the constraint model.
/// None of these are retried internally.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The engine proved that no assignment satisfies the model.
    #[error("no chain tiling exists: {pieces} pieces over {cells} cells (proved in {elapsed:?})")]
    Infeasible {
        pieces: usize,
        cells: usize,
        elapsed: Duration,
    },

    /// The engine exhausted its wall-clock budget without a conclusive
    /// answer. The caller may retry with a larger budget.
    #[error("solver exhausted its {budget:?} time budget (gave up after {elapsed:?})")]
    Timeout { budget: Duration, elapsed: Duration },

    /// Decoding the assignment found arcs or placements that cannot
    /// describe one physical tiling.
    #[error("solution reconstruction failed: {0}")]
    Reconstruction(#[from] ReconstructionError),
}

/// Defects found while rebuilding the chain from a satisfying assignment.
///
/// Any of these indicates an under-constrained model, not an engine
/// failure, and is reported distinctly from [`SolveError::Infeasible`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconstructionError {
    #[error("more than one used arc leaves node {node}")]
    DuplicateArc { node: usize },

    #[error("no used arc leaves node {node}")]
    MissingArc { node: usize },

    #[error("tour revisited piece {piece} before closing")]
    RepeatedPiece { piece: usize },

    #[error("tour closed after {visited} of {expected} pieces")]
    ShortTour { visited: usize, expected: usize },

    #[error("{count} used arcs left over after the tour closed")]
    LeftoverArcs { count: usize },

    #[error("decoded solution violates an invariant: {0}")]
    Invariant(String),
}
