//! Constraint model construction and SAT engine integration

pub mod circuit;
pub mod encoder;
pub mod glue;
pub mod graph;
pub mod model;
pub mod placement;
pub mod solver;
pub mod variables;

pub use circuit::CircuitBuilder;
pub use encoder::{ChainEncoder, DecodedAssignment, EncodingStatistics};
pub use glue::GlueBuilder;
pub use graph::{domino_rule, ChainGraph, ConnectRule};
pub use model::{BoolVar, CircuitArc, Clause, Lit, Model};
pub use placement::PlacementBuilder;
pub use solver::{Assignment, SatSolver, SolveOutcome, SolveStatus, SolverOptions, SolverStatistics};
pub use variables::{ArcVar, PlacementVar, VariableArena};
