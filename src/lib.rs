//! Chain-tiling puzzle solver
//!
//! Encodes chain-tiling puzzles (dominoes as the representative case)
//! into a boolean constraint model: a circuit constraint orders the
//! tiles into one closed chain, an exact-cover constraint lays their
//! halves onto the grid, and glue constraints force both views to
//! describe the same physical tiling. The model is handed to an
//! external SAT engine; solutions are decoded back into a labeled grid
//! and a traversable chain.

pub mod chain;
pub mod config;
pub mod error;
pub mod puzzle;
pub mod sat;
pub mod utils;

pub use chain::{ChainProblem, Solution};
pub use config::Settings;
pub use error::{ReconstructionError, SolveError};

/// Solve the chain puzzle described by `settings`.
pub fn solve_chain(settings: Settings) -> anyhow::Result<Solution> {
    let mut problem = ChainProblem::new(settings)?;
    Ok(problem.solve()?)
}
