//! End-to-end chain puzzle orchestration

use super::solution::Solution;
use super::validator::ChainValidator;
use crate::config::Settings;
use crate::error::{ReconstructionError, SolveError};
use crate::puzzle::{load_region_from_file, PieceSet, Region};
use crate::sat::{ChainEncoder, EncodingStatistics, SolveStatus};
use anyhow::{Context, Result};
use std::time::Instant;

/// One puzzle instance: the piece set, the region, and the pipeline
/// that connects them to the engine.
///
/// Each instance owns its own model; concurrent solves need separate
/// instances and share nothing.
pub struct ChainProblem {
    settings: Settings,
    piece_set: PieceSet,
    region: Region,
    encoder: ChainEncoder,
}

impl ChainProblem {
    /// Create a problem from settings, loading the region file.
    pub fn new(settings: Settings) -> Result<Self> {
        let region = load_region_from_file(&settings.puzzle.region_file)
            .context("Failed to load region file")?;
        Self::with_region(settings, region)
    }

    /// Create a problem with an explicit region (useful for testing).
    pub fn with_region(settings: Settings, region: Region) -> Result<Self> {
        let piece_set = PieceSet::complete(settings.puzzle.piece_size);
        let encoder = ChainEncoder::new(&piece_set, region.clone());
        Ok(Self {
            settings,
            piece_set,
            region,
            encoder,
        })
    }

    /// Encode, solve, decode, and validate.
    ///
    /// Infeasibility and timeout come back as typed errors; a
    /// reconstruction or validation failure on a "successful"
    /// assignment also errors, because it means the model was too weak.
    pub fn solve(&mut self) -> std::result::Result<Solution, SolveError> {
        let start = Instant::now();

        println!(
            "Solving chain puzzle: {} pieces (size {}), {} cells, {} clues",
            self.piece_set.len(),
            self.piece_set.max_value(),
            self.region.cell_count(),
            self.region.clue_count()
        );

        self.encoder.encode();
        if let Some(stats) = self.encoder.statistics() {
            println!("{}", stats);
        }

        let options = self.settings.solver.options();
        let (outcome, decoded) = self.encoder.solve(&options);

        match outcome.status {
            SolveStatus::Infeasible => {
                return Err(SolveError::Infeasible {
                    pieces: self.piece_set.len(),
                    cells: self.region.cell_count(),
                    elapsed: start.elapsed(),
                });
            }
            SolveStatus::Timeout => {
                return Err(SolveError::Timeout {
                    budget: options.time_budget,
                    elapsed: start.elapsed(),
                });
            }
            SolveStatus::Feasible | SolveStatus::Optimal => {}
        }

        let decoded = decoded.ok_or_else(|| {
            SolveError::Reconstruction(ReconstructionError::Invariant(
                "engine reported success without an assignment".to_string(),
            ))
        })?;

        let solution = Solution::from_decoded(
            self.encoder.library(),
            &decoded,
            outcome.statistics.solve_time,
        )?;

        let validator = ChainValidator::new(self.region.clone(), self.piece_set.len());
        let validation = validator.validate(&solution);
        if !validation.is_valid {
            let first = validation
                .violations
                .first()
                .map(|v| v.description.clone())
                .unwrap_or_else(|| "unknown violation".to_string());
            return Err(SolveError::Reconstruction(ReconstructionError::Invariant(
                first,
            )));
        }

        println!(
            "Solved in {:.3}s: {}",
            outcome.statistics.solve_time.as_secs_f64(),
            solution.format_chain()
        );
        Ok(solution)
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn piece_set(&self) -> &PieceSet {
        &self.piece_set
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn encoding_statistics(&mut self) -> Option<EncodingStatistics> {
        self.encoder.encode();
        self.encoder.statistics().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::puzzle::Cell;

    fn settings(piece_size: u8) -> Settings {
        let mut settings = Settings::default();
        settings.puzzle.piece_size = piece_size;
        settings.solver.time_budget_seconds = 60;
        settings
    }

    #[test]
    fn test_feasible_size_two_on_3x4() {
        let mut problem =
            ChainProblem::with_region(settings(2), Region::rect(4, 3)).unwrap();
        let solution = problem.solve().unwrap();

        assert_eq!(solution.chain.len(), 6);
        assert_eq!(solution.halves.len(), 12);
        // chain closes: last tail meets first head
        let first = solution.chain.first().unwrap();
        let last = solution.chain.last().unwrap();
        assert_eq!(last.tail, first.head);
    }

    #[test]
    fn test_infeasible_size_one_chain_parity() {
        // 6 cells fit the 3 size-1 pieces spatially, but the complete
        // size-1 set admits no closed chain
        let mut problem =
            ChainProblem::with_region(settings(1), Region::rect(3, 2)).unwrap();
        let err = problem.solve().unwrap_err();
        assert!(matches!(err, SolveError::Infeasible { pieces: 3, cells: 6, .. }));
    }

    #[test]
    fn test_infeasible_odd_cell_count() {
        let mut problem =
            ChainProblem::with_region(settings(1), Region::rect(5, 1)).unwrap();
        let err = problem.solve().unwrap_err();
        assert!(matches!(err, SolveError::Infeasible { cells: 5, .. }));
    }

    #[test]
    fn test_infeasible_contradictory_clues() {
        // every cell labeled 0: pieces without a 0 cannot rest anywhere
        let mut region = Region::rect(4, 3);
        for cell in region.cells().collect::<Vec<_>>() {
            region.insert(cell, Some(0));
        }
        let mut problem = ChainProblem::with_region(settings(2), region).unwrap();
        let err = problem.solve().unwrap_err();
        assert!(matches!(err, SolveError::Infeasible { .. }));
    }

    #[test]
    fn test_resolving_yields_valid_solution_each_time() {
        // satisfiability, not uniqueness: each solve must produce a
        // structurally valid solution, not necessarily the same one
        for _ in 0..2 {
            let mut problem =
                ChainProblem::with_region(settings(2), Region::rect(4, 3)).unwrap();
            let solution = problem.solve().unwrap();
            let validator = ChainValidator::new(Region::rect(4, 3), 6);
            assert!(validator.validate(&solution).is_valid);
        }
    }

    #[test]
    fn test_clued_region_forces_values() {
        // pin one corner to 2: the solved grid must show a 2 there
        let mut region = Region::rect(4, 3);
        region.insert(Cell::new(0, 0), Some(2));
        let mut problem = ChainProblem::with_region(settings(2), region).unwrap();
        let solution = problem.solve().unwrap();
        let map = solution.cell_map();
        assert_eq!(map[&Cell::new(0, 0)].value, 2);
    }
}
