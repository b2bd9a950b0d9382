//! Independent validation of decoded solutions
//!
//! The validator re-checks every invariant the model is supposed to
//! enforce, using only the decoded solution and the puzzle definition.
//! It is the regression net for the glue constraints: a tour and a
//! cover that fail to describe the same tiling pass the engine but are
//! caught here.

use super::solution::Solution;
use crate::puzzle::{Cell, Region, Role};
use rayon::prelude::*;

/// Outcome of validating one solution.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
    pub metrics: ValidationMetrics,
}

/// One broken invariant, with the cell involved when there is one.
#[derive(Debug, Clone)]
pub struct Violation {
    pub description: String,
    pub cell: Option<Cell>,
}

impl Violation {
    fn at(cell: Cell, description: String) -> Self {
        Self {
            description,
            cell: Some(cell),
        }
    }

    fn global(description: String) -> Self {
        Self {
            description,
            cell: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationMetrics {
    pub cells_checked: usize,
    pub pieces_checked: usize,
    pub validation_time_ms: u64,
}

/// Validates solutions against a region and an expected piece count.
pub struct ChainValidator {
    region: Region,
    piece_count: usize,
}

impl ChainValidator {
    pub fn new(region: Region, piece_count: usize) -> Self {
        Self {
            region,
            piece_count,
        }
    }

    pub fn validate(&self, solution: &Solution) -> ValidationResult {
        let start = std::time::Instant::now();
        let mut violations = Vec::new();

        violations.extend(self.check_cover(solution));
        violations.extend(self.check_pieces(solution));
        violations.extend(self.check_chain(solution));
        violations.extend(self.check_chain_matches_space(solution));

        let metrics = ValidationMetrics {
            cells_checked: self.region.cell_count(),
            pieces_checked: self.piece_count,
            validation_time_ms: start.elapsed().as_millis() as u64,
        };

        ValidationResult {
            is_valid: violations.is_empty(),
            violations,
            metrics,
        }
    }

    /// Exact cover and clue compliance, cell by cell.
    fn check_cover(&self, solution: &Solution) -> Vec<Violation> {
        let cell_map = solution.cell_map();

        let mut violations: Vec<Violation> = self
            .region
            .entries()
            .collect::<Vec<_>>()
            .par_iter()
            .filter_map(|&(cell, clue)| match cell_map.get(&cell) {
                None => Some(Violation::at(cell, "cell is not covered".to_string())),
                Some(half) => match clue {
                    Some(label) if half.value != label => Some(Violation::at(
                        cell,
                        format!("clue {} but placed value {}", label, half.value),
                    )),
                    _ => None,
                },
            })
            .collect();

        for half in &solution.halves {
            if !self.region.contains(half.cell) {
                violations.push(Violation::at(
                    half.cell,
                    "placement outside the region".to_string(),
                ));
            }
        }
        if solution.halves.len() != self.region.cell_count() {
            violations.push(Violation::global(format!(
                "{} halves placed over {} cells",
                solution.halves.len(),
                self.region.cell_count()
            )));
        }
        violations
    }

    /// Every piece occupies exactly two orthogonally adjacent cells,
    /// one head and one tail of the same fix.
    fn check_pieces(&self, solution: &Solution) -> Vec<Violation> {
        (0..self.piece_count)
            .into_par_iter()
            .flat_map_iter(|piece| {
                let halves: Vec<_> = solution
                    .halves
                    .iter()
                    .filter(|half| half.piece == piece)
                    .collect();
                let mut violations = Vec::new();

                if halves.len() != 2 {
                    violations.push(Violation::global(format!(
                        "piece {} occupies {} cells",
                        piece,
                        halves.len()
                    )));
                    return violations.into_iter();
                }
                let (a, b) = (halves[0], halves[1]);
                if a.fix != b.fix || a.role == b.role {
                    violations.push(Violation::global(format!(
                        "piece {} is split across inconsistent halves",
                        piece
                    )));
                }
                if !a.cell.orthogonal().contains(&b.cell) {
                    violations.push(Violation::at(
                        a.cell,
                        format!("piece {} halves are not adjacent", piece),
                    ));
                }
                violations.into_iter()
            })
            .collect()
    }

    /// The chain visits every piece exactly once, each link is a legal
    /// continuation, and the tour closes.
    fn check_chain(&self, solution: &Solution) -> Vec<Violation> {
        let mut violations = Vec::new();
        let chain = &solution.chain;

        if chain.len() != self.piece_count {
            violations.push(Violation::global(format!(
                "chain visits {} pieces, expected {}",
                chain.len(),
                self.piece_count
            )));
            return violations;
        }

        let mut seen = vec![false; self.piece_count];
        for fix in chain {
            if seen[fix.piece] {
                violations.push(Violation::global(format!(
                    "chain visits piece {} twice",
                    fix.piece
                )));
            }
            seen[fix.piece] = true;
        }

        for i in 0..chain.len() {
            let here = &chain[i];
            let there = &chain[(i + 1) % chain.len()];
            if here.tail != there.head {
                violations.push(Violation::global(format!(
                    "chain link {} -> {} does not connect",
                    here, there
                )));
            }
        }
        violations
    }

    /// The glue invariant: each chain step is realized on the grid by
    /// the trailing half of one tile bordering the leading half of the
    /// next.
    fn check_chain_matches_space(&self, solution: &Solution) -> Vec<Violation> {
        // only meaningful when the grid was decoded alongside the chain
        if solution.halves.is_empty() {
            return Vec::new();
        }
        let mut violations = Vec::new();
        let chain = &solution.chain;
        for i in 0..chain.len() {
            let here = &chain[i];
            let there = &chain[(i + 1) % chain.len()];
            let (Some(tail_cell), Some(head_cell)) = (
                solution.end_cell(here, Role::Tail),
                solution.end_cell(there, Role::Head),
            ) else {
                violations.push(Violation::global(format!(
                    "chain step {} -> {} has unplaced ends",
                    here, there
                )));
                continue;
            };
            if !tail_cell.orthogonal().contains(&head_cell) {
                violations.push(Violation::at(
                    tail_cell,
                    format!(
                        "chain step {} -> {} is not spatially adjacent",
                        here, there
                    ),
                ));
            }
        }
        violations
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid {
            writeln!(f, "Solution is valid")?;
        } else {
            writeln!(f, "Solution is INVALID:")?;
            for violation in &self.violations {
                match violation.cell {
                    Some(cell) => writeln!(f, "  {}: {}", cell, violation.description)?,
                    None => writeln!(f, "  {}", violation.description)?,
                }
            }
        }
        writeln!(
            f,
            "  Checked {} cells, {} pieces in {}ms",
            self.metrics.cells_checked,
            self.metrics.pieces_checked,
            self.metrics.validation_time_ms
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::solution::PlacedHalf;
    use crate::puzzle::{Fix, PieceSet, Region};

    /// Hand-built valid solution: the size-1 pieces laid on a 2x3 grid
    /// as a path 0:0 -> 0:1 -> 1:1 (open chain closed artificially).
    ///
    /// The real model would reject this chain (it cannot close), so the
    /// fixture instead exercises the individual checks.
    fn open_path_solution() -> Solution {
        let fix = |piece, head, tail| Fix { piece, head, tail };
        let half = |x, y, fix: Fix, role| PlacedHalf {
            cell: Cell::new(x, y),
            piece: fix.piece,
            fix,
            role,
            value: match role {
                Role::Head => fix.head,
                Role::Tail => fix.tail,
            },
        };
        let f00 = fix(0, 0, 0);
        let f01 = fix(1, 0, 1);
        let f11 = fix(2, 1, 1);
        Solution {
            halves: vec![
                half(0, 0, f00, Role::Head),
                half(1, 0, f00, Role::Tail),
                half(2, 0, f01, Role::Head),
                half(2, 1, f01, Role::Tail),
                half(1, 1, f11, Role::Head),
                half(0, 1, f11, Role::Tail),
            ],
            chain: vec![f00, f01, f11],
            piece_count: 3,
            solve_time: std::time::Duration::default(),
        }
    }

    #[test]
    fn test_cover_and_pieces_pass() {
        let solution = open_path_solution();
        let validator = ChainValidator::new(Region::rect(3, 2), 3);
        let result = validator.validate(&solution);
        // the artificial chain cannot close (1:1 does not chain to 0:0),
        // so only chain violations may appear
        for violation in &result.violations {
            assert!(
                violation.description.contains("chain"),
                "unexpected violation: {}",
                violation.description
            );
        }
    }

    #[test]
    fn test_missing_cover_detected() {
        let mut solution = open_path_solution();
        solution.halves.pop();
        let validator = ChainValidator::new(Region::rect(3, 2), 3);
        let result = validator.validate(&solution);
        assert!(!result.is_valid);
        assert!(result
            .violations
            .iter()
            .any(|v| v.description.contains("not covered")));
    }

    #[test]
    fn test_clue_mismatch_detected() {
        let solution = open_path_solution();
        let mut region = Region::rect(3, 2);
        // cell (0,0) holds the head of 0:0, value 0
        region.insert(Cell::new(0, 0), Some(1));
        let validator = ChainValidator::new(region, 3);
        let result = validator.validate(&solution);
        assert!(result
            .violations
            .iter()
            .any(|v| v.description.contains("clue")));
    }

    #[test]
    fn test_split_piece_detected() {
        let mut solution = open_path_solution();
        // tear one piece apart
        solution.halves[1].cell = Cell::new(2, 1);
        solution.halves[3].cell = Cell::new(1, 0);
        let validator = ChainValidator::new(Region::rect(3, 2), 3);
        let result = validator.validate(&solution);
        assert!(result
            .violations
            .iter()
            .any(|v| v.description.contains("not adjacent")));
    }

    #[test]
    fn test_chain_length_checked() {
        let mut solution = open_path_solution();
        solution.chain.pop();
        let validator = ChainValidator::new(Region::rect(3, 2), 3);
        let result = validator.validate(&solution);
        assert!(result
            .violations
            .iter()
            .any(|v| v.description.contains("chain visits")));
    }

    #[test]
    fn test_validates_real_solved_instance() {
        use crate::sat::{ChainEncoder, SolverOptions};

        let set = PieceSet::complete(2);
        let region = Region::rect(4, 3);
        let mut encoder = ChainEncoder::new(&set, region.clone());
        let (outcome, decoded) = encoder.solve(&SolverOptions::default());
        assert!(outcome.status.is_success());

        let solution = Solution::from_decoded(
            encoder.library(),
            &decoded.unwrap(),
            outcome.statistics.solve_time,
        )
        .unwrap();

        let validator = ChainValidator::new(region, set.len());
        let result = validator.validate(&solution);
        assert!(result.is_valid, "{}", result);
    }
}
