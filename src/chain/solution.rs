//! Decoded solutions: a labeled grid plus a traversable chain order

use crate::error::ReconstructionError;
use crate::puzzle::{Cell, Fix, FixLibrary, PieceId, Role, Value};
use crate::sat::DecodedAssignment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// One half-tile resting on one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedHalf {
    pub cell: Cell,
    pub piece: PieceId,
    pub fix: Fix,
    pub role: Role,
    /// The pip value showing on this cell.
    pub value: Value,
}

/// A complete decoded solution.
///
/// Construction from a decoded assignment is where modeling defects
/// surface: if the used arcs do not form one clean tour through every
/// piece, the glue constraints were too weak, and that is reported as a
/// [`ReconstructionError`] rather than silently rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Every placed half, sorted by cell.
    pub halves: Vec<PlacedHalf>,
    /// The fixes in tour order, starting from the head of the first
    /// used arc. The tour closes: the last fix chains back to the first.
    pub chain: Vec<Fix>,
    pub piece_count: usize,
    #[serde(skip)]
    pub solve_time: Duration,
}

impl Solution {
    /// Rebuild grid and chain from the raw assignment.
    ///
    /// The chain is followed through a next-arc table built once from
    /// the used arcs, so reconstruction is linear in the piece count.
    pub fn from_decoded(
        library: &FixLibrary,
        decoded: &DecodedAssignment,
        solve_time: Duration,
    ) -> Result<Self, ReconstructionError> {
        let halves = Self::collect_halves(library, decoded)?;
        let chain = Self::follow_chain(library, decoded)?;

        Ok(Self {
            halves,
            chain,
            piece_count: library.piece_count(),
            solve_time,
        })
    }

    fn collect_halves(
        library: &FixLibrary,
        decoded: &DecodedAssignment,
    ) -> Result<Vec<PlacedHalf>, ReconstructionError> {
        let mut halves: Vec<PlacedHalf> = decoded
            .placements
            .iter()
            .map(|&(cell, node, role)| {
                let fix = library.fix(node);
                PlacedHalf {
                    cell,
                    piece: fix.piece,
                    fix: *fix,
                    role,
                    value: role.value_of(fix),
                }
            })
            .collect();
        halves.sort_by_key(|half| half.cell);

        for pair in halves.windows(2) {
            if pair[0].cell == pair[1].cell {
                return Err(ReconstructionError::Invariant(format!(
                    "cell {} is covered twice",
                    pair[0].cell
                )));
            }
        }
        Ok(halves)
    }

    fn follow_chain(
        library: &FixLibrary,
        decoded: &DecodedAssignment,
    ) -> Result<Vec<Fix>, ReconstructionError> {
        let expected = library.piece_count();
        let used = &decoded.used_arcs;
        if used.is_empty() {
            return Err(ReconstructionError::ShortTour {
                visited: 0,
                expected,
            });
        }

        let mut next: Vec<Option<usize>> = vec![None; library.node_count()];
        for &(head, tail) in used {
            if next[head].is_some() {
                return Err(ReconstructionError::DuplicateArc { node: head });
            }
            next[head] = Some(tail);
        }

        let start = used[0].0;
        let mut chain = Vec::with_capacity(expected);
        let mut visited = vec![false; expected];
        let mut node = start;
        let mut consumed = 0;
        loop {
            let fix = library.fix(node);
            if visited[fix.piece] {
                return Err(ReconstructionError::RepeatedPiece { piece: fix.piece });
            }
            visited[fix.piece] = true;
            chain.push(*fix);

            let Some(successor) = next[node].take() else {
                return Err(ReconstructionError::MissingArc { node });
            };
            consumed += 1;
            if successor == start {
                break;
            }
            node = successor;
        }

        if chain.len() < expected {
            return Err(ReconstructionError::ShortTour {
                visited: chain.len(),
                expected,
            });
        }
        let leftover = used.len() - consumed;
        if leftover > 0 {
            return Err(ReconstructionError::LeftoverArcs { count: leftover });
        }

        Ok(chain)
    }

    /// The grid as a cell-keyed map.
    pub fn cell_map(&self) -> BTreeMap<Cell, PlacedHalf> {
        self.halves.iter().map(|half| (half.cell, *half)).collect()
    }

    /// The two cells occupied by `piece`, if it was placed.
    pub fn piece_cells(&self, piece: PieceId) -> Vec<Cell> {
        self.halves
            .iter()
            .filter(|half| half.piece == piece)
            .map(|half| half.cell)
            .collect()
    }

    /// The cell holding the given end of `fix`, if placed.
    pub fn end_cell(&self, fix: &Fix, role: Role) -> Option<Cell> {
        self.halves
            .iter()
            .find(|half| half.fix == *fix && half.role == role)
            .map(|half| half.cell)
    }

    /// Chain order rendered as `0:0 -> 0:1 -> ... -> (0:0)`.
    pub fn format_chain(&self) -> String {
        let mut parts: Vec<String> = self.chain.iter().map(|fix| fix.to_string()).collect();
        if let Some(first) = self.chain.first() {
            parts.push(format!("({})", first));
        }
        parts.join(" -> ")
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}
