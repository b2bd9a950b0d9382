//! Console formatting for solved puzzles

use crate::chain::Solution;
use crate::puzzle::{Cell, PieceId, Value};
use std::collections::BTreeMap;

/// Formats solutions for display.
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Human-readable solution: grid plus, optionally, the chain order.
    pub fn format_solution(solution: &Solution, show_chain: bool) -> String {
        let mut result = String::new();

        result.push_str(&format!(
            "Chain of {} pieces found in {:.3}s\n\n",
            solution.piece_count,
            solution.solve_time.as_secs_f64()
        ));
        result.push_str(&Self::format_boxes(solution));
        if show_chain {
            result.push('\n');
            result.push_str("Chain order:\n");
            result.push_str(&solution.format_chain());
            result.push('\n');
        }

        result
    }

    /// Box-drawing rendering: cells show their pip value, walls run
    /// between halves that belong to different pieces.
    pub fn format_boxes(solution: &Solution) -> String {
        let cells: BTreeMap<Cell, (PieceId, Value)> = solution
            .cell_map()
            .into_iter()
            .map(|(cell, half)| (cell, (half.piece, half.value)))
            .collect();
        if cells.is_empty() {
            return String::new();
        }

        let min_x = cells.keys().map(|c| c.x).min().unwrap_or(0);
        let max_x = cells.keys().map(|c| c.x).max().unwrap_or(0);
        let min_y = cells.keys().map(|c| c.y).min().unwrap_or(0);
        let max_y = cells.keys().map(|c| c.y).max().unwrap_or(0);

        let piece_at =
            |x: i32, y: i32| cells.get(&Cell::new(x, y)).map(|(piece, _)| *piece);
        let value_at = |x: i32, y: i32| cells.get(&Cell::new(x, y)).map(|(_, value)| *value);

        let mut out = String::new();
        for y in min_y..=max_y + 1 {
            // border row: each corner plus the horizontal run to its right
            for x in min_x..=max_x + 1 {
                let nw = piece_at(x - 1, y - 1);
                let ne = piece_at(x, y - 1);
                let sw = piece_at(x - 1, y);
                let se = piece_at(x, y);
                out.push(box_char(nw != sw, ne != se, nw != ne, se != sw));
                if x <= max_x {
                    let run = box_char(ne != se, ne != se, false, false);
                    for _ in 0..3 {
                        out.push(run);
                    }
                }
            }
            out.push('\n');

            if y > max_y {
                break;
            }

            // content row: vertical walls between horizontally adjacent
            // halves of different pieces, values in between
            for x in min_x..=max_x + 1 {
                let left = piece_at(x - 1, y);
                let here = piece_at(x, y);
                let wall = left != here;
                out.push(box_char(false, false, wall, wall));
                if x <= max_x {
                    match value_at(x, y) {
                        Some(value) => out.push_str(&format!(" {} ", value_char(value))),
                        None => out.push_str("   "),
                    }
                }
            }
            out.push('\n');
        }

        out
    }

    /// One-line summary per solved puzzle.
    pub fn format_summary(solution: &Solution) -> String {
        format!(
            "{} pieces over {} cells, chain {}",
            solution.piece_count,
            solution.halves.len(),
            solution.format_chain()
        )
    }
}

/// Box-drawing character for a corner with the given walls.
fn box_char(west: bool, east: bool, north: bool, south: bool) -> char {
    const CHARS: [char; 16] = [
        ' ', '╸', '╺', '═', '╹', '╝', '╚', '╩', '╻', '╗', '╔', '╦', '║', '╣', '╠', '╬',
    ];
    let mut index = 0;
    for (bit, wall) in [west, east, north, south].into_iter().enumerate() {
        if wall {
            index |= 1 << bit;
        }
    }
    CHARS[index]
}

fn value_char(value: Value) -> char {
    char::from_digit(value as u32, 36).unwrap_or('?')
}
