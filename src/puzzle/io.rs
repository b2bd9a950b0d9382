//! File I/O for region descriptions

use super::region::{Cell, Region};
use anyhow::{Context, Result};
use std::path::Path;

/// Load a region from a text file.
///
/// Format: each line is one row of whitespace-separated tokens, `.` for
/// an open cell, `_` for a hole (the coordinate is not part of the
/// region), or an integer for a cell with that clue label.
pub fn load_region_from_file<P: AsRef<Path>>(path: P) -> Result<Region> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read region file: {}", path.as_ref().display()))?;

    parse_region_from_string(&content)
        .with_context(|| format!("Failed to parse region from file: {}", path.as_ref().display()))
}

/// Parse a region from its text representation.
pub fn parse_region_from_string(content: &str) -> Result<Region> {
    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Region file is empty or contains no valid rows");
    }

    let mut region = Region::new();
    for (y, line) in lines.iter().enumerate() {
        for (x, token) in line.split_whitespace().enumerate() {
            let cell = Cell::new(x as i32, y as i32);
            match token {
                "_" => {}
                "." => region.insert(cell, None),
                value => {
                    let clue = value.parse().with_context(|| {
                        format!("Invalid token '{}' at row {}, column {}", value, y, x)
                    })?;
                    region.insert(cell, Some(clue));
                }
            }
        }
    }

    if region.is_empty() {
        anyhow::bail!("Region contains no cells");
    }

    Ok(region)
}

/// Save a region to a text file.
pub fn save_region_to_file<P: AsRef<Path>>(region: &Region, path: P) -> Result<()> {
    let content = region_to_string(region);

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write region to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Convert a region to its text representation.
pub fn region_to_string(region: &Region) -> String {
    let Some((min, max)) = region.bounds() else {
        return String::new();
    };

    let mut result = String::new();
    for y in min.y..=max.y {
        let mut row = Vec::new();
        for x in min.x..=max.x {
            let cell = Cell::new(x, y);
            if !region.contains(cell) {
                row.push("_".to_string());
            } else {
                match region.clue(cell) {
                    Some(value) => row.push(value.to_string()),
                    None => row.push(".".to_string()),
                }
            }
        }
        result.push_str(&row.join(" "));
        result.push('\n');
    }

    result
}

/// Write example region files for the `setup` command.
///
/// `open_3x4.txt` fits the complete size-2 set; `clued_5x6.txt` is a
/// fully-labeled size-4 puzzle with a known solution.
pub fn create_example_regions<P: AsRef<Path>>(output_dir: P) -> Result<Vec<String>> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut written = Vec::new();

    let open = Region::rect(4, 3);
    let open_path = dir.join("open_3x4.txt");
    save_region_to_file(&open, &open_path)?;
    written.push(open_path.display().to_string());

    let mut clued = Region::rect(5, 6);
    let rows: [[u8; 5]; 6] = [
        [0, 2, 2, 2, 2],
        [0, 0, 0, 3, 4],
        [1, 3, 3, 3, 4],
        [1, 1, 1, 4, 4],
        [4, 0, 0, 1, 1],
        [4, 3, 3, 2, 2],
    ];
    for (y, row) in rows.iter().enumerate() {
        for (x, value) in row.iter().enumerate() {
            clued.insert(Cell::new(x as i32, y as i32), Some(*value));
        }
    }
    let clued_path = dir.join("clued_5x6.txt");
    save_region_to_file(&clued, &clued_path)?;
    written.push(clued_path.display().to_string());

    Ok(written)
}
