//! Orientation canonicalization for point-set shapes
//!
//! The chain solvers only need the two-ended domino orientations from
//! [`crate::puzzle::piece`], but the tiling solvers built on the same core
//! work with general polyomino and polycube shapes. Canonicalization is
//! the same in every case: apply each element of the applicable symmetry
//! group, re-normalize the image against the origin, and collapse
//! duplicates by content so the returned orientations are exhaustive and
//! minimal.

use std::collections::BTreeSet;

/// A polyomino as a normalized set of unit squares.
///
/// Normalized means translated so every coordinate is non-negative and
/// both axes touch zero, with points stored sorted; two shapes are equal
/// exactly when their normalized point lists are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlanarShape {
    points: Vec<(i32, i32)>,
}

impl PlanarShape {
    pub fn new(points: impl IntoIterator<Item = (i32, i32)>) -> Self {
        Self {
            points: normalize_2d(points.into_iter().collect()),
        }
    }

    pub fn points(&self) -> &[(i32, i32)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The geometrically distinct images of this shape under the
    /// 8-element dihedral group (rotations by quarter turns, with and
    /// without reflection).
    pub fn orientations(&self) -> Vec<PlanarShape> {
        let mut seen = BTreeSet::new();
        for element in 0..8 {
            let image = self
                .points
                .iter()
                .map(|&(a, b)| match element {
                    0 => (a, b),
                    1 => (-b, a),
                    2 => (-a, -b),
                    3 => (b, -a),
                    4 => (b, a),
                    5 => (-a, b),
                    6 => (-b, -a),
                    _ => (a, -b),
                })
                .collect();
            seen.insert(PlanarShape {
                points: normalize_2d(image),
            });
        }
        seen.into_iter().collect()
    }
}

/// A polycube as a normalized set of unit cubes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SolidShape {
    points: Vec<(i32, i32, i32)>,
}

impl SolidShape {
    pub fn new(points: impl IntoIterator<Item = (i32, i32, i32)>) -> Self {
        Self {
            points: normalize_3d(points.into_iter().collect()),
        }
    }

    pub fn points(&self) -> &[(i32, i32, i32)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The geometrically distinct images of this shape under the 24
    /// orientation-preserving rotations of the cube.
    pub fn orientations(&self) -> Vec<SolidShape> {
        let mut seen = BTreeSet::new();
        for element in 0..24 {
            let image = self
                .points
                .iter()
                .map(|&p| rotate_3d(p, element))
                .collect();
            seen.insert(SolidShape {
                points: normalize_3d(image),
            });
        }
        seen.into_iter().collect()
    }
}

/// One of the 24 rotations, as sequences of 90-degree turns.
fn rotate_3d((a, b, c): (i32, i32, i32), element: usize) -> (i32, i32, i32) {
    match element {
        0 => (a, b, c),
        1 => (-b, a, c),
        2 => (-a, -b, c),
        3 => (b, -a, c),
        4 => (-c, b, a),
        5 => (-b, -c, a),
        6 => (c, -b, a),
        7 => (b, c, a),
        8 => (-a, b, -c),
        9 => (-b, -a, -c),
        10 => (a, -b, -c),
        11 => (b, a, -c),
        12 => (c, b, -a),
        13 => (-b, c, -a),
        14 => (b, -c, -a),
        15 => (-c, -b, -a),
        16 => (a, -c, b),
        17 => (c, a, b),
        18 => (-a, c, b),
        19 => (-c, -a, b),
        20 => (-a, -c, -b),
        21 => (a, c, -b),
        22 => (-c, a, -b),
        _ => (c, -a, -b),
    }
}

fn normalize_2d(mut points: Vec<(i32, i32)>) -> Vec<(i32, i32)> {
    points.sort_unstable();
    points.dedup();
    if points.is_empty() {
        return points;
    }
    let min_x = points.iter().map(|p| p.0).min().unwrap_or(0);
    let min_y = points.iter().map(|p| p.1).min().unwrap_or(0);
    for p in &mut points {
        p.0 -= min_x;
        p.1 -= min_y;
    }
    points
}

fn normalize_3d(mut points: Vec<(i32, i32, i32)>) -> Vec<(i32, i32, i32)> {
    points.sort_unstable();
    points.dedup();
    if points.is_empty() {
        return points;
    }
    let min_x = points.iter().map(|p| p.0).min().unwrap_or(0);
    let min_y = points.iter().map(|p| p.1).min().unwrap_or(0);
    let min_z = points.iter().map(|p| p.2).min().unwrap_or(0);
    for p in &mut points {
        p.0 -= min_x;
        p.1 -= min_y;
        p.2 -= min_z;
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_touches_origin() {
        let shape = PlanarShape::new([(3, 5), (4, 5), (3, 6)]);
        assert_eq!(shape.points(), &[(0, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn test_domino_bar_has_two_orientations() {
        let bar = PlanarShape::new([(0, 0), (1, 0)]);
        assert_eq!(bar.orientations().len(), 2);
    }

    #[test]
    fn test_square_is_fully_symmetric() {
        let square = PlanarShape::new([(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(square.orientations().len(), 1);
    }

    #[test]
    fn test_l_tetromino_orientation_count() {
        // The chiral L has all 8 images distinct.
        let l = PlanarShape::new([(0, 0), (0, 1), (0, 2), (1, 0)]);
        assert_eq!(l.orientations().len(), 8);
    }

    #[test]
    fn test_s_tetromino_orientation_count() {
        // S/Z: 4 per chirality because of 180-degree symmetry.
        let s = PlanarShape::new([(1, 0), (2, 0), (0, 1), (1, 1)]);
        assert_eq!(s.orientations().len(), 4);
    }

    #[test]
    fn test_orientations_are_pairwise_distinct() {
        let t = PlanarShape::new([(0, 0), (1, 0), (2, 0), (1, 1)]);
        let orientations = t.orientations();
        for (i, a) in orientations.iter().enumerate() {
            for b in orientations.iter().skip(i + 1) {
                assert_ne!(a.points(), b.points());
            }
        }
    }

    #[test]
    fn test_unit_cube_has_one_orientation() {
        let cube = SolidShape::new([(0, 0, 0)]);
        assert_eq!(cube.orientations().len(), 1);
    }

    #[test]
    fn test_solid_bar_has_three_orientations() {
        // A 1x1x2 bar aligns with each axis.
        let bar = SolidShape::new([(0, 0, 0), (0, 0, 1)]);
        assert_eq!(bar.orientations().len(), 3);
    }

    #[test]
    fn test_rotation_group_is_closed_and_complete() {
        // A corner with arms of lengths 2, 1, 1 has a trivial rotation
        // stabilizer, so all 24 images must be distinct; an incorrect
        // table would collapse some of them.
        let tripod = SolidShape::new([(0, 0, 0), (1, 0, 0), (2, 0, 0), (0, 1, 0), (0, 0, 1)]);
        assert_eq!(tripod.orientations().len(), 24);
    }
}
