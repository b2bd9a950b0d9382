//! Puzzle domain model: pieces, orientations, and regions

pub mod io;
pub mod piece;
pub mod region;
pub mod shape;

pub use io::{
    create_example_regions, load_region_from_file, parse_region_from_string, region_to_string,
    save_region_to_file,
};
pub use piece::{Fix, FixLibrary, NodeId, Piece, PieceId, PieceSet, Role, Value};
pub use region::{Cell, Region};
pub use shape::{PlanarShape, SolidShape};
