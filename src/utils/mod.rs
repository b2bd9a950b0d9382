//! Shared utilities

pub mod display;

pub use display::SolutionFormatter;
