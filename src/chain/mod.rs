//! Chain puzzle orchestration: problem, solution, validation

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::ChainProblem;
pub use solution::{PlacedHalf, Solution};
pub use validator::{ChainValidator, ValidationResult, Violation};
