//! Solving tiling puzzles: decoding, validation and enumeration

pub mod decoder;
pub mod problem;
pub mod solution;
pub mod validator;

pub use decoder::SolutionDecoder;
pub use problem::{TilingOutcome, TilingProblem};
pub use solution::{Solution, SolutionMetadata, SolutionSummary};
pub use validator::{LayoutValidator, PieceIssue, Placement, ValidationResult};
