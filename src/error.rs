//! Error types for puzzle validation and encoding consistency

use thiserror::Error;

/// A puzzle description that cannot be encoded.
///
/// Raised before any formula is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("grid dimensions must be positive (got {rows}x{cols})")]
    ZeroDimension { rows: usize, cols: usize },

    #[error("the piece list is empty")]
    NoPieces,

    #[error("unknown shape id {id} at position {position} (expected 1..=7)")]
    UnknownShape { position: usize, id: u8 },

    #[error("a {rows}x{cols} grid has {cells} cells but {pieces} tetrominoes cover {covered}")]
    AreaMismatch {
        rows: usize,
        cols: usize,
        cells: usize,
        pieces: usize,
        covered: usize,
    },

    #[error("problem needs {required} variables, more than the {limit} a CNF formula can index")]
    TooManyVariables { required: usize, limit: usize },

    #[error("invalid piece list '{input}': {reason}")]
    InvalidPieceList { input: String, reason: String },
}

/// An internal invariant violation between the encoder, the solver and the decoder.
///
/// These are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingBug {
    #[error("cell ({row}, {col}) has {true_count} true variables, expected exactly one")]
    DecodeInconsistency {
        row: usize,
        col: usize,
        true_count: usize,
    },

    #[error("piece {piece} has no valid placement in the decoded layout: {reason}")]
    InvalidPlacement { piece: usize, reason: String },

    #[error("tiling {id} was found twice while enumerating")]
    RepeatedTiling { id: String },
}
