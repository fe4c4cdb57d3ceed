//! Tetromino Tiling SAT Solver
//!
//! This library covers a rectangular grid exactly with a given multiset of
//! tetrominoes by encoding the puzzle as a CNF formula and handing it to a
//! SAT solver.

pub mod config;
pub mod error;
pub mod sat;
pub mod tetromino;
pub mod tiling;
pub mod utils;

pub use config::Settings;
pub use error::{ConfigurationError, EncodingBug};
pub use tetromino::{Layout, PuzzleSpec, ShapeClass};
pub use tiling::{Solution, TilingOutcome, TilingProblem};

use anyhow::Result;
use sat::CadicalBackend;

/// Main entry point: tile a `rows x cols` grid with pieces given as shape ids
pub fn solve_tiling(rows: usize, cols: usize, pieces: &[u8]) -> Result<TilingOutcome> {
    let puzzle = PuzzleSpec::new(rows, cols, pieces)?;
    TilingProblem::from_puzzle(puzzle, true)?.solve(&CadicalBackend::new())
}

/// Solve the puzzle described by `settings`, returning up to `max_solutions` tilings
pub fn solve_with_settings(settings: &Settings) -> Result<Vec<Solution>> {
    settings.validate()?;
    TilingProblem::new(settings)?.solve_all(&CadicalBackend::new(), settings.solver.max_solutions)
}
