//! Validated puzzle parameters

use super::ShapeClass;
use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// A tiling request: cover a `rows x cols` grid with the given pieces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleSpec {
    pub rows: usize,
    pub cols: usize,
    pub pieces: Vec<ShapeClass>,
}

impl PuzzleSpec {
    /// Validate raw parameters before anything is encoded
    pub fn new(rows: usize, cols: usize, shape_ids: &[u8]) -> Result<Self, ConfigurationError> {
        if rows == 0 || cols == 0 {
            return Err(ConfigurationError::ZeroDimension { rows, cols });
        }
        if shape_ids.is_empty() {
            return Err(ConfigurationError::NoPieces);
        }

        let pieces = shape_ids
            .iter()
            .enumerate()
            .map(|(position, &id)| {
                ShapeClass::from_id(id).ok_or(ConfigurationError::UnknownShape { position, id })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_shapes(rows, cols, pieces)
    }

    /// Validate parameters whose shapes are already typed
    pub fn from_shapes(rows: usize, cols: usize, pieces: Vec<ShapeClass>) -> Result<Self, ConfigurationError> {
        if rows == 0 || cols == 0 {
            return Err(ConfigurationError::ZeroDimension { rows, cols });
        }
        if pieces.is_empty() {
            return Err(ConfigurationError::NoPieces);
        }

        let cells = rows.saturating_mul(cols);
        let covered = pieces.len().saturating_mul(4);
        if cells != covered {
            return Err(ConfigurationError::AreaMismatch {
                rows,
                cols,
                cells,
                pieces: pieces.len(),
                covered,
            });
        }

        Ok(Self { rows, cols, pieces })
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }
}
