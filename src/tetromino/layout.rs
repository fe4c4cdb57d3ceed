//! Tiled grid representation

use super::ShapeClass;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rectangular grid where every cell names the piece instance covering it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layout {
    pub rows: usize,
    pub cols: usize,
    /// Shape class of every piece instance, in input order
    pub pieces: Vec<ShapeClass>,
    /// Piece index per cell, row-major
    pub cells: Vec<usize>,
}

impl Layout {
    /// Create a layout from row-major piece indices
    pub fn new(rows: usize, cols: usize, pieces: Vec<ShapeClass>, cells: Vec<usize>) -> Result<Self> {
        if cells.len() != rows * cols {
            anyhow::bail!("Layout has {} cells, expected {} for a {}x{} grid", cells.len(), rows * cols, rows, cols);
        }
        if let Some(&bad) = cells.iter().find(|&&piece| piece >= pieces.len()) {
            anyhow::bail!("Cell refers to piece {} but only {} pieces exist", bad, pieces.len());
        }

        Ok(Self { rows, cols, pieces, cells })
    }

    /// Create a layout from a 2D array of piece indices
    pub fn from_rows(pieces: Vec<ShapeClass>, rows: Vec<Vec<usize>>) -> Result<Self> {
        if rows.is_empty() {
            anyhow::bail!("Layout cannot be empty");
        }
        let height = rows.len();
        let width = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                anyhow::bail!("Row {} has length {}, expected {}", i, row.len(), width);
            }
        }

        Self::new(height, width, pieces, rows.into_iter().flatten().collect())
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Piece index covering `(row, col)`
    pub fn piece_at(&self, row: usize, col: usize) -> usize {
        self.cells[self.index(row, col)]
    }

    /// Shape class of the piece covering `(row, col)`
    pub fn shape_at(&self, row: usize, col: usize) -> ShapeClass {
        self.pieces[self.piece_at(row, col)]
    }

    /// Cells covered by `piece`, in row-major order
    pub fn cells_of(&self, piece: usize) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p == piece)
            .map(|(i, _)| (i / self.cols, i % self.cols))
            .collect()
    }

    /// Rows rendered as shape ids, e.g. `"1111"`
    pub fn shape_rows(&self) -> Vec<String> {
        (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| self.shape_at(row, col).to_string())
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.shape_rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ShapeClass::*;

    fn sample() -> Layout {
        Layout::from_rows(
            vec![Bar, Square, L, ReverseL],
            vec![
                vec![0, 0, 0, 0],
                vec![2, 1, 1, 3],
                vec![2, 1, 1, 3],
                vec![2, 2, 3, 3],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_layout_creation() {
        let layout = sample();
        assert_eq!(layout.rows, 4);
        assert_eq!(layout.cols, 4);
        assert_eq!(layout.piece_at(1, 0), 2);
        assert_eq!(layout.shape_at(3, 3), ReverseL);
    }

    #[test]
    fn test_display_matches_shape_ids() {
        assert_eq!(sample().to_string(), "1111\n3224\n3224\n3344\n");
    }

    #[test]
    fn test_cells_of() {
        assert_eq!(sample().cells_of(1), vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_invalid_layouts() {
        assert!(Layout::new(2, 2, vec![Square], vec![0, 0, 0]).is_err());
        assert!(Layout::new(2, 2, vec![Square], vec![0, 0, 0, 1]).is_err());
        assert!(Layout::from_rows(vec![Square], vec![vec![0, 0], vec![0]]).is_err());
        assert!(Layout::from_rows(vec![Square], vec![]).is_err());
    }
}
