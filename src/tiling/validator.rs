//! Independent checking of decoded layouts

use crate::error::EncodingBug;
use crate::tetromino::{anchored_cells, Layout, ShapeClass};
use anyhow::Result;
use std::collections::BTreeSet;
use std::time::Instant;

/// Where one piece instance sits: its anchor cell (role 0) and orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub piece: usize,
    pub anchor: (usize, usize),
    /// Index into the shape's orientation table
    pub orientation: usize,
}

impl Placement {
    /// Cells covered by this placement in role order, `None` if any is off the board
    pub fn cells(&self, shape: ShapeClass, rows: usize, cols: usize) -> Option<[(usize, usize); 4]> {
        let orientation = shape.orientations().get(self.orientation)?;
        let mut cells = [(0, 0); 4];
        for (slot, (row, col)) in cells
            .iter_mut()
            .zip(anchored_cells(self.anchor.0 as isize, self.anchor.1 as isize, orientation))
        {
            if row < 0 || col < 0 || row as usize >= rows || col as usize >= cols {
                return None;
            }
            *slot = (row as usize, col as usize);
        }
        Some(cells)
    }
}

/// Result of layout validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// One entry per piece that was recognised
    pub placements: Vec<Placement>,
    pub issues: Vec<PieceIssue>,
    pub validation_time_ms: u64,
}

/// A piece whose cells do not form its declared shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceIssue {
    pub piece: usize,
    pub shape: ShapeClass,
    pub description: String,
}

/// Checks that every piece of a layout covers exactly one orientation of its shape
#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutValidator;

impl LayoutValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate every piece of `layout`
    pub fn validate(&self, layout: &Layout) -> ValidationResult {
        let start_time = Instant::now();
        let mut placements = Vec::with_capacity(layout.pieces.len());
        let mut issues = Vec::new();

        for (piece, &shape) in layout.pieces.iter().enumerate() {
            match self.find_placement(layout, piece) {
                Ok(placement) => placements.push(placement),
                Err(description) => issues.push(PieceIssue {
                    piece,
                    shape,
                    description,
                }),
            }
        }

        ValidationResult {
            is_valid: issues.is_empty(),
            placements,
            issues,
            validation_time_ms: start_time.elapsed().as_millis() as u64,
        }
    }

    /// Placements of all pieces, or the first broken piece as an [`EncodingBug`]
    pub fn placements(&self, layout: &Layout) -> Result<Vec<Placement>, EncodingBug> {
        (0..layout.pieces.len())
            .map(|piece| {
                self.find_placement(layout, piece)
                    .map_err(|reason| EncodingBug::InvalidPlacement { piece, reason })
            })
            .collect()
    }

    fn find_placement(&self, layout: &Layout, piece: usize) -> Result<Placement, String> {
        let shape = layout.pieces[piece];
        let covered: BTreeSet<(usize, usize)> = layout.cells_of(piece).into_iter().collect();
        if covered.len() != 4 {
            return Err(format!("{} covers {} cells, expected 4", shape.name(), covered.len()));
        }

        for &anchor in &covered {
            for orientation in 0..shape.orientations().len() {
                let candidate = Placement {
                    piece,
                    anchor,
                    orientation,
                };
                let fits = candidate
                    .cells(shape, layout.rows, layout.cols)
                    .is_some_and(|cells| cells.iter().all(|cell| covered.contains(cell)));
                if fits {
                    return Ok(candidate);
                }
            }
        }

        Err(format!("cells {:?} do not form a {}", covered, shape.name()))
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Layout Validation:")?;
        writeln!(f, "  Valid: {}", self.is_valid)?;
        writeln!(f, "  Pieces placed: {}", self.placements.len())?;
        for issue in &self.issues {
            writeln!(f, "  Piece {} ({}): {}", issue.piece, issue.shape.name(), issue.description)?;
        }
        Ok(())
    }
}
