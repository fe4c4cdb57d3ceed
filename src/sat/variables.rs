//! Variable management for SAT encoding
//!
//! One boolean variable exists per `(row, col, piece, role)` tuple. Ids are
//! computed arithmetically, so lookups in both directions are O(1) and no
//! table needs to be kept.

use crate::error::ConfigurationError;
use anyhow::Result;

/// Number of cells in a tetromino, and therefore of roles per piece
pub const ROLES: usize = 4;

/// Largest variable id a DIMACS literal (`i32`) can carry
pub const MAX_VARIABLES: usize = i32::MAX as usize;

/// A decision variable: cell `(row, col)` holds role `role` of piece instance `piece`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecisionVariable {
    pub row: usize,
    pub col: usize,
    pub piece: usize,
    pub role: usize,
}

/// Allocates and indexes the decision variables of one tiling problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSpace {
    rows: usize,
    cols: usize,
    pieces: usize,
}

impl VariableSpace {
    /// Create the variable space for a `rows x cols` grid and `pieces` piece instances
    pub fn new(rows: usize, cols: usize, pieces: usize) -> Result<Self, ConfigurationError> {
        let required = rows
            .checked_mul(cols)
            .and_then(|cells| cells.checked_mul(pieces))
            .and_then(|n| n.checked_mul(ROLES))
            .unwrap_or(usize::MAX);

        if required > MAX_VARIABLES {
            return Err(ConfigurationError::TooManyVariables {
                required,
                limit: MAX_VARIABLES,
            });
        }

        Ok(Self { rows, cols, pieces })
    }

    /// Variable id (1-based, DIMACS style) for the given tuple
    pub fn variable(&self, row: usize, col: usize, piece: usize, role: usize) -> Result<i32> {
        self.validate_variable(row, col, piece, role)?;
        Ok(self.id_unchecked(row, col, piece, role))
    }

    /// Variable id for a cell given as signed coordinates, `None` when off the board
    pub fn variable_at(&self, row: isize, col: isize, piece: usize, role: usize) -> Option<i32> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.rows || col >= self.cols || piece >= self.pieces || role >= ROLES {
            return None;
        }
        Some(self.id_unchecked(row, col, piece, role))
    }

    #[inline]
    fn id_unchecked(&self, row: usize, col: usize, piece: usize, role: usize) -> i32 {
        let index = ((row * self.cols + col) * self.pieces + piece) * ROLES + role;
        (index + 1) as i32
    }

    /// Inverse of [`VariableSpace::variable`]
    pub fn decode(&self, variable: i32) -> Option<DecisionVariable> {
        if variable < 1 || variable as usize > self.variable_count() {
            return None;
        }

        let mut index = variable as usize - 1;
        let role = index % ROLES;
        index /= ROLES;
        let piece = index % self.pieces;
        index /= self.pieces;
        let col = index % self.cols;
        let row = index / self.cols;

        Some(DecisionVariable { row, col, piece, role })
    }

    /// Every `(piece, role)` variable of cell `(row, col)`
    pub fn cell_variables(&self, row: usize, col: usize) -> Result<Vec<i32>> {
        let mut variables = Vec::with_capacity(self.pieces * ROLES);
        for piece in 0..self.pieces {
            for role in 0..ROLES {
                variables.push(self.variable(row, col, piece, role)?);
            }
        }
        Ok(variables)
    }

    /// The variable of every cell for one `(piece, role)` pair
    pub fn role_variables(&self, piece: usize, role: usize) -> Result<Vec<i32>> {
        let mut variables = Vec::with_capacity(self.rows * self.cols);
        for row in 0..self.rows {
            for col in 0..self.cols {
                variables.push(self.variable(row, col, piece, role)?);
            }
        }
        Ok(variables)
    }

    /// Total number of variables: `rows * cols * pieces * 4`
    pub fn variable_count(&self) -> usize {
        self.rows * self.cols * self.pieces * ROLES
    }

    /// `(rows, cols, pieces)`
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.rows, self.cols, self.pieces)
    }

    fn validate_variable(&self, row: usize, col: usize, piece: usize, role: usize) -> Result<()> {
        if row >= self.rows {
            anyhow::bail!("Row {} out of bounds (rows: {})", row, self.rows);
        }
        if col >= self.cols {
            anyhow::bail!("Column {} out of bounds (cols: {})", col, self.cols);
        }
        if piece >= self.pieces {
            anyhow::bail!("Piece {} out of bounds (pieces: {})", piece, self.pieces);
        }
        if role >= ROLES {
            anyhow::bail!("Role {} out of bounds (roles: {})", role, ROLES);
        }
        Ok(())
    }

    pub fn statistics(&self) -> VariableStatistics {
        VariableStatistics {
            total_variables: self.variable_count(),
            cells: self.rows * self.cols,
            pieces: self.pieces,
        }
    }
}

/// Statistics about variable usage
#[derive(Debug, Clone)]
pub struct VariableStatistics {
    pub total_variables: usize,
    pub cells: usize,
    pub pieces: usize,
}

impl std::fmt::Display for VariableStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Cells: {}", self.cells)?;
        writeln!(f, "  Piece instances: {}", self.pieces)?;
        Ok(())
    }
}
