//! Constraint generation for the tetromino tiling encoding

use super::variables::{VariableSpace, ROLES};
use crate::tetromino::{anchored_cells, Orientation, ShapeClass};
use anyhow::Result;
use itertools::{iproduct, Itertools};
use rayon::prelude::*;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    pub fn unit(literal: i32) -> Self {
        Self { literals: vec![literal] }
    }

    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// An empty clause can never be satisfied
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// Evaluate the clause under `value`, which reports the truth of each variable
    pub fn is_satisfied_by<F: Fn(i32) -> bool>(&self, value: F) -> bool {
        self.literals
            .iter()
            .any(|&lit| if lit > 0 { value(lit) } else { !value(-lit) })
    }
}

/// Clauses stating that exactly one of `literals` is true
///
/// One at-least-one clause plus a "not both" clause for every pair. An empty
/// input yields the empty clause.
pub fn exactly_one(literals: &[i32]) -> Vec<Clause> {
    let mut clauses = Vec::with_capacity(1 + literals.len() * literals.len().saturating_sub(1) / 2);
    clauses.push(Clause::new(literals.to_vec()));
    clauses.extend(
        literals
            .iter()
            .tuple_combinations()
            .map(|(&a, &b)| Clause::binary(-a, -b)),
    );
    clauses
}

/// Generates the three clause families of a tiling problem
///
/// Generation is stateless: the same inputs always give the same clauses in
/// the same order.
pub struct ConstraintGenerator<'a> {
    variables: &'a VariableSpace,
    pieces: &'a [ShapeClass],
}

impl<'a> ConstraintGenerator<'a> {
    pub fn new(variables: &'a VariableSpace, pieces: &'a [ShapeClass]) -> Self {
        Self { variables, pieces }
    }

    /// Every cell is covered by exactly one `(piece, role)`
    pub fn cell_coverage_constraints(&self) -> Result<Vec<Clause>> {
        let (rows, cols, _) = self.variables.dimensions();
        let mut clauses = Vec::new();

        for row in 0..rows {
            for col in 0..cols {
                clauses.extend(exactly_one(&self.variables.cell_variables(row, col)?));
            }
        }

        Ok(clauses)
    }

    /// Every `(piece, role)` pair sits on exactly one cell
    pub fn role_coverage_constraints(&self) -> Result<Vec<Clause>> {
        let mut clauses = Vec::new();

        for piece in 0..self.pieces.len() {
            for role in 0..ROLES {
                clauses.extend(exactly_one(&self.variables.role_variables(piece, role)?));
            }
        }

        Ok(clauses)
    }

    /// Role 0 of a piece on a cell implies one in-bounds orientation of its shape
    ///
    /// With `parallel` set the per-cell work is spread over the rayon pool;
    /// the result is identical to the sequential build.
    pub fn shape_constraints(&self, parallel: bool) -> Result<Vec<Clause>> {
        let (rows, cols, pieces) = self.variables.dimensions();
        let anchors: Vec<(usize, usize, usize)> = iproduct!(0..rows, 0..cols, 0..pieces).collect();

        let per_anchor: Vec<Vec<Clause>> = if parallel {
            anchors
                .par_iter()
                .map(|&(row, col, piece)| self.placement_clauses(row, col, piece))
                .collect::<Result<_>>()?
        } else {
            anchors
                .iter()
                .map(|&(row, col, piece)| self.placement_clauses(row, col, piece))
                .collect::<Result<_>>()?
        };

        Ok(per_anchor.into_iter().flatten().collect())
    }

    /// Same-shape piece instances take their anchors in row-major order
    ///
    /// For instances `a < b` of one shape and cells `p` after or equal to `q`,
    /// `!x(p, a, 0) | !x(q, b, 0)`. Every tiling then has exactly one labelling
    /// of its interchangeable pieces.
    pub fn symmetry_breaking_constraints(&self) -> Result<Vec<Clause>> {
        let (rows, cols, pieces) = self.variables.dimensions();
        let cells = rows * cols;
        let mut clauses = Vec::new();

        for (a, b) in (0..pieces).tuple_combinations() {
            if self.shape_of(a)? != self.shape_of(b)? {
                continue;
            }
            for p in 0..cells {
                let first = self.variables.variable(p / cols, p % cols, a, 0)?;
                for q in 0..=p {
                    let second = self.variables.variable(q / cols, q % cols, b, 0)?;
                    clauses.push(Clause::binary(-first, -second));
                }
            }
        }

        Ok(clauses)
    }

    /// CNF form of `x(row, col, piece, 0) -> OR_m (a_m AND b_m AND c_m)`
    ///
    /// The disjunction of conjunctions is distributed: one clause per choice of
    /// a literal from each in-bounds orientation. Orientations leaving the
    /// board are false disjuncts; if none remain the anchor is forced false.
    pub fn placement_clauses(&self, row: usize, col: usize, piece: usize) -> Result<Vec<Clause>> {
        let anchor = self.variables.variable(row, col, piece, 0)?;
        let shape = self.shape_of(piece)?;

        let alternatives: Vec<[i32; 3]> = shape
            .orientations()
            .iter()
            .filter_map(|orientation| self.orientation_literals(row, col, piece, orientation))
            .collect();

        if alternatives.is_empty() {
            return Ok(vec![Clause::unit(-anchor)]);
        }

        let clauses = alternatives
            .iter()
            .map(|literals| literals.iter().copied())
            .multi_cartesian_product()
            .map(|choice| {
                let literals = std::iter::once(-anchor).chain(choice).unique().collect();
                Clause::new(literals)
            })
            .collect();

        Ok(clauses)
    }

    /// Variables of roles 1..=3 for `orientation` anchored at `(row, col)`,
    /// or `None` when any of them falls off the board
    fn orientation_literals(
        &self,
        row: usize,
        col: usize,
        piece: usize,
        orientation: &Orientation,
    ) -> Option<[i32; 3]> {
        let cells = anchored_cells(row as isize, col as isize, orientation);
        let [_, (r1, c1), (r2, c2), (r3, c3)] = cells;

        Some([
            self.variables.variable_at(r1, c1, piece, 1)?,
            self.variables.variable_at(r2, c2, piece, 2)?,
            self.variables.variable_at(r3, c3, piece, 3)?,
        ])
    }

    fn shape_of(&self, piece: usize) -> Result<ShapeClass> {
        match self.pieces.get(piece) {
            Some(&shape) => Ok(shape),
            None => anyhow::bail!("Piece {} out of bounds (pieces: {})", piece, self.pieces.len()),
        }
    }
}
