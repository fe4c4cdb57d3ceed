//! Formula assembly for tetromino tiling problems

use super::constraints::{Clause, ConstraintGenerator};
use super::variables::{VariableSpace, ROLES};
use crate::tetromino::PuzzleSpec;
use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::HashMap;

pub const CELL_COVERAGE: &str = "cell coverage";
pub const ROLE_COVERAGE: &str = "role coverage";
pub const SHAPE: &str = "shape";
pub const SYMMETRY_BREAKING: &str = "symmetry breaking";

/// An immutable CNF formula over variables `1..=variable_count`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    variable_count: usize,
    clauses: Vec<Clause>,
    families: Vec<(&'static str, usize)>,
}

impl Formula {
    /// Conjoin named clause families into one formula
    ///
    /// Conjunction is order independent, so families may be produced in any
    /// order or in parallel before they are folded together here.
    pub fn assemble<I>(variable_count: usize, families: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Vec<Clause>)>,
    {
        families.into_iter().fold(
            Self {
                variable_count,
                clauses: Vec::new(),
                families: Vec::new(),
            },
            |mut formula, (name, clauses)| {
                formula.families.push((name, clauses.len()));
                formula.clauses.extend(clauses);
                formula
            },
        )
    }

    /// A copy of this formula with one more clause
    pub fn with_clause(&self, name: &'static str, clause: Clause) -> Self {
        self.with_family(name, vec![clause])
    }

    /// A copy of this formula conjoined with another clause family
    pub fn with_family(&self, name: &'static str, clauses: Vec<Clause>) -> Self {
        let mut formula = self.clone();
        formula.families.push((name, clauses.len()));
        formula.clauses.extend(clauses);
        formula
    }

    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn literal_count(&self) -> usize {
        self.clauses.iter().map(|c| c.literals.len()).sum()
    }

    /// Clause count contributed by the family called `name`
    pub fn family_size(&self, name: &str) -> usize {
        self.families
            .iter()
            .filter(|(n, _)| *n == name)
            .map(|(_, size)| size)
            .sum()
    }

    /// Whether `assignment` satisfies every clause (missing variables are false)
    pub fn is_satisfied_by(&self, assignment: &HashMap<i32, bool>) -> bool {
        let value = |var: i32| assignment.get(&var).copied().unwrap_or(false);
        self.clauses.iter().all(|clause| clause.is_satisfied_by(value))
    }
}

/// Builds the exact-cover formula of a tiling problem
pub struct TilingEncoder {
    puzzle: PuzzleSpec,
    variables: VariableSpace,
    parallel: bool,
}

impl TilingEncoder {
    /// Create an encoder; fails when the variable space cannot be indexed
    pub fn new(puzzle: PuzzleSpec, parallel: bool) -> Result<Self> {
        let variables = VariableSpace::new(puzzle.rows, puzzle.cols, puzzle.piece_count())?;

        Ok(Self {
            puzzle,
            variables,
            parallel,
        })
    }

    /// Build the formula: cell coverage, role coverage and shape constraints
    pub fn encode(&self) -> Result<Formula> {
        let generator = ConstraintGenerator::new(&self.variables, &self.puzzle.pieces);

        let cell_coverage = generator
            .cell_coverage_constraints()
            .context("Failed to generate cell coverage constraints")?;
        debug!("{}: {} clauses", CELL_COVERAGE, cell_coverage.len());

        let role_coverage = generator
            .role_coverage_constraints()
            .context("Failed to generate role coverage constraints")?;
        debug!("{}: {} clauses", ROLE_COVERAGE, role_coverage.len());

        let shape = generator
            .shape_constraints(self.parallel)
            .context("Failed to generate shape constraints")?;
        debug!("{}: {} clauses", SHAPE, shape.len());

        let formula = Formula::assemble(
            self.variables.variable_count(),
            [
                (CELL_COVERAGE, cell_coverage),
                (ROLE_COVERAGE, role_coverage),
                (SHAPE, shape),
            ],
        );

        info!(
            "Encoded {}x{} grid with {} pieces: {} variables, {} clauses",
            self.puzzle.rows,
            self.puzzle.cols,
            self.puzzle.piece_count(),
            formula.variable_count(),
            formula.clause_count()
        );

        Ok(formula)
    }

    /// Clauses that fix the labelling of interchangeable pieces, used when enumerating tilings
    pub fn symmetry_breaking(&self) -> Result<Vec<Clause>> {
        let clauses = ConstraintGenerator::new(&self.variables, &self.puzzle.pieces)
            .symmetry_breaking_constraints()
            .context("Failed to generate symmetry breaking constraints")?;
        debug!("{}: {} clauses", SYMMETRY_BREAKING, clauses.len());
        Ok(clauses)
    }

    pub fn variables(&self) -> &VariableSpace {
        &self.variables
    }

    pub fn puzzle(&self) -> &PuzzleSpec {
        &self.puzzle
    }

    /// Statistics of an encoded formula
    pub fn statistics(&self, formula: &Formula) -> EncodingStatistics {
        EncodingStatistics {
            rows: self.puzzle.rows,
            cols: self.puzzle.cols,
            pieces: self.puzzle.piece_count(),
            total_variables: formula.variable_count(),
            total_clauses: formula.clause_count(),
            cell_coverage_clauses: formula.family_size(CELL_COVERAGE),
            role_coverage_clauses: formula.family_size(ROLE_COVERAGE),
            shape_clauses: formula.family_size(SHAPE),
            total_literals: formula.literal_count(),
        }
    }

    /// Size estimate computed without building the formula
    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        let cells = self.puzzle.cell_count();
        let pieces = self.puzzle.piece_count();
        let options_per_cell = pieces * ROLES;

        let cell_coverage = cells * (1 + options_per_cell * options_per_cell.saturating_sub(1) / 2);
        let role_coverage = pieces * ROLES * (1 + cells * cells.saturating_sub(1) / 2);
        let shape_upper_bound: usize = self
            .puzzle
            .pieces
            .iter()
            .map(|shape| cells * 3usize.pow(shape.orientations().len() as u32))
            .sum();
        let estimated_clauses = cell_coverage + role_coverage + shape_upper_bound;

        let complexity_level = if estimated_clauses < 10_000 {
            ComplexityLevel::Low
        } else if estimated_clauses < 200_000 {
            ComplexityLevel::Medium
        } else if estimated_clauses < 5_000_000 {
            ComplexityLevel::High
        } else {
            ComplexityLevel::VeryHigh
        };

        ComplexityEstimate {
            complexity_level,
            estimated_variables: self.variables.variable_count(),
            estimated_clauses,
            grid_size: cells,
            pieces,
        }
    }
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub rows: usize,
    pub cols: usize,
    pub pieces: usize,
    pub total_variables: usize,
    pub total_clauses: usize,
    pub cell_coverage_clauses: usize,
    pub role_coverage_clauses: usize,
    pub shape_clauses: usize,
    pub total_literals: usize,
}

/// Complexity estimate for the problem
#[derive(Debug, Clone)]
pub struct ComplexityEstimate {
    pub complexity_level: ComplexityLevel,
    pub estimated_variables: usize,
    pub estimated_clauses: usize,
    pub grid_size: usize,
    pub pieces: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Grid: {}x{}", self.rows, self.cols)?;
        writeln!(f, "  Pieces: {}", self.pieces)?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses)?;
        writeln!(f, "    Cell coverage: {}", self.cell_coverage_clauses)?;
        writeln!(f, "    Role coverage: {}", self.role_coverage_clauses)?;
        writeln!(f, "    Shape: {}", self.shape_clauses)?;
        writeln!(f, "  Total literals: {}", self.total_literals)?;
        Ok(())
    }
}

impl std::fmt::Display for ComplexityEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Problem Complexity Estimate:")?;
        writeln!(f, "  Complexity level: {:?}", self.complexity_level)?;
        writeln!(f, "  Estimated variables: {}", self.estimated_variables)?;
        writeln!(f, "  Estimated clauses (upper bound): {}", self.estimated_clauses)?;
        writeln!(f, "  Grid size: {} cells", self.grid_size)?;
        writeln!(f, "  Pieces: {}", self.pieces)?;

        let recommendation = match self.complexity_level {
            ComplexityLevel::Low => "Should solve quickly",
            ComplexityLevel::Medium => "May take some time to encode and solve",
            ComplexityLevel::High => "Large formula, expect high memory use",
            ComplexityLevel::VeryHigh => "Very large formula, consider splitting the board",
        };
        writeln!(f, "  Recommendation: {}", recommendation)?;

        Ok(())
    }
}
