//! Tiling problem definition and solving

use super::{LayoutValidator, Placement, Solution, SolutionDecoder};
use crate::config::Settings;
use crate::error::EncodingBug;
use crate::sat::encoder::{ComplexityEstimate, EncodingStatistics, SYMMETRY_BREAKING};
use crate::sat::variables::VariableStatistics;
use crate::sat::{Clause, Formula, SatBackend, SolveOutcome, SolverSolution, TilingEncoder};
use crate::tetromino::{Layout, PuzzleSpec};
use anyhow::{Context, Result};
use log::info;

/// Result of solving a puzzle once
#[derive(Debug, Clone)]
pub enum TilingOutcome {
    Solved(Solution),
    NoSolution,
}

impl TilingOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            TilingOutcome::Solved(solution) => Some(solution),
            TilingOutcome::NoSolution => None,
        }
    }
}

/// A validated puzzle together with its encoder
pub struct TilingProblem {
    encoder: TilingEncoder,
    validator: LayoutValidator,
}

impl TilingProblem {
    /// Create a problem from settings
    pub fn new(settings: &Settings) -> Result<Self> {
        let puzzle = settings.puzzle_spec()?;
        Self::from_puzzle(puzzle, settings.encoding.parallel)
    }

    /// Create a problem from an already validated puzzle
    pub fn from_puzzle(puzzle: PuzzleSpec, parallel: bool) -> Result<Self> {
        Ok(Self {
            encoder: TilingEncoder::new(puzzle, parallel)?,
            validator: LayoutValidator::new(),
        })
    }

    pub fn puzzle(&self) -> &PuzzleSpec {
        self.encoder.puzzle()
    }

    /// Build the CNF formula of this puzzle
    pub fn encode(&self) -> Result<Formula> {
        self.encoder.encode()
    }

    /// Find one tiling
    pub fn solve(&self, backend: &dyn SatBackend) -> Result<TilingOutcome> {
        let formula = self.encode().context("Failed to encode puzzle")?;
        Ok(match self.solve_formula(&formula, backend)? {
            Some((solution, _)) => TilingOutcome::Solved(solution),
            None => TilingOutcome::NoSolution,
        })
    }

    /// Find up to `max_solutions` distinct tilings
    ///
    /// Same-shape pieces are kept in anchor order, so each tiling has a single
    /// model, and each model found is excluded by a blocking clause over its
    /// true variables. An empty result means no tiling exists.
    pub fn solve_all(&self, backend: &dyn SatBackend, max_solutions: usize) -> Result<Vec<Solution>> {
        let base = self.encode().context("Failed to encode puzzle")?;
        let mut formula = base.with_family(SYMMETRY_BREAKING, self.encoder.symmetry_breaking()?);
        let mut solutions: Vec<Solution> = Vec::new();

        while solutions.len() < max_solutions {
            let Some((solution, placements)) = self.solve_formula(&formula, backend)? else {
                break;
            };

            if solutions.iter().any(|known| known.is_equivalent_to(&solution)) {
                return Err(EncodingBug::RepeatedTiling {
                    id: solution.metadata.id,
                }
                .into());
            }

            formula = formula.with_clause("blocking", self.blocking_clause(&placements)?);
            info!("Found tiling {} ({} of at most {})", solution.metadata.id, solutions.len() + 1, max_solutions);
            solutions.push(solution);
        }

        if solutions.is_empty() {
            info!("No tiling exists");
        }

        Ok(solutions)
    }

    /// Get encoding statistics
    pub fn encoding_statistics(&self) -> Result<EncodingStatistics> {
        let formula = self.encode()?;
        Ok(self.encoder.statistics(&formula))
    }

    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        self.encoder.estimate_complexity()
    }

    pub fn variable_statistics(&self) -> VariableStatistics {
        self.encoder.variables().statistics()
    }

    /// Decode a model computed outside this crate, e.g. from an exported DIMACS file
    ///
    /// The model must satisfy this puzzle's formula before it is decoded.
    pub fn decode_external_model(&self, assignment: &SolverSolution) -> Result<Layout> {
        let formula = self.encode()?;
        if !formula.is_satisfied_by(&assignment.assignment) {
            anyhow::bail!(
                "Model does not satisfy the formula of the {}x{} puzzle",
                self.puzzle().rows,
                self.puzzle().cols
            );
        }
        Ok(self.decode_with_placements(assignment)?.0)
    }

    fn decode_with_placements(&self, assignment: &SolverSolution) -> Result<(Layout, Vec<Placement>)> {
        let decoder = SolutionDecoder::new(self.encoder.variables(), &self.encoder.puzzle().pieces);
        let layout = decoder.decode(assignment)?;
        let placements = self.validator.placements(&layout)?;
        Ok((layout, placements))
    }

    fn solve_formula(
        &self,
        formula: &Formula,
        backend: &dyn SatBackend,
    ) -> Result<Option<(Solution, Vec<Placement>)>> {
        let assignment = match backend.solve(formula).context("SAT solving failed")? {
            SolveOutcome::Satisfiable(assignment) => assignment,
            SolveOutcome::Unsatisfiable => return Ok(None),
        };

        let (layout, placements) = self.decode_with_placements(&assignment)?;

        let solution = Solution::new(
            self.encoder.puzzle().clone(),
            layout,
            assignment.solve_time,
            backend.name(),
            formula.variable_count(),
            formula.clause_count(),
        );
        Ok(Some((solution, placements)))
    }

    /// Forbid the assignment that realises exactly these placements
    fn blocking_clause(&self, placements: &[Placement]) -> Result<Clause> {
        let puzzle = self.encoder.puzzle();
        let variables = self.encoder.variables();
        let mut literals = Vec::with_capacity(puzzle.cell_count());

        for placement in placements {
            let shape = puzzle.pieces[placement.piece];
            let cells = placement
                .cells(shape, puzzle.rows, puzzle.cols)
                .with_context(|| format!("Piece {} was placed off the board", placement.piece))?;
            for (role, (row, col)) in cells.into_iter().enumerate() {
                literals.push(-variables.variable(row, col, placement.piece, role)?);
            }
        }

        Ok(Clause::new(literals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::sat::solver::testing::ScriptedBackend;
    use crate::sat::{CadicalBackend, VariableSpace};
    use crate::tetromino::ShapeClass;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Runs CaDiCaL and counts the calls
    #[derive(Default)]
    struct CountingBackend {
        calls: AtomicUsize,
    }

    impl SatBackend for CountingBackend {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn solve(&self, formula: &Formula) -> Result<SolveOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            CadicalBackend::new().solve(formula)
        }
    }

    fn problem(rows: usize, cols: usize, pieces: &[u8]) -> TilingProblem {
        TilingProblem::from_puzzle(PuzzleSpec::new(rows, cols, pieces).unwrap(), true).unwrap()
    }

    fn assert_connected(cells: &[(usize, usize)]) {
        let adjacent = |a: (usize, usize), b: (usize, usize)| a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1;
        let mut reached = vec![cells[0]];
        let mut grew = true;
        while grew {
            grew = false;
            for &cell in cells {
                if !reached.contains(&cell) && reached.iter().any(|&r| adjacent(r, cell)) {
                    reached.push(cell);
                    grew = true;
                }
            }
        }
        assert_eq!(reached.len(), cells.len(), "cells {:?} are not contiguous", cells);
    }

    #[test]
    fn test_four_by_four_mixed_pieces() {
        let outcome = problem(4, 4, &[1, 2, 3, 4]).solve(&CadicalBackend::new()).unwrap();
        let solution = outcome.solution().expect("4x4 with 1,2,3,4 is tileable");

        for piece in 0..4 {
            let cells = solution.layout.cells_of(piece);
            assert_eq!(cells.len(), 4);
            assert_connected(&cells);
        }
        assert!(LayoutValidator::new().validate(&solution.layout).is_valid);
    }

    #[test]
    fn test_single_square() {
        let outcome = problem(2, 2, &[2]).solve(&CadicalBackend::new()).unwrap();
        let solution = outcome.solution().unwrap();

        assert_eq!(solution.layout.cells, vec![0, 0, 0, 0]);
        assert_eq!(solution.layout.to_string(), "22\n22\n");
    }

    #[test]
    fn test_square_in_a_strip_has_no_solution() {
        let outcome = problem(1, 4, &[2]).solve(&CadicalBackend::new()).unwrap();
        assert!(matches!(outcome, TilingOutcome::NoSolution));
        assert!(problem(1, 4, &[2]).solve_all(&CadicalBackend::new(), 3).unwrap().is_empty());
    }

    #[test]
    fn test_area_mismatch_is_rejected_before_encoding() {
        let mut settings = Settings::default();
        settings.puzzle.rows = 3;
        settings.puzzle.cols = 3;
        settings.puzzle.pieces = vec![1];

        let err = TilingProblem::new(&settings).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ConfigurationError>(),
            Some(ConfigurationError::AreaMismatch { cells: 9, covered: 4, .. })
        ));
    }

    #[test]
    fn test_pieces_never_leave_the_board() {
        // A bar in a 4x1 column must stand upright
        let outcome = problem(4, 1, &[1]).solve(&CadicalBackend::new()).unwrap();
        assert_eq!(outcome.solution().unwrap().layout.to_string(), "1\n1\n1\n1\n");

        // A castle has no orientation that fits a 2x2 board
        let castle = PuzzleSpec::from_shapes(2, 2, vec![ShapeClass::Castle]).unwrap();
        let outcome = TilingProblem::from_puzzle(castle, false)
            .unwrap()
            .solve(&CadicalBackend::new())
            .unwrap();
        assert!(matches!(outcome, TilingOutcome::NoSolution));
    }

    #[test]
    fn test_six_by_eight_puzzle() {
        let pieces = [1, 7, 7, 2, 2, 5, 6, 6, 6, 4, 4, 4];
        let outcome = problem(6, 8, &pieces).solve(&CadicalBackend::new()).unwrap();
        let solution = outcome.solution().expect("6x8 puzzle is tileable");

        let validation = LayoutValidator::new().validate(&solution.layout);
        assert!(validation.is_valid, "{}", validation);
        assert_eq!(validation.placements.len(), 12);
    }

    #[test]
    fn test_solve_all_two_bars() {
        // Only horizontal bars fit a 2x4 board
        let solutions = problem(2, 4, &[1, 1]).solve_all(&CadicalBackend::new(), 5).unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].layout.to_string(), "1111\n1111\n");
    }

    #[test]
    fn test_solve_all_enumerates_distinct_tilings() {
        // A 4x4 board of bars: four horizontal or four vertical, same rendering
        let backend = CountingBackend::default();
        let solutions = problem(4, 4, &[1, 1, 1, 1]).solve_all(&backend, 10).unwrap();

        assert_eq!(solutions.len(), 2);
        assert!(!solutions[0].is_equivalent_to(&solutions[1]));
        assert_eq!(solutions[0].layout.to_string(), solutions[1].layout.to_string());
        // Two models and the final unsatisfiable call
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_identical_pieces_are_not_re_solved_per_labelling() {
        // Six squares tile a 4x6 board in exactly one way
        let backend = CountingBackend::default();
        let solutions = problem(4, 6, &[2; 6]).solve_all(&backend, 2).unwrap();

        assert_eq!(solutions.len(), 1);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_enumeration_keeps_same_shape_anchors_ordered() {
        let solutions = problem(4, 4, &[7, 7, 7, 7]).solve_all(&CadicalBackend::new(), 10).unwrap();
        // Castles tile 4x4 in two mirror-image ways
        assert_eq!(solutions.len(), 2);

        for solution in &solutions {
            let placements = LayoutValidator::new().placements(&solution.layout).unwrap();
            let anchors: Vec<usize> = placements
                .iter()
                .map(|p| solution.layout.index(p.anchor.0, p.anchor.1))
                .collect();
            assert!(anchors.windows(2).all(|pair| pair[0] < pair[1]), "{:?}", anchors);
        }
    }

    #[test]
    fn test_external_model_must_satisfy_the_formula() {
        let tiling = problem(1, 4, &[1]);
        let variables = VariableSpace::new(1, 4, 1).unwrap();
        let model = |roles: [usize; 4]| SolverSolution {
            assignment: roles
                .iter()
                .enumerate()
                .map(|(col, &role)| (variables.variable(0, col, 0, role).unwrap(), true))
                .collect::<HashMap<_, _>>(),
            solve_time: Duration::ZERO,
        };

        let layout = tiling.decode_external_model(&model([0, 1, 2, 3])).unwrap();
        assert_eq!(layout.to_string(), "1111\n");

        // Covers the right cells but with roles out of order
        assert!(tiling.decode_external_model(&model([0, 2, 1, 3])).is_err());
    }

    #[test]
    fn test_solve_all_respects_the_limit() {
        let solutions = problem(4, 4, &[1, 1, 1, 1]).solve_all(&CadicalBackend::new(), 1).unwrap();
        assert_eq!(solutions.len(), 1);
    }

    #[test]
    fn test_inconsistent_assignment_is_an_encoding_bug() {
        let backend = ScriptedBackend::satisfiable(&[1]);
        let err = problem(2, 2, &[2]).solve(&backend).err().unwrap();

        assert!(matches!(
            err.downcast_ref::<EncodingBug>(),
            Some(EncodingBug::DecodeInconsistency { row: 0, col: 1, true_count: 0 })
        ));
    }

    #[test]
    fn test_unsatisfiable_backend() {
        let outcome = problem(2, 2, &[2]).solve(&ScriptedBackend::unsatisfiable()).unwrap();
        assert!(outcome.solution().is_none());
    }

    #[test]
    fn test_statistics_and_complexity() {
        let tiling = problem(2, 2, &[2]);
        let stats = tiling.encoding_statistics().unwrap();
        assert_eq!(stats.total_variables, 16);
        assert_eq!(stats.total_clauses, 62);

        assert_eq!(tiling.variable_statistics().total_variables, 16);

        let estimate = tiling.estimate_complexity();
        assert_eq!(estimate.estimated_variables, 16);
        assert!(estimate.estimated_clauses >= stats.total_clauses);
    }
}
