//! Turning solver assignments back into tiled grids

use super::validator::Placement;
use crate::error::EncodingBug;
use crate::sat::{SolverSolution, VariableSpace};
use crate::tetromino::{Layout, ShapeClass};
use std::collections::HashMap;

/// Reads layouts out of satisfying assignments
pub struct SolutionDecoder<'a> {
    variables: &'a VariableSpace,
    pieces: &'a [ShapeClass],
}

impl<'a> SolutionDecoder<'a> {
    pub fn new(variables: &'a VariableSpace, pieces: &'a [ShapeClass]) -> Self {
        Self { variables, pieces }
    }

    /// Label every cell with the piece whose variable is true there
    ///
    /// A cell with zero or several true variables means the formula and the
    /// assignment disagree, which is reported as [`EncodingBug::DecodeInconsistency`].
    /// True variables outside this space are ignored.
    pub fn decode(&self, solution: &SolverSolution) -> Result<Layout, EncodingBug> {
        let (rows, cols, _) = self.variables.dimensions();
        let mut owners: Vec<Option<usize>> = vec![None; rows * cols];
        let mut true_counts = vec![0usize; rows * cols];

        for decision in solution
            .true_variables()
            .into_iter()
            .filter_map(|var| self.variables.decode(var))
        {
            let index = decision.row * cols + decision.col;
            true_counts[index] += 1;
            owners[index] = Some(decision.piece);
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for (index, (&owner, &true_count)) in owners.iter().zip(&true_counts).enumerate() {
            match owner {
                Some(piece) if true_count == 1 => cells.push(piece),
                _ => {
                    return Err(EncodingBug::DecodeInconsistency {
                        row: index / cols,
                        col: index % cols,
                        true_count,
                    })
                }
            }
        }

        Ok(Layout {
            rows,
            cols,
            pieces: self.pieces.to_vec(),
            cells,
        })
    }

    /// The total assignment that places each piece as given and sets everything else false
    pub fn assignment_from_placements(&self, placements: &[Placement]) -> HashMap<i32, bool> {
        let (rows, cols, _) = self.variables.dimensions();
        let mut assignment: HashMap<i32, bool> = (1..=self.variables.variable_count() as i32)
            .map(|var| (var, false))
            .collect();

        for placement in placements {
            let Some(&shape) = self.pieces.get(placement.piece) else {
                continue;
            };
            let Some(cells) = placement.cells(shape, rows, cols) else {
                continue;
            };
            for (role, (row, col)) in cells.into_iter().enumerate() {
                if let Some(var) =
                    self.variables
                        .variable_at(row as isize, col as isize, placement.piece, role)
                {
                    assignment.insert(var, true);
                }
            }
        }

        assignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::TilingEncoder;
    use crate::tetromino::PuzzleSpec;
    use crate::tiling::LayoutValidator;
    use proptest::prelude::*;
    use std::time::Duration;
    use ShapeClass::*;

    fn solution(assignment: HashMap<i32, bool>) -> SolverSolution {
        SolverSolution {
            assignment,
            solve_time: Duration::ZERO,
        }
    }

    fn four_by_four() -> Layout {
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
    fn test_decode_placed_layout() {
        let layout = four_by_four();
        let variables = VariableSpace::new(4, 4, 4).unwrap();
        let decoder = SolutionDecoder::new(&variables, &layout.pieces);

        let placements = LayoutValidator::new().placements(&layout).unwrap();
        let assignment = decoder.assignment_from_placements(&placements);
        assert_eq!(assignment.values().filter(|&&v| v).count(), 16);

        let decoded = decoder.decode(&solution(assignment)).unwrap();
        assert_eq!(decoded, layout);
        assert_eq!(decoded.to_string(), "1111\n3224\n3224\n3344\n");
    }

    #[test]
    fn test_missing_variables_read_as_false() {
        let variables = VariableSpace::new(2, 2, 1).unwrap();
        let pieces = [Square];
        let decoder = SolutionDecoder::new(&variables, &pieces);

        let true_vars = [
            variables.variable(0, 0, 0, 0).unwrap(),
            variables.variable(0, 1, 0, 1).unwrap(),
            variables.variable(1, 0, 0, 2).unwrap(),
            variables.variable(1, 1, 0, 3).unwrap(),
        ];
        let sparse = true_vars.iter().map(|&v| (v, true)).collect();

        let layout = decoder.decode(&solution(sparse)).unwrap();
        assert_eq!(layout.cells, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_uncovered_cell_is_inconsistent() {
        let variables = VariableSpace::new(2, 2, 1).unwrap();
        let pieces = [Square];
        let decoder = SolutionDecoder::new(&variables, &pieces);

        let err = decoder.decode(&solution(HashMap::new())).unwrap_err();
        assert_eq!(
            err,
            EncodingBug::DecodeInconsistency {
                row: 0,
                col: 0,
                true_count: 0
            }
        );
    }

    #[test]
    fn test_doubly_covered_cell_is_inconsistent() {
        let variables = VariableSpace::new(1, 4, 1).unwrap();
        let pieces = [Bar];
        let decoder = SolutionDecoder::new(&variables, &pieces);

        let mut assignment: HashMap<i32, bool> = (0..4)
            .map(|col| (variables.variable(0, col, 0, col).unwrap(), true))
            .collect();
        assignment.insert(variables.variable(0, 2, 0, 0).unwrap(), true);

        let err = decoder.decode(&solution(assignment)).unwrap_err();
        assert_eq!(
            err,
            EncodingBug::DecodeInconsistency {
                row: 0,
                col: 2,
                true_count: 2
            }
        );
    }

    /// Width-4 tiled blocks that between them use every shape
    fn blocks() -> Vec<(Vec<ShapeClass>, Vec<Vec<usize>>)> {
        vec![
            (vec![Bar, Bar], vec![vec![0, 0, 0, 0], vec![1, 1, 1, 1]]),
            (vec![Square, Square], vec![vec![0, 0, 1, 1], vec![0, 0, 1, 1]]),
            (vec![L, L], vec![vec![0, 0, 0, 1], vec![0, 1, 1, 1]]),
            (vec![ReverseL, ReverseL], vec![vec![1, 0, 0, 0], vec![1, 1, 1, 0]]),
            (
                vec![L, ReverseL, Snake],
                vec![vec![0, 0, 0, 1], vec![0, 2, 2, 1], vec![2, 2, 1, 1]],
            ),
            (
                vec![L, ReverseL, ReverseSnake],
                vec![vec![0, 1, 1, 1], vec![0, 2, 2, 1], vec![0, 0, 2, 2]],
            ),
            (
                vec![Castle, Castle, Castle, Castle],
                vec![vec![0, 1, 1, 1], vec![0, 0, 1, 3], vec![0, 2, 3, 3], vec![2, 2, 2, 3]],
            ),
        ]
    }

    /// Stack the chosen blocks top to bottom, renumbering their pieces
    fn stacked(choice: &[usize]) -> Layout {
        let catalog = blocks();
        let mut pieces = Vec::new();
        let mut rows = Vec::new();
        for &index in choice {
            let (shapes, block_rows) = &catalog[index];
            let offset = pieces.len();
            rows.extend(
                block_rows
                    .iter()
                    .map(|row| row.iter().map(|&piece| piece + offset).collect::<Vec<_>>()),
            );
            pieces.extend(shapes.iter().copied());
        }
        Layout::from_rows(pieces, rows).unwrap()
    }

    #[test]
    fn test_blocks_are_valid_tilings() {
        for index in 0..blocks().len() {
            let layout = stacked(&[index]);
            assert!(LayoutValidator::new().validate(&layout).is_valid, "block {}", index);
        }
        let all_shapes: std::collections::BTreeSet<_> = blocks().into_iter().flat_map(|(s, _)| s).collect();
        assert_eq!(all_shapes.len(), ShapeClass::ALL.len());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_valid_tilings_satisfy_the_formula_and_decode_to_themselves(
            choice in prop::collection::vec(0usize..7, 1..4),
        ) {
            let layout = stacked(&choice);
            let puzzle = PuzzleSpec::from_shapes(layout.rows, layout.cols, layout.pieces.clone()).unwrap();
            let encoder = TilingEncoder::new(puzzle, false).unwrap();
            let formula = encoder.encode().unwrap();

            let decoder = SolutionDecoder::new(encoder.variables(), &layout.pieces);
            let placements = LayoutValidator::new().placements(&layout).unwrap();
            let assignment = decoder.assignment_from_placements(&placements);

            prop_assert!(formula.is_satisfied_by(&assignment));
            prop_assert_eq!(decoder.decode(&solution(assignment)).unwrap(), layout);
        }
    }

    proptest! {
        #[test]
        fn prop_bar_stacks_decode_to_themselves(rows in 1usize..5, vertical in any::<bool>()) {
            // `rows` bars laid side by side, either as horizontal rows or vertical columns
            let (height, width) = if vertical { (4, rows) } else { (rows, 4) };
            let cells: Vec<usize> = (0..height * width)
                .map(|i| if vertical { i % width } else { i / width })
                .collect();
            let layout = Layout::new(height, width, vec![Bar; rows], cells).unwrap();

            let variables = VariableSpace::new(height, width, rows).unwrap();
            let decoder = SolutionDecoder::new(&variables, &layout.pieces);
            let placements = LayoutValidator::new().placements(&layout).unwrap();
            let decoded = decoder
                .decode(&solution(decoder.assignment_from_placements(&placements)))
                .unwrap();

            prop_assert_eq!(decoded, layout);
        }
    }
}
