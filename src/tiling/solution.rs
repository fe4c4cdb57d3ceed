//! Solution representation for tiling problems

use crate::tetromino::{Layout, PuzzleSpec, ShapeClass};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A verified tiling of a puzzle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub puzzle: PuzzleSpec,
    /// Piece index of every cell
    pub layout: Layout,
    /// Time the backend spent on the formula that produced this tiling
    #[serde(skip)]
    pub solve_time: Duration,
    pub metadata: SolutionMetadata,
}

/// Metadata about a solution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionMetadata {
    /// Identifier derived from the piece partition, equal for relabelled tilings
    pub id: String,
    /// Backend that produced the assignment
    pub backend: String,
    pub variables: usize,
    pub clauses: usize,
}

/// Short description of a solution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub id: String,
    pub rows: usize,
    pub cols: usize,
    pub pieces: usize,
    pub solve_time_ms: u64,
}

impl Solution {
    pub fn new(
        puzzle: PuzzleSpec,
        layout: Layout,
        solve_time: Duration,
        backend: &str,
        variables: usize,
        clauses: usize,
    ) -> Self {
        let metadata = SolutionMetadata {
            id: SolutionMetadata::generate_id(&layout),
            backend: backend.to_string(),
            variables,
            clauses,
        };

        Self {
            puzzle,
            layout,
            solve_time,
            metadata,
        }
    }

    /// Whether two solutions cut the grid into the same pieces
    ///
    /// Piece labels are ignored, so swapping two instances of one shape
    /// gives an equivalent solution.
    pub fn is_equivalent_to(&self, other: &Solution) -> bool {
        partition_key(&self.layout) == partition_key(&other.layout)
    }

    pub fn summary(&self) -> SolutionSummary {
        SolutionSummary {
            id: self.metadata.id.clone(),
            rows: self.layout.rows,
            cols: self.layout.cols,
            pieces: self.layout.pieces.len(),
            solve_time_ms: self.solve_time.as_millis() as u64,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

/// Shape and sorted cells of every piece, sorted: the tiling with labels erased
fn partition_key(layout: &Layout) -> Vec<(ShapeClass, Vec<(usize, usize)>)> {
    let mut key: Vec<_> = layout
        .pieces
        .iter()
        .enumerate()
        .map(|(piece, &shape)| (shape, layout.cells_of(piece)))
        .collect();
    key.sort();
    key
}

impl SolutionMetadata {
    fn generate_id(layout: &Layout) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        layout.rows.hash(&mut hasher);
        layout.cols.hash(&mut hasher);
        partition_key(layout).hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }
}

impl std::fmt::Display for SolutionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solution {}: {}x{} grid, {} pieces, {}ms",
            self.id, self.rows, self.cols, self.pieces, self.solve_time_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::ShapeClass::*;
    use tempfile::tempdir;

    fn two_bars(cells: Vec<usize>) -> Solution {
        let puzzle = PuzzleSpec::new(2, 4, &[1, 1]).unwrap();
        let layout = Layout::new(2, 4, vec![Bar, Bar], cells).unwrap();
        Solution::new(puzzle, layout, Duration::from_millis(5), "cadical", 32, 100)
    }

    #[test]
    fn test_swapped_instances_are_equivalent() {
        let a = two_bars(vec![0, 0, 0, 0, 1, 1, 1, 1]);
        let b = two_bars(vec![1, 1, 1, 1, 0, 0, 0, 0]);

        assert!(a.is_equivalent_to(&b));
        assert_eq!(a.metadata.id, b.metadata.id);
    }

    #[test]
    fn test_same_rendering_different_cuts_are_distinct() {
        // Four bars on a 4x4 board render as "1111" rows either way
        let puzzle = PuzzleSpec::new(4, 4, &[1, 1, 1, 1]).unwrap();
        let rows: Vec<usize> = (0..16).map(|i| i / 4).collect();
        let cols: Vec<usize> = (0..16).map(|i| i % 4).collect();
        let horizontal = Layout::new(4, 4, vec![Bar; 4], rows).unwrap();
        let vertical = Layout::new(4, 4, vec![Bar; 4], cols).unwrap();
        assert_eq!(horizontal.to_string(), vertical.to_string());

        let a = Solution::new(puzzle.clone(), horizontal, Duration::ZERO, "cadical", 256, 0);
        let b = Solution::new(puzzle, vertical, Duration::ZERO, "cadical", 256, 0);
        assert!(!a.is_equivalent_to(&b));
        assert_ne!(a.metadata.id, b.metadata.id);
    }

    #[test]
    fn test_summary() {
        let summary = two_bars(vec![0, 0, 0, 0, 1, 1, 1, 1]).summary();
        assert_eq!(summary.pieces, 2);
        assert_eq!(summary.solve_time_ms, 5);
        assert!(summary.to_string().contains("2x4 grid"));
    }

    #[test]
    fn test_json_file_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("solution.json");

        let solution = two_bars(vec![0, 0, 0, 0, 1, 1, 1, 1]);
        solution.save_to_file(&path).unwrap();
        let loaded = Solution::load_from_file(&path).unwrap();

        assert_eq!(loaded.layout, solution.layout);
        assert_eq!(loaded.puzzle, solution.puzzle);
        assert_eq!(loaded.metadata.backend, "cadical");
        assert_eq!(loaded.solve_time, Duration::ZERO);
    }
}
