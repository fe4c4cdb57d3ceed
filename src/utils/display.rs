//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::tetromino::{save_layout_to_file, Layout};
use crate::tiling::Solution;
use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::path::Path;

/// Format solutions for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Format a single solution for console output
    pub fn format_solution(solution: &Solution, show_pieces: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Solution {} ===\n", solution.metadata.id));
        output.push_str(&format!("Grid: {}x{}\n", solution.layout.rows, solution.layout.cols));
        output.push_str(&format!("Pieces: {}\n", solution.layout.pieces.len()));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));
        output.push('\n');
        output.push_str(&solution.layout.to_string());

        if show_pieces {
            output.push_str("\nPiece instances:\n");
            output.push_str(&Self::format_piece_grid(&solution.layout));
        }

        output
    }

    /// Format multiple solutions as a summary table
    pub fn format_solution_summary(solutions: &[Solution]) -> String {
        let mut output = String::new();

        output.push_str("Solutions Summary:\n");
        output.push_str("ID       | Time(ms) | Backend  | Clauses\n");
        output.push_str("---------|----------|----------|--------\n");

        for solution in solutions {
            output.push_str(&format!(
                "{:8} | {:8} | {:8} | {}\n",
                &solution.metadata.id[..8.min(solution.metadata.id.len())],
                solution.solve_time.as_millis(),
                solution.metadata.backend,
                solution.metadata.clauses
            ));
        }

        output
    }

    /// One letter per piece instance, so same-shape pieces can be told apart
    pub fn format_piece_grid(layout: &Layout) -> String {
        let mut output = String::new();
        for row in 0..layout.rows {
            for col in 0..layout.cols {
                output.push(Self::piece_symbol(layout.piece_at(row, col)));
            }
            output.push('\n');
        }
        output
    }

    /// Format a layout with coordinates
    pub fn format_layout_with_coords(layout: &Layout) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for col in 0..layout.cols {
            output.push_str(&format!("{:2}", col % 10));
        }
        output.push('\n');

        for row in 0..layout.rows {
            output.push_str(&format!("{:2} ", row));
            for col in 0..layout.cols {
                output.push_str(&format!(" {}", layout.shape_at(row, col)));
            }
            output.push('\n');
        }

        output
    }

    fn piece_symbol(piece: usize) -> char {
        const SYMBOLS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
        SYMBOLS.get(piece).map(|&b| b as char).unwrap_or('#')
    }

    /// Save every tiling under `output_dir`
    ///
    /// Text output is the layout file format read back by `validate`; JSON
    /// output carries the full solution plus an `index.json` of summaries.
    pub fn save_solutions<P: AsRef<Path>>(
        solutions: &[Solution],
        output_dir: P,
        format: OutputFormat,
    ) -> Result<()> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        for (i, solution) in solutions.iter().enumerate() {
            match format {
                OutputFormat::Text => {
                    save_layout_to_file(&solution.layout, output_dir.join(format!("tiling_{:03}.txt", i + 1)))?
                }
                OutputFormat::Json => solution.save_to_file(output_dir.join(format!("tiling_{:03}.json", i + 1)))?,
            }
        }

        if format == OutputFormat::Json {
            let summaries: Vec<_> = solutions.iter().map(Solution::summary).collect();
            std::fs::write(output_dir.join("index.json"), serde_json::to_string_pretty(&summaries)?)
                .context("Failed to write tiling index")?;
        }

        Ok(())
    }

    /// Shape grids of several solutions side by side
    pub fn compare_solutions(solutions: &[Solution]) -> String {
        if solutions.is_empty() {
            return "No solutions to compare".to_string();
        }

        let mut output = String::new();
        output.push_str("Solution Comparison:\n");

        let rendered: Vec<Vec<String>> = solutions.iter().map(|s| s.layout.shape_rows()).collect();
        let height = rendered.iter().map(Vec::len).max().unwrap_or(0);

        for row in 0..height {
            let line: Vec<&str> = rendered
                .iter()
                .map(|rows| rows.get(row).map(String::as_str).unwrap_or(""))
                .collect();
            output.push_str(&line.join("  |  "));
            output.push('\n');
        }

        output
    }
}

/// ANSI styling of the CLI's status lines
///
/// Plain text when stdout is not a terminal, `NO_COLOR` is set or `TERM=dumb`.
pub struct StatusLine;

impl StatusLine {
    pub fn paint(text: &str, tone: Tone) -> String {
        if Self::ansi_enabled() {
            format!("\x1b[{}m{}\x1b[0m", tone.sgr(), text)
        } else {
            text.to_string()
        }
    }

    fn ansi_enabled() -> bool {
        std::io::stdout().is_terminal()
            && std::env::var_os("NO_COLOR").is_none()
            && std::env::var("TERM").map_or(true, |term| term != "dumb")
    }

    /// A tiling was found or a file written
    pub fn solved(text: &str) -> String {
        Self::paint(text, Tone::Solved)
    }

    /// The puzzle has no tiling
    pub fn unsatisfiable(text: &str) -> String {
        Self::paint(text, Tone::Unsatisfiable)
    }

    /// A layout or model was rejected
    pub fn rejected(text: &str) -> String {
        Self::paint(text, Tone::Rejected)
    }

    pub fn progress(text: &str) -> String {
        Self::paint(text, Tone::Progress)
    }

    pub fn heading(text: &str) -> String {
        Self::paint(text, Tone::Heading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Solved,
    Unsatisfiable,
    Rejected,
    Progress,
    Heading,
}

impl Tone {
    /// SGR parameter: bold or plain foreground colour
    fn sgr(self) -> &'static str {
        match self {
            Tone::Solved => "1;32",
            Tone::Unsatisfiable => "33",
            Tone::Rejected => "1;31",
            Tone::Progress => "34",
            Tone::Heading => "1;36",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::{load_layout_from_file, PuzzleSpec, ShapeClass::*};
    use std::time::Duration;
    use tempfile::tempdir;

    fn sample_solution() -> Solution {
        let layout = Layout::from_rows(
            vec![Bar, Square, L, ReverseL],
            vec![
                vec![0, 0, 0, 0],
                vec![2, 1, 1, 3],
                vec![2, 1, 1, 3],
                vec![2, 2, 3, 3],
            ],
        )
        .unwrap();
        let puzzle = PuzzleSpec::new(4, 4, &[1, 2, 3, 4]).unwrap();
        Solution::new(puzzle, layout, Duration::from_millis(3), "cadical", 256, 1000)
    }

    #[test]
    fn test_layout_formatting() {
        let solution = sample_solution();

        let pieces = SolutionFormatter::format_piece_grid(&solution.layout);
        assert_eq!(pieces, "AAAA\nCBBD\nCBBD\nCCDD\n");

        let with_coords = SolutionFormatter::format_layout_with_coords(&solution.layout);
        assert!(with_coords.contains(" 0 1 2 3"));
        assert!(with_coords.contains(" 3  3 3 4 4"));
    }

    #[test]
    fn test_solution_formatting() {
        let text = SolutionFormatter::format_solution(&sample_solution(), false);
        assert!(text.contains("Grid: 4x4"));
        assert!(text.contains("1111\n3224\n3224\n3344\n"));

        let summary = SolutionFormatter::format_solution_summary(&[sample_solution()]);
        assert!(summary.contains("cadical"));
    }

    #[test]
    fn test_compare_solutions() {
        let comparison = SolutionFormatter::compare_solutions(&[sample_solution(), sample_solution()]);
        assert!(comparison.contains("1111  |  1111"));
        assert_eq!(SolutionFormatter::compare_solutions(&[]), "No solutions to compare");
    }

    #[test]
    fn test_save_solutions() {
        let temp_dir = tempdir().unwrap();
        let solutions = vec![sample_solution()];

        SolutionFormatter::save_solutions(&solutions, temp_dir.path(), OutputFormat::Json).unwrap();
        let loaded = Solution::load_from_file(temp_dir.path().join("tiling_001.json")).unwrap();
        assert_eq!(loaded.layout, solutions[0].layout);
        assert!(temp_dir.path().join("index.json").exists());

        SolutionFormatter::save_solutions(&solutions, temp_dir.path(), OutputFormat::Text).unwrap();
        let layout = load_layout_from_file(temp_dir.path().join("tiling_001.txt")).unwrap();
        assert_eq!(layout, solutions[0].layout);
    }

    #[test]
    fn test_status_lines_keep_their_text() {
        assert!(StatusLine::solved("Found 1 tiling").contains("Found 1 tiling"));
        assert_eq!(Tone::Rejected.sgr(), "1;31");
    }
}
