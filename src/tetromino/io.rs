//! Parsing and file I/O for piece lists and layouts

use super::{Layout, ShapeClass};
use crate::error::ConfigurationError;
use anyhow::{Context, Result};
use std::path::Path;

const PIECES_HEADER: &str = "# pieces:";

/// Parse a comma separated list of shape ids such as `"1,7,7,2"`
///
/// Ids are not range-checked here; that happens when the puzzle is validated.
pub fn parse_piece_list(input: &str) -> Result<Vec<u8>, ConfigurationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConfigurationError::NoPieces);
    }

    trimmed
        .split(',')
        .map(|token| {
            let token = token.trim();
            token.parse::<u8>().map_err(|_| ConfigurationError::InvalidPieceList {
                input: input.to_string(),
                reason: format!("'{}' is not a shape id", token),
            })
        })
        .collect()
}

/// Render shape ids back to the comma separated form
pub fn format_piece_list(pieces: &[ShapeClass]) -> String {
    pieces
        .iter()
        .map(|shape| shape.id().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Load a layout from a text file
///
/// Format: a `# pieces: 1,2,3` header line followed by one line per row,
/// each holding the whitespace separated piece index of every cell.
pub fn load_layout_from_file<P: AsRef<Path>>(path: P) -> Result<Layout> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read layout file: {}", path.as_ref().display()))?;

    parse_layout_from_string(&content)
        .with_context(|| format!("Failed to parse layout from file: {}", path.as_ref().display()))
}

/// Parse a layout from its text representation
pub fn parse_layout_from_string(content: &str) -> Result<Layout> {
    let mut pieces = None;
    let mut rows = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(list) = line.strip_prefix(PIECES_HEADER) {
            let ids = parse_piece_list(list)?;
            let shapes = ids
                .into_iter()
                .map(ShapeClass::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            pieces = Some(shapes);
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<usize>().with_context(|| {
                    format!("Invalid piece index '{}' on line {}", token, line_idx + 1)
                })
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }

    let pieces = pieces.context("Layout is missing the '# pieces:' header")?;
    Layout::from_rows(pieces, rows)
}

/// Convert a layout to its text representation
pub fn layout_to_string(layout: &Layout) -> String {
    let width = layout.pieces.len().saturating_sub(1).to_string().len();
    let mut result = format!("{} {}\n", PIECES_HEADER, format_piece_list(&layout.pieces));

    for row in 0..layout.rows {
        let line: Vec<String> = (0..layout.cols)
            .map(|col| format!("{:>width$}", layout.piece_at(row, col), width = width))
            .collect();
        result.push_str(&line.join(" "));
        result.push('\n');
    }

    result
}

/// Save a layout to a text file
pub fn save_layout_to_file<P: AsRef<Path>>(layout: &Layout, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, layout_to_string(layout))
        .with_context(|| format!("Failed to write layout to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Write sample layouts that the `validate` command can check
pub fn create_example_layouts<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let four_by_four = "# pieces: 1,2,3,4\n0 0 0 0\n2 1 1 3\n2 1 1 3\n2 2 3 3\n";
    std::fs::write(dir.join("four_by_four.txt"), four_by_four)
        .context("Failed to write four_by_four.txt")?;

    let square = "# pieces: 2\n0 0\n0 0\n";
    std::fs::write(dir.join("square.txt"), square)
        .context("Failed to write square.txt")?;

    // Two bars side by side claimed as one: fails validation
    let broken = "# pieces: 1,1\n0 0 0 0\n1 1 1 1\n0 1 0 1\n";
    std::fs::write(dir.join("broken.txt"), broken)
        .context("Failed to write broken.txt")?;

    Ok(())
}
