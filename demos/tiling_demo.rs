//! Demonstration of the tiling entry point
//!
//! Solves a few small puzzles through `solve_tiling` and prints the layouts,
//! then enumerates every distinct tiling of a 4x4 board with four castle pieces.

use tetromino_sat::sat::CadicalBackend;
use tetromino_sat::utils::SolutionFormatter;
use tetromino_sat::{solve_tiling, ConfigurationError, PuzzleSpec, TilingOutcome, TilingProblem};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Tetromino Tiling Demonstration ===\n");

    show_puzzle(4, 4, &[1, 2, 3, 4])?;
    show_puzzle(2, 2, &[2])?;
    show_puzzle(1, 4, &[2])?;

    // Wrong total area is rejected before anything is encoded
    println!("Puzzle 3x3 with pieces [1]:");
    match solve_tiling(3, 3, &[1]) {
        Ok(_) => return Err("Expected a configuration error".into()),
        Err(err) => match err.downcast_ref::<ConfigurationError>() {
            Some(config) => println!("  Rejected: {}\n", config),
            None => return Err(err.into()),
        },
    }

    println!("All distinct tilings of 4x4 with four castle pieces:");
    let problem = TilingProblem::from_puzzle(PuzzleSpec::new(4, 4, &[7, 7, 7, 7])?, true)?;
    let solutions = problem.solve_all(&CadicalBackend::new(), 10)?;
    println!("{}", SolutionFormatter::format_solution_summary(&solutions));
    println!("{}", SolutionFormatter::compare_solutions(&solutions));

    Ok(())
}

fn show_puzzle(rows: usize, cols: usize, pieces: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    println!("Puzzle {}x{} with pieces {:?}:", rows, cols, pieces);

    match solve_tiling(rows, cols, pieces)? {
        TilingOutcome::Solved(solution) => {
            println!("{}", SolutionFormatter::format_solution(&solution, true));
        }
        TilingOutcome::NoSolution => {
            println!("  No tiling exists\n");
        }
    }

    Ok(())
}
