//! Main CLI application for the tetromino tiling solver

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tetromino_sat::{
    config::{CliOverrides, OutputFormat, Settings},
    sat::{dimacs, CadicalBackend, SolveOutcome},
    tetromino::{create_example_layouts, format_piece_list, load_layout_from_file, parse_piece_list, ShapeClass},
    tiling::{LayoutValidator, Solution, TilingProblem},
    utils::{SolutionFormatter, StatusLine},
};

#[derive(Parser)]
#[command(name = "tetromino_sat")]
#[command(about = "Tetromino tiling puzzles solved with SAT")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the puzzle comes from: a config file, optionally overridden
#[derive(Args, Debug)]
struct PuzzleArgs {
    /// Number of grid rows
    rows: Option<usize>,

    /// Number of grid columns
    cols: Option<usize>,

    /// Comma separated shape ids, e.g. 1,7,7,2
    pieces: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "config/default.yaml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a tiling puzzle
    Solve {
        #[command(flatten)]
        puzzle: PuzzleArgs,

        /// Maximum number of distinct tilings to find (overrides config)
        #[arg(short, long)]
        max_solutions: Option<usize>,

        /// Save solutions to this directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format for saved solutions (overrides config)
        #[arg(short, long, value_parser = parse_format)]
        format: Option<OutputFormat>,

        /// Also show which piece instance covers each cell
        #[arg(long)]
        show_pieces: bool,
    },

    /// Create example configuration and layout files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Check that a layout file is a valid tiling
    Validate {
        /// Layout file
        layout: PathBuf,

        /// Show which piece instance covers each cell
        #[arg(long)]
        show_pieces: bool,
    },

    /// Show encoding size and complexity of a puzzle
    Analyze {
        #[command(flatten)]
        puzzle: PuzzleArgs,
    },

    /// Write the puzzle's CNF formula in DIMACS format
    Export {
        #[command(flatten)]
        puzzle: PuzzleArgs,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode an external solver's model for a puzzle
    Decode {
        #[command(flatten)]
        puzzle: PuzzleArgs,

        /// Solver output file (`s`/`v` lines or MiniSat result)
        #[arg(short, long)]
        model: PathBuf,
    },

    /// List the shape ids and their sketches
    Shapes,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    match cli.command {
        Commands::Solve {
            puzzle,
            max_solutions,
            output,
            format,
            show_pieces,
        } => solve_command(puzzle, max_solutions, output, format, show_pieces, cli.verbose),
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Validate { layout, show_pieces } => validate_command(layout, show_pieces),
        Commands::Analyze { puzzle } => analyze_command(puzzle),
        Commands::Export { puzzle, output } => export_command(puzzle, output),
        Commands::Decode { puzzle, model } => decode_command(puzzle, model),
        Commands::Shapes => {
            shapes_command();
            Ok(())
        }
    }
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    match value {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(format!("unknown format '{}' (expected text or json)", other)),
    }
}

/// Load settings from the config file (or defaults) and apply the puzzle given on the command line
fn load_settings(puzzle: &PuzzleArgs, mut overrides: CliOverrides) -> Result<Settings> {
    let mut settings = if puzzle.config.exists() {
        Settings::from_file(&puzzle.config)
            .with_context(|| format!("Failed to load config from {}", puzzle.config.display()))?
    } else {
        log::info!("Config file {} not found, using defaults", puzzle.config.display());
        Settings::default()
    };

    overrides.rows = puzzle.rows;
    overrides.cols = puzzle.cols;
    overrides.pieces = puzzle.pieces.as_deref().map(parse_piece_list).transpose()?;
    settings.merge_with_cli(&overrides);

    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn solve_command(
    puzzle: PuzzleArgs,
    max_solutions: Option<usize>,
    output_dir: Option<PathBuf>,
    format: Option<OutputFormat>,
    show_pieces: bool,
    verbose: bool,
) -> Result<()> {
    let settings = load_settings(
        &puzzle,
        CliOverrides {
            max_solutions,
            output_dir,
            format,
            ..Default::default()
        },
    )?;

    println!(
        "{}",
        StatusLine::progress(&format!(
            "Tiling a {}x{} grid with pieces {}",
            settings.puzzle.rows,
            settings.puzzle.cols,
            format_piece_list(&settings.puzzle_spec()?.pieces)
        ))
    );

    let start_time = Instant::now();
    let problem = TilingProblem::new(&settings).context("Failed to create tiling problem")?;

    if verbose {
        println!("{}", problem.estimate_complexity());
    }

    let solutions = problem
        .solve_all(&CadicalBackend::new(), settings.solver.max_solutions)
        .context("Failed to solve tiling problem")?;
    let total_time = start_time.elapsed();

    if solutions.is_empty() {
        println!("{}", StatusLine::unsatisfiable("Unsatisfiable: no tiling exists"));
        return Ok(());
    }

    println!(
        "{}",
        StatusLine::solved(&format!(
            "Found {} tiling(s) in {:.3}s",
            solutions.len(),
            total_time.as_secs_f64()
        ))
    );

    if solutions.len() > 1 {
        println!("\n{}", SolutionFormatter::format_solution_summary(&solutions));
        if !verbose && !show_pieces {
            print!("{}", SolutionFormatter::compare_solutions(&solutions));
        }
    }
    if verbose || show_pieces || solutions.len() == 1 {
        for solution in &solutions {
            print_solution(solution, show_pieces, verbose);
        }
    }

    if settings.output.save {
        SolutionFormatter::save_solutions(&solutions, &settings.output.output_directory, settings.output.format)
            .context("Failed to save solutions")?;
        println!(
            "{}",
            StatusLine::solved(&format!(
                "Solutions saved to {}",
                settings.output.output_directory.display()
            ))
        );
    }

    if verbose {
        println!("\n{}", problem.encoding_statistics()?);
    }

    Ok(())
}

fn print_solution(solution: &Solution, show_pieces: bool, verbose: bool) {
    if verbose {
        println!("\n{}", SolutionFormatter::format_solution(solution, show_pieces));
        return;
    }

    println!();
    print!("{}", solution.layout);
    if show_pieces {
        println!();
        print!("{}", SolutionFormatter::format_piece_grid(&solution.layout));
    }
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", StatusLine::progress("Setting up project structure..."));

    let config_dir = directory.join("config");
    let layout_dir = directory.join("input/layouts");
    let output_dir = directory.join("output/solutions");

    for dir in [&config_dir, &layout_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_layouts(&layout_dir).context("Failed to create example layouts")?;
    println!("Created example layouts in: {}", layout_dir.display());

    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;
    write_example_config(&examples_dir.join("square.yaml"), 2, 2, &[2], 1)?;
    write_example_config(&examples_dir.join("strip.yaml"), 1, 4, &[2], 1)?;
    write_example_config(
        &examples_dir.join("six_by_eight.yaml"),
        6,
        8,
        &[1, 7, 7, 2, 2, 5, 6, 6, 6, 4, 4, 4],
        3,
    )?;
    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", StatusLine::solved("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Run: tetromino_sat solve --config config/examples/six_by_eight.yaml");
    println!("3. Or:  tetromino_sat solve 4 4 1,2,3,4");

    Ok(())
}

fn write_example_config(path: &Path, rows: usize, cols: usize, pieces: &[u8], max_solutions: usize) -> Result<()> {
    let mut settings = Settings::default();
    settings.puzzle.rows = rows;
    settings.puzzle.cols = cols;
    settings.puzzle.pieces = pieces.to_vec();
    settings.solver.max_solutions = max_solutions;
    settings.to_file(path)
}

fn validate_command(layout_path: PathBuf, show_pieces: bool) -> Result<()> {
    println!("{}", StatusLine::progress("Validating layout..."));

    let layout = load_layout_from_file(&layout_path)?;
    print!("{}", SolutionFormatter::format_layout_with_coords(&layout));
    if show_pieces {
        println!();
        print!("{}", SolutionFormatter::format_piece_grid(&layout));
    }

    let result = LayoutValidator::new().validate(&layout);
    println!("\n{}", result);

    if result.is_valid {
        println!("{}", StatusLine::solved("Layout is a valid tiling"));
    } else {
        println!("{}", StatusLine::rejected("Layout is not a valid tiling"));
    }

    Ok(())
}

fn analyze_command(puzzle: PuzzleArgs) -> Result<()> {
    println!("{}", StatusLine::progress("Analyzing puzzle..."));

    let settings = load_settings(&puzzle, CliOverrides::default())?;
    let problem = TilingProblem::new(&settings).context("Failed to create problem for analysis")?;

    println!("Puzzle: {}x{}", settings.puzzle.rows, settings.puzzle.cols);
    for shape in ShapeClass::ALL {
        let count = problem.puzzle().pieces.iter().filter(|&&p| p == shape).count();
        if count > 0 {
            println!("  {} x {} ({})", count, shape.name(), shape.id());
        }
    }

    println!("\n{}", problem.variable_statistics());
    println!("{}", problem.estimate_complexity());
    println!("{}", problem.encoding_statistics()?);

    Ok(())
}

fn export_command(puzzle: PuzzleArgs, output: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(&puzzle, CliOverrides::default())?;
    let problem = TilingProblem::new(&settings)?;
    let formula = problem.encode()?;

    let comments = vec![
        format!("tetromino tiling {}x{}", settings.puzzle.rows, settings.puzzle.cols),
        format!("pieces {}", format_piece_list(&problem.puzzle().pieces)),
        "variable 1 + ((row * cols + col) * pieces + piece) * 4 + role".to_string(),
    ];

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            dimacs::write_dimacs(&formula, &comments, file)?;
            println!(
                "{}",
                StatusLine::solved(&format!(
                    "Wrote {} variables and {} clauses to {}",
                    formula.variable_count(),
                    formula.clause_count(),
                    path.display()
                ))
            );
        }
        None => dimacs::write_dimacs(&formula, &comments, std::io::stdout().lock())?,
    }

    Ok(())
}

fn decode_command(puzzle: PuzzleArgs, model_path: PathBuf) -> Result<()> {
    let settings = load_settings(&puzzle, CliOverrides::default())?;
    let problem = TilingProblem::new(&settings)?;

    let file = File::open(&model_path)
        .with_context(|| format!("Failed to open {}", model_path.display()))?;
    let outcome = dimacs::parse_model(BufReader::new(file))
        .with_context(|| format!("Failed to read model from {}", model_path.display()))?;

    let assignment = match outcome {
        SolveOutcome::Satisfiable(assignment) => assignment,
        SolveOutcome::Unsatisfiable => {
            println!("{}", StatusLine::unsatisfiable("Unsatisfiable: no tiling exists"));
            return Ok(());
        }
    };

    let layout = problem
        .decode_external_model(&assignment)
        .with_context(|| format!("Model in {} does not describe a valid tiling", model_path.display()))?;
    print!("{}", layout);

    Ok(())
}

fn shapes_command() {
    println!("{}", StatusLine::heading("Shape ids"));
    for shape in ShapeClass::ALL {
        println!(
            "\n{} {} ({} orientation{})",
            shape.id(),
            shape.name(),
            shape.orientations().len(),
            if shape.orientations().len() == 1 { "" } else { "s" }
        );
        for line in shape.sketch().lines() {
            println!("    {}", line);
        }
    }
    println!("\nExample: tetromino_sat solve 6 8 1,7,7,2,2,5,6,6,6,4,4,4");
}
