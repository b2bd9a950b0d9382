//! Command-line interface for the chain puzzle solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use domino_chain::{
    chain::{ChainProblem, ChainValidator, Solution},
    config::{CliOverrides, OutputFormat, Settings},
    puzzle::{create_example_regions, load_region_from_file},
    utils::SolutionFormatter,
    SolveError,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "domino_chain")]
#[command(about = "Chain-tiling puzzle solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a chain puzzle
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Region file (overrides config)
        #[arg(short, long)]
        region: Option<PathBuf>,

        /// Piece size, i.e. highest pip value (overrides config)
        #[arg(short, long)]
        piece_size: Option<u8>,

        /// Solver time budget in seconds (overrides config)
        #[arg(short, long)]
        time_budget: Option<u64>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the chain order along with the grid
        #[arg(long)]
        show_chain: bool,
    },

    /// Create example configuration and region files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Re-validate a saved solution against a region
    Validate {
        /// Solution JSON file
        #[arg(short, long)]
        solution: PathBuf,

        /// Region file the solution claims to cover
        #[arg(short, long)]
        region: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config,
            region,
            piece_size,
            time_budget,
            output,
            show_chain,
        } => {
            let mut settings = Settings::from_file(&config)
                .with_context(|| format!("Failed to load config: {}", config.display()))?;
            settings.merge_with_cli(&CliOverrides {
                piece_size,
                region_file: region,
                time_budget_seconds: time_budget,
                output_dir: output,
            });
            run_solve(settings, show_chain)
        }
        Commands::Setup { directory, force } => run_setup(&directory, force),
        Commands::Validate { solution, region } => run_validate(&solution, &region),
    }
}

fn run_solve(settings: Settings, show_chain: bool) -> Result<()> {
    let mut problem = ChainProblem::new(settings.clone())?;

    match problem.solve() {
        Ok(solution) => {
            print_solution(&settings, &solution, show_chain)?;
            if settings.output.save_solutions {
                let path = settings.output.output_directory.join("solution.json");
                solution.save_to_file(&path)?;
                println!("Saved solution to {}", path.display());
            }
            Ok(())
        }
        Err(SolveError::Infeasible {
            pieces,
            cells,
            elapsed,
        }) => {
            eprintln!(
                "Puzzle is infeasible: {} pieces cannot tile {} cells as one chain (proved in {:.3}s)",
                pieces,
                cells,
                elapsed.as_secs_f64()
            );
            std::process::exit(1);
        }
        Err(SolveError::Timeout { budget, elapsed }) => {
            eprintln!(
                "Solver gave up after {:.3}s (budget {:.0}s); retry with a larger --time-budget",
                elapsed.as_secs_f64(),
                budget.as_secs_f64()
            );
            std::process::exit(2);
        }
        Err(err @ SolveError::Reconstruction(_)) => Err(err.into()),
    }
}

fn print_solution(settings: &Settings, solution: &Solution, show_chain: bool) -> Result<()> {
    match settings.output.format {
        OutputFormat::Text => {
            println!("{}", SolutionFormatter::format_summary(solution));
            if show_chain {
                println!("{}", solution.format_chain());
            }
        }
        OutputFormat::Json => println!("{}", solution.to_json()?),
        OutputFormat::Visual => {
            print!(
                "{}",
                SolutionFormatter::format_solution(solution, show_chain)
            );
        }
    }
    Ok(())
}

fn run_setup(directory: &PathBuf, force: bool) -> Result<()> {
    let config_path = directory.join("config/default.yaml");
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    let region_dir = directory.join("input/regions");
    let written = create_example_regions(&region_dir)?;
    for path in &written {
        println!("Wrote {}", path);
    }

    let mut settings = Settings::default();
    settings.puzzle.piece_size = 2;
    settings.puzzle.region_file = region_dir.join("open_3x4.txt");
    settings.output.output_directory = directory.join("output/solutions");
    settings.to_file(&config_path)?;
    println!("Wrote {}", config_path.display());
    println!("Try: domino_chain solve --config {}", config_path.display());

    Ok(())
}

fn run_validate(solution_path: &PathBuf, region_path: &PathBuf) -> Result<()> {
    let solution = Solution::load_from_file(solution_path)
        .with_context(|| format!("Failed to load solution: {}", solution_path.display()))?;
    let region = load_region_from_file(region_path)?;

    let validator = ChainValidator::new(region, solution.piece_count);
    let result = validator.validate(&solution);
    print!("{}", result);

    if !result.is_valid {
        std::process::exit(1);
    }
    Ok(())
}
