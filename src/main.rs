//! Fifteen Puzzle Solver
//!
//! Checks whether a 4x4 sliding-tile board can be solved and finds a
//! sequence of slides that solves it. Boards are sixteen whitespace-separated
//! tokens in row-major order, tiles 1-15 and `E` for the empty cell.

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::{thread_rng, SeedableRng};

use fifteen::geometry::{manhattan_distance, CELLS};
use fifteen::moves::{self, DEFAULT_SCRAMBLE_MOVES};
use fifteen::{Arrangement, Solver, SolverConfig, Strategy};

/// Tiles in reverse order; the parity check rejects it.
const REVERSED_BOARD: &str = "\
15 14 13 12
11 10 9 8
7 6 5 4
3 2 1 E";

const SCRAMBLED_BOARD: &str = "\
12 1 2 15
11 6 5 8
7 10 9 4
E 13 14 3";

/// Checks and solves fifteen puzzle boards.
#[derive(Parser)]
#[command(name = "fifteen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more detail (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a board read from FILE, or stdin if omitted.
    Solve {
        file: Option<PathBuf>,
        /// Search for a shortest solution (slower).
        #[arg(long)]
        strict: bool,
        /// Give up after expanding this many arrangements.
        #[arg(long)]
        max_expansions: Option<usize>,
    },
    /// Describe a board and report whether it can be solved.
    Check { file: Option<PathBuf> },
    /// Print a random solvable board.
    Scramble {
        /// Number of random slides from the solved board.
        #[arg(short, long, default_value_t = DEFAULT_SCRAMBLE_MOVES)]
        moves: usize,
        /// Seed for a reproducible board.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .parse_default_env()
        .init();

    let result = match cli.command {
        Some(Command::Solve {
            file,
            strict,
            max_expansions,
        }) => {
            let strategy = if strict {
                Strategy::Strict
            } else {
                Strategy::BestFirst
            };
            read_board(file.as_deref()).and_then(|arrangement| {
                run_solver(
                    &arrangement,
                    SolverConfig {
                        strategy,
                        max_expansions,
                    },
                )
            })
        }
        Some(Command::Check { file }) => read_board(file.as_deref()).map(|arrangement| {
            println!("{}", describe(&arrangement));
        }),
        Some(Command::Scramble { moves, seed }) => {
            run_scramble(moves, seed);
            Ok(())
        }
        None => run_builtin(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Reads a board from `path`, or from stdin when no path is given.
fn read_board(path: Option<&Path>) -> Result<Arrangement, Box<dyn Error>> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("unable to read {}: {}", path.display(), e))?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    Ok(text.parse()?)
}

/// Human-readable summary of a board and its solvability.
fn describe(arrangement: &Arrangement) -> String {
    let permutation = arrangement.permutation();
    [
        format!("Puzzle:\n{}\n", arrangement),
        format!("Positions -> tiles: {}", permutation),
        format!("Tiles -> positions: {}", permutation.inverse()),
        format!("Parity: {}", arrangement.parity()),
        format!(
            "Manhattan distance of empty cell from bottom-right corner: {}",
            manhattan_distance(arrangement.empty_position(), CELLS)
        ),
        format!("Valid arrangement: {}", arrangement.is_solvable()),
    ]
    .join("\n")
}

/// Validates, solves and prints the solution.
fn run_solver(arrangement: &Arrangement, config: SolverConfig) -> Result<(), Box<dyn Error>> {
    println!("{:#}\n", arrangement);
    arrangement.validate()?;

    let solution = Solver::new(config).solve(arrangement)?;
    println!("{}", solution);
    println!(
        "\n{} moves, expanded {} of {} discovered arrangements",
        solution.len(),
        solution.expansions,
        solution.discovered
    );
    Ok(())
}

fn run_scramble(num_moves: usize, seed: Option<u64>) {
    let start = Arrangement::identity();
    let arrangement = match seed {
        Some(seed) => moves::scramble(&start, num_moves, &mut StdRng::seed_from_u64(seed)),
        None => moves::scramble(&start, num_moves, &mut thread_rng()),
    };
    println!("{}", arrangement);
}

/// Checks the reversed board, then solves the scrambled one.
fn run_builtin() -> Result<(), Box<dyn Error>> {
    println!("PART 1:\n------");
    let reversed: Arrangement = REVERSED_BOARD.parse()?;
    println!("{}\n", describe(&reversed));

    println!("PART 2:\n------");
    let scrambled: Arrangement = SCRAMBLED_BOARD.parse()?;
    println!("{}\n", describe(&scrambled));
    run_solver(&scrambled, SolverConfig::default())
}
