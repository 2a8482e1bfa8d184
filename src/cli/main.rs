/*!
A command line interface to the weaver library, in the shape of a Sudoku solver.

A puzzle file is parsed, encoded as a formula, and handed to a tree of workers, each on an OS
thread of its own.
The first worker to conclude ends the solve for all, and a satisfying valuation is printed as a
completed board.
*/

use std::{path::PathBuf, thread, time::Instant};

use clap::{Parser, ValueEnum};

use weaver_sat::{
    config::{Config, Polarity},
    context::Context,
    dist::{transport::ChannelTransport, worker::Worker},
    formula::build::Puzzle,
    reports::Report,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolarityArg {
    /// Satisfy the picked clause on the first branch.
    Greedy,
    /// Falsify the picked clause on the first branch.
    Opposite,
    /// Always branch on true first.
    True,
    /// Always branch on false first.
    False,
}

impl From<PolarityArg> for Polarity {
    fn from(arg: PolarityArg) -> Self {
        match arg {
            PolarityArg::Greedy => Polarity::Greedy,
            PolarityArg::Opposite => Polarity::Opposite,
            PolarityArg::True => Polarity::AlwaysTrue,
            PolarityArg::False => Polarity::AlwaysFalse,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "A distributed SAT solver for Sudoku puzzles")]
struct Args {
    /// The puzzle file to solve.
    puzzle: PathBuf,

    /// How many workers to spawn.
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// The arity of the worker tree.
    #[arg(short, long, default_value_t = 2)]
    branching_factor: usize,

    /// The heuristic ordering the two branches of a decision.
    #[arg(long, value_enum, default_value_t = PolarityArg::Greedy)]
    polarity: PolarityArg,

    /// Flip the first branch polarity at random.
    #[arg(long, default_value_t = false)]
    random_first_pick: bool,

    /// Search clauses for unit consequences rather than reading them off the grid.
    #[arg(long, default_value_t = false)]
    no_smart_propagation: bool,

    /// Backtrack chronologically rather than learning clauses from conflicts.
    #[arg(long, default_value_t = false)]
    no_conflict_learning: bool,

    /// How many learned clauses each worker holds.
    #[arg(long, default_value_t = 128)]
    conflict_clause_limit: usize,

    /// A seed for branch randomisation, offset by each worker's rank.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn config_from_args(args: &Args) -> Config {
    Config {
        branching_factor: args.branching_factor,
        polarity: args.polarity.into(),
        random_first_pick: args.random_first_pick,
        smart_propagation: !args.no_smart_propagation,
        conflict_learning: !args.no_conflict_learning,
        conflict_clause_limit: args.conflict_clause_limit,
        seed: args.seed,
    }
}

fn print_board(board: &[Vec<u16>]) {
    let width = board.len().to_string().len();
    for row in board {
        let cells: Vec<String> = row.iter().map(|value| format!("{value:width$}")).collect();
        println!("{}", cells.join(" "));
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let config = config_from_args(&args);
    let workers = args.workers.max(1);

    let text = match std::fs::read_to_string(&args.puzzle) {
        Ok(text) => text,
        Err(e) => {
            println!("c Failed to read {:?}: {e}", args.puzzle);
            std::process::exit(1);
        }
    };
    let puzzle = match Puzzle::parse(&text) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            println!("c Failed to parse {:?}: {e:?}", args.puzzle);
            std::process::exit(1);
        }
    };

    let setup_start = Instant::now();
    let formulas: Result<Vec<_>, _> = (0..workers).map(|_| puzzle.formula()).collect();
    let formulas = match formulas {
        Ok(formulas) => formulas,
        Err(e) => {
            println!("c Failed to encode {:?}: {e:?}", args.puzzle);
            std::process::exit(1);
        }
    };
    println!("c Setup took {:.6?}", setup_start.elapsed());

    let solve_start = Instant::now();
    let transports = ChannelTransport::grid(workers);

    let mut handles = Vec::with_capacity(workers);
    for (rank, (formula, transport)) in formulas.into_iter().zip(transports).enumerate() {
        let mut config = config.clone();
        config.seed = config.seed.wrapping_add(rank as u64);
        handles.push(thread::spawn(move || {
            let context = Context::from_formula(formula, config);
            let mut worker = Worker::new(context, transport);
            let report = worker.run();
            (report, worker)
        }));
    }

    let mut conclusion = Report::Unknown;
    let mut board = None;
    for handle in handles {
        let (report, worker) = match handle.join() {
            Ok(result) => result,
            Err(_) => {
                println!("c A worker panicked");
                std::process::exit(1);
            }
        };
        match report {
            Ok(Report::Satisfiable) => {
                conclusion = Report::Satisfiable;
                board = worker.context.formula.sudoku_board();
            }
            Ok(Report::Unsatisfiable) => {
                if conclusion != Report::Satisfiable {
                    conclusion = Report::Unsatisfiable;
                }
            }
            Ok(_) => {}
            Err(e) => {
                println!("c Worker error: {e:?}");
                std::process::exit(1);
            }
        }
    }
    println!("c Solve took {:.6?}", solve_start.elapsed());

    match conclusion {
        Report::Satisfiable => {
            println!("s SATISFIABLE");
            if let Some(board) = board {
                print_board(&board);
            }
        }
        Report::Unsatisfiable => println!("s UNSATISFIABLE"),
        _ => println!("s UNKNOWN"),
    }
}
