use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use scramble_solver::cube::Cube;
use scramble_solver::report;
use scramble_solver::solver::{solve_with_config, SolverConfig};
use scramble_solver::state::PuzzleState;
use std::process;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Solves scrambled cubes with best-first search; solutions may be longer than optimal",
    long_about = None
)]
struct Args {
    /// Cube order N (2 = pocket cube). Order 3 scrambles deeper than a
    /// few turns are beyond an exhaustive sticker-level search.
    #[clap(short, long, default_value_t = 2)]
    order: usize,

    /// Number of random quarter-turns in the scramble
    #[clap(long, default_value_t = 5)]
    scramble: usize,

    /// Seed for the scramble generator; random when omitted
    #[clap(short, long)]
    seed: Option<u64>,

    /// Stop after this many node expansions
    #[clap(long, default_value_t = 2_000_000)]
    max_expansions: u64,

    /// Stop after this many seconds of search
    #[clap(long)]
    timeout_secs: Option<u64>,
}

fn run(args: &Args) -> Result<(), String> {
    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let (start, scramble) =
        Cube::scramble(args.order, args.scramble, &mut rng).map_err(|e| e.to_string())?;

    if scramble.is_empty() {
        println!("No scramble requested; the cube starts solved.");
    } else {
        println!("Scramble ({} turns):", scramble.len());
        for (i, mv) in scramble.iter().enumerate() {
            println!("  {}. {}", i + 1, mv);
        }
    }
    println!("\nScrambled cube:\n{}", start);

    let config = SolverConfig {
        max_expansions: Some(args.max_expansions),
        timeout: args.timeout_secs.map(Duration::from_secs),
    };
    println!("Searching...\n");
    let solution = solve_with_config(&start, &config).map_err(|e| e.to_string())?;

    println!("{}", report::transcript(&solution));

    // Replay the twist list over the scrambled cube as an end-to-end check.
    if start.apply_all(&solution.moves).is_goal() {
        println!("Replay check passed: the twist list restores the cube.");
        Ok(())
    } else {
        Err("replay check failed: the twist list does not restore the cube".to_string())
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(message) = run(&args) {
        eprintln!("{}", message);
        process::exit(1);
    }
}
