//! Time-sliced pathfinding demo.
//!
//! Spends a fixed number of A* expansions per simulated frame until the
//! search terminates, then prints the maze with the path overlaid.
//!
//! Run: RUST_LOG=debug cargo run --bin maze -- [steps-per-frame]

use lodestar_demos::{DEFAULT_MAZE, Maze};
use lodestar_paths::{AStarPathResolver, PathStatus, SteppingPathResolver};

const DEFAULT_STEPS_PER_FRAME: usize = 4;
/// Give up if the search has not finished after this many frames.
const MAX_FRAMES: usize = 10_000;

fn main() {
    env_logger::init();

    let steps_per_frame = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                eprintln!("Error: steps-per-frame must be a positive integer, got {arg:?}");
                std::process::exit(2);
            }
        },
        None => DEFAULT_STEPS_PER_FRAME,
    };

    if let Err(e) = run(steps_per_frame) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(steps_per_frame: usize) -> Result<(), Box<dyn std::error::Error>> {
    let maze = Maze::parse(DEFAULT_MAZE)?;
    let mut resolver = AStarPathResolver::with_graph(&maze, &maze);
    resolver.set_start(maze.start())?;
    resolver.set_goal(maze.goal())?;

    resolver.begin_stepped_reduce()?;
    let mut frames = 0;
    let status = loop {
        frames += 1;
        let status = resolver.step_many(steps_per_frame)?;
        log::debug!(
            "frame {frames}: {status}, {} expansions so far",
            resolver.expansions()
        );
        if status.is_terminal() {
            break status;
        }
        if frames >= MAX_FRAMES {
            log::warn!("giving up after {frames} frames");
            resolver.reset();
            break PathStatus::Failed;
        }
    };

    let cost = resolver.terminal_cost();
    let mut path = Vec::new();
    let len = resolver.end_stepped_reduce(&mut path);

    print!("{}", maze.render(&path));
    match (status, cost) {
        (PathStatus::Complete, Some(cost)) => println!(
            "path of {len} tiles, cost {cost}, found in {frames} frames of {steps_per_frame} steps"
        ),
        _ => println!("no path after {frames} frames"),
    }
    Ok(())
}
