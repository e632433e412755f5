use std::time::Instant;

use mazeflow::{
    app::Session,
    config::MazeConfig,
    frames::CountingRenderer,
    solvers::Solver,
};

/// Runs generate-and-solve cycles on the largest grid without a terminal.
fn main() -> mazeflow::Result<()> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(1);

    let config = MazeConfig {
        width: 255,
        height: 255,
        target_fps: 1_000,
        seed: Some(0),
        ..Default::default()
    };
    let counter = CountingRenderer::new();
    let mut session = Session::new(config, counter.clone())?;

    for i in 0..num_iters {
        let started = Instant::now();
        let report = session.run(&[Solver::Bfs, Solver::Dfs])?;
        println!(
            "iteration {}: {:?}, {} merges, {} frames rendered so far",
            i,
            started.elapsed(),
            report.generation.merges,
            counter.count()
        );
    }
    Ok(())
}
