use std::path::PathBuf;

use clap::Parser;
use mazeflow::{
    app::{self, Session, SessionReport, TerminalRenderer},
    config::{DEFAULT_MERGE_CHANCE, DEFAULT_TARGET_FPS, MazeConfig},
    frames::CountingRenderer,
    solvers::Solver,
};
use tracing_subscriber::EnvFilter;

/// Generate a maze by merging regions, then watch BFS and DFS solve it.
#[derive(Parser)]
#[command(name = "mazeflow", version, about)]
struct Cli {
    /// Grid width, odd and at least 5
    #[arg(short = 'W', long, default_value_t = 21)]
    width: u16,

    /// Grid height, odd and at least 5
    #[arg(short = 'H', long, default_value_t = 21)]
    height: u16,

    /// Animation frame rate
    #[arg(short, long, default_value_t = DEFAULT_TARGET_FPS)]
    fps: u32,

    /// Chance of opening a wall inside one region, creating loops
    #[arg(short, long, default_value_t = DEFAULT_MERGE_CHANCE)]
    chance: f64,

    /// Random seed for reproducible mazes
    #[arg(short, long)]
    seed: Option<u64>,

    /// Solvers to run, in order, against the same maze [default: bfs]
    #[arg(long, value_enum, value_delimiter = ',')]
    solver: Vec<Solver>,

    /// Run without drawing to the terminal
    #[arg(long)]
    headless: bool,

    /// Directory for the log file
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,
}

fn print_report(report: &SessionReport) {
    println!(
        "Maze: {} merges, {} loops. Start {:?}, goal {:?}.",
        report.generation.merges, report.generation.loops, report.endpoints.0, report.endpoints.1
    );
    for (solver, solution) in &report.solutions {
        println!(
            "{}: {} steps, path length {}{}",
            solver,
            solution.steps,
            solution.path.len(),
            if solution.complete { "" } else { " (partial)" }
        );
    }
    println!(
        "Frames: {} staged, {} sampled out, {} rendered, queue high-water mark {}",
        report.pipeline.staged,
        report.pipeline.sampled_out,
        report.pipeline.rendered,
        report.pipeline.high_water_mark
    );
}

fn main() -> mazeflow::Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the renderer, so logs go to a file
    let file_appender = tracing_appender::rolling::never(&cli.log_dir, "mazeflow.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = MazeConfig {
        width: cli.width,
        height: cli.height,
        target_fps: cli.fps,
        merge_chance: cli.chance,
        seed: cli.seed,
        ..Default::default()
    };

    if cli.headless {
        let counter = CountingRenderer::new();
        let report = {
            let mut session = Session::new(config, counter.clone())?;
            session.run(&cli.solver)?
        };
        print_report(&report);
        println!("{} frames drawn", counter.count());
        return Ok(());
    }

    let mut stdout = std::io::stdout();
    app::setup_terminal(&mut stdout)?;
    let result = Session::new(config, TerminalRenderer::new()).and_then(|mut session| {
        let report = session.run(&cli.solver);
        // Dropping the session drains the remaining frames
        drop(session);
        report
    });
    let waited = match &result {
        Ok(_) => app::wait_for_exit_key(),
        Err(_) => Ok(()),
    };
    app::restore_terminal(&mut stdout)?;
    waited?;

    match result {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Session failed: {}", e);
            eprintln!("{}", e);
            Err(e)
        }
    }
}
