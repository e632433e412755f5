use rand::rngs::StdRng;

use crate::{
    config::MazeConfig,
    error::{MazeError, Result},
    frames::{FramePipeline, PipelineConfig, PipelineStats, Renderer},
    generators::{GenerationStats, GeneratorConfig, generate_maze, get_rng},
    maze::{Cell, Grid, Position, clear_grid, place_endpoints, place_random_endpoints},
    solvers::{Solution, Solver, solve_maze},
};

/// Summary of one generate-and-solve run.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub generation: GenerationStats,
    pub endpoints: (Position, Position),
    pub solutions: Vec<(Solver, Solution)>,
    pub pipeline: PipelineStats,
}

/// Owns the live grid and the frame pipeline for a sequence of runs.
///
/// The grid is only ever mutated from the calling thread; the pipeline's
/// worker sees snapshots.
pub struct Session {
    config: MazeConfig,
    grid: Grid,
    rng: StdRng,
    pipeline: FramePipeline,
    endpoints: Option<(Position, Position)>,
}

impl Session {
    pub fn new<R: Renderer + 'static>(config: MazeConfig, renderer: R) -> Result<Self> {
        config.validate()?;
        let pipeline = FramePipeline::new(
            renderer,
            PipelineConfig {
                target_fps: config.target_fps,
                ..Default::default()
            },
        );
        Ok(Session {
            grid: Grid::new(config.width, config.height, Cell::Wall),
            rng: get_rng(config.seed),
            pipeline,
            endpoints: None,
            config,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn endpoints(&self) -> Option<(Position, Position)> {
        self.endpoints
    }

    pub fn pipeline_stats(&self) -> PipelineStats {
        self.pipeline.stats()
    }

    /// Carves a new maze and places start and goal on it.
    pub fn generate(&mut self) -> Result<GenerationStats> {
        clear_grid(&mut self.grid, true);
        self.endpoints = None;

        let generator = GeneratorConfig {
            merge_chance: self.config.merge_chance,
        };
        let stats = generate_maze(&mut self.grid, &generator, &mut self.rng, &mut self.pipeline)?;

        let endpoints = match self.config.endpoints {
            Some((start, goal)) => {
                place_endpoints(&mut self.grid, start, goal)?;
                (start, goal)
            }
            None => place_random_endpoints(&mut self.grid, &mut self.rng)?,
        };
        clear_grid(&mut self.grid, false);
        self.endpoints = Some(endpoints);
        Ok(stats)
    }

    /// Solves the current maze. Marks left by an earlier solve are cleared first.
    pub fn solve(&mut self, solver: Solver) -> Result<Solution> {
        let (start, goal) = self.endpoints.ok_or(MazeError::NoSolution)?;
        solve_maze(&mut self.grid, solver, start, goal, &mut self.pipeline)
    }

    /// Generates a maze, then runs each solver against it in turn.
    ///
    /// An empty `solvers` list runs the configured default solver.
    pub fn run(&mut self, solvers: &[Solver]) -> Result<SessionReport> {
        let default = [self.config.solver];
        let solvers = if solvers.is_empty() { &default[..] } else { solvers };

        let generation = self.generate()?;
        let endpoints = self.endpoints.ok_or(MazeError::NoSolution)?;
        let solutions = solvers
            .iter()
            .map(|&solver| self.solve(solver).map(|solution| (solver, solution)))
            .collect::<Result<Vec<_>>>()?;
        Ok(SessionReport {
            generation,
            endpoints,
            solutions,
            pipeline: self.pipeline.stats(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::RecordingRenderer;

    fn config() -> MazeConfig {
        MazeConfig {
            width: 11,
            height: 9,
            target_fps: 5_000,
            merge_chance: 0.1,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_session_rejects_even_dimensions() {
        let result = Session::new(
            MazeConfig {
                width: 10,
                ..config()
            },
            RecordingRenderer::new(),
        );
        assert!(matches!(result, Err(MazeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_generate_places_endpoints_on_cleared_maze() {
        let mut session = Session::new(config(), RecordingRenderer::new()).unwrap();
        session.generate().unwrap();
        let (start, goal) = session.endpoints().unwrap();
        let grid = session.grid();
        assert_eq!(grid[start], Cell::Start);
        assert_eq!(grid[goal], Cell::Goal);
        assert!(
            grid.cells()
                .iter()
                .all(|c| matches!(c, Cell::Wall | Cell::Empty | Cell::Start | Cell::Goal))
        );
    }

    #[test]
    fn test_solve_before_generate_fails() {
        let mut session = Session::new(config(), RecordingRenderer::new()).unwrap();
        assert!(matches!(session.solve(Solver::Bfs), Err(MazeError::NoSolution)));
    }

    #[test]
    fn test_fixed_endpoints() {
        let mut session = Session::new(
            MazeConfig {
                endpoints: Some(((0, 0), (10, 8))),
                ..config()
            },
            RecordingRenderer::new(),
        )
        .unwrap();
        let report = session.run(&[Solver::Bfs]).unwrap();
        assert_eq!(report.endpoints, ((0, 0), (10, 8)));
        let (_, solution) = &report.solutions[0];
        assert_eq!(solution.path.first(), Some(&(0, 0)));
        assert_eq!(solution.path.last(), Some(&(10, 8)));
    }

    #[test]
    fn test_empty_solver_list_runs_configured_solver() {
        let mut session = Session::new(
            MazeConfig {
                solver: Solver::Dfs,
                ..config()
            },
            RecordingRenderer::new(),
        )
        .unwrap();
        let report = session.run(&[]).unwrap();
        assert_eq!(report.solutions.len(), 1);
        assert_eq!(report.solutions[0].0, Solver::Dfs);
        assert!(report.solutions[0].1.complete);
    }
}
