mod bfs;
mod dfs;
mod path;

pub use bfs::{SearchStats, solve_bfs};
pub use dfs::solve_dfs;
pub use path::{TracedPath, reconstruct_path};

use crate::{
    error::{MazeError, Result},
    frames::{FrameSink, Phase},
    maze::{Cell, Grid, Position, clear_grid},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Solver {
    Bfs,
    Dfs,
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
        }
    }
}

/// Outcome of a successful solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Positions from start to goal. Partial if `complete` is false.
    pub path: Vec<Position>,
    /// Cells labelled or backtracked by the search.
    pub steps: usize,
    pub complete: bool,
}

/// Fails with `OutOfBounds` unless `pos` lies on the grid.
pub(crate) fn check_bounds(grid: &Grid, pos: Position) -> Result<()> {
    if grid.in_bounds(pos) {
        Ok(())
    } else {
        Err(MazeError::OutOfBounds { x: pos.0, y: pos.1 })
    }
}

/// Fails unless `start` and `goal` are on the grid and hold the
/// [`Cell::Start`] and [`Cell::Goal`] markers.
pub(crate) fn check_endpoints(grid: &Grid, start: Position, goal: Position) -> Result<()> {
    check_bounds(grid, start)?;
    check_bounds(grid, goal)?;
    if grid[start] != Cell::Start || grid[goal] != Cell::Goal {
        tracing::warn!(
            "Endpoints {:?} -> {:?} do not match the grid markers ({:?}, {:?})",
            start,
            goal,
            grid[start],
            grid[goal]
        );
        return Err(MazeError::NoSolution);
    }
    Ok(())
}

/// Clears previous search marks, then runs `solver` from `start` to `goal`.
///
/// Breadth-first search is followed by a path reconstruction over its labels;
/// depth-first search returns its own trail.
pub fn solve_maze<S: FrameSink>(
    grid: &mut Grid,
    solver: Solver,
    start: Position,
    goal: Position,
    sink: &mut S,
) -> Result<Solution> {
    check_endpoints(grid, start, goal)?;
    clear_grid(grid, false);

    tracing::info!("Solving with {} from {:?} to {:?}", solver, start, goal);
    sink.begin_phase(Phase::Search, grid.width(), grid.height());
    let solution = match solver {
        Solver::Bfs => {
            let searched = solve_bfs(grid, start, goal, sink);
            // Show how far the search got even when it failed
            sink.flush_frames()?;
            let stats = searched?;

            sink.begin_phase(Phase::PathTrace, grid.width(), grid.height());
            let traced = reconstruct_path(grid, goal, sink)?;
            sink.flush_frames()?;
            let mut path = traced.positions;
            path.reverse();
            Solution {
                path,
                steps: stats.steps,
                complete: traced.complete,
            }
        }
        Solver::Dfs => {
            let searched = solve_dfs(grid, start, goal, sink);
            sink.flush_frames()?;
            searched?
        }
    };
    tracing::info!(
        "{} reached the goal after {} steps, path length {}",
        solver,
        solution.steps,
        solution.path.len()
    );
    Ok(solution)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        frames::FrameLog,
        generators::{get_rng, region_merge},
        maze::{Cell, place_endpoints},
    };
    use std::collections::VecDeque;

    /// Generates a maze and pins start and goal to opposite corners.
    pub(crate) fn maze(width: u16, height: u16, chance: f64, seed: u64) -> Grid {
        let mut grid = Grid::new(width, height, Cell::Empty);
        region_merge(&mut grid, chance, &mut get_rng(Some(seed)), &mut FrameLog::new()).unwrap();
        place_endpoints(&mut grid, (0, 0), (width - 1, height - 1)).unwrap();
        grid
    }

    /// Shortest distance over passable cells, computed independently.
    pub(crate) fn distance(grid: &Grid, from: Position, to: Position) -> Option<usize> {
        let mut dist = std::collections::HashMap::from([(from, 0usize)]);
        let mut queue = VecDeque::from([from]);
        while let Some(pos) = queue.pop_front() {
            if pos == to {
                return dist.get(&pos).copied();
            }
            let d = dist[&pos];
            for next in grid.neighbors4(pos) {
                if !grid[next].is_wall() && !dist.contains_key(&next) {
                    dist.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    pub(crate) fn assert_walk(grid: &Grid, path: &[Position]) {
        for pair in path.windows(2) {
            assert!(crate::maze::is_adjacent(pair[0], pair[1]), "{:?}", pair);
        }
        assert!(path.iter().all(|&p| !grid[p].is_wall()));
    }

    #[test]
    fn test_bfs_finds_shortest_path() {
        for seed in 0..8 {
            let mut grid = maze(15, 11, 0.25, seed);
            let expected = distance(&grid, (0, 0), (14, 10)).unwrap();
            let solution =
                solve_maze(&mut grid, Solver::Bfs, (0, 0), (14, 10), &mut FrameLog::new()).unwrap();
            assert!(solution.complete);
            assert_eq!(solution.path.len(), expected + 1);
            assert_eq!(solution.path.first(), Some(&(0, 0)));
            assert_eq!(solution.path.last(), Some(&(14, 10)));
            assert_walk(&grid, &solution.path);
        }
    }

    #[test]
    fn test_dfs_and_bfs_agree_on_perfect_maze() {
        for seed in 0..8 {
            let mut grid = maze(13, 9, 0.0, seed);
            let bfs =
                solve_maze(&mut grid, Solver::Bfs, (0, 0), (12, 8), &mut FrameLog::new()).unwrap();
            let dfs =
                solve_maze(&mut grid, Solver::Dfs, (0, 0), (12, 8), &mut FrameLog::new()).unwrap();
            // A tree has exactly one simple path
            assert_eq!(bfs.path, dfs.path);
        }
    }

    #[test]
    fn test_solving_twice_resets_marks() {
        let mut grid = maze(11, 11, 0.1, 4);
        let mut frames = FrameLog::new();
        let first = solve_maze(&mut grid, Solver::Dfs, (0, 0), (10, 10), &mut frames).unwrap();
        let second = solve_maze(&mut grid, Solver::Dfs, (0, 0), (10, 10), &mut frames).unwrap();
        assert_eq!(first, second);
        assert_eq!(grid[(0, 0)], Cell::Start);
        assert_eq!(grid[(10, 10)], Cell::Goal);
    }

    #[test]
    fn test_out_of_bounds_endpoints() {
        let mut grid = maze(5, 5, 0.0, 1);
        assert!(matches!(
            solve_maze(&mut grid, Solver::Bfs, (0, 0), (5, 4), &mut FrameLog::new()),
            Err(MazeError::OutOfBounds { x: 5, y: 4 })
        ));
    }

    #[test]
    fn test_endpoints_must_match_markers() {
        let mut grid = maze(5, 5, 0.0, 1);
        let before = grid.clone();

        // (2, 0) is open but is not where the goal marker sits
        assert!(matches!(
            solve_maze(&mut grid, Solver::Bfs, (0, 0), (2, 0), &mut FrameLog::new()),
            Err(MazeError::NoSolution)
        ));
        assert!(matches!(
            solve_maze(&mut grid, Solver::Dfs, (2, 2), (4, 4), &mut FrameLog::new()),
            Err(MazeError::NoSolution)
        ));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_seeded_five_by_five_scenario() {
        // Seed 1 with no loops carves the shortest possible corner-to-corner
        // corridor: 8 moves. The goal keeps its marker instead of a label, so
        // the move count is the path length minus the start cell.
        let mut grid = maze(5, 5, 0.0, 1);
        let expected = distance(&grid, (0, 0), (4, 4)).unwrap();
        assert_eq!(expected, 8);
        let mut frames = FrameLog::new();
        let solution = solve_maze(&mut grid, Solver::Bfs, (0, 0), (4, 4), &mut frames).unwrap();
        assert!(solution.complete);
        assert_eq!(solution.path.len(), 9);
        assert_eq!(solution.path.len(), expected + 1);

        let mut again = maze(5, 5, 0.0, 1);
        let repeat = solve_maze(&mut again, Solver::Bfs, (0, 0), (4, 4), &mut FrameLog::new()).unwrap();
        assert_eq!(solution, repeat);
        assert_eq!(grid.cells(), again.cells());
    }
}
