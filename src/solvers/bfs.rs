use std::collections::{HashSet, VecDeque};

use super::check_endpoints;
use crate::{
    error::{MazeError, Result},
    frames::{FrameSink, RenderHints},
    maze::{Cell, Grid, Position},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub steps: usize,
}

/// Breadth-first search from `start` until the goal cell is dequeued.
///
/// `start` and `goal` must hold the start and goal markers, otherwise the
/// search fails with `NoSolution` before touching the grid.
///
/// Each dequeued cell is labelled with its discovery order. The start cell
/// keeps its marker and counts as order 0, so labels begin at 1. Labels are
/// non-decreasing in distance from the start, which is what
/// [`reconstruct_path`](super::reconstruct_path) relies on.
pub fn solve_bfs<S: FrameSink>(
    grid: &mut Grid,
    start: Position,
    goal: Position,
    sink: &mut S,
) -> Result<SearchStats> {
    check_endpoints(grid, start, goal)?;

    let hints = RenderHints::search();
    let mut queue = VecDeque::from([start]);
    // Cells already enqueued, so no cell enters the queue twice
    let mut enqueued = HashSet::from([start]);
    let mut step: u32 = 0;

    while let Some(current) = queue.pop_front() {
        match grid[current] {
            Cell::Goal => {
                sink.stage_last_frame(grid, &hints)?;
                tracing::debug!("[bfs] goal {:?} dequeued after {} steps", current, step);
                return Ok(SearchStats {
                    steps: step as usize,
                });
            }
            Cell::Empty | Cell::Label(_) => {
                grid.set(current, Cell::Label(step));
                sink.stage_frame(grid, &hints)?;
                step += 1;
            }
            Cell::Start => step += 1,
            Cell::Wall | Cell::Visited | Cell::BadWay => continue,
        }

        for next in grid.neighbors4(current).collect::<Vec<_>>() {
            if grid[next].is_open() && enqueued.insert(next) {
                queue.push_back(next);
            }
        }
    }

    sink.stage_last_frame(grid, &hints)?;
    tracing::info!("[bfs] exhausted {} cells without reaching the goal", step);
    Err(MazeError::NoSolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        frames::FrameLog,
        maze::clear_grid,
        solvers::tests::{distance, maze},
    };

    #[test]
    fn test_labels_follow_discovery() {
        let mut grid = maze(21, 15, 0.2, 11);
        clear_grid(&mut grid, false);
        solve_bfs(&mut grid, (0, 0), (20, 14), &mut FrameLog::new()).unwrap();

        for pos in grid.positions() {
            let Cell::Label(label) = grid[pos] else {
                continue;
            };
            assert!(label >= 1);
            // Some neighbour discovered this cell earlier
            let discovered = grid.neighbors4(pos).any(|n| match grid[n] {
                Cell::Start => true,
                Cell::Label(other) => other < label,
                _ => false,
            });
            assert!(discovered, "{:?} labelled {} has no earlier neighbour", pos, label);
        }
    }

    #[test]
    fn test_labels_never_decrease_with_distance() {
        let mut grid = maze(15, 15, 0.3, 2);
        clear_grid(&mut grid, false);
        let reference = grid.clone();
        solve_bfs(&mut grid, (0, 0), (14, 14), &mut FrameLog::new()).unwrap();

        let mut labelled = grid
            .positions()
            .filter_map(|p| grid[p].label().map(|l| (l, p)))
            .collect::<Vec<_>>();
        labelled.sort();
        let distances = labelled
            .iter()
            .map(|&(_, p)| distance(&reference, (0, 0), p).unwrap())
            .collect::<Vec<_>>();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_unreachable_goal_is_no_solution() {
        let mut grid = Grid::new(5, 5, Cell::Empty);
        (0..5).for_each(|y| grid.set((2, y), Cell::Wall));
        grid.set((0, 0), Cell::Start);
        grid.set((4, 4), Cell::Goal);

        let mut frames = FrameLog::new();
        let result = solve_bfs(&mut grid, (0, 0), (4, 4), &mut frames);
        assert!(matches!(result, Err(MazeError::NoSolution)));
        // All ten cells left of the wall minus the start got a label
        assert_eq!(grid.cells().iter().filter(|c| c.label().is_some()).count(), 9);
        assert!(!frames.is_empty());
    }

    #[test]
    fn test_each_cell_labelled_once() {
        let mut grid = Grid::new(7, 7, Cell::Empty);
        grid.set((0, 0), Cell::Start);
        grid.set((6, 6), Cell::Goal);
        let mut frames = FrameLog::new();
        let stats = solve_bfs(&mut grid, (0, 0), (6, 6), &mut frames).unwrap();

        let mut labels = grid.cells().iter().filter_map(|c| c.label()).collect::<Vec<_>>();
        labels.sort();
        let unique = labels.len();
        labels.dedup();
        assert_eq!(labels.len(), unique);
        // One frame per labelled cell plus the closing frame
        assert_eq!(frames.len(), unique + 1);
        assert_eq!(stats.steps, unique + 1);
    }

    #[test]
    fn test_goal_argument_must_hold_goal() {
        let mut grid = Grid::new(5, 5, Cell::Empty);
        grid.set((0, 0), Cell::Start);
        grid.set((4, 4), Cell::Goal);

        let mut frames = FrameLog::new();
        let result = solve_bfs(&mut grid, (0, 0), (2, 0), &mut frames);
        assert!(matches!(result, Err(MazeError::NoSolution)));
        assert!(grid.cells().iter().all(|c| c.label().is_none()));
        assert!(frames.is_empty());
    }
}
