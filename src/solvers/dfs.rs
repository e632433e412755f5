use super::{Solution, check_endpoints};
use crate::{
    error::{MazeError, Result},
    frames::{FrameSink, RenderHints},
    maze::{Cell, Grid, Position},
};

/// Depth-first search with an explicit stack, probing N, E, S, W in order.
///
/// Cells pushed onto the stack are labelled with the step counter; dead ends
/// are marked [`Cell::BadWay`] as they are popped. On success the surviving
/// trail is marked [`Cell::Visited`] and returned as the path.
pub fn solve_dfs<S: FrameSink>(
    grid: &mut Grid,
    start: Position,
    goal: Position,
    sink: &mut S,
) -> Result<Solution> {
    check_endpoints(grid, start, goal)?;

    let hints = RenderHints::search();
    let mut stack = vec![start];
    let mut step: u32 = 1;

    while let Some(&top) = stack.last() {
        let next = grid.neighbors4(top).find(|&n| grid[n].is_open());
        match next {
            Some(next) if grid[next] == Cell::Goal => {
                stack.push(next);
                for &pos in &stack {
                    if grid[pos].label().is_some() {
                        grid.set(pos, Cell::Visited);
                    }
                }
                sink.stage_last_frame(grid, &RenderHints::path(stack.clone()))?;
                tracing::debug!("[dfs] goal {:?} reached after {} steps", next, step);
                return Ok(Solution {
                    path: stack,
                    steps: step as usize,
                    complete: true,
                });
            }
            Some(next) => {
                stack.push(next);
                grid.set(next, Cell::Label(step));
                sink.stage_frame(grid, &hints)?;
                step += 1;
            }
            None => {
                // Dead end: backtrack
                if grid[top] != Cell::Start {
                    grid.set(top, Cell::BadWay);
                }
                stack.pop();
                sink.stage_frame(grid, &hints)?;
                step += 1;
            }
        }
    }

    tracing::info!("[dfs] backtracked to the start after {} steps", step);
    Err(MazeError::NoSolution)
}
