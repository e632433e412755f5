use super::check_bounds;
use crate::{
    error::Result,
    frames::{FrameSink, RenderHints},
    maze::{Cell, Grid, Position},
};

/// Result of walking a breadth-first labelling back from the goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracedPath {
    /// Walk order: the goal first, the start last when `complete`.
    pub positions: Vec<Position>,
    pub complete: bool,
}

/// Walks from `goal` to the start over the smallest neighbouring label.
///
/// Ties go to the first neighbour in N, E, S, W order. Labelled cells left
/// behind are marked [`Cell::Visited`], and a frame highlighting the path so
/// far is staged after each move. If a position has neither the start nor a
/// labelled neighbour the walk stops and the partial path is returned.
pub fn reconstruct_path<S: FrameSink>(
    grid: &mut Grid,
    goal: Position,
    sink: &mut S,
) -> Result<TracedPath> {
    check_bounds(grid, goal)?;

    let mut positions = vec![goal];
    let mut current = goal;

    loop {
        let start = grid.neighbors4(current).find(|&n| grid[n] == Cell::Start);
        if let Some(start) = start {
            leave(grid, current);
            positions.push(start);
            sink.stage_last_frame(grid, &RenderHints::path(positions.clone()))?;
            return Ok(TracedPath {
                positions,
                complete: true,
            });
        }

        let lowest = grid
            .neighbors4(current)
            .filter_map(|n| grid[n].label().map(|label| (label, n)))
            .reduce(|best, candidate| if candidate.0 < best.0 { candidate } else { best });

        let Some((_, next)) = lowest else {
            tracing::warn!(
                "Path reconstruction stuck at {:?} after {} cells",
                current,
                positions.len()
            );
            leave(grid, current);
            sink.stage_last_frame(grid, &RenderHints::path(positions.clone()))?;
            return Ok(TracedPath {
                positions,
                complete: false,
            });
        };

        leave(grid, current);
        positions.push(next);
        current = next;
        sink.stage_frame(grid, &RenderHints::path(positions.clone()))?;
    }
}

/// Marks a labelled cell as part of the traced path. Endpoints keep their markers.
fn leave(grid: &mut Grid, pos: Position) {
    if grid[pos].label().is_some() {
        grid.set(pos, Cell::Visited);
    }
}
