pub mod cell;
pub mod grid;

use rand::Rng;

pub use cell::Cell;
pub use grid::Grid;

use crate::error::{MazeError, Result};

/// Grid coordinate `(x, y)`.
pub type Position = (u16, u16);

/// Cardinal directions, in the fixed scan order used by every algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Moves `distance` cells from `pos`, or `None` on underflow/overflow.
    /// Upper bounds are left to the caller.
    pub fn step(self, (x, y): Position, distance: u16) -> Option<Position> {
        match self {
            Direction::North => y.checked_sub(distance).map(|y| (x, y)),
            Direction::East => x.checked_add(distance).map(|x| (x, y)),
            Direction::South => y.checked_add(distance).map(|y| (x, y)),
            Direction::West => x.checked_sub(distance).map(|x| (x, y)),
        }
    }
}

/// The cell strictly between two positions two steps apart on one axis.
pub fn midpoint(a: Position, b: Position) -> Position {
    (a.0.min(b.0) + a.0.abs_diff(b.0) / 2, a.1.min(b.1) + a.1.abs_diff(b.1) / 2)
}

/// Whether two positions share an edge.
pub fn is_adjacent(a: Position, b: Position) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}

/// Resets the grid for a fresh solve.
///
/// Every passable cell becomes `Empty`. Start and goal markers survive unless
/// `full` is set.
pub fn clear_grid(grid: &mut Grid, full: bool) {
    grid.replace_where(
        |cell| match cell {
            Cell::Wall => false,
            Cell::Start | Cell::Goal => full,
            _ => true,
        },
        Cell::Empty,
    );
}

/// Places start and goal on two distinct random passable cells, clearing any
/// previous markers first. Returns `(start, goal)`.
pub fn place_random_endpoints<R: Rng>(grid: &mut Grid, rng: &mut R) -> Result<(Position, Position)> {
    let open = grid
        .positions()
        .filter(|&pos| !grid[pos].is_wall())
        .collect::<Vec<_>>();
    if open.len() < 2 {
        return Err(MazeError::NoSolution);
    }

    let start = open[rng.random_range(0..open.len())];
    let mut goal = open[rng.random_range(0..open.len())];
    // Resample on collision
    while goal == start {
        goal = open[rng.random_range(0..open.len())];
    }

    place_endpoints(grid, start, goal)?;
    Ok((start, goal))
}

/// Places start and goal at the given positions, clearing any previous markers.
pub fn place_endpoints(grid: &mut Grid, start: Position, goal: Position) -> Result<()> {
    for pos in [start, goal] {
        match grid.get(pos) {
            None => return Err(MazeError::OutOfBounds { x: pos.0, y: pos.1 }),
            Some(Cell::Wall) => return Err(MazeError::NoSolution),
            Some(_) => {}
        }
    }
    if start == goal {
        return Err(MazeError::NoSolution);
    }

    grid.replace_where(|cell| matches!(cell, Cell::Start | Cell::Goal), Cell::Empty);
    grid.set(start, Cell::Start);
    grid.set(goal, Cell::Goal);
    tracing::debug!("Placed start at {:?} and goal at {:?}", start, goal);
    Ok(())
}
