use crate::{
    error::{MazeError, Result},
    maze::Position,
    solvers::Solver,
};

/// Smallest accepted width or height.
pub const MIN_DIMENSION: u16 = 5;
pub const DEFAULT_TARGET_FPS: u32 = 60;
/// Probability of knocking a wall between two cells of the same region.
pub const DEFAULT_MERGE_CHANCE: f64 = 0.1;

/// Inputs accepted by a maze session.
#[derive(Debug, Clone)]
pub struct MazeConfig {
    pub width: u16,
    pub height: u16,
    pub target_fps: u32,
    pub merge_chance: f64,
    /// Seed for reproducible runs; `None` draws from the OS.
    pub seed: Option<u64>,
    pub solver: Solver,
    /// Fixed start and goal; `None` places them at random.
    pub endpoints: Option<(Position, Position)>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 21,
            height: 21,
            target_fps: DEFAULT_TARGET_FPS,
            merge_chance: DEFAULT_MERGE_CHANCE,
            seed: None,
            solver: Solver::Bfs,
            endpoints: None,
        }
    }
}

impl MazeConfig {
    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.width, self.height)
    }
}

/// Rejects even or too-small dimensions.
pub fn validate_dimensions(width: u16, height: u16) -> Result<()> {
    let valid = |n: u16| n >= MIN_DIMENSION && n % 2 == 1;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(MazeError::InvalidDimensions { width, height })
    }
}
