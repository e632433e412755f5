use thiserror::Error;

/// Errors surfaced by the maze core and its rendering layer.
#[derive(Error, Debug)]
pub enum MazeError {
    /// Width and height must both be odd and at least 5.
    #[error("invalid maze dimensions {width}x{height}: both must be odd and at least 5")]
    InvalidDimensions { width: u16, height: u16 },
    #[error("position ({x}, {y}) is outside the grid")]
    OutOfBounds { x: u16, y: u16 },
    /// The search exhausted every reachable cell without meeting the goal.
    #[error("no path exists between start and goal")]
    NoSolution,
    /// The flush-on-full policy failed to make room in the frame queue.
    #[error("frame queue still full after flush ({len}/{capacity})")]
    QueueOverflowImpossible { len: usize, capacity: usize },
    /// The renderer panicked; frames still queued were discarded.
    #[error("renderer stopped after a panic")]
    RendererFailed,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MazeError>;
