use super::pipeline::PipelineConfig;

/// Algorithm phase currently producing frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Generation,
    Search,
    PathTrace,
}

/// Queue capacity and sampling rate derived from grid size and frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBudget {
    /// Maximum number of frames buffered before a synchronous flush.
    pub capacity: usize,
    /// Number of algorithm steps per enqueued frame. Always in `1..=capacity`.
    pub save_interval: usize,
}

impl FrameBudget {
    pub fn new(width: u16, height: u16, phase: Phase, config: &PipelineConfig) -> Self {
        let area = width as usize * height as usize;
        let fps = config.target_fps.max(1) as usize;

        // Bigger grids get a deeper buffer, higher frame rates a shallower one
        let capacity = ((area as f64).sqrt() / ((fps as f64).sqrt() + 1.0)
            * config.overload_factor)
            .floor()
            .max(1.0) as usize;

        let save_interval = match phase {
            Phase::Generation | Phase::Search => area / (fps * 2),
            // A traced path is short, every step is worth showing
            Phase::PathTrace => 1,
        };

        FrameBudget {
            capacity,
            save_interval: save_interval.clamp(1, capacity),
        }
    }
}
