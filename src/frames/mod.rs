//! Frame staging and the background render pipeline.
//!
//! Algorithms mutate a live [`Grid`] and hand snapshots to a [`FrameSink`].
//! The [`FramePipeline`] sink samples those snapshots, buffers them in a
//! bounded [`FrameQueue`] and drains them to a [`Renderer`] at a fixed frame
//! rate on a worker thread.

mod budget;
mod pipeline;
mod queue;

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

pub use budget::{FrameBudget, Phase};
pub use pipeline::{FramePipeline, PipelineConfig, PipelineStats};
pub use queue::FrameQueue;

use crate::{
    error::Result,
    maze::{Grid, Position},
};

/// Hints passed alongside a grid snapshot to drive its styling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderHints {
    /// Colour each region label distinctly.
    pub random_color: bool,
    /// Shade labels by discovery order.
    pub search_in_progress: bool,
    pub highlighted_path: Vec<Position>,
}

impl RenderHints {
    pub fn regions() -> Self {
        RenderHints {
            random_color: true,
            ..Default::default()
        }
    }

    pub fn search() -> Self {
        RenderHints {
            search_in_progress: true,
            ..Default::default()
        }
    }

    pub fn path(highlighted_path: Vec<Position>) -> Self {
        RenderHints {
            highlighted_path,
            ..Default::default()
        }
    }
}

/// An immutable snapshot of the grid at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub grid: Grid,
    pub hints: RenderHints,
}

impl Frame {
    pub fn new(grid: &Grid, hints: &RenderHints) -> Self {
        Frame {
            grid: grid.clone(),
            hints: hints.clone(),
        }
    }
}

/// Receives snapshots from the generator and the solvers.
pub trait FrameSink {
    /// Offers a frame after an algorithm step. Implementations may sample it out.
    fn stage_frame(&mut self, grid: &Grid, hints: &RenderHints) -> Result<()>;

    /// Offers the closing frame of a run, which must not be sampled out.
    fn stage_last_frame(&mut self, grid: &Grid, hints: &RenderHints) -> Result<()> {
        self.stage_frame(grid, hints)
    }

    /// Called when an algorithm phase starts on a grid of the given size.
    fn begin_phase(&mut self, _phase: Phase, _width: u16, _height: u16) {}

    /// Blocks until every staged frame has been displayed.
    fn flush_frames(&mut self) -> Result<()> {
        Ok(())
    }
}

/// In-memory sink that keeps every staged frame.
pub type FrameLog = Vec<Frame>;

impl FrameSink for FrameLog {
    fn stage_frame(&mut self, grid: &Grid, hints: &RenderHints) -> Result<()> {
        self.push(Frame::new(grid, hints));
        Ok(())
    }
}

/// Display surface driven by the pipeline's worker.
pub trait Renderer: Send {
    fn render(&mut self, frame: &Frame) -> std::io::Result<()>;
}

/// Renderer that records every frame it is asked to draw.
///
/// Clones share the same recording, so a handle can be kept after the
/// renderer itself moves into a pipeline.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    frames: Arc<Mutex<Vec<Frame>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &Frame) -> std::io::Result<()> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(frame.clone());
        Ok(())
    }
}

/// Renderer that only counts frames, for headless runs.
#[derive(Debug, Clone, Default)]
pub struct CountingRenderer {
    count: Arc<AtomicU64>,
}

impl CountingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Renderer for CountingRenderer {
    fn render(&mut self, _frame: &Frame) -> std::io::Result<()> {
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Cell;

    #[test]
    fn test_vec_sink_keeps_every_frame() {
        let mut grid = Grid::new(5, 5, Cell::Empty);
        let mut frames = FrameLog::new();
        frames.stage_frame(&grid, &RenderHints::regions()).unwrap();
        grid.set((1, 1), Cell::Wall);
        frames
            .stage_last_frame(&grid, &RenderHints::path(vec![(0, 0)]))
            .unwrap();
        frames.flush_frames().unwrap();

        assert_eq!(frames.len(), 2);
        assert!(frames[0].hints.random_color);
        assert_eq!(frames[0].grid.at((1, 1)), Cell::Empty);
        assert_eq!(frames[1].grid.at((1, 1)), Cell::Wall);
        assert_eq!(frames[1].hints.highlighted_path, vec![(0, 0)]);
    }

    #[test]
    fn test_renderer_clones_share_state() {
        let recorder = RecordingRenderer::new();
        let counter = CountingRenderer::new();
        let frame = Frame::new(&Grid::new(5, 5, Cell::Wall), &RenderHints::search());

        let (mut r, mut c) = (recorder.clone(), counter.clone());
        r.render(&frame).unwrap();
        c.render(&frame).unwrap();
        c.render(&frame).unwrap();

        assert_eq!(recorder.frames(), vec![frame]);
        assert_eq!(counter.count(), 2);
    }
}
