use std::{
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    thread::JoinHandle,
    time::Duration,
};

use super::{Frame, FrameBudget, FrameQueue, FrameSink, Phase, RenderHints, Renderer};
use crate::{
    config::DEFAULT_TARGET_FPS,
    error::{MazeError, Result},
    maze::Grid,
};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub target_fps: u32,
    /// Scales the queue capacity above the bare size/frame-rate ratio.
    pub overload_factor: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            overload_factor: 1.1,
        }
    }
}

/// Counters describing what the pipeline did with staged frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Frames offered by the algorithms.
    pub staged: u64,
    /// Frames skipped by the save interval.
    pub sampled_out: u64,
    /// Frames drawn by the renderer, including end-of-drain redraws.
    pub rendered: u64,
    /// Synchronous flushes forced by a full queue.
    pub backpressure_flushes: u64,
    /// Largest queue length observed.
    pub high_water_mark: usize,
}

struct State {
    queue: FrameQueue,
    /// Set while a worker thread is draining the queue.
    worker_active: bool,
    /// Most recently rendered frame, redrawn when a drain completes.
    last_frame: Option<Frame>,
    rendered: u64,
    /// Set once the renderer has panicked. The pipeline refuses frames after that.
    failed: bool,
}

struct Shared {
    state: Mutex<State>,
    /// Signalled whenever the queue shrinks or the worker stops.
    changed: Condvar,
    renderer: Mutex<Box<dyn Renderer>>,
    frame_interval: Duration,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Draws one frame. Returns `false` if the renderer panicked.
    fn render(&self, frame: &Frame) -> bool {
        let mut renderer = self.renderer.lock().unwrap_or_else(PoisonError::into_inner);
        match panic::catch_unwind(AssertUnwindSafe(|| renderer.render(frame))) {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::warn!("[render] failed to draw frame: {}", e);
                true
            }
            Err(_) => false,
        }
    }

    /// Stops the worker for good after a renderer panic and wakes any waiting producer.
    fn abandon(&self) {
        let mut state = self.lock_state();
        let dropped = state.queue.clear();
        state.failed = true;
        state.worker_active = false;
        state.last_frame = None;
        self.changed.notify_all();
        tracing::error!("[render] renderer panicked, {} queued frames discarded", dropped);
    }

    /// Worker body: renders queued frames in FIFO order, one per frame
    /// interval, then redraws the last frame once and exits.
    fn drain(&self) {
        tracing::debug!("[render] worker started");
        loop {
            let next = {
                let mut state = self.lock_state();
                let next = state.queue.pop();
                if next.is_some() {
                    self.changed.notify_all();
                }
                next
            };

            match next {
                Some(frame) => {
                    if !self.render(&frame) {
                        self.abandon();
                        return;
                    }
                    let mut state = self.lock_state();
                    state.rendered += 1;
                    state.last_frame = Some(frame);
                    drop(state);
                    std::thread::sleep(self.frame_interval);
                }
                None => {
                    // Make sure the final state stays on screen
                    let last = self.lock_state().last_frame.clone();
                    if let Some(last) = last {
                        if !self.render(&last) {
                            self.abandon();
                            return;
                        }
                    }

                    let mut state = self.lock_state();
                    if last_frame_rendered(&mut state) {
                        state.worker_active = false;
                        self.changed.notify_all();
                        tracing::debug!("[render] queue drained, worker exiting");
                        return;
                    }
                }
            }
        }
    }
}

/// Accounts for the end-of-drain redraw. Returns whether the worker may stop,
/// which is the case unless the producer slipped a frame in meanwhile.
fn last_frame_rendered(state: &mut State) -> bool {
    if state.last_frame.is_some() {
        state.rendered += 1;
    }
    state.queue.is_empty()
}

/// Bounded frame buffer drained to a [`Renderer`] by a worker thread.
///
/// The algorithm side stages frames through [`FrameSink`]; only every
/// `save_interval`-th step is snapshotted. When the queue is full the worker
/// is started and the producer blocks until it has emptied the queue, so at
/// most one capacity's worth of frames is ever held in memory.
pub struct FramePipeline {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
    config: PipelineConfig,
    budget: FrameBudget,
    /// Steps offered since the current phase began.
    steps: u64,
    staged: u64,
    sampled_out: u64,
    backpressure_flushes: u64,
}

impl FramePipeline {
    pub fn new<R: Renderer + 'static>(renderer: R, config: PipelineConfig) -> Self {
        let fps = config.target_fps.max(1);
        let budget = FrameBudget {
            capacity: 1,
            save_interval: 1,
        };
        let shared = Shared {
            state: Mutex::new(State {
                queue: FrameQueue::new(budget.capacity),
                worker_active: false,
                last_frame: None,
                rendered: 0,
                failed: false,
            }),
            changed: Condvar::new(),
            renderer: Mutex::new(Box::new(renderer) as Box<dyn Renderer>),
            frame_interval: Duration::from_secs_f64(1.0 / fps as f64),
        };
        FramePipeline {
            shared: Arc::new(shared),
            worker: None,
            config,
            budget,
            steps: 0,
            staged: 0,
            sampled_out: 0,
            backpressure_flushes: 0,
        }
    }

    pub fn budget(&self) -> FrameBudget {
        self.budget
    }

    pub fn queue_len(&self) -> usize {
        self.shared.lock_state().queue.len()
    }

    pub fn is_draining(&self) -> bool {
        self.shared.lock_state().worker_active
    }

    pub fn stats(&self) -> PipelineStats {
        let state = self.shared.lock_state();
        PipelineStats {
            staged: self.staged,
            sampled_out: self.sampled_out,
            rendered: state.rendered,
            backpressure_flushes: self.backpressure_flushes,
            high_water_mark: state.queue.high_water_mark(),
        }
    }

    /// Starts the render worker unless one is already draining.
    ///
    /// Returns whether a new worker was spawned. Fails with `RendererFailed`
    /// once the renderer has panicked.
    pub fn start(&mut self) -> Result<bool> {
        {
            let mut state = self.shared.lock_state();
            if state.failed {
                return Err(MazeError::RendererFailed);
            }
            if state.worker_active {
                return Ok(false);
            }
            state.worker_active = true;
        }

        // The previous worker has cleared its flag and is about to return
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                tracing::warn!("[render] previous worker panicked");
            }
        }

        let shared = Arc::clone(&self.shared);
        let spawned = std::thread::Builder::new()
            .name("frame-renderer".into())
            .spawn(move || shared.drain());
        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(true)
            }
            Err(e) => {
                self.shared.lock_state().worker_active = false;
                Err(MazeError::Io(e))
            }
        }
    }

    fn enqueue(&mut self, frame: Frame) -> Result<()> {
        let mut state = self.shared.lock_state();
        if state.failed {
            return Err(MazeError::RendererFailed);
        }
        if state.queue.is_full() {
            drop(state);
            // Backpressure: drain synchronously before the algorithm moves on
            self.backpressure_flushes += 1;
            self.start()?;
            state = self
                .shared
                .changed
                .wait_while(self.shared.lock_state(), |s| {
                    !s.queue.is_empty() && s.worker_active
                })
                .unwrap_or_else(PoisonError::into_inner);
            if state.failed {
                return Err(MazeError::RendererFailed);
            }
        }

        let (len, capacity) = (state.queue.len(), state.queue.capacity());
        state.queue.push(frame).map_err(|_| {
            tracing::error!("Frame queue overflow: {}/{} after flush", len, capacity);
            MazeError::QueueOverflowImpossible { len, capacity }
        })
    }
}

impl FrameSink for FramePipeline {
    fn stage_frame(&mut self, grid: &Grid, hints: &RenderHints) -> Result<()> {
        self.staged += 1;
        self.steps += 1;
        if self.steps % self.budget.save_interval as u64 != 0 {
            self.sampled_out += 1;
            return Ok(());
        }
        self.enqueue(Frame::new(grid, hints))
    }

    fn stage_last_frame(&mut self, grid: &Grid, hints: &RenderHints) -> Result<()> {
        self.staged += 1;
        self.steps += 1;
        self.enqueue(Frame::new(grid, hints))
    }

    /// Recomputes capacity and save interval for a new phase or grid size.
    fn begin_phase(&mut self, phase: Phase, width: u16, height: u16) {
        self.budget = FrameBudget::new(width, height, phase, &self.config);
        self.steps = 0;
        self.shared
            .lock_state()
            .queue
            .set_capacity(self.budget.capacity);
        tracing::debug!(
            "Frame budget for {:?} on {}x{}: capacity {}, save interval {}",
            phase,
            width,
            height,
            self.budget.capacity,
            self.budget.save_interval
        );
    }

    /// Renders everything queued, then blocks until the worker has finished
    /// its end-of-drain redraw.
    fn flush_frames(&mut self) -> Result<()> {
        self.start()?;
        let failed = {
            let state = self.shared.lock_state();
            let idle = self
                .shared
                .changed
                .wait_while(state, |s| s.worker_active)
                .unwrap_or_else(PoisonError::into_inner);
            idle.failed
        };
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                tracing::warn!("[render] worker panicked");
            }
        }
        if failed {
            return Err(MazeError::RendererFailed);
        }
        Ok(())
    }
}

impl Drop for FramePipeline {
    fn drop(&mut self) {
        if let Err(e) = self.flush_frames() {
            tracing::warn!("[render] failed to flush frames on shutdown: {}", e);
        }
    }
}
