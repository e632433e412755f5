use rand::{SeedableRng, rngs::StdRng};

mod region_merge;

pub use region_merge::{GenerationStats, is_single_region, region_merge};

use crate::{
    config::DEFAULT_MERGE_CHANCE,
    error::Result,
    frames::{FrameSink, Phase},
    maze::Grid,
};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Chance of opening a wall between two cells already in the same region,
    /// which introduces loops. Zero yields a perfect maze.
    pub merge_chance: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            merge_chance: DEFAULT_MERGE_CHANCE,
        }
    }
}

/// Carves a fresh maze into `grid`, replacing whatever it held.
pub fn generate_maze<S: FrameSink>(
    grid: &mut Grid,
    config: &GeneratorConfig,
    rng: &mut StdRng,
    sink: &mut S,
) -> Result<GenerationStats> {
    sink.begin_phase(Phase::Generation, grid.width(), grid.height());
    let stats = region_merge(grid, config.merge_chance, rng, sink)?;
    sink.flush_frames()?;
    tracing::info!(
        "Generated {}x{} maze: {} merges, {} loops",
        grid.width(),
        grid.height(),
        stats.merges,
        stats.loops
    );
    Ok(stats)
}
