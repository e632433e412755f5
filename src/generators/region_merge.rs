use rand::Rng;

use crate::{
    config::validate_dimensions,
    error::Result,
    frames::{FrameSink, RenderHints},
    maze::{Cell, Grid, Position, midpoint},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Walls opened between two different regions.
    pub merges: usize,
    /// Walls opened inside a single region.
    pub loops: usize,
    /// Cells drawn from the pool.
    pub picks: usize,
}

/// Whether every passable cell carries the same label.
pub fn is_single_region(grid: &Grid) -> bool {
    let mut labels = grid.cells().iter().filter(|c| !c.is_wall());
    match labels.next() {
        Some(first) => labels.all(|c| c == first),
        None => true,
    }
}

/// Randomized region merging, Kruskal's algorithm over an explicit wall lattice.
///
/// Every even/even cell starts as its own region. Repeatedly a random room is
/// drawn, a neighbouring room two steps away is chosen, the wall between them
/// is opened and the larger label is relabelled to the smaller one. Runs until
/// one region remains.
///
/// Requires odd dimensions of at least 5.
pub fn region_merge<R: Rng, S: FrameSink>(
    grid: &mut Grid,
    merge_chance: f64,
    rng: &mut R,
    sink: &mut S,
) -> Result<GenerationStats> {
    validate_dimensions(grid.width(), grid.height())?;
    let merge_chance = if merge_chance.is_finite() {
        merge_chance.clamp(0.0, 1.0)
    } else {
        0.0
    };

    // Checkerboard of rooms, labelled 0..N in row-major order
    let rooms = grid
        .positions()
        .filter(|&(x, y)| x % 2 == 0 && y % 2 == 0)
        .collect::<Vec<_>>();
    grid.replace_where(|_| true, Cell::Wall);
    for (label, &room) in rooms.iter().enumerate() {
        grid.set(room, Cell::Label(label as u32));
    }

    let hints = RenderHints::regions();
    sink.stage_frame(grid, &hints)?;

    // Rooms that may still border another region. Labels only ever merge, so a
    // room whose neighbours all share its label never becomes eligible again.
    let mut pool = rooms;
    let mut regions = pool.len();
    let mut stats = GenerationStats::default();

    while regions > 1 {
        let idx = rng.random_range(0..pool.len());
        let room = pool[idx];
        stats.picks += 1;
        let Some(label) = grid[room].label() else {
            unreachable!("room {:?} lost its label", room);
        };

        let neighbors = grid
            .neighbors_at(room, 2)
            .filter(|&pos| !grid[pos].is_wall())
            .collect::<Vec<_>>();
        let foreign = neighbors
            .iter()
            .copied()
            .filter(|&pos| grid[pos] != Cell::Label(label))
            .collect::<Vec<_>>();
        if foreign.is_empty() {
            pool.swap_remove(idx);
        }

        let candidates: &[Position] = if rng.random_bool(merge_chance) {
            &neighbors
        } else {
            &foreign
        };
        if candidates.is_empty() {
            continue;
        }

        let next = candidates[rng.random_range(0..candidates.len())];
        let Some(next_label) = grid[next].label() else {
            unreachable!("room {:?} lost its label", next);
        };
        let (low, high) = (label.min(next_label), label.max(next_label));

        if low != high {
            grid.replace_where(|c| c == Cell::Label(high), Cell::Label(low));
            regions -= 1;
            stats.merges += 1;
        } else if grid[midpoint(room, next)].is_wall() {
            stats.loops += 1;
        }
        grid.set(midpoint(room, next), Cell::Label(low));

        if regions == 1 {
            sink.stage_last_frame(grid, &hints)?;
        } else {
            sink.stage_frame(grid, &hints)?;
        }
    }

    tracing::debug!(
        "Region merge finished after {} picks, {} rooms left in pool",
        stats.picks,
        pool.len()
    );
    Ok(stats)
}
