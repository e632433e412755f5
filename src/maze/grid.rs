use super::{Direction, Position, cell::Cell};

/// A rectangular lattice of cells addressed by `(x, y)`.
///
/// Every mutation bumps `version`, so frames cloned from the grid can be
/// ordered and compared cheaply by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    data: Box<[Cell]>,
    width: u16,
    height: u16,
    version: u64,
}

impl Grid {
    pub fn new(width: u16, height: u16, cell: Cell) -> Self {
        let data = vec![cell; width as usize * height as usize].into_boxed_slice();
        Grid {
            data,
            width,
            height,
            version: 0,
        }
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn area(&self) -> usize {
        self.data.len()
    }

    fn ravel_index(&self, x: u16, y: u16) -> usize {
        // Overflow-safe since width and height are u16 (assuming usize is at least 32 bits)
        y as usize * self.width as usize + x as usize
    }

    pub fn in_bounds(&self, (x, y): Position) -> bool {
        x < self.width && y < self.height
    }

    /// Returns the cell at `pos`.
    ///
    /// # Panics
    /// If `pos` is out of bounds.
    pub fn at(&self, pos: Position) -> Cell {
        self[pos]
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.in_bounds(pos)
            .then(|| self.data[self.ravel_index(pos.0, pos.1)])
    }

    /// Overwrites the cell at `pos`.
    ///
    /// # Panics
    /// If `pos` is out of bounds.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        assert!(
            self.in_bounds(pos),
            "position {:?} is outside the {}x{} grid",
            pos,
            self.width,
            self.height
        );
        let idx = self.ravel_index(pos.0, pos.1);
        if self.data[idx] != cell {
            self.data[idx] = cell;
            self.version += 1;
        }
    }

    /// In-bounds positions `distance` steps away from `pos`, in N, E, S, W order.
    pub fn neighbors_at(
        &self,
        pos: Position,
        distance: u16,
    ) -> impl Iterator<Item = Position> + use<> {
        let (width, height) = (self.width, self.height);
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| dir.step(pos, distance))
            .filter(move |&(x, y)| x < width && y < height)
    }

    /// The up to four adjacent in-bounds positions, in N, E, S, W order.
    pub fn neighbors4(&self, pos: Position) -> impl Iterator<Item = Position> + use<> {
        self.neighbors_at(pos, 1)
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.data
    }

    /// Rewrites every cell matching `predicate` to `cell`.
    pub fn replace_where(&mut self, predicate: impl Fn(Cell) -> bool, cell: Cell) {
        let mut changed = false;
        self.data.iter_mut().filter(|c| predicate(**c)).for_each(|c| {
            if *c != cell {
                *c = cell;
                changed = true;
            }
        });
        if changed {
            self.version += 1;
        }
    }

    /// Position of the first cell equal to `cell`, scanning row-major.
    pub fn find(&self, cell: Cell) -> Option<Position> {
        self.positions().find(|&pos| self[pos] == cell)
    }
}

impl std::ops::Index<Position> for Grid {
    type Output = Cell;

    fn index(&self, index: Position) -> &Self::Output {
        assert!(
            self.in_bounds(index),
            "position {:?} is outside the {}x{} grid",
            index,
            self.width,
            self.height
        );
        &self.data[self.ravel_index(index.0, index.1)]
    }
}
