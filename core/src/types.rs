use serde::{Deserialize, Serialize};

/// Row-major position of a cell inside a grid.
pub type CellIndex = usize;

/// Two-dimensional coordinates `(x, y)`, `x` being the column.
pub type Coord2 = (usize, usize);

/// Dimensions of a rectangular grid, used for every index/coordinate conversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub columns: usize,
    pub rows: usize,
}

impl Shape {
    pub const fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    pub const fn len(&self) -> usize {
        self.columns.saturating_mul(self.rows)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn contains(&self, (x, y): Coord2) -> bool {
        x < self.columns && y < self.rows
    }

    pub fn index_of(&self, coords: Coord2) -> Option<CellIndex> {
        self.contains(coords).then(|| coords.1 * self.columns + coords.0)
    }

    pub fn coords_of(&self, index: CellIndex) -> Option<Coord2> {
        (index < self.len()).then(|| (index % self.columns, index / self.columns))
    }

    pub fn iter_neighbors(&self, index: CellIndex) -> NeighborIter {
        NeighborIter::new(self.coords_of(index), *self)
    }
}

/// Clockwise, starting at the upper-left neighbor.
const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Shape) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;

    let next_x = x.checked_add_signed(dx)?;
    let next_y = y.checked_add_signed(dy)?;

    bounds.contains((next_x, next_y)).then_some((next_x, next_y))
}

/// Indices of the in-bounds neighbors of one cell, never wrapping around edges.
#[derive(Debug)]
pub struct NeighborIter {
    center: Option<Coord2>,
    bounds: Shape,
    index: u8,
}

impl NeighborIter {
    fn new(center: Option<Coord2>, bounds: Shape) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = CellIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let center = self.center?;
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item = apply_delta(center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if let Some(coords) = next_item {
                return self.bounds.index_of(coords);
            }
        }
    }
}
