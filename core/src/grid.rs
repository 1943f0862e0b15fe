use ndarray::Array2;
use rand::Rng;
use smallvec::SmallVec;
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use crate::*;

/// Immutable board snapshot.
///
/// Every action produces a new snapshot linked to the one it was applied to, the chain of
/// `previous` snapshots is the undo history. All snapshots of a chain share one [`Score`].
pub struct Grid {
    cells: Array2<Cell>,
    previous: Option<Arc<Grid>>,
    score: Score,
}

impl Grid {
    /// Builds a root snapshot out of row-major `cells` and computes every neighbor count.
    pub fn new(columns: usize, cells: Vec<Cell>, score: Score) -> Result<Self> {
        let shape = Self::check_shape(columns, cells.len())?;
        let invalid_shape = GameError::InvalidShape {
            cells: cells.len(),
            columns,
        };
        let cells = Array2::from_shape_vec((shape.rows, shape.columns), cells)
            .map_err(|_| invalid_shape)?;

        let mut grid = Self {
            cells,
            previous: None,
            score,
        };
        grid.count_mines_around();
        Ok(grid)
    }

    /// Random board of `rows * columns` cells with a fresh score worth one point per cell.
    pub fn generate<R: Rng + ?Sized>(
        rows: usize,
        columns: usize,
        mines: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let config = GameConfig::new(rows, columns, mines);
        Self::check_shape(columns, config.total_cells())?;

        let score = Score::new(config.total_cells() as f64);
        Self::generate_with(config, ShuffleGenerator::new(rng), score)
    }

    pub fn generate_with<G: MineGenerator>(
        config: GameConfig,
        generator: G,
        score: Score,
    ) -> Result<Self> {
        Self::check_shape(config.columns, config.total_cells())?;
        let grid = Self::new(config.columns, generator.generate(config), score)?;
        log::debug!(
            "generated {}x{} grid with {} mines",
            config.columns,
            config.rows,
            grid.mine_count()
        );
        Ok(grid)
    }

    fn check_shape(columns: usize, cell_count: usize) -> Result<Shape> {
        if columns == 0 || cell_count == 0 || cell_count % columns != 0 {
            return Err(GameError::InvalidShape {
                cells: cell_count,
                columns,
            });
        }
        Ok(Shape::new(columns, cell_count / columns))
    }

    pub fn shape(&self) -> Shape {
        let (rows, columns) = self.cells.dim();
        Shape::new(columns, rows)
    }

    pub fn column_count(&self) -> usize {
        self.cells.ncols()
    }

    pub fn row_count(&self) -> usize {
        self.cells.nrows()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`, an empty grid cannot be built.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    pub fn index_of(&self, coords: Coord2) -> Option<CellIndex> {
        self.shape().index_of(coords)
    }

    pub fn coords_of(&self, index: CellIndex) -> Option<Coord2> {
        self.shape().coords_of(index)
    }

    pub fn cell_at(&self, index: CellIndex) -> Option<Cell> {
        self.coords_of(index).and_then(|coords| self.cell_at_coords(coords))
    }

    pub fn cell_at_coords(&self, (x, y): Coord2) -> Option<Cell> {
        self.cells.get([y, x]).copied()
    }

    /// Up to 8 adjacent cells, clockwise from the upper-left one.
    pub fn neighbors(&self, index: CellIndex) -> SmallVec<[(CellIndex, Cell); 8]> {
        self.shape()
            .iter_neighbors(index)
            .filter_map(|neighbor| Some((neighbor, self.cell_at(neighbor)?)))
            .collect()
    }

    pub fn mine_count(&self) -> usize {
        self.iter().filter(|cell| cell.has_mine()).count()
    }

    pub fn flag_count(&self) -> usize {
        self.iter().filter(|cell| cell.is_flagged()).count()
    }

    pub fn score(&self) -> f64 {
        self.score.value()
    }

    pub fn score_handle(&self) -> &Score {
        &self.score
    }

    pub fn previous(&self) -> Option<&Arc<Grid>> {
        self.previous.as_ref()
    }

    /// Number of snapshots reachable through `previous`.
    pub fn history_len(&self) -> usize {
        std::iter::successors(self.previous(), |grid| grid.previous()).count()
    }

    /// Applies `action` to one cell and returns the resulting snapshot.
    ///
    /// Digging an empty cell also digs the region revealed by [`Grid::flood_fill`]. A rejected
    /// action leaves both this snapshot and the score untouched.
    pub fn apply_action(
        self: &Arc<Self>,
        index: CellIndex,
        action: CellAction,
    ) -> Result<Arc<Self>> {
        let cell = self.cell_at(index).ok_or(GameError::InvalidIndex(index))?;
        let shape = self.shape();
        let mut cells = self.cells.clone();

        match action {
            CellAction::Dig if cell.is_empty() => {
                let region = self.flood_fill(index);
                log::trace!("flood fill from {} digs {} cells", index, region.len());
                for coords in region.into_iter().filter_map(|i| shape.coords_of(i)) {
                    let cell = &mut cells[[coords.1, coords.0]];
                    *cell = cell.dig();
                }
            }
            _ => {
                let (x, y) = shape.coords_of(index).ok_or(GameError::InvalidIndex(index))?;
                cells[[y, x]] = cell.apply(action)?;
                if action == CellAction::Flag {
                    self.score.flag_used();
                }
            }
        }

        // the mine layout never changes between snapshots, counts carry over
        Ok(Arc::new(Self {
            cells,
            previous: Some(Arc::clone(self)),
            score: self.score.clone(),
        }))
    }

    /// Cancels the last action, charging the undo penalty. `None` on the root snapshot.
    pub fn undo(&self) -> Option<Arc<Self>> {
        let previous = self.previous.clone()?;
        self.score.canceled_shot();
        Some(previous)
    }

    /// Breadth-first region dug from `start`: every cell reached, expanding only through empty
    /// cells.
    pub fn flood_fill(&self, start: CellIndex) -> BTreeSet<CellIndex> {
        let shape = self.shape();
        let mut seen = BTreeSet::from([start]);
        let mut to_visit = VecDeque::from([start]);

        while let Some(index) = to_visit.pop_front() {
            if !self.cell_at(index).is_some_and(Cell::is_empty) {
                continue;
            }
            for neighbor in shape.iter_neighbors(index) {
                if seen.insert(neighbor) {
                    to_visit.push_back(neighbor);
                }
            }
        }

        seen
    }

    fn count_mines_around(&mut self) {
        let shape = self.shape();
        let counts: Vec<u8> = (0..shape.len())
            .map(|index| {
                let mines = self
                    .neighbors(index)
                    .iter()
                    .filter(|(_, cell)| cell.has_mine())
                    .count();
                // at most 8 neighbors
                mines as u8
            })
            .collect();

        for (cell, count) in self.cells.iter_mut().zip(counts) {
            *cell = cell.with_mines_around(count);
        }
    }
}

impl Drop for Grid {
    fn drop(&mut self) {
        // unlink the history one snapshot at a time instead of recursing through it
        let mut previous = self.previous.take();
        while let Some(grid) = previous {
            previous = Arc::into_inner(grid).and_then(|mut grid| grid.previous.take());
        }
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("shape", &self.shape())
            .field("cells", &self.cells)
            .field("history_len", &self.history_len())
            .field("score", &self.score)
            .finish()
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = Cell;
    type IntoIter = std::iter::Copied<ndarray::iter::Iter<'a, Cell, ndarray::Ix2>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter().copied()
    }
}
