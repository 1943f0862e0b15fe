use rand::Rng;

use crate::*;

pub trait MineGenerator {
    /// Row-major cells for a board of `config` dimensions.
    fn generate(self, config: GameConfig) -> Vec<Cell>;
}

/// Seeds the first cells with mines, then shuffles them so placement does not depend on
/// insertion order.
#[derive(Debug)]
pub struct ShuffleGenerator<R> {
    rng: R,
}

impl<R: Rng> ShuffleGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> MineGenerator for ShuffleGenerator<R> {
    fn generate(mut self, config: GameConfig) -> Vec<Cell> {
        let total_cells = config.total_cells();

        let mines = if config.mines > total_cells {
            log::warn!(
                "Grid already full, generated anyway, requested {} mines but only fits {}",
                config.mines,
                total_cells
            );
            total_cells
        } else {
            config.mines
        };

        let mut cells: Vec<_> = (0..total_cells)
            .map(|i| {
                if i < mines {
                    Cell::with_mine()
                } else {
                    Cell::without_mine()
                }
            })
            .collect();

        // forward Fisher-Yates, swap with a position in [i, len)
        for i in 0..cells.len() {
            let j = self.rng.random_range(i..cells.len());
            cells.swap(i, j);
        }

        cells
    }
}
