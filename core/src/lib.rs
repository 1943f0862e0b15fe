use serde::{Deserialize, Serialize};

pub use cell::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use rules::{GameOutcome, is_defeated, is_victorious};
pub use score::*;
pub use session::*;
pub use types::*;

mod cell;
mod error;
mod generator;
mod grid;
pub mod rules;
mod score;
mod session;
mod types;

/// Board dimensions and mine count requested by the player.
///
/// Values are stored as given: zero-sized boards are rejected when the grid is built, extra
/// mines are clamped by the generator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: usize,
    pub columns: usize,
    pub mines: usize,
}

impl GameConfig {
    pub const fn new(rows: usize, columns: usize, mines: usize) -> Self {
        Self {
            rows,
            columns,
            mines,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub const fn total_cells(&self) -> usize {
        self.rows.saturating_mul(self.columns)
    }

    pub const fn shape(&self) -> Shape {
        Shape::new(self.columns, self.rows)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(10, 10, 10)
    }
}
