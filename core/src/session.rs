use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use crate::*;

/// Outcome of dispatching one player input to a session.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DispatchOutcome {
    /// The input was rejected or had nothing to undo, the held snapshot is unchanged.
    NoChange,
    Changed(GameOutcome),
}

impl DispatchOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed(_) => true,
        }
    }
}

/// Holds the current snapshot of one game and swaps it on every player input.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    grid: Arc<Grid>,
    outcome: GameOutcome,
}

impl GameSession {
    pub fn new<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Result<Self> {
        let grid = Grid::generate(config.rows, config.columns, config.mines, rng)?;
        log::info!(
            "new {}x{} game with {} mines",
            config.columns,
            config.rows,
            grid.mine_count()
        );
        Ok(Self::from_grid(grid))
    }

    /// Reproducible session, the same seed always lays out the same mines.
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self> {
        Self::new(config, &mut SmallRng::seed_from_u64(seed))
    }

    pub fn from_grid(grid: Grid) -> Self {
        let config = GameConfig::new(grid.row_count(), grid.column_count(), grid.mine_count());
        let outcome = rules::outcome(&grid);
        Self {
            config,
            grid: Arc::new(grid),
            outcome,
        }
    }

    /// Throws the current game away and starts a fresh one.
    pub fn restart<R: Rng + ?Sized>(&mut self, config: GameConfig, rng: &mut R) -> Result<()> {
        *self = Self::new(config, rng)?;
        Ok(())
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn score(&self) -> f64 {
        self.grid.score()
    }

    pub fn apply(&mut self, index: CellIndex, action: CellAction) -> DispatchOutcome {
        match self.grid.apply_action(index, action) {
            Ok(grid) => {
                log::debug!("{:?} cell {}", action, index);
                self.replace(grid)
            }
            Err(err) => {
                log::debug!("{:?} cell {} rejected: {}", action, index, err);
                DispatchOutcome::NoChange
            }
        }
    }

    pub fn apply_at(&mut self, coords: Coord2, action: CellAction) -> DispatchOutcome {
        match self.grid.index_of(coords) {
            Some(index) => self.apply(index, action),
            None => {
                log::debug!("{:?} at {:?} is outside the grid", action, coords);
                DispatchOutcome::NoChange
            }
        }
    }

    pub fn dig(&mut self, coords: Coord2) -> DispatchOutcome {
        self.apply_at(coords, CellAction::Dig)
    }

    pub fn flag(&mut self, coords: Coord2) -> DispatchOutcome {
        self.apply_at(coords, CellAction::Flag)
    }

    /// Goes back one snapshot, does nothing on the first one.
    pub fn undo(&mut self) -> DispatchOutcome {
        match self.grid.undo() {
            Some(grid) => {
                log::debug!("undo, score now {}", grid.score());
                self.replace(grid)
            }
            None => DispatchOutcome::NoChange,
        }
    }

    fn replace(&mut self, grid: Arc<Grid>) -> DispatchOutcome {
        let outcome = rules::outcome(&grid);
        if outcome != self.outcome && outcome.is_finished() {
            log::info!("game over: {:?}, score {}", outcome, grid.score());
        }
        self.grid = grid;
        self.outcome = outcome;
        DispatchOutcome::Changed(outcome)
    }
}
