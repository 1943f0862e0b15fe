use serde::{Deserialize, Serialize};

use crate::*;

/// Game-over classification of one snapshot.
///
/// Valid transitions:
/// - InProgress -> Defeat
/// - InProgress -> Victory
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    InProgress,
    Defeat,
    Victory,
}

impl GameOutcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Defeat | Self::Victory)
    }
}

impl Default for GameOutcome {
    fn default() -> Self {
        Self::InProgress
    }
}

/// A game is lost as soon as any mine has been dug.
pub fn is_defeated(grid: &Grid) -> bool {
    grid.iter().any(Cell::is_detonated)
}

/// A game is won once every safe cell is dug, flags on the remaining mines are not required.
pub fn is_victorious(grid: &Grid) -> bool {
    if is_defeated(grid) {
        return false;
    }
    let covered = grid.iter().filter(|cell| cell.status().is_covered()).count();
    covered == grid.mine_count()
}

pub fn outcome(grid: &Grid) -> GameOutcome {
    if is_defeated(grid) {
        GameOutcome::Defeat
    } else if is_victorious(grid) {
        GameOutcome::Victory
    } else {
        GameOutcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;

    fn grid(columns: usize, cells: Vec<Cell>) -> Arc<Grid> {
        let initial = cells.len() as f64;
        let score = Score::with_trigger(initial, ScoreConfig::default(), ManualTrigger::new());
        Arc::new(Grid::new(columns, cells, score).unwrap())
    }

    #[test]
    fn new_game_is_neither_lost_nor_won() {
        let grid = grid(2, vec![Cell::with_mine(), Cell::without_mine()]);

        assert!(!is_defeated(&grid));
        assert!(!is_victorious(&grid));
        assert_eq!(outcome(&grid), GameOutcome::InProgress);
    }

    #[test]
    fn digging_a_mine_loses() {
        let grid = grid(2, vec![Cell::with_mine(), Cell::without_mine()]);
        let dug = grid.apply_action(0, CellAction::Dig).unwrap();

        assert!(is_defeated(&dug));
        assert!(!is_victorious(&dug));
        assert_eq!(outcome(&dug), GameOutcome::Defeat);
    }

    #[test]
    fn digging_every_safe_cell_wins() {
        let grid = grid(2, vec![Cell::with_mine(), Cell::without_mine()]);
        let dug = grid.apply_action(1, CellAction::Dig).unwrap();

        assert!(!is_defeated(&dug));
        assert!(is_victorious(&dug));
        assert_eq!(outcome(&dug), GameOutcome::Victory);
        assert!(outcome(&dug).is_finished());
    }

    #[test]
    fn win_does_not_depend_on_flags() {
        let grid = grid(
            3,
            vec![Cell::with_mine(), Cell::without_mine(), Cell::without_mine()],
        );

        let first = grid.apply_action(1, CellAction::Dig).unwrap();
        let flagged = first.apply_action(0, CellAction::Flag).unwrap();
        assert!(!is_victorious(&flagged));

        let last = flagged.apply_action(2, CellAction::Dig).unwrap();
        assert!(!is_defeated(&last));
        assert!(is_victorious(&last));
    }

    #[test]
    fn flagging_safe_cell_is_not_a_win() {
        let grid = grid(2, vec![Cell::with_mine(), Cell::without_mine()]);
        let flagged = grid.apply_action(1, CellAction::Flag).unwrap();

        assert!(!is_victorious(&flagged));
    }

    #[test]
    fn defeat_and_victory_exclude_each_other() {
        let mut rng = SmallRng::seed_from_u64(3);
        for seed in 0..10 {
            let mut grid = Arc::new(Grid::generate(4, 4, 3, &mut rng).unwrap());
            let mut moves = SmallRng::seed_from_u64(seed);
            for _ in 0..16 {
                assert!(!(is_defeated(&grid) && is_victorious(&grid)));
                let index = moves.random_range(0..grid.len());
                grid = grid.apply_action(index, CellAction::Dig).unwrap();
            }
            assert!(!(is_defeated(&grid) && is_victorious(&grid)));
        }
    }

    #[test]
    fn mine_free_board_is_won_once_dug() {
        let grid = grid(1, vec![Cell::without_mine()]);

        assert!(!is_victorious(&grid));
        let dug = grid.apply_action(0, CellAction::Dig).unwrap();
        assert!(is_victorious(&dug));
    }
}
