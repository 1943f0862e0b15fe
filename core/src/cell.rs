use serde::{Deserialize, Serialize};

use crate::*;

/// What a player can do to a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellAction {
    Dig,
    Flag,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStatus {
    Untouched,
    Flagged,
    Dug,
    Detonated,
}

impl CellStatus {
    /// Whether the cell still hides its content from the player.
    pub const fn is_covered(self) -> bool {
        matches!(self, Self::Untouched | Self::Flagged)
    }
}

/// Player-visible projection of a cell, the neighbor count is only exposed once dug.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Untouched,
    Flagged,
    Dug(u8),
    Detonated,
}

/// One grid position. Every action yields a new value, a cell is never changed in place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    has_mine: bool,
    flagged: bool,
    dug: bool,
    mines_around: u8,
}

impl Cell {
    const fn new(has_mine: bool) -> Self {
        Self {
            has_mine,
            flagged: false,
            dug: false,
            mines_around: 0,
        }
    }

    pub const fn with_mine() -> Self {
        Self::new(true)
    }

    pub const fn without_mine() -> Self {
        Self::new(false)
    }

    /// Toggles the flag, digging is terminal so a dug cell rejects it.
    pub fn flag(self) -> Result<Self> {
        if self.dug {
            return Err(GameError::AlreadyDug);
        }
        Ok(Self {
            flagged: !self.flagged,
            ..self
        })
    }

    pub const fn dig(self) -> Self {
        Self {
            flagged: false,
            dug: true,
            ..self
        }
    }

    pub(crate) fn apply(self, action: CellAction) -> Result<Self> {
        match action {
            CellAction::Dig => Ok(self.dig()),
            CellAction::Flag => self.flag(),
        }
    }

    pub const fn with_mines_around(self, mines_around: u8) -> Self {
        Self {
            mines_around,
            ..self
        }
    }

    pub const fn has_mine(self) -> bool {
        self.has_mine
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    pub const fn is_dug(self) -> bool {
        self.dug
    }

    pub const fn is_detonated(self) -> bool {
        self.has_mine && self.dug
    }

    pub const fn mines_around(self) -> u8 {
        self.mines_around
    }

    /// Cells that start a flood fill when dug: covered, safe and with no mine around.
    pub const fn is_empty(self) -> bool {
        !self.dug && !self.has_mine && self.mines_around == 0
    }

    pub const fn status(self) -> CellStatus {
        if self.is_detonated() {
            CellStatus::Detonated
        } else if self.dug {
            CellStatus::Dug
        } else if self.flagged {
            CellStatus::Flagged
        } else {
            CellStatus::Untouched
        }
    }

    pub const fn view(self) -> CellView {
        match self.status() {
            CellStatus::Untouched => CellView::Untouched,
            CellStatus::Flagged => CellView::Flagged,
            CellStatus::Dug => CellView::Dug(self.mines_around),
            CellStatus::Detonated => CellView::Detonated,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::without_mine()
    }
}
