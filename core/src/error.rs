use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell count {cells} does not fill a grid of {columns} columns")]
    InvalidShape { cells: usize, columns: usize },
    #[error("Cell at index {0} is outside the grid")]
    InvalidIndex(usize),
    #[error("This cell has already been dug")]
    AlreadyDug,
}

pub type Result<T> = core::result::Result<T, GameError>;
