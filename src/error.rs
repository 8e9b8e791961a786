use thiserror::Error;

use crate::types::{CellCount, CellIndex};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("too many mines: {mines} requested but only {cells} cells with one kept safe")]
    TooManyMines { mines: CellCount, cells: CellCount },
    #[error("cell index {index} out of bounds for a board of {cells} cells")]
    InvalidIndex { index: CellIndex, cells: CellCount },
}

pub type Result<T> = core::result::Result<T, GameError>;
