use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must be at least 1x1")]
    EmptyBoard,
    #[error("Too many mines: requested {requested} but at most {max} fit around a safe start")]
    TooManyMines {
        requested: CellCount,
        max: CellCount,
    },
    #[error("Mine layout has {placed} mines, expected {requested}")]
    MineCountMismatch {
        requested: CellCount,
        placed: CellCount,
    },
    #[error("Mine layout puts a mine next to the first revealed cell")]
    MineInSafeZone,
}

pub type Result<T> = core::result::Result<T, GameError>;
