//! Rule engine for single-player Minesweeper.
//!
//! [`BoardEngine`] owns the board and the game state machine
//! (ready → playing → won/lost). Mines are placed lazily on the first reveal so
//! the clicked cell and its neighbors are always safe.

extern crate alloc;

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use generator::*;
pub use timer::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod events;
mod generator;
mod timer;
mod types;

/// Size of the first-click safe zone on an unclipped board.
pub const SAFE_ZONE_CELLS: CellCount = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    /// Builds a config, rejecting boards that cannot hold `mines` outside the
    /// safe zone of the first click.
    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(width, height, mines);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::EmptyBoard);
        }

        let max = self.max_mines();
        if self.mines > max {
            return Err(GameError::TooManyMines {
                requested: self.mines,
                max,
            });
        }

        Ok(())
    }

    pub const fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    /// Largest mine count that always fits outside a full 3x3 safe zone.
    pub const fn max_mines(&self) -> CellCount {
        self.total_cells().saturating_sub(SAFE_ZONE_CELLS)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Used to merge outcomes when revealing several cells at once
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Outcome of a chord on a revealed numbered cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChordOutcome {
    NoChange,
    Revealed(RevealOutcome),
    /// Number of hidden neighbors that were flagged.
    Flagged(CellCount),
}

impl ChordOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Revealed(outcome) => outcome.has_update(),
            Self::Flagged(count) => count > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_empty_board() {
        assert_eq!(GameConfig::new(0, 5, 0), Err(GameError::EmptyBoard));
        assert_eq!(GameConfig::new(5, 0, 0), Err(GameError::EmptyBoard));
    }

    #[test]
    fn config_leaves_room_for_safe_zone() {
        assert!(GameConfig::new(9, 9, 72).is_ok());
        assert_eq!(
            GameConfig::new(9, 9, 73),
            Err(GameError::TooManyMines {
                requested: 73,
                max: 72
            })
        );
    }

    #[test]
    fn tiny_board_only_accepts_zero_mines() {
        assert_eq!(GameConfig::new(3, 3, 0).map(|c| c.max_mines()), Ok(0));
        assert!(GameConfig::new(1, 1, 0).is_ok());
        assert_eq!(
            GameConfig::new(3, 3, 1),
            Err(GameError::TooManyMines {
                requested: 1,
                max: 0
            })
        );
    }

    #[test]
    fn reveal_outcome_merge_prefers_hit_mine() {
        use RevealOutcome::*;
        assert_eq!(Revealed | HitMine, HitMine);
        assert_eq!(Won | Revealed, Won);
        assert_eq!(NoChange | Revealed, Revealed);
        assert_eq!(NoChange | NoChange, NoChange);
    }

    #[test]
    fn chord_outcome_updates() {
        assert!(!ChordOutcome::NoChange.has_update());
        assert!(!ChordOutcome::Flagged(0).has_update());
        assert!(ChordOutcome::Flagged(2).has_update());
        assert!(ChordOutcome::Revealed(RevealOutcome::HitMine).has_update());
    }
}
