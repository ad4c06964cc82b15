use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

pub trait MineGenerator {
    /// Picks `mines` distinct positions on a board of `size`, none of them
    /// inside the safe zone around `start`.
    fn generate(&mut self, size: Coord2, mines: CellCount, start: Coord2) -> Result<Vec<Coord2>>;
}

/// The first revealed cell and its neighbors, clipped to the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SafeZone {
    min: Coord2,
    max: Coord2,
}

impl SafeZone {
    pub fn around((x, y): Coord2, (width, height): Coord2) -> Self {
        Self {
            min: (x.saturating_sub(1), y.saturating_sub(1)),
            max: (
                x.saturating_add(1).min(width.saturating_sub(1)),
                y.saturating_add(1).min(height.saturating_sub(1)),
            ),
        }
    }

    pub fn contains(&self, (x, y): Coord2) -> bool {
        (self.min.0..=self.max.0).contains(&x) && (self.min.1..=self.max.1).contains(&y)
    }
}
