use super::*;

/// Replays a known layout, e.g. a recorded game or a test scenario.
///
/// The layout is handed over as given. The engine rejects it on the first
/// reveal if the mine count is off or a mine sits in the safe zone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedMineGenerator {
    mines: Vec<Coord2>,
}

impl FixedMineGenerator {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }
}

impl MineGenerator for FixedMineGenerator {
    fn generate(&mut self, size: Coord2, _mines: CellCount, _start: Coord2) -> Result<Vec<Coord2>> {
        let (width, height) = size;
        if self.mines.iter().any(|&(x, y)| x >= width || y >= height) {
            return Err(GameError::InvalidCoords);
        }
        Ok(self.mines.clone())
    }
}
