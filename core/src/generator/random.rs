use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::index;

use super::*;

/// Uniform placement that keeps the safe zone of the first click clear of mines.
#[derive(Clone, Debug)]
pub struct RandomMineGenerator {
    rng: SmallRng,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: SmallRng) -> Self {
        Self { rng }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&mut self, size: Coord2, mines: CellCount, start: Coord2) -> Result<Vec<Coord2>> {
        let (width, height) = size;
        let safe_zone = SafeZone::around(start, size);

        let eligible: Vec<Coord2> = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .filter(|&coords| !safe_zone.contains(coords))
            .collect();

        if mines as usize > eligible.len() {
            log::warn!(
                "Cannot place {} mines, only {} cells outside the safe zone",
                mines,
                eligible.len()
            );
            return Err(GameError::TooManyMines {
                requested: mines,
                max: eligible.len() as CellCount,
            });
        }

        // sampling without replacement keeps every subset equally likely
        let picked = index::sample(&mut self.rng, eligible.len(), mines as usize);
        Ok(picked.into_iter().map(|i| eligible[i]).collect())
    }
}
