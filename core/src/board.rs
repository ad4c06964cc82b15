use alloc::collections::VecDeque;
use core::ops::{Index, IndexMut};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed-size grid of cells, stored row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
}

impl Board {
    /// Unmined, unrevealed, unflagged board of the given `(width, height)`.
    pub fn new((width, height): Coord2) -> Self {
        Self {
            cells: Array2::default((usize::from(height), usize::from(width))),
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut board = Self::new(size);
        board.place_mines(mine_coords)?;
        Ok(board)
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (cols as Coord, rows as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        let (width, height) = self.size();
        mult(width, height)
    }

    pub fn contains(&self, (x, y): Coord2) -> bool {
        let (width, height) = self.size();
        x < width && y < height
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<&Cell> {
        self.contains(coords).then(|| &self[coords])
    }

    /// Rows from top to bottom, each indexed by `x`.
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, Cell>> {
        self.cells.rows().into_iter()
    }

    /// All cells flattened row by row.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// All coordinates in the same order as [`Board::cells`].
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (width, height) = self.size();
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub fn count_neighbors(&self, coords: Coord2, pred: impl Fn(&Cell) -> bool) -> u8 {
        // at most 8 neighbors
        self.iter_neighbors(coords)
            .filter(|&pos| pred(&self[pos]))
            .count() as u8
    }

    pub fn mine_count(&self) -> CellCount {
        self.cells().filter(|cell| cell.is_mine).count() as CellCount
    }

    pub fn revealed_count(&self) -> CellCount {
        self.cells().filter(|cell| cell.is_revealed).count() as CellCount
    }

    /// Marks every listed cell as a mine and refreshes the adjacency counts.
    ///
    /// Nothing is changed if any coordinate is out of bounds. Duplicates are
    /// placed once. Returns the number of mines now on the board.
    pub fn place_mines(&mut self, mine_coords: &[Coord2]) -> Result<CellCount> {
        for &coords in mine_coords {
            self.validate_coords(coords)?;
        }

        for &coords in mine_coords {
            self[coords].is_mine = true;
        }
        self.recompute_adjacency();

        Ok(self.mine_count())
    }

    /// Recomputes every cell's `adjacent_mine_count` from the mine layout.
    ///
    /// Counts are rebuilt from scratch, so calling this again on an unchanged
    /// layout yields the same board.
    pub fn recompute_adjacency(&mut self) {
        for coords in self.iter_coords() {
            let count = if self[coords].is_mine {
                0
            } else {
                self.count_neighbors(coords, |cell| cell.is_mine)
            };
            self[coords].adjacent_mine_count = count;
        }
    }

    /// Breadth-first reveal of the zero region around `start`.
    ///
    /// Numbered cells on the border are revealed but do not spread further,
    /// flagged cells are never revealed and block the fill. Does nothing unless
    /// `start` is a safe cell with no adjacent mines. Returns how many cells
    /// were newly revealed.
    pub fn expand_zero(&mut self, start: Coord2) -> CellCount {
        let origin = self[start];
        if origin.is_mine || origin.adjacent_mine_count != 0 {
            return 0;
        }

        let mut revealed = 0;
        let mut to_visit = VecDeque::from([start]);
        log::trace!("Starting flood-fill from {:?}", start);

        while let Some(visit_coords) = to_visit.pop_front() {
            for pos in self.iter_neighbors(visit_coords) {
                let cell = &mut self[pos];
                if cell.is_revealed || cell.is_flagged {
                    continue;
                }

                cell.is_revealed = true;
                revealed += 1;
                log::trace!(
                    "Flood revealed cell at {:?}, mine count: {}",
                    pos,
                    cell.adjacent_mine_count
                );

                // a zero cell never borders a mine, so `pos` is safe here
                if cell.adjacent_mine_count == 0 {
                    to_visit.push_back(pos);
                }
            }
        }

        revealed
    }

    /// Whether every non-mine cell has been revealed.
    pub fn all_safe_revealed(&self) -> bool {
        self.cells().all(|cell| cell.is_mine || cell.is_revealed)
    }

    /// Reveals every mine, keeping flags as they are. Returns how many mines
    /// were newly revealed.
    pub fn reveal_all_mines(&mut self) -> CellCount {
        let mut revealed = 0;
        for cell in self.cells.iter_mut() {
            if cell.is_mine && !cell.is_revealed {
                cell.is_revealed = true;
                revealed += 1;
            }
        }
        revealed
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
