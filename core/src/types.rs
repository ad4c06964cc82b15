use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Boards are stored row-major, so `(x, y)` maps to the nd index `[y, x]`.
pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.1.into(), self.0.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let (rows, cols) = self.dim();
        // dimensions always originate from a `Coord2`, so they fit
        let size = (cols as Coord, rows as Coord);
        NeighborIter::new(index, size)
    }
}

/// Neighbor offsets in reading order: the row above, then the sides, then
/// the row below.
const DISPLACEMENTS: [(i16, i16); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Moves `(x, y)` by `(dx, dy)`, or `None` when that leaves a board of `size`.
fn offset((x, y): Coord2, (dx, dy): (i16, i16), (width, height): Coord2) -> Option<Coord2> {
    let x = x.checked_add_signed(dx).filter(|&x| x < width)?;
    let y = y.checked_add_signed(dy).filter(|&y| y < height)?;
    Some((x, y))
}

/// Iterates the up-to-8 in-bounds neighbors of a cell. Positions outside the
/// board are skipped, never reported.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    size: Coord2,
    next: usize,
}

impl NeighborIter {
    /// Neighbors of `center` on a `(width, height)` board. Needs no grid, so
    /// callers holding only a board size can walk neighborhoods too.
    pub fn new(center: Coord2, size: Coord2) -> Self {
        Self {
            center,
            size,
            next: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = DISPLACEMENTS.get(self.next) {
            self.next += 1;
            if let Some(pos) = offset(self.center, delta, self.size) {
                return Some(pos);
            }
        }
        None
    }
}
