use std::{
    fmt::{self, Write},
    num::NonZeroU8,
};

use thiserror::Error;

mod direction;
mod swipe;

pub use direction::{Axis, Direction};
pub use swipe::{Merge, Swipe};

/// Smallest board that still has room for the two starting tiles.
pub const MIN_SIZE: usize = 2;

/// Largest board whose highest reachable tile (`2^(size^2 + 1)`) fits a `u64`.
pub const MAX_SIZE: usize = 7;

/// Highest rank a board accepts from outside, the top tile of a `MAX_SIZE`
/// game. Merging two such tiles, or summing a full board of them, still fits
/// a `u64`.
pub const MAX_RANK: u8 = (MAX_SIZE * MAX_SIZE + 1) as u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A tile, stored as the base-2 logarithm of its value.
///
/// The rank is never zero, so every tile is a power of two no smaller than 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile(NonZeroU8);

impl Tile {
    pub const TWO: Self = Tile(NonZeroU8::MIN);
    pub const FOUR: Self = Tile(NonZeroU8::MIN.saturating_add(1));

    /// Returns `None` for rank 0 (empty) or anything above `MAX_RANK`.
    pub fn from_rank(rank: u8) -> Option<Self> {
        NonZeroU8::new(rank).filter(|r| r.get() <= MAX_RANK).map(Tile)
    }

    /// Returns `None` unless `value` is a power of two in `2..=2^MAX_RANK`.
    pub fn from_value(value: u64) -> Option<Self> {
        if value.is_power_of_two() {
            Self::from_rank(value.trailing_zeros() as u8)
        } else {
            None
        }
    }

    pub fn rank(self) -> u8 {
        self.0.get()
    }

    pub fn value(self) -> u64 {
        1 << self.rank()
    }

    pub(crate) fn doubled(self) -> Self {
        Tile(self.0.saturating_add(1))
    }
}

/// Read-only view of an occupied cell, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedTile {
    pub row: usize,
    pub col: usize,
    pub value: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board size {0} is outside the supported range {MIN_SIZE}..={MAX_SIZE}")]
    InvalidSize(usize),
    #[error("row {row} has {found} cells but the board is {expected} wide")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{value} at {cell} is neither empty (0) nor a power of two in 2..=2^{MAX_RANK}")]
    InvalidValue { cell: Cell, value: u64 },
    #[error("cell {0} is outside the board")]
    OutOfBounds(Cell),
    #[error("cell {0} is already occupied")]
    Occupied(Cell),
}

/// An N×N grid, stored row-major. The grid is the only record of where a
/// tile is, so a tile can never disagree with its own position.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Tile>>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Errors
    /// Returns `BoardError::InvalidSize` unless `MIN_SIZE <= size <= MAX_SIZE`.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(BoardError::InvalidSize(size));
        }

        Ok(Self {
            size,
            cells: vec![None; size * size],
        })
    }

    /// Builds a board from rows of tile values, `0` meaning empty.
    pub fn from_values<R: AsRef<[u64]>>(rows: &[R]) -> Result<Self, BoardError> {
        let mut board = Self::new(rows.len())?;

        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != board.size {
                return Err(BoardError::NotSquare {
                    row,
                    expected: board.size,
                    found: values.len(),
                });
            }

            for (col, &value) in values.iter().enumerate() {
                if value == 0 {
                    continue;
                }

                let cell = Cell::new(row, col);
                let tile = Tile::from_value(value).ok_or(BoardError::InvalidValue { cell, value })?;
                board.place(cell, tile)?;
            }
        }

        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    /// Returns the tile at `cell`, or `None` if the cell is empty or off the board.
    pub fn get(&self, cell: Cell) -> Option<Tile> {
        if self.contains(cell) {
            self.cells[self.index(cell)]
        } else {
            None
        }
    }

    /// Puts `tile` into an empty cell.
    pub fn place(&mut self, cell: Cell, tile: Tile) -> Result<(), BoardError> {
        if !self.contains(cell) {
            return Err(BoardError::OutOfBounds(cell));
        }

        let idx = self.index(cell);
        match self.cells[idx] {
            Some(_) => Err(BoardError::Occupied(cell)),
            None => {
                self.cells[idx] = Some(tile);
                Ok(())
            }
        }
    }

    /// Occupied cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = PlacedTile> + '_ {
        self.cells.iter().enumerate().filter_map(|(idx, tile)| {
            let Cell { row, col } = self.cell_at(idx);
            tile.map(|tile| PlacedTile {
                row,
                col,
                value: tile.value(),
            })
        })
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.is_none())
            .map(|(idx, _)| self.cell_at(idx))
    }

    pub fn num_empty(&self) -> usize {
        self.cells.iter().filter(|tile| tile.is_none()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().flatten().map(|tile| tile.value()).sum()
    }

    pub fn max_tile(&self) -> Option<Tile> {
        self.cells.iter().flatten().copied().max()
    }

    /// Tile values row by row, `0` for empty cells.
    pub fn to_values(&self) -> Vec<Vec<u64>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|tile| tile.map_or(0, Tile::value)).collect())
            .collect()
    }

    pub(crate) fn index(&self, cell: Cell) -> usize {
        debug_assert!(self.contains(cell), "{cell} is outside the board");
        cell.row * self.size + cell.col
    }

    pub(crate) fn cell_at(&self, idx: usize) -> Cell {
        Cell::new(idx / self.size, idx % self.size)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = |tile: &Option<Tile>| tile.map_or(0, Tile::rank);
        let mut rows = self.cells.chunks(self.size);

        if let Some(row) = rows.next() {
            row.iter().try_for_each(|c| write!(f, "{:2x}", rank(c)))?
        }

        for row in rows {
            f.write_char('\n')?;
            row.iter().try_for_each(|c| write!(f, "{:2x}", rank(c)))?
        }

        Ok(())
    }
}

pub mod test_utils {
    use itertools::Itertools as _;
    use rand::{
        Rng,
        seq::{IndexedRandom as _, SliceRandom as _},
    };

    use std::num::NonZeroU8;

    use super::{Board, Direction, Tile};

    /// Generates a board with `filled` distinct ranks plus `duplicates`
    /// extra copies of ranks already on the board, scattered at random.
    pub fn generate_random_board(
        size: usize,
        filled: u8,
        duplicates: u8,
        rng: &mut impl Rng,
    ) -> Board {
        let mut ranks = Vec::with_capacity(size * size);
        ranks.extend(1..filled + 1);

        // Add duplicates
        if !ranks.is_empty() {
            let duplicates = (0..duplicates)
                .filter_map(|_| ranks.choose(rng).copied())
                .collect_vec();

            ranks.extend(duplicates);
        }

        ranks.resize(size * size, 0);
        ranks.shuffle(rng);

        Board {
            size,
            cells: ranks.into_iter().map(Tile::from_rank).collect(),
        }
    }

    /// Resolves a move with the single-scan `compact_line`, one line at a time.
    pub fn baseline_swipe(board: &Board, direction: Direction) -> (Board, u64) {
        let mut result = board.clone();
        let mut score = 0;

        for line in direction.lines(board.size) {
            let line = line.map(|cell| board.index(cell)).collect_vec();
            let mut ranks = line
                .iter()
                .map(|&idx| board.cells[idx].map_or(0, Tile::rank))
                .collect_vec();

            score += crate::compact_line(&mut ranks);

            for (&idx, rank) in line.iter().zip(ranks) {
                result.cells[idx] = NonZeroU8::new(rank).map(Tile);
            }
        }

        (result, score)
    }
}
