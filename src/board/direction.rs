use std::fmt;

use super::Cell;

/// The edge tiles slide toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// The index that varies as a tile travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Tiles travel within their row (Left/Right).
    Row,
    /// Tiles travel within their column (Up/Down).
    Column,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub const fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Row,
            Direction::Up | Direction::Down => Axis::Column,
        }
    }

    /// Step taken along the axis by a sliding tile: `-1` toward index 0.
    pub const fn sign(self) -> isize {
        match self {
            Direction::Left | Direction::Up => -1,
            Direction::Right | Direction::Down => 1,
        }
    }

    /// Cells of row/column `index`, ordered from the destination edge back.
    ///
    /// Position `k` in this order is always directly ahead of position `k + 1`.
    pub fn line(self, size: usize, index: usize) -> impl Iterator<Item = Cell> {
        let axis = self.axis();
        let toward_start = self.sign() < 0;

        (0..size).map(move |k| {
            let along = if toward_start { k } else { size - 1 - k };
            match axis {
                Axis::Row => Cell::new(index, along),
                Axis::Column => Cell::new(along, index),
            }
        })
    }

    /// Every line the move resolves independently, each as in [`Direction::line`].
    pub fn lines(self, size: usize) -> impl Iterator<Item = impl Iterator<Item = Cell>> {
        (0..size).map(move |index| self.line(size, index))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        };

        f.write_str(name)
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn test_line_order() {
        let cells = |direction: Direction, index| direction.line(3, index).collect_vec();

        assert_eq!(cells(Direction::Left, 1), vec![
            Cell::new(1, 0),
            Cell::new(1, 1),
            Cell::new(1, 2)
        ]);
        assert_eq!(cells(Direction::Right, 0), vec![
            Cell::new(0, 2),
            Cell::new(0, 1),
            Cell::new(0, 0)
        ]);
        assert_eq!(cells(Direction::Up, 2), vec![
            Cell::new(0, 2),
            Cell::new(1, 2),
            Cell::new(2, 2)
        ]);
        assert_eq!(cells(Direction::Down, 0), vec![
            Cell::new(2, 0),
            Cell::new(1, 0),
            Cell::new(0, 0)
        ]);
    }

    #[test]
    fn test_lines_cover_board_once() {
        for direction in Direction::ALL {
            let cells = direction.lines(4).flatten().sorted().collect_vec();
            let expected = (0..4)
                .cartesian_product(0..4)
                .map(|(row, col)| Cell::new(row, col))
                .collect_vec();

            assert_eq!(cells, expected, "{direction}");
        }
    }
}
