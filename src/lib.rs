pub mod board;
pub mod game;
pub mod simulate;
pub mod tui;

pub use board::{Board, Cell, Direction, Merge, PlacedTile, Swipe, Tile};
pub use game::{GameConfig, GameError, GameState, MoveResult, Spawn, Status};

/// Compacts a line of tile ranks toward index 0 in a single scan, merging
/// each equal pair at most once. `0` marks an empty cell.
///
/// Returns the score gained, i.e. the sum of the merged tile values.
pub fn compact_line(cells: &mut [u8]) -> u64 {
    // Find first non empty cell
    let Some(current) = cells.iter().position(|&c| c != 0) else {
        return 0;
    };

    let mut score = 0;
    let mut last = 0; // Write ptr
    cells.swap(last, current);

    for current in current + 1..cells.len() {
        if cells[current] == 0 {
            continue;
        } else if cells[current] == cells[last] {
            cells[last] += 1;
            cells[current] = 0;
            score += 1u64 << cells[last];
            last += 1;
        } else {
            (cells[last] != 0).then(|| last += 1);
            cells.swap(last, current);
        }
    }

    score
}

#[cfg(test)]
mod test {
    use super::compact_line;

    #[test]
    fn test_compact_line() {
        let cases: [([u8; 4], [u8; 4], u64); 6] = [
            ([1, 1, 0, 0], [2, 0, 0, 0], 4),
            ([1, 1, 1, 1], [2, 2, 0, 0], 8),
            ([1, 0, 0, 1], [2, 0, 0, 0], 4),
            ([0, 1, 2, 2], [1, 3, 0, 0], 8),
            ([1, 1, 2, 0], [2, 2, 0, 0], 4),
            ([1, 2, 3, 4], [1, 2, 3, 4], 0),
        ];

        for (mut line, expected, score) in cases {
            assert_eq!(compact_line(&mut line), score);
            assert_eq!(line, expected);
        }
    }

    #[test]
    fn test_compact_empty_line() {
        let mut line = [0u8; 5];
        assert_eq!(compact_line(&mut line), 0);
        assert_eq!(line, [0; 5]);
    }
}
