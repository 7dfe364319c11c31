use itertools::Itertools as _;

use super::{Board, Cell, Direction, Tile};

/// Two equal tiles combined during a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    /// Where the absorbed tile started the move.
    pub from: Cell,
    /// Where the merged tile ended the move.
    pub into: Cell,
    /// Value of the merged tile.
    pub value: u64,
}

/// Outcome of sliding every tile of a board in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swipe {
    pub board: Board,
    pub merges: Vec<Merge>,
    pub score_delta: u64,
    /// Whether any tile moved or merged.
    pub changed: bool,
    /// Most resolution passes any single line needed, never more than the board size.
    pub passes: usize,
}

/// A tile in flight during a move.
#[derive(Debug, Clone, Copy)]
struct Slot {
    tile: Tile,
    origin: Cell,
    /// Start cell of the tile this one absorbed. A slot that absorbed a tile
    /// is blocked from merging again until the move ends.
    absorbed: Option<Cell>,
}

impl Slot {
    fn blocked(&self) -> bool {
        self.absorbed.is_some()
    }
}

impl Board {
    /// Slides every tile as far as it goes toward `direction`, merging equal
    /// neighbours. Leaves `self` untouched.
    pub fn swipe(&self, direction: Direction) -> Swipe {
        let mut slots = self
            .cells
            .iter()
            .enumerate()
            .map(|(idx, tile)| {
                tile.map(|tile| Slot {
                    tile,
                    origin: self.cell_at(idx),
                    absorbed: None,
                })
            })
            .collect_vec();

        let mut changed = false;
        let mut passes = 0;

        for line in direction.lines(self.size) {
            let line = line.map(|cell| self.index(cell)).collect_vec();
            let (moved, line_passes) = resolve_line(&mut slots, &line);

            changed |= moved;
            passes = passes.max(line_passes);
        }

        // Every merged tile has settled by now, so its cell is final.
        let merges = direction
            .lines(self.size)
            .flatten()
            .filter_map(|cell| {
                let slot = slots[self.index(cell)]?;
                slot.absorbed.map(|from| Merge {
                    from,
                    into: cell,
                    value: slot.tile.value(),
                })
            })
            .collect_vec();

        let score_delta = merges.iter().map(|merge| merge.value).sum();

        let board = Board {
            size: self.size,
            cells: slots.into_iter().map(|slot| slot.map(|s| s.tile)).collect(),
        };

        log::trace!(
            "Swiped {direction} in {passes} passes, {} merges:\n{board:?}",
            merges.len()
        );

        Swipe {
            board,
            merges,
            score_delta,
            changed,
            passes,
        }
    }

    /// Whether a move in `direction` would move or merge any tile.
    pub fn can_swipe(&self, direction: Direction) -> bool {
        self.swipe(direction).changed
    }
}

/// Resolves one line, given as slot indices ordered destination first.
///
/// Each pass walks the line front to back and advances every tile by one
/// cell, or merges it into an equal, unblocked tile directly ahead. A tile
/// at position `k` settles within `k` progressing passes, so a line of
/// length N settles within N passes counting the final quiet one.
///
/// Returns whether anything moved and how many passes ran.
fn resolve_line(slots: &mut [Option<Slot>], line: &[usize]) -> (bool, usize) {
    let mut moved = false;

    for pass in 1..=line.len() {
        let mut progressed = false;

        for (&ahead, &here) in line.iter().tuple_windows() {
            let Some(slot) = slots[here] else {
                continue;
            };

            match slots[ahead] {
                None => {
                    slots[ahead] = slots[here].take();
                    progressed = true;
                }
                Some(target)
                    if target.tile == slot.tile && !target.blocked() && !slot.blocked() =>
                {
                    slots[ahead] = Some(Slot {
                        tile: target.tile.doubled(),
                        origin: target.origin,
                        absorbed: Some(slot.origin),
                    });
                    slots[here] = None;
                    progressed = true;
                }
                Some(_) => {}
            }
        }

        if !progressed {
            return (moved, pass);
        }

        moved = true;
    }

    (moved, line.len())
}
