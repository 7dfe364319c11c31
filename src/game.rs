use rand::{Rng, seq::IteratorRandom as _};
use thiserror::Error;

use crate::board::{Board, BoardError, Cell, Direction, Merge, PlacedTile, Swipe, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    InProgress,
    Lost,
}

#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("spawn probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
    #[error("the game is over; restart to keep playing")]
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    pub size: usize,
    /// Chance that a spawned tile is a 4 rather than a 2.
    pub four_probability: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: 4,
            four_probability: 0.5,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(GameError::InvalidProbability(self.four_probability));
        }

        Board::new(self.size)?;
        Ok(())
    }
}

/// A tile placed after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub cell: Cell,
    pub tile: Tile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub merges: Vec<Merge>,
    pub score_delta: u64,
    pub changed: bool,
    /// Always `Some` when `changed` is true.
    pub spawned: Option<Spawn>,
    pub status: Status,
}

#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    score: u64,
    status: Status,
}

impl GameState {
    /// Starts a game: an empty board with two 2-tiles on distinct random cells.
    pub fn new(config: GameConfig, rng: &mut impl Rng) -> Result<Self, GameError> {
        config.validate()?;

        let mut board = Board::new(config.size)?;
        for _ in 0..2 {
            spawn_tile(&mut board, Tile::TWO, rng);
        }

        log::debug!("New {0}x{0} game:\n{board:?}", config.size);

        Ok(Self {
            config,
            board,
            score: 0,
            status: Status::InProgress,
        })
    }

    pub fn initialize(size: usize, rng: &mut impl Rng) -> Result<Self, GameError> {
        let config = GameConfig {
            size,
            ..GameConfig::default()
        };

        Self::new(config, rng)
    }

    /// Resumes play from an arbitrary board. The status is only re-evaluated
    /// by the next changing move, so a full board starts out in progress.
    pub fn from_board(board: Board, score: u64) -> Self {
        let config = GameConfig {
            size: board.size(),
            ..GameConfig::default()
        };

        Self {
            config,
            board,
            score,
            status: Status::InProgress,
        }
    }

    /// Plays one turn: slide toward `direction`, spawn if anything changed,
    /// then check whether the grid filled up.
    ///
    /// # Errors
    /// Returns `GameError::GameOver` without touching the state once the game is lost.
    pub fn apply_move(
        &mut self,
        direction: Direction,
        rng: &mut impl Rng,
    ) -> Result<MoveResult, GameError> {
        if self.status == Status::Lost {
            return Err(GameError::GameOver);
        }

        let Swipe {
            board,
            merges,
            score_delta,
            changed,
            passes,
        } = self.board.swipe(direction);

        log::debug!(
            "Move {direction}: changed: {changed}, merges: {}, score delta: {score_delta}, passes: {passes}",
            merges.len()
        );

        let mut spawned = None;
        if changed {
            self.board = board;
            self.score = self.score.saturating_add(score_delta);

            spawned = spawn(&mut self.board, self.config.four_probability, rng);
            if let Some(Spawn { cell, tile }) = spawned {
                log::debug!("Spawned {} at {cell}", tile.value());
            }

            self.status = check_terminal(&self.board);
            if self.status == Status::Lost {
                log::info!("Game over, final score: {}", self.score);
            }
        }

        Ok(MoveResult {
            merges,
            score_delta,
            changed,
            spawned,
            status: self.status,
        })
    }

    /// Starts over with the same configuration.
    pub fn restart(&mut self, rng: &mut impl Rng) -> Result<(), GameError> {
        *self = Self::new(self.config, rng)?;
        Ok(())
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tiles(&self) -> impl Iterator<Item = PlacedTile> + '_ {
        self.board.tiles()
    }
}

/// Places a 2 or a 4 on a uniformly chosen empty cell. Returns `None` on a full board.
///
/// # Panics
/// If `four_probability` is outside `[0, 1]`; `GameConfig::validate` rules that out.
pub fn spawn(board: &mut Board, four_probability: f64, rng: &mut impl Rng) -> Option<Spawn> {
    let tile = if rng.random_bool(four_probability) {
        Tile::FOUR
    } else {
        Tile::TWO
    };

    spawn_tile(board, tile, rng)
}

fn spawn_tile(board: &mut Board, tile: Tile, rng: &mut impl Rng) -> Option<Spawn> {
    let cell = board.empty_cells().choose(rng)?;
    board.place(cell, tile).ok()?;
    Some(Spawn { cell, tile })
}

/// A full grid loses. Remaining merges are not considered.
pub fn check_terminal(board: &Board) -> Status {
    if board.is_full() {
        Status::Lost
    } else {
        Status::InProgress
    }
}
