use itertools::Itertools as _;
use rand::{Rng, seq::IndexedRandom as _};

use crate::{
    board::{Direction, Tile},
    game::{GameConfig, GameError, GameState, Status},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u64,
    pub moves: usize,
    pub max_tile: u64,
    pub status: Status,
}

/// Plays uniformly among the directions that change the board, until the
/// game is lost, no direction is left, or `max_moves` moves were made.
pub fn play_random_game(
    config: GameConfig,
    max_moves: usize,
    rng: &mut impl Rng,
) -> Result<GameSummary, GameError> {
    let mut game = GameState::new(config, rng)?;
    let mut moves = 0;

    while game.status() == Status::InProgress && moves < max_moves {
        let open = Direction::ALL
            .into_iter()
            .filter(|&direction| game.board().can_swipe(direction))
            .collect_vec();

        let Some(&direction) = open.choose(rng) else {
            log::debug!("No direction changes the board:\n{:?}", game.board());
            break;
        };

        game.apply_move(direction, rng)?;
        moves += 1;
    }

    let summary = GameSummary {
        score: game.score(),
        moves,
        max_tile: game.board().max_tile().map_or(0, Tile::value),
        status: game.status(),
    };

    log::debug!("Finished random game: {summary:?}");
    Ok(summary)
}

#[cfg(test)]
mod test {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_random_games_end_lost() {
        let rng = &mut StdRng::seed_from_u64(7);

        for size in 2..=4 {
            let config = GameConfig {
                size,
                ..GameConfig::default()
            };

            for _ in 0..10 {
                let summary = play_random_game(config, usize::MAX, rng).unwrap();
                assert_eq!(summary.status, Status::Lost);
                assert!(summary.moves > 0);
                assert!(summary.max_tile >= 2);
                assert!(summary.max_tile.is_power_of_two());
            }
        }
    }

    #[test]
    fn test_move_cap() {
        let rng = &mut StdRng::seed_from_u64(7);
        let summary = play_random_game(GameConfig::default(), 3, rng).unwrap();

        assert_eq!(summary.moves, 3);
        assert_eq!(summary.status, Status::InProgress);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let config = GameConfig::default();
        let a = play_random_game(config, 500, &mut StdRng::seed_from_u64(11)).unwrap();
        let b = play_random_game(config, 500, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(a, b);
    }
}
