use crossterm::{
    QueueableCommand,
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use rand::Rng;
use std::io::{self, Write};

use crate::{
    board::{Cell, Direction},
    game::{GameState, Status},
};

const CELL_WIDTH: usize = 7;

/// Raw mode and the alternate screen, undone on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
    }
}

pub fn key_to_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Left | KeyCode::Char('a' | 'h') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'l') => Some(Direction::Right),
        KeyCode::Up | KeyCode::Char('w' | 'k') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'j') => Some(Direction::Down),
        _ => None,
    }
}

/// Runs the interactive game until the player quits.
///
/// Every accepted direction key is exactly one move. Once the game is lost,
/// direction keys are ignored until the player restarts.
pub fn play(game: &mut GameState, rng: &mut impl Rng) -> anyhow::Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut stdout = io::stdout();

    loop {
        draw(&mut stdout, game)?;

        // Handle input
        let event = event::read()?;
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            continue;
        };

        match code {
            KeyCode::Esc | KeyCode::Char('q') => break,
            KeyCode::Char('r') => game.restart(rng)?,
            code => {
                if let Some(direction) = key_to_direction(code) {
                    if game.status() == Status::InProgress {
                        game.apply_move(direction, rng)?;
                    }
                }
            }
        }
    }

    Ok(())
}

fn draw(stdout: &mut impl Write, game: &GameState) -> io::Result<()> {
    stdout.queue(Clear(ClearType::All))?;
    stdout.queue(MoveTo(0, 0))?;
    stdout.queue(Print(format!("Score: {}\r\n\r\n", game.score())))?;

    let board = game.board();
    for row in 0..board.size() {
        for col in 0..board.size() {
            let tile = board.get(Cell::new(row, col));
            let label = tile.map_or_else(|| ".".to_owned(), |t| t.value().to_string());
            let rank = tile.map_or(0, |t| t.rank());

            stdout
                .queue(SetForegroundColor(get_color(rank)))?
                .queue(Print(format!("{label:>width$}", width = CELL_WIDTH)))?
                .queue(ResetColor)?;
        }

        stdout.queue(Print("\r\n\r\n"))?;
    }

    let footer = match game.status() {
        Status::InProgress => "arrows/wasd/hjkl: move   r: restart   q: quit".to_owned(),
        Status::Lost => format!(
            "Game Over! Final Score: {}   r: restart   q: quit",
            game.score()
        ),
    };

    stdout.queue(Print(footer))?;
    stdout.flush()
}

fn get_color(rank: u8) -> Color {
    match rank {
        0 => Color::DarkGrey,
        1..=2 => Color::White,
        3..=5 => Color::Yellow,
        6..=8 => Color::Red,
        9..=10 => Color::Magenta,
        _ => Color::Green,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_to_direction(KeyCode::Left), Some(Direction::Left));
        assert_eq!(key_to_direction(KeyCode::Char('d')), Some(Direction::Right));
        assert_eq!(key_to_direction(KeyCode::Char('k')), Some(Direction::Up));
        assert_eq!(key_to_direction(KeyCode::Down), Some(Direction::Down));
        assert_eq!(key_to_direction(KeyCode::Char('q')), None);
        assert_eq!(key_to_direction(KeyCode::Char('r')), None);
        assert_eq!(key_to_direction(KeyCode::Enter), None);
    }

    #[test]
    fn test_draw_shows_score_and_tiles() {
        let board = crate::board::Board::from_values(&[[2, 0], [0, 1024]]).unwrap();
        let game = GameState::from_board(board, 36);

        let mut out = Vec::new();
        draw(&mut out, &game).unwrap();
        let text = String::from_utf8_lossy(&out);

        assert!(text.contains("Score: 36"));
        assert!(text.contains("   1024"));
        assert!(text.contains("      2"));
    }
}
