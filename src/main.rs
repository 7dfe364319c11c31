use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::{SeedableRng, rngs::StdRng};
use twenty_fourty_eight::{
    game::{GameConfig, GameState, Status},
    simulate, tui,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Slide and merge tiles on an N×N grid")]
struct Cli {
    /// Width and height of the grid
    #[arg(long, default_value_t = 4, global = true)]
    size: usize,

    /// Seed for tile spawns (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Chance that a spawned tile is a 4 instead of a 2
    #[arg(long, default_value_t = 0.5, value_name = "P", global = true)]
    four_probability: f64,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play interactively in the terminal
    Play,

    /// Play random games headlessly and report their scores
    Simulate {
        /// Number of games to play
        #[arg(long, default_value_t = 100)]
        games: u64,

        /// Stop a game after this many board-changing moves
        #[arg(long, default_value_t = 100_000)]
        max_moves: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let config = GameConfig {
        size: cli.size,
        four_probability: cli.four_probability,
    };
    config.validate()?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => run_play(config, &mut rng),
        Command::Simulate { games, max_moves } => {
            run_simulation(config, games, max_moves, &mut rng)
        }
    }
}

fn run_play(config: GameConfig, rng: &mut StdRng) -> Result<()> {
    let mut game = GameState::new(config, rng)?;
    tui::play(&mut game, rng)?;

    match game.status() {
        Status::Lost => println!("Game Over! Final Score: {}", game.score()),
        Status::InProgress => println!("Final Score: {}", game.score()),
    }

    Ok(())
}

fn run_simulation(
    config: GameConfig,
    games: u64,
    max_moves: usize,
    rng: &mut StdRng,
) -> Result<()> {
    let pb = ProgressBar::new(games);
    pb.set_style(ProgressStyle::with_template(
        "{spinner} {elapsed_precise} [{bar:40}] {pos}/{len} games | {msg}",
    )?);

    let mut total_score = 0;
    let mut best_score = 0;
    let mut best_tile = 0;
    let mut total_moves = 0;

    for _ in 0..games {
        let summary = simulate::play_random_game(config, max_moves, rng)?;

        total_score += summary.score;
        total_moves += summary.moves;
        best_score = best_score.max(summary.score);
        best_tile = best_tile.max(summary.max_tile);

        pb.set_message(format!("best score: {best_score}, best tile: {best_tile}"));
        pb.inc(1);
    }

    pb.finish_and_clear();

    let mean_score = total_score as f64 / games.max(1) as f64;
    info!("Played {games} games, {total_moves} moves in total");
    println!(
        "Games: {games}, mean score: {mean_score:.1}, best score: {best_score}, best tile: {best_tile}"
    );

    Ok(())
}
