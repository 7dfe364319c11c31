use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use itertools::Itertools as _;
use rand::{SeedableRng, rngs::StdRng};
use twenty_fourty_eight::{
    board::{Board, Direction, test_utils},
    game::GameConfig,
    simulate,
};

/// Generate a vector of random 4x4 boards for benchmarking.
fn generate_boards(count: usize) -> Vec<Board> {
    let rng = &mut StdRng::seed_from_u64(0);

    (0..16)
        .flat_map(|filled| (0..filled).map(move |dup| (filled, dup)))
        .cartesian_product(0..count)
        .map(|((filled, dup), _)| test_utils::generate_random_board(4, filled, dup, rng))
        .collect()
}

fn bench_swipe(c: &mut Criterion) {
    const COUNT: usize = 100;

    let mut group = c.benchmark_group("swipe");

    let boards = generate_boards(COUNT);
    group.throughput(Throughput::Elements((boards.len() * Direction::ALL.len()) as u64));

    group.bench_function("baseline_swipe", |b| {
        b.iter(|| {
            for board in &boards {
                for direction in Direction::ALL {
                    black_box(test_utils::baseline_swipe(board, direction));
                }
            }
        });
    });

    group.bench_function("pass_swipe", |b| {
        b.iter(|| {
            for board in &boards {
                for direction in Direction::ALL {
                    black_box(board.swipe(direction));
                }
            }
        });
    });
}

fn bench_random_game(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);

    c.bench_function("random_game", |b| {
        b.iter(|| black_box(simulate::play_random_game(GameConfig::default(), 10_000, &mut rng)))
    });
}

criterion_group!(benches, bench_swipe, bench_random_game);
criterion_main!(benches);
