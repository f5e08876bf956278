use criterion::{black_box, criterion_group, criterion_main, Criterion, SamplingMode};
use domineering::ai::{greedy_choice, search};
use domineering::game::{generate_moves, Board, Placement, Player};
use std::time::Duration;

fn mid_game_board() -> Board {
    let mut board = Board::new(6);
    let moves = [
        (Placement::new(0, 6), Player::Vertical),
        (Placement::new(14, 15), Player::Horizontal),
        (Placement::new(10, 16), Player::Vertical),
        (Placement::new(24, 25), Player::Horizontal),
        (Placement::new(5, 11), Player::Vertical),
        (Placement::new(32, 33), Player::Horizontal),
    ];
    for (placement, player) in moves {
        board.place(placement, player);
    }
    board
}

fn bench_alternating_ten_plies() {
    let mut board = Board::new(6);
    let mut to_move = Player::Vertical;
    for _ in 0..10 {
        match search(&board, 3, to_move, to_move).0 {
            Some(placement) => {
                board.place(placement, to_move);
                to_move = to_move.opponent();
            }
            None => break,
        }
    }
}

fn search_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimax");

    group
        .sampling_mode(SamplingMode::Flat)
        .sample_size(10)
        .measurement_time(Duration::from_secs(30));

    group.bench_function("empty_6x6_depth_4", |b| {
        let board = Board::new(6);
        b.iter(|| search(black_box(&board), 4, Player::Vertical, Player::Vertical))
    });

    group.bench_function("mid_game_6x6_depth_5", |b| {
        let board = mid_game_board();
        b.iter(|| search(black_box(&board), 5, Player::Horizontal, Player::Horizontal))
    });

    group.bench_function("ten_plies_depth_3", |b| b.iter(bench_alternating_ten_plies));

    group.finish();

    let mut group = c.benchmark_group("greedy");
    group.bench_function("empty_10x10", |b| {
        let board = Board::new(10);
        b.iter(|| greedy_choice(black_box(&board), Player::Vertical))
    });
    group.bench_function("generate_moves_10x10", |b| {
        let board = Board::new(10);
        b.iter(|| generate_moves(black_box(&board), Player::Horizontal))
    });
    group.finish();
}

criterion_group!(benches, search_bench);
criterion_main!(benches);
