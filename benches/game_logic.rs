use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cosmono::core::{tspin, Board, Cosmono, GameModeKind, Session, SessionConfig, SessionSnapshot};
use cosmono::types::{Button, CellKind, RotateDirection, ShapeKind, TICK_MS};

fn started_session() -> Session {
    let mut session = Session::with_seed(GameModeKind::Survival, SessionConfig::default(), 12345);
    session.start();
    session
}

fn bench_tick(c: &mut Criterion) {
    let mut session = started_session();

    c.bench_function("session_tick_16ms", |b| {
        b.iter(|| {
            session.tick(black_box(TICK_MS));
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            for y in 18..22 {
                for x in 0..9 {
                    board.set(x, y, Some(CellKind::Garbage));
                }
            }
            // Vertical I in the last column.
            let mut i = Cosmono::new(ShapeKind::I, 8, 19);
            i.rotate(&Board::new(), RotateDirection::Right);
            board.place_piece(&i);
            black_box(board.tick(500))
        })
    });
}

fn bench_move(c: &mut Criterion) {
    let mut session = started_session();

    c.bench_function("press_left_right", |b| {
        b.iter(|| {
            session.press(black_box(Button::Left));
            session.press(black_box(Button::Right));
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let board = Board::new();
    let mut piece = Cosmono::new(ShapeKind::T, 4, 10);

    c.bench_function("rotate_with_kicks", |b| {
        b.iter(|| {
            piece.rotate(&board, black_box(RotateDirection::Right));
        })
    });
}

fn bench_t_spin_classify(c: &mut Criterion) {
    let mut board = Board::new();
    board.set(3, 11, Some(CellKind::Garbage));
    board.set(5, 11, Some(CellKind::Garbage));
    board.set(3, 9, Some(CellKind::Garbage));
    let mut piece = Cosmono::new(ShapeKind::T, 4, 10);
    piece.last_move_was_rotation = true;

    c.bench_function("t_spin_classify", |b| {
        b.iter(|| black_box(tspin::classify(&board, &piece, black_box(1))))
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let session = started_session();
    let mut snap = SessionSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            session.snapshot_into(&mut snap);
            black_box(&snap);
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_move,
    bench_rotate,
    bench_t_spin_classify,
    bench_snapshot
);
criterion_main!(benches);
