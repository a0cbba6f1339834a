use std::sync::atomic::AtomicBool;
use std::time::Instant;

use chess_engine::board::{search, Board, SearchConfig, SearchState};

#[test]
fn depth_limited_search_returns_move() {
    let mut board = Board::new();
    let mut state = SearchState::new(16);
    let stop = AtomicBool::new(false);

    let config = SearchConfig::depth(1);
    let result = search(&mut board, &mut state, config, &stop);
    assert!(result.best_move.is_some());
}

#[test]
fn time_limited_search_returns_within_budget() {
    let mut board = Board::new();
    let mut state = SearchState::new(16);
    let stop = AtomicBool::new(false);

    let config = SearchConfig::time(50);
    let start = Instant::now();
    let result = search(&mut board, &mut state, config, &stop);
    let elapsed = start.elapsed();

    assert!(result.best_move.is_some());
    assert!(
        elapsed.as_secs() < 5,
        "time-limited search overran its budget: {elapsed:?}"
    );
}
