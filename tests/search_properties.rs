use std::time::Duration;

use line_em_up::search::Searcher;
use line_em_up::{AIEngine, Algorithm, Board, Player, Pos, SearchConfig, SearchType};

fn exhaustive_depth(board: &Board) -> u32 {
    board.empty_count() as u32 + 1
}

fn place_all(board: &mut Board, moves: &[(u8, u8, Player)]) {
    for &(x, y, player) in moves {
        board.place(Pos::new(x, y), player);
    }
}

fn positions() -> Vec<Board> {
    let mut center = Board::new(3, 3).unwrap();
    place_all(&mut center, &[(1, 1, Player::A)]);
    center.set_active_player(Player::B);

    let mut near_end = Board::new(3, 3).unwrap();
    place_all(
        &mut near_end,
        &[
            (0, 0, Player::A),
            (1, 0, Player::B),
            (2, 0, Player::A),
            (1, 1, Player::B),
            (0, 1, Player::A),
            (2, 1, Player::B),
            (2, 2, Player::A),
        ],
    );
    near_end.set_active_player(Player::B);

    let corners = [Pos::new(0, 0), Pos::new(0, 3), Pos::new(3, 0), Pos::new(3, 3)];
    let mut blocked = Board::with_blocks(4, 3, &corners).unwrap();
    place_all(
        &mut blocked,
        &[
            (1, 1, Player::A),
            (2, 2, Player::B),
            (1, 2, Player::A),
            (2, 1, Player::B),
        ],
    );

    vec![center, near_end, blocked]
}

#[test]
fn alphabeta_agrees_with_minimax_and_visits_less() {
    for mut board in positions() {
        let depth = exhaustive_depth(&board);
        let maximizing = board.active_player() == Player::B;
        let before = board.clone();

        let mut minimax = Searcher::default();
        let full = minimax.minimax(&mut board, depth, maximizing).unwrap();
        assert_eq!(board, before);

        let mut alphabeta = Searcher::default();
        let pruned = alphabeta.alphabeta(&mut board, depth, maximizing).unwrap();
        assert_eq!(board, before);

        assert_eq!(pruned.value, full.value, "value differs on\n{before}");
        assert!(alphabeta.stats().total() <= minimax.stats().total());
        assert!(alphabeta.nodes() <= minimax.nodes());
    }
}

#[test]
fn minimax_on_empty_three_by_three_is_a_draw() {
    let mut board = Board::new(3, 3).unwrap();
    let before = board.clone();
    let mut searcher = Searcher::default();
    let depth = exhaustive_depth(&board);
    let result = searcher
        .minimax(&mut board, depth, false)
        .unwrap();
    assert_eq!(result.value, 0.0);
    assert_eq!(result.best_move, Some(Pos::new(0, 0)));
    assert_eq!(board.play_count(), 0);
    assert_eq!(board, before);
    // Every node of the full game tree is charged once
    assert_eq!(searcher.stats().total(), 549_946);
}

#[test]
fn alphabeta_on_empty_three_by_three_is_a_draw() {
    let mut board = Board::new(3, 3).unwrap();
    let mut searcher = Searcher::default();
    let depth = exhaustive_depth(&board);
    let result = searcher
        .alphabeta(&mut board, depth, false)
        .unwrap();
    assert_eq!(result.value, 0.0);
    assert!(result.best_move.is_some());
    assert_eq!(board.play_count(), 0);
}

#[test]
fn exhaustive_search_finds_the_only_winning_cell() {
    let mut board = positions().remove(1);
    let mut searcher = Searcher::default();
    let depth = exhaustive_depth(&board);
    let result = searcher
        .run(Algorithm::Minimax, &mut board, depth, true)
        .unwrap();
    assert_eq!(result.value, 1.0);
    assert_eq!(result.best_move, Some(Pos::new(1, 2)));
}

#[test]
fn tiny_budget_falls_back_to_a_legal_move() {
    let mut board = Board::new(6, 4).unwrap();
    board.place(Pos::new(2, 3), Player::A);
    board.set_active_player(Player::B);
    let before = board.clone();

    let config = SearchConfig::new(Algorithm::Minimax)
        .exhaustive()
        .with_time_budget(Duration::ZERO);
    let mut engine = AIEngine::with_seed(config, 11);
    let result = engine.get_move_with_stats(&mut board);

    assert!(result.timed_out());
    assert_eq!(result.search_type, SearchType::RandomFallback);
    assert_eq!(result.value, None);
    let pos = result.best_move.expect("fallback move");
    assert!(before.is_legal(i32::from(pos.x), i32::from(pos.y)));
    assert_eq!(board, before);
}

#[test]
fn engine_reports_statistics_for_completed_searches() {
    let mut board = positions().remove(0);
    let config = SearchConfig::new(Algorithm::AlphaBeta)
        .exhaustive()
        .with_time_budget(Duration::from_secs(120));
    let mut engine = AIEngine::with_seed(config, 1);

    let result = engine.get_move_with_stats(&mut board);
    assert!(!result.timed_out());
    assert_eq!(result.search_type, SearchType::AlphaBeta);
    assert_eq!(result.value, Some(0.0));
    assert_eq!(result.depth, 9);
    assert!(result.evaluations() > 0);
    assert_eq!(result.evaluations(), result.stats.total());
}
