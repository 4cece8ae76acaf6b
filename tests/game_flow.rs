use std::fs;
use std::io::BufWriter;
use std::time::Duration;

use line_em_up::game::NoHuman;
use line_em_up::trace::{JsonLinesSink, MemorySink, TraceRecord};
use line_em_up::{
    Algorithm, Board, Game, GameConfig, HumanInput, MoveError, Player, Pos, Scoreboard,
    SearchConfig, Seat, TerminalStatus,
};

fn perfect(algorithm: Algorithm) -> Seat {
    Seat::Ai(
        SearchConfig::new(algorithm)
            .exhaustive()
            .with_time_budget(Duration::from_secs(120)),
    )
}

fn ai_config() -> GameConfig {
    GameConfig::new(3, 3)
        .with_seat(Player::A, perfect(Algorithm::AlphaBeta))
        .with_seat(Player::B, perfect(Algorithm::Minimax))
        .with_recommend(false)
        .with_seed(42)
}

#[test]
fn perfect_play_on_three_by_three_ties() {
    let mut game = Game::new(ai_config()).unwrap();
    let mut sink = MemorySink::new();

    let summary = game.play(&mut NoHuman, &mut sink).unwrap();
    assert_eq!(summary.outcome, TerminalStatus::Tie);
    assert_eq!(summary.plies, 9);
    assert_eq!(sink.moves.len(), 9);
    assert_eq!(sink.games, vec![summary.clone()]);

    // Seats alternate starting with ◦
    for (i, trace) in sink.moves.iter().enumerate() {
        let expected = if i % 2 == 0 { Player::A } else { Player::B };
        assert_eq!(trace.player, expected);
        assert_eq!(trace.ply, i as u32 + 1);
        assert!(!trace.timed_out);
    }
    assert_eq!(summary.seat(Player::A).moves, 5);
    assert_eq!(summary.seat(Player::B).moves, 4);

    // A finished game leaves a fresh board behind
    assert_eq!(game.board().play_count(), 0);
    assert_eq!(game.ply(), 0);
}

#[test]
fn trace_file_has_one_line_per_record() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut sink = JsonLinesSink::new(BufWriter::new(file.reopen().unwrap()));

    let mut game = Game::new(ai_config().with_random_blocks(2)).unwrap();
    let summary = game.play(&mut NoHuman, &mut sink).unwrap();

    let text = fs::read_to_string(file.path()).unwrap();
    let records: Vec<TraceRecord> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), summary.plies as usize + 1);
    assert!(records[..records.len() - 1]
        .iter()
        .all(|record| matches!(record, TraceRecord::Move(_))));
    match records.last() {
        Some(TraceRecord::Game(game)) => {
            assert_eq!(game.blocked.len(), 2);
            assert_eq!(game.outcome, summary.outcome);
            assert_eq!(game.plies, summary.plies);
        }
        other => panic!("expected a game record, got {other:?}"),
    }
}

/// Plays scripted moves and remembers rejections
struct Scripted {
    moves: Vec<Pos>,
    rejected: usize,
    seen_recommendation: bool,
}

impl HumanInput for Scripted {
    fn choose_move(&mut self, _board: &Board, _player: Player, rec: Option<Pos>) -> Option<Pos> {
        self.seen_recommendation |= rec.is_some();
        if self.moves.is_empty() {
            None
        } else {
            Some(self.moves.remove(0))
        }
    }

    fn reject(&mut self, _error: &MoveError) {
        self.rejected += 1;
    }
}

#[test]
fn human_against_ai_with_recommendations() {
    let config = GameConfig::new(3, 3)
        .with_seat(Player::A, Seat::Human)
        .with_seat(Player::B, perfect(Algorithm::AlphaBeta))
        .with_recommend(true)
        .with_advisor(SearchConfig::new(Algorithm::AlphaBeta).with_depth(2))
        .with_seed(5);
    let mut game = Game::new(config).unwrap();

    // The second move repeats the first and is rejected, then the human quits
    let mut human = Scripted {
        moves: vec![Pos::new(1, 1), Pos::new(1, 1)],
        rejected: 0,
        seen_recommendation: false,
    };
    let mut sink = MemorySink::new();
    let summary = game.play(&mut human, &mut sink).unwrap();

    assert!(human.seen_recommendation);
    assert_eq!(human.rejected, 1);
    assert_eq!(summary.outcome, TerminalStatus::InProgress);
    assert_eq!(summary.plies, 2);
    assert!(sink.moves[0].human);
    assert!(sink.moves[0].recommended.is_some());
    assert!(!sink.moves[1].human);

    // Abandoned games keep their board
    assert_eq!(game.board().marks_played(), 2);
}

#[test]
fn scoreboard_over_a_batch() {
    let mut scoreboard = Scoreboard::new();
    for seed in 0..3 {
        let config = GameConfig::new(4, 3)
            .with_random_blocks(2)
            .with_seat(
                Player::A,
                Seat::Ai(SearchConfig::new(Algorithm::AlphaBeta).with_depth(2)),
            )
            .with_seat(
                Player::B,
                Seat::Ai(SearchConfig::new(Algorithm::Minimax).with_depth(1)),
            )
            .with_recommend(false)
            .with_seed(seed);
        let mut game = Game::new(config).unwrap();
        let summary = game.play(&mut NoHuman, &mut MemorySink::new()).unwrap();
        assert!(summary.is_finished());
        scoreboard.record(&summary);
    }

    assert_eq!(scoreboard.games, 3);
    assert_eq!(scoreboard.finished, 3);
    assert_eq!(scoreboard.wins[0] + scoreboard.wins[1] + scoreboard.ties, 3);
    assert_eq!(scoreboard.by_config.len(), 2);
    assert_eq!(scoreboard.by_config["alphabeta d=2 t=5s"].games, 3);
    assert_eq!(scoreboard.by_config["minimax d=1 t=5s"].games, 3);

    let text = scoreboard.to_string();
    assert!(text.starts_with("3 games (3 finished)"));
    assert!(text.contains("[alphabeta d=2 t=5s]"));
}
