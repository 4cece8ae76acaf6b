//! Aggregates game summaries across a batch of games
//!
//! Seats are grouped by configuration label (see [`SeatSummary::label`]), so
//! the same search setup playing as A in some games and as B in others is
//! counted as one entry.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::board::Player;
use crate::search::EvalStats;
use crate::trace::{GameSummary, SeatSummary};

/// Totals of one seat configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigTally {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub moves: u64,
    pub evaluations: u64,
    pub eval_secs: f64,
    pub timeouts: u64,
    pub evaluations_by_depth: EvalStats,
}

impl ConfigTally {
    fn add(&mut self, seat: &SeatSummary, outcome: Option<Option<Player>>) {
        self.games += 1;
        match outcome {
            Some(Some(winner)) if winner == seat.player => self.wins += 1,
            Some(Some(_)) => self.losses += 1,
            Some(None) => self.ties += 1,
            None => {}
        }
        self.moves += u64::from(seat.moves);
        self.evaluations += seat.evaluations;
        self.eval_secs += seat.eval_secs;
        self.timeouts += u64::from(seat.timeouts);
        self.evaluations_by_depth.merge(&seat.evaluations_by_depth);
    }

    pub fn win_rate(&self) -> f64 {
        ratio(self.wins as f64, self.games as f64)
    }

    /// Mean search time per move in seconds
    pub fn average_eval_secs(&self) -> f64 {
        ratio(self.eval_secs, self.moves as f64)
    }

    /// Mean heuristic-search visits per move
    pub fn average_evaluations(&self) -> f64 {
        ratio(self.evaluations as f64, self.moves as f64)
    }

    /// Visit-weighted mean remaining depth
    pub fn average_depth(&self) -> f64 {
        self.evaluations_by_depth.average_depth()
    }
}

#[inline]
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Summary statistics over many games
#[derive(Debug, Clone, Default, Serialize)]
pub struct Scoreboard {
    pub games: u32,
    /// Games that reached a win or a tie
    pub finished: u32,
    pub wins: [u32; 2],
    pub ties: u32,
    pub total_plies: u64,
    /// Tallies keyed by seat label. When both seats of a game share a label
    /// the key also names the player (`"... as ◦"`), so each tally counts a
    /// game once.
    pub by_config: BTreeMap<String, ConfigTally>,
    pub evaluations_by_depth: EvalStats,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, summary: &GameSummary) {
        self.games += 1;
        self.total_plies += u64::from(summary.plies);

        let outcome = summary.is_finished().then(|| summary.winner());
        if outcome.is_some() {
            self.finished += 1;
        }
        match outcome {
            Some(Some(winner)) => self.wins[winner.index()] += 1,
            Some(None) => self.ties += 1,
            None => {}
        }

        let mirror = summary.seats[0].label() == summary.seats[1].label();
        for seat in &summary.seats {
            let key = if mirror {
                format!("{} as {}", seat.label(), seat.player)
            } else {
                seat.label()
            };
            self.by_config.entry(key).or_default().add(seat, outcome);
            self.evaluations_by_depth.merge(&seat.evaluations_by_depth);
        }
    }

    pub fn win_rate(&self, player: Player) -> f64 {
        ratio(self.wins[player.index()] as f64, self.games as f64)
    }

    pub fn average_plies(&self) -> f64 {
        ratio(self.total_plies as f64, self.games as f64)
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} games ({} finished)", self.games, self.finished)?;
        writeln!(
            f,
            "Total wins for {}: {} ({:.1}%)",
            Player::A,
            self.wins[0],
            self.win_rate(Player::A) * 100.0
        )?;
        writeln!(
            f,
            "Total wins for {}: {} ({:.1}%)",
            Player::B,
            self.wins[1],
            self.win_rate(Player::B) * 100.0
        )?;
        writeln!(f, "Ties: {}", self.ties)?;
        writeln!(f, "Average moves per game: {:.2}", self.average_plies())?;

        for (label, tally) in &self.by_config {
            writeln!(f)?;
            writeln!(f, "[{label}]")?;
            writeln!(
                f,
                "  won {} / {} ({:.1}%), lost {}, tied {}",
                tally.wins,
                tally.games,
                tally.win_rate() * 100.0,
                tally.losses,
                tally.ties
            )?;
            writeln!(
                f,
                "  average evaluation time: {:.6}s, evaluations per move: {:.1}, depth: {:.2}",
                tally.average_eval_secs(),
                tally.average_evaluations(),
                tally.average_depth()
            )?;
            if tally.timeouts > 0 {
                writeln!(f, "  timeouts: {}", tally.timeouts)?;
            }
        }

        if !self.evaluations_by_depth.is_empty() {
            writeln!(f)?;
            writeln!(f, "Evaluations by depth:")?;
            for (depth, count) in self.evaluations_by_depth.per_depth() {
                writeln!(f, "  {depth}: {count}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;
    use crate::config::{Algorithm, SearchConfig, Seat};
    use crate::rules::TerminalStatus;

    fn summary(outcome: TerminalStatus, a: &Seat, b: &Seat, evaluations: [u64; 2]) -> GameSummary {
        let mut seats = [SeatSummary::new(Player::A, a), SeatSummary::new(Player::B, b)];
        for (seat, count) in seats.iter_mut().zip(evaluations) {
            seat.moves = 2;
            seat.evaluations = count;
            seat.eval_secs = 0.5;
            for _ in 0..count {
                seat.evaluations_by_depth.record(2);
            }
        }
        GameSummary {
            n: 3,
            s: 3,
            blocked: vec![Pos::new(0, 0)],
            seats,
            outcome,
            plies: 4,
            elapsed_secs: 1.0,
        }
    }

    #[test]
    fn test_empty_scoreboard() {
        let board = Scoreboard::new();
        assert_eq!(board.win_rate(Player::A), 0.0);
        assert_eq!(board.average_plies(), 0.0);
        assert!(board.to_string().starts_with("0 games"));
    }

    #[test]
    fn test_groups_by_configuration() {
        let minimax = Seat::Ai(SearchConfig::new(Algorithm::Minimax).with_depth(2));
        let alphabeta = Seat::Ai(SearchConfig::new(Algorithm::AlphaBeta).with_depth(2));

        let mut board = Scoreboard::new();
        board.record(&summary(TerminalStatus::Win(Player::A), &minimax, &alphabeta, [10, 4]));
        // Seats swapped: alphabeta now plays A and wins again
        board.record(&summary(TerminalStatus::Win(Player::A), &alphabeta, &minimax, [6, 8]));
        board.record(&summary(TerminalStatus::Tie, &minimax, &alphabeta, [0, 0]));

        assert_eq!(board.games, 3);
        assert_eq!(board.finished, 3);
        assert_eq!(board.wins, [2, 0]);
        assert_eq!(board.ties, 1);

        let mm = &board.by_config["minimax d=2 t=5s"];
        assert_eq!((mm.games, mm.wins, mm.losses, mm.ties), (3, 1, 1, 1));
        assert_eq!(mm.evaluations, 18);
        assert_eq!(mm.moves, 6);
        assert_eq!(mm.average_evaluations(), 3.0);

        let ab = &board.by_config["alphabeta d=2 t=5s"];
        assert_eq!((ab.games, ab.wins, ab.losses, ab.ties), (3, 1, 1, 1));
        assert_eq!(ab.average_depth(), 2.0);

        assert_eq!(board.evaluations_by_depth.get(2), 28);
        assert_eq!(board.average_plies(), 4.0);
    }

    #[test]
    fn test_abandoned_games_do_not_count_as_results() {
        let mut board = Scoreboard::new();
        board.record(&summary(TerminalStatus::InProgress, &Seat::Human, &Seat::Human, [0, 0]));
        assert_eq!(board.games, 1);
        assert_eq!(board.finished, 0);
        assert_eq!(board.ties, 0);
        let human = &board.by_config["human as ◦"];
        assert_eq!(human.games, 1);
        assert_eq!(human.wins + human.losses + human.ties, 0);
    }

    #[test]
    fn test_display_lists_configs() {
        let seat = Seat::Ai(SearchConfig::new(Algorithm::AlphaBeta).with_depth(3));
        let mut board = Scoreboard::new();
        board.record(&summary(TerminalStatus::Win(Player::B), &seat, &seat, [1, 2]));
        let text = board.to_string();
        assert!(text.contains("Total wins for •: 1 (100.0%)"));
        assert!(text.contains("[alphabeta d=3 t=5s as •]"));
        assert!(text.contains("  2: 3"));
    }

    #[test]
    fn test_mirror_match_counts_each_game_once_per_tally() {
        let seat = Seat::Ai(SearchConfig::new(Algorithm::AlphaBeta).with_depth(4));
        let mut board = Scoreboard::new();
        board.record(&summary(TerminalStatus::Win(Player::A), &seat, &seat, [3, 5]));
        board.record(&summary(TerminalStatus::Tie, &seat, &seat, [2, 2]));

        assert_eq!(board.by_config.len(), 2);
        let first = &board.by_config["alphabeta d=4 t=5s as ◦"];
        assert_eq!((first.games, first.wins, first.losses, first.ties), (2, 1, 0, 1));
        let second = &board.by_config["alphabeta d=4 t=5s as •"];
        assert_eq!((second.games, second.wins, second.losses, second.ties), (2, 0, 1, 1));
        assert!(!board.by_config.contains_key("alphabeta d=4 t=5s"));
        assert!(board.to_string().contains("won 1 / 2"));
    }
}
