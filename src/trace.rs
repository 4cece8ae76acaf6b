//! Structured per-move and per-game records
//!
//! The game loop hands every applied move and every finished game to a
//! [`TraceSink`]. The library never opens files itself: [`JsonLinesSink`]
//! writes one JSON object per line to any `std::io::Write` the caller owns.
//!
//! # Example
//!
//! ```
//! use line_em_up::trace::{JsonLinesSink, TraceRecord};
//! use line_em_up::{Game, GameConfig};
//! use line_em_up::game::NoHuman;
//!
//! let mut game = Game::new(GameConfig::new(3, 3).with_seed(1)).unwrap();
//! let mut sink = JsonLinesSink::new(Vec::new());
//! game.play(&mut NoHuman, &mut sink).unwrap();
//!
//! let output = String::from_utf8(sink.into_inner()).unwrap();
//! let last = output.lines().last().unwrap();
//! let record: TraceRecord = serde_json::from_str(last).unwrap();
//! assert!(matches!(record, TraceRecord::Game(_)));
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::board::{Player, Pos};
use crate::config::{Algorithm, Seat};
use crate::engine::SearchType;
use crate::error::{Error, Result};
use crate::rules::TerminalStatus;
use crate::search::EvalStats;

/// One applied move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveTrace {
    /// 1-based ply within the game
    pub ply: u32,
    pub player: Player,
    pub pos: Pos,
    /// Submitted by a human seat
    pub human: bool,
    /// Move suggested to the human before they chose
    pub recommended: Option<Pos>,
    /// How the AI (or the advisor) found its move
    pub search_type: Option<SearchType>,
    /// Root search depth
    pub depth: Option<u32>,
    /// Root value; absent for humans without advice and after timeouts
    pub value: Option<f64>,
    pub elapsed_secs: f64,
    /// Heuristic-search visits of this move
    pub evaluations: u64,
    pub evaluations_by_depth: EvalStats,
    pub deepest_ply: u32,
    pub timed_out: bool,
}

/// Configuration and totals of one seat over a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatSummary {
    pub player: Player,
    pub human: bool,
    pub algorithm: Option<Algorithm>,
    /// `None` for humans and for exhaustive search
    pub max_depth: Option<u32>,
    pub time_budget_secs: Option<f64>,
    pub moves: u32,
    pub evaluations: u64,
    pub eval_secs: f64,
    pub timeouts: u32,
    pub evaluations_by_depth: EvalStats,
}

impl SeatSummary {
    pub fn new(player: Player, seat: &Seat) -> Self {
        let search = seat.search_config();
        Self {
            player,
            human: !seat.is_ai(),
            algorithm: search.map(|config| config.algorithm),
            max_depth: search.and_then(|config| config.max_depth),
            time_budget_secs: search.map(|config| config.time_budget.as_secs_f64()),
            moves: 0,
            evaluations: 0,
            eval_secs: 0.0,
            timeouts: 0,
            evaluations_by_depth: EvalStats::new(),
        }
    }

    /// Fold one of this seat's moves into the totals
    pub fn add_move(&mut self, trace: &MoveTrace) {
        self.moves += 1;
        self.evaluations += trace.evaluations;
        self.eval_secs += trace.elapsed_secs;
        if trace.timed_out {
            self.timeouts += 1;
        }
        self.evaluations_by_depth.merge(&trace.evaluations_by_depth);
    }

    /// Key used to group seats with the same configuration
    pub fn label(&self) -> String {
        match self.algorithm {
            None => "human".to_string(),
            Some(algorithm) => {
                let depth = self
                    .max_depth
                    .map_or_else(|| "full".to_string(), |depth| depth.to_string());
                format!(
                    "{algorithm} d={depth} t={}s",
                    self.time_budget_secs.unwrap_or_default()
                )
            }
        }
    }
}

/// Configuration and outcome of one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub n: usize,
    pub s: usize,
    pub blocked: Vec<Pos>,
    /// Indexed by `Player::index`
    pub seats: [SeatSummary; 2],
    /// `InProgress` when the game was abandoned
    pub outcome: TerminalStatus,
    pub plies: u32,
    pub elapsed_secs: f64,
}

impl GameSummary {
    pub fn winner(&self) -> Option<Player> {
        self.outcome.winner()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn seat(&self, player: Player) -> &SeatSummary {
        &self.seats[player.index()]
    }

    /// Visits of both seats over the whole game
    pub fn evaluations_by_depth(&self) -> EvalStats {
        let mut total = self.seats[0].evaluations_by_depth.clone();
        total.merge(&self.seats[1].evaluations_by_depth);
        total
    }
}

/// One JSON line of a trace file, keyed by record kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceRecord {
    Move(MoveTrace),
    Game(GameSummary),
}

/// Receiver of move and game records
pub trait TraceSink {
    fn record_move(&mut self, trace: &MoveTrace) -> Result<()>;
    fn record_game(&mut self, summary: &GameSummary) -> Result<()>;
}

/// Discards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn record_move(&mut self, _trace: &MoveTrace) -> Result<()> {
        Ok(())
    }

    fn record_game(&mut self, _summary: &GameSummary) -> Result<()> {
        Ok(())
    }
}

/// Keeps every record in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub moves: Vec<MoveTrace>,
    pub games: Vec<GameSummary>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TraceSink for MemorySink {
    fn record_move(&mut self, trace: &MoveTrace) -> Result<()> {
        self.moves.push(trace.clone());
        Ok(())
    }

    fn record_game(&mut self, summary: &GameSummary) -> Result<()> {
        self.games.push(summary.clone());
        Ok(())
    }
}

/// Writes each record as one line of JSON
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record(&mut self, record: &TraceRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n").map_err(|source| Error::Io {
            operation: "write trace record".to_string(),
            source,
        })?;
        Ok(())
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|source| Error::Io {
            operation: "flush trace output".to_string(),
            source,
        })
    }
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn record_move(&mut self, trace: &MoveTrace) -> Result<()> {
        self.write_record(&TraceRecord::Move(trace.clone()))
    }

    fn record_game(&mut self, summary: &GameSummary) -> Result<()> {
        self.write_record(&TraceRecord::Game(summary.clone()))?;
        self.flush()
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn record_move(&mut self, trace: &MoveTrace) -> Result<()> {
        (**self).record_move(trace)
    }

    fn record_game(&mut self, summary: &GameSummary) -> Result<()> {
        (**self).record_game(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use std::time::Duration;

    fn sample_trace(evaluations: u64) -> MoveTrace {
        let mut stats = EvalStats::new();
        for _ in 0..evaluations {
            stats.record(1);
        }
        MoveTrace {
            ply: 1,
            player: Player::A,
            pos: Pos::new(1, 2),
            human: false,
            recommended: None,
            search_type: Some(SearchType::AlphaBeta),
            depth: Some(2),
            value: Some(0.5),
            elapsed_secs: 0.25,
            evaluations,
            evaluations_by_depth: stats,
            deepest_ply: 2,
            timed_out: false,
        }
    }

    #[test]
    fn test_seat_label() {
        let ai = Seat::Ai(
            SearchConfig::new(Algorithm::Minimax)
                .with_depth(3)
                .with_time_budget(Duration::from_millis(1500)),
        );
        assert_eq!(SeatSummary::new(Player::A, &ai).label(), "minimax d=3 t=1.5s");

        let full = Seat::Ai(SearchConfig::new(Algorithm::AlphaBeta).exhaustive());
        assert_eq!(SeatSummary::new(Player::B, &full).label(), "alphabeta d=full t=5s");

        assert_eq!(SeatSummary::new(Player::B, &Seat::Human).label(), "human");
    }

    #[test]
    fn test_seat_totals() {
        let mut seat = SeatSummary::new(Player::A, &Seat::Ai(SearchConfig::default()));
        seat.add_move(&sample_trace(3));
        let mut timed_out = sample_trace(1);
        timed_out.timed_out = true;
        seat.add_move(&timed_out);

        assert_eq!(seat.moves, 2);
        assert_eq!(seat.evaluations, 4);
        assert_eq!(seat.timeouts, 1);
        assert_eq!(seat.evaluations_by_depth.get(1), 4);
        assert!((seat.eval_secs - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_json_lines_are_tagged() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.record_move(&sample_trace(2)).unwrap();
        let output = String::from_utf8(sink.into_inner()).unwrap();

        assert_eq!(output.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(value["move"]["evaluations"], 2);
        assert_eq!(value["move"]["evaluations_by_depth"]["1"], 2);

        let record: TraceRecord = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(record, TraceRecord::Move(sample_trace(2)));
    }

    #[test]
    fn test_memory_sink_collects() {
        let mut sink = MemorySink::new();
        sink.record_move(&sample_trace(0)).unwrap();
        sink.record_move(&sample_trace(1)).unwrap();
        assert_eq!(sink.moves.len(), 2);
        assert!(sink.games.is_empty());
    }
}
