//! Turn controller and game loop
//!
//! A [`Game`] owns the board, one [`AIEngine`] per AI seat and an optional
//! advisor engine that suggests moves to human seats. Each turn moves through
//! `AwaitingMove -> MoveApplied -> (AwaitingMove | Terminal)`.
//!
//! Front ends drive a game either step by step ([`Game::play_ai_turn`],
//! [`Game::submit_move`]) or with the blocking [`Game::play`] loop, which
//! pulls human moves from a [`HumanInput`] and hands records to a
//! [`TraceSink`].
//!
//! # Example
//!
//! ```
//! use line_em_up::{Game, GameConfig, Player, Pos, Seat};
//! use line_em_up::rules::TerminalStatus;
//!
//! let config = GameConfig::new(3, 3)
//!     .with_seat(Player::A, Seat::Human)
//!     .with_seat(Player::B, Seat::Human)
//!     .with_recommend(false);
//! let mut game = Game::new(config).unwrap();
//!
//! for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
//!     game.submit_move(Pos::new(x, y)).unwrap();
//! }
//! let outcome = game.submit_move(Pos::new(0, 2)).unwrap();
//! assert_eq!(outcome.status, TerminalStatus::Win(Player::A));
//! ```

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{Board, Player, Pos};
use crate::config::{GameConfig, Seat};
use crate::engine::{AIEngine, MoveResult};
use crate::error::{ConfigError, MoveError, Result};
use crate::rules::TerminalStatus;
use crate::search::EvalStats;
use crate::trace::{GameSummary, MoveTrace, SeatSummary, TraceSink};

/// Where the turn controller stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Waiting for the active seat to move
    AwaitingMove,
    /// A move was placed and the board has not been classified yet
    MoveApplied,
    /// The game is over
    Terminal(TerminalStatus),
}

/// Source of human moves for [`Game::play`]
pub trait HumanInput {
    /// Next move for `player`, or `None` to abandon the game.
    ///
    /// `recommendation` is the advisor's move when recommendations are on.
    fn choose_move(
        &mut self,
        board: &Board,
        player: Player,
        recommendation: Option<Pos>,
    ) -> Option<Pos>;

    /// Called when the previous choice was rejected; `choose_move` follows.
    fn reject(&mut self, _error: &MoveError) {}
}

/// Input for games without human seats; abandons if ever asked.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHuman;

impl HumanInput for NoHuman {
    fn choose_move(&mut self, _board: &Board, _player: Player, _rec: Option<Pos>) -> Option<Pos> {
        None
    }
}

/// Result of one applied move
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub trace: MoveTrace,
    /// Board classification after the move
    pub status: TerminalStatus,
}

/// One game between two seats
pub struct Game {
    config: GameConfig,
    board: Board,
    engines: [Option<AIEngine>; 2],
    advisor: Option<AIEngine>,
    rng: StdRng,
    state: TurnState,
    ply: u32,
    history: Vec<MoveTrace>,
    started: Instant,
}

impl Game {
    /// Validate `config` and set up the first board.
    pub fn new(config: GameConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let board = config.build_board(&mut rng)?;

        let engines = [Player::A, Player::B].map(|player| match config.seat(player) {
            Seat::Ai(search) => Some(AIEngine::with_seed(search.clone(), rng.gen())),
            Seat::Human => None,
        });
        let advisor = config
            .recommend
            .then(|| AIEngine::with_seed(config.advisor.clone(), rng.gen()));

        Ok(Self {
            config,
            board,
            engines,
            advisor,
            rng,
            state: TurnState::AwaitingMove,
            ply: 0,
            history: Vec::new(),
            started: Instant::now(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn active_player(&self) -> Player {
        self.board.active_player()
    }

    /// Seat of the player to move
    pub fn active_seat(&self) -> &Seat {
        self.config.seat(self.active_player())
    }

    /// Plies applied in the current game
    pub fn ply(&self) -> u32 {
        self.ply
    }

    pub fn history(&self) -> &[MoveTrace] {
        &self.history
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, TurnState::Terminal(_))
    }

    /// Classify the board, skipping the scan while fewer than `s` marks exist
    pub fn status(&self) -> TerminalStatus {
        if self.board.marks_played() < self.board.run_length() {
            return TerminalStatus::InProgress;
        }
        self.board.terminal_status()
    }

    /// Advisor's suggestion for a human seat, when recommendations are on
    pub fn recommendation(&mut self) -> Option<MoveResult> {
        if self.is_over() || self.active_seat().is_ai() {
            return None;
        }
        let advisor = self.advisor.as_mut()?;
        Some(advisor.get_move_with_stats(&mut self.board))
    }

    /// Let the active AI seat search and play.
    pub fn play_ai_turn(&mut self) -> std::result::Result<MoveOutcome, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        let player = self.active_player();
        let engine = self.engines[player.index()]
            .as_mut()
            .ok_or(MoveError::NotAiTurn { player })?;

        let result = engine.get_move_with_stats(&mut self.board);
        let pos = result.best_move.ok_or(MoveError::GameOver)?;
        Ok(self.apply(pos, false, None, Some(&result)))
    }

    /// Play a move searched outside the game for the active AI seat, e.g. by
    /// an engine on a worker thread working on a copy of [`Game::board`].
    pub fn apply_ai_result(
        &mut self,
        result: &MoveResult,
    ) -> std::result::Result<MoveOutcome, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        let player = self.active_player();
        if !self.active_seat().is_ai() {
            return Err(MoveError::NotAiTurn { player });
        }
        let pos = result.best_move.ok_or(MoveError::GameOver)?;
        let (x, y) = (i32::from(pos.x), i32::from(pos.y));
        if !self.board.is_legal(x, y) {
            return Err(MoveError::Illegal { x, y });
        }
        Ok(self.apply(pos, false, None, Some(result)))
    }

    /// Play a human move for the active seat.
    ///
    /// Illegal coordinates leave the game untouched.
    pub fn submit_move(&mut self, pos: Pos) -> std::result::Result<MoveOutcome, MoveError> {
        self.submit_with_advice(pos, None)
    }

    /// Like [`Game::submit_move`], recording the advisor result shown to the
    /// human in the move trace.
    pub fn submit_with_advice(
        &mut self,
        pos: Pos,
        advice: Option<&MoveResult>,
    ) -> std::result::Result<MoveOutcome, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        let player = self.active_player();
        if self.active_seat().is_ai() {
            return Err(MoveError::NotHumanTurn { player });
        }
        let (x, y) = (i32::from(pos.x), i32::from(pos.y));
        if !self.board.is_legal(x, y) {
            return Err(MoveError::Illegal { x, y });
        }
        let recommended = advice.and_then(|result| result.best_move);
        Ok(self.apply(pos, true, recommended, advice))
    }

    fn apply(
        &mut self,
        pos: Pos,
        human: bool,
        recommended: Option<Pos>,
        search: Option<&MoveResult>,
    ) -> MoveOutcome {
        let player = self.active_player();
        self.board.place(pos, player);
        self.ply += 1;
        self.state = TurnState::MoveApplied;

        let trace = MoveTrace {
            ply: self.ply,
            player,
            pos,
            human,
            recommended,
            search_type: search.map(|result| result.search_type),
            depth: search.map(|result| result.depth),
            value: search.and_then(|result| result.value),
            elapsed_secs: search.map_or(0.0, |result| result.elapsed.as_secs_f64()),
            evaluations: search.map_or(0, MoveResult::evaluations),
            evaluations_by_depth: search.map_or_else(EvalStats::new, |result| result.stats.clone()),
            deepest_ply: search.map_or(0, |result| result.deepest_ply),
            timed_out: search.is_some_and(MoveResult::timed_out),
        };
        self.history.push(trace.clone());

        let status = self.status();
        if status.is_terminal() {
            self.state = TurnState::Terminal(status);
        } else {
            self.board.switch_player();
            self.state = TurnState::AwaitingMove;
        }
        MoveOutcome { trace, status }
    }

    /// Configuration, outcome and per-seat totals of the current game
    pub fn summary(&self) -> GameSummary {
        let mut seats = [Player::A, Player::B]
            .map(|player| SeatSummary::new(player, self.config.seat(player)));
        for trace in &self.history {
            seats[trace.player.index()].add_move(trace);
        }
        GameSummary {
            n: self.board.size(),
            s: self.board.run_length(),
            blocked: self.board.blocked_cells(),
            seats,
            outcome: match self.state {
                TurnState::Terminal(status) => status,
                _ => TerminalStatus::InProgress,
            },
            plies: self.ply,
            elapsed_secs: self.started.elapsed().as_secs_f64(),
        }
    }

    /// Start over on a fresh board with the same configuration.
    pub fn new_game(&mut self) -> std::result::Result<(), ConfigError> {
        self.board = self.config.build_board(&mut self.rng)?;
        self.state = TurnState::AwaitingMove;
        self.ply = 0;
        self.history.clear();
        self.started = Instant::now();
        Ok(())
    }

    /// Run the game to the end.
    ///
    /// Every move goes to `sink`, then the game summary. A finished game is
    /// replaced by a fresh board before returning; an abandoned one (the human
    /// input returned `None`) is left as it was with an `InProgress` outcome.
    pub fn play(
        &mut self,
        human: &mut dyn HumanInput,
        sink: &mut dyn TraceSink,
    ) -> Result<GameSummary> {
        log::debug!(
            "starting {}x{} game, s = {}, {} blocked",
            self.board.size(),
            self.board.size(),
            self.board.run_length(),
            self.board.blocked_count()
        );

        while !self.is_over() {
            let outcome = if self.active_seat().is_ai() {
                self.play_ai_turn()?
            } else {
                match self.human_turn(human)? {
                    Some(outcome) => outcome,
                    None => break,
                }
            };
            sink.record_move(&outcome.trace)?;
        }

        let summary = self.summary();
        sink.record_game(&summary)?;
        match summary.outcome {
            TerminalStatus::InProgress => {
                log::info!("game abandoned after {} plies", summary.plies)
            }
            outcome => log::info!("{} after {} plies", outcome, summary.plies),
        }

        if self.is_over() {
            self.new_game()?;
        }
        Ok(summary)
    }

    fn human_turn(&mut self, human: &mut dyn HumanInput) -> Result<Option<MoveOutcome>> {
        let advice = if self.config.recommend {
            self.recommendation()
        } else {
            None
        };
        let suggested = advice.as_ref().and_then(|result| result.best_move);

        loop {
            let player = self.active_player();
            let Some(pos) = human.choose_move(&self.board, player, suggested) else {
                return Ok(None);
            };
            match self.submit_with_advice(pos, advice.as_ref()) {
                Ok(outcome) => return Ok(Some(outcome)),
                Err(err @ MoveError::Illegal { .. }) => human.reject(&err),
                Err(err) => return Err(err.into()),
            }
        }
    }
}
