//! Game state management for the line 'em up GUI

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::rules::winning_run;
use crate::{
    AIEngine, Algorithm, ConfigError, Game, GameConfig, MoveResult, Player, Pos, Scoreboard,
    SearchConfig, Seat, TerminalStatus,
};

/// Who plays a seat, as picked in the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatKind {
    Human,
    Ai,
}

/// Editable settings for the next game
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub n: usize,
    pub s: usize,
    pub blocks: usize,
    pub seats: [SeatKind; 2],
    pub algorithms: [Algorithm; 2],
    pub depths: [u32; 2],
    pub exhaustive: [bool; 2],
    pub budget_secs: [f32; 2],
    pub recommend: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            n: 3,
            s: 3,
            blocks: 0,
            seats: [SeatKind::Human, SeatKind::Ai],
            algorithms: [Algorithm::AlphaBeta; 2],
            depths: [4; 2],
            exhaustive: [false; 2],
            budget_secs: [5.0; 2],
            recommend: true,
        }
    }
}

impl Settings {
    fn search_config(&self, i: usize) -> SearchConfig {
        let config = SearchConfig::new(self.algorithms[i])
            .with_time_budget(Duration::from_secs_f32(self.budget_secs[i]));
        if self.exhaustive[i] {
            config.exhaustive()
        } else {
            config.with_depth(self.depths[i])
        }
    }

    pub fn to_config(&self) -> GameConfig {
        let seat = |i: usize| match self.seats[i] {
            SeatKind::Human => Seat::Human,
            SeatKind::Ai => Seat::Ai(self.search_config(i)),
        };
        // Hints use the AI settings of the seat being advised
        let advisor = if self.seats[0] == SeatKind::Human { 0 } else { 1 };
        GameConfig::new(self.n, self.s)
            .with_random_blocks(self.blocks)
            .with_seat(Player::A, seat(0))
            .with_seat(Player::B, seat(1))
            .with_recommend(self.recommend)
            .with_advisor(self.search_config(advisor))
    }
}

/// What a worker thread is searching for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Move for the active AI seat
    Move,
    /// Suggestion for the active human seat
    Hint,
}

/// AI computation state
pub enum AiState {
    Idle,
    Thinking {
        request: Request,
        receiver: Receiver<MoveResult>,
        start_time: Instant,
    },
}

/// Finished game shown until a new one starts
#[derive(Debug, Clone, PartialEq)]
pub struct GameOver {
    pub status: TerminalStatus,
    pub winning_run: Option<Vec<Pos>>,
}

/// Move timer for tracking thinking time
pub struct MoveTimer {
    pub start_time: Option<Instant>,
    pub last_move_duration: Option<Duration>,
    pub ai_thinking_time: Option<Duration>,
}

impl Default for MoveTimer {
    fn default() -> Self {
        Self {
            start_time: Some(Instant::now()),
            last_move_duration: None,
            ai_thinking_time: None,
        }
    }
}

impl MoveTimer {
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) -> Duration {
        let duration = self.elapsed();
        self.last_move_duration = Some(duration);
        self.start_time = None;
        duration
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.map_or(Duration::ZERO, |t| t.elapsed())
    }

    pub fn set_ai_time(&mut self, duration: Duration) {
        self.ai_thinking_time = Some(duration);
    }
}

/// Main game state
pub struct GameState {
    pub game: Game,
    pub settings: Settings,
    pub last_move: Option<Pos>,
    pub last_ai_result: Option<MoveResult>,
    pub ai_state: AiState,
    pub move_timer: MoveTimer,
    pub suggested_move: Option<Pos>,
    /// Advisor result behind `suggested_move`
    advice: Option<MoveResult>,
    /// Ply the last hint was requested for
    hinted_ply: Option<u32>,
    pub game_over: Option<GameOver>,
    pub scoreboard: Scoreboard,
    pub message: Option<String>,
}

impl GameState {
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        let game = Game::new(settings.to_config())?;
        Ok(Self {
            game,
            settings,
            last_move: None,
            last_ai_result: None,
            ai_state: AiState::Idle,
            move_timer: MoveTimer::default(),
            suggested_move: None,
            advice: None,
            hinted_ply: None,
            game_over: None,
            scoreboard: Scoreboard::new(),
            message: None,
        })
    }

    /// Start a game from the current settings; invalid settings keep the old game
    pub fn new_game(&mut self) {
        match Game::new(self.settings.to_config()) {
            Ok(game) => {
                self.game = game;
                self.clear_turn_state();
                self.message = None;
            }
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    /// Replay the same configuration on a fresh board
    pub fn reset(&mut self) {
        match self.game.new_game() {
            Ok(()) => {
                self.clear_turn_state();
                self.message = None;
            }
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    fn clear_turn_state(&mut self) {
        self.last_move = None;
        self.last_ai_result = None;
        // A running worker is abandoned; its result is never read
        self.ai_state = AiState::Idle;
        self.move_timer = MoveTimer::default();
        self.suggested_move = None;
        self.advice = None;
        self.hinted_ply = None;
        self.game_over = None;
    }

    pub fn current_turn(&self) -> Player {
        self.game.active_player()
    }

    pub fn is_human_turn(&self) -> bool {
        !self.game.is_over() && !self.game.active_seat().is_ai()
    }

    pub fn is_ai_turn(&self) -> bool {
        !self.game.is_over() && self.game.active_seat().is_ai()
    }

    pub fn is_ai_thinking(&self) -> bool {
        matches!(self.ai_state, AiState::Thinking { .. })
    }

    /// Attempt to play a human move at the given position
    pub fn try_place(&mut self, pos: Pos) -> Result<(), String> {
        if self.is_ai_thinking() && !self.is_human_turn() {
            return Err("AI is thinking".to_string());
        }
        let advice = self.advice.take();
        match self.game.submit_with_advice(pos, advice.as_ref()) {
            Ok(outcome) => {
                // A hint still being computed is for the previous position
                self.ai_state = AiState::Idle;
                self.after_move(outcome.trace.pos, outcome.status);
                Ok(())
            }
            Err(err) => {
                self.advice = advice;
                Err(err.to_string())
            }
        }
    }

    fn after_move(&mut self, pos: Pos, status: TerminalStatus) {
        self.last_move = Some(pos);
        self.suggested_move = None;
        self.advice = None;
        self.move_timer.stop();

        if status.is_terminal() {
            self.game_over = Some(GameOver {
                status,
                winning_run: winning_run(self.game.board()).map(|(_, run)| run),
            });
            self.scoreboard.record(&self.game.summary());
            log::info!("{} after {} plies", status, self.game.ply());
            return;
        }
        self.move_timer.start();
        self.message = None;
    }

    fn spawn_search(&mut self, request: Request, config: SearchConfig) {
        let mut board = self.game.board().clone();
        let (tx, rx) = channel();

        thread::spawn(move || {
            let mut engine = AIEngine::new(config);
            let result = engine.get_move_with_stats(&mut board);
            let _ = tx.send(result);
        });

        self.ai_state = AiState::Thinking {
            request,
            receiver: rx,
            start_time: Instant::now(),
        };
    }

    /// Start the AI seat's search
    pub fn start_ai_thinking(&mut self) {
        if !self.is_ai_turn() || self.is_ai_thinking() {
            return;
        }
        if let Some(config) = self.game.active_seat().search_config().cloned() {
            self.spawn_search(Request::Move, config);
        }
    }

    /// Ask the advisor for a suggestion for the human to move
    pub fn request_suggestion(&mut self) {
        if !self.is_human_turn() || self.is_ai_thinking() {
            return;
        }
        self.hinted_ply = Some(self.game.ply());
        let config = self.game.config().advisor.clone();
        self.spawn_search(Request::Hint, config);
    }

    /// Request a hint once per human turn when recommendations are on
    pub fn auto_recommend(&mut self) {
        if self.game.config().recommend && self.hinted_ply != Some(self.game.ply()) {
            self.request_suggestion();
        }
    }

    /// Check if AI has finished thinking
    pub fn check_ai_result(&mut self) {
        let (request, result, elapsed) = match &self.ai_state {
            AiState::Thinking {
                request,
                receiver,
                start_time,
            } => match receiver.try_recv() {
                Ok(result) => (*request, result, start_time.elapsed()),
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    self.ai_state = AiState::Idle;
                    self.message = Some("AI error".to_string());
                    return;
                }
            },
            AiState::Idle => return,
        };

        self.ai_state = AiState::Idle;
        self.move_timer.set_ai_time(elapsed);
        self.last_ai_result = Some(result.clone());

        match request {
            Request::Hint => {
                self.suggested_move = result.best_move;
                self.advice = Some(result);
            }
            Request::Move => match self.game.apply_ai_result(&result) {
                Ok(outcome) => self.after_move(outcome.trace.pos, outcome.status),
                Err(err) => self.message = Some(format!("AI move rejected: {err}")),
            },
        }
    }

    /// Get AI thinking elapsed time
    pub fn ai_thinking_elapsed(&self) -> Option<Duration> {
        match &self.ai_state {
            AiState::Thinking { start_time, .. } => Some(start_time.elapsed()),
            AiState::Idle => None,
        }
    }

    /// Time budget of the search in progress
    pub fn ai_budget(&self) -> Option<Duration> {
        match &self.ai_state {
            AiState::Thinking {
                request: Request::Hint,
                ..
            } => Some(self.game.config().advisor.time_budget),
            AiState::Thinking { .. } => self
                .game
                .active_seat()
                .search_config()
                .map(|config| config.time_budget),
            AiState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(Settings::default().to_config().validate().is_ok());
    }

    #[test]
    fn test_settings_build_seats() {
        let settings = Settings {
            n: 5,
            s: 4,
            blocks: 2,
            seats: [SeatKind::Ai, SeatKind::Human],
            algorithms: [Algorithm::Minimax, Algorithm::AlphaBeta],
            depths: [2, 3],
            exhaustive: [false, true],
            budget_secs: [1.0, 2.0],
            recommend: true,
        };
        let config = settings.to_config();
        assert_eq!(config.blocks.count(), 2);
        assert_eq!(
            config.seat(Player::A),
            &Seat::Ai(
                SearchConfig::new(Algorithm::Minimax)
                    .with_depth(2)
                    .with_time_budget(Duration::from_secs(1))
            )
        );
        assert_eq!(config.seat(Player::B), &Seat::Human);
        assert_eq!(config.advisor.max_depth, None);
    }

    #[test]
    fn test_human_move_updates_state() {
        let mut state = GameState::new(Settings::default()).unwrap();
        assert!(state.is_human_turn());
        state.try_place(Pos::new(1, 1)).unwrap();
        assert_eq!(state.last_move, Some(Pos::new(1, 1)));
        assert!(state.is_ai_turn());
        assert!(state.try_place(Pos::new(0, 0)).is_err());
    }

    #[test]
    fn test_invalid_settings_keep_game() {
        let mut state = GameState::new(Settings::default()).unwrap();
        state.settings.s = 7;
        state.new_game();
        assert!(state.message.is_some());
        assert_eq!(state.game.board().size(), 3);
    }

    #[test]
    fn test_ai_result_applied() {
        let mut state = GameState::new(Settings::default()).unwrap();
        state.try_place(Pos::new(0, 0)).unwrap();
        state.start_ai_thinking();
        assert!(state.is_ai_thinking());

        let deadline = Instant::now() + Duration::from_secs(30);
        while state.is_ai_thinking() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
            state.check_ai_result();
        }
        assert_eq!(state.game.ply(), 2);
        assert!(state.is_human_turn());
        assert!(state.last_ai_result.is_some());
    }
}
