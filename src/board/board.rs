//! Board structure with blocked cells and ply tracking

use rand::Rng;

use super::bitboard::Bitboard;
use super::{Cell, Player, Pos, MAX_SIZE, MIN_SIZE};
use crate::error::ConfigError;
use crate::rules::{terminal_status, TerminalStatus};

/// Game board: an n x n grid, a winning run length and the seat to move.
///
/// `play_count` includes the blocked cells placed before the first move, so a
/// board is full exactly when `play_count == n * n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    n: usize,
    s: usize,
    /// Marks of the first seat
    player_a: Bitboard,
    /// Marks of the second seat
    player_b: Bitboard,
    /// Permanently unplayable cells
    blocked: Bitboard,
    play_count: usize,
    active_player: Player,
}

/// Check board side and run length against the supported ranges.
pub fn validate_dimensions(n: usize, s: usize) -> Result<(), ConfigError> {
    if !(MIN_SIZE..=MAX_SIZE).contains(&n) {
        return Err(ConfigError::BoardSize { n });
    }
    if s < MIN_SIZE || s > n {
        return Err(ConfigError::RunLength { s, n });
    }
    Ok(())
}

/// Maximum number of blocked cells on a board of side `n`
#[inline]
pub fn max_blocks(n: usize) -> usize {
    2 * n
}

impl Board {
    /// Empty board without blocked cells. `PlayerA` moves first.
    pub fn new(n: usize, s: usize) -> Result<Self, ConfigError> {
        validate_dimensions(n, s)?;
        Ok(Self {
            n,
            s,
            player_a: Bitboard::new(),
            player_b: Bitboard::new(),
            blocked: Bitboard::new(),
            play_count: 0,
            active_player: Player::A,
        })
    }

    /// Board with explicitly listed blocked cells.
    ///
    /// # Example
    ///
    /// ```
    /// use line_em_up::{Board, Pos};
    ///
    /// let corners = [Pos::new(0, 0), Pos::new(0, 3), Pos::new(3, 0), Pos::new(3, 3)];
    /// let board = Board::with_blocks(4, 3, &corners).unwrap();
    /// assert!(!board.is_legal(0, 0));
    /// assert_eq!(board.play_count(), 4);
    /// ```
    pub fn with_blocks(n: usize, s: usize, blocks: &[Pos]) -> Result<Self, ConfigError> {
        let mut board = Self::new(n, s)?;
        if blocks.len() > max_blocks(n) {
            return Err(ConfigError::BlockCount {
                count: blocks.len(),
                max: max_blocks(n),
            });
        }
        for &pos in blocks {
            if pos.x as usize >= n || pos.y as usize >= n {
                return Err(ConfigError::BlockOutOfBounds {
                    x: i32::from(pos.x),
                    y: i32::from(pos.y),
                    n,
                });
            }
            let idx = pos.to_index(n);
            if board.blocked.get(idx) {
                return Err(ConfigError::DuplicateBlock { pos });
            }
            board.blocked.set(idx);
            board.play_count += 1;
        }
        Ok(board)
    }

    /// Board with `count` blocked cells sampled uniformly without replacement.
    ///
    /// Sampling retries until it lands on a cell that is not blocked yet.
    pub fn with_random_blocks<R: Rng + ?Sized>(
        n: usize,
        s: usize,
        count: usize,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let mut board = Self::new(n, s)?;
        if count > max_blocks(n) {
            return Err(ConfigError::BlockCount {
                count,
                max: max_blocks(n),
            });
        }
        let mut placed = 0;
        while placed < count {
            let x = rng.gen_range(0..n);
            let y = rng.gen_range(0..n);
            let idx = x * n + y;
            if !board.blocked.get(idx) {
                board.blocked.set(idx);
                board.play_count += 1;
                placed += 1;
            }
        }
        Ok(board)
    }

    /// Board side `n`
    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    /// Run length `s` needed to win
    #[inline]
    pub fn run_length(&self) -> usize {
        self.s
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.n * self.n
    }

    /// Moves made so far, blocked cells included
    #[inline]
    pub fn play_count(&self) -> usize {
        self.play_count
    }

    #[inline]
    pub fn blocked_count(&self) -> usize {
        self.blocked.count() as usize
    }

    /// Marks placed by the two seats
    #[inline]
    pub fn marks_played(&self) -> usize {
        self.play_count - self.blocked_count()
    }

    #[inline]
    pub fn empty_count(&self) -> usize {
        self.cell_count() - self.play_count
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.play_count >= self.cell_count()
    }

    /// Seat whose real turn it is. Speculative search placements never change it.
    #[inline]
    pub fn active_player(&self) -> Player {
        self.active_player
    }

    pub fn set_active_player(&mut self, player: Player) {
        self.active_player = player;
    }

    /// Hand the turn to the other seat and return it
    pub fn switch_player(&mut self) -> Player {
        self.active_player = self.active_player.opponent();
        self.active_player
    }

    /// Get cell state at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Cell {
        let idx = pos.to_index(self.n);
        if self.player_a.get(idx) {
            Cell::PlayerA
        } else if self.player_b.get(idx) {
            Cell::PlayerB
        } else if self.blocked.get(idx) {
            Cell::Blocked
        } else {
            Cell::Empty
        }
    }

    /// True iff `(x, y)` is on the board and the cell is empty. Never panics.
    #[inline]
    pub fn is_legal(&self, x: i32, y: i32) -> bool {
        Pos::is_valid(x, y, self.n) && self.is_empty(Pos::new(x as u8, y as u8))
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.occupied().get(pos.to_index(self.n))
    }

    /// Place a mark. The caller must have checked `is_legal`.
    #[inline]
    pub fn place(&mut self, pos: Pos, player: Player) {
        debug_assert!(
            self.is_legal(i32::from(pos.x), i32::from(pos.y)),
            "place on illegal cell {pos}"
        );
        let idx = pos.to_index(self.n);
        match player {
            Player::A => self.player_a.set(idx),
            Player::B => self.player_b.set(idx),
        }
        self.play_count += 1;
    }

    /// Undo a speculative `place`.
    #[inline]
    pub fn clear(&mut self, pos: Pos) {
        debug_assert!(
            self.get(pos).owner().is_some(),
            "clear on a cell without a mark {pos}"
        );
        let idx = pos.to_index(self.n);
        self.player_a.clear(idx);
        self.player_b.clear(idx);
        self.play_count -= 1;
    }

    /// Every empty cell in x-major order
    pub fn legal_moves(&self) -> Vec<Pos> {
        self.empty_cells()
            .iter_ones()
            .map(|idx| Pos::from_index(idx, self.n))
            .collect()
    }

    /// Bitboard of cells holding a mark or a block
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.player_a.union(self.player_b).union(self.blocked)
    }

    #[inline]
    pub fn empty_cells(&self) -> Bitboard {
        Bitboard::full(self.cell_count()).without(self.occupied())
    }

    /// Marks of one seat
    #[inline]
    pub fn stones(&self, player: Player) -> &Bitboard {
        match player {
            Player::A => &self.player_a,
            Player::B => &self.player_b,
        }
    }

    pub fn blocked_cells(&self) -> Vec<Pos> {
        self.blocked
            .iter_ones()
            .map(|idx| Pos::from_index(idx, self.n))
            .collect()
    }

    /// Win / tie / in-progress classification of the current grid
    #[inline]
    pub fn terminal_status(&self) -> TerminalStatus {
        terminal_status(self)
    }
}

impl std::fmt::Display for Board {
    /// Rows by `y`, columns by `x`, one glyph per cell
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.n {
            for x in 0..self.n {
                write!(f, "{} ", self.get(Pos::new(x as u8, y as u8)).glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
