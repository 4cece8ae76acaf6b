//! Terminal-state detection for line 'em up
//!
//! A seat wins as soon as it owns an uninterrupted run of `s` marks along a
//! row, a column or any diagonal. Blocked and empty cells break runs. A full
//! board without such a run is a tie.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Player, Pos};

use super::lines::{all_lines, Line, RunScan};

/// Classification of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalStatus {
    InProgress,
    Win(Player),
    Tie,
}

impl TerminalStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, TerminalStatus::InProgress)
    }

    #[inline]
    pub fn winner(self) -> Option<Player> {
        match self {
            TerminalStatus::Win(player) => Some(player),
            TerminalStatus::InProgress | TerminalStatus::Tie => None,
        }
    }
}

impl std::fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalStatus::InProgress => write!(f, "in progress"),
            TerminalStatus::Win(player) => write!(f, "The winner is {player} !"),
            TerminalStatus::Tie => write!(f, "It's a tie!"),
        }
    }
}

/// Scan every line for the first run of length `s`.
///
/// Returns the owner, the line and the index of the cell completing the run.
fn find_run(board: &Board) -> Option<(Player, Line, usize)> {
    let s = board.run_length();
    for line in all_lines(board.size(), s) {
        let mut scan = RunScan::new();
        for (k, pos) in line.cells().enumerate() {
            if scan.push(board.get(pos)) == s {
                return scan.owner().map(|owner| (owner, line, k));
            }
        }
    }
    None
}

/// Check for a winner or a tie.
///
/// # Example
///
/// ```
/// use line_em_up::{Board, Player, Pos};
/// use line_em_up::rules::TerminalStatus;
///
/// let mut board = Board::new(3, 3).unwrap();
/// for i in 0..3 {
///     board.place(Pos::new(i, i), Player::A);
/// }
/// assert_eq!(board.terminal_status(), TerminalStatus::Win(Player::A));
/// ```
pub fn terminal_status(board: &Board) -> TerminalStatus {
    if let Some((owner, _, _)) = find_run(board) {
        return TerminalStatus::Win(owner);
    }
    if board.is_full() {
        TerminalStatus::Tie
    } else {
        TerminalStatus::InProgress
    }
}

/// Cells of the first winning run, for highlighting
pub fn winning_run(board: &Board) -> Option<(Player, Vec<Pos>)> {
    let s = board.run_length();
    find_run(board).map(|(owner, line, end)| {
        let cells = line.cells().skip(end + 1 - s).take(s).collect();
        (owner, cells)
    })
}
