//! Heuristic evaluation used at the search cutoff depth
//!
//! Both heuristics count marks with a sign (+1 for `A`, -1 for `B`) and cube
//! each aggregate term, which keeps the sign and amplifies a lead:
//! - [`RowColumnHeuristic`]: `row_term^3 + col_term^3`
//! - [`LineHeuristic`]: adds `diag_term^3` over all diagonal lines, where each
//!   mark is weighted by the length of the run it extends
//!
//! [`TurnKeyedEvaluator`] picks one of them from the seat whose real turn it
//! is when the search reaches depth zero.

use crate::board::{Board, Player, Pos};
use crate::rules::{anti_diagonals, columns, diagonals, rows, Line, RunScan};

/// Scores a non-terminal board for the depth-limited search
pub trait Evaluator {
    fn evaluate(&self, board: &Board) -> f64;
}

/// Sum of signed cell values along a set of lines
fn signed_sum(board: &Board, lines: impl Iterator<Item = Line>) -> i64 {
    lines
        .flat_map(Line::cells)
        .map(|pos: Pos| board.get(pos).sign())
        .sum()
}

/// Signed run weights along a set of lines.
///
/// Runs are cut at empty and blocked cells exactly like the win scan.
fn run_weighted_sum(board: &Board, lines: impl Iterator<Item = Line>) -> i64 {
    let mut total = 0;
    for line in lines {
        let mut scan = RunScan::new();
        for pos in line.cells() {
            let cell = board.get(pos);
            let run = scan.push(cell) as i64;
            total += cell.sign() * run;
        }
    }
    total
}

#[inline]
fn cube(term: i64) -> f64 {
    term.pow(3) as f64
}

/// Row and column terms only; diagonals are not scored.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowColumnHeuristic;

impl RowColumnHeuristic {
    /// The two aggregate terms before cubing
    pub fn terms(board: &Board) -> (i64, i64) {
        let n = board.size();
        (signed_sum(board, rows(n)), signed_sum(board, columns(n)))
    }
}

impl Evaluator for RowColumnHeuristic {
    fn evaluate(&self, board: &Board) -> f64 {
        let (row_term, col_term) = Self::terms(board);
        cube(row_term) + cube(col_term)
    }
}

/// Row, column and diagonal terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineHeuristic;

impl LineHeuristic {
    /// Diagonal term before cubing
    pub fn diagonal_term(board: &Board) -> i64 {
        let (n, s) = (board.size(), board.run_length());
        run_weighted_sum(board, diagonals(n, s).chain(anti_diagonals(n, s)))
    }
}

impl Evaluator for LineHeuristic {
    fn evaluate(&self, board: &Board) -> f64 {
        let (row_term, col_term) = RowColumnHeuristic::terms(board);
        cube(row_term) + cube(col_term) + cube(Self::diagonal_term(board))
    }
}

/// Chooses the heuristic from `board.active_player()` at cutoff:
/// `A` uses [`RowColumnHeuristic`], `B` uses [`LineHeuristic`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnKeyedEvaluator;

impl Evaluator for TurnKeyedEvaluator {
    fn evaluate(&self, board: &Board) -> f64 {
        match board.active_player() {
            Player::A => RowColumnHeuristic.evaluate(board),
            Player::B => LineHeuristic.evaluate(board),
        }
    }
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn evaluate(&self, board: &Board) -> f64 {
        (**self).evaluate(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_scores_zero() {
        let board = Board::new(5, 3).unwrap();
        assert_eq!(RowColumnHeuristic.evaluate(&board), 0.0);
        assert_eq!(LineHeuristic.evaluate(&board), 0.0);
    }

    #[test]
    fn test_row_column_terms_match() {
        let mut board = Board::new(4, 3).unwrap();
        board.place(Pos::new(0, 0), Player::A);
        board.place(Pos::new(1, 2), Player::A);
        board.place(Pos::new(3, 3), Player::B);
        assert_eq!(RowColumnHeuristic::terms(&board), (1, 1));
        // 1^3 + 1^3
        assert_eq!(RowColumnHeuristic.evaluate(&board), 2.0);
    }

    #[test]
    fn test_cubing_keeps_sign() {
        let mut board = Board::new(4, 3).unwrap();
        board.place(Pos::new(0, 0), Player::B);
        board.place(Pos::new(2, 1), Player::B);
        // (-2)^3 + (-2)^3
        assert_eq!(RowColumnHeuristic.evaluate(&board), -16.0);
    }

    #[test]
    fn test_blocked_cells_are_neutral() {
        let board = Board::with_blocks(4, 3, &[Pos::new(1, 1), Pos::new(2, 2)]).unwrap();
        assert_eq!(LineHeuristic.evaluate(&board), 0.0);
    }

    #[test]
    fn test_diagonal_run_weighting() {
        let mut board = Board::new(3, 3).unwrap();
        board.place(Pos::new(0, 0), Player::A);
        board.place(Pos::new(1, 1), Player::A);
        // Principal diagonal: 1 + 2; anti-diagonal through (1, 1): 1
        assert_eq!(LineHeuristic::diagonal_term(&board), 4);
        // rows 2, columns 2, diagonals 4
        assert_eq!(LineHeuristic.evaluate(&board), 8.0 + 8.0 + 64.0);
    }

    #[test]
    fn test_blocked_cell_interrupts_diagonal_run() {
        let mut board = Board::with_blocks(4, 3, &[Pos::new(1, 1)]).unwrap();
        board.place(Pos::new(0, 0), Player::A);
        board.place(Pos::new(2, 2), Player::A);
        // Principal diagonal: 1 + 1 across the block; (2, 2) also lies on an anti-diagonal
        assert_eq!(LineHeuristic::diagonal_term(&board), 3);
    }

    #[test]
    fn test_turn_keyed_selection() {
        let mut board = Board::new(3, 3).unwrap();
        board.place(Pos::new(0, 0), Player::A);
        board.place(Pos::new(1, 1), Player::A);

        board.set_active_player(Player::A);
        assert_eq!(TurnKeyedEvaluator.evaluate(&board), RowColumnHeuristic.evaluate(&board));

        board.set_active_player(Player::B);
        assert_eq!(TurnKeyedEvaluator.evaluate(&board), LineHeuristic.evaluate(&board));
    }
}
