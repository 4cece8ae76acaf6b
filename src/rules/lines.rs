//! Line enumeration over the four orientations
//!
//! A line is a straight sequence of cells that can hold a winning run:
//! every row and column, plus every diagonal and anti-diagonal with at
//! least `s` cells. Lines are described by a start cell, a step and a
//! length so enumerating them never allocates.

use crate::board::{Cell, Player, Pos};

/// Direction of a line on the rendered grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Fixed `y`, increasing `x`
    Horizontal,
    /// Fixed `x`, increasing `y`
    Vertical,
    /// Increasing `x` and `y`
    Diagonal,
    /// Increasing `x`, decreasing `y`
    AntiDiagonal,
}

impl Orientation {
    #[inline]
    fn step(self) -> (i32, i32) {
        match self {
            Orientation::Horizontal => (1, 0),
            Orientation::Vertical => (0, 1),
            Orientation::Diagonal => (1, 1),
            Orientation::AntiDiagonal => (1, -1),
        }
    }
}

/// One straight line of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub orientation: Orientation,
    pub start: Pos,
    pub len: usize,
}

impl Line {
    /// Cells of the line in scan order
    pub fn cells(self) -> impl Iterator<Item = Pos> {
        let (dx, dy) = self.orientation.step();
        let (x0, y0) = (i32::from(self.start.x), i32::from(self.start.y));
        (0..self.len as i32).map(move |k| Pos::new((x0 + dx * k) as u8, (y0 + dy * k) as u8))
    }
}

/// Every row of an `n` board
pub fn rows(n: usize) -> impl Iterator<Item = Line> {
    (0..n).map(move |y| Line {
        orientation: Orientation::Horizontal,
        start: Pos::new(0, y as u8),
        len: n,
    })
}

/// Every column of an `n` board
pub fn columns(n: usize) -> impl Iterator<Item = Line> {
    (0..n).map(move |x| Line {
        orientation: Orientation::Vertical,
        start: Pos::new(x as u8, 0),
        len: n,
    })
}

/// Diagonals with at least `s` cells, offsets `0..=n-s` on both sides of the principal one
pub fn diagonals(n: usize, s: usize) -> impl Iterator<Item = Line> {
    (0..=n - s).flat_map(move |d| {
        let below = Line {
            orientation: Orientation::Diagonal,
            start: Pos::new(d as u8, 0),
            len: n - d,
        };
        let above = (d > 0).then(|| Line {
            orientation: Orientation::Diagonal,
            start: Pos::new(0, d as u8),
            len: n - d,
        });
        std::iter::once(below).chain(above)
    })
}

/// Mirrored diagonals with at least `s` cells
pub fn anti_diagonals(n: usize, s: usize) -> impl Iterator<Item = Line> {
    (0..=n - s).flat_map(move |d| {
        let upper = Line {
            orientation: Orientation::AntiDiagonal,
            start: Pos::new(0, (n - 1 - d) as u8),
            len: n - d,
        };
        let lower = (d > 0).then(|| Line {
            orientation: Orientation::AntiDiagonal,
            start: Pos::new(d as u8, (n - 1) as u8),
            len: n - d,
        });
        std::iter::once(upper).chain(lower)
    })
}

/// All lines that can hold a run of `s`: rows, columns, then both diagonal families
pub fn all_lines(n: usize, s: usize) -> impl Iterator<Item = Line> {
    rows(n)
        .chain(columns(n))
        .chain(diagonals(n, s))
        .chain(anti_diagonals(n, s))
}

/// Running "previous mark / consecutive count" scan along one line.
///
/// Empty and blocked cells end the current run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunScan {
    owner: Option<Player>,
    len: usize,
}

impl RunScan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next cell, returning the length of the run it belongs to (0 if none)
    #[inline]
    pub fn push(&mut self, cell: Cell) -> usize {
        match cell.owner() {
            None => {
                self.owner = None;
                self.len = 0;
            }
            Some(player) if self.owner == Some(player) => self.len += 1,
            Some(player) => {
                self.owner = Some(player);
                self.len = 1;
            }
        }
        self.len
    }

    /// Owner of the run ending at the last pushed cell
    #[inline]
    pub fn owner(&self) -> Option<Player> {
        self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_counts() {
        // 3x3, s = 3: 3 rows, 3 columns, 1 diagonal, 1 anti-diagonal
        assert_eq!(all_lines(3, 3).count(), 8);
        // 5x5, s = 3: offsets 0..=2 give 1 + 2 + 2 diagonals per family
        assert_eq!(diagonals(5, 3).count(), 5);
        assert_eq!(anti_diagonals(5, 3).count(), 5);
    }

    #[test]
    fn test_diagonal_cells() {
        let cells: Vec<Pos> = diagonals(4, 3).nth(2).unwrap().cells().collect();
        // d = 1, above the principal diagonal
        assert_eq!(cells, vec![Pos::new(0, 1), Pos::new(1, 2), Pos::new(2, 3)]);
    }

    #[test]
    fn test_anti_diagonal_cells() {
        let principal: Vec<Pos> = anti_diagonals(3, 3).next().unwrap().cells().collect();
        assert_eq!(principal, vec![Pos::new(0, 2), Pos::new(1, 1), Pos::new(2, 0)]);

        let lower: Vec<Pos> = anti_diagonals(4, 3).nth(2).unwrap().cells().collect();
        assert_eq!(lower, vec![Pos::new(1, 3), Pos::new(2, 2), Pos::new(3, 1)]);
    }

    #[test]
    fn test_every_line_stays_on_board() {
        for n in 3..=10 {
            for s in 3..=n {
                for line in all_lines(n, s) {
                    assert!(line.len >= s);
                    for pos in line.cells() {
                        assert!((pos.x as usize) < n && (pos.y as usize) < n);
                    }
                }
            }
        }
    }

    #[test]
    fn test_run_scan_resets() {
        let mut scan = RunScan::new();
        assert_eq!(scan.push(Cell::PlayerA), 1);
        assert_eq!(scan.push(Cell::PlayerA), 2);
        assert_eq!(scan.push(Cell::Blocked), 0);
        assert_eq!(scan.push(Cell::PlayerA), 1);
        assert_eq!(scan.push(Cell::PlayerB), 1);
        assert_eq!(scan.owner(), Some(Player::B));
        assert_eq!(scan.push(Cell::Empty), 0);
        assert_eq!(scan.owner(), None);
    }
}
