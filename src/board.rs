//! Fixed-size grid of stones and line detection.

use std::fmt;

use crate::constants::{BOARDSIZE, DIRECTIONS, N, WIN_LENGTH};

/// One of the two players. Black is side 0 and moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Black,
    White,
}

impl Side {
    /// Side from its numeric index (0 = Black, 1 = White).
    pub fn from_index(index: usize) -> Option<Side> {
        match index {
            0 => Some(Side::Black),
            1 => Some(Side::White),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Black => 0,
            Side::White => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Black => write!(f, "black"),
            Side::White => write!(f, "white"),
        }
    }
}

/// A grid coordinate `(row, col)`, row 0 at the top.
pub type Point = (usize, usize);

/// Flat index of a point.
#[inline]
pub fn index_of((row, col): Point) -> usize {
    row * N + col
}

/// Point of a flat index.
#[inline]
pub fn point_of(idx: usize) -> Point {
    (idx / N, idx % N)
}

#[inline]
pub fn on_board((row, col): Point) -> bool {
    row < N && col < N
}

/// The center cell, used as the anchor on an empty board.
pub const fn center() -> Point {
    (N / 2, N / 2)
}

/// Tri-state cells: `None` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Side>; BOARDSIZE],
    stones: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [None; BOARDSIZE],
            stones: 0,
        }
    }

    /// Stone at a point; `None` for empty or off-board points.
    #[inline]
    pub fn get(&self, pt: Point) -> Option<Side> {
        if !on_board(pt) {
            return None;
        }
        self.cells[index_of(pt)]
    }

    #[inline]
    pub fn is_empty_at(&self, pt: Point) -> bool {
        on_board(pt) && self.cells[index_of(pt)].is_none()
    }

    /// Place a stone. The caller has checked the point is on the board and empty.
    pub(crate) fn place(&mut self, pt: Point, side: Side) {
        debug_assert!(self.is_empty_at(pt));
        self.cells[index_of(pt)] = Some(side);
        self.stones += 1;
    }

    pub fn stone_count(&self) -> usize {
        self.stones
    }

    pub fn is_full(&self) -> bool {
        self.stones == BOARDSIZE
    }

    /// All empty points in row-major order.
    pub fn empty_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| point_of(i))
    }

    /// All occupied points in row-major order.
    pub fn occupied_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_some())
            .map(|(i, _)| point_of(i))
    }

    /// Count consecutive stones of `side` starting next to `pt` and walking in `(dr, dc)`.
    fn run_from(&self, pt: Point, side: Side, (dr, dc): (isize, isize)) -> usize {
        let mut count = 0;
        let (mut r, mut c) = (pt.0 as isize + dr, pt.1 as isize + dc);
        while r >= 0 && c >= 0 && self.get((r as usize, c as usize)) == Some(side) {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }

    /// Length of the line of `side` stones through `pt` along `dir`, counting `pt` itself.
    pub fn line_through(&self, pt: Point, side: Side, dir: (isize, isize)) -> usize {
        1 + self.run_from(pt, side, dir) + self.run_from(pt, side, (-dir.0, -dir.1))
    }

    /// Whether a stone of `side` at `pt` completes a line of at least [`WIN_LENGTH`].
    ///
    /// Overlines count as wins.
    pub fn makes_five(&self, pt: Point, side: Side) -> bool {
        DIRECTIONS
            .iter()
            .any(|&dir| self.line_through(pt, side, dir) >= WIN_LENGTH)
    }

    /// Render the board from `side`'s perspective: own = +1, opponent = -1, empty = 0.
    pub fn perspective(&self, side: Side) -> Vec<f32> {
        self.cells
            .iter()
            .map(|c| match c {
                Some(s) if *s == side => 1.0,
                Some(_) => -1.0,
                None => 0.0,
            })
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..N {
            write!(f, "{} ", (b'A' + col as u8) as char)?;
        }
        writeln!(f)?;
        for row in 0..N {
            write!(f, "{:>2} ", N - row)?;
            for col in 0..N {
                let ch = match self.get((row, col)) {
                    Some(Side::Black) => 'X',
                    Some(Side::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
