use std::fmt::{self, Debug, Formatter};

use crate::data::Pos;
use crate::vec2d::Vec2d;

/// A maximal vertical span of non-wall cells in one column, `row_end` exclusive.
///
/// Gravity acts on each run independently. Runs shorter than 2 cells can't
/// host a fall and are not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRun {
    pub col: u8,
    pub row_start: u8,
    pub row_end: u8,
}

/// The static geometry of a puzzle: wall grid plus precomputed column runs.
///
/// Built once per puzzle and shared by reference across every state derived
/// from it - never mutated afterwards.
pub struct Walls {
    grid: Vec2d<bool>,
    runs: Vec<ColumnRun>,
}

impl Walls {
    pub(crate) fn new(grid: Vec2d<bool>) -> Self {
        let rows = grid.rows();
        let cols = grid.cols();

        let mut runs = Vec::new();
        for c in 0..cols {
            let mut start: Option<u8> = None;
            // one row past the bottom counts as wall so runs touching the
            // floor get closed off
            for r in 0..=rows {
                let wall = r == rows || grid[Pos::new(r, c)];
                match (wall, start) {
                    (true, Some(s)) => {
                        if r - s >= 2 {
                            runs.push(ColumnRun {
                                col: c,
                                row_start: s,
                                row_end: r,
                            });
                        }
                        start = None;
                    }
                    (false, None) => start = Some(r),
                    _ => {}
                }
            }
        }

        Walls { grid, runs }
    }

    pub fn rows(&self) -> u8 {
        self.grid.rows()
    }

    pub fn cols(&self) -> u8 {
        self.grid.cols()
    }

    /// Out of bounds counts as wall - the boundary is an implicit wall.
    pub fn is_wall(&self, r: i16, c: i16) -> bool {
        if r < 0 || c < 0 || r >= i16::from(self.rows()) || c >= i16::from(self.cols()) {
            return true;
        }
        self.grid[Pos::new(r as u8, c as u8)]
    }

    pub fn runs(&self) -> &[ColumnRun] {
        &self.runs
    }

    pub(crate) fn scratchpad<U: Copy>(&self, default: U) -> Vec2d<U> {
        self.grid.create_scratchpad(default)
    }
}

impl Debug for Walls {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.grid)
    }
}
