use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::data::{Dir, Pos};
use crate::map::Walls;
use crate::moves::Move;
use crate::vec2d::Vec2d;

/// One colored tile on one cell. Colors are small positive ids assigned by
/// the parser in first-seen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Block {
    pub pos: Pos,
    pub color: u8,
}

/// An immutable puzzle state: a sorted block set over shared walls.
///
/// Identity (`Eq`/`Hash`) depends on the block set only - the walls are
/// invariant for the whole search so two levels with the same blocks are the
/// same search node no matter how they were reached.
#[derive(Clone)]
pub struct Level {
    walls: Rc<Walls>,
    blocks: Vec<Block>,
}

impl Level {
    pub(crate) fn new(walls: Rc<Walls>, mut blocks: Vec<Block>) -> Self {
        // sort so equal block sets compare and hash equal
        blocks.sort();
        for pair in blocks.windows(2) {
            assert!(pair[0].pos != pair[1].pos, "two blocks on {:?}", pair[0].pos);
        }
        for b in &blocks {
            assert!(
                !walls.is_wall(i16::from(b.pos.r), i16::from(b.pos.c)),
                "block on wall at {:?}",
                b.pos
            );
        }
        Level { walls, blocks }
    }

    pub fn walls(&self) -> &Walls {
        &self.walls
    }

    pub fn walls_rc(&self) -> Rc<Walls> {
        Rc::clone(&self.walls)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_win(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Dense color grid (0 = empty), the working view for physics and rendering.
    fn to_grid(&self) -> Vec2d<u8> {
        let mut grid = self.walls.scratchpad(0u8);
        for b in &self.blocks {
            grid[b.pos] = b.color;
        }
        grid
    }

    /// Every legal single shift: a block may move left or right into a cell
    /// that is neither wall nor occupied. Blocks are visited in `(row, col)`
    /// order so the result is deterministic.
    pub fn possible_moves(&self) -> Vec<Move> {
        let grid = self.to_grid();
        let mut moves = Vec::new();
        for b in &self.blocks {
            for &dir in &[Dir::Left, Dir::Right] {
                let mov = Move::new(b.pos, dir);
                let (r, c) = mov.dest();
                if !self.walls.is_wall(r, c) && grid[Pos::new(r as u8, c as u8)] == 0 {
                    moves.push(mov);
                }
            }
        }
        moves
    }

    /// Applies one shift and runs the fall+merge physics to a fixed point,
    /// producing a brand-new level.
    ///
    /// The move must be legal (a block on its source cell, destination free) -
    /// anything else is a caller bug and panics. The search engine only ever
    /// passes moves obtained from [`possible_moves`](Level::possible_moves).
    pub fn apply_move(&self, mov: Move) -> Level {
        let mut grid = self.to_grid();

        let color = grid[mov.pos];
        assert!(color != 0, "no block at {:?}", mov.pos);
        let (r, c) = mov.dest();
        assert!(!self.walls.is_wall(r, c), "move {} into a wall", mov);
        let dest = Pos::new(r as u8, c as u8);
        assert!(grid[dest] == 0, "move {} into an occupied cell", mov);

        grid[mov.pos] = 0;
        grid[dest] = color;
        settle(&self.walls, &mut grid);

        let mut blocks = Vec::new();
        for r in 0..grid.rows() {
            for c in 0..grid.cols() {
                let pos = Pos::new(r, c);
                if grid[pos] != 0 {
                    blocks.push(Block {
                        pos,
                        color: grid[pos],
                    });
                }
            }
        }
        // row-major collection order matches Block's ordering
        Level {
            walls: Rc::clone(&self.walls),
            blocks,
        }
    }
}

/// Alternates fall and merge until neither changes anything.
///
/// A merge that removes nothing means the preceding fall already left the
/// grid settled, so the loop stops there. Chain reactions (merge opens a
/// gap, blocks drop, new adjacencies merge) run as many rounds as needed.
fn settle(walls: &Walls, grid: &mut Vec2d<u8>) {
    loop {
        fall(walls, grid);
        if !merge(grid) {
            break;
        }
    }
}

/// Drops all blocks in every column run against the run's bottom, keeping
/// their relative order. Runs are disjoint so one pass fully settles falls.
/// Returns true if nothing moved.
fn fall(walls: &Walls, grid: &mut Vec2d<u8>) -> bool {
    let mut settled = true;
    for run in walls.runs() {
        let mut stack = Vec::new();
        for r in run.row_start..run.row_end {
            let cell = grid[Pos::new(r, run.col)];
            if cell != 0 {
                stack.push(cell);
            }
        }

        let first_filled = run.row_end - stack.len() as u8;
        for r in run.row_start..run.row_end {
            let want = if r < first_filled {
                0
            } else {
                stack[usize::from(r - first_filled)]
            };
            let pos = Pos::new(r, run.col);
            if grid[pos] != want {
                grid[pos] = want;
                settled = false;
            }
        }
    }
    settled
}

/// Removes every block that touches a same-color block at Manhattan distance
/// 1. Pairs are collected from a snapshot and removed at once, so the result
/// does not depend on scan order. Returns true if anything was removed.
fn merge(grid: &mut Vec2d<u8>) -> bool {
    let mut doomed = grid.create_scratchpad(false);
    let mut any = false;

    for r in 0..grid.rows() {
        for c in 0..grid.cols() {
            let pos = Pos::new(r, c);
            let color = grid[pos];
            if color == 0 {
                continue;
            }
            if c + 1 < grid.cols() {
                let right = Pos::new(r, c + 1);
                if grid[right] == color {
                    doomed[pos] = true;
                    doomed[right] = true;
                    any = true;
                }
            }
            if r + 1 < grid.rows() {
                let down = Pos::new(r + 1, c);
                if grid[down] == color {
                    doomed[pos] = true;
                    doomed[down] = true;
                    any = true;
                }
            }
        }
    }

    if any {
        for r in 0..grid.rows() {
            for c in 0..grid.cols() {
                let pos = Pos::new(r, c);
                if doomed[pos] {
                    grid[pos] = 0;
                }
            }
        }
    }
    any
}

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        // exact structural equality - the hash alone is not trusted for dedup
        self.blocks == other.blocks
    }
}

impl Eq for Level {}

impl Hash for Level {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.blocks.hash(state);
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let grid = self.to_grid();
        for r in 0..grid.rows() {
            if r > 0 {
                writeln!(f)?;
            }
            for c in 0..grid.cols() {
                let color = grid[Pos::new(r, c)];
                let ch = if self.walls.is_wall(i16::from(r), i16::from(c)) {
                    'X'
                } else if color == 0 {
                    '.'
                } else if color <= 26 {
                    (b'a' + color - 1) as char
                } else {
                    '?'
                };
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}

impl Debug for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
