use std::fmt::{self, Display, Formatter};

/// Grids are indexed by u8 so anything larger must be rejected while parsing.
pub const MAX_SIZE: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub r: u8,
    pub c: u8,
}

impl Pos {
    pub fn new(r: u8, c: u8) -> Pos {
        Pos { r, c }
    }
}

/// Blocks only ever shift sideways - gravity handles the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Left,
    Right,
}

impl Dir {
    pub(crate) fn d_col(self) -> i16 {
        match self {
            Dir::Left => -1,
            Dir::Right => 1,
        }
    }
}

impl Display for Dir {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Dir::Left => write!(f, "<"),
            Dir::Right => write!(f, ">"),
        }
    }
}
