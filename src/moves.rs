use std::fmt::{self, Debug, Display, Formatter};

use crate::data::{Dir, Pos};

/// One block shift: the block at `pos` moves one column in `dir`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub pos: Pos,
    pub dir: Dir,
}

impl Move {
    pub fn new(pos: Pos, dir: Dir) -> Self {
        Move { pos, dir }
    }

    /// Destination cell in signed coordinates - may lie outside the grid.
    pub(crate) fn dest(self) -> (i16, i16) {
        (i16::from(self.pos.r), i16::from(self.pos.c) + self.dir.d_col())
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pos.r, self.pos.c, self.dir)
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// An ordered solution, rendered pipe-joined (`00>|12<|...`).
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Moves(Vec<Move>);

impl Moves {
    pub fn new() -> Self {
        Moves(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, mov: Move) {
        self.0.push(mov);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.0.iter()
    }
}

impl IntoIterator for Moves {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Moves {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, mov) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{}", mov)?;
        }
        Ok(())
    }
}

impl Debug for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_moves() {
        let mut moves = Moves::new();
        assert_eq!(moves.to_string(), "");

        moves.push(Move::new(Pos::new(0, 0), Dir::Right));
        moves.push(Move::new(Pos::new(1, 2), Dir::Left));
        moves.push(Move::new(Pos::new(3, 7), Dir::Right));
        assert_eq!(moves.to_string(), "00>|12<|37>");
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn iterating() {
        let mut moves = Moves::new();
        moves.push(Move::new(Pos::new(0, 1), Dir::Left));
        moves.push(Move::new(Pos::new(0, 2), Dir::Right));

        let mut v = Vec::new();
        for &m in &moves {
            v.push(m);
        }
        for m in moves.clone() {
            v.push(m);
        }
        assert_eq!(v.len(), 4);
        assert_eq!(v[0], v[2]);
        assert_eq!(v[1], v[3]);
    }
}
