use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;
use std::str::FromStr;

use crate::data::{Pos, MAX_SIZE};
use crate::level::{Block, Level};
use crate::map::Walls;
use crate::vec2d::Vec2d;

pub const DEFAULT_WALL_CHAR: char = 'X';
pub const DEFAULT_EMPTY_CHAR: char = '.';
pub const DEFAULT_ROW_SEP: char = '/';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserErr {
    Empty,
    Ragged { row: usize },
    TooLarge,
    TooManyColors,
}

impl Display for ParserErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ParserErr::Empty => write!(f, "Empty layout"),
            ParserErr::Ragged { row } => write!(f, "Row {} has a different length", row),
            ParserErr::TooLarge => write!(f, "Layout larger than {} rows/columns", MAX_SIZE),
            ParserErr::TooManyColors => write!(f, "More than {} distinct colors", MAX_SIZE),
        }
    }
}

impl Error for ParserErr {}

/// Builds a level from a compact rectangular layout.
///
/// `wall_char` cells are walls, `empty_char` cells are empty, any other
/// character is a block; colors get ids in order of first appearance, so
/// distinct characters merge iff they are equal.
pub fn parse(
    layout: &str,
    wall_char: char,
    empty_char: char,
    row_sep: char,
) -> Result<Level, ParserErr> {
    let layout = layout.trim();
    if layout.is_empty() {
        return Err(ParserErr::Empty);
    }

    let rows: Vec<Vec<char>> = layout
        .split(row_sep)
        .map(|row| row.chars().collect())
        .collect();
    let width = rows[0].len();
    if width == 0 {
        return Err(ParserErr::Empty);
    }
    if rows.len() > MAX_SIZE || width > MAX_SIZE {
        return Err(ParserErr::TooLarge);
    }
    for (r, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(ParserErr::Ragged { row: r });
        }
    }

    let mut grid = Vec2d::new_filled(rows.len() as u8, width as u8, false);
    let mut assigned: Vec<char> = Vec::new();
    let mut blocks = Vec::new();

    for (r, row) in rows.iter().enumerate() {
        for (c, &ch) in row.iter().enumerate() {
            let pos = Pos::new(r as u8, c as u8);
            if ch == wall_char {
                grid[pos] = true;
            } else if ch != empty_char {
                let color = match assigned.iter().position(|&a| a == ch) {
                    Some(i) => i + 1,
                    None => {
                        if assigned.len() >= MAX_SIZE {
                            return Err(ParserErr::TooManyColors);
                        }
                        assigned.push(ch);
                        assigned.len()
                    }
                };
                blocks.push(Block {
                    pos,
                    color: color as u8,
                });
            }
        }
    }

    Ok(Level::new(Rc::new(Walls::new(grid)), blocks))
}

impl FromStr for Level {
    type Err = ParserErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s, DEFAULT_WALL_CHAR, DEFAULT_EMPTY_CHAR, DEFAULT_ROW_SEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_empty() {
        assert_eq!("".parse::<Level>().unwrap_err(), ParserErr::Empty);
        assert_eq!("  \n".parse::<Level>().unwrap_err(), ParserErr::Empty);
    }

    #[test]
    fn fail_ragged() {
        assert_eq!(
            "ab/abc".parse::<Level>().unwrap_err(),
            ParserErr::Ragged { row: 1 }
        );
    }

    #[test]
    fn colors_in_first_seen_order() {
        let level: Level = "b.a.b".parse().unwrap();
        let colors: Vec<u8> = level.blocks().iter().map(|b| b.color).collect();
        // b was seen first so it gets id 1
        assert_eq!(colors, vec![1, 2, 1]);
    }

    #[test]
    fn walls_and_blocks_placed() {
        let level: Level = "Xa./X.a".parse().unwrap();
        assert_eq!(level.blocks().len(), 2);
        assert!(level.walls().is_wall(0, 0));
        assert!(level.walls().is_wall(1, 0));
        assert!(!level.walls().is_wall(0, 1));
    }

    #[test]
    fn display_round_trip() {
        let level: Level = "Xa./X.a".parse().unwrap();
        assert_eq!(level.to_string(), "Xa.\nX.a");

        let fixture: Level = "XXXX.gXX/XXXh.XXX/a.eg.e../X.XXXh.a".parse().unwrap();
        // colors render in first-seen order: g->a, h->b, a->c, e->d
        assert_eq!(
            fixture.to_string(),
            "XXXX.aXX\nXXXb.XXX\nc.da.d..\nX.XXXb.c"
        );
    }

    #[test]
    fn custom_chars() {
        let level = parse("#o |# o", '#', ' ', '|').unwrap();
        assert_eq!(level.blocks().len(), 2);
        assert_eq!(level.blocks()[0].color, level.blocks()[1].color);
    }
}
