// Opt in to warnings about new 2018 idioms
#![warn(rust_2018_idioms)]
// Additional warnings that are allow by default (`rustc -W help`)
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unused)]

pub mod data;
pub mod level;
pub mod map;
pub mod moves;
pub mod parser;
pub mod solver;

mod fs;
mod vec2d;

use std::error::Error;
use std::path::Path;

use crate::level::Level;
use crate::solver::SolverOk;

pub trait LoadLevel {
    fn load_level(&self) -> Result<Level, Box<dyn Error>>;
}

impl<P: AsRef<Path>> LoadLevel for P {
    fn load_level(&self) -> Result<Level, Box<dyn Error>> {
        let text = fs::read_file(self)?;
        let level = text.parse::<Level>()?;
        Ok(level)
    }
}

pub trait Solve {
    fn solve(&self, bound: Option<u16>, print_status: bool) -> SolverOk;
}
