use std::fs::File;
use std::io::{self, Write};
use std::process;

use clap::{App, Arg, ArgMatches};

use vexed_solver::parser::{self, DEFAULT_EMPTY_CHAR, DEFAULT_ROW_SEP, DEFAULT_WALL_CHAR};
use vexed_solver::Solve;

fn main() {
    env_logger::init();

    let matches = App::new("vexed-solver")
        .about("Solves gravity block-merge puzzles")
        .arg(
            Arg::with_name("bound")
                .short("-b")
                .long("--bound")
                .takes_value(true)
                .help("only accept solutions of at most this many moves (branch and bound)"),
        )
        .arg(
            Arg::with_name("batch")
                .long("--batch")
                .help("treat the input as `name;layout;target` lines and write one CSV row per level"),
        )
        .arg(
            Arg::with_name("out")
                .long("--out")
                .takes_value(true)
                .help("write batch results to this file instead of stdout"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("-q")
                .long("--quiet")
                .help("don't print search progress"),
        )
        .arg(
            Arg::with_name("wall-char")
                .long("--wall-char")
                .takes_value(true)
                .help("layout character for walls (default X)"),
        )
        .arg(
            Arg::with_name("empty-char")
                .long("--empty-char")
                .takes_value(true)
                .help("layout character for empty cells (default .)"),
        )
        .arg(
            Arg::with_name("row-sep")
                .long("--row-sep")
                .takes_value(true)
                .help("layout character separating rows (default /)"),
        )
        .arg(Arg::with_name("file").required(true))
        .get_matches();

    let path = matches.value_of("file").unwrap();
    let quiet = matches.is_present("quiet");
    let bound = matches.value_of("bound").map(|s| {
        s.parse::<u16>().unwrap_or_else(|_| {
            eprintln!("--bound must be a non-negative number, got {}", s);
            process::exit(1);
        })
    });
    let wall_char = char_arg(&matches, "wall-char", DEFAULT_WALL_CHAR);
    let empty_char = char_arg(&matches, "empty-char", DEFAULT_EMPTY_CHAR);
    let row_sep = char_arg(&matches, "row-sep", DEFAULT_ROW_SEP);

    let text = std::fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("Can't read file {}: {}", path, err);
        process::exit(1);
    });

    if matches.is_present("batch") {
        run_batch(&matches, &text, wall_char, empty_char, row_sep, quiet);
    } else {
        run_single(&text, bound, wall_char, empty_char, row_sep, quiet);
    }
}

fn run_single(
    text: &str,
    bound: Option<u16>,
    wall_char: char,
    empty_char: char,
    row_sep: char,
    quiet: bool,
) {
    let level = parser::parse(text, wall_char, empty_char, row_sep).unwrap_or_else(|err| {
        eprintln!("Failed to parse: {}", err);
        process::exit(1);
    });

    println!("{}", level);
    println!();

    let solved = level.solve(bound, !quiet);
    match solved.moves {
        Some(ref moves) => {
            println!("Solution: {}", moves);
            println!("Moves: {}", moves.len());
        }
        None => println!("No solution"),
    }
    print!("{}", solved.stats);
}

/// One `name;layout;target` line per level; one CSV row per level, flushed
/// as soon as it is known so partial results survive an abort.
fn run_batch(
    matches: &ArgMatches<'_>,
    text: &str,
    wall_char: char,
    empty_char: char,
    row_sep: char,
    quiet: bool,
) {
    let mut out: Box<dyn Write> = match matches.value_of("out") {
        Some(path) => Box::new(File::create(path).unwrap_or_else(|err| {
            eprintln!("Can't create file {}: {}", path, err);
            process::exit(1);
        })),
        None => Box::new(io::stdout()),
    };

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.splitn(3, ';');
        let (name, layout, target) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(layout), Some(target)) => (name, layout, target),
            _ => {
                eprintln!("Line {}: expected `name;layout;target`", i + 1);
                process::exit(1);
            }
        };
        let target = target.trim().parse::<u16>().unwrap_or_else(|_| {
            eprintln!("Line {}: target must be a number, got {}", i + 1, target);
            process::exit(1);
        });
        let level = parser::parse(layout, wall_char, empty_char, row_sep).unwrap_or_else(|err| {
            eprintln!("Line {}: failed to parse: {}", i + 1, err);
            process::exit(1);
        });

        let solved = level.solve(Some(target), !quiet);
        let row = match solved.moves {
            Some(ref moves) => format!("{},{},{},{}\n", name, target, moves.len(), moves),
            None => format!("{},{},-1,No solution\n", name, target),
        };
        out.write_all(row.as_bytes())
            .and_then(|_| out.flush())
            .unwrap_or_else(|err| {
                eprintln!("Can't write results: {}", err);
                process::exit(1);
            });
    }
}

fn char_arg(matches: &ArgMatches<'_>, name: &str, default: char) -> char {
    match matches.value_of(name) {
        None => default,
        Some(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    eprintln!("--{} must be a single character, got {:?}", name, s);
                    process::exit(1);
                }
            }
        }
    }
}
