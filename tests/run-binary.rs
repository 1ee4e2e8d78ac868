use assert_cmd::prelude::*;
use std::process::Command;

#[test]
fn run_single_level() {
    let output = r"a.a

Solution: 00>
Moves: 1
States created total: 2
Unique visited total: 2
Reached duplicates total: 0

Depth / created / unique / duplicates:
0: 1 1 0
1: 1 1 0
";

    Command::main_binary()
        .unwrap()
        .arg("--quiet")
        .arg("levels/pair.txt")
        .assert()
        .success()
        .stdout(output)
        .stderr("");
}

#[test]
fn run_batch() {
    Command::main_binary()
        .unwrap()
        .arg("--quiet")
        .arg("--batch")
        .arg("levels/batch-sample.txt")
        .assert()
        .success()
        .stdout("pair,1,1,00>\nsplit,5,-1,No solution\n")
        .stderr("");
}

#[test]
fn run_missing_file() {
    Command::main_binary()
        .unwrap()
        .arg("levels/does-not-exist.txt")
        .assert()
        .failure()
        .stdout("");
}
