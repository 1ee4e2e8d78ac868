use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};

use separator::Separatable;

use crate::level::Level;

/// Open-set entry: a state plus the exact cost from the start (`dist`) and
/// the heuristic estimate (`h`). Ordered by f = dist + h ascending; among
/// equal f the deeper node wins so promising branches are finished first.
pub(crate) struct SearchNode {
    pub(crate) level: Level,
    pub(crate) dist: u16,
    pub(crate) h: u16,
}

impl SearchNode {
    pub(crate) fn new(level: Level, dist: u16, h: u16) -> Self {
        SearchNode { level, dist, h }
    }

    pub(crate) fn f(&self) -> u16 {
        self.dist + self.h
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.f() == other.f() && self.dist == other.dist
    }
}

impl Eq for SearchNode {}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f()
            .cmp(&other.f())
            .then(other.dist.cmp(&self.dist))
    }
}

/// Per-depth search counters.
#[derive(PartialEq, Eq)]
pub struct Stats {
    created_states: Vec<u32>,
    visited_states: Vec<u32>,
    duplicate_states: Vec<u32>,
}

impl Stats {
    pub(crate) fn new() -> Self {
        Stats {
            created_states: vec![],
            visited_states: vec![],
            duplicate_states: vec![],
        }
    }

    pub fn total_created(&self) -> u32 {
        self.created_states.iter().sum()
    }

    pub fn total_unique_visited(&self) -> u32 {
        self.visited_states.iter().sum()
    }

    pub fn total_reached_duplicates(&self) -> u32 {
        self.duplicate_states.iter().sum()
    }

    pub(crate) fn add_created(&mut self, node: &SearchNode) -> bool {
        Self::add(&mut self.created_states, node)
    }

    pub(crate) fn add_unique_visited(&mut self, node: &SearchNode) -> bool {
        Self::add(&mut self.visited_states, node)
    }

    pub(crate) fn add_reached_duplicate(&mut self, node: &SearchNode) -> bool {
        Self::add(&mut self.duplicate_states, node)
    }

    fn add(counts: &mut Vec<u32>, node: &SearchNode) -> bool {
        let mut new_depth = false;

        // while because duplicates can skip depths
        while usize::from(node.dist) >= counts.len() {
            counts.push(0);
            new_depth = true;
        }
        counts[usize::from(node.dist)] += 1;
        new_depth
    }
}

impl Debug for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "created by depth: {:?}", self.created_states)?;
        writeln!(f, "unique visited by depth: {:?}", self.visited_states)?;
        writeln!(f, "reached duplicates by depth: {:?}", self.duplicate_states)
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "States created total: {}",
            self.total_created().separated_string()
        )?;
        writeln!(
            f,
            "Unique visited total: {}",
            self.total_unique_visited().separated_string()
        )?;
        writeln!(
            f,
            "Reached duplicates total: {}",
            self.total_reached_duplicates().separated_string()
        )?;
        writeln!(f)?;
        writeln!(f, "Depth / created / unique / duplicates:")?;
        for depth in 0..self.created_states.len() {
            // created_states is always the longest
            let visited = self.visited_states.get(depth).cloned().unwrap_or(0);
            let duplicates = self.duplicate_states.get(depth).cloned().unwrap_or(0);
            writeln!(
                f,
                "{}: {} {} {}",
                depth,
                self.created_states[depth].separated_string(),
                visited.separated_string(),
                duplicates.separated_string()
            )?;
        }
        Ok(())
    }
}
