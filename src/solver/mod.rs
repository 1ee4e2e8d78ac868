mod a_star;

use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::BinaryHeap;
use std::fmt::{self, Debug, Formatter};

use fnv::FnvHashMap;
use log::debug;

use crate::data::Pos;
use crate::level::Level;
use crate::map::Walls;
use crate::moves::Moves;
use crate::Solve;

use self::a_star::SearchNode;
pub use self::a_star::Stats;

/// Search outcome. `moves: None` means no solution exists (within the bound
/// if one was given) - a normal result, not an error.
pub struct SolverOk {
    pub moves: Option<Moves>,
    pub stats: Stats,
}

impl Debug for SolverOk {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.moves {
            None => writeln!(f, "No solution")?,
            Some(ref moves) => writeln!(f, "Moves: {}", moves.len())?,
        }
        write!(f, "{:?}", self.stats)
    }
}

impl Solve for Level {
    fn solve(&self, bound: Option<u16>, print_status: bool) -> SolverOk {
        search(self, bound, print_status)
    }
}

/// Bookkeeping per discovered state: best known cost from the start, the
/// predecessor on that best path, and whether the state was expanded.
struct NodeInfo {
    dist: u16,
    prev: Option<Level>,
    closed: bool,
}

/// A* over the state graph. Every move costs 1; the heuristic never
/// overestimates, so the first win popped is a shortest solution. With
/// `bound` set, nodes whose f-score exceeds it are discarded unexpanded
/// (branch and bound), proving or refuting solvability in at most `bound`
/// moves without exhausting the full optimal search.
pub fn search(start: &Level, bound: Option<u16>, print_status: bool) -> SolverOk {
    debug!("search called, bound {:?}", bound);

    let mut stats = Stats::new();
    let mut to_visit = BinaryHeap::new();
    let mut nodes: FnvHashMap<Level, NodeInfo> = FnvHashMap::default();

    let start_h = match heuristic(start) {
        Some(h) if !is_deadend(start) => h,
        _ => return SolverOk { moves: None, stats },
    };
    let start_node = SearchNode::new(start.clone(), 0, start_h);
    stats.add_created(&start_node);
    nodes.insert(
        start.clone(),
        NodeInfo {
            dist: 0,
            prev: None,
            closed: false,
        },
    );
    to_visit.push(Reverse(start_node));

    while let Some(Reverse(cur)) = to_visit.pop() {
        {
            let info = &nodes[&cur.level];
            // stale entries are left over from reinsertion on a better path
            if info.closed || info.dist != cur.dist {
                stats.add_reached_duplicate(&cur);
                continue;
            }
        }
        if stats.add_unique_visited(&cur) && print_status {
            println!("Visited new depth: {}", cur.dist);
        }

        if cur.level.is_win() {
            debug!("solved at depth {}, backtracking", cur.dist);
            return SolverOk {
                moves: Some(backtrack_moves(&nodes, &cur.level)),
                stats,
            };
        }

        if let Some(bound) = bound {
            if cur.f() > bound {
                continue;
            }
        }

        nodes.get_mut(&cur.level).unwrap().closed = true;

        for mov in cur.level.possible_moves() {
            let neighbor = cur.level.apply_move(mov);
            if is_deadend(&neighbor) {
                continue;
            }
            let h = match heuristic(&neighbor) {
                Some(h) => h,
                None => continue,
            };
            let dist = cur.dist + 1;

            match nodes.entry(neighbor.clone()) {
                Entry::Occupied(mut e) => {
                    let info = e.get_mut();
                    if info.closed || dist >= info.dist {
                        continue;
                    }
                    // decrease-key: record the better path and reinsert; the
                    // superseded heap entry is dropped as stale when popped
                    info.dist = dist;
                    info.prev = Some(cur.level.clone());
                }
                Entry::Vacant(e) => {
                    e.insert(NodeInfo {
                        dist,
                        prev: Some(cur.level.clone()),
                        closed: false,
                    });
                }
            }
            let next = SearchNode::new(neighbor, dist, h);
            stats.add_created(&next);
            to_visit.push(Reverse(next));
        }
    }

    debug!("open set exhausted");
    SolverOk { moves: None, stats }
}

/// Walks parent links from the win back to the start, then maps each
/// consecutive state pair to the move that produced it by replaying the
/// parent's legal moves.
fn backtrack_moves(nodes: &FnvHashMap<Level, NodeInfo>, win: &Level) -> Moves {
    let mut path = Vec::new();
    let mut cur = win;
    loop {
        path.push(cur.clone());
        match &nodes[cur].prev {
            Some(prev) => cur = prev,
            None => break,
        }
    }
    path.reverse();

    let mut moves = Moves::new();
    for pair in path.windows(2) {
        let (parent, child) = (&pair[0], &pair[1]);
        let mov = parent
            .possible_moves()
            .into_iter()
            .find(|&m| parent.apply_move(m) == *child)
            .expect("consecutive path states must differ by one move");
        moves.push(mov);
    }
    moves
}

/// Cheap sufficient (not necessary) unsolvability check, used to prune
/// branches before they are expanded or scored.
///
/// True when some color has exactly one block left (nothing to merge with),
/// or when a color with at most 3 blocks has two of them resting on the
/// bottom row with a bottom-row wall strictly between them - blocks never
/// rise, so those two can never meet, and with so few blocks of the color
/// there is no other way to pair them off.
pub fn is_deadend(level: &Level) -> bool {
    for cols in blocks_by_color(level).values() {
        if cols.len() == 1 {
            return true;
        }
        if cols.len() <= 3 && split_by_floor_wall(level.walls(), cols) {
            return true;
        }
    }
    false
}

fn split_by_floor_wall(walls: &Walls, blocks: &[Pos]) -> bool {
    let bottom = walls.rows() - 1;
    let mut cols: Vec<u8> = blocks
        .iter()
        .filter(|p| p.r == bottom)
        .map(|p| p.c)
        .collect();
    if cols.len() < 2 {
        return false;
    }
    cols.sort_unstable();
    (cols[0] + 1..cols[cols.len() - 1])
        .any(|c| walls.is_wall(i16::from(bottom), i16::from(c)))
}

/// Admissible cost estimate: never more than the true number of remaining
/// moves. `None` means provably unsolvable (a color down to one block).
///
/// Per color, blocks sorted by column form a path whose edge weights are the
/// column gaps between neighbors; the minimum-weight edge cover of that path
/// bounds the color's horizontal moves from below (see DESIGN.md for the
/// argument). Gravity is free, so the sum over colors, floored at 1 for any
/// non-empty board, is admissible.
pub fn heuristic(level: &Level) -> Option<u16> {
    if level.is_win() {
        return Some(0);
    }

    let mut h = 0u16;
    for blocks in blocks_by_color(level).values() {
        if blocks.len() == 1 {
            return None;
        }
        let mut cols: Vec<u8> = blocks.iter().map(|p| p.c).collect();
        cols.sort_unstable();
        h += color_cost(&cols);
    }
    Some(h.max(1))
}

/// Minimum-weight edge cover of the path over `cols` (sorted), where the
/// edge between neighbors i and i+1 weighs `cols[i+1] - cols[i] - 1` moves
/// (two blocks merge once their columns are within 1 of each other).
fn color_cost(cols: &[u8]) -> u16 {
    debug_assert!(cols.len() >= 2);

    // covered = cheapest cover of the prefix with the newest block covered,
    // open = cheapest cover of all but the newest block
    let mut covered = u16::max_value();
    let mut open = 0u16;
    for gap in cols.windows(2) {
        let weight = u16::from((gap[1] - gap[0]).saturating_sub(1));
        let new_covered = covered.min(open).saturating_add(weight);
        open = covered.min(new_covered);
        covered = new_covered;
    }
    covered
}

fn blocks_by_color(level: &Level) -> FnvHashMap<u8, Vec<Pos>> {
    let mut by_color: FnvHashMap<u8, Vec<Pos>> = FnvHashMap::default();
    for b in level.blocks() {
        by_color.entry(b.color).or_default().push(b.pos);
    }
    by_color
}

#[cfg(test)]
mod tests {
    use crate::data::Dir;
    use crate::moves::Move;

    use super::*;

    #[test]
    fn color_cost_two_blocks() {
        assert_eq!(color_cost(&[3, 3]), 0);
        assert_eq!(color_cost(&[3, 4]), 0);
        assert_eq!(color_cost(&[0, 5]), 4);
    }

    #[test]
    fn color_cost_pairs_at_both_ends() {
        // two tight pairs - the middle gap never needs closing
        assert_eq!(color_cost(&[0, 0, 5, 5]), 0);
        assert_eq!(color_cost(&[0, 1, 5, 6]), 0);
    }

    #[test]
    fn color_cost_chain_of_three() {
        // all three must meet, both gaps count
        assert_eq!(color_cost(&[0, 1, 6]), 4);
        assert_eq!(color_cost(&[0, 3, 6]), 4);
    }

    #[test]
    fn color_cost_independent_pairs() {
        // four spread blocks pair up (1,2) and (3,4) - not a chain
        assert_eq!(color_cost(&[0, 6, 12, 18]), 10);
    }

    #[test]
    fn heuristic_win_is_zero() {
        let level: Level = "a.a".parse().unwrap();
        let win = level.apply_move(Move::new(Pos::new(0, 0), Dir::Right));
        assert_eq!(heuristic(&win), Some(0));
    }

    #[test]
    fn heuristic_floors_at_one() {
        // adjacent columns cost no horizontal moves but still one real move
        let level: Level = "aX/Xa".parse().unwrap();
        assert_eq!(heuristic(&level), Some(1));
    }

    #[test]
    fn heuristic_single_block_color_is_infinite() {
        let level: Level = "a.b.b".parse().unwrap();
        assert_eq!(heuristic(&level), None);
        assert!(is_deadend(&level));
    }

    #[test]
    fn deadend_floor_wall_between_pair() {
        let level: Level = "aXa".parse().unwrap();
        assert!(is_deadend(&level));
    }

    #[test]
    fn not_a_deadend_when_wall_is_above_floor() {
        // the wall splits a higher row only - blocks can pass underneath
        let level: Level = ".X./a.a".parse().unwrap();
        assert!(!is_deadend(&level));
    }

    #[test]
    fn heuristic_admissible_on_known_optimum() {
        // solvable in exactly one move
        let level: Level = "a.a".parse().unwrap();
        assert_eq!(heuristic(&level), Some(1));
    }

    #[test]
    fn search_trivial_pair() {
        let level: Level = "a.a".parse().unwrap();
        let result = search(&level, None, false);
        let moves = result.moves.unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves.to_string(), "00>");

        // both shifts reach the same empty board - one node, no duplicates
        assert_eq!(result.stats.total_created(), 2);
        assert_eq!(result.stats.total_unique_visited(), 2);
        assert_eq!(result.stats.total_reached_duplicates(), 0);
    }

    #[test]
    fn search_deadend_start() {
        let level: Level = "aXa".parse().unwrap();
        let result = search(&level, None, false);
        assert!(result.moves.is_none());
        assert_eq!(result.stats.total_created(), 0);
    }

    #[test]
    fn search_two_colors() {
        let level: Level = ".a./.b./aXb".parse().unwrap();
        let result = search(&level, None, false);
        let moves = result.moves.unwrap();
        assert_eq!(moves.len(), 2);
        assert!(replay(&level, &moves).is_win());
    }

    #[test]
    fn search_classic_fixture() {
        let level: Level = "XXXX.gXX/XXXh.XXX/a.eg.e../X.XXXh.a".parse().unwrap();
        let result = search(&level, None, false);
        let moves = result.moves.unwrap();
        assert!(!moves.is_empty());
        assert!(replay(&level, &moves).is_win());
    }

    #[test]
    fn bounded_search_monotonicity() {
        let level: Level = "XXXX.gXX/XXXh.XXX/a.eg.e../X.XXXh.a".parse().unwrap();

        // A* with an admissible heuristic returns an optimal solution
        let optimum = search(&level, None, false).moves.unwrap().len() as u16;

        let at_bound = search(&level, Some(optimum), false);
        assert_eq!(at_bound.moves.unwrap().len() as u16, optimum);

        let below_bound = search(&level, Some(optimum - 1), false);
        assert!(below_bound.moves.is_none());
    }

    #[test]
    fn already_solved_start() {
        let start: Level = "a.a".parse().unwrap();
        let win = start.apply_move(Move::new(Pos::new(0, 0), Dir::Right));
        let result = search(&win, None, false);
        assert_eq!(result.moves.unwrap().len(), 0);
    }

    fn replay(start: &Level, moves: &Moves) -> Level {
        let mut level = start.clone();
        for &mov in moves {
            level = level.apply_move(mov);
        }
        level
    }
}
