//! Move advisor - ranks the legal swaps on a board
//!
//! Each candidate swap is played on a scratch copy of the grid and resolved
//! for one pass, exactly as the turn controller would resolve it, without
//! refilling. Its value is the pass score plus the activation value of every
//! special tile it would earn plus a capped estimate of cascade potential
//! (more cleared cells means more tiles falling).
//!
//! The scratch resolution draws from its own fixed-seed RNG, so ranking never
//! disturbs the engine's random sequence.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};

use crate::grid::Grid;
use crate::matcher::find_all_matches;
use crate::rng::SimpleRng;
use crate::scoring::score_pass;
use crate::special::{ActivationRequest, SpecialResolver};
use crate::types::{Pos, SpecialKind};

/// Cascade estimate per cleared cell.
pub const CASCADE_POINTS_PER_CELL: u32 = 50;

/// Upper bound on the cascade estimate of a single move.
pub const CASCADE_POINTS_CAP: u32 = 300;

/// One legal swap and what it is worth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveEval {
    pub from: Pos,
    pub to: Pos,
    /// Score of the first pass, multiplier included
    pub points: u32,
    /// Special tiles the swap would earn
    pub spawned: Vec<SpecialKind>,
    /// Cells the first pass would clear
    pub cleared: usize,
    /// Ranking key
    pub value: u32,
}

/// Evaluate swapping `from` with `to`.
///
/// `None` when the swap is out of bounds, touches an empty cell, or would be
/// rejected for forming no match.
pub fn evaluate_move(grid: &Grid, resolver: &SpecialResolver, from: Pos, to: Pos) -> Option<MoveEval> {
    let mut scratch = grid.clone();
    evaluate_in_place(&mut scratch, resolver, from, to)
}

/// Every legal swap, best first. Ties keep row-major order.
pub fn rank_moves(grid: &Grid, resolver: &SpecialResolver) -> Vec<MoveEval> {
    let mut scratch = grid.clone();
    let mut moves: Vec<MoveEval> = grid
        .positions()
        .flat_map(|pos| [(pos, Pos::new(pos.row, pos.col + 1)), (pos, Pos::new(pos.row + 1, pos.col))])
        .filter_map(|(a, b)| evaluate_in_place(&mut scratch, resolver, a, b))
        .collect();
    moves.sort_by_key(|m| Reverse(m.value));
    moves
}

/// The highest-valued legal swap, if the board has one.
pub fn best_move(grid: &Grid, resolver: &SpecialResolver) -> Option<MoveEval> {
    rank_moves(grid, resolver).into_iter().next()
}

/// Swap on `grid`, evaluate, and swap back.
fn evaluate_in_place(grid: &mut Grid, resolver: &SpecialResolver, from: Pos, to: Pos) -> Option<MoveEval> {
    let (a, b) = (grid.get(from)?, grid.get(to)?);
    if !from.is_adjacent(to) || (a.color == b.color && !a.is_special() && !b.is_special()) {
        return None;
    }

    grid.swap(from, to);
    let eval = evaluate_swapped(grid, resolver, from, to);
    grid.swap(from, to);
    eval
}

fn evaluate_swapped(grid: &Grid, resolver: &SpecialResolver, from: Pos, to: Pos) -> Option<MoveEval> {
    let mut requests = resolver.swap_activations(grid, from, to);
    let matches = find_all_matches(grid);
    let completes = matches.iter().any(|m| m.contains(from) || m.contains(to));
    if requests.is_empty() && !completes {
        return None;
    }

    let mut cleared: BTreeSet<Pos> = matches.iter().flat_map(|m| m.positions.iter().copied()).collect();
    requests.extend(
        cleared
            .iter()
            .filter_map(|&p| grid.get(p).and_then(|t| ActivationRequest::chained(t, p))),
    );

    let spawned: Vec<SpecialKind> = resolver
        .spawns_for_matches(&matches, Some((from, to)))
        .into_iter()
        .map(|s| s.kind)
        .collect();

    let resolution = resolver.resolve(grid, requests, &mut HashSet::new(), &mut SimpleRng::default());
    cleared.extend(resolution.affected.iter().copied());

    let scores = resolver.scores();
    let points = score_pass(scores, 0, &matches, &resolution.fired).total;
    let earned: u32 = spawned.iter().map(|&k| scores.for_special(k)).sum();
    let cascade = (cleared.len() as u32)
        .saturating_mul(CASCADE_POINTS_PER_CELL)
        .min(CASCADE_POINTS_CAP);

    Some(MoveEval {
        from,
        to,
        points,
        spawned,
        cleared: cleared.len(),
        value: points.saturating_add(earned).saturating_add(cascade),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::has_legal_move;
    use crate::types::{EngineConfig, Tile, TileColor};

    fn resolver() -> SpecialResolver {
        SpecialResolver::new(&EngineConfig::default())
    }

    #[test]
    fn test_prefers_line_four_over_line_three() {
        // (0, 2) -> (1, 2) completes RRR in row 1; (4, 3) -> (4, 4) completes
        // a vertical run of four G in column 3.
        let grid = Grid::from_pattern(&["BYROBY", "RRBYOB", "OBYGYO", "YOBGRY", "BYORGB", "OBYGOB", "YOBRYO"])
            .unwrap();
        let moves = rank_moves(&grid, &resolver());
        assert_eq!(moves.len(), 5);
        assert!(moves[1..].iter().all(|m| m.points == 100 && m.value == 250));

        let best = best_move(&grid, &resolver()).unwrap();
        assert_eq!((best.from, best.to), (Pos::new(4, 3), Pos::new(4, 4)));
        assert_eq!(best.spawned, vec![SpecialKind::LineCol]);
        assert_eq!(best.points, 400);
        assert_eq!(best.value, 400 + 500 + 200);
    }

    #[test]
    fn test_dead_board_has_no_moves() {
        let grid = Grid::from_pattern(&["RGBY", "BYRG", "RGBY", "BYRG"]).unwrap();
        assert!(rank_moves(&grid, &resolver()).is_empty());
        assert!(!has_legal_move(&grid));
    }

    #[test]
    fn test_special_swap_is_ranked_with_its_effect() {
        let mut grid = Grid::from_pattern(&["RGBY", "BYRG", "RGBY", "BYRG"]).unwrap();
        grid.set(Pos::new(3, 3), Some(Tile::special(99, TileColor::Green, SpecialKind::Bomb)));
        let moves = rank_moves(&grid, &resolver());
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|m| m.points == 1000 && m.spawned.is_empty()));
        // Either way the bomb lands one cell in from the corner and clips to 12 cells.
        assert!(moves.iter().all(|m| m.cleared == 12 && m.value == 1000 + CASCADE_POINTS_CAP));
    }

    #[test]
    fn test_ranking_leaves_grid_untouched() {
        let grid = Grid::from_pattern(&["RGRB", "BYBY", "GBGY", "YRYB"]).unwrap();
        let before = grid.clone();
        let moves = rank_moves(&grid, &resolver());
        assert!(!moves.is_empty());
        assert_eq!(grid, before);
        assert!(moves.windows(2).all(|w| w[0].value >= w[1].value));
    }
}
