//! Shuffle validator - legal-move search and color reshuffling
//!
//! A move is legal if swapping two adjacent occupied cells forms a match, or
//! if either cell holds a special tile (those always activate when swapped).

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::grid::Grid;
use crate::matcher::{find_all_matches, has_match_at};
use crate::rng::SimpleRng;
use crate::types::{Pos, TileColor};

/// First legal swap in row-major order, as `(cell, right or lower neighbour)`.
pub fn find_legal_move(grid: &Grid) -> Option<(Pos, Pos)> {
    let mut scratch = grid.clone();
    for pos in grid.positions() {
        for next in [Pos::new(pos.row, pos.col + 1), Pos::new(pos.row + 1, pos.col)] {
            if is_legal_swap(&mut scratch, pos, next) {
                return Some((pos, next));
            }
        }
    }
    None
}

pub fn has_legal_move(grid: &Grid) -> bool {
    find_legal_move(grid).is_some()
}

/// Tentatively swap `a` and `b`, test for a match, and swap back.
fn is_legal_swap(grid: &mut Grid, a: Pos, b: Pos) -> bool {
    let (Some(ta), Some(tb)) = (grid.get(a), grid.get(b)) else {
        return false;
    };
    if ta.is_special() || tb.is_special() {
        return true;
    }
    if ta.color == tb.color {
        return false;
    }
    grid.swap(a, b);
    let found = has_match_at(grid, a) || has_match_at(grid, b);
    grid.swap(a, b);
    found
}

/// Permute tile colors across occupied cells until the board has no match
/// and at least one legal move.
///
/// Tile ids, kinds and states stay in place; only colors move. Returns the
/// number of attempts used. On failure the grid is left in its last permuted
/// state and the caller is expected to regenerate it.
pub fn shuffle(grid: &mut Grid, rng: &mut SimpleRng, max_attempts: u32) -> EngineResult<u32> {
    let mut colors: Vec<TileColor> = grid.tiles().map(|(_, t)| t.color).collect();
    if colors.is_empty() {
        return Err(EngineError::EmptyBoard);
    }

    for attempt in 1..=max_attempts {
        rng.shuffle(&mut colors);
        for (tile, &color) in grid.tiles_mut().zip(&colors) {
            tile.color = color;
        }
        if find_all_matches(grid).is_empty() && has_legal_move(grid) {
            debug!(attempt, "shuffle settled");
            return Ok(attempt);
        }
    }
    Err(EngineError::MalformedShuffle {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SpecialKind, Tile};

    #[test]
    fn test_finds_first_legal_move() {
        let grid = Grid::from_pattern(&["RGR", "GRG", "BYB"]).unwrap();
        assert_eq!(find_legal_move(&grid), Some((Pos::new(0, 1), Pos::new(1, 1))));
    }

    #[test]
    fn test_no_move_when_no_color_repeats_three_times() {
        let grid = Grid::from_pattern(&["RGB", "YOP", "CWR"]).unwrap();
        assert!(!has_legal_move(&grid));
    }

    #[test]
    fn test_special_tile_is_always_a_move() {
        let mut grid = Grid::from_pattern(&["RGB", "YOP", "CWR"]).unwrap();
        grid.set(Pos::new(1, 1), Some(Tile::special(99, TileColor::Orange, SpecialKind::Bomb)));
        assert!(has_legal_move(&grid));
    }

    #[test]
    fn test_legal_move_check_leaves_grid_untouched() {
        let grid = Grid::from_pattern(&["RGR", "GRG", "BYB"]).unwrap();
        let before = grid.clone();
        has_legal_move(&grid);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_shuffle_gives_up_on_hopeless_board() {
        let mut grid = Grid::from_pattern(&["RGB", "YOP", "CWR"]).unwrap();
        let err = shuffle(&mut grid, &mut SimpleRng::new(5), 10).unwrap_err();
        assert!(matches!(err, EngineError::MalformedShuffle { attempts: 10 }));
    }

    #[test]
    fn test_shuffle_keeps_ids_and_color_counts() {
        let mut grid = Grid::from_pattern(&["RGBR", "GBRG", "BRGB", "RGBR"]).unwrap();
        let ids: Vec<_> = grid.tiles().map(|(_, t)| t.id).collect();
        let mut before: Vec<_> = grid.tiles().map(|(_, t)| t.color).collect();

        shuffle(&mut grid, &mut SimpleRng::new(11), 1000).unwrap();

        let mut after: Vec<_> = grid.tiles().map(|(_, t)| t.color).collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
        assert_eq!(ids, grid.tiles().map(|(_, t)| t.id).collect::<Vec<_>>());
        assert!(find_all_matches(&grid).is_empty());
        assert!(has_legal_move(&grid));
    }
}
