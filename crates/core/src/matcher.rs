//! Pattern matcher - finds every match shape on the grid
//!
//! A full scan reports:
//!
//! - **Lines**: maximal horizontal and vertical runs of 3 or more. A run of 5
//!   is one `Line5`, never three overlapping `Line3`s.
//! - **Squares**: every same-colored 2x2 window.
//! - **Corners**: 3x3 L shapes (5 cells), all four rotations.
//! - **T shapes**: a 3-bar with a 2-cell stem from its middle (5 cells), all
//!   four rotations.
//!
//! Shapes may overlap. All of them are reported; the turn controller clears
//! the union of their cells and scores every shape independently.
//!
//! Cost is `O(width * height)` per scan: each template family is a constant
//! number of lookups per anchor cell.

use crate::grid::Grid;
use crate::types::{Axis, MatchShape, Pos, TileColor};

type Template = [(usize, usize); 5];

const CORNER_TEMPLATES: [Template; 4] = [
    [(0, 0), (0, 1), (0, 2), (1, 0), (2, 0)],
    [(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)],
    [(0, 2), (1, 2), (2, 2), (2, 1), (2, 0)],
];

const T_TEMPLATES: [Template; 4] = [
    // Stem down
    [(0, 0), (0, 1), (0, 2), (1, 1), (2, 1)],
    // Stem up
    [(2, 0), (2, 1), (2, 2), (1, 1), (0, 1)],
    // Stem right
    [(0, 0), (1, 0), (2, 0), (1, 1), (1, 2)],
    // Stem left
    [(0, 2), (1, 2), (2, 2), (1, 1), (1, 0)],
];

/// A group of same-colored cells forming one shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Match {
    pub shape: MatchShape,
    pub color: TileColor,
    /// Cells in row-major order
    pub positions: Vec<Pos>,
    /// Run direction, for line shapes only
    pub axis: Option<Axis>,
}

impl Match {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.positions.contains(&pos)
    }

    /// First cell in scan order.
    pub fn anchor(&self) -> Pos {
        self.positions[0]
    }
}

/// Scan the whole grid and return every match, lines first, then squares,
/// corners and T shapes.
pub fn find_all_matches(grid: &Grid) -> Vec<Match> {
    let mut out = Vec::new();
    find_line_matches(grid, &mut out);
    find_square_matches(grid, &mut out);
    find_template_matches(grid, &CORNER_TEMPLATES, MatchShape::Corner, &mut out);
    find_template_matches(grid, &T_TEMPLATES, MatchShape::TShape, &mut out);
    out
}

fn find_line_matches(grid: &Grid, out: &mut Vec<Match>) {
    let (w, h) = (grid.width(), grid.height());

    for row in 0..h {
        scan_runs(grid, w, |i| Pos::new(row, i), Axis::Horizontal, out);
    }
    for col in 0..w {
        scan_runs(grid, h, |i| Pos::new(i, col), Axis::Vertical, out);
    }
}

/// Walk one row or column, emitting each maximal run of 3+.
fn scan_runs(grid: &Grid, len: usize, at: impl Fn(usize) -> Pos, axis: Axis, out: &mut Vec<Match>) {
    let mut start = 0;
    while start < len {
        let Some(color) = grid.color_at(at(start)) else {
            start += 1;
            continue;
        };
        let mut end = start + 1;
        while end < len && grid.color_at(at(end)) == Some(color) {
            end += 1;
        }
        let run = end - start;
        if run >= 3 {
            out.push(Match {
                shape: MatchShape::for_run(run),
                color,
                positions: (start..end).map(&at).collect(),
                axis: Some(axis),
            });
        }
        start = end;
    }
}

fn find_square_matches(grid: &Grid, out: &mut Vec<Match>) {
    for row in 0..grid.height().saturating_sub(1) {
        for col in 0..grid.width().saturating_sub(1) {
            let positions = [
                Pos::new(row, col),
                Pos::new(row, col + 1),
                Pos::new(row + 1, col),
                Pos::new(row + 1, col + 1),
            ];
            if let Some(color) = uniform_color(grid, &positions) {
                out.push(Match {
                    shape: MatchShape::Square,
                    color,
                    positions: positions.to_vec(),
                    axis: None,
                });
            }
        }
    }
}

fn find_template_matches(grid: &Grid, templates: &[Template], shape: MatchShape, out: &mut Vec<Match>) {
    for row in 0..grid.height().saturating_sub(2) {
        for col in 0..grid.width().saturating_sub(2) {
            for template in templates {
                let mut positions: Vec<Pos> = template
                    .iter()
                    .map(|&(dr, dc)| Pos::new(row + dr, col + dc))
                    .collect();
                if let Some(color) = uniform_color(grid, &positions) {
                    positions.sort_unstable();
                    out.push(Match {
                        shape,
                        color,
                        positions,
                        axis: None,
                    });
                }
            }
        }
    }
}

/// The shared color of all cells, if every cell is occupied and they agree.
fn uniform_color(grid: &Grid, positions: &[Pos]) -> Option<TileColor> {
    let first = grid.color_at(*positions.first()?)?;
    positions[1..]
        .iter()
        .all(|&p| grid.color_at(p) == Some(first))
        .then_some(first)
}

/// True if any match passes through `pos`.
///
/// Every corner and T shape contains a run of three, so checking runs and the
/// four 2x2 windows around `pos` is enough.
pub fn has_match_at(grid: &Grid, pos: Pos) -> bool {
    let Some(color) = grid.color_at(pos) else {
        return false;
    };
    let same = |p: Option<Pos>| p.and_then(|p| grid.color_at(p)) == Some(color);
    let run = |dr: isize, dc: isize| {
        let mut n = 0;
        let mut cur = pos.offset(dr, dc);
        while same(cur) {
            n += 1;
            cur = cur.and_then(|p| p.offset(dr, dc));
        }
        n
    };

    if run(0, -1) + run(0, 1) + 1 >= 3 || run(-1, 0) + run(1, 0) + 1 >= 3 {
        return true;
    }

    [(-1, -1), (-1, 0), (0, -1), (0, 0)].iter().any(|&(dr, dc)| {
        let Some(top_left) = pos.offset(dr, dc) else {
            return false;
        };
        [(0, 0), (0, 1), (1, 0), (1, 1)]
            .iter()
            .all(|&(r, c)| same(top_left.offset(r, c)))
    })
}
