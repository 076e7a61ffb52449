//! Grid module - owns the tile cells
//!
//! The grid is a `width x height` board stored as a flat row-major vector of
//! optional tiles. Empty cells only exist while a pass is being refilled.
//! Every mutation goes through [`Grid::set`], so the grid stays the single
//! source of truth for where each tile is.
//!
//! Coordinates: `Pos { row, col }`, row 0 at the top.

use std::collections::HashSet;

use arrayvec::ArrayVec;

use crate::error::{EngineError, EngineResult};
use crate::rng::SimpleRng;
use crate::types::{Pos, Tile, TileColor, TileId};

/// A tile that moved down during column compaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fall {
    pub id: TileId,
    pub from: Pos,
    pub to: Pos,
}

impl Fall {
    pub fn rows(&self) -> usize {
        self.to.row - self.from.row
    }
}

/// The game board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (row * width + col)
    cells: Vec<Option<Tile>>,
}

impl Grid {
    /// Create an empty grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.row >= self.height || pos.col >= self.width {
            return None;
        }
        Some(pos.row * self.width + pos.col)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_in_bounds(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    /// Tile at `pos`; `None` for an empty cell or out of bounds.
    pub fn get(&self, pos: Pos) -> Option<&Tile> {
        self.index(pos).and_then(|i| self.cells[i].as_ref())
    }

    /// Set the cell at `pos`. Returns false if out of bounds.
    pub fn set(&mut self, pos: Pos, tile: Option<Tile>) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Remove and return the tile at `pos`.
    pub fn take(&mut self, pos: Pos) -> Option<Tile> {
        let tile = self.get(pos).copied();
        self.set(pos, None);
        tile
    }

    /// Exchange the contents of two cells. Returns false if either is out of bounds.
    pub fn swap(&mut self, a: Pos, b: Pos) -> bool {
        if !self.is_in_bounds(a) || !self.is_in_bounds(b) {
            return false;
        }
        let ta = self.get(a).copied();
        let tb = self.get(b).copied();
        self.set(a, tb);
        self.set(b, ta);
        true
    }

    /// Apply `f` to the tile at `pos` and write it back.
    pub fn update(&mut self, pos: Pos, f: impl FnOnce(&mut Tile)) -> bool {
        let Some(mut tile) = self.get(pos).copied() else {
            return false;
        };
        f(&mut tile);
        self.set(pos, Some(tile))
    }

    pub fn color_at(&self, pos: Pos) -> Option<TileColor> {
        self.get(pos).map(|t| t.color)
    }

    /// In-bounds edge neighbours (up, down, left, right).
    pub fn neighbors4(&self, pos: Pos) -> ArrayVec<Pos, 4> {
        let mut out = ArrayVec::new();
        for (dr, dc) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            if let Some(p) = pos.offset(dr, dc) {
                if self.is_in_bounds(p) {
                    out.push(p);
                }
            }
        }
        out
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let width = self.width;
        (0..self.width * self.height).map(move |i| Pos::new(i / width, i % width))
    }

    /// Occupied cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (Pos, &Tile)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|t| (Pos::new(i / self.width, i % self.width), t)))
    }

    /// Occupied cells in row-major order, mutably.
    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> + '_ {
        self.cells.iter_mut().flatten()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Distinct colors currently on the board, in palette order.
    pub fn colors_present(&self) -> Vec<TileColor> {
        let mut colors: Vec<TileColor> = self.tiles().map(|(_, t)| t.color).collect();
        colors.sort_unstable();
        colors.dedup();
        colors
    }

    pub fn max_id(&self) -> Option<TileId> {
        self.tiles().map(|(_, t)| t.id).max()
    }

    /// First tile id found in more than one cell.
    pub fn find_duplicate_id(&self) -> Option<TileId> {
        let mut seen = HashSet::with_capacity(self.cells.len());
        self.tiles().map(|(_, t)| t.id).find(|id| !seen.insert(*id))
    }

    /// Let every column settle: tiles fall to fill gaps, keeping their order.
    ///
    /// Uses a two-pointer pass per column from the bottom up.
    pub fn compact_columns(&mut self) -> Vec<Fall> {
        let mut falls = Vec::new();
        for col in 0..self.width {
            let mut write_row = self.height;
            for read_row in (0..self.height).rev() {
                let from = Pos::new(read_row, col);
                let Some(tile) = self.get(from).copied() else {
                    continue;
                };
                write_row -= 1;
                if write_row != read_row {
                    let to = Pos::new(write_row, col);
                    self.set(to, Some(tile));
                    self.set(from, None);
                    falls.push(Fall { id: tile.id, from, to });
                }
            }
        }
        falls
    }

    /// Colors from `palette` that do not complete a run of three or a 2x2
    /// square with the already-filled cells above and to the left of `pos`.
    pub fn safe_colors(&self, pos: Pos, palette: &[TileColor]) -> Vec<TileColor> {
        let at = |dr: isize, dc: isize| pos.offset(dr, dc).and_then(|p| self.color_at(p));
        let mut banned: ArrayVec<TileColor, 3> = ArrayVec::new();

        if let (Some(a), Some(b)) = (at(0, -1), at(0, -2)) {
            if a == b {
                banned.push(a);
            }
        }
        if let (Some(a), Some(b)) = (at(-1, 0), at(-2, 0)) {
            if a == b && !banned.contains(&a) {
                banned.push(a);
            }
        }
        if let (Some(a), Some(b), Some(c)) = (at(-1, -1), at(-1, 0), at(0, -1)) {
            if a == b && b == c && !banned.contains(&a) {
                banned.push(a);
            }
        }

        palette.iter().copied().filter(|c| !banned.contains(c)).collect()
    }

    /// Build a fully occupied grid with no initial matches.
    ///
    /// Ids are drawn from `next_id`, which is advanced past the last one used.
    pub fn generate(
        width: usize,
        height: usize,
        palette: &[TileColor],
        rng: &mut SimpleRng,
        next_id: &mut TileId,
    ) -> Self {
        let mut grid = Self::new(width, height);
        for row in 0..height {
            for col in 0..width {
                let pos = Pos::new(row, col);
                let safe = grid.safe_colors(pos, palette);
                let pool = if safe.is_empty() { palette } else { &safe[..] };
                let Some(&color) = rng.choose(pool) else {
                    continue;
                };
                grid.set(pos, Some(Tile::normal(*next_id, color)));
                *next_id += 1;
            }
        }
        grid
    }

    /// Parse a board from one string per row.
    ///
    /// Each character is a palette code (`R G B Y O P C W`, case-insensitive)
    /// or `.` for an empty cell. Tiles get ids `1..` in row-major order.
    ///
    /// ```
    /// use tui_match3_core::Grid;
    /// use tui_match3_core::types::{Pos, TileColor};
    ///
    /// let grid = Grid::from_pattern(&["RGB", "BRG"]).unwrap();
    /// assert_eq!(grid.color_at(Pos::new(1, 0)), Some(TileColor::Blue));
    /// ```
    pub fn from_pattern(rows: &[&str]) -> EngineResult<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(EngineError::Pattern("empty pattern".into()));
        }

        let mut grid = Self::new(width, height);
        let mut next_id: TileId = 1;
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(EngineError::Pattern(format!(
                    "row {row} has {} cells, expected {width}",
                    line.chars().count()
                )));
            }
            for (col, ch) in line.chars().enumerate() {
                if ch == '.' {
                    continue;
                }
                let color = TileColor::from_str(&ch.to_string())
                    .ok_or_else(|| EngineError::Pattern(format!("unknown color code {ch:?}")))?;
                grid.set(Pos::new(row, col), Some(Tile::normal(next_id, color)));
                next_id += 1;
            }
        }
        Ok(grid)
    }

    /// Inverse of [`Grid::from_pattern`] (special tiles print as their color).
    pub fn to_pattern(&self) -> Vec<String> {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| self.color_at(Pos::new(row, col)).map_or('.', |c| c.code()))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(8, 9);
        assert_eq!(grid.index(Pos::new(0, 0)), Some(0));
        assert_eq!(grid.index(Pos::new(0, 7)), Some(7));
        assert_eq!(grid.index(Pos::new(1, 0)), Some(8));
        assert_eq!(grid.index(Pos::new(8, 7)), Some(71));
        assert_eq!(grid.index(Pos::new(9, 0)), None);
        assert_eq!(grid.index(Pos::new(0, 8)), None);
    }

    #[test]
    fn test_neighbors_at_corner_and_center() {
        let grid = Grid::new(4, 4);
        assert_eq!(grid.neighbors4(Pos::new(0, 0)).len(), 2);
        assert_eq!(grid.neighbors4(Pos::new(0, 2)).len(), 3);
        assert_eq!(grid.neighbors4(Pos::new(2, 2)).len(), 4);
    }

    #[test]
    fn test_compact_preserves_order() {
        let mut grid = Grid::from_pattern(&["R.", "..", "G.", ".B"]).unwrap();
        let falls = grid.compact_columns();
        assert_eq!(grid.to_pattern(), vec!["..", "..", "R.", "GB"]);
        assert_eq!(falls.len(), 2);
        assert!(falls.iter().all(|f| f.to.col == f.from.col));
        let red = falls.iter().find(|f| f.from == Pos::new(0, 0)).unwrap();
        assert_eq!(red.rows(), 2);
    }

    #[test]
    fn test_safe_colors_bans_run_and_square() {
        let grid = Grid::from_pattern(&["RRB", "GG.", "..."]).unwrap();
        let palette = TileColor::palette(4);
        // (1,2): left two are G G -> G banned.
        let safe = grid.safe_colors(Pos::new(1, 2), palette);
        assert!(!safe.contains(&TileColor::Green));
        assert!(safe.contains(&TileColor::Red));

        let square = Grid::from_pattern(&["YY", "Y."]).unwrap();
        let safe = square.safe_colors(Pos::new(1, 1), palette);
        assert!(!safe.contains(&TileColor::Yellow));
    }

    #[test]
    fn test_from_pattern_rejects_ragged_rows() {
        assert!(Grid::from_pattern(&["RGB", "RG"]).is_err());
        assert!(Grid::from_pattern(&["RXB"]).is_err());
        assert!(Grid::from_pattern(&[]).is_err());
    }

    #[test]
    fn test_duplicate_id_detection() {
        let mut grid = Grid::from_pattern(&["RGB"]).unwrap();
        assert_eq!(grid.find_duplicate_id(), None);
        let t = *grid.get(Pos::new(0, 0)).unwrap();
        grid.set(Pos::new(0, 2), Some(t));
        assert_eq!(grid.find_duplicate_id(), Some(t.id));
    }
}
