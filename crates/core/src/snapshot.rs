//! Read-only view of the engine for presentation and tooling.

use serde::Serialize;

use crate::grid::Grid;
use crate::types::{Pos, SpecialKind, Tile, TileColor, TileId, TileState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSnapshot {
    pub id: TileId,
    pub color: TileColor,
    pub special: Option<SpecialKind>,
    /// Remaining falling time, 0 when idle
    pub falling_ms: u32,
}

impl From<&Tile> for TileSnapshot {
    fn from(tile: &Tile) -> Self {
        Self {
            id: tile.id,
            color: tile.color,
            special: tile.kind.special(),
            falling_ms: match tile.state {
                TileState::Falling { remaining_ms } => remaining_ms,
                TileState::Idle | TileState::Dead => 0,
            },
        }
    }
}

impl TileSnapshot {
    /// One-byte cell encoding used by the board hash.
    ///
    /// `1 + color * 6 + kind`, where kind 0 is a plain tile.
    pub fn code(&self) -> u8 {
        let color = TileColor::ALL
            .iter()
            .position(|c| *c == self.color)
            .unwrap_or(0) as u8;
        let kind = match self.special {
            None => 0,
            Some(SpecialKind::LineRow) => 1,
            Some(SpecialKind::LineCol) => 2,
            Some(SpecialKind::Bomb) => 3,
            Some(SpecialKind::ColorWipe) => 4,
            Some(SpecialKind::Lightning) => 5,
        };
        1 + color * 6 + kind
    }

    pub fn is_falling(&self) -> bool {
        self.falling_ms > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major cells
    pub cells: Vec<Option<TileSnapshot>>,
    pub score: u32,
    /// Cascade passes in the last turn
    pub combo: u32,
    pub turn: u32,
    pub shuffled: bool,
    pub seed: u32,
    /// FNV-1a over the dimensions and cell codes
    pub board_hash: u32,
}

impl GameSnapshot {
    pub fn capture(grid: &Grid, score: u32, combo: u32, turn: u32, shuffled: bool, seed: u32) -> Self {
        let cells: Vec<Option<TileSnapshot>> = grid
            .positions()
            .map(|p| grid.get(p).map(TileSnapshot::from))
            .collect();
        let board_hash = board_hash(grid.width(), grid.height(), &cells);
        Self {
            width: grid.width(),
            height: grid.height(),
            cells,
            score,
            combo,
            turn,
            shuffled,
            seed,
            board_hash,
        }
    }

    pub fn get(&self, pos: Pos) -> Option<&TileSnapshot> {
        if pos.row >= self.height || pos.col >= self.width {
            return None;
        }
        self.cells[pos.row * self.width + pos.col].as_ref()
    }

    pub fn is_settled(&self) -> bool {
        self.cells.iter().flatten().all(|c| !c.is_falling())
    }

    /// Count of special tiles currently on the board.
    pub fn special_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.special.is_some()).count()
    }
}

fn board_hash(width: usize, height: usize, cells: &[Option<TileSnapshot>]) -> u32 {
    const OFFSET: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    let mut h = OFFSET;
    let mut feed = |b: u8| {
        h ^= b as u32;
        h = h.wrapping_mul(PRIME);
    };
    for b in (width as u32).to_le_bytes().into_iter().chain((height as u32).to_le_bytes()) {
        feed(b);
    }
    for cell in cells {
        feed(cell.map_or(0, |c| c.code()));
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_tracks_colors_not_ids() {
        let a = Grid::from_pattern(&["RGB", "GBR"]).unwrap();
        let mut b = a.clone();
        b.update(Pos::new(0, 0), |t| t.id = 500);
        let sa = GameSnapshot::capture(&a, 0, 0, 0, false, 1);
        let sb = GameSnapshot::capture(&b, 0, 0, 0, false, 1);
        assert_eq!(sa.board_hash, sb.board_hash);

        let c = Grid::from_pattern(&["GRB", "GBR"]).unwrap();
        let sc = GameSnapshot::capture(&c, 0, 0, 0, false, 1);
        assert_ne!(sa.board_hash, sc.board_hash);
    }

    #[test]
    fn test_special_changes_code() {
        let plain = Tile::normal(1, TileColor::Blue);
        let bomb = Tile::special(1, TileColor::Blue, SpecialKind::Bomb);
        assert_eq!(TileSnapshot::from(&plain).code(), 13);
        assert_eq!(TileSnapshot::from(&bomb).code(), 16);
    }

    #[test]
    fn test_falling_time_exposed() {
        let mut grid = Grid::from_pattern(&["R"]).unwrap();
        grid.update(Pos::new(0, 0), |t| t.state = TileState::Falling { remaining_ms: 120 });
        let snap = GameSnapshot::capture(&grid, 0, 0, 0, false, 1);
        assert_eq!(snap.get(Pos::new(0, 0)).map(|c| c.falling_ms), Some(120));
        assert!(!snap.is_settled());
    }
}
