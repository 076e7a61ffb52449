//! GameView: maps a core `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, TileSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Pos, SpecialKind, TileColor};

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
const CURSOR_BG: Rgb = Rgb::new(90, 90, 110);
const SELECTED_BG: Rgb = Rgb::new(150, 120, 40);
const HINT_BG: Rgb = Rgb::new(40, 90, 60);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Front-end state drawn over the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardOverlay<'a> {
    pub cursor: Option<Pos>,
    pub selected: Option<Pos>,
    pub hint: Option<(Pos, Pos)>,
    /// One-line status shown under the score panel
    pub message: Option<&'a str>,
}

/// A lightweight terminal renderer for the match-3 board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self { cell_w: 2, cell_h: 1 }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Top-left corner of the board frame for a given snapshot and viewport.
    pub fn frame_origin(&self, snap: &GameSnapshot, viewport: Viewport) -> (u16, u16) {
        let (frame_w, frame_h) = self.frame_size(snap);
        (
            viewport.width.saturating_sub(frame_w) / 2,
            viewport.height.saturating_sub(frame_h) / 2,
        )
    }

    /// Render into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, overlay: &BoardOverlay<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let (frame_w, frame_h) = self.frame_size(snap);
        let (start_x, start_y) = self.frame_origin(snap, viewport);

        let border = CellStyle::fg_on(Rgb::new(200, 200, 200), PANEL_BG);
        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            frame_w.saturating_sub(2),
            frame_h.saturating_sub(2),
            ' ',
            CellStyle::fg_on(BOARD_BG, BOARD_BG),
        );
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for row in 0..snap.height {
            for col in 0..snap.width {
                let pos = Pos::new(row, col);
                let bg = cell_background(pos, overlay);
                match snap.get(pos) {
                    Some(tile) => self.draw_tile(fb, start_x, start_y, pos, tile, bg),
                    None => self.fill_cell(fb, start_x, start_y, pos, ' ', CellStyle::fg_on(bg, bg)),
                }
            }
        }

        self.draw_side_panel(fb, snap, overlay, viewport, start_x + frame_w);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, overlay: &BoardOverlay<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, overlay, viewport, &mut fb);
        fb
    }

    fn frame_size(&self, snap: &GameSnapshot) -> (u16, u16) {
        let w = (snap.width as u16).saturating_mul(self.cell_w).saturating_add(2);
        let h = (snap.height as u16).saturating_mul(self.cell_h).saturating_add(2);
        (w, h)
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '╭', style);
        fb.put_char(x + w - 1, y, '╮', style);
        fb.put_char(x, y + h - 1, '╰', style);
        fb.put_char(x + w - 1, y + h - 1, '╯', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_tile(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, pos: Pos, tile: &TileSnapshot, bg: Rgb) {
        let fg = tile_rgb(tile.color);
        let mut style = CellStyle::fg_on(fg, bg);
        if tile.special.is_some() {
            style = style.bold();
        }
        if tile.is_falling() {
            style = CellStyle { fg: fg.darken(150), ..style }.dim();
        }
        self.fill_cell(fb, start_x, start_y, pos, ' ', style);
        let (px, py) = self.cell_origin(start_x, start_y, pos);
        fb.put_char(px, py, tile_glyph(tile.special), style);
    }

    fn cell_origin(&self, start_x: u16, start_y: u16, pos: Pos) -> (u16, u16) {
        (
            start_x + 1 + pos.col as u16 * self.cell_w,
            start_y + 1 + pos.row as u16 * self.cell_h,
        )
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, pos: Pos, ch: char, style: CellStyle) {
        let (px, py) = self.cell_origin(start_x, start_y, pos);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        overlay: &BoardOverlay<'_>,
        viewport: Viewport,
        frame_right: u16,
    ) {
        let panel_x = frame_right.saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }
        let (_, start_y) = self.frame_origin(snap, viewport);

        let label = CellStyle::fg_on(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::fg_on(Rgb::new(200, 200, 200), PANEL_BG);
        let dim = value.dim();

        let mut y = start_y;
        for (name, v) in [("SCORE", snap.score), ("COMBO", snap.combo), ("TURN", snap.turn)] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, v, value);
            y = y.saturating_add(3);
        }

        if let Some(msg) = overlay.message {
            fb.put_str(panel_x, y, msg, value.bold());
        } else if snap.shuffled {
            fb.put_str(panel_x, y, "SHUFFLED", value.bold());
        }
        y = y.saturating_add(2);

        for help in ["arrows move", "space select", "? hint", "n new game", "q quit"] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, help, dim);
            y = y.saturating_add(1);
        }
    }
}

fn cell_background(pos: Pos, overlay: &BoardOverlay<'_>) -> Rgb {
    if overlay.selected == Some(pos) {
        SELECTED_BG
    } else if overlay.cursor == Some(pos) {
        CURSOR_BG
    } else if overlay.hint.is_some_and(|(a, b)| a == pos || b == pos) {
        HINT_BG
    } else {
        BOARD_BG
    }
}

pub fn tile_rgb(color: TileColor) -> Rgb {
    match color {
        TileColor::Red => Rgb::new(220, 80, 80),
        TileColor::Green => Rgb::new(100, 220, 120),
        TileColor::Blue => Rgb::new(80, 120, 220),
        TileColor::Yellow => Rgb::new(240, 220, 80),
        TileColor::Orange => Rgb::new(255, 165, 0),
        TileColor::Purple => Rgb::new(200, 120, 220),
        TileColor::Cyan => Rgb::new(80, 220, 220),
        TileColor::White => Rgb::new(235, 235, 235),
    }
}

pub fn tile_glyph(special: Option<SpecialKind>) -> char {
    match special {
        None => '●',
        Some(SpecialKind::LineRow) => '═',
        Some(SpecialKind::LineCol) => '║',
        Some(SpecialKind::Bomb) => '◉',
        Some(SpecialKind::ColorWipe) => '★',
        Some(SpecialKind::Lightning) => 'ϟ',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Grid;
    use crate::types::Tile;

    fn snapshot(rows: &[&str]) -> GameSnapshot {
        GameSnapshot::capture(&Grid::from_pattern(rows).unwrap(), 1200, 2, 5, false, 1)
    }

    #[test]
    fn test_board_is_centred_with_frame() {
        let snap = snapshot(&["RGB", "GBR"]);
        let fb = GameView::default().render(&snap, &BoardOverlay::default(), Viewport::new(40, 10));
        let (x, y) = GameView::default().frame_origin(&snap, Viewport::new(40, 10));
        assert_eq!((x, y), (16, 3));
        assert_eq!(fb.get(x, y).map(|c| c.ch), Some('╭'));
        assert_eq!(fb.get(x + 1, y + 1).map(|c| c.ch), Some('●'));
        assert_eq!(fb.get(x + 1, y + 1).map(|c| c.style.fg), Some(tile_rgb(TileColor::Red)));
    }

    #[test]
    fn test_panel_shows_score() {
        let snap = snapshot(&["RGB", "GBR"]);
        let fb = GameView::default().render(&snap, &BoardOverlay::default(), Viewport::new(40, 10));
        assert!((0..fb.height()).any(|y| fb.row_text(y).contains("1200")));
    }

    #[test]
    fn test_selected_and_special_cells() {
        let mut grid = Grid::from_pattern(&["RGB", "GBR"]).unwrap();
        grid.set(Pos::new(1, 2), Some(Tile::special(9, TileColor::Red, SpecialKind::Bomb)));
        let snap = GameSnapshot::capture(&grid, 0, 0, 0, false, 1);
        let overlay = BoardOverlay {
            cursor: Some(Pos::new(0, 1)),
            selected: Some(Pos::new(0, 0)),
            ..BoardOverlay::default()
        };
        let view = GameView::default();
        let vp = Viewport::new(40, 10);
        let fb = view.render(&snap, &overlay, vp);
        let (x, y) = view.frame_origin(&snap, vp);

        assert_eq!(fb.get(x + 1, y + 1).map(|c| c.style.bg), Some(SELECTED_BG));
        assert_eq!(fb.get(x + 3, y + 1).map(|c| c.style.bg), Some(CURSOR_BG));
        assert_eq!(fb.get(x + 5, y + 2).map(|c| c.ch), Some('◉'));
    }
}
