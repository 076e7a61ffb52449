//! Cursor and selection state for keyboard play.
//!
//! The player moves a cursor over the board, selects a tile, then selects an
//! edge-adjacent tile to request a swap. The selected tile moves onto the
//! second cell, which is the swap destination.

use crate::types::{BoardAction, Pos};

/// What a board action did to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorEvent {
    Moved(Pos),
    Selected(Pos),
    Deselected,
    /// Swap `from` onto `to`
    Swap { from: Pos, to: Pos },
    HintRequested,
    NewGameRequested,
    /// The action had no effect (e.g. moving into the border)
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Cursor {
    pos: Pos,
    selected: Option<Pos>,
    width: usize,
    height: usize,
}

impl Cursor {
    /// Cursor centred on a `width x height` board.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pos: Pos::new(height / 2, width / 2),
            selected: None,
            width,
            height,
        }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    /// Re-fit to new board dimensions, clamping the cursor and dropping any
    /// selection.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pos = Pos::new(
            self.pos.row.min(height.saturating_sub(1)),
            self.pos.col.min(width.saturating_sub(1)),
        );
        self.selected = None;
    }

    /// Select `from` and put the cursor on `to`, ready to confirm a hinted move.
    pub fn show_move(&mut self, from: Pos, to: Pos) {
        self.selected = Some(from);
        self.pos = to;
    }

    pub fn apply(&mut self, action: BoardAction) -> CursorEvent {
        match action {
            BoardAction::CursorUp => self.step(-1, 0),
            BoardAction::CursorDown => self.step(1, 0),
            BoardAction::CursorLeft => self.step(0, -1),
            BoardAction::CursorRight => self.step(0, 1),
            BoardAction::Select => self.select(),
            BoardAction::Cancel => {
                if self.selected.take().is_some() {
                    CursorEvent::Deselected
                } else {
                    CursorEvent::Ignored
                }
            }
            BoardAction::Hint => CursorEvent::HintRequested,
            BoardAction::NewGame => {
                self.selected = None;
                CursorEvent::NewGameRequested
            }
        }
    }

    fn step(&mut self, dr: isize, dc: isize) -> CursorEvent {
        match self.pos.offset(dr, dc) {
            Some(next) if next.row < self.height && next.col < self.width => {
                self.pos = next;
                CursorEvent::Moved(next)
            }
            _ => CursorEvent::Ignored,
        }
    }

    fn select(&mut self) -> CursorEvent {
        match self.selected {
            Some(sel) if sel == self.pos => {
                self.selected = None;
                CursorEvent::Deselected
            }
            Some(sel) if sel.is_adjacent(self.pos) => {
                self.selected = None;
                CursorEvent::Swap {
                    from: sel,
                    to: self.pos,
                }
            }
            _ => {
                self.selected = Some(self.pos);
                CursorEvent::Selected(self.pos)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_starts_centred_and_clamps() {
        let mut c = Cursor::new(8, 9);
        assert_eq!(c.pos(), Pos::new(4, 4));
        for _ in 0..10 {
            c.apply(BoardAction::CursorUp);
        }
        assert_eq!(c.pos().row, 0);
        assert_eq!(c.apply(BoardAction::CursorUp), CursorEvent::Ignored);
    }

    #[test]
    fn test_select_then_adjacent_requests_swap() {
        let mut c = Cursor::new(8, 9);
        assert_eq!(c.apply(BoardAction::Select), CursorEvent::Selected(Pos::new(4, 4)));
        c.apply(BoardAction::CursorRight);
        assert_eq!(
            c.apply(BoardAction::Select),
            CursorEvent::Swap {
                from: Pos::new(4, 4),
                to: Pos::new(4, 5)
            }
        );
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn test_select_far_cell_moves_selection() {
        let mut c = Cursor::new(8, 9);
        c.apply(BoardAction::Select);
        c.apply(BoardAction::CursorRight);
        c.apply(BoardAction::CursorRight);
        assert_eq!(c.apply(BoardAction::Select), CursorEvent::Selected(Pos::new(4, 6)));
    }

    #[test]
    fn test_cancel_and_reselect() {
        let mut c = Cursor::new(4, 4);
        assert_eq!(c.apply(BoardAction::Cancel), CursorEvent::Ignored);
        c.apply(BoardAction::Select);
        assert_eq!(c.apply(BoardAction::Select), CursorEvent::Deselected);
        c.apply(BoardAction::Select);
        assert_eq!(c.apply(BoardAction::Cancel), CursorEvent::Deselected);
    }

    #[test]
    fn test_resize_clamps() {
        let mut c = Cursor::new(8, 9);
        c.show_move(Pos::new(7, 7), Pos::new(8, 7));
        c.resize(4, 4);
        assert_eq!(c.pos(), Pos::new(3, 3));
        assert_eq!(c.selected(), None);
    }
}
