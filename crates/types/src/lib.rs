//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! Everything here is plain data with no game logic, so the same types can be
//! used by the engine, the terminal view and the input layer.
//!
//! # Coordinates
//!
//! Positions are `(row, col)` with row 0 at the top of the board and column 0
//! on the left. Tiles fall towards larger row indices.
//!
//! # Default configuration
//!
//! | Field | Value | Description |
//! |-------|-------|-------------|
//! | `width` | 8 | Columns |
//! | `height` | 9 | Rows |
//! | `color_count` | 5 | Palette entries in play |
//! | `bomb_radius` | 2 | Bomb clears a 5x5 square |
//! | `fall_ms_per_row` | 60 | Falling timer per row fallen |
//! | `max_shuffle_attempts` | 100 | Shuffle retries before regeneration |
//!
//! # Examples
//!
//! ```
//! use tui_match3_types::{BoardAction, Pos, TileColor};
//!
//! let color = TileColor::from_str("r").unwrap();
//! assert_eq!(color, TileColor::Red);
//!
//! let a = Pos::new(2, 3);
//! assert!(a.is_adjacent(Pos::new(2, 4)));
//! assert!(!a.is_adjacent(Pos::new(3, 4)));
//!
//! assert_eq!(BoardAction::from_str("hint"), Some(BoardAction::Hint));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default board width (columns).
pub const DEFAULT_WIDTH: usize = 8;

/// Default board height (rows).
pub const DEFAULT_HEIGHT: usize = 9;

/// Default number of palette colors in play.
pub const DEFAULT_COLOR_COUNT: usize = 5;

/// Smallest board edge the engine accepts.
pub const MIN_BOARD_EDGE: usize = 3;

/// Largest board edge the engine accepts.
pub const MAX_BOARD_EDGE: usize = 256;

/// Default bomb radius (2 = 5x5 area).
pub const DEFAULT_BOMB_RADIUS: usize = 2;

/// Default falling timer per row fallen, in milliseconds.
pub const DEFAULT_FALL_MS_PER_ROW: u32 = 60;

/// Largest falling timer per row the engine accepts, in milliseconds.
pub const MAX_FALL_MS_PER_ROW: u32 = 10_000;

/// Default number of shuffle attempts before regenerating the board.
pub const DEFAULT_MAX_SHUFFLE_ATTEMPTS: u32 = 100;

/// Fixed timestep used by the terminal runner (16ms ≈ 60 FPS).
pub const TICK_MS: u32 = 16;

/// A cell coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Offset by a signed delta. Returns `None` on underflow.
    ///
    /// Upper bounds are the grid's business, not the position's.
    pub fn offset(self, dr: isize, dc: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(dr)?,
            col: self.col.checked_add_signed(dc)?,
        })
    }

    /// True if the two positions share an edge.
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Unique tile identity. Ids are never reused within one engine.
pub type TileId = u64;

/// The fixed tile palette.
///
/// A game uses the first `color_count` entries of [`TileColor::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileColor {
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Purple,
    Cyan,
    White,
}

impl TileColor {
    pub const ALL: [Self; 8] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Yellow,
        Self::Orange,
        Self::Purple,
        Self::Cyan,
        Self::White,
    ];

    /// Parse a color from its single-letter code or full name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::TileColor;
    ///
    /// assert_eq!(TileColor::from_str("B"), Some(TileColor::Blue));
    /// assert_eq!(TileColor::from_str("orange"), Some(TileColor::Orange));
    /// assert_eq!(TileColor::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "r" | "red" => Some(Self::Red),
            "g" | "green" => Some(Self::Green),
            "b" | "blue" => Some(Self::Blue),
            "y" | "yellow" => Some(Self::Yellow),
            "o" | "orange" => Some(Self::Orange),
            "p" | "purple" => Some(Self::Purple),
            "c" | "cyan" => Some(Self::Cyan),
            "w" | "white" => Some(Self::White),
            _ => None,
        }
    }

    /// Single-letter code used by board patterns and the terminal view.
    pub fn code(&self) -> char {
        match self {
            Self::Red => 'R',
            Self::Green => 'G',
            Self::Blue => 'B',
            Self::Yellow => 'Y',
            Self::Orange => 'O',
            Self::Purple => 'P',
            Self::Cyan => 'C',
            Self::White => 'W',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Purple => "purple",
            Self::Cyan => "cyan",
            Self::White => "white",
        }
    }

    /// Palette slice for a game with `count` colors.
    pub fn palette(count: usize) -> &'static [Self] {
        &Self::ALL[..count.min(Self::ALL.len())]
    }
}

/// Special tile variants.
///
/// - **LineRow**: clears the whole row it sits in
/// - **LineCol**: clears the whole column it sits in
/// - **Bomb**: clears a square of `bomb_radius` around itself
/// - **ColorWipe**: clears every tile of one color
/// - **Lightning**: clears its column plus two widening side branches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpecialKind {
    LineRow,
    LineCol,
    Bomb,
    ColorWipe,
    Lightning,
}

impl SpecialKind {
    pub fn is_line(&self) -> bool {
        matches!(self, Self::LineRow | Self::LineCol)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LineRow => "lineRow",
            Self::LineCol => "lineCol",
            Self::Bomb => "bomb",
            Self::ColorWipe => "colorWipe",
            Self::Lightning => "lightning",
        }
    }
}

/// Whether a tile is plain or carries a special effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TileKind {
    Normal,
    Special(SpecialKind),
}

impl TileKind {
    pub fn special(&self) -> Option<SpecialKind> {
        match self {
            Self::Normal => None,
            Self::Special(kind) => Some(*kind),
        }
    }
}

/// Presentation-facing tile state.
///
/// `Falling` is a timing flag only; a falling tile is logically on the board
/// and can be matched or hit by effects. Only `Idle` tiles may be swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TileState {
    Idle,
    Falling { remaining_ms: u32 },
    Dead,
}

/// A single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub color: TileColor,
    pub kind: TileKind,
    pub state: TileState,
}

impl Tile {
    pub fn normal(id: TileId, color: TileColor) -> Self {
        Self {
            id,
            color,
            kind: TileKind::Normal,
            state: TileState::Idle,
        }
    }

    pub fn special(id: TileId, color: TileColor, kind: SpecialKind) -> Self {
        Self {
            id,
            color,
            kind: TileKind::Special(kind),
            state: TileState::Idle,
        }
    }

    pub fn is_special(&self) -> bool {
        matches!(self.kind, TileKind::Special(_))
    }

    pub fn is_idle(&self) -> bool {
        self.state == TileState::Idle
    }

    pub fn is_dead(&self) -> bool {
        self.state == TileState::Dead
    }
}

/// Run direction of a line match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Shape classification of a match.
///
/// `Line5` covers every straight run of five or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchShape {
    Line3,
    Line4,
    Line5,
    Square,
    Corner,
    TShape,
}

impl MatchShape {
    /// Line shape for a run of `len` tiles (`len >= 3`).
    pub fn for_run(len: usize) -> Self {
        match len {
            0..=3 => Self::Line3,
            4 => Self::Line4,
            _ => Self::Line5,
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Self::Line3 | Self::Line4 | Self::Line5)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line3 => "line3",
            Self::Line4 => "line4",
            Self::Line5 => "line5",
            Self::Square => "square",
            Self::Corner => "corner",
            Self::TShape => "tShape",
        }
    }
}

/// Fixed point table.
///
/// Match scores are per shape; activation scores are added once per special
/// tile (or combo) that fires. Both are summed per pass and then multiplied by
/// the pass's combo multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
    pub line3: u32,
    pub line4: u32,
    pub line5: u32,
    pub square: u32,
    pub corner: u32,
    pub t_shape: u32,
    pub line_clear: u32,
    pub bomb: u32,
    pub color_wipe: u32,
    pub lightning: u32,
    pub cross: u32,
    pub wide_cross: u32,
    pub mega_bomb: u32,
    pub energized_bomb: u32,
    pub rocket_lightning: u32,
    pub lightning_cross: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            line3: 100,
            line4: 400,
            line5: 1000,
            square: 800,
            corner: 600,
            t_shape: 800,
            line_clear: 500,
            bomb: 1000,
            color_wipe: 2000,
            lightning: 800,
            cross: 2000,
            wide_cross: 2500,
            mega_bomb: 3000,
            energized_bomb: 4000,
            rocket_lightning: 3500,
            lightning_cross: 3000,
        }
    }
}

impl ScoreTable {
    pub fn for_shape(&self, shape: MatchShape) -> u32 {
        match shape {
            MatchShape::Line3 => self.line3,
            MatchShape::Line4 => self.line4,
            MatchShape::Line5 => self.line5,
            MatchShape::Square => self.square,
            MatchShape::Corner => self.corner,
            MatchShape::TShape => self.t_shape,
        }
    }

    pub fn for_special(&self, kind: SpecialKind) -> u32 {
        match kind {
            SpecialKind::LineRow | SpecialKind::LineCol => self.line_clear,
            SpecialKind::Bomb => self.bomb,
            SpecialKind::ColorWipe => self.color_wipe,
            SpecialKind::Lightning => self.lightning,
        }
    }
}

/// Immutable parameter bundle consumed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: usize,
    pub height: usize,
    pub color_count: usize,
    pub seed: u32,
    pub scores: ScoreTable,
    pub bomb_radius: usize,
    pub fall_ms_per_row: u32,
    pub max_shuffle_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            color_count: DEFAULT_COLOR_COUNT,
            seed: 1,
            scores: ScoreTable::default(),
            bomb_radius: DEFAULT_BOMB_RADIUS,
            fall_ms_per_row: DEFAULT_FALL_MS_PER_ROW,
            max_shuffle_attempts: DEFAULT_MAX_SHUFFLE_ATTEMPTS,
        }
    }
}

impl EngineConfig {
    pub fn with_dimensions(mut self, width: usize, height: usize, color_count: usize) -> Self {
        self.width = width;
        self.height = height;
        self.color_count = color_count;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn palette(&self) -> &'static [TileColor] {
        TileColor::palette(self.color_count)
    }
}

/// Player-facing actions produced by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    /// Select the tile under the cursor, or swap with the selected tile
    Select,
    /// Drop the current selection
    Cancel,
    /// Move the cursor onto a suggested legal move
    Hint,
    NewGame,
}

impl BoardAction {
    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::BoardAction;
    ///
    /// assert_eq!(BoardAction::from_str("cursorLeft"), Some(BoardAction::CursorLeft));
    /// assert_eq!(BoardAction::from_str("select"), Some(BoardAction::Select));
    /// assert_eq!(BoardAction::from_str("fly"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cursorup" => Some(Self::CursorUp),
            "cursordown" => Some(Self::CursorDown),
            "cursorleft" => Some(Self::CursorLeft),
            "cursorright" => Some(Self::CursorRight),
            "select" => Some(Self::Select),
            "cancel" => Some(Self::Cancel),
            "hint" => Some(Self::Hint),
            "newgame" => Some(Self::NewGame),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CursorUp => "cursorUp",
            Self::CursorDown => "cursorDown",
            Self::CursorLeft => "cursorLeft",
            Self::CursorRight => "cursorRight",
            Self::Select => "select",
            Self::Cancel => "cancel",
            Self::Hint => "hint",
            Self::NewGame => "newGame",
        }
    }
}
