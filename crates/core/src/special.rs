//! Special-tile resolver
//!
//! Decides which special tile a match earns and where it goes, and computes
//! what a special tile clears when it fires.
//!
//! Chain reactions run on an explicit worklist with a visited-id set rather
//! than recursion: a special tile fires at most once per resolution even when
//! several effects reach it, and the loop always terminates.

use std::collections::{BTreeSet, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::grid::Grid;
use crate::matcher::Match;
use crate::rng::SimpleRng;
use crate::types::{
    Axis, EngineConfig, MatchShape, Pos, ScoreTable, SpecialKind, Tile, TileColor, TileId,
};

/// Effects produced by swapping two special tiles into each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Combo {
    /// Two line tiles: the full row and column through the cell
    Cross,
    /// Line and bomb: 3-wide row and column bands
    WideCross,
    /// Two bombs: a bomb with one extra ring
    MegaBomb,
    /// Bomb and lightning: a square of radius [`ENERGIZED_RADIUS`]
    EnergizedBomb,
    /// Line and lightning: every row, top to bottom
    RocketLightning,
    /// Two lightnings: both board diagonals plus the middle row and column
    LightningCross,
}

/// Reach of an energized bomb.
pub const ENERGIZED_RADIUS: usize = 5;

/// Side branches of a lightning strike, each one row taller than the last.
const LIGHTNING_BRANCHES: usize = 2;

/// What an activation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Effect {
    /// A single special tile. `target` is only read by color-wipes: `None`
    /// means the wipe picks a random color present on the board.
    Special {
        kind: SpecialKind,
        target: Option<TileColor>,
    },
    Combo(Combo),
}

/// A pending activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationRequest {
    /// Tile that fires; guards against firing twice
    pub origin: TileId,
    /// Second tile consumed by a combo
    pub partner: Option<TileId>,
    pub pos: Pos,
    pub effect: Effect,
}

impl ActivationRequest {
    /// Activation of a special tile hit indirectly (no explicit target).
    pub fn chained(tile: &Tile, pos: Pos) -> Option<Self> {
        let kind = tile.kind.special()?;
        Some(Self {
            origin: tile.id,
            partner: None,
            pos,
            effect: Effect::Special { kind, target: None },
        })
    }

    fn direct(tile: &Tile, pos: Pos, target: Option<TileColor>) -> Option<Self> {
        let kind = tile.kind.special()?;
        Some(Self {
            origin: tile.id,
            partner: None,
            pos,
            effect: Effect::Special { kind, target },
        })
    }
}

/// Result of firing one special tile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activation {
    /// Occupied cells cleared by the effect, the firing cell included
    pub affected: Vec<Pos>,
    /// Other special tiles inside the effect
    pub chained: Vec<ActivationRequest>,
}

/// Record of an effect that fired, for scoring and presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct FiredEffect {
    pub origin: TileId,
    pub pos: Pos,
    pub effect: Effect,
    pub base_score: u32,
}

/// Union of a full chain reaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub affected: BTreeSet<Pos>,
    pub fired: Vec<FiredEffect>,
}

/// A special tile earned by a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SpecialSpawn {
    pub pos: Pos,
    pub kind: SpecialKind,
    pub color: TileColor,
}

/// Stateless resolver parameterised by the engine configuration.
#[derive(Debug, Clone, Copy)]
pub struct SpecialResolver {
    scores: ScoreTable,
    bomb_radius: usize,
}

impl SpecialResolver {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            scores: config.scores,
            bomb_radius: config.bomb_radius,
        }
    }

    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    /// Which special tile, if any, a match earns and where it is placed.
    ///
    /// `swap` is `(source, destination)` when the match came from a player
    /// swap. The destination wins if the match covers it, then the source;
    /// otherwise the match's first cell in scan order.
    pub fn spawn_for_match(&self, m: &Match, swap: Option<(Pos, Pos)>) -> Option<SpecialSpawn> {
        let kind = match m.shape {
            MatchShape::Line3 => return None,
            MatchShape::Line4 => match m.axis {
                Some(Axis::Vertical) => SpecialKind::LineCol,
                _ => SpecialKind::LineRow,
            },
            MatchShape::Line5 => SpecialKind::ColorWipe,
            MatchShape::Square => SpecialKind::Lightning,
            MatchShape::Corner | MatchShape::TShape => SpecialKind::Bomb,
        };
        let pos = match swap {
            Some((_, to)) if m.contains(to) => to,
            Some((from, _)) if m.contains(from) => from,
            _ => m.anchor(),
        };
        Some(SpecialSpawn {
            pos,
            kind,
            color: m.color,
        })
    }

    /// Spawns earned by a whole pass, at most one per cell.
    ///
    /// Corners and T shapes claim a contested cell first, then squares, then
    /// runs of five and four.
    pub fn spawns_for_matches(&self, matches: &[Match], swap: Option<(Pos, Pos)>) -> Vec<SpecialSpawn> {
        let mut ranked: Vec<&Match> = matches.iter().collect();
        ranked.sort_by_key(|m| spawn_priority(m.shape));

        let mut spawns: Vec<SpecialSpawn> = Vec::new();
        for spawn in ranked.into_iter().filter_map(|m| self.spawn_for_match(m, swap)) {
            if !spawns.iter().any(|s| s.pos == spawn.pos) {
                spawns.push(spawn);
            }
        }
        spawns
    }

    /// Activations caused by a player swap that has already been applied.
    ///
    /// `from` now holds the tile that was at `to`, and `to` holds the tile the
    /// player moved. A special swapped with a plain tile fires on its own (a
    /// color-wipe targets the plain tile's color). Two specials combine; a
    /// color-wipe in a pair targets its partner's color and the partner fires
    /// normally.
    pub fn swap_activations(&self, grid: &Grid, from: Pos, to: Pos) -> Vec<ActivationRequest> {
        let (Some(moved), Some(other)) = (grid.get(to).copied(), grid.get(from).copied()) else {
            return Vec::new();
        };

        match (moved.kind.special(), other.kind.special()) {
            (None, None) => Vec::new(),
            (Some(_), None) => wipe_aware(&moved, to, &other).into_iter().collect(),
            (None, Some(_)) => wipe_aware(&other, from, &moved).into_iter().collect(),
            (Some(a), Some(b)) => {
                if a == SpecialKind::ColorWipe || b == SpecialKind::ColorWipe {
                    return [wipe_aware(&moved, to, &other), wipe_aware(&other, from, &moved)]
                        .into_iter()
                        .flatten()
                        .collect();
                }
                vec![ActivationRequest {
                    origin: moved.id,
                    partner: Some(other.id),
                    pos: to,
                    effect: Effect::Combo(combine(a, b)),
                }]
            }
        }
    }

    /// Fire a single special tile.
    ///
    /// A dead tile or a plain tile is a no-op.
    pub fn activate(
        &self,
        tile: &Tile,
        pos: Pos,
        grid: &Grid,
        target: Option<TileColor>,
        rng: &mut SimpleRng,
    ) -> Activation {
        if tile.is_dead() {
            return Activation::default();
        }
        match ActivationRequest::direct(tile, pos, target) {
            Some(req) => self.fire(&req, grid, rng),
            None => Activation::default(),
        }
    }

    /// Run a chain reaction to completion.
    ///
    /// Tiles already in `visited` never fire; every tile that fires is added.
    pub fn resolve(
        &self,
        grid: &Grid,
        requests: impl IntoIterator<Item = ActivationRequest>,
        visited: &mut HashSet<TileId>,
        rng: &mut SimpleRng,
    ) -> Resolution {
        let mut queue: VecDeque<ActivationRequest> = requests.into_iter().collect();
        let mut out = Resolution::default();

        while let Some(req) = queue.pop_front() {
            if !visited.insert(req.origin) {
                continue;
            }
            if let Some(partner) = req.partner {
                visited.insert(partner);
            }

            let activation = self.fire(&req, grid, rng);
            debug!(
                origin = req.origin,
                pos = %req.pos,
                effect = ?req.effect,
                cleared = activation.affected.len(),
                chained = activation.chained.len(),
                "special fired"
            );

            out.fired.push(FiredEffect {
                origin: req.origin,
                pos: req.pos,
                effect: req.effect,
                base_score: self.base_score(&req.effect),
            });
            out.affected.extend(activation.affected);
            queue.extend(
                activation
                    .chained
                    .into_iter()
                    .filter(|c| !visited.contains(&c.origin)),
            );
        }
        out
    }

    pub fn base_score(&self, effect: &Effect) -> u32 {
        match effect {
            Effect::Special { kind, .. } => self.scores.for_special(*kind),
            Effect::Combo(Combo::Cross) => self.scores.cross,
            Effect::Combo(Combo::WideCross) => self.scores.wide_cross,
            Effect::Combo(Combo::MegaBomb) => self.scores.mega_bomb,
            Effect::Combo(Combo::EnergizedBomb) => self.scores.energized_bomb,
            Effect::Combo(Combo::RocketLightning) => self.scores.rocket_lightning,
            Effect::Combo(Combo::LightningCross) => self.scores.lightning_cross,
        }
    }

    fn fire(&self, req: &ActivationRequest, grid: &Grid, rng: &mut SimpleRng) -> Activation {
        let mut cells: BTreeSet<Pos> = BTreeSet::new();
        cells.insert(req.pos);

        match req.effect {
            Effect::Special { kind, target } => match kind {
                SpecialKind::LineRow => cells.extend(band(grid, req.pos, 0, Axis::Horizontal)),
                SpecialKind::LineCol => cells.extend(band(grid, req.pos, 0, Axis::Vertical)),
                SpecialKind::Bomb => cells.extend(square(grid, req.pos, self.bomb_radius)),
                SpecialKind::ColorWipe => {
                    if let Some(color) = target.or_else(|| random_color(grid, req.origin, rng)) {
                        cells.extend(grid.tiles().filter(|(_, t)| t.color == color).map(|(p, _)| p));
                    }
                }
                SpecialKind::Lightning => cells.extend(lightning(grid, req.pos)),
            },
            Effect::Combo(Combo::Cross) => {
                cells.extend(band(grid, req.pos, 0, Axis::Horizontal));
                cells.extend(band(grid, req.pos, 0, Axis::Vertical));
            }
            Effect::Combo(Combo::WideCross) => {
                cells.extend(band(grid, req.pos, 1, Axis::Horizontal));
                cells.extend(band(grid, req.pos, 1, Axis::Vertical));
            }
            Effect::Combo(Combo::MegaBomb) => {
                cells.extend(square(grid, req.pos, self.bomb_radius.saturating_add(1)));
            }
            Effect::Combo(Combo::EnergizedBomb) => {
                cells.extend(square(grid, req.pos, ENERGIZED_RADIUS));
            }
            Effect::Combo(Combo::RocketLightning) => cells.extend(grid.positions()),
            Effect::Combo(Combo::LightningCross) => cells.extend(lightning_cross(grid)),
        }

        let mut activation = Activation::default();
        for pos in cells {
            let Some(tile) = grid.get(pos) else {
                continue;
            };
            activation.affected.push(pos);
            if tile.id != req.origin && Some(tile.id) != req.partner && !tile.is_dead() {
                activation.chained.extend(ActivationRequest::chained(tile, pos));
            }
        }
        activation
    }
}

/// Combo for two specials, neither of them a color-wipe.
fn combine(a: SpecialKind, b: SpecialKind) -> Combo {
    use SpecialKind::{Bomb, Lightning};
    match (a, b) {
        (Lightning, Lightning) => Combo::LightningCross,
        (Bomb, Lightning) | (Lightning, Bomb) => Combo::EnergizedBomb,
        (Lightning, _) | (_, Lightning) => Combo::RocketLightning,
        (Bomb, Bomb) => Combo::MegaBomb,
        _ if a.is_line() && b.is_line() => Combo::Cross,
        _ => Combo::WideCross,
    }
}

fn spawn_priority(shape: MatchShape) -> u8 {
    match shape {
        MatchShape::Corner | MatchShape::TShape => 0,
        MatchShape::Square => 1,
        MatchShape::Line5 => 2,
        MatchShape::Line4 => 3,
        MatchShape::Line3 => 4,
    }
}

fn wipe_aware(special: &Tile, pos: Pos, partner: &Tile) -> Option<ActivationRequest> {
    let target = (special.kind.special() == Some(SpecialKind::ColorWipe)).then_some(partner.color);
    ActivationRequest::direct(special, pos, target)
}

/// Uniformly random color among live tiles other than the firing one.
fn random_color(grid: &Grid, origin: TileId, rng: &mut SimpleRng) -> Option<TileColor> {
    let mut colors: Vec<TileColor> = grid
        .tiles()
        .filter(|(_, t)| t.id != origin && !t.is_dead())
        .map(|(_, t)| t.color)
        .collect();
    colors.sort_unstable();
    colors.dedup();

    let picked = rng.choose(&colors).copied();
    if picked.is_none() {
        warn!(origin, "color-wipe fired with no colors on the board");
    }
    picked
}

/// Full rows (horizontal) or columns (vertical) within `half_width` of `pos`.
fn band(grid: &Grid, pos: Pos, half_width: usize, axis: Axis) -> impl Iterator<Item = Pos> + '_ {
    let (center, extent) = match axis {
        Axis::Horizontal => (pos.row, grid.height()),
        Axis::Vertical => (pos.col, grid.width()),
    };
    let lo = center.saturating_sub(half_width);
    let hi = center.saturating_add(half_width).min(extent.saturating_sub(1));
    grid.positions().filter(move |p| {
        let v = match axis {
            Axis::Horizontal => p.row,
            Axis::Vertical => p.col,
        };
        (lo..=hi).contains(&v)
    })
}

/// Square of side `2 * radius + 1` centred on `pos`, clipped to the board.
fn square(grid: &Grid, pos: Pos, radius: usize) -> impl Iterator<Item = Pos> + '_ {
    let rows = pos.row.saturating_sub(radius)..=pos.row.saturating_add(radius).min(grid.height().saturating_sub(1));
    let cols = pos.col.saturating_sub(radius)..=pos.col.saturating_add(radius).min(grid.width().saturating_sub(1));
    rows.flat_map(move |r| cols.clone().map(move |c| Pos::new(r, c)))
}

/// The full column through `pos`, plus columns at distance `d` on either
/// side covering rows `row - d ..= row + d`.
fn lightning(grid: &Grid, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
    grid.positions().filter(move |p| {
        let d = p.col.abs_diff(pos.col);
        d == 0 || (d <= LIGHTNING_BRANCHES && p.row.abs_diff(pos.row) <= d)
    })
}

/// Both diagonals from the top corners, the middle column and the middle row.
fn lightning_cross(grid: &Grid) -> impl Iterator<Item = Pos> + '_ {
    let (w, h) = (grid.width(), grid.height());
    grid.positions().filter(move |p| {
        p.row == p.col || p.row + p.col + 1 == w || p.col == w / 2 || p.row == h / 2
    })
}
