//! Turn controller - the engine's single entry point
//!
//! One call to [`Engine::request_swap`] runs a whole turn to completion:
//!
//! ```text
//! Idle -> ValidatingSwap -> Resolving -> Refilling -> CheckingCascade
//!                              ^                            |
//!                              +------- new matches --------+
//!                                                           |
//!                                     CheckingShuffle <-----+ stable
//!                                           |
//!                                          Idle
//! ```
//!
//! Rejected swaps and swaps that match nothing are ordinary outcomes and come
//! back as [`SwapResult::Rejected`]; the grid is left exactly as it was.
//!
//! Cleared tiles leave the grid immediately. The outcome lists each of them
//! with its prior color, kind and position (state `Dead`) so a presentation
//! layer can animate the removal after the fact. Tiles that moved or were
//! refilled are marked `Falling` until [`Engine::tick`] runs their timers down.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info, instrument, trace, warn};

use crate::config::EngineConfigExt;
use crate::error::{EngineError, EngineResult, SwapRejection};
use crate::grid::Grid;
use crate::matcher::{find_all_matches, Match};
use crate::rng::SimpleRng;
use crate::scoring::{score_pass, PassScore};
use crate::advisor::best_move;
use crate::shuffle::{has_legal_move, shuffle};
use crate::snapshot::GameSnapshot;
use crate::special::{ActivationRequest, FiredEffect, SpecialResolver};
use crate::types::{EngineConfig, Pos, Tile, TileId, TileState};

/// Turn controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TurnPhase {
    Idle,
    ValidatingSwap,
    Resolving,
    Refilling,
    CheckingCascade,
    CheckingShuffle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapResult {
    Applied,
    Rejected(SwapRejection),
}

/// A tile removed during a turn, as it was just before removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ClearedTile {
    pub pos: Pos,
    /// Prior color and kind; state is `Dead`
    pub tile: Tile,
    pub pass: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SpawnedSpecial {
    pub pos: Pos,
    pub tile: Tile,
    pub pass: u32,
}

/// Everything that happened in one resolve/refill pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub index: u32,
    pub matches: Vec<Match>,
    pub fired: Vec<FiredEffect>,
    pub score: PassScore,
}

/// Result of one engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub swap: SwapResult,
    pub cleared: Vec<ClearedTile>,
    pub spawned: Vec<SpawnedSpecial>,
    pub passes: Vec<PassReport>,
    pub score_delta: u32,
    /// Cascade passes after the initial one
    pub combo: u32,
    pub shuffled: bool,
    /// The shuffle gave up and the board was generated afresh
    pub regenerated: bool,
}

impl TurnOutcome {
    fn applied() -> Self {
        Self {
            swap: SwapResult::Applied,
            cleared: Vec::new(),
            spawned: Vec::new(),
            passes: Vec::new(),
            score_delta: 0,
            combo: 0,
            shuffled: false,
            regenerated: false,
        }
    }

    fn rejected(reason: SwapRejection) -> Self {
        Self {
            swap: SwapResult::Rejected(reason),
            ..Self::applied()
        }
    }

    pub fn is_applied(&self) -> bool {
        self.swap == SwapResult::Applied
    }

    /// Positions cleared during the turn, deduplicated.
    pub fn cleared_positions(&self) -> BTreeSet<Pos> {
        self.cleared.iter().map(|c| c.pos).collect()
    }
}

/// The match-3 engine.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    grid: Grid,
    rng: SimpleRng,
    resolver: SpecialResolver,
    next_id: TileId,
    score: u32,
    combo: u32,
    turn: u32,
    shuffled: bool,
    phase: TurnPhase,
}

impl Engine {
    /// Validate `config` and deal a fresh board with no matches and at least
    /// one legal move.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let mut engine = Self {
            rng: SimpleRng::new(config.seed),
            resolver: SpecialResolver::new(&config),
            grid: Grid::new(config.width, config.height),
            next_id: 1,
            score: 0,
            combo: 0,
            turn: 0,
            shuffled: false,
            phase: TurnPhase::Idle,
            config,
        };
        engine.deal();
        info!(
            width = engine.config.width,
            height = engine.config.height,
            colors = engine.config.color_count,
            seed = engine.config.seed,
            "new game"
        );
        Ok(engine)
    }

    /// Start from a prepared board. Dimensions come from the grid.
    ///
    /// The board is taken as-is: no initial shuffle and no resolution of
    /// matches already on it (see [`Engine::resolve_board`]).
    pub fn with_grid(config: EngineConfig, grid: Grid) -> EngineResult<Self> {
        let config = EngineConfig {
            width: grid.width(),
            height: grid.height(),
            ..config
        };
        config.validate()?;
        if let Some(id) = grid.find_duplicate_id() {
            return Err(EngineError::Pattern(format!("tile id {id} appears twice")));
        }
        Ok(Self {
            rng: SimpleRng::new(config.seed),
            resolver: SpecialResolver::new(&config),
            next_id: grid.max_id().map_or(1, |id| id + 1),
            grid,
            score: 0,
            combo: 0,
            turn: 0,
            shuffled: false,
            phase: TurnPhase::Idle,
            config,
        })
    }

    /// Throw away the current game and deal a new board.
    ///
    /// The random sequence continues, so consecutive games differ.
    pub fn new_game(&mut self, width: usize, height: usize, color_count: usize) -> EngineResult<()> {
        let config = self.config.clone().with_dimensions(width, height, color_count);
        config.validate()?;
        self.resolver = SpecialResolver::new(&config);
        self.config = config;
        self.score = 0;
        self.combo = 0;
        self.turn = 0;
        self.shuffled = false;
        self.phase = TurnPhase::Idle;
        self.deal();
        info!(width, height, colors = color_count, "new game");
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Cascade passes in the last applied turn.
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Applied turns so far.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// True when no tile is falling, i.e. swaps are accepted.
    pub fn is_settled(&self) -> bool {
        self.grid.tiles().all(|(_, t)| t.is_idle())
    }

    /// The highest-valued legal swap, if the board has one.
    pub fn hint(&self) -> Option<(Pos, Pos)> {
        best_move(&self.grid, &self.resolver).map(|m| (m.from, m.to))
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(
            &self.grid,
            self.score,
            self.combo,
            self.turn,
            self.shuffled,
            self.config.seed,
        )
    }

    /// Advance falling timers. Returns how many tiles came to rest.
    pub fn tick(&mut self, elapsed_ms: u32) -> usize {
        let mut landed = 0;
        for tile in self.grid.tiles_mut() {
            if let TileState::Falling { remaining_ms } = tile.state {
                let left = remaining_ms.saturating_sub(elapsed_ms);
                tile.state = if left == 0 {
                    landed += 1;
                    TileState::Idle
                } else {
                    TileState::Falling { remaining_ms: left }
                };
            }
        }
        landed
    }

    /// Swap the tile at `from` onto `to` and resolve the turn.
    #[instrument(level = "debug", skip(self), fields(turn = self.turn))]
    pub fn request_swap(&mut self, from: Pos, to: Pos) -> TurnOutcome {
        self.set_phase(TurnPhase::ValidatingSwap);
        self.combo = 0;
        if let Err(reason) = self.validate_swap(from, to) {
            return self.reject(from, to, reason);
        }

        self.grid.swap(from, to);
        let requests = self.resolver.swap_activations(&self.grid, from, to);
        let matches = find_all_matches(&self.grid);
        if requests.is_empty() && matches.is_empty() {
            self.grid.swap(from, to);
            return self.reject(from, to, SwapRejection::NoMatch);
        }

        self.turn += 1;
        let mut outcome = TurnOutcome::applied();
        self.run_cascade(matches, requests, Some((from, to)), &mut outcome);
        self.finish_turn(&mut outcome);
        outcome
    }

    /// Resolve matches already on the board without a player swap.
    ///
    /// Returns an applied outcome with no passes if the board is stable.
    pub fn resolve_board(&mut self) -> TurnOutcome {
        let mut outcome = TurnOutcome::applied();
        let matches = find_all_matches(&self.grid);
        if !matches.is_empty() {
            self.run_cascade(matches, Vec::new(), None, &mut outcome);
        }
        self.finish_turn(&mut outcome);
        outcome
    }

    /// Like [`Engine::request_swap`], but rejections come back as errors.
    pub fn try_swap(&mut self, from: Pos, to: Pos) -> EngineResult<TurnOutcome> {
        let outcome = self.request_swap(from, to);
        match outcome.swap {
            SwapResult::Applied => Ok(outcome),
            SwapResult::Rejected(reason) => Err(EngineError::InvalidSwap {
                a: from,
                b: to,
                reason,
            }),
        }
    }

    fn validate_swap(&self, from: Pos, to: Pos) -> Result<(), SwapRejection> {
        if !self.grid.is_in_bounds(from) || !self.grid.is_in_bounds(to) {
            return Err(SwapRejection::OutOfBounds);
        }
        if !from.is_adjacent(to) {
            return Err(SwapRejection::NotAdjacent);
        }
        if self.grid.get(from).is_none() || self.grid.get(to).is_none() {
            return Err(SwapRejection::EmptyCell);
        }
        if !self.is_settled() {
            return Err(SwapRejection::TileBusy);
        }
        Ok(())
    }

    fn reject(&mut self, from: Pos, to: Pos, reason: SwapRejection) -> TurnOutcome {
        debug!(%from, %to, %reason, "swap rejected");
        self.set_phase(TurnPhase::Idle);
        TurnOutcome::rejected(reason)
    }

    fn run_cascade(
        &mut self,
        mut matches: Vec<Match>,
        mut requests: Vec<ActivationRequest>,
        mut swap: Option<(Pos, Pos)>,
        outcome: &mut TurnOutcome,
    ) {
        let mut pass = 0u32;
        loop {
            self.set_phase(TurnPhase::Resolving);
            let report = self.resolve_pass(pass, matches, requests, swap, outcome);
            debug!(pass, score = report.score.total, matches = report.matches.len(), "pass resolved");
            outcome.score_delta = outcome.score_delta.saturating_add(report.score.total);
            outcome.passes.push(report);

            self.set_phase(TurnPhase::Refilling);
            self.refill();

            self.set_phase(TurnPhase::CheckingCascade);
            matches = find_all_matches(&self.grid);
            if matches.is_empty() {
                break;
            }
            pass += 1;
            requests = Vec::new();
            swap = None;
        }
        outcome.combo = pass;
        self.combo = pass;
        self.score = self.score.saturating_add(outcome.score_delta);
    }

    /// Clear matches and activations, then place earned specials.
    fn resolve_pass(
        &mut self,
        pass: u32,
        matches: Vec<Match>,
        mut requests: Vec<ActivationRequest>,
        swap: Option<(Pos, Pos)>,
        outcome: &mut TurnOutcome,
    ) -> PassReport {
        let mut doomed: BTreeSet<Pos> = matches
            .iter()
            .flat_map(|m| m.positions.iter().copied())
            .collect();

        // Specials caught in a match fire without a target.
        requests.extend(
            doomed
                .iter()
                .filter_map(|&p| self.grid.get(p).and_then(|t| ActivationRequest::chained(t, p))),
        );

        let spawns = self.resolver.spawns_for_matches(&matches, swap);

        let mut visited = HashSet::new();
        let resolution = self
            .resolver
            .resolve(&self.grid, requests, &mut visited, &mut self.rng);
        doomed.extend(resolution.affected.iter().copied());

        for &pos in &doomed {
            if let Some(mut tile) = self.grid.take(pos) {
                tile.state = TileState::Dead;
                outcome.cleared.push(ClearedTile { pos, tile, pass });
            }
        }

        for spawn in spawns {
            let tile = Tile::special(self.alloc_id(), spawn.color, spawn.kind);
            self.grid.set(spawn.pos, Some(tile));
            debug!(pos = %spawn.pos, kind = spawn.kind.as_str(), "special spawned");
            outcome.spawned.push(SpawnedSpecial {
                pos: spawn.pos,
                tile,
                pass,
            });
        }

        let score = score_pass(&self.config.scores, pass, &matches, &resolution.fired);
        PassReport {
            index: pass,
            matches,
            fired: resolution.fired,
            score,
        }
    }

    /// Compact columns, then fill the gaps from above with fresh tiles.
    fn refill(&mut self) {
        let per_row = self.config.fall_ms_per_row;
        for fall in self.grid.compact_columns() {
            let ms = (fall.rows() as u32).saturating_mul(per_row);
            self.grid.update(fall.to, |t| mark_falling(t, ms));
        }

        let palette = self.config.palette();
        for col in 0..self.grid.width() {
            let gap = (0..self.grid.height())
                .take_while(|&row| self.grid.get(Pos::new(row, col)).is_none())
                .count();
            for row in 0..gap {
                let Some(&color) = self.rng.choose(palette) else {
                    warn!(error = %EngineError::EmptyBoard, "refill skipped");
                    return;
                };
                let mut tile = Tile::normal(self.alloc_id(), color);
                mark_falling(&mut tile, (gap as u32).saturating_mul(per_row));
                self.grid.set(Pos::new(row, col), Some(tile));
            }
        }
    }

    fn finish_turn(&mut self, outcome: &mut TurnOutcome) {
        self.set_phase(TurnPhase::CheckingShuffle);
        self.shuffled = false;
        if !has_legal_move(&self.grid) {
            match shuffle(&mut self.grid, &mut self.rng, self.config.max_shuffle_attempts) {
                Ok(attempts) => debug!(attempts, "board shuffled"),
                Err(e) => {
                    warn!(error = %e, "shuffle failed, regenerating board");
                    self.deal();
                    outcome.regenerated = true;
                }
            }
            self.shuffled = true;
            outcome.shuffled = true;
        }

        if let Some(id) = self.grid.find_duplicate_id() {
            panic!("tile id {id} occupies more than one cell");
        }
        debug_assert!(self.grid.is_full(), "turn ended with empty cells");
        self.set_phase(TurnPhase::Idle);
    }

    /// Generate boards until one has a legal move; shuffle the last one if
    /// none did.
    fn deal(&mut self) {
        let palette = self.config.palette();
        for _ in 0..self.config.max_shuffle_attempts {
            self.grid = Grid::generate(
                self.config.width,
                self.config.height,
                palette,
                &mut self.rng,
                &mut self.next_id,
            );
            if has_legal_move(&self.grid) {
                return;
            }
        }
        if let Err(e) = shuffle(&mut self.grid, &mut self.rng, self.config.max_shuffle_attempts) {
            warn!(error = %e, "dealt board has no legal move");
        }
    }

    fn alloc_id(&mut self) -> TileId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn set_phase(&mut self, next: TurnPhase) {
        trace!(from = ?self.phase, to = ?next, "phase");
        self.phase = next;
    }
}

fn mark_falling(tile: &mut Tile, ms: u32) {
    if ms == 0 {
        return;
    }
    let current = match tile.state {
        TileState::Falling { remaining_ms } => remaining_ms,
        _ => 0,
    };
    tile.state = TileState::Falling {
        remaining_ms: current.max(ms),
    };
}
