//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the board rules and the turn state machine of the
//! match-3 engine. It has **no dependencies** on terminal, input or any other
//! I/O, making it:
//!
//! - **Deterministic**: the same seed produces identical games
//! - **Testable**: every rule is exercised by unit tests
//! - **Portable**: runs in the terminal front-end or headless
//!
//! # Module Structure
//!
//! - [`grid`]: the board, bounds and neighbour queries, column compaction
//! - [`matcher`]: lines, squares, corners and T shapes
//! - [`special`]: special-tile spawning, effects and chain reactions
//! - [`scoring`]: per-pass points and the combo multiplier
//! - [`shuffle`]: legal-move search and color reshuffling
//! - [`advisor`]: ranks legal swaps by what they would score
//! - [`engine`]: the turn controller, the only mutating entry point
//! - [`snapshot`]: a serializable view for presentation
//! - [`config`]: validation and JSON loading for [`types::EngineConfig`]
//!
//! # Game Rules
//!
//! - **Swap**: two edge-adjacent idle tiles; kept only if it forms a match or
//!   moves a special tile
//! - **Matches**: runs of 3, 4 and 5+, 2x2 squares, L corners and T shapes;
//!   overlapping shapes all score
//! - **Specials**: a run of 4 earns a line tile, a run of 5 a color-wipe, a
//!   square a lightning, a corner or T a bomb
//! - **Cascades**: each refill that forms new matches raises the multiplier
//! - **Shuffle**: a board with no legal move is re-colored in place
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{Engine, SwapResult};
//! use tui_match3_core::types::EngineConfig;
//!
//! let mut engine = Engine::new(EngineConfig::default().with_seed(12345)).unwrap();
//! let (from, to) = engine.hint().unwrap();
//!
//! let outcome = engine.request_swap(from, to);
//! assert_eq!(outcome.swap, SwapResult::Applied);
//! assert!(engine.score() > 0);
//! assert!(engine.grid().is_full());
//!
//! // Let the refilled tiles land before the next swap.
//! while !engine.is_settled() {
//!     engine.tick(16);
//! }
//! ```

pub mod advisor;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod matcher;
pub mod rng;
pub mod scoring;
pub mod shuffle;
pub mod snapshot;
pub mod special;

pub use tui_match3_types as types;

// Re-export commonly used types for convenience
pub use advisor::{best_move, evaluate_move, rank_moves, MoveEval};
pub use config::EngineConfigExt;
pub use engine::{ClearedTile, Engine, PassReport, SpawnedSpecial, SwapResult, TurnOutcome, TurnPhase};
pub use error::{EngineError, EngineResult, SwapRejection};
pub use grid::{Fall, Grid};
pub use matcher::{find_all_matches, has_match_at, Match};
pub use rng::SimpleRng;
pub use scoring::{score_pass, PassScore};
pub use shuffle::{find_legal_move, has_legal_move, shuffle};
pub use snapshot::{GameSnapshot, TileSnapshot};
pub use special::{Activation, ActivationRequest, Combo, Effect, FiredEffect, Resolution, SpecialResolver, SpecialSpawn};
