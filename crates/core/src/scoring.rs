//! Scoring module - per-pass points with a combo multiplier
//!
//! Each cascade pass is scored independently:
//!
//! ```text
//! pass_score = (sum of match shape points + sum of activation points) * multiplier
//! multiplier = 1 + pass_index
//! ```
//!
//! The first pass of a turn (the player's swap) has index 0, so only cascades
//! are multiplied. Every shape the matcher reports is scored, including
//! overlapping ones.

use crate::matcher::Match;
use crate::special::FiredEffect;
use crate::types::ScoreTable;

/// Score breakdown for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct PassScore {
    /// Points from match shapes, before the multiplier
    pub match_points: u32,
    /// Points from special activations, before the multiplier
    pub activation_points: u32,
    pub multiplier: u32,
    pub total: u32,
}

/// Combo multiplier for a zero-based pass index.
pub fn combo_multiplier(pass_index: u32) -> u32 {
    pass_index.saturating_add(1)
}

/// Sum of shape points for a set of matches.
pub fn match_points(table: &ScoreTable, matches: &[Match]) -> u32 {
    matches
        .iter()
        .map(|m| table.for_shape(m.shape))
        .fold(0u32, u32::saturating_add)
}

/// Score one pass.
pub fn score_pass(
    table: &ScoreTable,
    pass_index: u32,
    matches: &[Match],
    fired: &[FiredEffect],
) -> PassScore {
    let match_points = match_points(table, matches);
    let activation_points = fired
        .iter()
        .map(|f| f.base_score)
        .fold(0u32, u32::saturating_add);
    let multiplier = combo_multiplier(pass_index);
    PassScore {
        match_points,
        activation_points,
        multiplier,
        total: match_points
            .saturating_add(activation_points)
            .saturating_mul(multiplier),
    }
}
