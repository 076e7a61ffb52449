//! Error types for the engine
//!
//! Expected outcomes (a rejected swap, a swap that matches nothing) are not
//! errors at the turn boundary; they come back inside `TurnOutcome`. The
//! variants below cover configuration problems and the engine's internal
//! fall-back paths.

use std::fmt;

use thiserror::Error;

use crate::types::Pos;

/// Why a swap request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapRejection {
    OutOfBounds,
    NotAdjacent,
    EmptyCell,
    /// One of the tiles is still falling
    TileBusy,
    /// The swap formed no match and involved no special tile
    NoMatch,
}

impl fmt::Display for SwapRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OutOfBounds => "cell out of bounds",
            Self::NotAdjacent => "cells are not adjacent",
            Self::EmptyCell => "cell is empty",
            Self::TileBusy => "tile is not idle",
            Self::NoMatch => "swap forms no match",
        };
        f.write_str(s)
    }
}

/// Errors that can occur in the engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid swap {a} <-> {b}: {reason}")]
    InvalidSwap {
        a: Pos,
        b: Pos,
        reason: SwapRejection,
    },

    #[error("no colors available on the board")]
    EmptyBoard,

    #[error("shuffle found no legal configuration after {attempts} attempts")]
    MalformedShuffle { attempts: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid board pattern: {0}")]
    Pattern(String),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
