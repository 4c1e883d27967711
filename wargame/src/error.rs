//! Error taxonomy.
//!
//! Geometry, setup and persistence failures are hard errors returned to the
//! caller. Player and AI intents never fail: an intent that cannot be
//! applied is ignored and reported as `false` by the turn manager.

use thiserror::Error;
use wargame_core::{GeomError, Range};

use crate::config::ConfigError;
use crate::unit::Faction;

/// Map or roster generation could not complete. No partial game is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapGenError {
    #[error("spawn region for {0:?} is empty on this map")]
    EmptyRegion(Faction),
    #[error("no free passable cell left for a {faction:?} in {region}")]
    NoFreeCell { faction: Faction, region: Range },
    #[error("could not place {kind} decorations within the retry budget")]
    DecorationBudget { kind: &'static str },
}

/// Save or load failures. Propagated unchanged; corrupt saves are rejected.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("save I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save format error: {0}")]
    Format(#[from] serde_json::Error),
    #[error("save version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error("save is corrupt: {0}")]
    Corrupt(String),
    #[error("save slot {0} is empty")]
    EmptySlot(usize),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum WargameError {
    #[error(transparent)]
    InvalidPosition(#[from] GeomError),
    #[error("map generation failed: {0}")]
    MapGeneration(#[from] MapGenError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type Result<T, E = WargameError> = std::result::Result<T, E>;
