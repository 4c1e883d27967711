//! Wargame: a turn-based tactics engine where heroes fight monsters on a
//! tile map.
//!
//! The [`Game`] turn manager is the entry point. Frontends feed it
//! [`Intent`]s, call [`Game::tick`] at a fixed rate, draw [`Game::frame`]
//! and play whatever [`Game::take_effects`] returns.

pub mod ai;
pub mod board;
pub mod combat;
pub mod config;
pub mod effects;
pub mod error;
pub mod game;
pub mod history;
pub mod mapgen;
pub mod motion;
pub mod rest;
pub mod save;
pub mod terrain;
pub mod unit;

pub use config::GameConfig;
pub use error::{MapGenError, PersistenceError, Result, WargameError};
pub use game::{Frame, Game, GameStatus, Intent, Phase, UnitView};
pub use save::{DirStore, MemoryStore, SaveStore};
pub use unit::{Archetype, Faction, Unit, UnitId};
