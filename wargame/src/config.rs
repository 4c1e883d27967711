//! Game configuration: map size, roster sizes and every tuning constant.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("map must be at least 2x1, got {width}x{height}")]
    MapTooSmall { width: i32, height: i32 },
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("low-health threshold must be within 0..=100, got {0}")]
    Threshold(String),
    #[error("cannot read configuration {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

/// Every tunable of a game. Missing fields in a config file fall back to
/// [`GameConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub heroes: usize,
    pub monsters: usize,

    /// Obstruction and decoration counts scattered by map generation.
    pub rocks: usize,
    pub trees: usize,
    pub straw: usize,

    /// Columns kept free between the monster half and the hero spawn area.
    pub spawn_margin: i32,
    /// Random draws tried before falling back to a full region scan.
    pub spawn_retries: u32,
    /// Draws allowed per decoration before map generation gives up.
    pub decoration_retries: u32,

    /// Upper bound (inclusive) of a rest heal roll.
    pub rest_max: i32,
    pub retaliation_divisor: i32,
    /// Monsters below this health percentage rest instead of acting.
    pub low_health_percent: f64,

    pub cell_px: i32,
    /// Pixel offset applied on the first frame of a move.
    pub move_step: i32,
    /// Pixels added to the offset every tick while moving.
    pub move_speed: i32,
    pub animation_frames: u8,
    pub ticks_per_second: u32,
    pub monster_pacing_ms: u32,
    pub death_anim_ms: u32,

    pub history_capacity: usize,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 25,
            height: 15,
            heroes: 6,
            monsters: 15,
            rocks: 10,
            trees: 15,
            straw: 10,
            spawn_margin: 1,
            spawn_retries: 1000,
            decoration_retries: 1000,
            rest_max: 10,
            retaliation_divisor: 2,
            low_health_percent: 10.0,
            cell_px: 32,
            move_step: 2,
            move_speed: 4,
            animation_frames: 3,
            ticks_per_second: 30,
            monster_pacing_ms: 100,
            death_anim_ms: 350,
            history_capacity: 100,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse a JSON configuration.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| ConfigError::Unreadable {
            path: "<inline>".into(),
            reason: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let unreadable = |reason: String| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        let cfg: Self = serde_json::from_str(&text).map_err(|e| unreadable(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check that every value is usable by the engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 2 || self.height < 1 {
            return Err(ConfigError::MapTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        let positive = [
            ("retaliation_divisor", self.retaliation_divisor > 0),
            ("cell_px", self.cell_px > 0),
            ("move_speed", self.move_speed > 0),
            ("move_step", self.move_step > 0),
            ("animation_frames", self.animation_frames > 0),
            ("ticks_per_second", self.ticks_per_second > 0),
            ("history_capacity", self.history_capacity > 0),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, ok)| !ok) {
            return Err(ConfigError::NotPositive(*name));
        }
        if self.rest_max < 0 {
            return Err(ConfigError::NotPositive("rest_max"));
        }
        if !(0.0..=100.0).contains(&self.low_health_percent) {
            return Err(ConfigError::Threshold(self.low_health_percent.to_string()));
        }
        Ok(())
    }

    /// Ticks to wait between two monster actions.
    pub fn pacing_ticks(&self) -> u32 {
        ms_to_ticks(self.monster_pacing_ms, self.ticks_per_second)
    }

    /// Ticks between two steps of the death animation.
    pub fn death_anim_ticks(&self) -> u32 {
        ms_to_ticks(self.death_anim_ms, self.ticks_per_second).max(1)
    }
}

fn ms_to_ticks(ms: u32, tps: u32) -> u32 {
    ((u64::from(ms) * u64::from(tps)) / 1000) as u32
}
