//! Presentation events produced by the simulation.
//!
//! The engine never plays sounds or draws text itself. It queues what
//! happened in an [`Effects`] outbox that a frontend drains once per tick.

use wargame_core::Point;

use crate::unit::Faction;

/// Audio triggers. Fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    MeleeHit,
    RangedHit,
    MoveStart,
    UnitDied(Faction),
    Victory,
    Defeat,
}

/// Color class of a floating message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Negative,
    Positive,
    Neutral,
}

/// Vertical drift of a floating message while it fades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drift {
    Up,
    Down,
    Still,
}

/// Text shown above a cell for a short while.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatingText {
    pub cell: Point,
    pub text: String,
    pub tone: Tone,
    pub drift: Drift,
    /// Ticks to wait before showing the text.
    pub delay: u32,
}

/// Delay of the damage number shown on the defender, so that it appears
/// after the attack animation.
pub const DEFENDER_TEXT_DELAY: u32 = 30;

impl FloatingText {
    pub fn damage(cell: Point, amount: i32, delay: u32) -> Self {
        Self {
            cell,
            text: format!("-{amount}"),
            tone: Tone::Negative,
            drift: Drift::Down,
            delay,
        }
    }

    pub fn heal(cell: Point, amount: i32) -> Self {
        Self {
            cell,
            text: format!("+ {amount}"),
            tone: Tone::Positive,
            drift: Drift::Up,
            delay: 0,
        }
    }

    pub fn health_full(cell: Point) -> Self {
        Self {
            cell,
            text: "Health full".into(),
            tone: Tone::Neutral,
            drift: Drift::Still,
            delay: 0,
        }
    }
}

/// Pending sounds and floating texts, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    pub sounds: Vec<Sound>,
    pub texts: Vec<FloatingText>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sound(&mut self, s: Sound) {
        self.sounds.push(s);
    }

    pub fn text(&mut self, t: FloatingText) {
        self.texts.push(t);
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty() && self.texts.is_empty()
    }

    /// Take every pending effect, leaving the outbox empty.
    pub fn drain(&mut self) -> Effects {
        std::mem::take(self)
    }
}
