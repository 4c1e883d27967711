//! Healing in place.

use log::debug;
use rand::Rng;

use crate::effects::{Effects, FloatingText};
use crate::unit::Unit;

/// Result of a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestOutcome {
    /// Health gained, after clamping to the maximum. May be zero.
    Healed(i32),
    /// The unit was already at full health. Nothing changed.
    AlreadyFull,
}

/// Heal `unit` by a roll in `0..=rest_max` and mark it acted.
///
/// A unit already at full health is left untouched, including its acted
/// flag; the caller decides whether that still costs a turn.
pub fn rest(unit: &mut Unit, rest_max: i32, rng: &mut impl Rng, fx: &mut Effects) -> RestOutcome {
    let cell = unit.pos();
    if unit.is_full_health() {
        if let Some(c) = cell {
            fx.text(FloatingText::health_full(c));
        }
        return RestOutcome::AlreadyFull;
    }

    let roll = rng.random_range(0..=rest_max.max(0));
    let before = unit.health();
    unit.set_health(before + roll);
    let healed = unit.health() - before;
    unit.set_acted(true);

    if let Some(c) = cell {
        fx.text(FloatingText::heal(c, healed));
    }
    debug!("{} rests for {healed} health", unit.id());
    RestOutcome::Healed(healed)
}
