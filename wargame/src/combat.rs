//! Combat resolution between two units.
//!
//! An attack at distance 1 is a melee blow with a random strength in
//! `1..=melee`; farther away it is a ranged shot dealing exactly `ranged`.
//! A defender that survives and can reach the attacker strikes back with
//! the attacker's own power divided by the retaliation divisor.

use log::debug;
use rand::Rng;

use crate::effects::{DEFENDER_TEXT_DELAY, Effects, FloatingText, Sound};
use crate::unit::Unit;

/// Who, if anyone, died in an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatOutcome {
    None,
    AttackerDied,
    DefenderDied,
}

/// Full account of one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatReport {
    pub outcome: CombatOutcome,
    /// Damage dealt to the defender.
    pub damage: i32,
    /// Damage dealt back to the attacker, if the defender retaliated.
    pub retaliation: Option<i32>,
    pub ranged: bool,
}

/// Damage of an attack at `distance`.
pub fn roll_damage(attacker: &Unit, distance: i32, rng: &mut impl Rng) -> i32 {
    if distance == 1 {
        rng.random_range(1..=attacker.melee().max(1))
    } else {
        attacker.ranged()
    }
}

/// Resolve `attacker` striking `defender` from `distance` cells away.
///
/// The attacker is always marked acted. Dead units are flagged with
/// [`Unit::set_dead`]; removing them from the board is up to the caller.
pub fn resolve(
    attacker: &mut Unit,
    defender: &mut Unit,
    distance: i32,
    divisor: i32,
    rng: &mut impl Rng,
    fx: &mut Effects,
) -> CombatReport {
    let ranged = distance > 1;
    fx.sound(if ranged {
        Sound::RangedHit
    } else {
        Sound::MeleeHit
    });

    let damage = roll_damage(attacker, distance, rng);
    defender.set_health(defender.health() - damage);
    if let Some(c) = defender.pos() {
        fx.text(FloatingText::damage(c, damage, DEFENDER_TEXT_DELAY));
    }
    debug!(
        "{} hits {} for {damage} at distance {distance}",
        attacker.id(),
        defender.id()
    );

    let mut report = CombatReport {
        outcome: CombatOutcome::None,
        damage,
        retaliation: None,
        ranged,
    };

    if defender.health() > 0 {
        if defender.range() >= distance {
            let power = if ranged {
                attacker.ranged()
            } else {
                attacker.melee()
            };
            let back = power / divisor.max(1);
            attacker.set_health(attacker.health() - back);
            if let Some(c) = attacker.pos() {
                fx.text(FloatingText::damage(c, back, 0));
            }
            report.retaliation = Some(back);
            debug!("{} retaliates for {back}", defender.id());

            if attacker.health() <= 0 {
                attacker.set_dead(true);
                fx.sound(Sound::UnitDied(attacker.faction()));
                report.outcome = CombatOutcome::AttackerDied;
            }
        }
    } else {
        defender.set_dead(true);
        fx.sound(Sound::UnitDied(defender.faction()));
        report.outcome = CombatOutcome::DefenderDied;
    }

    attacker.set_acted(true);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{Archetype, UnitId};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use wargame_core::Point;

    fn unit(id: UnitId, a: Archetype, x: i32, y: i32) -> Unit {
        let mut u = Unit::new(id, a);
        u.set_pos(Some(Point::new(x, y)));
        u
    }

    #[test]
    fn melee_kill_has_no_retaliation() {
        let mut rng = SmallRng::seed_from_u64(8);
        for _ in 0..30 {
            let mut fx = Effects::new();
            // melee power 10
            let mut a = unit(UnitId::hero(0), Archetype::Archer, 1, 1);
            let mut d = unit(UnitId::monster(0), Archetype::Troll, 2, 1);
            d.set_health(5);
            let r = resolve(&mut a, &mut d, 1, 2, &mut rng, &mut fx);
            assert!((1..=10).contains(&r.damage));
            assert_eq!(d.health(), (5 - r.damage).max(0));
            assert!(!r.ranged);
            assert_eq!(fx.sounds[0], Sound::MeleeHit);
            if d.health() == 0 {
                assert_eq!(r.outcome, CombatOutcome::DefenderDied);
                assert!(d.is_dead());
                assert_eq!(r.retaliation, None);
                assert_eq!(a.health(), a.max_health());
                assert!(fx.sounds.contains(&Sound::UnitDied(crate::unit::Faction::Monster)));
            } else {
                // troll reach 1 retaliates with 10 / 2
                assert_eq!(r.retaliation, Some(5));
                assert_eq!(a.health(), 35);
            }
            assert!(a.has_acted());
        }
    }

    #[test]
    fn ranged_retaliation_uses_attacker_ranged_power() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut fx = Effects::new();
        // elf ranged 6, orc reach 2
        let mut a = unit(UnitId::hero(0), Archetype::Elf, 4, 1);
        let mut d = unit(UnitId::monster(0), Archetype::Orc, 2, 1);
        let r = resolve(&mut a, &mut d, 2, 2, &mut rng, &mut fx);
        assert!(r.ranged);
        assert_eq!(r.damage, 6);
        assert_eq!(d.health(), 34);
        assert_eq!(r.retaliation, Some(3));
        assert_eq!(a.health(), 67);
        assert_eq!(r.outcome, CombatOutcome::None);
        assert_eq!(fx.sounds, vec![Sound::RangedHit]);
        assert_eq!(fx.texts.len(), 2);
        assert_eq!(fx.texts[0].cell, Point::new(2, 1));
        assert_eq!(fx.texts[0].delay, DEFENDER_TEXT_DELAY);
        assert_eq!(fx.texts[1].cell, Point::new(4, 1));
    }

    #[test]
    fn out_of_reach_defender_cannot_retaliate() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut fx = Effects::new();
        let mut a = unit(UnitId::hero(0), Archetype::Elf, 5, 1);
        let mut d = unit(UnitId::monster(0), Archetype::Orc, 2, 1);
        let r = resolve(&mut a, &mut d, 3, 2, &mut rng, &mut fx);
        assert_eq!(r.retaliation, None);
        assert_eq!(a.health(), a.max_health());
        assert!(a.has_acted());
    }

    #[test]
    fn retaliation_can_kill_attacker() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut fx = Effects::new();
        // hobbit hits a troll; troll strikes back with 5 / 2 = 2
        let mut a = unit(UnitId::hero(0), Archetype::Hobbit, 1, 0);
        let mut d = unit(UnitId::monster(0), Archetype::Troll, 0, 0);
        a.set_health(2);
        let r = resolve(&mut a, &mut d, 1, 2, &mut rng, &mut fx);
        assert_eq!(r.retaliation, Some(2));
        assert_eq!(r.outcome, CombatOutcome::AttackerDied);
        assert!(a.is_dead());
        assert!(a.has_acted());
        assert_eq!(
            fx.sounds.last(),
            Some(&Sound::UnitDied(crate::unit::Faction::Hero))
        );
    }

    #[test]
    fn zero_ranged_power_deals_nothing_at_distance() {
        let mut rng = SmallRng::seed_from_u64(3);
        let a = unit(UnitId::hero(0), Archetype::Dwarf, 0, 0);
        assert_eq!(roll_damage(&a, 2, &mut rng), 0);
    }
}
