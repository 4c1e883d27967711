//! Units: one record type for every combatant, tagged by archetype.
//!
//! Heroes and monsters share [`Unit`]; what differs between them is the
//! stat template selected by [`Archetype`] and the [`Faction`] that decides
//! who controls them. The turn manager branches on the faction, units
//! carry no behavior of their own.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use wargame_core::Point;

use crate::motion::Motion;

/// Side a unit fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Hero,
    Monster,
}

impl Faction {
    /// Facing given to fresh or reloaded units: heroes look left, towards
    /// the monster half, and monsters look right.
    pub fn default_facing(self) -> Facing {
        match self {
            Faction::Hero => Facing::Left,
            Faction::Monster => Facing::Right,
        }
    }

    /// Archetypes a unit of this faction is drawn from.
    pub fn catalog(self) -> &'static [Archetype] {
        match self {
            Faction::Hero => HERO_ARCHETYPES,
            Faction::Monster => MONSTER_ARCHETYPES,
        }
    }
}

/// Named stat templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Archer,
    Dwarf,
    Elf,
    Hobbit,
    Troll,
    Orc,
    Goblin,
}

/// Fixed stats of an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub archetype: Archetype,
    pub faction: Faction,
    pub name: &'static str,
    pub max_health: i32,
    /// Sight radius, also the maximum distance at which the unit attacks
    /// or retaliates.
    pub range: i32,
    /// Upper bound of a melee damage roll.
    pub melee: i32,
    /// Fixed damage of a ranged shot.
    pub ranged: i32,
}

/// Static table of archetype definitions.
pub const STATS: &[Stats] = &[
    Stats {
        archetype: Archetype::Archer,
        faction: Faction::Hero,
        name: "archer",
        max_health: 40,
        range: 3,
        melee: 10,
        ranged: 2,
    },
    Stats {
        archetype: Archetype::Dwarf,
        faction: Faction::Hero,
        name: "dwarf",
        max_health: 80,
        range: 1,
        melee: 20,
        ranged: 0,
    },
    Stats {
        archetype: Archetype::Elf,
        faction: Faction::Hero,
        name: "elf",
        max_health: 70,
        range: 5,
        melee: 10,
        ranged: 6,
    },
    Stats {
        archetype: Archetype::Hobbit,
        faction: Faction::Hero,
        name: "hobbit",
        max_health: 20,
        range: 3,
        melee: 5,
        ranged: 2,
    },
    Stats {
        archetype: Archetype::Troll,
        faction: Faction::Monster,
        name: "troll",
        max_health: 100,
        range: 1,
        melee: 30,
        ranged: 0,
    },
    Stats {
        archetype: Archetype::Orc,
        faction: Faction::Monster,
        name: "orc",
        max_health: 40,
        range: 2,
        melee: 10,
        ranged: 3,
    },
    Stats {
        archetype: Archetype::Goblin,
        faction: Faction::Monster,
        name: "goblin",
        max_health: 20,
        range: 2,
        melee: 5,
        ranged: 2,
    },
];

pub const HERO_ARCHETYPES: &[Archetype] = &[
    Archetype::Archer,
    Archetype::Dwarf,
    Archetype::Elf,
    Archetype::Hobbit,
];

pub const MONSTER_ARCHETYPES: &[Archetype] =
    &[Archetype::Troll, Archetype::Orc, Archetype::Goblin];

impl Archetype {
    /// Stats for this archetype.
    pub fn stats(self) -> &'static Stats {
        // STATS lists the variants in declaration order.
        &STATS[self as usize]
    }

    pub fn faction(self) -> Faction {
        self.stats().faction
    }

    /// Uniform pick from a faction's catalog.
    pub fn random(faction: Faction, rng: &mut impl Rng) -> Archetype {
        let catalog = faction.catalog();
        catalog[rng.random_range(0..catalog.len())]
    }
}

/// Direction a unit sprite faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Up,
    Right,
    Down,
    Left,
}

impl Facing {
    /// Next direction clockwise.
    pub fn next(self) -> Facing {
        match self {
            Facing::Up => Facing::Right,
            Facing::Right => Facing::Down,
            Facing::Down => Facing::Left,
            Facing::Left => Facing::Up,
        }
    }
}

/// Stable handle of a unit: its faction and its slot in that faction's
/// roster. The occupancy table stores these, never the units themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId {
    pub faction: Faction,
    pub slot: usize,
}

impl UnitId {
    pub const fn hero(slot: usize) -> Self {
        Self {
            faction: Faction::Hero,
            slot,
        }
    }

    pub const fn monster(slot: usize) -> Self {
        Self {
            faction: Faction::Monster,
            slot,
        }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.faction {
            Faction::Hero => write!(f, "hero#{}", self.slot),
            Faction::Monster => write!(f, "monster#{}", self.slot),
        }
    }
}

/// A combatant.
#[derive(Debug, Clone)]
pub struct Unit {
    id: UnitId,
    archetype: Archetype,
    health: i32,
    pos: Option<Point>,
    dead: bool,
    acted: bool,
    pub(crate) motion: Option<Motion>,
    pub(crate) facing: Facing,
    pub(crate) frame: u8,
    pub(crate) visible: bool,
    /// Ticks since the last animation step.
    pub(crate) anim_clock: u32,
}

impl Unit {
    /// A fresh, unplaced unit at full health.
    pub fn new(id: UnitId, archetype: Archetype) -> Self {
        Self {
            id,
            archetype,
            health: archetype.stats().max_health,
            pos: None,
            dead: false,
            acted: false,
            motion: None,
            facing: id.faction.default_facing(),
            frame: 0,
            visible: true,
            anim_clock: 0,
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn stats(&self) -> &'static Stats {
        self.archetype.stats()
    }

    pub fn faction(&self) -> Faction {
        self.id.faction
    }

    pub fn name(&self) -> &'static str {
        self.stats().name
    }

    pub fn max_health(&self) -> i32 {
        self.stats().max_health
    }

    pub fn range(&self) -> i32 {
        self.stats().range
    }

    pub fn melee(&self) -> i32 {
        self.stats().melee
    }

    pub fn ranged(&self) -> i32 {
        self.stats().ranged
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    /// Health as a percentage of the archetype maximum.
    pub fn health_percent(&self) -> f64 {
        100.0 * f64::from(self.health) / f64::from(self.max_health())
    }

    /// Set health, clamped to `[0, max_health]`.
    pub fn set_health(&mut self, v: i32) {
        self.health = v.clamp(0, self.max_health());
    }

    pub fn is_full_health(&self) -> bool {
        self.health >= self.max_health()
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Mark the unit dead or alive.
    ///
    /// Death turns the sprite to face up, resets the animation and starts
    /// the slow rotate-and-fade played by [`motion::tick`](crate::motion::tick).
    pub fn set_dead(&mut self, dead: bool) {
        if dead {
            self.dead = true;
            self.facing = Facing::Up;
            self.frame = 0;
            self.anim_clock = 0;
            self.motion = None;
        } else {
            self.dead = false;
            self.visible = true;
        }
    }

    pub fn has_acted(&self) -> bool {
        self.acted
    }

    pub fn set_acted(&mut self, acted: bool) {
        self.acted = acted;
    }

    /// Current cell, or `None` while unplaced.
    pub fn pos(&self) -> Option<Point> {
        self.pos
    }

    pub(crate) fn set_pos(&mut self, pos: Option<Point>) {
        self.pos = pos;
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    pub fn motion(&self) -> Option<&Motion> {
        self.motion.as_ref()
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// Whether a renderer should draw the unit. Dead units stay visible
    /// until their death animation ends.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Multi-line tooltip text.
    pub fn describe(&self) -> String {
        let cell = self
            .pos
            .map_or_else(|| "unplaced".to_string(), |p| p.to_string());
        format!(
            "{} {}\nHealth: {} /{}\nMelee: {}\nRanged: {}\nRange: {}",
            self.name(),
            cell,
            self.health,
            self.max_health(),
            self.melee(),
            self.ranged(),
            self.range()
        )
    }
}
