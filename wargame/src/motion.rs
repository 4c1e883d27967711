//! Sub-cell movement and sprite animation.
//!
//! A move between two adjacent cells is played as a pixel offset that
//! grows by a fixed speed every tick until it spans one full cell. The
//! turn manager commits the destination in the occupancy table as soon as
//! the move is issued; the animation only decides where the sprite is drawn
//! in between and when the unit lands.

use serde::{Deserialize, Serialize};
use wargame_core::{Point, chebyshev};

use crate::config::GameConfig;
use crate::unit::{Facing, Unit};

/// Animation constants, derived from [`GameConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kinematics {
    pub cell_px: i32,
    pub step: i32,
    pub speed: i32,
    pub frames: u8,
    /// Ticks between two death-animation steps.
    pub death_period: u32,
}

impl From<&GameConfig> for Kinematics {
    fn from(cfg: &GameConfig) -> Self {
        Self {
            cell_px: cfg.cell_px,
            step: cfg.move_step,
            speed: cfg.move_speed,
            frames: cfg.animation_frames,
            death_period: cfg.death_anim_ticks(),
        }
    }
}

/// An in-progress move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Motion {
    origin: Point,
    offset: Point,
}

impl Motion {
    /// Cell the unit left.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Pixel offset of the sprite relative to [`origin`](Self::origin).
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Cell the unit lands on.
    pub fn destination(&self) -> Point {
        self.origin + self.offset.signum()
    }
}

/// Cut an in-progress move short and put the unit on its destination.
///
/// Returns the landing cell, or `None` if the unit was not moving.
pub fn settle(unit: &mut Unit) -> Option<Point> {
    let cell = unit.motion.take()?.destination();
    unit.set_pos(Some(cell));
    unit.frame = 0;
    Some(cell)
}

/// Start animating `unit` from its current cell towards the adjacent
/// `target`.
///
/// Sets the per-axis direction and the facing. When both axes change the
/// vertical direction wins the facing. A unit still moving is first
/// settled on its destination, and the new move starts from there.
/// Returns `false`, changing nothing, when the unit is dead or unplaced
/// or when `target` is not adjacent to where it stands.
pub fn begin_move(unit: &mut Unit, target: Point, kin: &Kinematics) -> bool {
    let Some(origin) = unit.motion.map(|m| m.destination()).or(unit.pos()) else {
        return false;
    };
    if unit.is_dead() || chebyshev(origin, target) != 1 {
        return false;
    }
    settle(unit);

    let dir = (target - origin).signum();
    let mut facing = Facing::Up;
    if dir.x > 0 {
        facing = Facing::Right;
    } else if dir.x < 0 {
        facing = Facing::Left;
    }
    if dir.y > 0 {
        facing = Facing::Down;
    } else if dir.y < 0 {
        facing = Facing::Up;
    }

    unit.facing = facing;
    unit.motion = Some(Motion {
        origin,
        offset: Point::new(dir.x * kin.step, dir.y * kin.step),
    });
    true
}

/// Advance the unit's animation by one tick.
///
/// Returns the cell the unit landed on when this tick completes a move.
pub fn tick(unit: &mut Unit, kin: &Kinematics) -> Option<Point> {
    let mut landed = None;

    if let Some(m) = unit.motion.as_mut() {
        m.offset.x += kin.speed * m.offset.x.signum();
        m.offset.y += kin.speed * m.offset.y.signum();

        if m.offset.x.abs() >= kin.cell_px || m.offset.y.abs() >= kin.cell_px {
            landed = settle(unit);
        }
    }

    if unit.visible {
        if unit.is_dead() {
            unit.anim_clock += 1;
            if unit.anim_clock >= kin.death_period {
                unit.anim_clock = 0;
                unit.facing = unit.facing.next();
                if unit.facing == Facing::Up {
                    unit.visible = false;
                }
            }
        }
        if unit.is_moving() {
            unit.frame = (unit.frame + 1) % kin.frames.max(1);
        }
    }

    landed
}
