//! Monster behavior.
//!
//! Monsters follow a fixed priority: badly wounded ones rest, otherwise
//! they strike the first hero they can see, otherwise they take a random
//! step.

use rand::Rng;
use wargame_core::{Point, Range, chebyshev};

use crate::board::Board;
use crate::unit::{Faction, Unit, UnitId};

/// What a monster does on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonsterPlan {
    Rest,
    Attack { target: UnitId, distance: i32 },
    Wander(Point),
    /// No valid action: the monster keeps its place.
    Idle,
}

/// First hero within `radius` of `center`, scanning the square
/// neighborhood row by row. This is not necessarily the nearest hero.
pub fn hero_in_sight(board: &Board, center: Point, radius: i32) -> Option<(UnitId, i32)> {
    Range::square(center, radius)
        .intersect(board.dims().range())
        .iter()
        .find_map(|p| match board.occupant(p) {
            Some(id) if id.faction == Faction::Hero => Some((id, chebyshev(center, p))),
            _ => None,
        })
}

/// Random single step. Each axis moves by -1, 0 or 1. The step is only
/// kept when it lands on a free passable cell.
pub fn random_step(board: &Board, from: Point, rng: &mut impl Rng) -> Option<Point> {
    let to = from.shift(rng.random_range(-1..=1), rng.random_range(-1..=1));
    (to != from && board.is_free(to)).then_some(to)
}

/// Decide what `monster` does this turn.
pub fn plan(
    monster: &Unit,
    board: &Board,
    low_health_percent: f64,
    rng: &mut impl Rng,
) -> MonsterPlan {
    let Some(pos) = monster.pos() else {
        return MonsterPlan::Idle;
    };
    if monster.is_dead() {
        return MonsterPlan::Idle;
    }
    if monster.health_percent() < low_health_percent {
        return MonsterPlan::Rest;
    }
    if let Some((target, distance)) = hero_in_sight(board, pos, monster.range()) {
        return MonsterPlan::Attack { target, distance };
    }
    random_step(board, pos, rng).map_or(MonsterPlan::Idle, MonsterPlan::Wander)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{GRASS, ROCK, Tileset};
    use crate::unit::Archetype;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use wargame_core::{Dims, Grid};

    fn board() -> Board {
        Board::new(Grid::new(Dims::new(8, 8), GRASS), Tileset::standard())
    }

    fn orc_at(b: &mut Board, p: Point) -> Unit {
        let id = UnitId::monster(0);
        let mut u = Unit::new(id, Archetype::Orc);
        u.set_pos(Some(p));
        b.place(id, p);
        u
    }

    #[test]
    fn scan_is_row_major_not_nearest() {
        let mut b = board();
        let c = Point::new(4, 4);
        // distance 2 but on an earlier row than the adjacent hero
        b.place(UnitId::hero(0), Point::new(6, 2));
        b.place(UnitId::hero(1), Point::new(3, 4));
        assert_eq!(hero_in_sight(&b, c, 2), Some((UnitId::hero(0), 2)));
        assert_eq!(hero_in_sight(&b, c, 1), Some((UnitId::hero(1), 1)));
        assert_eq!(hero_in_sight(&b, Point::new(0, 7), 1), None);
    }

    #[test]
    fn scan_ignores_monsters_and_clips_to_map() {
        let mut b = board();
        b.place(UnitId::monster(3), Point::new(1, 0));
        b.place(UnitId::hero(2), Point::new(0, 1));
        assert_eq!(hero_in_sight(&b, Point::new(0, 0), 1), Some((UnitId::hero(2), 1)));
    }

    #[test]
    fn wounded_monster_rests() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut b = board();
        let mut orc = orc_at(&mut b, Point::new(2, 2));
        b.place(UnitId::hero(0), Point::new(3, 2));
        orc.set_health(3);
        assert_eq!(plan(&orc, &b, 10.0, &mut rng), MonsterPlan::Rest);
        orc.set_health(4);
        assert_eq!(
            plan(&orc, &b, 10.0, &mut rng),
            MonsterPlan::Attack {
                target: UnitId::hero(0),
                distance: 1
            }
        );
    }

    #[test]
    fn wandering_stays_on_free_cells() {
        let mut rng = SmallRng::seed_from_u64(21);
        let mut g = Grid::new(Dims::new(3, 3), ROCK);
        g.set(Point::new(1, 1), GRASS);
        g.set(Point::new(2, 1), GRASS);
        let mut b = Board::new(g, Tileset::standard());
        let orc = orc_at(&mut b, Point::new(1, 1));
        for _ in 0..100 {
            match plan(&orc, &b, 10.0, &mut rng) {
                MonsterPlan::Wander(p) => assert_eq!(p, Point::new(2, 1)),
                MonsterPlan::Idle => {}
                other => panic!("unexpected plan {other:?}"),
            }
        }
    }

    #[test]
    fn dead_monster_does_nothing() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut b = board();
        let mut orc = orc_at(&mut b, Point::new(2, 2));
        orc.set_dead(true);
        assert_eq!(plan(&orc, &b, 10.0, &mut rng), MonsterPlan::Idle);
    }
}
