//! The board: terrain plus the cell → unit occupancy table.

use wargame_core::{Cell, Dims, GeomError, Grid, Point};

use crate::terrain::Tileset;
use crate::unit::UnitId;

/// Terrain and occupancy of one map.
///
/// Each slot holds at most one live unit. The board does not own units,
/// it stores their [`UnitId`]s; the turn manager keeps every unit's
/// recorded cell in agreement with the slot that names it.
#[derive(Debug, Clone)]
pub struct Board {
    terrain: Grid,
    tileset: Tileset,
    slots: Vec<Option<UnitId>>,
}

impl Board {
    /// An empty board over the given terrain.
    pub fn new(terrain: Grid, tileset: Tileset) -> Self {
        let slots = vec![None; terrain.dims().area()];
        Self {
            terrain,
            tileset,
            slots,
        }
    }

    pub fn dims(&self) -> Dims {
        self.terrain.dims()
    }

    pub fn terrain(&self) -> &Grid {
        &self.terrain
    }

    /// Terrain at `p`.
    pub fn terrain_at(&self, p: Point) -> Result<Cell, GeomError> {
        self.terrain
            .at(p)
            .ok_or(GeomError::InvalidPosition { x: p.x, y: p.y })
    }

    /// Whether position p is passable terrain. Off-map cells are not.
    pub fn passable(&self, p: Point) -> bool {
        self.terrain.at(p).is_some_and(|c| self.tileset.passable(c))
    }

    /// Unit standing on `p`, if any.
    pub fn occupant(&self, p: Point) -> Option<UnitId> {
        let idx = self.dims().index(p).ok()?;
        self.slots[idx]
    }

    /// Whether a unit may step onto `p`: on the map, passable and empty.
    pub fn is_free(&self, p: Point) -> bool {
        self.passable(p) && self.occupant(p).is_none()
    }

    /// Put `id` on the empty cell `p`. Returns `false` if `p` is off the
    /// map or already taken.
    pub fn place(&mut self, id: UnitId, p: Point) -> bool {
        let Ok(idx) = self.dims().index(p) else {
            return false;
        };
        if self.slots[idx].is_some() {
            return false;
        }
        self.slots[idx] = Some(id);
        true
    }

    /// Empty the slot at `p`, returning whoever stood there.
    pub fn vacate(&mut self, p: Point) -> Option<UnitId> {
        let idx = self.dims().index(p).ok()?;
        self.slots[idx].take()
    }

    /// Move the occupant of `from` onto the empty cell `to`.
    pub fn relocate(&mut self, from: Point, to: Point) -> bool {
        let (Ok(fi), Ok(ti)) = (self.dims().index(from), self.dims().index(to)) else {
            return false;
        };
        if self.slots[fi].is_none() || self.slots[ti].is_some() {
            return false;
        }
        self.slots[ti] = self.slots[fi].take();
        true
    }

    /// Number of occupied slots.
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Row-major occupancy table.
    pub fn slots(&self) -> &[Option<UnitId>] {
        &self.slots
    }

    /// Occupied cells with their occupant, row-major.
    pub fn occupants(&self) -> impl Iterator<Item = (Point, UnitId)> + '_ {
        self.dims()
            .range()
            .iter()
            .zip(self.slots.iter())
            .filter_map(|(p, s)| s.map(|id| (p, id)))
    }

    pub(crate) fn set_slots(&mut self, slots: Vec<Option<UnitId>>) -> bool {
        if slots.len() != self.slots.len() {
            return false;
        }
        self.slots = slots;
        true
    }
}
