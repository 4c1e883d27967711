//! Map and roster generation.
//!
//! Terrain is built in layers: grass everywhere, then rocks dropped on any
//! cell, then trees and straw which must each land on a cell that is
//! still grass. Units are then scattered on free passable cells of their
//! faction's half of the map.

use log::warn;
use rand::Rng;
use wargame_core::{Dims, Grid, Point, Range};

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::MapGenError;
use crate::terrain::{GRASS, ROCK, STRAW, TREE};
use crate::unit::{Archetype, Faction, Unit, UnitId};

/// Generate the terrain layers of a new map.
pub fn generate_terrain(cfg: &GameConfig, rng: &mut impl Rng) -> Result<Grid, MapGenError> {
    let dims = Dims::new(cfg.width, cfg.height);

    // 1. Ground
    let mut terrain = Grid::new(dims, GRASS);

    // 2. Rocks may overwrite each other
    for _ in 0..cfg.rocks {
        terrain.set(random_cell(dims, rng), ROCK);
    }

    // 3. Trees, then 4. straw, never stacked on a previous feature
    scatter_on_grass(&mut terrain, TREE, "tree", cfg.trees, cfg.decoration_retries, rng)?;
    scatter_on_grass(&mut terrain, STRAW, "straw", cfg.straw, cfg.decoration_retries, rng)?;

    Ok(terrain)
}

fn random_cell(dims: Dims, rng: &mut impl Rng) -> Point {
    Point::new(
        rng.random_range(0..dims.width),
        rng.random_range(0..dims.height),
    )
}

fn scatter_on_grass(
    terrain: &mut Grid,
    cell: wargame_core::Cell,
    kind: &'static str,
    count: usize,
    retries: u32,
    rng: &mut impl Rng,
) -> Result<(), MapGenError> {
    let dims = terrain.dims();
    for _ in 0..count {
        let mut placed = false;
        for _ in 0..retries.max(1) {
            let p = random_cell(dims, rng);
            if terrain.at(p) == Some(GRASS) {
                terrain.set(p, cell);
                placed = true;
                break;
            }
        }
        if !placed {
            return Err(MapGenError::DecorationBudget { kind });
        }
    }
    Ok(())
}

/// Cells a faction may spawn on: monsters take the left half, heroes the
/// right half minus `margin` columns next to the middle.
pub fn spawn_region(dims: Dims, faction: Faction, margin: i32) -> Range {
    let half = dims.width / 2;
    let r = match faction {
        Faction::Monster => Range::new(0, 0, half, dims.height),
        Faction::Hero => Range::new(half + margin.max(0), 0, dims.width, dims.height),
    };
    r.intersect(dims.range())
}

/// Pick a random free passable cell of `region`.
///
/// Draws uniformly up to `retries` times, then falls back to scanning the
/// region, so the error is returned exactly when no free cell exists.
pub fn random_free_cell(
    board: &Board,
    faction: Faction,
    region: Range,
    retries: u32,
    rng: &mut impl Rng,
) -> Result<Point, MapGenError> {
    if region.is_empty() {
        return Err(MapGenError::EmptyRegion(faction));
    }
    for _ in 0..retries {
        let p = Point::new(
            rng.random_range(region.min.x..region.max.x),
            rng.random_range(region.min.y..region.max.y),
        );
        if board.is_free(p) {
            return Ok(p);
        }
    }

    let free: Vec<Point> = region.iter().filter(|&p| board.is_free(p)).collect();
    if free.is_empty() {
        return Err(MapGenError::NoFreeCell { faction, region });
    }
    warn!(
        "{faction:?} spawn sampling exhausted {retries} draws, picking among {} free cells",
        free.len()
    );
    Ok(free[rng.random_range(0..free.len())])
}

/// Create `count` units of `faction` with random archetypes and place them
/// on the board.
pub fn spawn_roster(
    board: &mut Board,
    faction: Faction,
    count: usize,
    cfg: &GameConfig,
    rng: &mut impl Rng,
) -> Result<Vec<Unit>, MapGenError> {
    let region = spawn_region(board.dims(), faction, cfg.spawn_margin);
    let mut roster = Vec::with_capacity(count);
    for slot in 0..count {
        let id = UnitId { faction, slot };
        let mut unit = Unit::new(id, Archetype::random(faction, rng));
        let p = random_free_cell(board, faction, region, cfg.spawn_retries, rng)?;
        board.place(id, p);
        unit.set_pos(Some(p));
        roster.push(unit);
    }
    Ok(roster)
}
