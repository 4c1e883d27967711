//! Saving and loading games.
//!
//! Only the simulation state is persisted: terrain, both rosters, the
//! occupancy table and the turn counters. Presentation state (facing,
//! motion, animation frames) is rebuilt on load. A save that violates any
//! board invariant is rejected as a whole.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use wargame_core::{Cell, Dims, Grid, Point};

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::{PersistenceError, Result};
use crate::game::{Game, Phase};
use crate::terrain::Tileset;
use crate::unit::{Archetype, Faction, Unit, UnitId};

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// Persisted part of a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub archetype: Archetype,
    pub health: i32,
    pub pos: Option<Point>,
    pub dead: bool,
    pub acted: bool,
}

impl From<&Unit> for UnitRecord {
    fn from(u: &Unit) -> Self {
        Self {
            archetype: u.archetype(),
            health: u.health(),
            pos: u.pos(),
            dead: u.is_dead(),
            acted: u.has_acted(),
        }
    }
}

/// On-disk representation of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub width: i32,
    pub height: i32,
    /// Row-major terrain ids.
    pub terrain: Vec<u8>,
    pub heroes: Vec<UnitRecord>,
    pub monsters: Vec<UnitRecord>,
    pub occupancy: Vec<Option<UnitId>>,
    pub turn: u32,
    pub actions_remaining: usize,
    pub phase: Phase,
}

impl SaveData {
    /// Capture the persistent state of `game`.
    pub fn capture(game: &Game) -> Self {
        let dims = game.board().dims();
        Self {
            version: SAVE_VERSION,
            width: dims.width,
            height: dims.height,
            terrain: game.board().terrain().cells().iter().map(|c| c.value()).collect(),
            heroes: game.heroes().iter().map(UnitRecord::from).collect(),
            monsters: game.monsters().iter().map(UnitRecord::from).collect(),
            occupancy: game.board().slots().to_vec(),
            turn: game.turn(),
            actions_remaining: game.actions_remaining(),
            phase: game.phase(),
        }
    }

    /// Rebuild a game, checking every invariant on the way.
    pub fn restore(self, cfg: GameConfig) -> std::result::Result<Game, PersistenceError> {
        if self.version != SAVE_VERSION {
            return Err(PersistenceError::Version {
                found: self.version,
                expected: SAVE_VERSION,
            });
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(corrupt(format!("bad map size {}x{}", self.width, self.height)));
        }
        let dims = Dims::new(self.width, self.height);
        let tileset = Tileset::standard();

        let cells: Vec<Cell> = self.terrain.iter().copied().map(Cell).collect();
        if let Some(c) = cells.iter().find(|&&c| !tileset.knows(c)) {
            return Err(corrupt(format!("unknown terrain id {}", c.value())));
        }
        let terrain = Grid::from_cells(dims, cells).ok_or_else(|| {
            corrupt(format!(
                "{} terrain cells for a {dims} map",
                self.terrain.len()
            ))
        })?;
        let mut board = Board::new(terrain, tileset);
        if !board.set_slots(self.occupancy) {
            return Err(corrupt("occupancy table does not match the map size"));
        }

        let heroes = rebuild_roster(&board, Faction::Hero, &self.heroes)?;
        let monsters = rebuild_roster(&board, Faction::Monster, &self.monsters)?;

        // every occupied slot must point back at a live unit standing there
        for (p, id) in board.occupants() {
            let roster = match id.faction {
                Faction::Hero => &heroes,
                Faction::Monster => &monsters,
            };
            let unit = roster
                .get(id.slot)
                .ok_or_else(|| corrupt(format!("{p} references missing {id}")))?;
            if unit.is_dead() || unit.pos() != Some(p) {
                return Err(corrupt(format!("{p} references {id} which is not there")));
            }
        }

        let living_heroes = heroes.iter().filter(|u| u.is_alive()).count();
        if self.actions_remaining > living_heroes {
            return Err(corrupt(format!(
                "{} actions remaining for {living_heroes} heroes",
                self.actions_remaining
            )));
        }
        if let Phase::Monsters { next } = self.phase {
            if next > monsters.len() {
                return Err(corrupt(format!("monster cursor {next} past the roster")));
            }
        }

        let rng = match cfg.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let mut game = Game::assemble(cfg, board, heroes, monsters, rng);
        game.resume(self.turn, self.actions_remaining, self.phase);
        Ok(game)
    }
}

fn corrupt(msg: impl Into<String>) -> PersistenceError {
    PersistenceError::Corrupt(msg.into())
}

fn rebuild_roster(
    board: &Board,
    faction: Faction,
    records: &[UnitRecord],
) -> std::result::Result<Vec<Unit>, PersistenceError> {
    records
        .iter()
        .enumerate()
        .map(|(slot, r)| {
            let id = UnitId { faction, slot };
            if r.archetype.faction() != faction {
                return Err(corrupt(format!("{id} is a {:?}", r.archetype)));
            }
            let mut unit = Unit::new(id, r.archetype);
            if !(0..=unit.max_health()).contains(&r.health) {
                return Err(corrupt(format!("{id} has {} health", r.health)));
            }
            unit.set_health(r.health);
            unit.set_pos(r.pos);
            unit.set_acted(r.acted);

            if r.dead {
                unit.set_dead(true);
                unit.visible = false;
                return Ok(unit);
            }
            let p = r
                .pos
                .ok_or_else(|| corrupt(format!("living {id} has no cell")))?;
            if r.health == 0 {
                return Err(corrupt(format!("living {id} has no health")));
            }
            if !board.passable(p) {
                return Err(corrupt(format!("{id} stands on impassable {p}")));
            }
            if board.occupant(p) != Some(id) {
                return Err(corrupt(format!("{id} at {p} is missing from occupancy")));
            }
            Ok(unit)
        })
        .collect()
}

impl Game {
    /// Serialize the game to JSON.
    pub fn save(&self) -> std::result::Result<Vec<u8>, PersistenceError> {
        let blob = serde_json::to_vec_pretty(&SaveData::capture(self))?;
        debug!("saved round {} ({} bytes)", self.turn(), blob.len());
        Ok(blob)
    }

    /// Restore a game saved with [`Game::save`].
    pub fn load(blob: &[u8], cfg: GameConfig) -> Result<Game> {
        cfg.validate()?;
        let data: SaveData = serde_json::from_slice(blob).map_err(PersistenceError::from)?;
        Ok(data.restore(cfg)?)
    }

    pub fn save_to(
        &self,
        store: &mut impl SaveStore,
        slot: usize,
    ) -> std::result::Result<(), PersistenceError> {
        store.write(slot, &self.save()?)?;
        info!("game saved to slot {slot}");
        Ok(())
    }

    pub fn load_from(store: &impl SaveStore, slot: usize, cfg: GameConfig) -> Result<Game> {
        let blob = store.read(slot)?;
        let game = Game::load(&blob, cfg)?;
        info!("game loaded from slot {slot}");
        Ok(game)
    }
}

/// Slot-based storage for save blobs.
pub trait SaveStore {
    fn write(&mut self, slot: usize, blob: &[u8]) -> std::result::Result<(), PersistenceError>;

    /// Read a slot. An unused slot is [`PersistenceError::EmptySlot`].
    fn read(&self, slot: usize) -> std::result::Result<Vec<u8>, PersistenceError>;

    fn exists(&self, slot: usize) -> bool;
}

/// In-memory store, for tests and quick saves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<usize, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn write(&mut self, slot: usize, blob: &[u8]) -> std::result::Result<(), PersistenceError> {
        self.slots.insert(slot, blob.to_vec());
        Ok(())
    }

    fn read(&self, slot: usize) -> std::result::Result<Vec<u8>, PersistenceError> {
        self.slots
            .get(&slot)
            .cloned()
            .ok_or(PersistenceError::EmptySlot(slot))
    }

    fn exists(&self, slot: usize) -> bool {
        self.slots.contains_key(&slot)
    }
}

/// One `wargame<slot>.json` file per slot in a directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, slot: usize) -> PathBuf {
        self.dir.join(format!("wargame{slot}.json"))
    }
}

impl SaveStore for DirStore {
    fn write(&mut self, slot: usize, blob: &[u8]) -> std::result::Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(slot), blob)?;
        Ok(())
    }

    fn read(&self, slot: usize) -> std::result::Result<Vec<u8>, PersistenceError> {
        let path = self.path(slot);
        if !path.exists() {
            return Err(PersistenceError::EmptySlot(slot));
        }
        Ok(fs::read(path)?)
    }

    fn exists(&self, slot: usize) -> bool {
        self.path(slot).exists()
    }
}
