//! Terrain ids and the tileset describing them.

use wargame_core::Cell;

pub const GRASS: Cell = Cell(0);
pub const ROCK: Cell = Cell(1);
pub const TREE: Cell = Cell(2);
pub const STRAW: Cell = Cell(3);

/// Immutable description of one terrain id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Index of the tile image in the renderer's atlas.
    pub visual: u16,
    pub passable: bool,
    pub name: &'static str,
}

/// Maps terrain ids to tiles. Ids without a tile are impassable.
#[derive(Debug, Clone)]
pub struct Tileset {
    tiles: Vec<Tile>,
}

impl Tileset {
    /// The tileset used by generated maps.
    pub fn standard() -> Self {
        let tiles = vec![
            Tile {
                visual: 0,
                passable: true,
                name: "grass",
            },
            Tile {
                visual: 1,
                passable: false,
                name: "rock",
            },
            Tile {
                visual: 2,
                passable: false,
                name: "tree",
            },
            Tile {
                visual: 3,
                passable: true,
                name: "straw",
            },
        ];
        Self { tiles }
    }

    /// Tile for a terrain id.
    pub fn get(&self, c: Cell) -> Option<&Tile> {
        self.tiles.get(usize::from(c.value()))
    }

    /// Whether units may stand on this terrain.
    pub fn passable(&self, c: Cell) -> bool {
        self.get(c).is_some_and(|t| t.passable)
    }

    /// Whether a terrain id is known to this tileset.
    pub fn knows(&self, c: Cell) -> bool {
        self.get(c).is_some()
    }
}

impl Default for Tileset {
    fn default() -> Self {
        Self::standard()
    }
}

/// Character representation of terrain, for logs and text dumps.
pub fn terrain_rune(c: Cell) -> char {
    match c {
        GRASS => '.',
        ROCK => '^',
        TREE => 'T',
        STRAW => '"',
        _ => '?',
    }
}
