//! Tile catalog: fixed tile kinds with display glyphs for lit/dark states.

use rlkit_core::{Color, Glyph};
use serde::{Deserialize, Serialize};

use crate::colors::{BLACK, WHITE};

/// A tile on the map, referencing a fixed [`TileKind`] in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Floor,
    Wall,
    RoomWall,
    DownStairs,
}

/// Immutable per-kind tile data.
pub struct TileKind {
    pub walkable: bool,
    pub transparent: bool,
    /// Glyph for explored tiles outside the field of view.
    pub dark: Glyph,
    /// Glyph for tiles inside the field of view.
    pub lit: Glyph,
}

const DIM: Color = Color::from_rgb(50, 50, 50);
const DARK: Color = Color::from_rgb(100, 100, 100);
const LIT: Color = Color::from_rgb(200, 200, 200);

/// Glyph for never-explored tiles.
pub const SHROUD: Glyph = Glyph::new(' ', WHITE, BLACK);

static FLOOR: TileKind = TileKind {
    walkable: true,
    transparent: true,
    dark: Glyph::new('.', DARK, BLACK),
    lit: Glyph::new('.', LIT, BLACK),
};

static WALL: TileKind = TileKind {
    walkable: false,
    transparent: false,
    dark: Glyph::new(' ', DIM, BLACK),
    lit: Glyph::new(' ', DARK, BLACK),
};

static ROOM_WALL: TileKind = TileKind {
    walkable: false,
    transparent: false,
    dark: Glyph::new('#', DARK, BLACK),
    lit: Glyph::new('#', LIT, BLACK),
};

static DOWN_STAIRS: TileKind = TileKind {
    walkable: true,
    transparent: true,
    dark: Glyph::new('>', DARK, BLACK),
    lit: Glyph::new('>', LIT, BLACK),
};

/// Look up the catalog entry for a tile.
pub fn tile_kind(t: Tile) -> &'static TileKind {
    match t {
        Tile::Floor => &FLOOR,
        Tile::Wall => &WALL,
        Tile::RoomWall => &ROOM_WALL,
        Tile::DownStairs => &DOWN_STAIRS,
    }
}
