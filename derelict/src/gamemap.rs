//! Map state: tile grid plus visibility masks.

use rlkit_core::{Point, Range};
use serde::{Deserialize, Serialize};

use crate::terrain::{Tile, tile_kind};

/// The tile grid for one dungeon floor, with the visible/explored masks.
///
/// Entity storage lives on the session ([`crate::game::Game`]); the map only
/// knows terrain and visibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMap {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
    visible: Vec<bool>,
    explored: Vec<bool>,
    /// Location of the down stairs on this floor.
    pub downstairs: Point,
}

impl GameMap {
    /// Create an all-wall map of the given dimensions.
    pub fn new(width: i32, height: i32) -> Self {
        let n = (width * height) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::Wall; n],
            visible: vec![false; n],
            explored: vec![false; n],
            downstairs: Point::ZERO,
        }
    }

    /// The map rectangle.
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    /// Whether position p is within map bounds.
    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    fn idx(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    /// Tile at position p. Out-of-bounds reads as wall.
    pub fn tile(&self, p: Point) -> Tile {
        if !self.in_bounds(p) {
            return Tile::Wall;
        }
        self.tiles[self.idx(p)]
    }

    pub fn set_tile(&mut self, p: Point, t: Tile) {
        if self.in_bounds(p) {
            let i = self.idx(p);
            self.tiles[i] = t;
        }
    }

    /// Whether the tile at p can be walked over.
    pub fn walkable(&self, p: Point) -> bool {
        tile_kind(self.tile(p)).walkable
    }

    /// Whether the tile at p does not block vision.
    pub fn transparent(&self, p: Point) -> bool {
        tile_kind(self.tile(p)).transparent
    }

    /// Whether p is currently in the field of view.
    pub fn is_visible(&self, p: Point) -> bool {
        self.in_bounds(p) && self.visible[self.idx(p)]
    }

    /// Whether p has ever been seen.
    pub fn is_explored(&self, p: Point) -> bool {
        self.in_bounds(p) && self.explored[self.idx(p)]
    }

    /// Reset the visible mask before an FOV recompute. The explored mask is
    /// never cleared.
    pub fn clear_visible(&mut self) {
        for v in &mut self.visible {
            *v = false;
        }
    }

    /// Mark p visible and union it into the explored mask.
    pub fn mark_visible(&mut self, p: Point) {
        if self.in_bounds(p) {
            let i = self.idx(p);
            self.visible[i] = true;
            self.explored[i] = true;
        }
    }

    /// Number of explored tiles.
    pub fn explored_count(&self) -> usize {
        self.explored.iter().filter(|&&e| e).count()
    }
}

/// Dungeon-generation parameters plus the floor counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameWorld {
    pub map_width: i32,
    pub map_height: i32,
    pub max_rooms: usize,
    pub room_min_size: i32,
    pub room_max_size: i32,
    pub max_monsters_per_room: i32,
    pub max_items_per_room: i32,
    pub current_floor: i32,
}

impl Default for GameWorld {
    fn default() -> Self {
        Self {
            map_width: 80,
            map_height: 43,
            max_rooms: 30,
            room_min_size: 6,
            room_max_size: 10,
            max_monsters_per_room: 2,
            max_items_per_room: 2,
            current_floor: 1,
        }
    }
}
