//! Dungeon generation: rectangular rooms connected by L-shaped corridors.

use rand::{Rng, RngExt};
use rlkit_core::{Point, Range};

use crate::entity::{self, Entity};
use crate::error::GenerationError;
use crate::gamemap::{GameMap, GameWorld};
use crate::terrain::Tile;

/// A generation-time room rectangle with exclusive upper bounds.
#[derive(Debug, Clone, Copy)]
pub struct RectangularRoom {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl RectangularRoom {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    /// Room center, used for corridors, stairs and the player start.
    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// The full bounding box, including the wall border.
    pub fn bounds(&self) -> Range {
        Range::new(self.x1, self.y1, self.x2, self.y2)
    }

    /// The interior, inset by 1 on each side.
    pub fn inner(&self) -> Range {
        Range::new(self.x1 + 1, self.y1 + 1, self.x2 - 1, self.y2 - 1)
    }

    /// Bounding-box overlap test, inclusive so adjacent rooms sharing a wall
    /// line count as intersecting.
    pub fn intersects(&self, other: &RectangularRoom) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }
}

/// Walk an axis-aligned segment from `a` to `b`, inclusive of both ends.
fn straight_line(a: Point, b: Point) -> impl Iterator<Item = Point> {
    let d = Point::new((b.x - a.x).signum(), (b.y - a.y).signum());
    let len = (b.x - a.x).abs().max((b.y - a.y).abs());
    (0..=len).map(move |i| Point::new(a.x + d.x * i, a.y + d.y * i))
}

/// L-shaped corridor between two points, with the bend direction chosen by
/// an unbiased coin flip.
fn tunnel_between(rng: &mut impl Rng, start: Point, end: Point) -> Vec<Point> {
    let corner = if rng.random_range(0..2) == 0 {
        // Horizontal first, vertical second.
        Point::new(end.x, start.y)
    } else {
        Point::new(start.x, end.y)
    };
    let mut pts: Vec<Point> = straight_line(start, corner).collect();
    pts.extend(straight_line(corner, end));
    pts
}

/// Result of one floor generation.
pub struct Dungeon {
    pub map: GameMap,
    /// Accepted rooms in placement order.
    pub rooms: Vec<RectangularRoom>,
    /// Center of the first room.
    pub player_start: Point,
    /// Monsters and items placed in rooms, in creation order.
    pub spawned: Vec<Entity>,
}

/// Generate a new dungeon floor from the world parameters.
///
/// Zero accepted rooms is a hard failure.
pub fn generate_dungeon(
    world: &GameWorld,
    rng: &mut impl Rng,
) -> Result<Dungeon, GenerationError> {
    let mut map = GameMap::new(world.map_width, world.map_height);
    let mut rooms: Vec<RectangularRoom> = Vec::new();

    for _ in 0..world.max_rooms {
        let room_width = rng.random_range(world.room_min_size..=world.room_max_size);
        let room_height = rng.random_range(world.room_min_size..=world.room_max_size);
        let x = rng.random_range(0..world.map_width - room_width);
        let y = rng.random_range(0..world.map_height - room_height);
        let new_room = RectangularRoom::new(x, y, room_width, room_height);

        if rooms.iter().any(|other| new_room.intersects(other)) {
            continue;
        }

        // Stamp the bounding box as room wall, then dig out the interior.
        for p in new_room.bounds() {
            map.set_tile(p, Tile::RoomWall);
        }
        for p in new_room.inner() {
            map.set_tile(p, Tile::Floor);
        }
        rooms.push(new_room);
    }

    if rooms.is_empty() {
        return Err(GenerationError::NoRooms {
            attempts: world.max_rooms,
        });
    }

    // Dig corridors between consecutive room centers.
    for i in 1..rooms.len() {
        for p in tunnel_between(rng, rooms[i - 1].center(), rooms[i].center()) {
            map.set_tile(p, Tile::Floor);
        }
    }

    let player_start = rooms[0].center();

    let mut spawned: Vec<Entity> = Vec::new();
    for room in &rooms {
        place_entities(room, world, rng, player_start, &mut spawned);
    }

    // Stairs go in the center of the last accepted room.
    let last_center = rooms[rooms.len() - 1].center();
    map.set_tile(last_center, Tile::DownStairs);
    map.downstairs = last_center;

    Ok(Dungeon {
        map,
        rooms,
        player_start,
        spawned,
    })
}

/// Stock one room with monsters and items. A position collision skips that
/// spawn attempt rather than retrying.
fn place_entities(
    room: &RectangularRoom,
    world: &GameWorld,
    rng: &mut impl Rng,
    player_start: Point,
    spawned: &mut Vec<Entity>,
) {
    let n_monsters = rng.random_range(0..=world.max_monsters_per_room);
    let n_items = rng.random_range(0..=world.max_items_per_room);

    for _ in 0..n_monsters {
        let pos = Point::new(
            rng.random_range(room.x1 + 1..=room.x2 - 2),
            rng.random_range(room.y1 + 1..=room.y2 - 2),
        );
        if pos == player_start || spawned.iter().any(|e| e.pos == pos) {
            continue;
        }
        let mut monster = if rng.random::<f64>() < 0.8 {
            entity::menace()
        } else {
            entity::droid()
        };
        monster.pos = pos;
        spawned.push(monster);
    }

    for _ in 0..n_items {
        let pos = Point::new(
            rng.random_range(room.x1 + 1..=room.x2 - 2),
            rng.random_range(room.y1 + 1..=room.y2 - 2),
        );
        if pos == player_start || spawned.iter().any(|e| e.pos == pos) {
            continue;
        }
        let roll = rng.random::<f64>();
        let mut item = if roll < 0.5 {
            entity::menace_energy()
        } else if roll < 0.8 {
            entity::large_menace_energy()
        } else {
            entity::lightning_gun()
        };
        item.pos = pos;
        spawned.push(item);
    }
}
