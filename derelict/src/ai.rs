//! Pathfinding support for hostile actors.

use rlkit_core::Point;
use rlkit_paths::{AstarPather, Pather, WeightedPather, manhattan};

use crate::gamemap::GameMap;

/// Pather for actor movement: cardinal steps on walkable tiles, with a
/// penalty on tiles occupied by other actors so paths flow around them.
pub struct ActorPather<'a> {
    pub map: &'a GameMap,
    /// Flat occupancy mask over the map, true where a living actor stands.
    pub occupied: &'a [bool],
    /// Occupancy at the target itself is not penalized.
    pub target: Point,
}

impl Pather for ActorPather<'_> {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(p.neighbors_4().into_iter().filter(|&q| self.map.walkable(q)));
    }
}

impl WeightedPather for ActorPather<'_> {
    fn cost(&self, _from: Point, to: Point) -> i32 {
        let idx = (to.y * self.map.width + to.x) as usize;
        if to != self.target && idx < self.occupied.len() && self.occupied[idx] {
            // Crowded tile: allow passing through in principle, but prefer
            // stepping around so enemies don't pile up in corridors.
            return 10;
        }
        1
    }
}

impl AstarPather for ActorPather<'_> {
    fn estimate(&self, from: Point, to: Point) -> i32 {
        manhattan(from, to)
    }
}
