//! Session persistence as a compact binary blob.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rlkit_fov::Fov;
use rlkit_paths::PathRange;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::GameError;
use crate::game::Game;
use crate::gamemap::{GameMap, GameWorld};
use crate::log::MessageLog;

/// The serialized subset of [`Game`]. Derived state (field of view,
/// pathfinding caches) is rebuilt on restore.
#[derive(Serialize, Deserialize)]
struct SaveData {
    world: GameWorld,
    map: GameMap,
    entities: Vec<Option<Entity>>,
    log: MessageLog,
    turn: i32,
    seed: u64,
}

impl Game {
    /// Serialize the session.
    pub fn to_bytes(&self) -> Result<Vec<u8>, GameError> {
        let data = SaveData {
            world: self.world.clone(),
            map: self.map.clone(),
            entities: self.entities.clone(),
            log: self.log.clone(),
            turn: self.turn,
            seed: self.seed,
        };
        Ok(bincode::serialize(&data)?)
    }

    /// Restore a session from [`Game::to_bytes`] output.
    ///
    /// The RNG restarts from the stored seed rather than its exact state, so
    /// a reloaded run can diverge from the unsaved one.
    pub fn from_bytes(bytes: &[u8]) -> Result<Game, GameError> {
        let data: SaveData = bincode::deserialize(bytes)?;
        let bounds = data.map.bounds();
        let mut game = Game {
            world: data.world,
            map: data.map,
            entities: data.entities,
            log: data.log,
            turn: data.turn,
            seed: data.seed,
            rng: SmallRng::seed_from_u64(data.seed),
            pr: PathRange::new(bounds),
            fov: Fov::new(bounds),
        };
        game.update_fov();
        log::debug!("restored session at turn {}", game.turn);
        Ok(game)
    }
}
