//! The game session: turn loop, combat, items and floor transitions.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rlkit_core::Point;
use rlkit_fov::Fov;
use rlkit_paths::{PathRange, chebyshev};

use crate::action::Action;
use crate::ai::ActorPather;
use crate::colors;
use crate::entity::{self, Ai, Consumable, Entity, EntityKind, Id, PLAYER_ID};
use crate::error::{GameError, Impossible};
use crate::gamemap::{GameMap, GameWorld};
use crate::log::MessageLog;
use crate::procgen::generate_dungeon;

/// Player sight radius in tiles.
pub const FOV_RADIUS: i32 = 8;

/// Outcome of feeding one action to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The action consumed a turn; enemies have acted.
    Turn,
    /// The action did not consume a turn; waiting for another input.
    Pending,
    /// The player asked to quit.
    Quit,
}

/// A full game session.
///
/// Entities live in a slotted vec: `None` marks a slot whose entity was
/// removed (picked up items). The player is always slot [`PLAYER_ID`].
pub struct Game {
    pub world: GameWorld,
    pub map: GameMap,
    pub entities: Vec<Option<Entity>>,
    pub log: MessageLog,
    pub turn: i32,
    pub seed: u64,
    pub rng: SmallRng,
    pub pr: PathRange,
    pub fov: Fov,
}

impl Game {
    /// Start a new session on floor 1 with the given RNG seed.
    pub fn new(world: GameWorld, seed: u64) -> Result<Self, GameError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let dungeon = generate_dungeon(&world, &mut rng)?;
        let mut entities: Vec<Option<Entity>> = Vec::with_capacity(dungeon.spawned.len() + 1);
        let mut player = entity::player();
        player.pos = dungeon.player_start;
        entities.push(Some(player));
        entities.extend(dungeon.spawned.into_iter().map(Some));
        let bounds = dungeon.map.bounds();
        let mut game = Self {
            world,
            map: dungeon.map,
            entities,
            log: MessageLog::new(),
            turn: 0,
            seed,
            rng,
            pr: PathRange::new(bounds),
            fov: Fov::new(bounds),
        };
        game.update_fov();
        game.log.add(
            "Hello and welcome, adventurer, to yet another dungeon!",
            colors::WELCOME_TEXT,
        );
        log::info!("new session: seed {seed}, {} entities", game.entities.len());
        Ok(game)
    }

    // -- accessors ----------------------------------------------------------

    pub fn player(&self) -> Option<&Entity> {
        self.entities.get(PLAYER_ID).and_then(|e| e.as_ref())
    }

    pub fn player_pos(&self) -> Point {
        self.player().map_or(Point::ZERO, |e| e.pos)
    }

    pub fn player_alive(&self) -> bool {
        self.player().is_some_and(|e| e.is_alive())
    }

    /// All present entities.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter_map(|e| e.as_ref())
    }

    /// Living actors, player included.
    pub fn living_actors(&self) -> impl Iterator<Item = (Id, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (i, e)))
            .filter(|(_, e)| e.is_alive())
    }

    /// Living actors other than the player.
    pub fn enemies(&self) -> impl Iterator<Item = (Id, &Entity)> {
        self.living_actors().filter(|&(id, _)| id != PLAYER_ID)
    }

    pub fn entities_at(&self, pos: Point) -> impl Iterator<Item = &Entity> {
        self.entities().filter(move |e| e.pos == pos)
    }

    /// Any movement-blocking entity at `pos`.
    pub fn blocking_entity_at(&self, pos: Point) -> Option<Id> {
        self.entities.iter().enumerate().find_map(|(i, e)| {
            e.as_ref()
                .filter(|e| e.pos == pos && e.blocks_movement)
                .map(|_| i)
        })
    }

    /// A living actor at `pos`.
    pub fn actor_at(&self, pos: Point) -> Option<Id> {
        self.living_actors()
            .find(|(_, e)| e.pos == pos)
            .map(|(id, _)| id)
    }

    /// An item entity lying at `pos`.
    pub fn item_at(&self, pos: Point) -> Option<Id> {
        self.entities.iter().enumerate().find_map(|(i, e)| {
            e.as_ref()
                .filter(|e| e.pos == pos && matches!(e.kind, EntityKind::Item { .. }))
                .map(|_| i)
        })
    }

    // -- turn loop ----------------------------------------------------------

    /// Feed one player action into the session.
    ///
    /// On a turn-consuming action the enemy phase runs, the field of view is
    /// recomputed and the turn counter advances. Impossible actions are
    /// logged and cost nothing.
    pub fn advance(&mut self, action: Action) -> Result<Advance, GameError> {
        if matches!(action, Action::Quit) {
            return Ok(Advance::Quit);
        }
        if !self.player_alive() {
            return Ok(Advance::Pending);
        }
        if matches!(action, Action::Descend) {
            if self.player_pos() != self.map.downstairs {
                self.log
                    .add("There are no stairs here.", colors::IMPOSSIBLE);
                return Ok(Advance::Pending);
            }
            self.descend()?;
            return Ok(Advance::Turn);
        }
        if let Err(Impossible(msg)) = self.perform_player(action) {
            self.log.add(&msg, colors::IMPOSSIBLE);
            return Ok(Advance::Pending);
        }
        self.end_turn();
        Ok(Advance::Turn)
    }

    fn perform_player(&mut self, action: Action) -> Result<(), Impossible> {
        match action {
            Action::Move { dx, dy } => self.bump(PLAYER_ID, dx, dy),
            Action::Wait => Ok(()),
            Action::PickUp => self.pick_up(),
            Action::UseItem(index) => self.use_item(index),
            Action::Descend | Action::Quit => Ok(()),
        }
    }

    fn end_turn(&mut self) {
        self.process_enemies();
        self.update_fov();
        self.turn += 1;
    }

    /// Move one step, or attack the living actor standing in the way.
    fn bump(&mut self, id: Id, dx: i32, dy: i32) -> Result<(), Impossible> {
        let pos = match self.entities.get(id).and_then(|e| e.as_ref()) {
            Some(e) => e.pos,
            None => return Ok(()),
        };
        let dest = pos.shift(dx, dy);
        if let Some(target) = self.actor_at(dest) {
            if target != id {
                return self.melee(id, target);
            }
        }
        if !self.map.walkable(dest) || self.blocking_entity_at(dest).is_some() {
            return Err(Impossible::new("That way is blocked."));
        }
        if let Some(e) = self.entities.get_mut(id).and_then(|e| e.as_mut()) {
            e.pos = dest;
        }
        Ok(())
    }

    fn melee(&mut self, attacker: Id, defender: Id) -> Result<(), Impossible> {
        let (atk_name, power) = match self.entities.get(attacker).and_then(|e| e.as_ref()) {
            Some(e) => (e.name.clone(), e.fighter().map_or(0, |f| f.power)),
            None => return Ok(()),
        };
        let (def_name, defense) = match self.entities.get(defender).and_then(|e| e.as_ref()) {
            Some(e) => (e.name.clone(), e.fighter().map_or(0, |f| f.defense)),
            None => return Err(Impossible::new("Nothing there to attack.")),
        };

        let damage = power - defense;
        let desc = format!("{atk_name} attacks {def_name}");
        let fg = if attacker == PLAYER_ID {
            colors::PLAYER_ATK
        } else {
            colors::ENEMY_ATK
        };
        if damage > 0 {
            self.log
                .add(&format!("{desc} for {damage} hit points."), fg);
            let died = self
                .entities
                .get_mut(defender)
                .and_then(|e| e.as_mut())
                .and_then(|e| e.fighter_mut())
                .map(|f| {
                    f.hp -= damage;
                    f.hp <= 0
                })
                .unwrap_or(false);
            if died {
                self.kill(defender);
            }
        } else {
            self.log.add(&format!("{desc} but does no damage."), fg);
        }
        Ok(())
    }

    /// Turn a dead actor into a corpse and award its XP.
    fn kill(&mut self, id: Id) {
        if id == PLAYER_ID {
            self.log.add("You died!", colors::PLAYER_DIE);
            if let Some(e) = self.entities.get_mut(id).and_then(|e| e.as_mut()) {
                e.die();
            }
            return;
        }
        let Some(e) = self.entities.get_mut(id).and_then(|e| e.as_mut()) else {
            return;
        };
        let name = e.name.clone();
        let xp = e.level().map_or(0, |l| l.xp_given);
        e.die();
        self.log.add(&format!("{name} is dead!"), colors::ENEMY_DIE);
        log::debug!("{name} (id {id}) died, awarding {xp} xp");
        if xp > 0 && self.player_alive() {
            if let Some(level) = self
                .entities
                .get_mut(PLAYER_ID)
                .and_then(|e| e.as_mut())
                .and_then(|e| e.level_mut())
            {
                level.add_xp(xp);
            }
            self.log
                .add(&format!("You gain {xp} experience points."), colors::WHITE);
            self.check_level_up();
        }
    }

    /// Apply any pending player level-ups. Each level grants 20 max hp.
    fn check_level_up(&mut self) {
        loop {
            let Some(player) = self.entities.get_mut(PLAYER_ID).and_then(|e| e.as_mut()) else {
                return;
            };
            if !player.level().is_some_and(|l| l.requires_level_up()) {
                return;
            }
            if let Some(level) = player.level_mut() {
                level.increase_level();
            }
            if let Some(f) = player.fighter_mut() {
                f.max_hp += 20;
                f.hp += 20;
            }
            let new_level = player.level().map_or(0, |l| l.current_level);
            self.log.add(
                &format!("You advance to level {new_level}!"),
                colors::WELCOME_TEXT,
            );
        }
    }

    // -- items --------------------------------------------------------------

    fn pick_up(&mut self) -> Result<(), Impossible> {
        let pos = self.player_pos();
        let item_id = self
            .item_at(pos)
            .ok_or_else(|| Impossible::new("There is nothing here to pick up."))?;
        let (capacity, len) = self
            .player()
            .and_then(|e| e.inventory())
            .map_or((0, 0), |inv| (inv.capacity, inv.items.len()));
        if len >= capacity {
            return Err(Impossible::new("Your inventory is full."));
        }
        let Some(item) = self.entities.get_mut(item_id).and_then(|slot| slot.take()) else {
            return Err(Impossible::new("There is nothing here to pick up."));
        };
        let name = item.name.clone();
        if let Some(inv) = self
            .entities
            .get_mut(PLAYER_ID)
            .and_then(|e| e.as_mut())
            .and_then(|e| e.inventory_mut())
        {
            inv.items.push(item);
        }
        self.log
            .add(&format!("You picked up the {name}!"), colors::WHITE);
        Ok(())
    }

    fn use_item(&mut self, index: usize) -> Result<(), Impossible> {
        let (name, consumable) = {
            let inv = self
                .player()
                .and_then(|e| e.inventory())
                .ok_or_else(|| Impossible::new("Invalid entry."))?;
            let item = inv
                .items
                .get(index)
                .ok_or_else(|| Impossible::new("Invalid entry."))?;
            let consumable = item
                .consumable()
                .ok_or_else(|| Impossible::new("Invalid entry."))?;
            (item.name.clone(), consumable)
        };

        match consumable {
            Consumable::Healing { amount } => {
                let recovered = {
                    let fighter = self
                        .entities
                        .get_mut(PLAYER_ID)
                        .and_then(|e| e.as_mut())
                        .and_then(|e| e.fighter_mut())
                        .ok_or_else(|| Impossible::new("Invalid entry."))?;
                    if fighter.hp >= fighter.max_hp {
                        return Err(Impossible::new("Your health is already full."));
                    }
                    fighter.heal(amount)
                };
                self.remove_inventory_item(index);
                self.log.add(
                    &format!("You consume the {name}, and recover {recovered} HP!"),
                    colors::HEALTH_RECOVERED,
                );
            }
            Consumable::Lightning { damage, range } => {
                let target = self
                    .closest_visible_enemy(range)
                    .ok_or_else(|| Impossible::new("No enemy is close enough to strike."))?;
                self.remove_inventory_item(index);
                let target_name = self
                    .entities
                    .get(target)
                    .and_then(|e| e.as_ref())
                    .map_or_else(String::new, |e| e.name.clone());
                self.log.add(
                    &format!(
                        "A lighting bolt strikes the {target_name} with a loud thunder, for {damage} damage!"
                    ),
                    colors::WHITE,
                );
                let died = self
                    .entities
                    .get_mut(target)
                    .and_then(|e| e.as_mut())
                    .and_then(|e| e.fighter_mut())
                    .map(|f| {
                        f.hp -= damage;
                        f.hp <= 0
                    })
                    .unwrap_or(false);
                if died {
                    self.kill(target);
                }
            }
        }
        Ok(())
    }

    fn remove_inventory_item(&mut self, index: usize) {
        if let Some(inv) = self
            .entities
            .get_mut(PLAYER_ID)
            .and_then(|e| e.as_mut())
            .and_then(|e| e.inventory_mut())
        {
            if index < inv.items.len() {
                inv.items.remove(index);
            }
        }
    }

    /// Nearest visible living enemy within `range` by Euclidean distance.
    fn closest_visible_enemy(&self, range: i32) -> Option<Id> {
        let pp = self.player_pos();
        let max_d2 = i64::from(range) * i64::from(range);
        let mut best: Option<(Id, i64)> = None;
        for (id, e) in self.enemies() {
            if !self.map.is_visible(e.pos) {
                continue;
            }
            let dx = i64::from(e.pos.x - pp.x);
            let dy = i64::from(e.pos.y - pp.y);
            let d2 = dx * dx + dy * dy;
            if d2 > max_d2 {
                continue;
            }
            if best.is_none_or(|(_, bd)| d2 < bd) {
                best = Some((id, d2));
            }
        }
        best.map(|(id, _)| id)
    }

    // -- enemy phase --------------------------------------------------------

    /// Run the enemy phase over a snapshot of living enemies, in id order.
    ///
    /// Actors killed after the snapshot was taken are skipped; the phase
    /// stops early if the player dies mid-way.
    fn process_enemies(&mut self) {
        let ids: Vec<Id> = self.enemies().map(|(id, _)| id).collect();
        for id in ids {
            if !self.player_alive() {
                break;
            }
            self.enemy_act(id);
        }
    }

    /// One enemy's turn. Tolerates ids whose actor died or was removed after
    /// the phase snapshot was taken.
    fn enemy_act(&mut self, id: Id) {
        let ai = self
            .entities
            .get(id)
            .and_then(|e| e.as_ref())
            .filter(|e| e.is_alive())
            .and_then(|e| e.ai());
        let Some(ai) = ai else { return };
        let step = match ai {
            Ai::Idle => None,
            Ai::Hostile => self.hostile_action(id),
        };
        if let Some((dx, dy)) = step {
            // AI mistakes are swallowed, not logged.
            let _ = self.bump(id, dx, dy);
        }
    }

    /// Decide a hostile actor's step for this turn, if any.
    ///
    /// Enemies act only while inside the player's field of view: adjacent
    /// ones attack, the rest path toward the player around other actors.
    fn hostile_action(&mut self, id: Id) -> Option<(i32, i32)> {
        let pos = self.entities.get(id).and_then(|e| e.as_ref())?.pos;
        if !self.map.is_visible(pos) {
            return None;
        }
        let pp = self.player_pos();
        if chebyshev(pos, pp) <= 1 {
            return Some((pp.x - pos.x, pp.y - pos.y));
        }
        let mut occupied = vec![false; (self.map.width * self.map.height) as usize];
        for (_, e) in self.living_actors() {
            let i = (e.pos.y * self.map.width + e.pos.x) as usize;
            if i < occupied.len() {
                occupied[i] = true;
            }
        }
        let Self { map, pr, .. } = self;
        let pather = ActorPather {
            map,
            occupied: &occupied,
            target: pp,
        };
        let path = pr.astar_path(&pather, pos, pp)?;
        let next = *path.get(1)?;
        // Only the player may be melee-bumped; a step onto another actor's
        // tile is forfeited instead.
        let ni = (next.y * map.width + next.x) as usize;
        if occupied.get(ni).copied().unwrap_or(false) {
            return None;
        }
        Some((next.x - pos.x, next.y - pos.y))
    }

    // -- field of view ------------------------------------------------------

    /// Recompute the player's field of view and fold it into the explored
    /// mask.
    pub fn update_fov(&mut self) {
        let pp = self.player_pos();
        let Self { fov, map, .. } = self;
        fov.compute_circular(pp, FOV_RADIUS, |p| map.transparent(p));
        map.clear_visible();
        for p in fov.iter_visible() {
            map.mark_visible(p);
        }
    }

    // -- floors -------------------------------------------------------------

    /// Generate the next floor and move the player onto it.
    ///
    /// Everything except the player is left behind; the message log and turn
    /// counter carry over.
    fn descend(&mut self) -> Result<(), GameError> {
        self.world.current_floor += 1;
        let dungeon = generate_dungeon(&self.world, &mut self.rng)?;
        let mut player = self
            .entities
            .get_mut(PLAYER_ID)
            .and_then(|slot| slot.take())
            .unwrap_or_else(entity::player);
        player.pos = dungeon.player_start;
        self.map = dungeon.map;
        self.entities.clear();
        self.entities.push(Some(player));
        self.entities.extend(dungeon.spawned.into_iter().map(Some));
        self.pr.set_range(self.map.bounds());
        self.fov.set_range(self.map.bounds());
        self.update_fov();
        self.turn += 1;
        self.log
            .add("You descend the staircase.", colors::DESCEND);
        log::info!(
            "descended to floor {}, {} entities",
            self.world.current_floor,
            self.entities.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_game(seed: u64) -> Game {
        Game::new(GameWorld::default(), seed).unwrap()
    }

    /// A bare session on a 7x3 map whose middle row is an open corridor,
    /// with the player alone at (1, 1).
    fn corridor_game() -> Game {
        use crate::terrain::Tile;
        let mut game = test_game(14);
        let mut map = GameMap::new(7, 3);
        for x in 1..6 {
            map.set_tile(Point::new(x, 1), Tile::Floor);
        }
        game.map = map;
        game.pr.set_range(game.map.bounds());
        game.fov.set_range(game.map.bounds());
        game.entities.clear();
        let mut player = entity::player();
        player.pos = Point::new(1, 1);
        game.entities.push(Some(player));
        game.update_fov();
        game
    }

    /// A walkable tile adjacent to the player with nothing standing on it.
    fn free_neighbor(game: &Game) -> Point {
        game.player_pos()
            .neighbors_4()
            .into_iter()
            .find(|&p| game.map.walkable(p) && game.entities_at(p).next().is_none())
            .expect("player should have a free neighbor in a room interior")
    }

    fn player_hp(game: &Game) -> i32 {
        game.player().and_then(|e| e.fighter()).unwrap().hp
    }

    #[test]
    fn new_game_basics() {
        let game = test_game(1);
        assert!(game.player_alive());
        assert_eq!(player_hp(&game), 30);
        assert!(game.map.is_visible(game.player_pos()));
        assert!(game.map.explored_count() > 0);
        assert_eq!(game.log.messages.len(), 1);
        assert_eq!(game.world.current_floor, 1);
    }

    #[test]
    fn waiting_consumes_a_turn() {
        let mut game = test_game(2);
        assert_eq!(game.advance(Action::Wait).unwrap(), Advance::Turn);
        assert_eq!(game.turn, 1);
        assert_eq!(game.advance(Action::Quit).unwrap(), Advance::Quit);
        assert_eq!(game.turn, 1);
    }

    #[test]
    fn explored_never_shrinks() {
        let mut game = test_game(3);
        let mut explored = game.map.explored_count();
        let dirs = [(1, 0), (0, 1), (-1, 0), (1, 0), (0, -1), (1, 0)];
        for (dx, dy) in dirs.into_iter().cycle().take(40) {
            let _ = game.advance(Action::Move { dx, dy }).unwrap();
            let now = game.map.explored_count();
            assert!(now >= explored);
            explored = now;
            if !game.player_alive() {
                break;
            }
        }
    }

    #[test]
    fn impossible_actions_cost_nothing() {
        let mut game = test_game(4);
        let logged = game.log.messages.len();
        // Empty inventory, so any use is invalid.
        assert_eq!(game.advance(Action::UseItem(0)).unwrap(), Advance::Pending);
        assert_eq!(game.turn, 0);
        assert!(game.log.messages.len() > logged);
        assert_eq!(
            game.log.messages.last().unwrap().fg,
            colors::IMPOSSIBLE
        );
    }

    #[test]
    fn descend_requires_stairs() {
        let mut game = test_game(5);
        // Player starts in the first room, stairs are in the last.
        assert_ne!(game.player_pos(), game.map.downstairs);
        assert_eq!(game.advance(Action::Descend).unwrap(), Advance::Pending);
        assert_eq!(game.world.current_floor, 1);
    }

    #[test]
    fn descend_regenerates_the_floor() {
        let mut game = test_game(6);
        let stairs = game.map.downstairs;
        if let Some(e) = game.entities.get_mut(PLAYER_ID).and_then(|e| e.as_mut()) {
            e.pos = stairs;
        }
        game.update_fov();
        assert_eq!(game.advance(Action::Descend).unwrap(), Advance::Turn);
        assert_eq!(game.world.current_floor, 2);
        assert!(game.player_alive());
        assert!(game.map.walkable(game.player_pos()));
        // Old corpses and items do not carry over.
        for e in game.entities() {
            assert!(!e.name.starts_with("remains of"));
        }
        assert_eq!(
            game.log.messages.last().unwrap().text,
            "You descend the staircase."
        );
    }

    #[test]
    fn bump_attack_kills_and_awards_xp() {
        let mut game = test_game(7);
        let spot = free_neighbor(&game);
        let mut target = entity::menace();
        target.pos = spot;
        game.entities.push(Some(target));
        let target_id = game.entities.len() - 1;
        let (dx, dy) = {
            let pp = game.player_pos();
            (spot.x - pp.x, spot.y - pp.y)
        };

        // Player power 5 vs defense 0; 10 hp falls in two hits.
        assert_eq!(game.advance(Action::Move { dx, dy }).unwrap(), Advance::Turn);
        assert_eq!(
            game.entities[target_id].as_ref().unwrap().fighter().unwrap().hp,
            5
        );
        assert_eq!(game.advance(Action::Move { dx, dy }).unwrap(), Advance::Turn);

        let corpse = game.entities[target_id].as_ref().unwrap();
        assert!(!corpse.is_alive());
        assert_eq!(corpse.name, "remains of Menace");
        assert!(!corpse.blocks_movement);
        assert!(
            game.log
                .messages
                .iter()
                .any(|m| m.text == "Menace is dead!")
        );
        let xp = game.player().and_then(|e| e.level()).unwrap().current_xp;
        assert_eq!(xp, 35);
    }

    #[test]
    fn adjacent_enemy_strikes_back() {
        let mut game = test_game(8);
        let spot = free_neighbor(&game);
        let mut target = entity::droid();
        target.pos = spot;
        game.entities.push(Some(target));

        // Droid power 4 vs player defense 2.
        let before = player_hp(&game);
        game.advance(Action::Wait).unwrap();
        assert!(player_hp(&game) <= before - 2);
    }

    #[test]
    fn healing_item_flow() {
        let mut game = test_game(9);
        if let Some(inv) = game
            .entities
            .get_mut(PLAYER_ID)
            .and_then(|e| e.as_mut())
            .and_then(|e| e.inventory_mut())
        {
            inv.items.push(entity::menace_energy());
        }

        // At full health the item refuses and is kept.
        assert_eq!(game.advance(Action::UseItem(0)).unwrap(), Advance::Pending);
        assert_eq!(
            game.log.messages.last().unwrap().text,
            "Your health is already full."
        );

        if let Some(f) = game
            .entities
            .get_mut(PLAYER_ID)
            .and_then(|e| e.as_mut())
            .and_then(|e| e.fighter_mut())
        {
            f.hp = 20;
        }
        assert_eq!(game.advance(Action::UseItem(0)).unwrap(), Advance::Turn);
        assert!(player_hp(&game) >= 23 - 4); // enemies may retaliate
        let inv_len = game.player().and_then(|e| e.inventory()).unwrap().items.len();
        assert_eq!(inv_len, 0);
    }

    #[test]
    fn lightning_strikes_the_nearest_visible_enemy() {
        let mut game = test_game(10);
        let spot = free_neighbor(&game);
        let mut target = entity::menace();
        target.pos = spot;
        game.entities.push(Some(target));
        game.update_fov();
        if let Some(inv) = game
            .entities
            .get_mut(PLAYER_ID)
            .and_then(|e| e.as_mut())
            .and_then(|e| e.inventory_mut())
        {
            inv.items.push(entity::lightning_gun());
        }

        // Adjacent enemies tie at distance 1; the bolt hits whichever the
        // session considers closest, and 20 damage one-shots anything here.
        let expected = game.closest_visible_enemy(5).unwrap();
        assert_eq!(game.advance(Action::UseItem(0)).unwrap(), Advance::Turn);
        assert!(!game.entities[expected].as_ref().unwrap().is_alive());
    }

    #[test]
    fn pick_up_moves_the_item_into_the_inventory() {
        let mut game = test_game(11);
        let pos = game.player_pos();
        let mut item = entity::menace_energy();
        item.pos = pos;
        game.entities.push(Some(item));
        let item_id = game.entities.len() - 1;

        assert_eq!(game.advance(Action::PickUp).unwrap(), Advance::Turn);
        assert!(game.entities[item_id].is_none());
        let inv = game.player().and_then(|e| e.inventory()).unwrap();
        assert_eq!(inv.items.len(), 1);
        assert_eq!(inv.items[0].name, "Menace Energy");

        // Nothing left to pick up.
        assert_eq!(game.advance(Action::PickUp).unwrap(), Advance::Pending);
    }

    #[test]
    fn blocked_enemy_waits_instead_of_attacking_its_neighbor() {
        let mut game = corridor_game();
        // An inert droid stands between the player and a hostile menace.
        let mut bystander = entity::droid();
        bystander.pos = Point::new(2, 1);
        if let EntityKind::Actor { ai, .. } = &mut bystander.kind {
            *ai = Some(Ai::Idle);
        }
        game.entities.push(Some(bystander));
        let mut hostile = entity::menace();
        hostile.pos = Point::new(3, 1);
        game.entities.push(Some(hostile));
        game.update_fov();

        game.advance(Action::Wait).unwrap();

        // The menace's only step is onto the droid's tile, so it forfeits
        // the move; the droid is never treated as a melee target.
        let droid = game.entities[1].as_ref().unwrap();
        assert_eq!(droid.fighter().unwrap().hp, 16);
        assert_eq!(game.entities[2].as_ref().unwrap().pos, Point::new(3, 1));
        assert!(
            !game
                .log
                .messages
                .iter()
                .any(|m| m.text.contains("attacks Droid"))
        );
    }

    #[test]
    fn enemy_phase_skips_actors_killed_after_the_snapshot() {
        let mut game = corridor_game();
        let mut near = entity::menace();
        near.pos = Point::new(3, 1);
        game.entities.push(Some(near));
        let mut far = entity::menace();
        far.pos = Point::new(5, 1);
        game.entities.push(Some(far));
        game.update_fov();

        // Snapshot first, then the first entry dies before its slot in the
        // iteration comes up, exactly as in the phase loop.
        let ids: Vec<Id> = game.enemies().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 2]);
        if let Some(f) = game.entities[1].as_mut().and_then(|e| e.fighter_mut()) {
            f.hp = 0;
        }
        game.kill(1);
        for id in ids {
            game.enemy_act(id);
        }

        // The corpse neither moved nor acted; the survivor stepped through
        // the now-unblocked corridor.
        let corpse = game.entities[1].as_ref().unwrap();
        assert!(!corpse.is_alive());
        assert_eq!(corpse.pos, Point::new(3, 1));
        assert_eq!(game.entities[2].as_ref().unwrap().pos, Point::new(4, 1));
    }

    #[test]
    fn player_death_ends_input() {
        let mut game = test_game(13);
        if let Some(f) = game
            .entities
            .get_mut(PLAYER_ID)
            .and_then(|e| e.as_mut())
            .and_then(|e| e.fighter_mut())
        {
            f.hp = 0;
        }
        game.kill(PLAYER_ID);
        assert!(!game.player_alive());
        assert_eq!(
            game.log.messages.last().unwrap().text,
            "You died!"
        );
        assert_eq!(game.advance(Action::Wait).unwrap(), Advance::Pending);
        assert_eq!(game.advance(Action::Quit).unwrap(), Advance::Quit);
    }
}
