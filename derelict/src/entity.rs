//! Entities and their capability components.

use rlkit_core::{Color, Point};
use serde::{Deserialize, Serialize};

use crate::colors;

/// Type alias for entity IDs (index into the session's entity vec).
pub type Id = usize;

/// Player entity ID (always the first slot).
pub const PLAYER_ID: Id = 0;

/// Draw priority for co-located entities, lowest drawn first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderOrder {
    Corpse = 0,
    Item = 1,
    Actor = 2,
}

/// AI strategy attached to an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ai {
    /// Does nothing.
    Idle,
    /// Pursues and attacks the player while visible.
    Hostile,
}

/// Combat stats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Fighter {
    pub hp: i32,
    pub max_hp: i32,
    pub defense: i32,
    pub power: i32,
}

impl Fighter {
    pub fn new(hp: i32, defense: i32, power: i32) -> Self {
        Self {
            hp,
            max_hp: hp,
            defense,
            power,
        }
    }

    /// Heal up to `amount`, clamped at max hp. Returns the amount recovered.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let new_hp = (self.hp + amount).min(self.max_hp);
        let recovered = new_hp - self.hp;
        self.hp = new_hp;
        recovered
    }
}

/// Experience and level progression.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Level {
    pub current_level: i32,
    pub current_xp: i32,
    pub level_up_base: i32,
    pub level_up_factor: i32,
    /// XP awarded to the killer when this actor dies.
    pub xp_given: i32,
}

impl Level {
    pub fn new(level_up_base: i32, xp_given: i32) -> Self {
        Self {
            current_level: 1,
            current_xp: 0,
            level_up_base,
            level_up_factor: 150,
            xp_given,
        }
    }

    /// XP threshold for the next level.
    pub fn experience_to_next_level(&self) -> i32 {
        self.level_up_base + self.current_level * self.level_up_factor
    }

    pub fn requires_level_up(&self) -> bool {
        self.current_xp >= self.experience_to_next_level()
    }

    pub fn add_xp(&mut self, xp: i32) {
        self.current_xp += xp;
    }

    /// Consume the current threshold and advance one level.
    pub fn increase_level(&mut self) {
        self.current_xp -= self.experience_to_next_level();
        self.current_level += 1;
    }
}

/// Single-use item effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Consumable {
    Healing { amount: i32 },
    Lightning { damage: i32, range: i32 },
}

/// Item storage carried by an actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub capacity: usize,
    pub items: Vec<Entity>,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }
}

/// An entity's polymorphic role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Actor {
        fighter: Fighter,
        inventory: Inventory,
        ai: Option<Ai>,
        level: Level,
    },
    Item {
        consumable: Consumable,
    },
}

/// An entity in the game world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub ch: char,
    pub color: Color,
    pub pos: Point,
    pub blocks_movement: bool,
    pub render_order: RenderOrder,
    pub kind: EntityKind,
}

impl Entity {
    /// Fighter component, if the entity is an actor.
    pub fn fighter(&self) -> Option<&Fighter> {
        match &self.kind {
            EntityKind::Actor { fighter, .. } => Some(fighter),
            EntityKind::Item { .. } => None,
        }
    }

    pub fn fighter_mut(&mut self) -> Option<&mut Fighter> {
        match &mut self.kind {
            EntityKind::Actor { fighter, .. } => Some(fighter),
            EntityKind::Item { .. } => None,
        }
    }

    pub fn ai(&self) -> Option<Ai> {
        match &self.kind {
            EntityKind::Actor { ai, .. } => *ai,
            EntityKind::Item { .. } => None,
        }
    }

    pub fn inventory(&self) -> Option<&Inventory> {
        match &self.kind {
            EntityKind::Actor { inventory, .. } => Some(inventory),
            EntityKind::Item { .. } => None,
        }
    }

    pub fn inventory_mut(&mut self) -> Option<&mut Inventory> {
        match &mut self.kind {
            EntityKind::Actor { inventory, .. } => Some(inventory),
            EntityKind::Item { .. } => None,
        }
    }

    pub fn level(&self) -> Option<&Level> {
        match &self.kind {
            EntityKind::Actor { level, .. } => Some(level),
            EntityKind::Item { .. } => None,
        }
    }

    pub fn level_mut(&mut self) -> Option<&mut Level> {
        match &mut self.kind {
            EntityKind::Actor { level, .. } => Some(level),
            EntityKind::Item { .. } => None,
        }
    }

    pub fn consumable(&self) -> Option<Consumable> {
        match &self.kind {
            EntityKind::Item { consumable } => Some(*consumable),
            EntityKind::Actor { .. } => None,
        }
    }

    /// Whether this entity is an actor with positive hp.
    pub fn is_alive(&self) -> bool {
        self.fighter().is_some_and(|f| f.hp > 0)
    }

    /// Turn this actor into a corpse in place.
    pub fn die(&mut self) {
        self.name = format!("remains of {}", self.name);
        self.ch = '%';
        self.color = colors::CORPSE;
        self.blocks_movement = false;
        self.render_order = RenderOrder::Corpse;
        if let EntityKind::Actor { ai, .. } = &mut self.kind {
            *ai = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Factories
// ---------------------------------------------------------------------------

fn actor(
    name: &str,
    ch: char,
    color: Color,
    fighter: Fighter,
    ai: Option<Ai>,
    inventory_capacity: usize,
    level: Level,
) -> Entity {
    Entity {
        name: name.to_string(),
        ch,
        color,
        pos: Point::ZERO,
        blocks_movement: true,
        render_order: RenderOrder::Actor,
        kind: EntityKind::Actor {
            fighter,
            inventory: Inventory::new(inventory_capacity),
            ai,
            level,
        },
    }
}

fn item(name: &str, ch: char, color: Color, consumable: Consumable) -> Entity {
    Entity {
        name: name.to_string(),
        ch,
        color,
        pos: Point::ZERO,
        blocks_movement: false,
        render_order: RenderOrder::Item,
        kind: EntityKind::Item { consumable },
    }
}

pub fn player() -> Entity {
    actor(
        "Player",
        '@',
        colors::WHITE,
        Fighter::new(30, 2, 5),
        None,
        26,
        Level::new(200, 0),
    )
}

pub fn menace() -> Entity {
    actor(
        "Menace",
        'm',
        Color::from_rgb(63, 127, 63),
        Fighter::new(10, 0, 3),
        Some(Ai::Hostile),
        0,
        Level::new(200, 35),
    )
}

pub fn droid() -> Entity {
    actor(
        "Droid",
        'd',
        Color::from_rgb(0, 127, 0),
        Fighter::new(16, 1, 4),
        Some(Ai::Hostile),
        0,
        Level::new(200, 75),
    )
}

pub fn menace_energy() -> Entity {
    item(
        "Menace Energy",
        '!',
        Color::from_rgb(0, 127, 0),
        Consumable::Healing { amount: 3 },
    )
}

pub fn large_menace_energy() -> Entity {
    item(
        "Large Menace Energy",
        '!',
        Color::from_rgb(0, 255, 0),
        Consumable::Healing { amount: 6 },
    )
}

pub fn lightning_gun() -> Entity {
    item(
        "Lightning Gun",
        '~',
        Color::from_rgb(255, 255, 0),
        Consumable::Lightning {
            damage: 20,
            range: 5,
        },
    )
}
