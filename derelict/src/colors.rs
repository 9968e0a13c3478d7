//! Message and entity colour palette.

use rlkit_core::Color;

pub const WHITE: Color = Color::from_rgb(0xFF, 0xFF, 0xFF);
pub const BLACK: Color = Color::from_rgb(0x00, 0x00, 0x00);

// -- Combat --

pub const PLAYER_ATK: Color = Color::from_rgb(0xE0, 0xE0, 0xE0);
pub const ENEMY_ATK: Color = Color::from_rgb(0xFF, 0xC0, 0xC0);
pub const PLAYER_DIE: Color = Color::from_rgb(0xFF, 0x30, 0x30);
pub const ENEMY_DIE: Color = Color::from_rgb(0xFF, 0xA0, 0x30);

/// Corpse '%' glyph colour.
pub const CORPSE: Color = Color::from_rgb(191, 0, 0);

// -- Events --

pub const WELCOME_TEXT: Color = Color::from_rgb(0x20, 0xA0, 0xFF);
pub const HEALTH_RECOVERED: Color = Color::from_rgb(0x00, 0xFF, 0x00);
pub const DESCEND: Color = Color::from_rgb(0x9F, 0x3F, 0xFF);

/// Rejected actions ("that way is blocked", full inventory, ...).
pub const IMPOSSIBLE: Color = Color::from_rgb(0x80, 0x80, 0x80);
