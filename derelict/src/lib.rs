//! Derelict — a turn-based dungeon-crawler core.
//!
//! The crate owns the simulation only: dungeon generation, field of view,
//! entities, the turn loop and persistence. Input collection and drawing
//! belong to the embedding frontend, which feeds [`Action`]s into a [`Game`]
//! and renders the [`viewport::Projection`] it gets back.

pub mod action;
pub mod ai;
pub mod colors;
pub mod entity;
pub mod error;
pub mod game;
pub mod gamemap;
pub mod log;
pub mod procgen;
pub mod save;
pub mod terrain;
pub mod viewport;

pub use action::Action;
pub use game::{Advance, FOV_RADIUS, Game};
pub use gamemap::{GameMap, GameWorld};
