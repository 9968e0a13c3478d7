//! A* pathfinding for grid-based games.
//!
//! Searches operate through [`PathRange`], which owns and reuses internal
//! caches so that repeated queries incur zero allocations after warm-up.
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | neighbor enumeration |
//! | [`WeightedPather`] : [`Pather`] | weighted edges |
//! | [`AstarPather`] : [`WeightedPather`] | A* |

mod astar;
mod distance;
mod pathrange;
mod traits;

pub use distance::{chebyshev, manhattan};
pub use pathrange::{PathRange, UNREACHABLE};
pub use traits::{AstarPather, Pather, WeightedPather};
