//! Field of vision via symmetric shadow casting.
//!
//! Iterative SSC based on Albert Ford's algorithm: binary visibility with
//! expansive walls, symmetric between mutually visible floor tiles. Cardinal
//! adjacency only is used when revealing boundary cells, which avoids showing
//! walls that are only diagonally connected to the lit area.

mod fov;

pub use fov::Fov;
