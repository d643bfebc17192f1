//! Collision queries for Legacy City, backed by Rapier3D.
//!
//! The city is static: every collider is fixed at build time and the only
//! queries are ground probes (rays) and box overlap tests.

pub mod collision;
pub mod physics_world;
pub mod raycast;

pub use collision::*;
pub use physics_world::*;
pub use raycast::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::ColliderHandle;
