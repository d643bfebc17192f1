//! Core engine types and utilities for Legacy City.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform and axis-aligned bounds
//! - Frame timing
//! - Common component types for ECS

pub mod bounds;
pub mod components;
pub mod time;
pub mod transform;

pub use bounds::*;
pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};

/// Exponential smoothing step used for cosmetic values (tilt, camera roll).
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
