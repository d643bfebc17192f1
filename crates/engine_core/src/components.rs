//! Common ECS components used across the engine.

use glam::Vec3;

/// Velocity component for moving entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity {
    pub linear: Vec3,
}

/// Display name for an entity (prompts, dialogue titles, labels).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Wandering behaviour around a fixed centre.
#[derive(Debug, Clone, Copy)]
pub struct Patrol {
    pub center: Vec3,
    pub radius: f32,
    pub speed: f32,
    pub target: Vec3,
}

impl Patrol {
    pub fn new(center: Vec3, radius: f32, speed: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            speed,
            target: center,
        }
    }

    /// Radius zero means the entity never moves.
    pub fn is_moving(&self) -> bool {
        self.radius > 0.0
    }
}
