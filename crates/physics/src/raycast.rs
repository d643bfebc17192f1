//! Raycasting for ground detection.

use crate::collision::CollisionSet;
use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

impl RaycastHit {
    /// How much the surface faces straight up (1 = flat floor, 0 = wall).
    pub fn up_dot(&self) -> f32 {
        self.normal.dot(Vec3::Y)
    }
}

impl PhysicsWorld {
    /// Cast a ray and return the nearest hit among colliders of `set`.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        set: CollisionSet,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                set.filter(),
            )
            .map(|(collider, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                RaycastHit {
                    collider,
                    distance: intersection.time_of_impact,
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                }
            })
    }

    /// Straight-down probe for the surface under `origin`, within `max_distance`.
    pub fn probe_ground(&self, origin: Vec3, max_distance: f32) -> Option<RaycastHit> {
        self.raycast(origin, Vec3::NEG_Y, max_distance, CollisionSet::All)
    }
}
