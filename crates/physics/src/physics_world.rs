//! Static collider world with Rapier3D.

use crate::collision::{CollisionGroup, CollisionSet};
use engine_core::{Aabb, Quat, Vec3};
use rapier3d::na::{Isometry3, Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;

/// Collider storage plus the query pipeline used for probes.
///
/// There is no simulation step: every collider is parentless and fixed, so
/// the rigid-body set only exists because Rapier's query API asks for it.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub island_manager: IslandManager,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create an empty collider world.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Update query pipeline after colliders were added or removed.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static cuboid collider. No parent body; collider is fixed in world.
    /// `translation`: world position of center. `rotation`: orientation of the box.
    /// `half_extents`: half sizes in local X, Y, Z (before rotation).
    pub fn add_static_cuboid(
        &mut self,
        translation: Vec3,
        rotation: Quat,
        half_extents: Vec3,
        group: CollisionGroup,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(
            half_extents.x as Real,
            half_extents.y as Real,
            half_extents.z as Real,
        )
        .position(isometry(translation, rotation))
        .collision_groups(group.groups())
        .build();
        self.collider_set.insert(collider)
    }

    /// Add an upright static cylinder (towers).
    pub fn add_static_cylinder(
        &mut self,
        translation: Vec3,
        half_height: f32,
        radius: f32,
        group: CollisionGroup,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cylinder(half_height as Real, radius as Real)
            .translation(vector![translation.x, translation.y, translation.z])
            .collision_groups(group.groups())
            .build();
        self.collider_set.insert(collider)
    }

    /// Remove a collider by its handle.
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.rigid_body_set,
            true,
        );
    }

    /// World-space bounds of a collider.
    pub fn collider_aabb(&self, handle: ColliderHandle) -> Option<Aabb> {
        self.collider_set.get(handle).map(collider_bounds)
    }

    /// Every collider of `set` with its world-space bounds.
    pub fn colliders_in(&self, set: CollisionSet) -> Vec<(ColliderHandle, Aabb)> {
        self.collider_set
            .iter()
            .filter(|(_, c)| set.contains(c.collision_groups()))
            .map(|(h, c)| (h, collider_bounds(c)))
            .collect()
    }

    /// Whether `aabb` overlaps the bounds of any collider in `set`.
    pub fn overlaps_any(&self, aabb: &Aabb, set: CollisionSet) -> bool {
        self.collider_set
            .iter()
            .filter(|(_, c)| set.contains(c.collision_groups()))
            .any(|(_, c)| collider_bounds(c).intersects(aabb))
    }

    /// Number of colliders in the world.
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }
}

fn isometry(translation: Vec3, rotation: Quat) -> Isometry3<Real> {
    let q = UnitQuaternion::from_quaternion(Quaternion::new(
        rotation.w as Real,
        rotation.x as Real,
        rotation.y as Real,
        rotation.z as Real,
    ));
    Isometry3::from_parts(
        Translation3::new(translation.x as Real, translation.y as Real, translation.z as Real),
        q,
    )
}

fn collider_bounds(collider: &Collider) -> Aabb {
    let aabb = collider.compute_aabb();
    Aabb::new(
        Vec3::new(aabb.mins.x, aabb.mins.y, aabb.mins.z),
        Vec3::new(aabb.maxs.x, aabb.maxs.y, aabb.maxs.z),
    )
}
