//! World registry: static city colliders, zones, and the interactable/NPC entities.

use engine_core::{Aabb, Name, Patrol, Transform, Velocity};
use glam::{EulerRot, Quat, Vec3};
use hecs::{Entity, World};
use physics::{CollisionGroup, CollisionSet, ColliderHandle, PhysicsWorld};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::layout::{
    self, InteractableSpec, InteractionKind, NpcSpec, RampSpec, StreetSpec, StructureShape, ZoneSpec,
    GROUND_LEVEL, GROUND_SIZE, NPC_HEIGHT, PLATFORM_HEIGHT,
};
use crate::npc;
use crate::player::InventoryItem;

/// Interaction data attached to interactable entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Interactable {
    pub id: String,
    pub kind: InteractionKind,
    pub prompt: Option<String>,
    pub content: String,
}

/// Copy of an interactable's data, detached from the ECS.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractableView {
    pub entity: Entity,
    pub id: String,
    pub name: String,
    pub position: Vec3,
    pub kind: InteractionKind,
    pub prompt: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct Zone {
    pub id: String,
    pub name: String,
    /// Platform bounds.
    pub bounds: Aabb,
}

pub struct WorldRegistry {
    physics: PhysicsWorld,
    entities: World,
    zones: Vec<Zone>,
    streets: Vec<StreetSpec>,
    ramps: Vec<RampSpec>,
    rng: StdRng,
}

impl WorldRegistry {
    /// Empty world with only the ground plane.
    pub fn new(rng: StdRng) -> Self {
        let mut physics = PhysicsWorld::new();
        let half = GROUND_SIZE / 2.0;
        physics.add_static_cuboid(
            Vec3::new(0.0, GROUND_LEVEL - 0.5, 0.0),
            Quat::IDENTITY,
            Vec3::new(half, 0.5, half),
            CollisionGroup::Ground,
        );
        physics.update_query_pipeline();
        Self {
            physics,
            entities: World::new(),
            zones: Vec::new(),
            streets: Vec::new(),
            ramps: Vec::new(),
            rng,
        }
    }

    /// The full city.
    pub fn city() -> Self {
        Self::city_with_rng(StdRng::from_entropy())
    }

    pub fn city_with_rng(rng: StdRng) -> Self {
        let mut world = Self::new(rng);
        for zone in layout::zones() {
            world.add_zone(&zone);
        }
        world.streets = layout::streets();
        for ramp in layout::ramps() {
            world.add_ramp(ramp);
        }
        for spec in layout::interactables() {
            world.spawn_interactable(&spec);
        }
        for spec in layout::npcs() {
            world.spawn_npc(&spec);
        }
        world.physics.update_query_pipeline();
        log::info!(
            "City built: {} zones, {} ramps, {} streets, {} colliders, {} interactables",
            world.zones.len(),
            world.ramps.len(),
            world.streets.len(),
            world.physics.collider_count(),
            world.interactables().len()
        );
        world
    }

    pub fn add_zone(&mut self, spec: &ZoneSpec) {
        let (w, d) = spec.footprint;
        let platform_half = Vec3::new(w / 2.0, PLATFORM_HEIGHT / 2.0, d / 2.0);
        let platform_center = Vec3::new(spec.center.x, PLATFORM_HEIGHT / 2.0, spec.center.z);
        self.physics
            .add_static_cuboid(platform_center, Quat::IDENTITY, platform_half, CollisionGroup::Platform);

        let size = spec.structure_size;
        let structure_center = Vec3::new(spec.center.x, size.y / 2.0 + PLATFORM_HEIGHT, spec.center.z);
        match spec.structure {
            StructureShape::Building => self.physics.add_static_cuboid(
                structure_center,
                Quat::IDENTITY,
                size / 2.0,
                CollisionGroup::Structure,
            ),
            StructureShape::Tower => self.physics.add_static_cylinder(
                structure_center,
                size.y / 2.0,
                size.x / 2.0,
                CollisionGroup::Structure,
            ),
        };
        self.zones.push(Zone {
            id: spec.id.to_string(),
            name: spec.name.to_string(),
            bounds: Aabb::from_center_half_extents(platform_center, platform_half),
        });
        self.physics.update_query_pipeline();
    }

    pub fn add_ramp(&mut self, spec: RampSpec) {
        let r = spec.rotation;
        let rotation = Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z);
        let center = Vec3::new(spec.position.x, spec.size.y / 2.0, spec.position.z);
        self.physics
            .add_static_cuboid(center, rotation, spec.size / 2.0, CollisionGroup::Ramp);
        self.ramps.push(spec);
        self.physics.update_query_pipeline();
    }

    pub fn spawn_interactable(&mut self, spec: &InteractableSpec) -> Entity {
        self.entities.spawn((
            Transform::from_position(spec.position),
            Name::new(spec.name),
            Interactable {
                id: spec.id.to_string(),
                kind: spec.kind.clone(),
                prompt: spec.prompt.map(str::to_string),
                content: spec.content.to_string(),
            },
        ))
    }

    /// Put a carried item back in the world as a pickup at `position`.
    pub fn spawn_pickup(&mut self, item: InventoryItem, position: Vec3) -> Entity {
        let name = item.name.clone();
        self.entities.spawn((
            Transform::from_position(position),
            Name::new(name.clone()),
            Interactable {
                id: item.id.clone(),
                kind: InteractionKind::CollectibleItem { item },
                prompt: Some(format!("Press [E] to pick up {}", name)),
                content: String::new(),
            },
        ))
    }

    pub fn spawn_npc(&mut self, spec: &NpcSpec) -> Entity {
        let position = Vec3::new(spec.position.x, NPC_HEIGHT, spec.position.z);
        let speed = npc::random_patrol_speed(&mut self.rng);
        let mut patrol = Patrol::new(position, spec.patrol_radius, speed);
        patrol.target = npc::random_patrol_point(&patrol, NPC_HEIGHT, &mut self.rng);
        self.entities.spawn((
            Transform::from_position(position),
            Name::new(spec.name),
            Interactable {
                id: spec.id.to_string(),
                kind: InteractionKind::Npc {
                    dialogue: spec.dialogue.to_string(),
                },
                prompt: Some(format!("Press [E] to talk to {}", spec.name)),
                content: String::new(),
            },
            patrol,
            Velocity::default(),
        ))
    }

    /// Advance NPC patrols.
    pub fn update(&mut self, dt: f32) {
        npc::update_patrols(&mut self.entities, &mut self.rng, dt);
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Collidable geometry with its bounds; `structures_only` leaves out ground, platforms and ramps.
    pub fn collision_objects(&self, structures_only: bool) -> Vec<(ColliderHandle, Aabb)> {
        self.physics.colliders_in(CollisionSet::from_structures_only(structures_only))
    }

    /// Every interactable (items, panels, devices and NPC proxies) with its position.
    pub fn interactables(&self) -> Vec<(Entity, Vec3)> {
        self.entities
            .query::<(&Transform, &Interactable)>()
            .iter()
            .map(|(e, (t, _))| (e, t.position))
            .collect()
    }

    pub fn interactable(&self, entity: Entity) -> Option<InteractableView> {
        let mut query = self
            .entities
            .query_one::<(&Transform, &Name, &Interactable)>(entity)
            .ok()?;
        let (transform, name, interactable) = query.get()?;
        Some(InteractableView {
            entity,
            id: interactable.id.clone(),
            name: name.as_str().to_string(),
            position: transform.position,
            kind: interactable.kind.clone(),
            prompt: interactable.prompt.clone(),
            content: interactable.content.clone(),
        })
    }

    pub fn find_interactable(&self, id: &str) -> Option<Entity> {
        self.entities
            .query::<&Interactable>()
            .iter()
            .find(|(_, i)| i.id == id)
            .map(|(e, _)| e)
    }

    /// Pickup in the world that carries the item `item_id`.
    pub fn find_pickup(&self, item_id: &str) -> Option<Entity> {
        self.entities
            .query::<&Interactable>()
            .iter()
            .find(|(_, i)| matches!(&i.kind, InteractionKind::CollectibleItem { item } if item.id == item_id))
            .map(|(e, _)| e)
    }

    /// Remove an interactable. False when it is already gone.
    pub fn remove_interactable(&mut self, entity: Entity) -> bool {
        self.entities.despawn(entity).is_ok()
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Zone whose platform contains `position` on the ground plane.
    pub fn zone_at(&self, position: Vec3) -> Option<&Zone> {
        self.zones.iter().find(|z| z.bounds.contains_xz(position))
    }

    /// Where `position` is: a zone name, a street, or open ground.
    pub fn location_label(&self, position: Vec3) -> &str {
        if let Some(zone) = self.zone_at(position) {
            return &zone.name;
        }
        if self.streets.iter().any(|s| s.contains_xz(position)) {
            "Street"
        } else {
            "Open ground"
        }
    }
}
