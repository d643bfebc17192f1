//! Vehicle physics: drift, steering, boundary and wall collision, ground probing, jumps.
//!
//! `Vehicle::update` only mutates vehicle state and reports what happened as
//! [`VehicleEvent`]s; notifications, XP and stats are applied by the session.

use engine_core::{lerp, rotate_by_yaw, yaw_forward, Aabb, Vec3};
use input::InputState;
use physics::PhysicsWorld;
use serde::{Deserialize, Serialize};

/// Half extents of the car body box (width, height, length).
pub const BODY_HALF_EXTENTS: Vec3 = Vec3::new(0.6, 0.25, 1.0);
/// Resting height of the body centre above the vehicle base.
pub const BODY_REST_HEIGHT: f32 = 0.4;
/// Frame rate the per-frame velocity units are calibrated against.
pub const NOMINAL_FRAME_RATE: f32 = 60.0;

/// Every tunable constant of the driving model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    pub base_speed: f32,
    /// Radians per second at full steering.
    pub turn_rate: f32,
    /// Per-frame velocity retention (< 1).
    pub drift_factor: f32,
    pub acceleration_factor: f32,
    pub braking_factor: f32,
    pub reverse_factor: f32,
    /// Body roll per unit of speed while turning.
    pub suspension_height: f32,
    pub ramp_boost_factor: f32,
    pub air_control_factor: f32,
    /// Seconds of air time during which steering still has some effect.
    pub air_control_window: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
    pub ramp_jump_velocity: f32,
    /// Forward nudge added to a moving car when it jumps.
    pub jump_forward_impulse: f32,
    pub world_boundary: f32,
    pub boundary_restitution: f32,
    pub collision_restitution: f32,
    pub slide_damping: f32,
    pub ground_probe_offset: f32,
    pub ground_probe_distance: f32,
    pub ground_clearance: f32,
    pub ramp_min_up_dot: f32,
    pub ramp_max_up_dot: f32,
    pub big_air_height: f32,
    pub good_jump_height: f32,
    pub epic_jump_height: f32,
    pub max_landing_boost: f32,
    pub fall_limit: f32,
    pub respawn_point: Vec3,
    pub boundary_notice_cooldown: f32,
    pub interaction_distance: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            base_speed: 8.0,
            turn_rate: 2.8,
            drift_factor: 0.92,
            acceleration_factor: 0.15,
            braking_factor: 0.3,
            reverse_factor: 0.3,
            suspension_height: 0.2,
            ramp_boost_factor: 0.25,
            air_control_factor: 0.3,
            air_control_window: 1.5,
            gravity: -15.0,
            jump_velocity: 8.0,
            ramp_jump_velocity: 10.0,
            jump_forward_impulse: 0.5,
            world_boundary: 98.0,
            boundary_restitution: -0.5,
            collision_restitution: -0.3,
            slide_damping: -0.1,
            ground_probe_offset: 0.1,
            ground_probe_distance: 1.0,
            ground_clearance: 0.1,
            ramp_min_up_dot: 0.1,
            ramp_max_up_dot: 0.9,
            big_air_height: 1.0,
            good_jump_height: 3.0,
            epic_jump_height: 6.0,
            max_landing_boost: 10.0,
            fall_limit: -10.0,
            respawn_point: Vec3::new(0.0, 5.0, 0.0),
            boundary_notice_cooldown: 1.5,
            interaction_distance: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Grounded,
    Airborne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTier {
    Good,
    Epic,
}

/// XP and tier for a landing from high enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrickReward {
    pub tier: JumpTier,
    pub xp: u32,
}

/// Things the controller noticed during one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VehicleEvent {
    /// Hit the square map edge while on the ground (rate limited).
    BoundaryReached,
    Jumped { from_ramp: bool },
    Landed { fall_height: f32, trick: Option<TrickReward> },
    /// Fell below the fail-safe depth and was put back at the respawn point.
    Respawned,
}

/// Player car state.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub position: Vec3,
    pub yaw: f32,
    /// Cosmetic roll while cornering.
    pub body_roll: f32,
    /// Cosmetic pitch while airborne.
    pub body_pitch: f32,
    /// Height of the body centre above the base (suspension).
    pub body_height: f32,
    /// Horizontal momentum, applied as per-frame displacement.
    pub velocity: Vec3,
    pub vertical_speed: f32,
    pub state: MotionState,
    pub air_time: f32,
    /// Base height when the car last left the ground.
    pub takeoff_height: f32,
    pub suspension: f32,
    /// Effective speed after upgrades.
    pub speed: f32,
    pub on_ramp: bool,
    pub is_accelerating: bool,
    pub is_braking: bool,
    pub turn_direction: f32,
    boundary_cooldown: f32,
    tuning: VehicleTuning,
}

impl Vehicle {
    /// Car parked at `position` facing +Z.
    pub fn new(position: Vec3, tuning: VehicleTuning) -> Self {
        Self {
            position,
            yaw: std::f32::consts::PI,
            body_roll: 0.0,
            body_pitch: 0.0,
            body_height: BODY_REST_HEIGHT,
            velocity: Vec3::ZERO,
            vertical_speed: 0.0,
            state: MotionState::Grounded,
            air_time: 0.0,
            takeoff_height: position.y,
            suspension: 0.0,
            speed: tuning.base_speed,
            on_ramp: false,
            is_accelerating: false,
            is_braking: false,
            turn_direction: 0.0,
            boundary_cooldown: 0.0,
            tuning,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.state == MotionState::Grounded
    }

    /// Unit vector the car's nose points along.
    pub fn forward(&self) -> Vec3 {
        yaw_forward(self.yaw)
    }

    /// Horizontal speed in units per second at the nominal frame rate.
    pub fn speed_per_second(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length() * NOMINAL_FRAME_RATE
    }

    /// Body bounds at the current position, lifted slightly off the floor.
    pub fn bounding_box(&self) -> Aabb {
        self.bounds_at(self.yaw)
    }

    fn bounds_at(&self, yaw: f32) -> Aabb {
        let center = self.position + Vec3::new(0.0, self.body_height, 0.0);
        let mut bounds = Aabb::from_yawed_box(center, BODY_HALF_EXTENTS, yaw);
        bounds.min.y += 0.1;
        bounds
    }

    /// Put the car somewhere else and drop all momentum.
    pub fn teleport(&mut self, position: Vec3, yaw: f32) {
        self.position = position;
        self.yaw = yaw;
        self.velocity = Vec3::ZERO;
        self.vertical_speed = 0.0;
        self.takeoff_height = position.y;
    }

    /// Advance one frame.
    pub fn update(&mut self, input: &InputState, physics: &PhysicsWorld, dt: f32) -> Vec<VehicleEvent> {
        let mut events = Vec::new();
        self.boundary_cooldown = (self.boundary_cooldown - dt).max(0.0);

        self.velocity *= self.tuning.drift_factor;
        self.velocity.y = 0.0;

        // Controls
        self.is_accelerating = input.is_forward_held();
        self.is_braking = input.is_back_held();
        self.turn_direction = input.turn_direction();
        let previous_yaw = self.yaw;
        let mut move_dir = Vec3::ZERO;
        if self.is_accelerating {
            move_dir.z -= 1.0;
        }
        if self.is_braking {
            move_dir.z += 1.0;
        }

        self.steer(move_dir, dt);
        self.accelerate(move_dir, dt);

        if self.state == MotionState::Airborne {
            self.air_time += dt;
            let window = self.tuning.air_control_window;
            if self.turn_direction != 0.0 && self.air_time < window {
                let air_factor = self.tuning.air_control_factor * (1.0 - (self.air_time / window).min(1.0));
                self.yaw += self.turn_direction * self.tuning.turn_rate * air_factor * dt;
            }
        } else {
            self.air_time = 0.0;
        }
        self.guard_turn(previous_yaw, physics);

        let displacement = self.clamp_to_boundary(&mut events);
        self.resolve_structures(displacement, physics);
        self.settle_vertical(input, physics, dt, &mut events);

        events
    }

    fn steer(&mut self, move_dir: Vec3, dt: f32) {
        let speed = self.velocity.length();
        let moving = move_dir.length_squared() > 0.0 || self.velocity.length_squared() > 0.1;
        if self.turn_direction != 0.0 && moving {
            // Tighter turns at low speed.
            let turn_factor = (1.0 - speed * 0.05).clamp(0.5, 1.0);
            self.yaw += self.turn_direction * self.tuning.turn_rate * turn_factor * dt;

            let target_roll = -self.turn_direction * self.tuning.suspension_height * speed * 0.1;
            self.body_roll = lerp(self.body_roll, target_roll, 0.1);
        } else {
            self.body_roll = lerp(self.body_roll, 0.0, 0.1);
        }
    }

    fn accelerate(&mut self, move_dir: Vec3, dt: f32) {
        if move_dir.length_squared() == 0.0 {
            return;
        }
        let dir = rotate_by_yaw(move_dir.normalize(), self.yaw);
        if self.is_accelerating {
            self.velocity += dir * (self.speed * self.tuning.acceleration_factor * dt);
        } else if self.is_braking {
            self.velocity *= (1.0 - self.tuning.braking_factor * dt * 10.0).max(0.0);
            if self.velocity.length_squared() < 0.1 {
                self.velocity += dir * (self.speed * self.tuning.reverse_factor * dt);
            }
        }
    }

    /// Clamp the intended displacement to the square map, bouncing clamped axes.
    fn clamp_to_boundary(&mut self, events: &mut Vec<VehicleEvent>) -> Vec3 {
        let limit = self.tuning.world_boundary;
        let mut target = self.position + Vec3::new(self.velocity.x, 0.0, self.velocity.z);
        let mut hit = false;

        if target.x < -limit || target.x > limit {
            target.x = target.x.clamp(-limit, limit);
            self.velocity.x *= self.tuning.boundary_restitution;
            hit = true;
        }
        if target.z < -limit || target.z > limit {
            target.z = target.z.clamp(-limit, limit);
            self.velocity.z *= self.tuning.boundary_restitution;
            hit = true;
        }

        if hit && self.is_grounded() && self.boundary_cooldown <= 0.0 {
            self.boundary_cooldown = self.tuning.boundary_notice_cooldown;
            events.push(VehicleEvent::BoundaryReached);
        }
        target - self.position
    }

    /// Undo a heading change whose wider footprint would push the body into a structure.
    fn guard_turn(&mut self, previous_yaw: f32, physics: &PhysicsWorld) {
        if self.yaw == previous_yaw {
            return;
        }
        let before = self.bounds_at(previous_yaw);
        if !can_occupy(physics, &before, &self.bounding_box()) {
            self.yaw = previous_yaw;
        }
    }

    /// Move by `displacement`, sliding along structures on the free axis.
    fn resolve_structures(&mut self, displacement: Vec3, physics: &PhysicsWorld) {
        let current = self.bounding_box();
        if can_occupy(physics, &current, &current.translated(displacement)) {
            self.position += displacement;
            return;
        }

        let step_x = Vec3::new(displacement.x, 0.0, 0.0);
        let step_z = Vec3::new(0.0, 0.0, displacement.z);
        let mut x_free = can_occupy(physics, &current, &current.translated(step_x));
        let mut z_free = can_occupy(physics, &current, &current.translated(step_z));
        if x_free && z_free {
            // Corner: each axis is clear on its own but the diagonal is not.
            if displacement.x.abs() >= displacement.z.abs() {
                z_free = false;
            } else {
                x_free = false;
            }
        }

        if x_free {
            self.position.x += displacement.x;
            self.velocity.z *= self.tuning.slide_damping;
        } else {
            self.velocity.x *= self.tuning.collision_restitution;
        }
        if z_free {
            self.position.z += displacement.z;
            self.velocity.x *= self.tuning.slide_damping;
        } else {
            self.velocity.z *= self.tuning.collision_restitution;
        }
    }

    fn settle_vertical(
        &mut self,
        input: &InputState,
        physics: &PhysicsWorld,
        dt: f32,
        events: &mut Vec<VehicleEvent>,
    ) {
        let t = &self.tuning;
        let origin = self.position + Vec3::new(0.0, t.ground_probe_offset, 0.0);
        let rising = self.state == MotionState::Airborne && self.vertical_speed > 0.0;
        let ground = if rising {
            None
        } else {
            physics.probe_ground(origin, t.ground_probe_distance)
        };

        match ground {
            Some(hit) => {
                let ground_y = hit.point.y;
                let up = hit.up_dot();
                self.on_ramp = up > t.ramp_min_up_dot && up < t.ramp_max_up_dot;

                if self.state == MotionState::Airborne {
                    events.push(self.land(ground_y));
                }

                if self.suspension > 0.001 {
                    self.suspension *= 0.9;
                    self.body_height = BODY_REST_HEIGHT - self.suspension * 0.2;
                } else {
                    self.suspension = 0.0;
                    self.body_height = lerp(self.body_height, BODY_REST_HEIGHT, 0.1);
                }
                self.body_pitch = lerp(self.body_pitch, 0.0, 0.1);
                self.position.y = ground_y + self.tuning.ground_clearance;

                if input.is_jump_held() {
                    self.jump(events);
                } else if self.on_ramp && self.is_accelerating {
                    let boost = rotate_by_yaw(Vec3::new(0.0, 0.8, -1.2), self.yaw) * (dt * 5.0);
                    self.velocity += Vec3::new(boost.x, 0.0, boost.z);
                    // Carried into the air if the car drives off the ramp's top edge.
                    self.vertical_speed += boost.y;
                } else {
                    self.vertical_speed = 0.0;
                }
            }
            None => {
                if self.state == MotionState::Grounded {
                    self.state = MotionState::Airborne;
                    self.takeoff_height = self.position.y;
                }
                self.on_ramp = false;
                self.vertical_speed += self.tuning.gravity * dt;
                self.position.y += self.vertical_speed * dt;

                if self.air_time > 0.2 {
                    let tilt = (-self.vertical_speed * 0.02).clamp(-0.3, 0.3);
                    self.body_pitch = lerp(self.body_pitch, tilt, 0.1);
                }

                if self.position.y < self.tuning.fall_limit {
                    let respawn = self.tuning.respawn_point;
                    log::info!("Vehicle fell off the map at {:?}, respawning", self.position);
                    self.position = respawn;
                    self.velocity = Vec3::ZERO;
                    self.vertical_speed = 0.0;
                    self.takeoff_height = 0.0;
                    events.push(VehicleEvent::Respawned);
                }
            }
        }
    }

    fn land(&mut self, ground_y: f32) -> VehicleEvent {
        let t = &self.tuning;
        let fall_height = self.takeoff_height - ground_y;
        self.state = MotionState::Grounded;
        self.vertical_speed = 0.0;

        let mut trick = None;
        if fall_height > t.big_air_height {
            let boost = (fall_height * t.ramp_boost_factor).min(t.max_landing_boost);
            let forward = yaw_forward(self.yaw);
            self.velocity += forward * boost;
            self.suspension = (fall_height * 0.1).min(1.0);

            if fall_height > t.good_jump_height {
                let tier = if fall_height > t.epic_jump_height {
                    JumpTier::Epic
                } else {
                    JumpTier::Good
                };
                trick = Some(TrickReward {
                    tier,
                    xp: (fall_height * 2.0).floor() as u32,
                });
            }
        }
        log::debug!("Landed after falling {:.2}", fall_height);
        VehicleEvent::Landed { fall_height, trick }
    }

    fn jump(&mut self, events: &mut Vec<VehicleEvent>) {
        let from_ramp = self.on_ramp;
        self.vertical_speed = if from_ramp {
            self.tuning.ramp_jump_velocity
        } else {
            self.tuning.jump_velocity
        };
        self.state = MotionState::Airborne;
        self.takeoff_height = self.position.y;
        if self.velocity.length_squared() > 0.5 {
            let forward = yaw_forward(self.yaw);
            self.velocity += forward * self.tuning.jump_forward_impulse;
        }
        events.push(VehicleEvent::Jumped { from_ramp });
    }

    /// Nearest candidate within the interaction radius.
    pub fn nearest_interactable<T>(&self, candidates: impl IntoIterator<Item = (T, Vec3)>) -> Option<T> {
        let mut best: Option<(T, f32)> = None;
        for (item, pos) in candidates {
            let d = self.position.distance(pos);
            if d < self.tuning.interaction_distance && best.as_ref().map_or(true, |(_, bd)| d < *bd) {
                best = Some((item, d));
            }
        }
        best.map(|(item, _)| item)
    }
}

fn overlaps_structure(physics: &PhysicsWorld, bounds: &Aabb) -> bool {
    physics.overlaps_any(bounds, physics::CollisionSet::StructuresOnly)
}

/// Footprint area `bounds` shares with structures.
fn structure_penetration(physics: &PhysicsWorld, bounds: &Aabb) -> f32 {
    physics
        .colliders_in(physics::CollisionSet::StructuresOnly)
        .iter()
        .filter(|(_, b)| b.intersects(bounds))
        .map(|(_, b)| bounds.overlap_area_xz(b))
        .sum()
}

/// Whether the body may go from `from` to `to`. A body already inside a
/// structure may only make moves that dig it out.
fn can_occupy(physics: &PhysicsWorld, from: &Aabb, to: &Aabb) -> bool {
    if !overlaps_structure(physics, to) {
        return true;
    }
    overlaps_structure(physics, from) && structure_penetration(physics, to) < structure_penetration(physics, from)
}
