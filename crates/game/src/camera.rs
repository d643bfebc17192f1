//! Third-person chase camera that trails the car.

use engine_core::{lerp, rotate_by_yaw, Vec3};

use crate::vehicle::Vehicle;

/// Speed (u/s) at which the camera is fully pulled back.
const FULL_SPEED: f32 = 15.0;

#[derive(Debug, Clone)]
pub struct ChaseCamera {
    pub position: Vec3,
    pub look_at: Vec3,
    pub roll: f32,
    base_offset: Vec3,
    /// Extra pull-back from speed and air time, smoothed.
    dynamic_offset: Vec3,
    look_offset: Vec3,
}

impl ChaseCamera {
    pub fn new(target: &Vehicle) -> Self {
        let base_offset = Vec3::new(0.0, 3.5, 6.0);
        let look_offset = Vec3::new(0.0, 0.5, 0.0);
        Self {
            position: target.position + rotate_by_yaw(base_offset, target.yaw),
            look_at: target.position + look_offset,
            roll: 0.0,
            base_offset,
            dynamic_offset: Vec3::ZERO,
            look_offset,
        }
    }

    pub fn update(&mut self, target: &Vehicle, dt: f32) {
        let speed_factor = (target.speed_per_second() / FULL_SPEED).min(1.0);
        let height_factor = if target.is_grounded() {
            0.0
        } else {
            (target.air_time * 0.5).min(1.0)
        };

        let smoothing = (dt * 2.0).min(1.0);
        self.dynamic_offset.z = lerp(
            self.dynamic_offset.z,
            speed_factor * 2.0 + height_factor * 2.0,
            smoothing,
        );
        self.dynamic_offset.y = lerp(self.dynamic_offset.y, height_factor * 2.0, smoothing);

        let offset = rotate_by_yaw(self.base_offset + self.dynamic_offset, target.yaw);
        let desired = target.position + offset;
        self.position = self.position.lerp(desired, (dt * 5.0).min(1.0));
        self.look_at = target.position + self.look_offset;

        let target_roll = target.turn_direction * 0.05 * speed_factor;
        self.roll = lerp(self.roll, target_roll, (dt * 3.0).min(1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{MotionState, VehicleTuning};

    fn car() -> Vehicle {
        Vehicle::new(Vec3::new(0.0, 0.1, 0.0), VehicleTuning::default())
    }

    #[test]
    fn starts_behind_and_above() {
        let v = car();
        let cam = ChaseCamera::new(&v);
        // Yaw pi faces +Z, so "behind" is -Z.
        assert!(cam.position.z < -5.9);
        assert!((cam.position.y - 3.6).abs() < 1e-4);
        assert_eq!(cam.look_at, v.position + Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn speed_and_air_pull_the_camera_back() {
        let mut v = car();
        let mut cam = ChaseCamera::new(&v);
        v.velocity = Vec3::new(0.0, 0.0, 0.5);
        v.state = MotionState::Airborne;
        v.air_time = 2.0;
        for _ in 0..300 {
            cam.update(&v, 1.0 / 60.0);
        }
        assert!(cam.dynamic_offset.z > 3.9);
        assert!(cam.dynamic_offset.y > 1.9);
    }

    #[test]
    fn roll_follows_turn_input() {
        let mut v = car();
        let mut cam = ChaseCamera::new(&v);
        v.velocity = Vec3::new(0.0, 0.0, 0.5);
        v.turn_direction = 1.0;
        for _ in 0..120 {
            cam.update(&v, 1.0 / 60.0);
        }
        assert!(cam.roll > 0.04);
    }
}
