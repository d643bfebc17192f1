//! NPC wandering: each NPC walks to random points within its patrol radius.

use engine_core::{Patrol, Transform, Velocity};
use glam::{Quat, Vec3};
use hecs::World;
use rand::Rng;

/// Distance at which a patrol target counts as reached.
const ARRIVE_DISTANCE: f32 = 0.1;

/// Random walk speed for a new NPC (0.5 to 1.0 u/s).
pub fn random_patrol_speed(rng: &mut impl Rng) -> f32 {
    0.5 + rng.gen::<f32>() * 0.5
}

/// Random point within the patrol disc, at `height`.
pub fn random_patrol_point(patrol: &Patrol, height: f32, rng: &mut impl Rng) -> Vec3 {
    if !patrol.is_moving() {
        return Vec3::new(patrol.center.x, height, patrol.center.z);
    }
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    let radius = rng.gen::<f32>() * patrol.radius;
    Vec3::new(
        patrol.center.x + angle.cos() * radius,
        height,
        patrol.center.z + angle.sin() * radius,
    )
}

/// Step every patrolling entity toward its target, picking a new target on arrival.
pub fn update_patrols(world: &mut World, rng: &mut impl Rng, dt: f32) {
    for (_, (transform, patrol, velocity)) in world.query_mut::<(&mut Transform, &mut Patrol, &mut Velocity)>() {
        if !patrol.is_moving() {
            velocity.linear = Vec3::ZERO;
            continue;
        }
        let mut to_target = patrol.target - transform.position;
        to_target.y = 0.0;
        let distance = to_target.length();
        if distance > ARRIVE_DISTANCE {
            let dir = to_target / distance;
            // Never overshoot the target.
            let speed = if dt > 0.0 { patrol.speed.min(distance / dt) } else { 0.0 };
            velocity.linear = dir * speed;
            transform.translate(velocity.linear * dt);
            transform.rotation = Quat::from_rotation_y(f32::atan2(-dir.x, -dir.z));
        } else {
            velocity.linear = Vec3::ZERO;
            patrol.target = random_patrol_point(patrol, transform.position.y, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn patrol_points_stay_inside_radius() {
        let mut rng = StdRng::seed_from_u64(7);
        let patrol = Patrol::new(Vec3::new(5.0, 0.0, 5.0), 3.0, 0.7);
        for _ in 0..200 {
            let p = random_patrol_point(&patrol, 0.75, &mut rng);
            let d = Vec3::new(p.x - 5.0, 0.0, p.z - 5.0).length();
            assert!(d <= 3.0 + 1e-4);
            assert_eq!(p.y, 0.75);
        }
    }

    #[test]
    fn speed_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let s = random_patrol_speed(&mut rng);
            assert!((0.5..=1.0).contains(&s));
        }
    }

    #[test]
    fn walkers_move_and_stationary_ones_do_not() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(3);
        let center = Vec3::new(0.0, 0.75, 0.0);

        let mut patrol = Patrol::new(center, 2.0, 1.0);
        patrol.target = Vec3::new(2.0, 0.75, 0.0);
        let walker = world.spawn((Transform::from_position(center), patrol, Velocity::default()));
        let statue = world.spawn((
            Transform::from_position(center),
            Patrol::new(center, 0.0, 1.0),
            Velocity::default(),
        ));

        update_patrols(&mut world, &mut rng, 0.5);

        let moved = world.get::<&Transform>(walker).unwrap().position;
        assert!((moved.x - 0.5).abs() < 1e-5);
        assert!(world.get::<&Velocity>(walker).unwrap().linear.x > 0.0);
        assert_eq!(world.get::<&Transform>(statue).unwrap().position, center);
    }

    #[test]
    fn arrival_picks_a_new_target() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(11);
        let center = Vec3::new(0.0, 0.75, 0.0);
        let e = world.spawn((Transform::from_position(center), Patrol::new(center, 3.0, 1.0), Velocity::default()));
        // Target starts at the centre, so the first tick re-targets.
        update_patrols(&mut world, &mut rng, 0.1);
        let target = world.get::<&Patrol>(e).unwrap().target;
        assert!(Vec3::new(target.x, 0.0, target.z).length() <= 3.0 + 1e-4);
    }
}
