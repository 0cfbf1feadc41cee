//! Acceleration-limited locomotion on the ground plane
//!
//! Input is projected onto the camera's ground basis, so "forward" always
//! means "away from the camera". Acceleration and deceleration are separate
//! rates; coasting never reverses direction.

use crate::camera::MoveBasis;
use crate::config::MovementConfig;
use crate::input::InputVector;
use crate::math::{wrap_angle, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerKinematics {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Heading around +Y, 0 = facing +Z
    pub facing_yaw: f32,
}

impl PlayerKinematics {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

#[derive(Debug, Clone)]
pub struct Locomotion {
    accel: f32,
    deaccel: f32,
    max_speed: f32,
    turn_rate: f32,
    turn_speed_threshold: f32,
}

impl Locomotion {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            accel: config.accel,
            deaccel: config.deaccel,
            max_speed: config.max_speed,
            turn_rate: config.turn_rate,
            turn_speed_threshold: config.turn_speed_threshold,
        }
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// World-space unit move direction for `input`, or zero
    pub fn move_direction(basis: &MoveBasis, input: InputVector) -> Vec3 {
        (basis.forward * input.y + basis.right * input.x).normalize_or_zero()
    }

    /// Update velocity and position for one frame
    pub fn integrate(&self, body: &mut PlayerKinematics, direction: Vec3, dt: f32) {
        if direction.length_squared() > 0.0 {
            body.velocity += direction * (self.accel * dt);
        } else {
            let speed = body.velocity.length();
            if speed > 0.0 {
                let slowed = (speed - self.deaccel * dt).max(0.0);
                body.velocity = body.velocity.normalize_or_zero() * slowed;
            }
        }

        body.velocity = body.velocity.clamp_length_max(self.max_speed);
        body.position += body.velocity * dt;
    }

    /// Turn the avatar toward its direction of travel along the shortest arc
    pub fn update_facing(&self, body: &mut PlayerKinematics, dt: f32) {
        if body.speed() <= self.turn_speed_threshold {
            return;
        }
        let target = body.velocity.x.atan2(body.velocity.z);
        let delta = wrap_angle(target - body.facing_yaw);
        body.facing_yaw += delta * (dt * self.turn_rate).min(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::orbit_offset;

    const DT: f32 = 1.0 / 60.0;

    fn locomotion() -> Locomotion {
        Locomotion::new(&MovementConfig::default())
    }

    fn forward_basis() -> MoveBasis {
        MoveBasis::from_offset(orbit_offset(0.0, -0.12, 5.5))
    }

    #[test]
    fn test_speed_never_exceeds_ceiling() {
        let loco = locomotion();
        let mut body = PlayerKinematics::default();
        let basis = forward_basis();

        let inputs = [
            InputVector { x: 0.0, y: 1.0 },
            InputVector { x: 1.0, y: 0.0 },
            InputVector { x: -0.7, y: -0.7 },
            InputVector::default(),
        ];
        let dts = [0.001, DT, 0.05, 0.033];
        for i in 0..2000 {
            let input = inputs[(i / 37) % inputs.len()];
            let dt = dts[i % dts.len()];
            loco.integrate(&mut body, Locomotion::move_direction(&basis, input), dt);
            assert!(body.speed() <= loco.max_speed() + 1e-4);
        }
    }

    #[test]
    fn test_forward_input_moves_along_camera_forward() {
        let loco = locomotion();
        let mut body = PlayerKinematics::default();
        let basis = forward_basis();
        let dir = Locomotion::move_direction(&basis, InputVector { x: 0.0, y: 1.0 });

        for _ in 0..30 {
            loco.integrate(&mut body, dir, DT);
        }
        assert!(body.velocity.x.abs() < 1e-5);
        assert!(body.velocity.z > 0.0);
        assert!(body.position.z > 0.0);
        assert_eq!(body.position.y, 0.0);
    }

    #[test]
    fn test_coasting_stops_in_expected_time_without_turning() {
        let loco = locomotion();
        let mut body = PlayerKinematics::default();
        let dir = Vec3::new(1.0, 0.0, 1.0).normalize_or_zero();

        while body.speed() < loco.max_speed() - 1e-4 {
            loco.integrate(&mut body, dir, DT);
        }
        let heading = body.velocity.normalize_or_zero();

        // max_speed / deaccel = 10 / 14 s
        let expected_frames = (10.0_f32 / 14.0 / DT).ceil() as usize;
        let mut frames = 0;
        while body.speed() > 0.0 {
            loco.integrate(&mut body, Vec3::ZERO, DT);
            frames += 1;
            if body.speed() > 0.0 {
                assert!((body.velocity.normalize_or_zero() - heading).length() < 1e-4);
            }
            assert!(frames <= expected_frames + 1);
        }
        assert!(frames + 1 >= expected_frames);
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_facing_takes_shortest_arc() {
        let loco = locomotion();
        let mut body = PlayerKinematics::default();
        body.facing_yaw = 3.0;
        // travelling toward -3.0 rad: the short way is through PI
        body.velocity = Vec3::new((-3.0f32).sin(), 0.0, (-3.0f32).cos()) * 5.0;

        loco.update_facing(&mut body, DT);
        assert!(body.facing_yaw > 3.0);
    }

    #[test]
    fn test_facing_never_overshoots() {
        let loco = locomotion();
        let mut body = PlayerKinematics::default();
        body.velocity = Vec3::new(5.0, 0.0, 0.0);
        let target = std::f32::consts::FRAC_PI_2;

        // dt * turn_rate > 1 lands exactly on target
        loco.update_facing(&mut body, 0.5);
        assert!((body.facing_yaw - target).abs() < 1e-5);
    }

    #[test]
    fn test_slow_body_keeps_facing() {
        let loco = locomotion();
        let mut body = PlayerKinematics::default();
        body.facing_yaw = 1.0;
        body.velocity = Vec3::new(0.05, 0.0, 0.0);
        loco.update_facing(&mut body, DT);
        assert_eq!(body.facing_yaw, 1.0);
    }
}
