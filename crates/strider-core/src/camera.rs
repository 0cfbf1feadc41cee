//! Third-person camera: angle smoothing, orbit math and position follow
//!
//! Two exponential stages run every frame. Rendered yaw/pitch chase the drag
//! targets at `look_smoothing`, then the camera body chases the orbit point
//! at `follow_smoothing`, which keeps it from snapping when the avatar or the
//! look input changes abruptly.

use crate::config::{CameraConfig, LookConfig};
use crate::math::{smoothing_factor, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    /// Smoothed (rendered) yaw
    pub yaw: f32,
    /// Smoothed (rendered) pitch, always within the pitch clamp
    pub pitch: f32,
    pub distance: f32,
    /// Raw accumulated drag yaw
    pub desired_yaw: f32,
    /// Raw accumulated drag pitch, always within the pitch clamp
    pub desired_pitch: f32,
    pub target: Vec3,
    pub current_position: Vec3,
    /// Orbit offset of the last committed camera position
    pub committed_offset: Vec3,
}

impl CameraState {
    pub fn new(config: &CameraConfig) -> Self {
        let mut state = Self {
            yaw: config.initial_yaw,
            pitch: config.initial_pitch,
            distance: config.distance,
            desired_yaw: config.initial_yaw,
            desired_pitch: config.initial_pitch,
            target: Vec3::ZERO,
            current_position: Vec3::ZERO,
            committed_offset: Vec3::ZERO,
        };
        state.committed_offset = state.orbit_offset();
        state
    }

    /// Offset from the look-at point to the camera for the smoothed angles
    pub fn orbit_offset(&self) -> Vec3 {
        orbit_offset(self.yaw, self.pitch, self.distance)
    }

    /// Ground-plane basis of what the player currently sees
    pub fn basis(&self) -> MoveBasis {
        MoveBasis::from_offset(self.committed_offset)
    }
}

/// `-distance * (sin(yaw)cos(pitch), sin(pitch), cos(yaw)cos(pitch))`
pub fn orbit_offset(yaw: f32, pitch: f32, distance: f32) -> Vec3 {
    Vec3::new(
        yaw.sin() * pitch.cos(),
        pitch.sin(),
        yaw.cos() * pitch.cos(),
    ) * -distance
}

/// Camera-relative movement axes on the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl MoveBasis {
    /// forward = flattened, negated offset; right = up x forward. Both zero when degenerate.
    pub fn from_offset(offset: Vec3) -> Self {
        let forward = (-offset).flatten().normalize_or_zero();
        let right = Vec3::Y.cross(forward).normalize_or_zero();
        Self { forward, right }
    }
}

/// Where the renderer should put the camera this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

/// Owns the camera state and the constants that drive it
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub state: CameraState,
    look_smoothing: f32,
    follow_smoothing: f32,
    eye_height: f32,
    pitch_min: f32,
    pitch_max: f32,
}

impl CameraRig {
    pub fn new(camera: &CameraConfig, look: &LookConfig) -> Self {
        let mut state = CameraState::new(camera);
        state.pitch = state.pitch.clamp(look.pitch_min, look.pitch_max);
        state.desired_pitch = state.desired_pitch.clamp(look.pitch_min, look.pitch_max);
        state.committed_offset = state.orbit_offset();
        Self {
            state,
            look_smoothing: look.smoothing,
            follow_smoothing: camera.follow_smoothing,
            eye_height: camera.eye_height,
            pitch_min: look.pitch_min,
            pitch_max: look.pitch_max,
        }
    }

    pub fn pitch_range(&self) -> (f32, f32) {
        (self.pitch_min, self.pitch_max)
    }

    /// Apply a drag delta (radians) to the desired angles; pitch is clamped, yaw is not
    pub fn add_look_delta(&mut self, d_yaw: f32, d_pitch: f32) {
        self.state.desired_yaw += d_yaw;
        self.state.desired_pitch =
            (self.state.desired_pitch + d_pitch).clamp(self.pitch_min, self.pitch_max);
    }

    /// Exponentially move rendered angles toward the desired angles
    pub fn smooth_angles(&mut self, dt: f32) {
        let k = smoothing_factor(self.look_smoothing, dt);
        let s = &mut self.state;
        s.yaw += (s.desired_yaw - s.yaw) * k;
        s.pitch += (s.desired_pitch - s.pitch) * k;
        // rounding can overshoot the clamp by an ulp
        s.pitch = s.pitch.clamp(self.pitch_min, self.pitch_max);
    }

    /// Look-at point for an avatar standing at `player_position`
    pub fn eye_target(&self, player_position: Vec3) -> Vec3 {
        player_position + Vec3::new(0.0, self.eye_height, 0.0)
    }

    /// Trail the camera toward its orbit point around `player_position`
    pub fn follow(&mut self, player_position: Vec3, dt: f32) -> CameraPose {
        let target = self.eye_target(player_position);
        let offset = self.state.orbit_offset();
        let desired = target + offset;

        let k = smoothing_factor(self.follow_smoothing, dt);
        self.state.current_position = self.state.current_position.lerp(desired, k);
        self.state.target = target;
        self.state.committed_offset = offset;

        CameraPose {
            eye: self.state.current_position,
            target,
        }
    }

    /// Place the camera exactly on its orbit point, skipping the follow lag
    pub fn snap_to(&mut self, player_position: Vec3) -> CameraPose {
        let target = self.eye_target(player_position);
        let offset = self.state.orbit_offset();
        self.state.target = target;
        self.state.current_position = target + offset;
        self.state.committed_offset = offset;
        CameraPose {
            eye: self.state.current_position,
            target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(&CameraConfig::default(), &LookConfig::default())
    }

    #[test]
    fn test_offset_at_zero_angles_looks_down_positive_z() {
        let offset = orbit_offset(0.0, 0.0, 5.5);
        assert!(offset.x.abs() < 1e-6);
        assert!(offset.y.abs() < 1e-6);
        assert!((offset.z + 5.5).abs() < 1e-6);

        let basis = MoveBasis::from_offset(offset);
        assert!((basis.forward.z - 1.0).abs() < 1e-6);
        assert!((basis.right.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_basis_ignores_pitch() {
        let steep = MoveBasis::from_offset(orbit_offset(0.7, -1.4, 5.5));
        let flat = MoveBasis::from_offset(orbit_offset(0.7, 0.0, 5.5));
        assert!((steep.forward - flat.forward).length() < 1e-5);
        assert!(steep.forward.y.abs() < 1e-6);
        assert!(steep.forward.dot(steep.right).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_offset_gives_zero_basis() {
        let basis = MoveBasis::from_offset(Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(basis.forward, Vec3::ZERO);
        assert_eq!(basis.right, Vec3::ZERO);
    }

    #[test]
    fn test_angles_converge_to_desired() {
        let mut rig = rig();
        rig.add_look_delta(1.3, 0.4);
        for _ in 0..240 {
            rig.smooth_angles(1.0 / 60.0);
        }
        assert!((rig.state.yaw - rig.state.desired_yaw).abs() < 1e-4);
        assert!((rig.state.pitch - rig.state.desired_pitch).abs() < 1e-4);
    }

    #[test]
    fn test_pitch_stays_clamped() {
        let mut rig = rig();
        let (min, max) = rig.pitch_range();
        rig.add_look_delta(0.0, 50.0);
        assert_eq!(rig.state.desired_pitch, max);
        for _ in 0..10 {
            rig.smooth_angles(0.05);
            assert!(rig.state.pitch <= max && rig.state.pitch >= min);
        }
        rig.add_look_delta(0.0, -100.0);
        assert_eq!(rig.state.desired_pitch, min);
    }

    #[test]
    fn test_follow_trails_then_settles() {
        let mut rig = rig();
        rig.snap_to(Vec3::ZERO);
        let player = Vec3::new(3.0, 0.0, 0.0);

        let first = rig.follow(player, 0.016);
        let desired = rig.eye_target(player) + rig.state.orbit_offset();
        assert!(first.eye.distance(desired) > 0.1);
        assert_eq!(first.target, Vec3::new(3.0, 0.9, 0.0));

        let mut pose = first;
        for _ in 0..300 {
            pose = rig.follow(player, 0.016);
        }
        assert!(pose.eye.distance(desired) < 1e-3);
    }

    #[test]
    fn test_snap_places_camera_on_orbit() {
        let mut rig = rig();
        let pose = rig.snap_to(Vec3::new(1.0, 0.0, 1.0));
        assert!((pose.eye.distance(pose.target) - 5.5).abs() < 1e-4);
    }
}
