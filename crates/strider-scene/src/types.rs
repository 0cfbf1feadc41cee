//! Shared resources and core/Bevy conversions
//!
//! The control core works in a left-handed ground frame (+X is to the right
//! when looking down +Z). Bevy is right-handed, so X is mirrored at this
//! boundary; screen-space behavior is identical on both sides.

use bevy::prelude::*;
use strider_core::session::{ControlSession, FrameOutput};

/// The live control session, written by input systems and stepped once per frame
#[derive(Resource, Debug)]
pub struct Control(pub ControlSession);

/// Output of the most recent frame step
#[derive(Resource, Debug, Default)]
pub struct FrameState {
    pub last: Option<FrameOutput>,
}

/// Ordering of the per-frame work in `Update`
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlSet {
    /// Pointer, keyboard and focus events into the session
    Input,
    /// One `ControlSession::step`
    Step,
    /// Push the frame output onto transforms and animation players
    Apply,
}

pub fn to_render(v: strider_core::Vec3) -> Vec3 {
    Vec3::new(-v.x, v.y, v.z)
}

/// Rotation of the avatar for a core facing yaw (0 faces +Z)
pub fn facing_rotation(yaw: f32) -> Quat {
    Quat::from_rotation_y(-yaw)
}

pub fn to_core_screen(p: Vec2) -> strider_core::Vec2 {
    strider_core::Vec2::new(p.x, p.y)
}
