//! Third-person camera transform

use bevy::prelude::*;

use crate::types::{to_render, ControlSet, FrameState};

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for the follow camera
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, apply_camera_pose.in_set(ControlSet::Apply));
    }
}

/// Place the camera on the smoothed follow position, aimed at the eye target
fn apply_camera_pose(
    frame: Res<FrameState>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    let Some(output) = &frame.last else { return };
    if let Ok(mut transform) = camera_query.single_mut() {
        transform.translation = to_render(output.camera.eye);
        transform.look_at(to_render(output.camera.target), Vec3::Y);
    }
}
