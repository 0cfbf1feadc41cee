//! Strider Scene - Bevy rendering and input glue for the control core
//!
//! This crate wires `strider-core` into a Bevy app:
//! - Scene setup (camera, lights, ground, props, avatar placeholder)
//! - Mouse, touch, keyboard and focus events into the control session
//! - One control step per frame, applied to the camera and avatar transforms
//! - Avatar glTF loading with retry, ground alignment and idle/moving animation weights
//! - Optional image-based lighting from prefiltered cubemaps
//! - egui overlays for telemetry, drag lock and the virtual joystick

pub mod camera;
pub mod driver;
pub mod environment;
pub mod input;
pub mod models;
pub mod scene;
pub mod types;
pub mod ui;

use bevy::prelude::*;
use strider_core::config::Tunables;
use strider_core::look::Viewport;
use strider_core::session::ControlSession;

/// Plugin that sets up the control session and everything that renders it
pub struct StriderScenePlugin {
    pub tunables: Tunables,
}

impl StriderScenePlugin {
    pub fn new(tunables: Tunables) -> Self {
        Self { tunables }
    }
}

impl Plugin for StriderScenePlugin {
    fn build(&self, app: &mut App) {
        // viewport is filled in from the primary window on the first frame
        let session = ControlSession::new(self.tunables.clone(), Viewport::default());

        app.insert_resource(Control(session))
            .add_plugins(driver::DriverPlugin)
            .add_plugins(input::InputBridgePlugin)
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(environment::EnvironmentPlugin)
            .add_plugins(models::ModelsPlugin)
            .add_plugins(ui::OverlayPlugin);
    }
}

// Re-export commonly used types
pub use camera::MainCamera;
pub use types::{Control, ControlSet, FrameState};
