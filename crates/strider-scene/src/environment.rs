//! Optional image-based lighting on the main camera
//!
//! Both cubemaps load in the background. The light is attached only once
//! both are in; if either is missing the scene keeps its plain lights.

use bevy::asset::LoadState;
use bevy::prelude::*;
use tracing::{debug, info};

use crate::camera::MainCamera;
use crate::types::Control;

/// Environment luminance (cd/m²) at intensity 1
const BASE_LUMINANCE: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MapState {
    Loading,
    Loaded,
    Failed,
}

impl From<Option<LoadState>> for MapState {
    fn from(state: Option<LoadState>) -> Self {
        match state {
            Some(LoadState::Loaded) => MapState::Loaded,
            Some(LoadState::Failed(_)) => MapState::Failed,
            _ => MapState::Loading,
        }
    }
}

impl MapState {
    fn and(self, other: MapState) -> MapState {
        match (self, other) {
            (MapState::Failed, _) | (_, MapState::Failed) => MapState::Failed,
            (MapState::Loaded, MapState::Loaded) => MapState::Loaded,
            _ => MapState::Loading,
        }
    }
}

/// Cubemaps still on their way in
#[derive(Resource, Debug)]
pub struct PendingEnvironment {
    diffuse: Handle<Image>,
    specular: Handle<Image>,
    luminance: f32,
}

pub struct EnvironmentPlugin;

impl Plugin for EnvironmentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_environment)
            .add_systems(Update, attach_environment);
    }
}

fn environment_luminance(intensity: f32) -> f32 {
    intensity * BASE_LUMINANCE
}

fn load_environment(mut commands: Commands, control: Res<Control>, asset_server: Res<AssetServer>) {
    let environment = &control.0.tunables().environment;
    if !environment.is_enabled() {
        return;
    }
    commands.insert_resource(PendingEnvironment {
        diffuse: asset_server.load(environment.diffuse_map.clone()),
        specular: asset_server.load(environment.specular_map.clone()),
        luminance: environment_luminance(environment.intensity),
    });
}

fn attach_environment(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    pending: Option<Res<PendingEnvironment>>,
    camera: Query<Entity, With<MainCamera>>,
) {
    let Some(pending) = pending else { return };

    let diffuse = MapState::from(asset_server.get_load_state(pending.diffuse.id()));
    let specular = MapState::from(asset_server.get_load_state(pending.specular.id()));
    match diffuse.and(specular) {
        MapState::Loading => {}
        MapState::Failed => {
            debug!("Environment maps unavailable, continuing without image-based lighting");
            commands.remove_resource::<PendingEnvironment>();
        }
        MapState::Loaded => {
            let Ok(camera) = camera.single() else { return };
            commands.entity(camera).insert(EnvironmentMapLight {
                diffuse_map: pending.diffuse.clone(),
                specular_map: pending.specular.clone(),
                intensity: pending.luminance,
                ..default()
            });
            commands.remove_resource::<PendingEnvironment>();
            info!("Environment lighting attached");
        }
    }
}
