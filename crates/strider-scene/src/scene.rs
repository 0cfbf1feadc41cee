//! Scene setup - lights, ground, scattered props and the player root

use bevy::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use crate::camera::MainCamera;
use crate::types::{facing_rotation, to_render, Control, ControlSet, FrameState};

const GROUND_SIZE: f32 = 400.0;
const PROP_COUNT: usize = 40;
const PLACEHOLDER_SIZE: f32 = 1.2;

/// Root transform of the avatar; the placeholder or the loaded model hangs under it
#[derive(Component)]
pub struct PlayerRoot;

/// Red cube shown until the avatar model is ready
#[derive(Component)]
pub struct AvatarPlaceholder;

#[derive(Component)]
pub struct Prop;

/// Plugin for scene setup
pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene)
            .add_systems(Update, apply_player_transform.in_set(ControlSet::Apply));
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    control: Res<Control>,
) {
    let camera = control.0.camera();
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            near: 0.01,
            far: 500.0,
            ..default()
        }),
        Transform::from_translation(to_render(camera.current_position))
            .looking_at(to_render(camera.target), Vec3::Y),
        MainCamera,
    ));

    // Sky-tinted fill from above
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.85, 0.9, 1.0),
        brightness: 350.0,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 6000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 12.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Dark matte ground
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.06, 0.07, 0.09),
            perceptual_roughness: 1.0,
            reflectance: 0.0,
            ..default()
        })),
        Transform::IDENTITY,
    ));

    let prop_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.41, 0.82, 0.57),
        perceptual_roughness: 0.8,
        ..default()
    });
    let mut rng = SmallRng::from_entropy();
    for _ in 0..PROP_COUNT {
        let size = rng.gen_range(0.3..1.1);
        let radius = rng.gen_range(40.0..120.0);
        let angle: f32 = rng.gen_range(0.0..TAU);
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(size, size, size))),
            MeshMaterial3d(prop_material.clone()),
            Transform::from_xyz(angle.cos() * radius, size / 2.0, angle.sin() * radius),
            Prop,
        ));
    }

    let body = control.0.body();
    let player = commands
        .spawn((
            Transform::from_translation(to_render(body.position))
                .with_rotation(facing_rotation(body.facing_yaw)),
            Visibility::default(),
            PlayerRoot,
        ))
        .id();

    let placeholder = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, PLACEHOLDER_SIZE))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(1.0, 0.18, 0.18),
                ..default()
            })),
            Transform::from_xyz(0.0, PLACEHOLDER_SIZE / 2.0, 0.0),
            AvatarPlaceholder,
        ))
        .id();
    commands.entity(player).add_child(placeholder);
}

fn apply_player_transform(
    frame: Res<FrameState>,
    mut player: Query<&mut Transform, With<PlayerRoot>>,
) {
    let Some(output) = &frame.last else { return };
    if let Ok(mut transform) = player.single_mut() {
        transform.translation = to_render(output.avatar_position);
        transform.rotation = facing_rotation(output.facing_yaw);
    }
}
