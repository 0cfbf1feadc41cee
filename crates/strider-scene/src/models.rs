//! Avatar glTF loading, placeholder swap and animation blending
//!
//! The model loads out-of-band. Until it is ready the red placeholder stays
//! under the player root; on failure the load is retried on the configured
//! back-off and, once attempts run out, the placeholder is kept for good.
//! A spawned model is lifted or lowered so its lowest point rests on the ground.

use bevy::animation::graph::AnimationNodeIndex;
use bevy::asset::LoadState;
use bevy::camera::primitives::Aabb;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;
use std::time::Duration;
use strider_core::retry::RetryPolicy;
use tracing::{debug, info, warn};

use crate::scene::{AvatarPlaceholder, PlayerRoot};
use crate::types::{Control, ControlSet, FrameState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarStatus {
    Loading,
    /// Waiting out the back-off before the next attempt
    Backoff,
    Ready,
    /// Attempts exhausted; the placeholder stays
    Placeholder,
}

/// Load bookkeeping for the avatar model
#[derive(Resource, Debug)]
pub struct AvatarLoader {
    pub path: String,
    pub scale: f32,
    pub policy: RetryPolicy,
    pub status: AvatarStatus,
    pub failed_attempts: u32,
    handle: Option<Handle<Gltf>>,
    retry_timer: Option<Timer>,
}

impl AvatarLoader {
    pub fn new(path: String, scale: f32, policy: RetryPolicy) -> Self {
        Self {
            path,
            scale,
            policy,
            status: AvatarStatus::Loading,
            failed_attempts: 0,
            handle: None,
            retry_timer: None,
        }
    }

    /// Record a failed attempt; returns the delay before the next one, if any
    pub fn record_failure(&mut self) -> Option<Duration> {
        self.failed_attempts += 1;
        self.handle = None;
        match self.policy.next_delay(self.failed_attempts) {
            Some(delay) => {
                self.status = AvatarStatus::Backoff;
                self.retry_timer = Some(Timer::new(delay, TimerMode::Once));
                Some(delay)
            }
            None => {
                self.status = AvatarStatus::Placeholder;
                self.retry_timer = None;
                None
            }
        }
    }
}

/// Animation graph nodes for the two blend states
#[derive(Resource, Debug, Clone)]
pub struct AvatarAnimations {
    pub graph: Handle<AnimationGraph>,
    pub idle: AnimationNodeIndex,
    pub moving: AnimationNodeIndex,
}

/// Marker for the spawned model scene
#[derive(Component)]
pub struct AvatarModel;

/// The model scene has spawned but is not yet sitting on the ground
#[derive(Component)]
pub struct AwaitingGround;

/// Height of the ground plane
const GROUND_Y: f32 = 0.0;

/// Plugin for avatar model loading
pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_avatar_loader)
            .add_systems(Update, (retry_avatar_load, poll_avatar_load).chain())
            .add_systems(Update, (start_avatar_animations, ground_avatar_model))
            .add_systems(Update, apply_blend_weights.in_set(ControlSet::Apply));
    }
}

fn init_avatar_loader(mut commands: Commands, control: Res<Control>, asset_server: Res<AssetServer>) {
    let avatar = &control.0.tunables().avatar;
    let mut loader = AvatarLoader::new(
        avatar.model_path.clone(),
        avatar.scale,
        RetryPolicy::from_config(avatar),
    );
    info!("Starting to load avatar model: {}", loader.path);
    loader.handle = Some(asset_server.load(loader.path.clone()));
    commands.insert_resource(loader);
}

fn retry_avatar_load(
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    mut loader: ResMut<AvatarLoader>,
) {
    if loader.status != AvatarStatus::Backoff {
        return;
    }
    let Some(timer) = loader.retry_timer.as_mut() else { return };
    timer.tick(time.delta());
    if !timer.just_finished() {
        return;
    }

    info!(
        attempt = loader.failed_attempts + 1,
        "Retrying avatar model: {}", loader.path
    );
    loader.retry_timer = None;
    loader.handle = Some(asset_server.load(loader.path.clone()));
    loader.status = AvatarStatus::Loading;
}

/// Check loading state and swap the placeholder for the model when ready
fn poll_avatar_load(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    mut loader: ResMut<AvatarLoader>,
    player: Query<Entity, With<PlayerRoot>>,
    placeholders: Query<Entity, With<AvatarPlaceholder>>,
) {
    if loader.status != AvatarStatus::Loading {
        return;
    }
    let Some(handle) = loader.handle.clone() else { return };

    match asset_server.get_load_state(handle.id()) {
        Some(LoadState::Loaded) => {
            let Some(gltf) = gltf_assets.get(&handle) else { return };
            let Some(scene) = gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned())
            else {
                warn!("Avatar model {} has no scenes, keeping placeholder", loader.path);
                loader.status = AvatarStatus::Placeholder;
                return;
            };
            let Ok(player) = player.single() else { return };

            force_opaque(gltf, &mut materials);

            let model = commands
                .spawn((
                    SceneRoot(scene),
                    Transform::from_scale(Vec3::splat(loader.scale)),
                    AvatarModel,
                ))
                .observe(mark_model_ready)
                .id();
            commands.entity(player).add_child(model);
            for placeholder in &placeholders {
                commands.entity(placeholder).despawn();
            }

            if let Some(animations) = build_animations(gltf, &mut graphs) {
                commands.insert_resource(animations);
            }

            info!("Avatar model loaded: {}", loader.path);
            loader.status = AvatarStatus::Ready;
        }
        Some(LoadState::Failed(err)) => {
            warn!(
                attempt = loader.failed_attempts + 1,
                "Failed to load avatar model {}: {}", loader.path, err
            );
            match loader.record_failure() {
                Some(delay) => info!("Next avatar attempt in {:?}", delay),
                None => warn!("Giving up on avatar model, keeping placeholder"),
            }
        }
        _ => {
            // Still loading
        }
    }
}

fn mark_model_ready(ready: On<SceneInstanceReady>, mut commands: Commands) {
    commands.entity(ready.entity).insert(AwaitingGround);
}

/// Shift the model so the bottom of its meshes touches the ground
///
/// Mesh bounds are computed after the scene spawns, so this waits until the
/// descendants carry an `Aabb`.
fn ground_avatar_model(
    mut commands: Commands,
    mut models: Query<(Entity, &mut Transform), (With<AvatarModel>, With<AwaitingGround>)>,
    children: Query<&Children>,
    bounds: Query<(&Aabb, &GlobalTransform)>,
) {
    for (model, mut transform) in &mut models {
        let lowest = children
            .iter_descendants(model)
            .filter_map(|entity| bounds.get(entity).ok())
            .map(|(aabb, global)| world_min_y(aabb, global))
            .reduce(f32::min);
        let Some(min_y) = lowest else { continue };

        let offset = ground_offset(min_y);
        transform.translation.y += offset;
        commands.entity(model).remove::<AwaitingGround>();
        debug!(min_y, offset, "Avatar model placed on the ground");
    }
}

/// Lowest world-space height of a bounding box
fn world_min_y(aabb: &Aabb, global: &GlobalTransform) -> f32 {
    let affine = global.affine();
    let center = affine.transform_point3a(aabb.center);
    let m = affine.matrix3;
    let h = aabb.half_extents;
    let reach = m.x_axis.y.abs() * h.x + m.y_axis.y.abs() * h.y + m.z_axis.y.abs() * h.z;
    center.y - reach
}

fn ground_offset(min_y: f32) -> f32 {
    GROUND_Y - min_y
}

/// Model materials render fully opaque and double-sided
fn force_opaque(gltf: &Gltf, materials: &mut Assets<StandardMaterial>) {
    for handle in &gltf.materials {
        if let Some(material) = materials.get_mut(handle) {
            material.base_color = material.base_color.with_alpha(1.0);
            material.alpha_mode = AlphaMode::Opaque;
            material.double_sided = true;
            material.cull_mode = None;
        }
    }
}

/// Pick idle and moving clips by name, falling back to clip order
fn build_animations(gltf: &Gltf, graphs: &mut Assets<AnimationGraph>) -> Option<AvatarAnimations> {
    let find = |needles: &[&str]| {
        gltf.named_animations.iter().find_map(|(name, clip)| {
            let name = name.to_lowercase();
            needles
                .iter()
                .any(|needle| name.contains(needle))
                .then(|| clip.clone())
        })
    };

    let idle = find(&["idle"]).or_else(|| gltf.animations.first().cloned())?;
    let moving = find(&["run", "walk", "move"])
        .or_else(|| gltf.animations.get(1).cloned())
        .unwrap_or_else(|| idle.clone());

    let (graph, nodes) = AnimationGraph::from_clips([idle, moving]);
    Some(AvatarAnimations {
        graph: graphs.add(graph),
        idle: nodes[0],
        moving: nodes[1],
    })
}

/// Hook the blend graph onto animation players as the model scene spawns
fn start_avatar_animations(
    mut commands: Commands,
    animations: Option<Res<AvatarAnimations>>,
    mut players: Query<(Entity, &mut AnimationPlayer), Added<AnimationPlayer>>,
) {
    let Some(animations) = animations else { return };
    for (entity, mut player) in &mut players {
        player.play(animations.idle).repeat().set_weight(1.0);
        player.play(animations.moving).repeat().set_weight(0.0);
        commands
            .entity(entity)
            .insert(AnimationGraphHandle(animations.graph.clone()));
    }
}

fn apply_blend_weights(
    frame: Res<FrameState>,
    animations: Option<Res<AvatarAnimations>>,
    mut players: Query<&mut AnimationPlayer>,
) {
    let (Some(output), Some(animations)) = (&frame.last, animations) else {
        return;
    };
    for mut player in &mut players {
        if let Some(idle) = player.animation_mut(animations.idle) {
            idle.set_weight(output.weights.idle);
        }
        if let Some(moving) = player.animation_mut(animations.moving) {
            moving.set_weight(output.weights.moving);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_back_off_then_keep_placeholder() {
        let mut loader = AvatarLoader::new(
            "models/avatar.glb".to_string(),
            0.3,
            RetryPolicy::new(3, Duration::from_millis(250)),
        );

        assert_eq!(loader.record_failure(), Some(Duration::from_millis(250)));
        assert_eq!(loader.status, AvatarStatus::Backoff);
        assert_eq!(loader.record_failure(), Some(Duration::from_millis(500)));
        assert_eq!(loader.record_failure(), None);
        assert_eq!(loader.status, AvatarStatus::Placeholder);
        assert!(loader.retry_timer.is_none());
    }

    #[test]
    fn test_lowest_point_of_scaled_model() {
        let aabb = Aabb::from_min_max(Vec3::new(-0.5, 2.0, -0.5), Vec3::new(0.5, 4.0, 0.5));
        let global = GlobalTransform::from(
            Transform::from_xyz(1.0, 0.5, 0.0).with_scale(Vec3::splat(0.3)),
        );
        let min_y = world_min_y(&aabb, &global);
        assert!((min_y - 1.1).abs() < 1e-5);
        assert!((ground_offset(min_y) + 1.1).abs() < 1e-5);
    }

    #[test]
    fn test_lowest_point_of_rotated_mesh() {
        // lying on its side, the thin axis becomes the height
        let aabb = Aabb::from_min_max(Vec3::new(-1.0, 2.0, -0.25), Vec3::new(1.0, 4.0, 0.25));
        let global = GlobalTransform::from(Transform::from_rotation(Quat::from_rotation_x(
            std::f32::consts::FRAC_PI_2,
        )));
        let min_y = world_min_y(&aabb, &global);
        assert!((min_y + 0.25).abs() < 1e-5);
        assert!((ground_offset(min_y) - 0.25).abs() < 1e-5);
    }
}
