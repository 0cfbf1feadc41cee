//! Control session: owns all per-frame state and runs the ordered frame step
//!
//! Input handlers write into the session between frames; `step` reads that
//! state once at the top of the frame. The session is created at setup and
//! torn down with `shutdown`, which releases every pointer and key so nothing
//! stays stuck across a focus loss.

use crate::anim::{AnimationBlend, BlendWeights, MotionState};
use crate::camera::{CameraPose, CameraRig, CameraState};
use crate::config::{KeyLayout, Tunables};
use crate::input::{InputVector, KeyState, MoveKey};
use crate::joystick::Joystick;
use crate::locomotion::{Locomotion, PlayerKinematics};
use crate::look::{accept_top_fraction, ignore_zone, LookController, Viewport};
use crate::math::{Vec2, Vec3};
use crate::pointer::{PointerEvent, PointerPhase, ScreenRect};
use crate::telemetry::{DebugInfo, DebugSampler};
use std::time::Duration;
use tracing::{debug, info};

/// Padding around the joystick ring, in pixels
const JOYSTICK_PADDING: f32 = 16.0;
/// Gap between the joystick and the bottom edge, as a fraction of screen height
const JOYSTICK_BOTTOM_FRACTION: f32 = 0.12;
const JOYSTICK_BOTTOM_MARGIN: f32 = 8.0;

/// Screen area owned by the joystick widget: bottom-center, sized to its ring
pub fn joystick_zone(viewport: &Viewport, radius: f32) -> ScreenRect {
    let size = radius * 2.0 + JOYSTICK_PADDING;
    let bottom = viewport.size.y * JOYSTICK_BOTTOM_FRACTION + JOYSTICK_BOTTOM_MARGIN;
    let max_y = viewport.size.y - bottom;
    let center = Vec2::new(viewport.size.x * 0.5, max_y - size * 0.5);
    ScreenRect::from_center_size(center, Vec2::new(size, size))
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub camera: CameraPose,
    pub avatar_position: Vec3,
    pub facing_yaw: f32,
    pub velocity: Vec3,
    pub input: InputVector,
    pub motion: MotionState,
    pub weights: BlendWeights,
    /// Present only on frames where the sampler fired
    pub telemetry: Option<DebugInfo>,
}

#[derive(Debug)]
pub struct ControlSession {
    tunables: Tunables,
    viewport: Viewport,
    keys: KeyState,
    key_layout: KeyLayout,
    joystick: Joystick,
    look: LookController,
    rig: CameraRig,
    locomotion: Locomotion,
    body: PlayerKinematics,
    blend: AnimationBlend,
    sampler: DebugSampler,
    lock_drag: bool,
    running: bool,
}

impl ControlSession {
    /// Set up a session with the avatar at the origin and the camera snapped behind it
    pub fn new(tunables: Tunables, viewport: Viewport) -> Self {
        let radius = tunables.joystick.radius;
        let look = LookController::new(tunables.look.sensitivity)
            .with_ignore(ignore_zone(move |vp| joystick_zone(vp, radius)));

        let mut session = Self {
            viewport,
            keys: KeyState::default(),
            key_layout: tunables.movement.key_layout,
            joystick: Joystick::new(&tunables.joystick),
            look,
            rig: CameraRig::new(&tunables.camera, &tunables.look),
            locomotion: Locomotion::new(&tunables.movement),
            body: PlayerKinematics::new(Vec3::ZERO),
            blend: AnimationBlend::new(tunables.avatar.fade_duration),
            sampler: DebugSampler::new(
                tunables.debug.enabled,
                Duration::from_millis(tunables.debug.sample_interval_ms),
            ),
            lock_drag: false,
            running: false,
            tunables,
        };
        session.set_lock_drag(session.tunables.look.lock_drag);
        session.start();
        session
    }

    /// Arm input handling and place the camera on its orbit point
    pub fn start(&mut self) {
        self.rig.snap_to(self.body.position);
        self.running = true;
        info!(
            viewport_w = self.viewport.size.x,
            viewport_h = self.viewport.size.y,
            "Control session started"
        );
    }

    /// Release everything and stop accepting input until `start` is called again
    pub fn shutdown(&mut self) {
        self.release_all();
        self.running = false;
        info!("Control session stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn camera(&self) -> &CameraState {
        &self.rig.state
    }

    pub fn body(&self) -> &PlayerKinematics {
        &self.body
    }

    pub fn joystick(&self) -> &Joystick {
        &self.joystick
    }

    pub fn look(&self) -> &LookController {
        &self.look
    }

    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    pub fn blend(&self) -> &AnimationBlend {
        &self.blend
    }

    pub fn key_layout(&self) -> KeyLayout {
        self.key_layout
    }

    pub fn set_key_layout(&mut self, layout: KeyLayout) {
        self.key_layout = layout;
    }

    pub fn lock_drag(&self) -> bool {
        self.lock_drag
    }

    /// Restrict new camera drags to the top of the screen
    pub fn set_lock_drag(&mut self, enabled: bool) {
        self.lock_drag = enabled;
        let accept = enabled.then(|| accept_top_fraction(self.tunables.look.lock_drag_fraction));
        self.look.set_accept(accept);
    }

    pub fn debug_enabled(&self) -> bool {
        self.sampler.is_enabled()
    }

    pub fn set_debug(&mut self, enabled: bool) {
        self.sampler.set_enabled(enabled);
    }

    pub fn last_telemetry(&self) -> Option<&DebugInfo> {
        self.sampler.last()
    }

    /// Current screen rectangle of the joystick widget
    pub fn joystick_zone(&self) -> ScreenRect {
        joystick_zone(&self.viewport, self.joystick.radius())
    }

    pub fn set_key(&mut self, key: MoveKey, pressed: bool) {
        if !self.running {
            return;
        }
        self.keys.set(key, pressed);
    }

    /// Route one pointer event to the joystick or the look controller
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if !self.running {
            return;
        }
        let zone = self.joystick_zone();
        match event.phase {
            PointerPhase::Down => {
                if zone.contains(event.position) {
                    self.joystick.pointer_down(event.id, zone.to_local(event.position));
                } else {
                    self.look.pointer_down(&event, &self.viewport);
                }
            }
            PointerPhase::Move => {
                self.joystick.pointer_move(event.id, zone.to_local(event.position));
                self.look.pointer_move(&event, &mut self.rig);
            }
            PointerPhase::Up | PointerPhase::Cancel => {
                self.joystick.pointer_up(event.id);
                self.look.pointer_up(event.id);
            }
        }
    }

    /// Drop every pointer claim and key press, e.g. on window blur
    pub fn release_all(&mut self) {
        self.joystick.reset();
        self.look.reset();
        self.keys.clear();
        debug!("Released all pointers and keys");
    }

    /// Advance the simulation by one frame of `dt` seconds
    pub fn step(&mut self, dt: f32) -> FrameOutput {
        let raw_dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let dt = raw_dt.min(self.tunables.camera.max_dt);

        self.rig.smooth_angles(dt);
        // last committed view, so movement matches what was on screen
        let basis = self.rig.state.basis();

        let input = InputVector::aggregate(&self.keys, self.key_layout, self.joystick.vector());
        let direction = Locomotion::move_direction(&basis, input);
        self.locomotion.integrate(&mut self.body, direction, dt);
        self.locomotion.update_facing(&mut self.body, dt);

        let camera = self.rig.follow(self.body.position, dt);

        let motion = MotionState::from_input(input.is_active());
        self.blend.transition(motion);
        self.blend.advance(dt);

        let body = self.body;
        let state = &self.rig.state;
        let telemetry = self.sampler.record(raw_dt, || DebugInfo {
            fps: 0.0,
            dt: raw_dt,
            speed: body.speed(),
            yaw: state.yaw,
            pitch: state.pitch,
            position: body.position,
        });

        FrameOutput {
            camera,
            avatar_position: self.body.position,
            facing_yaw: self.body.facing_yaw,
            velocity: self.body.velocity,
            input,
            motion,
            weights: self.blend.weights(),
            telemetry,
        }
    }
}
