//! Strider Core - Locomotion, look and camera-follow control loop
//!
//! This crate holds everything that runs once per frame and has no renderer
//! dependency:
//! - Keyboard and virtual joystick input aggregation
//! - Drag-to-orbit look control with per-role pointer claims
//! - Two-stage smoothed third-person camera follow
//! - Acceleration-limited locomotion and shortest-arc facing
//! - Idle/moving animation cross-fade, throttled telemetry and load retry policy
//! - TOML tunables

pub mod anim;
pub mod camera;
pub mod config;
pub mod input;
pub mod joystick;
pub mod locomotion;
pub mod look;
pub mod math;
pub mod pointer;
pub mod retry;
pub mod session;
pub mod telemetry;

pub use anim::{AnimationBlend, BlendWeights, MotionState};
pub use camera::{CameraPose, CameraRig, CameraState, MoveBasis};
pub use config::{ConfigError, KeyLayout, Tunables};
pub use input::{InputVector, KeyState, MoveKey};
pub use joystick::Joystick;
pub use locomotion::{Locomotion, PlayerKinematics};
pub use look::{LookController, Viewport};
pub use math::{Vec2, Vec3};
pub use pointer::{PointerEvent, PointerId, PointerPhase, ScreenRect};
pub use retry::RetryPolicy;
pub use session::{ControlSession, FrameOutput};
pub use telemetry::{DebugInfo, DebugSampler};
