//! Tunable constants for look, movement, camera, joystick, lighting and debug output
//!
//! Every field has a serde default so a partial TOML file (or none at all)
//! yields a complete, valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// All tunables, grouped the same way as the TOML sections
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tunables {
    #[serde(default)]
    pub look: LookConfig,
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub joystick: JoystickConfig,
    #[serde(default)]
    pub debug: DebugConfig,
    #[serde(default)]
    pub avatar: AvatarConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookConfig {
    /// Radians of rotation per pixel of drag
    #[serde(default = "default_look_sensitivity")]
    pub sensitivity: f32,
    /// Exponential rate at which rendered angles chase the drag target
    #[serde(default = "default_look_smoothing")]
    pub smoothing: f32,
    #[serde(default = "default_pitch_min")]
    pub pitch_min: f32,
    #[serde(default = "default_pitch_max")]
    pub pitch_max: f32,
    /// Only accept camera drags that start in the upper part of the screen
    #[serde(default)]
    pub lock_drag: bool,
    /// Fraction of the screen height (from the top) accepted when `lock_drag` is on
    #[serde(default = "default_lock_drag_fraction")]
    pub lock_drag_fraction: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_look_sensitivity(),
            smoothing: default_look_smoothing(),
            pitch_min: default_pitch_min(),
            pitch_max: default_pitch_max(),
            lock_drag: false,
            lock_drag_fraction: default_lock_drag_fraction(),
        }
    }
}

fn default_look_sensitivity() -> f32 {
    0.0032
}

fn default_look_smoothing() -> f32 {
    18.0
}

fn default_pitch_min() -> f32 {
    -std::f32::consts::FRAC_PI_2 + 0.05
}

fn default_pitch_max() -> f32 {
    0.6
}

fn default_lock_drag_fraction() -> f32 {
    0.6
}

/// Which physical keys drive movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyLayout {
    #[default]
    Wasd,
    Arrows,
    Both,
}

impl std::str::FromStr for KeyLayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wasd" => Ok(Self::Wasd),
            "arrows" => Ok(Self::Arrows),
            "both" => Ok(Self::Both),
            other => Err(ConfigError::Invalid {
                field: "movement.key_layout",
                reason: format!("unknown layout '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementConfig {
    /// m/s² while input is held
    #[serde(default = "default_accel")]
    pub accel: f32,
    /// m/s² while coasting to a stop
    #[serde(default = "default_deaccel")]
    pub deaccel: f32,
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
    /// Facing responsiveness (fraction of the remaining turn per second)
    #[serde(default = "default_turn_rate")]
    pub turn_rate: f32,
    /// Below this speed the avatar keeps its facing
    #[serde(default = "default_turn_speed_threshold")]
    pub turn_speed_threshold: f32,
    #[serde(default)]
    pub key_layout: KeyLayout,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            accel: default_accel(),
            deaccel: default_deaccel(),
            max_speed: default_max_speed(),
            turn_rate: default_turn_rate(),
            turn_speed_threshold: default_turn_speed_threshold(),
            key_layout: KeyLayout::default(),
        }
    }
}

fn default_accel() -> f32 {
    18.0
}

fn default_deaccel() -> f32 {
    14.0
}

fn default_max_speed() -> f32 {
    10.0
}

fn default_turn_rate() -> f32 {
    8.0
}

fn default_turn_speed_threshold() -> f32 {
    0.1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Orbit radius around the eye point
    #[serde(default = "default_distance")]
    pub distance: f32,
    #[serde(default)]
    pub initial_yaw: f32,
    #[serde(default = "default_initial_pitch")]
    pub initial_pitch: f32,
    /// Height of the look-at point above the avatar's feet
    #[serde(default = "default_eye_height")]
    pub eye_height: f32,
    /// Exponential rate at which the camera body trails its desired position
    #[serde(default = "default_follow_smoothing")]
    pub follow_smoothing: f32,
    /// Upper bound on a single frame's delta time, in seconds
    #[serde(default = "default_max_dt")]
    pub max_dt: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: default_distance(),
            initial_yaw: 0.0,
            initial_pitch: default_initial_pitch(),
            eye_height: default_eye_height(),
            follow_smoothing: default_follow_smoothing(),
            max_dt: default_max_dt(),
        }
    }
}

fn default_distance() -> f32 {
    5.5
}

fn default_initial_pitch() -> f32 {
    -0.12
}

fn default_eye_height() -> f32 {
    0.9
}

fn default_follow_smoothing() -> f32 {
    10.0
}

fn default_max_dt() -> f32 {
    0.05
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoystickConfig {
    /// Maximum knob travel in pixels
    #[serde(default = "default_joystick_radius")]
    pub radius: f32,
    /// Travel in pixels below which the stick reads as centered
    #[serde(default = "default_joystick_deadzone")]
    pub deadzone: f32,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            radius: default_joystick_radius(),
            deadzone: default_joystick_deadzone(),
        }
    }
}

fn default_joystick_radius() -> f32 {
    70.0
}

fn default_joystick_deadzone() -> f32 {
    6.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Show the telemetry panel on start
    #[serde(default)]
    pub enabled: bool,
    /// Minimum spacing between telemetry samples
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sample_interval_ms: default_sample_interval_ms(),
        }
    }
}

fn default_sample_interval_ms() -> u64 {
    120
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarConfig {
    /// glTF model path, relative to the asset root
    #[serde(default = "default_model_path")]
    pub model_path: String,
    #[serde(default = "default_model_scale")]
    pub scale: f32,
    /// Total load attempts before keeping the placeholder for good
    #[serde(default = "default_load_attempts")]
    pub load_attempts: u32,
    /// Delay before retry `n` is `n * retry_delay_ms`
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Idle/moving cross-fade length in seconds
    #[serde(default = "default_fade_duration")]
    pub fade_duration: f32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            scale: default_model_scale(),
            load_attempts: default_load_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            fade_duration: default_fade_duration(),
        }
    }
}

fn default_model_path() -> String {
    "models/avatar.glb".to_string()
}

fn default_model_scale() -> f32 {
    0.3
}

fn default_load_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    250
}

fn default_fade_duration() -> f32 {
    0.25
}

/// Image-based lighting; the maps are optional and skipped if they fail to load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default = "default_diffuse_map")]
    pub diffuse_map: String,
    #[serde(default = "default_specular_map")]
    pub specular_map: String,
    /// Multiplier on the environment light, 0 disables it
    #[serde(default = "default_environment_intensity")]
    pub intensity: f32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            diffuse_map: default_diffuse_map(),
            specular_map: default_specular_map(),
            intensity: default_environment_intensity(),
        }
    }
}

impl EnvironmentConfig {
    pub fn is_enabled(&self) -> bool {
        self.intensity > 0.0
    }
}

fn default_diffuse_map() -> String {
    "env/neutral_diffuse.ktx2".to_string()
}

fn default_specular_map() -> String {
    "env/neutral_specular.ktx2".to_string()
}

fn default_environment_intensity() -> f32 {
    0.9
}

impl Tunables {
    /// Load tunables from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let tunables = Self::from_toml(&content)?;
        info!(path = %path.display(), "Loaded tunables");
        Ok(tunables)
    }

    /// Parse and validate tunables from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let tunables: Tunables = toml::from_str(content)?;
        tunables.validate()?;
        Ok(tunables)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the control core cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {}", value),
                })
            }
        }

        positive("look.sensitivity", self.look.sensitivity)?;
        positive("look.smoothing", self.look.smoothing)?;
        if self.look.pitch_min >= self.look.pitch_max {
            return Err(ConfigError::Invalid {
                field: "look.pitch_min",
                reason: format!(
                    "must be below pitch_max ({} >= {})",
                    self.look.pitch_min, self.look.pitch_max
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.look.lock_drag_fraction) {
            return Err(ConfigError::Invalid {
                field: "look.lock_drag_fraction",
                reason: format!("must be within [0, 1], got {}", self.look.lock_drag_fraction),
            });
        }

        positive("movement.accel", self.movement.accel)?;
        positive("movement.deaccel", self.movement.deaccel)?;
        positive("movement.max_speed", self.movement.max_speed)?;
        positive("movement.turn_rate", self.movement.turn_rate)?;

        positive("camera.distance", self.camera.distance)?;
        positive("camera.follow_smoothing", self.camera.follow_smoothing)?;
        positive("camera.max_dt", self.camera.max_dt)?;
        let pitch = self.camera.initial_pitch;
        if pitch < self.look.pitch_min || pitch > self.look.pitch_max {
            return Err(ConfigError::Invalid {
                field: "camera.initial_pitch",
                reason: format!("{} lies outside the pitch clamp", pitch),
            });
        }

        positive("joystick.radius", self.joystick.radius)?;
        if self.joystick.deadzone < 0.0 || self.joystick.deadzone >= self.joystick.radius {
            return Err(ConfigError::Invalid {
                field: "joystick.deadzone",
                reason: format!(
                    "must be within [0, radius), got {} with radius {}",
                    self.joystick.deadzone, self.joystick.radius
                ),
            });
        }

        if self.avatar.load_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "avatar.load_attempts",
                reason: "at least one attempt is required".to_string(),
            });
        }
        positive("avatar.scale", self.avatar.scale)?;
        positive("avatar.fade_duration", self.avatar.fade_duration)?;

        let intensity = self.environment.intensity;
        if !(intensity >= 0.0 && intensity.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "environment.intensity",
                reason: format!("must be zero or positive, got {}", intensity),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let tunables = Tunables::default();
        tunables.validate().unwrap();
        assert_eq!(tunables.movement.max_speed, 10.0);
        assert_eq!(tunables.joystick.radius, 70.0);
        assert_eq!(tunables.debug.sample_interval_ms, 120);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let content = r#"
[movement]
max_speed = 5.5
key_layout = "arrows"

[debug]
enabled = true
"#;
        let tunables = Tunables::from_toml(content).unwrap();
        assert_eq!(tunables.movement.max_speed, 5.5);
        assert_eq!(tunables.movement.accel, 18.0);
        assert_eq!(tunables.movement.key_layout, KeyLayout::Arrows);
        assert!(tunables.debug.enabled);
        assert_eq!(tunables.look, LookConfig::default());
    }

    #[test]
    fn test_rejects_deadzone_past_radius() {
        let content = r#"
[joystick]
radius = 40.0
deadzone = 40.0
"#;
        let err = Tunables::from_toml(content).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "joystick.deadzone", .. }));
    }

    #[test]
    fn test_rejects_inverted_pitch_clamp() {
        let mut tunables = Tunables::default();
        tunables.look.pitch_min = 1.0;
        tunables.look.pitch_max = 0.5;
        assert!(tunables.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = Tunables::from_toml("[look\nsensitivity = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_round_trip_through_file() {
        let mut tunables = Tunables::default();
        tunables.camera.distance = 7.0;
        tunables.look.lock_drag = true;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(tunables.to_toml().unwrap().as_bytes()).unwrap();

        let loaded = Tunables::from_file(file.path()).unwrap();
        assert_eq!(loaded, tunables);
    }

    #[test]
    fn test_key_layout_from_str() {
        assert_eq!("WASD".parse::<KeyLayout>().unwrap(), KeyLayout::Wasd);
        assert_eq!("both".parse::<KeyLayout>().unwrap(), KeyLayout::Both);
        assert!("dvorak".parse::<KeyLayout>().is_err());
    }

    #[test]
    fn test_environment_can_be_switched_off() {
        let defaults = Tunables::default();
        assert!(defaults.environment.is_enabled());
        assert_eq!(defaults.environment.intensity, 0.9);

        let tunables = Tunables::from_toml("[environment]\nintensity = 0.0\n").unwrap();
        assert!(!tunables.environment.is_enabled());
        assert_eq!(tunables.environment.diffuse_map, "env/neutral_diffuse.ktx2");

        let err = Tunables::from_toml("[environment]\nintensity = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "environment.intensity", .. }));
    }
}
