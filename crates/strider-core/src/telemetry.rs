//! Throttled debug telemetry
//!
//! Purely observational: samples are read from the frame state and never fed
//! back into the control loop.

use crate::math::Vec3;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One telemetry sample as shown by the debug panel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DebugInfo {
    pub fps: f32,
    /// Frame delta in seconds
    pub dt: f32,
    pub speed: f32,
    /// Smoothed camera yaw in radians
    pub yaw: f32,
    /// Smoothed camera pitch in radians
    pub pitch: f32,
    pub position: Vec3,
}

impl DebugInfo {
    pub fn dt_ms(&self) -> f32 {
        self.dt * 1000.0
    }

    pub fn yaw_degrees(&self) -> f32 {
        self.yaw.to_degrees()
    }

    pub fn pitch_degrees(&self) -> f32 {
        self.pitch.to_degrees()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Counts frames and emits at most one sample per interval
#[derive(Debug, Clone)]
pub struct DebugSampler {
    enabled: bool,
    interval: Duration,
    elapsed: Duration,
    frames: u32,
    last: Option<DebugInfo>,
}

impl DebugSampler {
    pub fn new(enabled: bool, interval: Duration) -> Self {
        Self {
            enabled,
            interval,
            elapsed: Duration::ZERO,
            frames: 0,
            last: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.elapsed = Duration::ZERO;
            self.frames = 0;
        }
    }

    /// Most recent sample, if any
    pub fn last(&self) -> Option<&DebugInfo> {
        self.last.as_ref()
    }

    /// Record one frame of `dt` seconds; returns a fresh sample once per interval
    pub fn record<F>(&mut self, dt: f32, snapshot: F) -> Option<DebugInfo>
    where
        F: FnOnce() -> DebugInfo,
    {
        if !self.enabled {
            return None;
        }
        // a dt too large for a Duration is a stall, not a frame worth sampling
        let Ok(step) = Duration::try_from_secs_f32(dt.max(0.0)) else {
            return None;
        };
        self.frames += 1;
        self.elapsed = self.elapsed.saturating_add(step);
        if self.elapsed < self.interval {
            return None;
        }

        let secs = self.elapsed.as_secs_f32();
        let mut info = snapshot();
        info.fps = if secs > 0.0 { self.frames as f32 / secs } else { 0.0 };
        info.dt = dt;

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.last = Some(info);
        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_throttled() {
        let mut sampler = DebugSampler::new(true, Duration::from_millis(120));
        let mut samples = 0;
        for _ in 0..60 {
            if sampler.record(1.0 / 60.0, DebugInfo::default).is_some() {
                samples += 1;
            }
        }
        // one second at 60 fps with 120 ms spacing
        assert!((7..=8).contains(&samples));
    }

    #[test]
    fn test_fps_reflects_frame_rate() {
        let mut sampler = DebugSampler::new(true, Duration::from_millis(120));
        let mut last = None;
        for _ in 0..30 {
            if let Some(info) = sampler.record(0.02, DebugInfo::default) {
                last = Some(info);
            }
        }
        let info = last.unwrap();
        assert!((info.fps - 50.0).abs() < 1.0);
        assert!((info.dt_ms() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_disabled_sampler_never_snapshots() {
        let mut sampler = DebugSampler::new(false, Duration::from_millis(1));
        let sample = sampler.record(1.0, || panic!("snapshot taken while disabled"));
        assert!(sample.is_none());
        assert!(sampler.last().is_none());
    }

    #[test]
    fn test_huge_dt_is_skipped() {
        let mut sampler = DebugSampler::new(true, Duration::from_millis(120));
        assert!(sampler.record(1.0e30, DebugInfo::default).is_none());
        assert!(sampler.record(f32::MAX, DebugInfo::default).is_none());
        assert!(sampler.last().is_none());

        // regular frames still sample afterwards
        let sample = sampler.record(0.2, DebugInfo::default).unwrap();
        assert!((sample.fps - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_info_serializes_to_json() {
        let info = DebugInfo {
            fps: 60.0,
            dt: 0.016,
            speed: 2.5,
            yaw: std::f32::consts::PI,
            pitch: 0.0,
            position: Vec3::new(1.0, 0.0, -2.0),
        };
        assert!((info.yaw_degrees() - 180.0).abs() < 1e-3);
        let json = info.to_json().unwrap();
        assert!(json.contains("\"speed\":2.5"));
        assert!(json.contains("\"position\""));
    }
}
