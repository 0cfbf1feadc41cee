//! Idle/moving animation cross-fade

/// Visual locomotion state of the avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    #[default]
    Idle,
    Moving,
}

impl MotionState {
    /// Moving whenever any input axis is active this frame, regardless of velocity
    pub fn from_input(active: bool) -> Self {
        if active {
            MotionState::Moving
        } else {
            MotionState::Idle
        }
    }

    pub fn weights(self) -> BlendWeights {
        match self {
            MotionState::Idle => BlendWeights { idle: 1.0, moving: 0.0 },
            MotionState::Moving => BlendWeights { idle: 0.0, moving: 1.0 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub idle: f32,
    pub moving: f32,
}

impl BlendWeights {
    fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            idle: self.idle + (to.idle - self.idle) * t,
            moving: self.moving + (to.moving - self.moving) * t,
        }
    }
}

/// Two-state machine with a linear weight ramp on every transition
#[derive(Debug, Clone)]
pub struct AnimationBlend {
    state: MotionState,
    fade_duration: f32,
    clock: f64,
    fade_start: f64,
    from: BlendWeights,
    to: BlendWeights,
    current: BlendWeights,
}

impl AnimationBlend {
    pub fn new(fade_duration: f32) -> Self {
        let idle = MotionState::Idle.weights();
        Self {
            state: MotionState::Idle,
            fade_duration,
            clock: 0.0,
            fade_start: 0.0,
            from: idle,
            to: idle,
            current: idle,
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn weights(&self) -> BlendWeights {
        self.current
    }

    pub fn is_fading(&self) -> bool {
        self.current != self.to
    }

    /// Begin a fade toward `next`. Re-entering the current state does nothing.
    pub fn transition(&mut self, next: MotionState) {
        if next == self.state {
            return;
        }
        self.state = next;
        self.fade_start = self.clock;
        self.from = self.current;
        self.to = next.weights();
    }

    /// Advance the fade by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.clock += f64::from(dt);
        let t = if self.fade_duration > 0.0 {
            (((self.clock - self.fade_start) as f32) / self.fade_duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.current = if t >= 1.0 { self.to } else { self.from.lerp(self.to, t) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_completes_after_duration() {
        let mut blend = AnimationBlend::new(0.25);
        blend.transition(MotionState::Moving);
        blend.advance(0.125);
        let mid = blend.weights();
        assert!((mid.idle - 0.5).abs() < 1e-5);
        assert!((mid.moving - 0.5).abs() < 1e-5);
        assert!(blend.is_fading());

        blend.advance(0.2);
        assert_eq!(blend.weights(), MotionState::Moving.weights());
        assert!(!blend.is_fading());
    }

    #[test]
    fn test_same_state_is_a_no_op() {
        let mut blend = AnimationBlend::new(0.25);
        blend.transition(MotionState::Moving);
        blend.advance(0.1);
        let before = blend.weights();

        blend.transition(MotionState::Moving);
        assert_eq!(blend.weights(), before);
        blend.advance(0.2);
        // still on the first schedule
        assert_eq!(blend.weights(), MotionState::Moving.weights());
    }

    #[test]
    fn test_reversal_starts_from_current_weights() {
        let mut blend = AnimationBlend::new(0.25);
        blend.transition(MotionState::Moving);
        blend.advance(0.05);
        let snapshot = blend.weights();

        blend.transition(MotionState::Idle);
        blend.advance(0.0);
        assert!((blend.weights().moving - snapshot.moving).abs() < 1e-6);

        blend.advance(0.3);
        assert_eq!(blend.weights(), MotionState::Idle.weights());
    }

    #[test]
    fn test_weights_always_sum_to_one() {
        let mut blend = AnimationBlend::new(0.25);
        let pattern = [true, true, false, true, false, false, true];
        for (i, &active) in pattern.iter().cycle().take(50).enumerate() {
            blend.transition(MotionState::from_input(active));
            blend.advance(0.01 * (i % 5) as f32);
            let w = blend.weights();
            assert!((w.idle + w.moving - 1.0).abs() < 1e-5);
        }
    }
}
