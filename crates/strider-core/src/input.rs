//! Keyboard state and per-frame move vector aggregation
//!
//! Platform code updates `KeyState` on key events; the frame driver combines
//! it with the joystick once per frame.

use crate::config::KeyLayout;
use crate::math::Vec2;

/// Physical keys that can drive movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowLeft,
    ArrowDown,
    ArrowRight,
}

#[derive(Default, Debug, Clone, Copy)]
pub struct KeyState {
    pub w: bool,
    pub a: bool,
    pub s: bool,
    pub d: bool,
    pub up: bool,
    pub left: bool,
    pub down: bool,
    pub right: bool,
}

impl KeyState {
    pub fn set(&mut self, key: MoveKey, pressed: bool) {
        match key {
            MoveKey::W => self.w = pressed,
            MoveKey::A => self.a = pressed,
            MoveKey::S => self.s = pressed,
            MoveKey::D => self.d = pressed,
            MoveKey::ArrowUp => self.up = pressed,
            MoveKey::ArrowLeft => self.left = pressed,
            MoveKey::ArrowDown => self.down = pressed,
            MoveKey::ArrowRight => self.right = pressed,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Raw keyboard axes under `layout`; each axis is -1, 0 or 1
    pub fn axes(&self, layout: KeyLayout) -> Vec2 {
        let (forward, back, left, right) = match layout {
            KeyLayout::Wasd => (self.w, self.s, self.a, self.d),
            KeyLayout::Arrows => (self.up, self.down, self.left, self.right),
            KeyLayout::Both => (
                self.w || self.up,
                self.s || self.down,
                self.a || self.left,
                self.d || self.right,
            ),
        };
        Vec2::new(axis(left, right), axis(back, forward))
    }
}

fn axis(negative: bool, positive: bool) -> f32 {
    let mut v = 0.0;
    if positive {
        v += 1.0;
    }
    if negative {
        v -= 1.0;
    }
    v
}

/// Combined move input: x strafes right, y moves forward. Length never exceeds 1.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputVector {
    pub x: f32,
    pub y: f32,
}

impl InputVector {
    /// Sum keyboard and joystick contributions, scaling the result down to unit length if needed
    pub fn aggregate(keys: &KeyState, layout: KeyLayout, joystick: Vec2) -> Self {
        let combined = (keys.axes(layout) + joystick).clamp_length_max(1.0);
        Self {
            x: combined.x,
            y: combined.y,
        }
    }

    pub fn is_active(&self) -> bool {
        self.x != 0.0 || self.y != 0.0
    }

    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_keys_are_scaled_to_unit() {
        let mut keys = KeyState::default();
        keys.set(MoveKey::W, true);
        keys.set(MoveKey::D, true);

        let input = InputVector::aggregate(&keys, KeyLayout::Wasd, Vec2::ZERO);
        assert!((input.x - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
        assert!((input.y - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn test_short_input_is_not_scaled_up() {
        let keys = KeyState::default();
        let input = InputVector::aggregate(&keys, KeyLayout::Wasd, Vec2::new(0.3, -0.2));
        assert!((input.x - 0.3).abs() < 1e-6);
        assert!((input.y + 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut keys = KeyState::default();
        keys.set(MoveKey::A, true);
        keys.set(MoveKey::D, true);
        let input = InputVector::aggregate(&keys, KeyLayout::Wasd, Vec2::ZERO);
        assert!(!input.is_active());
    }

    #[test]
    fn test_keys_and_stick_combine_then_clamp() {
        let mut keys = KeyState::default();
        keys.set(MoveKey::W, true);
        let input = InputVector::aggregate(&keys, KeyLayout::Wasd, Vec2::new(0.0, 1.0));
        assert!((input.length() - 1.0).abs() < 1e-6);
        assert!((input.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_layout_selects_keys() {
        let mut keys = KeyState::default();
        keys.set(MoveKey::ArrowUp, true);

        assert!(!InputVector::aggregate(&keys, KeyLayout::Wasd, Vec2::ZERO).is_active());
        assert_eq!(keys.axes(KeyLayout::Arrows), Vec2::new(0.0, 1.0));
        assert_eq!(keys.axes(KeyLayout::Both), Vec2::new(0.0, 1.0));

        keys.clear();
        assert_eq!(keys.axes(KeyLayout::Both), Vec2::ZERO);
    }
}
