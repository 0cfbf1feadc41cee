//! Virtual analog stick
//!
//! Coordinates are local to the joystick widget (origin top-left, y down).
//! The stick is anchored wherever the tracked pointer went down.

use crate::config::JoystickConfig;
use crate::math::Vec2;
use crate::pointer::{PointerId, PointerRole, PointerSlot};

#[derive(Debug, Clone)]
pub struct Joystick {
    radius: f32,
    deadzone: f32,
    slot: PointerSlot,
    origin: Option<Vec2>,
    knob: Option<Vec2>,
    vector: Vec2,
}

impl Joystick {
    pub fn new(config: &JoystickConfig) -> Self {
        Self {
            radius: config.radius,
            deadzone: config.deadzone,
            slot: PointerSlot::new(PointerRole::Joystick),
            origin: None,
            knob: None,
            vector: Vec2::ZERO,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn deadzone(&self) -> f32 {
        self.deadzone
    }

    /// Whether a pointer is currently driving the stick
    pub fn is_active(&self) -> bool {
        self.slot.is_claimed()
    }

    pub fn pointer(&self) -> Option<PointerId> {
        self.slot.owner()
    }

    pub fn origin(&self) -> Option<Vec2> {
        self.origin
    }

    /// Visual knob position (origin + clamped offset)
    pub fn knob(&self) -> Option<Vec2> {
        self.knob
    }

    /// Logical stick vector: x right, y forward, each in [-1, 1]
    pub fn vector(&self) -> Vec2 {
        self.vector
    }

    /// Start tracking `id` at `local`. Ignored while another pointer holds the stick.
    pub fn pointer_down(&mut self, id: PointerId, local: Vec2) -> bool {
        if !self.slot.claim(id) {
            return false;
        }
        self.origin = Some(local);
        self.knob = Some(local);
        self.vector = Vec2::ZERO;
        true
    }

    pub fn pointer_move(&mut self, id: PointerId, local: Vec2) {
        if !self.slot.is_owned_by(id) {
            return;
        }
        let Some(origin) = self.origin else { return };

        let offset = (local - origin).clamp_length_max(self.radius);
        self.knob = Some(origin + offset);

        let normalized = Vec2::new(offset.x / self.radius, -offset.y / self.radius);
        self.vector = if normalized.length() < self.deadzone / self.radius {
            Vec2::ZERO
        } else {
            normalized
        };
    }

    /// Up and cancel both end the drag
    pub fn pointer_up(&mut self, id: PointerId) {
        if self.slot.release(id) {
            self.reset_state();
        }
    }

    /// Forget the tracked pointer and recenter, e.g. after focus loss
    pub fn reset(&mut self) {
        self.slot.clear();
        self.reset_state();
    }

    fn reset_state(&mut self) {
        self.origin = None;
        self.knob = None;
        self.vector = Vec2::ZERO;
    }
}
