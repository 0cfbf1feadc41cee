//! Pointer identity and per-role claims
//!
//! Camera drag and the joystick each own one `PointerSlot`. A slot holds at
//! most one pointer; claims from other pointers are refused until the owner
//! releases it, so the two roles never contend for the same contact.

use crate::math::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Stable identifier of one input contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerId::Mouse => write!(f, "mouse"),
            PointerId::Touch(id) => write!(f, "touch#{}", id),
        }
    }
}

/// Logical role a pointer can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerRole {
    CameraDrag,
    Joystick,
}

/// Phase of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// One pointer event in screen coordinates (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub phase: PointerPhase,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn new(id: PointerId, phase: PointerPhase, position: Vec2) -> Self {
        Self { id, phase, position }
    }
}

/// Axis-aligned screen rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenRect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Express a screen point relative to the rectangle's top-left corner
    pub fn to_local(&self, p: Vec2) -> Vec2 {
        p - self.min
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Exclusive binding of one pointer to a role
#[derive(Debug, Clone)]
pub struct PointerSlot {
    role: PointerRole,
    owner: Option<PointerId>,
}

impl PointerSlot {
    pub fn new(role: PointerRole) -> Self {
        Self { role, owner: None }
    }

    pub fn role(&self) -> PointerRole {
        self.role
    }

    pub fn owner(&self) -> Option<PointerId> {
        self.owner
    }

    pub fn is_claimed(&self) -> bool {
        self.owner.is_some()
    }

    pub fn is_owned_by(&self, id: PointerId) -> bool {
        self.owner == Some(id)
    }

    /// Bind `id` if the slot is free. Returns true when `id` owns the slot afterwards.
    pub fn claim(&mut self, id: PointerId) -> bool {
        match self.owner {
            None => {
                debug!(role = ?self.role, pointer = %id, "Pointer claimed");
                self.owner = Some(id);
                true
            }
            Some(owner) => owner == id,
        }
    }

    /// Unbind `id` if it is the owner. Returns true when something was released.
    pub fn release(&mut self, id: PointerId) -> bool {
        if self.owner == Some(id) {
            debug!(role = ?self.role, pointer = %id, "Pointer released");
            self.owner = None;
            true
        } else {
            false
        }
    }

    /// Drop the binding regardless of owner
    pub fn clear(&mut self) {
        self.owner = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_claim_is_refused() {
        let mut slot = PointerSlot::new(PointerRole::CameraDrag);
        assert!(slot.claim(PointerId::Touch(1)));
        assert!(!slot.claim(PointerId::Touch(2)));
        assert_eq!(slot.owner(), Some(PointerId::Touch(1)));
    }

    #[test]
    fn test_release_by_stranger_is_ignored() {
        let mut slot = PointerSlot::new(PointerRole::Joystick);
        slot.claim(PointerId::Mouse);
        assert!(!slot.release(PointerId::Touch(9)));
        assert!(slot.is_owned_by(PointerId::Mouse));
        assert!(slot.release(PointerId::Mouse));
        assert!(!slot.is_claimed());
        assert!(slot.claim(PointerId::Touch(9)));
    }

    #[test]
    fn test_screen_rect_local_coordinates() {
        let rect = ScreenRect::from_center_size(Vec2::new(100.0, 100.0), Vec2::new(40.0, 20.0));
        assert!(rect.contains(Vec2::new(80.0, 90.0)));
        assert!(!rect.contains(Vec2::new(79.0, 90.0)));
        assert_eq!(rect.to_local(Vec2::new(85.0, 95.0)), Vec2::new(5.0, 5.0));
        assert_eq!(rect.width(), 40.0);
        assert_eq!(rect.height(), 20.0);
    }
}
