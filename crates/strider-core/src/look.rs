//! Drag-to-orbit look controller
//!
//! Tracks a single pointer. Drags feed the camera's desired angles only; the
//! camera rig smooths them on its own schedule.

use crate::camera::CameraRig;
use crate::math::Vec2;
use crate::pointer::{PointerEvent, PointerId, PointerRole, PointerSlot, ScreenRect};

/// Size of the drawable surface in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub size: Vec2,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
        }
    }
}

/// Decides whether a pointer-down may start a camera drag
pub type PointerPredicate = Box<dyn Fn(&PointerEvent, &Viewport) -> bool + Send + Sync>;

/// Accept only pointers that go down in the top `fraction` of the screen
pub fn accept_top_fraction(fraction: f32) -> PointerPredicate {
    Box::new(move |event, viewport| event.position.y <= viewport.size.y * fraction)
}

/// Ignore pointers that go down inside `zone(viewport)`
pub fn ignore_zone<F>(zone: F) -> PointerPredicate
where
    F: Fn(&Viewport) -> ScreenRect + Send + Sync + 'static,
{
    Box::new(move |event, viewport| zone(viewport).contains(event.position))
}

pub struct LookController {
    slot: PointerSlot,
    last: Option<Vec2>,
    sensitivity: f32,
    ignore: Option<PointerPredicate>,
    accept: Option<PointerPredicate>,
}

impl std::fmt::Debug for LookController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookController")
            .field("pointer", &self.slot.owner())
            .field("last", &self.last)
            .field("sensitivity", &self.sensitivity)
            .field("has_ignore", &self.ignore.is_some())
            .field("has_accept", &self.accept.is_some())
            .finish()
    }
}

impl LookController {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            slot: PointerSlot::new(PointerRole::CameraDrag),
            last: None,
            sensitivity,
            ignore: None,
            accept: None,
        }
    }

    pub fn with_ignore(mut self, predicate: PointerPredicate) -> Self {
        self.ignore = Some(predicate);
        self
    }

    pub fn with_accept(mut self, predicate: PointerPredicate) -> Self {
        self.accept = Some(predicate);
        self
    }

    /// Replace the accept predicate at runtime (e.g. toggling drag lock)
    pub fn set_accept(&mut self, predicate: Option<PointerPredicate>) {
        self.accept = predicate;
    }

    pub fn pointer(&self) -> Option<PointerId> {
        self.slot.owner()
    }

    pub fn is_dragging(&self) -> bool {
        self.slot.is_claimed()
    }

    /// Returns true when this pointer now drives the camera
    pub fn pointer_down(&mut self, event: &PointerEvent, viewport: &Viewport) -> bool {
        if self.ignore.as_ref().is_some_and(|ignore| ignore(event, viewport)) {
            return false;
        }
        if self.accept.as_ref().is_some_and(|accept| !accept(event, viewport)) {
            return false;
        }
        if self.slot.is_claimed() {
            return false;
        }
        self.slot.claim(event.id);
        self.last = Some(event.position);
        true
    }

    pub fn pointer_move(&mut self, event: &PointerEvent, rig: &mut CameraRig) {
        if !self.slot.is_owned_by(event.id) {
            return;
        }
        let Some(last) = self.last else { return };

        let delta = event.position - last;
        self.last = Some(event.position);
        rig.add_look_delta(-delta.x * self.sensitivity, -delta.y * self.sensitivity);
    }

    /// Up and cancel both end the drag
    pub fn pointer_up(&mut self, id: PointerId) {
        if self.slot.release(id) {
            self.last = None;
        }
    }

    pub fn reset(&mut self) {
        self.slot.clear();
        self.last = None;
    }
}
