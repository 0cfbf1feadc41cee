//! Bridge from Bevy window input to the control session
//!
//! Mouse and touches become pointer events with stable ids, physical key
//! codes become move keys, and focus loss releases everything.

use bevy::input::keyboard::KeyboardInput;
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::window::{CursorMoved, WindowFocused, WindowOccluded, WindowResized};
use bevy_egui::EguiContexts;
use strider_core::input::MoveKey;
use strider_core::look::Viewport;
use strider_core::pointer::{PointerEvent, PointerId, PointerPhase};

use crate::types::{to_core_screen, Control, ControlSet};

pub struct InputBridgePlugin;

impl Plugin for InputBridgePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                sync_viewport,
                release_on_focus_loss,
                forward_mouse,
                forward_touches,
                forward_keys,
            )
                .chain()
                .in_set(ControlSet::Input),
        );
    }
}

pub fn move_key(code: KeyCode) -> Option<MoveKey> {
    match code {
        KeyCode::KeyW => Some(MoveKey::W),
        KeyCode::KeyA => Some(MoveKey::A),
        KeyCode::KeyS => Some(MoveKey::S),
        KeyCode::KeyD => Some(MoveKey::D),
        KeyCode::ArrowUp => Some(MoveKey::ArrowUp),
        KeyCode::ArrowLeft => Some(MoveKey::ArrowLeft),
        KeyCode::ArrowDown => Some(MoveKey::ArrowDown),
        KeyCode::ArrowRight => Some(MoveKey::ArrowRight),
        _ => None,
    }
}

fn egui_wants_pointer(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
        .unwrap_or(false)
}

fn sync_viewport(
    windows: Query<&Window>,
    mut resized: MessageReader<WindowResized>,
    mut control: ResMut<Control>,
) {
    let first_frame = control.0.viewport().size.is_zero();
    if resized.read().count() == 0 && !first_frame {
        return;
    }
    if let Ok(window) = windows.single() {
        control.0.set_viewport(Viewport::new(window.width(), window.height()));
    }
}

fn release_on_focus_loss(
    mut focused: MessageReader<WindowFocused>,
    mut occluded: MessageReader<WindowOccluded>,
    mut control: ResMut<Control>,
) {
    let blurred = focused.read().any(|e| !e.focused);
    let hidden = occluded.read().any(|e| e.occluded);
    if blurred || hidden {
        control.0.release_all();
    }
}

fn forward_mouse(
    windows: Query<&Window>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut moved: MessageReader<CursorMoved>,
    mut contexts: EguiContexts,
    mut control: ResMut<Control>,
) {
    let cursor = windows.single().ok().and_then(|w| w.cursor_position());
    let moves: Vec<Vec2> = moved.read().map(|e| e.position).collect();
    let pressed = buttons.just_pressed(MouseButton::Left) && !egui_wants_pointer(&mut contexts);
    let released = buttons.just_released(MouseButton::Left);

    for event in mouse_events(pressed, released, cursor, &moves) {
        control.0.handle_pointer(event);
    }
}

/// One frame of mouse input as pointer events
///
/// The press goes first, at the frame's first cursor sample, so the moves
/// that follow only ever carry the drag forward.
fn mouse_events(
    pressed: bool,
    released: bool,
    cursor: Option<Vec2>,
    moves: &[Vec2],
) -> Vec<PointerEvent> {
    let mut events = Vec::with_capacity(moves.len() + 2);
    let event = |phase, position: Vec2| {
        PointerEvent::new(PointerId::Mouse, phase, to_core_screen(position))
    };

    if pressed {
        if let Some(position) = moves.first().copied().or(cursor) {
            events.push(event(PointerPhase::Down, position));
        }
    }
    events.extend(moves.iter().map(|&p| event(PointerPhase::Move, p)));
    if released {
        let position = cursor.or_else(|| moves.last().copied()).unwrap_or_default();
        events.push(event(PointerPhase::Up, position));
    }
    events
}

fn forward_touches(
    mut touches: MessageReader<TouchInput>,
    mut contexts: EguiContexts,
    mut control: ResMut<Control>,
) {
    let over_ui = egui_wants_pointer(&mut contexts);
    for touch in touches.read() {
        let phase = match touch.phase {
            TouchPhase::Started if over_ui => continue,
            TouchPhase::Started => PointerPhase::Down,
            TouchPhase::Moved => PointerPhase::Move,
            TouchPhase::Ended => PointerPhase::Up,
            TouchPhase::Canceled => PointerPhase::Cancel,
        };
        control.0.handle_pointer(PointerEvent::new(
            PointerId::Touch(touch.id),
            phase,
            to_core_screen(touch.position),
        ));
    }
}

fn forward_keys(mut keys: MessageReader<KeyboardInput>, mut control: ResMut<Control>) {
    for event in keys.read() {
        if let Some(key) = move_key(event.key_code) {
            control.0.set_key(key, event.state.is_pressed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strider_core::config::Tunables;
    use strider_core::session::ControlSession;

    #[test]
    fn test_move_keys_are_physical() {
        assert_eq!(move_key(KeyCode::KeyW), Some(MoveKey::W));
        assert_eq!(move_key(KeyCode::ArrowRight), Some(MoveKey::ArrowRight));
        assert_eq!(move_key(KeyCode::KeyQ), None);
        assert_eq!(move_key(KeyCode::Space), None);
    }

    #[test]
    fn test_press_precedes_moves_in_same_frame() {
        let moves = [Vec2::new(400.0, 100.0), Vec2::new(402.0, 100.0), Vec2::new(404.0, 100.0)];
        let events = mouse_events(true, false, Some(moves[2]), &moves);

        let phases: Vec<_> = events.iter().map(|e| e.phase).collect();
        assert_eq!(
            phases,
            [PointerPhase::Down, PointerPhase::Move, PointerPhase::Move, PointerPhase::Move]
        );
        assert_eq!(events[0].position, to_core_screen(moves[0]));
    }

    #[test]
    fn test_first_drag_frame_keeps_its_motion() {
        let tunables = Tunables::default();
        let sensitivity = tunables.look.sensitivity;
        let mut session = ControlSession::new(tunables, Viewport::new(800.0, 600.0));
        let start_yaw = session.camera().desired_yaw;

        let moves = [Vec2::new(400.0, 100.0), Vec2::new(402.0, 100.0), Vec2::new(404.0, 100.0)];
        for event in mouse_events(true, false, Some(moves[2]), &moves) {
            session.handle_pointer(event);
        }

        let turned = session.camera().desired_yaw - start_yaw;
        assert!((turned + 4.0 * sensitivity).abs() < 1e-6);
    }

    #[test]
    fn test_release_without_moves_uses_cursor() {
        let events = mouse_events(false, true, Some(Vec2::new(5.0, 6.0)), &[]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, PointerPhase::Up);
        assert_eq!(events[0].position, strider_core::Vec2::new(5.0, 6.0));
    }
}
