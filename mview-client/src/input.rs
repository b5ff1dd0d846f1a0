//! Keyboard and mouse state gathered from SDL events, and their effect on the viewer.

use std::collections::HashSet;

use glam::Vec2;
use mview_core::{Movement, ViewerState};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::mouse::{MouseButton, MouseWheelDirection};

/// The current state of the keyboard.
#[derive(Default)]
pub struct KeyboardState {
    pub down: HashSet<Keycode>,
}

/// The last cursor position reported while the mouse was free.
#[derive(Default)]
pub struct MouseState {
    pub position: Vec2,
}

/// What the frame loop has to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    Resize(u32, u32),
    CaptureMouse(bool),
}

const MOVEMENT_KEYS: [(Keycode, Movement); 6] = [
    (Keycode::W, Movement::Forward),
    (Keycode::S, Movement::Backward),
    (Keycode::A, Movement::Left),
    (Keycode::D, Movement::Right),
    (Keycode::E, Movement::Up),
    (Keycode::Q, Movement::Down),
];

/// Applies one event to the input and viewer state.
pub fn handle_event(
    event: &Event,
    keyboard: &mut KeyboardState,
    mouse: &mut MouseState,
    state: &mut ViewerState,
) -> InputAction {
    match *event {
        Event::Quit { .. }
        | Event::KeyDown {
            keycode: Some(Keycode::Escape),
            ..
        } => InputAction::Quit,
        Event::Window {
            win_event: WindowEvent::SizeChanged(width, height),
            ..
        } => {
            let (width, height) = (width.max(0) as u32, height.max(0) as u32);
            state.resize(width, height);
            InputAction::Resize(width, height)
        }
        Event::KeyDown {
            keycode: Some(keycode),
            ..
        } => {
            keyboard.down.insert(keycode);
            InputAction::None
        }
        Event::KeyUp {
            keycode: Some(keycode),
            ..
        } => {
            keyboard.down.remove(&keycode);
            InputAction::None
        }
        Event::MouseMotion {
            x, y, xrel, yrel, ..
        } => {
            if state.mouse_captured {
                state.cursor_moved_by(Vec2::new(xrel as f32, yrel as f32));
            } else {
                mouse.position = Vec2::new(x as f32, y as f32);
                state.cursor_moved(mouse.position);
            }
            InputAction::None
        }
        Event::MouseWheel { y, direction, .. } => {
            let y = match direction {
                MouseWheelDirection::Flipped => -y,
                _ => y,
            };
            state.scrolled(y as f32);
            InputAction::None
        }
        Event::MouseButtonDown {
            mouse_btn: MouseButton::Right,
            ..
        } => {
            state.set_mouse_captured(true);
            InputAction::CaptureMouse(true)
        }
        Event::MouseButtonUp {
            mouse_btn: MouseButton::Right,
            ..
        } => {
            state.set_mouse_captured(false);
            InputAction::CaptureMouse(false)
        }
        _ => InputAction::None,
    }
}

/// The camera movements requested by the keys currently held.
pub fn held_movements(keyboard: &KeyboardState) -> impl Iterator<Item = Movement> + '_ {
    MOVEMENT_KEYS
        .into_iter()
        .filter(|(key, _)| keyboard.down.contains(key))
        .map(|(_, movement)| movement)
}
