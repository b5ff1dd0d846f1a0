//! Per-frame viewer state: the camera, mouse tracking and frame timing.

use glam::Vec2;

use crate::camera::{Camera, Movement};

/// Everything the input and render steps share between frames.
#[derive(Debug, Clone)]
pub struct ViewerState {
    pub camera: Camera,
    /// Last cursor position, `None` until the first motion event.
    pub last_cursor: Option<Vec2>,
    /// The mouse is grabbed and drives the camera while the right button is held.
    pub mouse_captured: bool,
    pub delta_time: f32,
    pub last_frame: f32,
    pub viewport: (u32, u32),
}

impl ViewerState {
    pub fn new(camera: Camera, viewport: (u32, u32)) -> Self {
        Self {
            camera,
            last_cursor: None,
            mouse_captured: false,
            delta_time: 0.0,
            last_frame: 0.0,
            viewport,
        }
    }

    /// Records the time of a new frame, in seconds since startup.
    pub fn begin_frame(&mut self, now: f32) {
        self.delta_time = now - self.last_frame;
        self.last_frame = now;
    }

    /// Handles an absolute cursor position. The first sample only sets the reference point.
    pub fn cursor_moved(&mut self, position: Vec2) {
        let last = self.last_cursor.replace(position).unwrap_or(position);
        // window y grows downwards
        let offset = Vec2::new(position.x - last.x, last.y - position.y);
        if self.mouse_captured {
            self.camera.process_mouse_movement(offset.x, offset.y);
        }
    }

    /// Handles a relative cursor motion, as reported while the mouse is grabbed.
    pub fn cursor_moved_by(&mut self, delta: Vec2) {
        let last = self.last_cursor.unwrap_or_default();
        self.cursor_moved(last + delta);
    }

    pub fn scrolled(&mut self, y_offset: f32) {
        self.camera.process_mouse_scroll(y_offset);
    }

    /// Moves the camera for this frame. Ignored unless the mouse is captured.
    pub fn move_camera(&mut self, movements: impl IntoIterator<Item = Movement>) {
        if !self.mouse_captured {
            return;
        }
        for movement in movements {
            self.camera.process_keyboard(movement, self.delta_time);
        }
    }

    pub fn set_mouse_captured(&mut self, captured: bool) {
        self.mouse_captured = captured;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (width, height) = self.viewport;
        width as f32 / height.max(1) as f32
    }
}
