use std::path::PathBuf;

use glow::HasContext;
use mview_core::{Camera, ViewerConfig, ViewerState};

use crate::app::App;
use crate::input::{InputAction, KeyboardState, MouseState};
use crate::scene::Scene;

mod app;
mod input;
mod logging;
mod scene;

fn main() {
    let loaded = ViewerConfig::load();
    if let Err(e) = logging::init(loaded.as_ref().is_ok_and(|c| c.verbose)) {
        eprintln!("Failed to install logger: {e}");
    }

    let mut config = loaded.unwrap_or_else(|e| {
        log::error!("{e}; using default settings");
        ViewerConfig::default()
    });
    if let Some(model_path) = std::env::args_os().nth(1) {
        config.model_path = PathBuf::from(model_path);
    }

    let mut app = match App::new(&config.title, config.width, config.height) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Failed to create window: {e}");
            std::process::exit(1);
        }
    };

    let (width, height) = app.window.drawable_size();
    unsafe {
        app.gl.enable(glow::DEPTH_TEST);
        app.gl.viewport(0, 0, width as i32, height as i32);
    }

    let scene = match Scene::new(&app.gl, &config) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Failed to set up scene: {e}");
            std::process::exit(1);
        }
    };

    let mut state = ViewerState::new(Camera::default(), (width, height));
    let mut keyboard = KeyboardState::default();
    let mut mouse = MouseState::default();

    'running: loop {
        state.begin_frame(app.time());

        for event in app.event_pump.poll_iter() {
            match input::handle_event(&event, &mut keyboard, &mut mouse, &mut state) {
                InputAction::Quit => break 'running,
                InputAction::Resize(width, height) => unsafe {
                    app.gl.viewport(0, 0, width as i32, height as i32);
                },
                InputAction::CaptureMouse(captured) => {
                    app.sdl.mouse().set_relative_mouse_mode(captured)
                }
                InputAction::None => {}
            }
        }

        state.move_camera(input::held_movements(&keyboard));

        scene.render(&app.gl, &state);
        app.window.gl_swap_window();
    }

    log::info!("Window closed");
}
