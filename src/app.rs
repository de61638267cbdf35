/*
 * Application Module
 *
 * This module defines the main application model and the per-frame update.
 * The window-independent state lives in the Shell; the Model adds the egui
 * integration, frame timing and the render gate around it.
 *
 * Optimized for performance by:
 * - Using a fixed timestep for the flock and board effects
 * - Only redrawing the scene while something is animating or input arrived
 */

use std::time::{Duration, Instant};

use nannou::prelude::*;
use nannou_egui::Egui;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use crate::config::{AppConfig, CONFIG_FILE};
use crate::debug::DebugInfo;
use crate::input;
use crate::renderer;
use crate::screens::Shell;
use crate::ui;

// Physics steps allowed per frame before the backlog is dropped
const MAX_STEPS_PER_FRAME: usize = 5;

// Main model for the application
pub struct Model {
    pub shell: Shell,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub show_debug: bool,
    // Last pointer position in surface coordinates
    pub cursor: Vec2,
    pub render_needed: bool,
    // Fixed timestep physics variables
    pub physics_accumulator: Duration,
    pub physics_step_size: Duration,
    pub last_update_time: Instant,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let config = AppConfig::load_or_default(CONFIG_FILE);

    // 80% of the primary monitor, or a fixed size if it can't be queried
    let (window_width, window_height) = match app.primary_monitor() {
        Some(monitor) => {
            let size = monitor.size();
            (size.width as f32 * 0.8, size.height as f32 * 0.8)
        }
        None => (1024.0, 768.0),
    };

    let window_id = match app
        .new_window()
        .title("Dots and Boxes")
        .size(window_width as u32, window_height as u32)
        .view(renderer::view)
        .mouse_moved(input::mouse_moved)
        .mouse_pressed(input::mouse_pressed)
        .mouse_released(input::mouse_released)
        .mouse_wheel(input::mouse_wheel)
        .touch(input::touch)
        .resized(resized)
        .raw_event(input::raw_window_event)
        .build()
    {
        Ok(id) => id,
        Err(e) => {
            error!("Failed to create window: {:?}", e);
            std::process::exit(1);
        }
    };

    let Some(window) = app.window(window_id) else {
        error!("Window {:?} closed during startup", window_id);
        std::process::exit(1);
    };
    let egui = Egui::from_window(&window);
    let rect = window.rect();
    let surface = vec2(rect.w(), rect.h());

    let physics_step_size = Duration::from_secs_f32(1.0 / config.simulation.physics_fps.max(1.0));
    info!("Window {:.0}x{:.0}, physics at {} Hz", surface.x, surface.y, config.simulation.physics_fps);

    Model {
        shell: Shell::new(config, surface, StdRng::from_entropy()),
        egui,
        debug_info: DebugInfo::default(),
        show_debug: false,
        cursor: Vec2::ZERO,
        render_needed: true,
        physics_accumulator: Duration::ZERO,
        physics_step_size,
        last_update_time: Instant::now(),
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;
    // Set by the input handlers since the last frame
    let input_arrived = std::mem::take(&mut model.render_needed);

    let now = Instant::now();
    let ui_changed = ui::update_ui(
        &mut model.egui,
        &mut model.shell,
        &model.debug_info,
        &mut model.show_debug,
        now,
    );

    // Fixed timestep physics
    let frame_time = now.duration_since(model.last_update_time);
    model.last_update_time = now;
    model.physics_accumulator += frame_time;

    let mut steps = 0;
    while model.physics_accumulator >= model.physics_step_size {
        if steps == MAX_STEPS_PER_FRAME {
            model.physics_accumulator = Duration::ZERO;
            break;
        }
        model.shell.step();
        model.physics_accumulator -= model.physics_step_size;
        steps += 1;
    }
    model.shell.tick(now);

    model.debug_info.physics_steps_per_frame = steps;
    model.debug_info.particle_count = model.shell.flock.boids().len();

    model.render_needed = input_arrived || ui_changed || model.shell.needs_redraw();
    model.debug_info.rendered = model.render_needed;
}

// Re-layout everything for the new window size
fn resized(_app: &App, model: &mut Model, size: Vec2) {
    model.shell.resize(size);
    model.render_needed = true;
}
