/*
 * Renderer Module
 *
 * This module draws the background flock and the game board with its
 * effects. The engines work in surface coordinates (origin top-left, y down);
 * everything is converted to nannou's centred, y-up window space here.
 *
 * Optimized for performance by:
 * - Skipping the scene when nothing is moving and no input arrived
 * - Drawing squares and lines straight from the board's ordered maps
 */

use std::time::Instant;

use nannou::prelude::*;
use tracing::warn;

use crate::app::Model;
use crate::board::Dot;
use crate::camera::surface_to_window;
use crate::effects::{celebration_curve, pulse_strength, ripple_curve, square_ease};
use crate::physics::Flock;
use crate::screens::Screen;
use crate::session::GameSession;
use crate::ui;

const DOT_RADIUS: f32 = 1.6;
const LINE_WIDTH: f32 = 2.0;
const DOT_COLOR: (u8, u8, u8) = (0x33, 0x33, 0x33);
// Owned squares are filled at a quarter of the owner's colour
const SQUARE_FILL_ALPHA: f32 = 0.25;

fn with_alpha(color: Rgb<u8>, alpha: f32) -> Rgba<f32> {
    rgba(
        color.red as f32 / 255.0,
        color.green as f32 / 255.0,
        color.blue as f32 / 255.0,
        alpha.clamp(0.0, 1.0),
    )
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    // Skip the scene if nothing changed; the UI is always drawn
    if model.render_needed {
        let draw = app.draw();
        let window_rect = app.window_rect();
        let now = Instant::now();

        draw.background().color(WHITE);
        draw_flock(&draw, &model.shell.flock, window_rect);

        if let Some(session) = model.shell.session() {
            if matches!(model.shell.screen(), Screen::Game | Screen::Winner(_)) {
                draw_board(&draw, session, window_rect, now, app.time);
            }
        }

        if model.show_debug {
            ui::draw_debug_info(&draw, &model.debug_info, window_rect);
        }

        if let Err(e) = draw.to_frame(app, &frame) {
            warn!("Failed to render frame: {:?}", e);
        }
    }

    if let Err(e) = model.egui.draw_to_frame(&frame) {
        warn!("Failed to render UI: {:?}", e);
    }
}

// Draw every particle as a filled circle, dimmed behind a game
pub fn draw_flock(draw: &Draw, flock: &Flock, window_rect: Rect) {
    let alpha = flock.particle_alpha();
    for boid in flock.boids() {
        draw.ellipse()
            .xy(surface_to_window(boid.position, window_rect))
            .radius(boid.size)
            .color(with_alpha(boid.color, alpha));
    }
}

// Surface point to window point through the board camera
fn project(session: &GameSession, point: Vec2, window_rect: Rect) -> Point2 {
    surface_to_window(session.camera.surface_to_view(point), window_rect)
}

// `time` is the running clock in seconds that drives periodic pulses
pub fn draw_board(draw: &Draw, session: &GameSession, window_rect: Rect, now: Instant, time: f32) {
    let board = session.board();
    let layout = session.layout();
    let colors = session.colors();
    let scale = session.camera.scale();
    let cell = layout.cell_size * scale;

    draw_touch_ripples(draw, session, window_rect, now);

    // Dots
    let (r, g, b) = DOT_COLOR;
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            let position = project(session, layout.dot_position(Dot::new(row, col)), window_rect);
            draw.ellipse().xy(position).radius(DOT_RADIUS * scale).color(rgb(r, g, b));
        }
    }

    // Lines, pulsing while fresh
    for (line, player) in board.lines() {
        let start = project(session, layout.dot_position(line.start()), window_rect);
        let end = project(session, layout.dot_position(line.end()), window_rect);
        let pulse = session
            .effects()
            .pulses
            .find(|pulse| pulse.line == line)
            .map_or(0.0, |effect| pulse_strength(effect.progress(now), time));

        draw.line()
            .start(start)
            .end(end)
            .weight(LINE_WIDTH * scale * (1.0 + pulse))
            .caps_round()
            .color(colors.get(player));
    }

    // Owned squares, easing in while fresh
    for (square, player) in board.squares() {
        let color = colors.get(player);
        let center = project(session, layout.square_center(square), window_rect);
        let (size, alpha) = session
            .effects()
            .squares
            .find(|ease| ease.square == square)
            .map_or((1.0, 1.0), |effect| square_ease(effect.progress(now)));

        draw.rect()
            .xy(center)
            .w_h(cell * size, cell * size)
            .color(with_alpha(color, SQUARE_FILL_ALPHA * alpha));
        draw_square_label(draw, center, cell, player.number(), color);
    }

    // Burst particles on top
    for effect in session.effects().bursts.iter() {
        let particle = &effect.payload;
        let life = 1.0 - effect.progress(now);
        draw.ellipse()
            .xy(project(session, particle.position, window_rect))
            .radius(particle.size * scale)
            .color(with_alpha(colors.get(particle.player), life));
    }

    for effect in session.effects().celebrations.iter() {
        let (size, alpha, y_offset) = celebration_curve(effect.progress(now));
        let center = effect.payload.center + vec2(0.0, y_offset);
        let color = colors.get(effect.payload.player);
        draw.ellipse()
            .xy(project(session, center, window_rect))
            .radius(cell * 0.25 * size)
            .no_fill()
            .stroke(with_alpha(color, alpha))
            .stroke_weight(2.0 * scale);
    }

    if let Some(dot) = session.hover_dot() {
        let position = project(session, layout.dot_position(dot), window_rect);
        draw.ellipse()
            .xy(position)
            .radius((DOT_RADIUS + 4.0) * scale)
            .no_fill()
            .stroke(rgba(0.2, 0.2, 0.2, 0.4))
            .stroke_weight(1.0);
    }

    if let Some(anchor) = session.selection().anchor() {
        draw_anchor(draw, session, anchor, window_rect, time);
    }
}

fn draw_square_label(draw: &Draw, center: Point2, cell: f32, number: u8, color: Rgb<u8>) {
    let font_size = (cell * 0.4).max(8.0) as u32;
    draw.text(&number.to_string())
        .xy(center)
        .font_size(font_size)
        .color(color);
}

fn draw_touch_ripples(draw: &Draw, session: &GameSession, window_rect: Rect, now: Instant) {
    for effect in session.effects().ripples.iter() {
        let (radius, alpha) = ripple_curve(effect.progress(now));
        let position = project(session, effect.payload.position, window_rect);
        draw.ellipse()
            .xy(position)
            .radius(radius)
            .no_fill()
            .stroke(rgba(0.5, 0.5, 0.5, alpha * 0.6))
            .stroke_weight(1.5);
        draw.ellipse().xy(position).radius(4.0).color(rgba(0.5, 0.5, 0.5, alpha * 0.8));
    }
}

// Pulsing ring, solid ring and enlarged dot in the current player's colour
fn draw_anchor(draw: &Draw, session: &GameSession, anchor: Dot, window_rect: Rect, time: f32) {
    let scale = session.camera.scale();
    let color = session.colors().get(session.board().current_player());
    let position = project(session, session.layout().dot_position(anchor), window_rect);
    let pulse = 1.0 + (time * 5.0).sin() * 0.2;

    draw.ellipse()
        .xy(position)
        .radius((DOT_RADIUS + 8.0) * pulse * scale)
        .no_fill()
        .stroke(color)
        .stroke_weight(3.0);
    draw.ellipse()
        .xy(position)
        .radius((DOT_RADIUS + 5.0) * scale)
        .no_fill()
        .stroke(color)
        .stroke_weight(2.0);
    draw.ellipse().xy(position).radius(DOT_RADIUS * 2.0 * scale).color(color);
}

