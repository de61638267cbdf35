/*
 * Input Module
 *
 * This module handles user input events for the game board.
 * Pointer and touch positions are converted to surface coordinates here and
 * handed to the game session, which maps them through the camera.
 *
 * Features:
 * - Debouncing of duplicate taps and of pointer echoes after a touch
 * - Touch tracking by identifier (start, move, end, cancel)
 * - Board panning with a secondary-button drag
 * - Board zooming with the mouse wheel or a pinch gesture
 */

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use nannou::event::TouchEvent;
use nannou::prelude::*;
use nannou::winit::event::{MouseButton, MouseScrollDelta, TouchPhase};
use tracing::debug;

use crate::app::Model;
use crate::camera::window_to_surface;
use crate::config::InputConfig;

/// Drops synthetic duplicates of a tap and pointer events that echo a touch.
#[derive(Clone, Debug)]
pub struct InputFilter {
    debounce: Duration,
    touch_suppress: Duration,
    last_tap: Option<Instant>,
    last_touch: Option<Instant>,
}

impl InputFilter {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.tap_debounce_ms),
            touch_suppress: Duration::from_millis(config.touch_pointer_suppress_ms),
            last_tap: None,
            last_touch: None,
        }
    }

    fn within(since: Option<Instant>, now: Instant, window: Duration) -> bool {
        since.map_or(false, |t| now.saturating_duration_since(t) < window)
    }

    pub fn accept_touch_release(&mut self, now: Instant) -> bool {
        if Self::within(self.last_tap, now, self.debounce) {
            debug!("Dropped duplicate touch release");
            return false;
        }
        self.last_tap = Some(now);
        self.last_touch = Some(now);
        true
    }

    pub fn accept_pointer_click(&mut self, now: Instant) -> bool {
        if Self::within(self.last_touch, now, self.touch_suppress) {
            debug!("Dropped pointer click following a touch");
            return false;
        }
        if Self::within(self.last_tap, now, self.debounce) {
            debug!("Dropped duplicate pointer click");
            return false;
        }
        self.last_tap = Some(now);
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveTouch {
    pub started: Instant,
    pub position: Vec2,
}

/// Touches currently on the surface, keyed by their platform identifier.
///
/// Two touches at once form a pinch. Every touch that took part in a pinch
/// ends without a tap, until all fingers have been lifted.
#[derive(Clone, Debug, Default)]
pub struct TouchTracker {
    touches: BTreeMap<u64, ActiveTouch>,
    // Finger spread when the current pinch began
    pinch_start: Option<f32>,
    in_gesture: bool,
}

impl TouchTracker {
    pub fn start(&mut self, id: u64, position: Vec2, now: Instant) {
        self.touches.insert(id, ActiveTouch { started: now, position });
        if self.touches.len() >= 2 {
            self.in_gesture = true;
        }
        if self.pinch_start.is_none() {
            self.pinch_start = self.spread().filter(|spread| *spread > 0.0);
        }
    }

    // Distance between the two fingers, if exactly two are down
    pub fn spread(&self) -> Option<f32> {
        let mut positions = self.touches.values().map(|touch| touch.position);
        match (positions.next(), positions.next(), positions.next()) {
            (Some(a), Some(b), None) => Some(a.distance(b)),
            _ => None,
        }
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch_start.is_some()
    }

    // Current spread relative to the spread when the pinch began
    pub fn pinch_scale(&self) -> Option<f32> {
        let start = self.pinch_start?;
        Some(self.spread()? / start)
    }

    fn lifted(&mut self) {
        if self.touches.len() < 2 {
            self.pinch_start = None;
        }
        if self.touches.is_empty() {
            self.in_gesture = false;
        }
    }

    // Track the finger without changing any selection
    pub fn move_to(&mut self, id: u64, position: Vec2) -> bool {
        match self.touches.get_mut(&id) {
            Some(touch) => {
                touch.position = position;
                true
            }
            None => false,
        }
    }

    // Finish a touch at its release position; unknown ids and pinch
    // fingers yield nothing
    pub fn end(&mut self, id: u64, position: Vec2) -> Option<ActiveTouch> {
        let touch = self.touches.remove(&id)?;
        let was_gesture = self.in_gesture;
        self.lifted();
        if was_gesture {
            return None;
        }
        Some(ActiveTouch { position, ..touch })
    }

    pub fn cancel(&mut self, id: u64) -> bool {
        let removed = self.touches.remove(&id).is_some();
        self.lifted();
        removed
    }

    pub fn get(&self, id: u64) -> Option<&ActiveTouch> {
        self.touches.get(&id)
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    pub fn clear(&mut self) {
        self.touches.clear();
        self.lifted();
    }
}

// Mouse moved event handler
pub fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    model.cursor = window_to_surface(pos, app.window_rect());

    if let Some(session) = model.shell.session_mut() {
        if session.camera.is_dragging() {
            session.camera.drag(model.cursor);
            model.render_needed = true;
        }
        if session.update_hover(model.cursor) {
            model.render_needed = true;
        }
    }
}

// Mouse pressed event handler
pub fn mouse_pressed(_app: &App, model: &mut Model, button: MouseButton) {
    // Clicks on the UI never reach the board
    if model.egui.ctx().is_pointer_over_area() {
        return;
    }
    let cursor = model.cursor;
    let Some(session) = model.shell.session_mut() else {
        return;
    };

    match button {
        MouseButton::Left => {
            session.pointer_click(cursor, Instant::now());
        }
        MouseButton::Right => session.camera.start_drag(cursor),
        _ => {}
    }
    model.render_needed = true;
}

// Mouse released event handler
pub fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Right {
        if let Some(session) = model.shell.session_mut() {
            session.camera.end_drag();
        }
    }
}

// Mouse wheel event handler for zooming
pub fn mouse_wheel(_app: &App, model: &mut Model, delta: MouseScrollDelta, _phase: TouchPhase) {
    let Some(session) = model.shell.session_mut() else {
        return;
    };
    match delta {
        MouseScrollDelta::LineDelta(_, y) => session.camera.zoom_by(y),
        MouseScrollDelta::PixelDelta(pos) => session.camera.zoom_by(pos.y as f32 * 0.01),
    }
    model.render_needed = true;
}

// Touch event handler, one event per finger
pub fn touch(app: &App, model: &mut Model, touch: TouchEvent) {
    if model.egui.ctx().is_pointer_over_area() {
        return;
    }
    let position = window_to_surface(touch.position, app.window_rect());
    let now = Instant::now();
    let Some(session) = model.shell.session_mut() else {
        return;
    };

    match touch.phase {
        TouchPhase::Started => session.touch_start(touch.id, position, now),
        TouchPhase::Moved => session.touch_move(touch.id, position),
        TouchPhase::Ended => {
            session.touch_end(touch.id, position, now);
        }
        TouchPhase::Cancelled => session.touch_cancel(touch.id),
    }
    model.render_needed = true;
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);

    if let nannou::winit::event::WindowEvent::MouseInput { .. } = event {
        model.render_needed = true;
    }
}
