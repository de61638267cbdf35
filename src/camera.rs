/*
 * Camera Module
 *
 * This module defines the BoardCamera struct that handles zooming and panning
 * of the game board. It provides coordinate transformations between the
 * board surface (origin top-left, y down) and the view the player sees.
 *
 * Two zooms are combined:
 * - a manual zoom and pan, set by the wheel, a pinch and by dragging
 * - a selection zoom that eases towards the anchored dot and back
 */

use nannou::prelude::*;

// Zoom reached while a dot is anchored
pub const SELECTION_ZOOM: f32 = 1.5;
// Fraction of the remaining distance covered per frame
pub const ZOOM_EASING: f32 = 0.1;

pub const MIN_ZOOM_LEVEL: f32 = 1.0;
pub const MAX_ZOOM_LEVEL: f32 = 3.0;

#[derive(Clone, Debug, PartialEq)]
pub struct BoardCamera {
    // Current selection zoom
    pub zoom: f32,
    // Whether an anchored dot should pull the zoom towards SELECTION_ZOOM
    pub zooming: bool,
    // Surface point the selection zoom is centred on
    pub focus: Vec2,
    pub zoom_level: f32,
    pub pan: Vec2,
    // Centre of the surface, pivot of the manual zoom
    pub center: Vec2,
    last_cursor_pos: Option<Vec2>,
}

impl BoardCamera {
    pub fn new(surface: Vec2) -> Self {
        Self {
            zoom: 1.0,
            zooming: false,
            focus: surface / 2.0,
            zoom_level: 1.0,
            pan: Vec2::ZERO,
            center: surface / 2.0,
            last_cursor_pos: None,
        }
    }

    pub fn resize(&mut self, surface: Vec2) {
        self.center = surface / 2.0;
    }

    // Start zooming towards a freshly anchored dot
    pub fn focus_on(&mut self, point: Vec2) {
        self.focus = point;
        self.zooming = true;
    }

    // Turn passed: ease back out and stay out until the next anchor
    pub fn stop_zooming(&mut self) {
        self.zooming = false;
    }

    fn target_zoom(&self, anchored: bool) -> f32 {
        if self.zooming && anchored {
            SELECTION_ZOOM
        } else {
            1.0
        }
    }

    // One frame of zoom easing
    pub fn update(&mut self, anchored: bool) {
        let target = self.target_zoom(anchored);
        self.zoom += (target - self.zoom) * ZOOM_EASING;
    }

    pub fn is_zoomed(&self) -> bool {
        (self.zoom - 1.0).abs() > 0.01
    }

    pub fn set_zoom_level(&mut self, level: f32) {
        self.zoom_level = level.clamp(MIN_ZOOM_LEVEL, MAX_ZOOM_LEVEL);
    }

    // Handle mouse wheel input
    pub fn zoom_by(&mut self, scroll_delta: f32) {
        self.set_zoom_level(self.zoom_level * (1.0 + scroll_delta * 0.1));
    }

    pub fn start_drag(&mut self, position: Vec2) {
        self.last_cursor_pos = Some(position);
    }

    // Pan by the cursor movement since the last drag event
    pub fn drag(&mut self, position: Vec2) {
        if let Some(last) = self.last_cursor_pos {
            self.pan += position - last;
            self.last_cursor_pos = Some(position);
        }
    }

    pub fn end_drag(&mut self) {
        self.last_cursor_pos = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.last_cursor_pos.is_some()
    }

    // Back to an untransformed view
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.zooming = false;
        self.zoom_level = 1.0;
        self.pan = Vec2::ZERO;
        self.last_cursor_pos = None;
    }

    fn manual(&self, point: Vec2) -> Vec2 {
        self.center + (point - self.center) * self.zoom_level + self.pan
    }

    fn manual_inverse(&self, point: Vec2) -> Vec2 {
        self.center + (point - self.center - self.pan) / self.zoom_level
    }

    // Total scale applied to board geometry
    pub fn scale(&self) -> f32 {
        self.zoom * self.zoom_level
    }

    // Convert a point from surface space to view space
    pub fn surface_to_view(&self, point: Vec2) -> Vec2 {
        let focus = self.manual(self.focus);
        focus + (self.manual(point) - focus) * self.zoom
    }

    // Convert a point from view space to surface space
    pub fn view_to_surface(&self, point: Vec2) -> Vec2 {
        let focus = self.manual(self.focus);
        self.manual_inverse(focus + (point - focus) / self.zoom)
    }
}

// nannou windows are centred with y up; the surface is top-left with y down
pub fn window_to_surface(point: Point2, window_rect: Rect) -> Vec2 {
    vec2(point.x - window_rect.left(), window_rect.top() - point.y)
}

pub fn surface_to_window(point: Vec2, window_rect: Rect) -> Point2 {
    pt2(window_rect.left() + point.x, window_rect.top() - point.y)
}
