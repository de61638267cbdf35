/*
 * Layout Module
 *
 * This module maps the dot lattice onto the drawing surface.
 * It derives the grid dimensions from the requested size and the available
 * area, picks a cell size, and answers "which dot is under this point".
 *
 * All coordinates are logical units with the origin at the top-left of the
 * surface and y growing downwards. Device pixel scaling belongs to the renderer.
 */

use nannou::prelude::*;

use crate::board::{Dot, SquareKey};

// Cell size bounds in logical units
pub const MIN_CELL_SIZE: f32 = 8.0;
pub const MAX_CELL_SIZE: f32 = 40.0;

// Space between the outer dots and the edge of the board canvas
pub const BOARD_PADDING: f32 = 20.0;

// Aspect ratio above which a single dot count is stretched into a landscape grid
const LANDSCAPE_ASPECT: f32 = 1.5;

/// Requested grid size, either a single dot count or explicit dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridSize {
    Dots(usize),
    Explicit { rows: usize, cols: usize },
}

impl GridSize {
    // Resolve to (rows, cols) for an available area of `width` x `height`
    pub fn dimensions(&self, width: f32, height: f32) -> (usize, usize) {
        let (rows, cols) = match *self {
            GridSize::Explicit { rows, cols } => (rows, cols),
            GridSize::Dots(n) => {
                let n = n.max(2);
                let aspect = width / height.max(1.0);

                if aspect > LANDSCAPE_ASPECT {
                    // Keep roughly the same number of squares, spread across the width
                    let total_squares = ((n - 1) * (n - 1)) as f32;
                    let cols = (total_squares * aspect).sqrt().ceil() as usize;
                    let cols = cols.max(2);
                    let rows = (total_squares / (cols - 1) as f32).ceil() as usize + 1;

                    // ceil(1.2n) and ceil(0.6n) in exact integer arithmetic
                    let cols = cols.max((n * 6 + 4) / 5);
                    let rows = rows.max((n * 3 + 4) / 5);
                    (rows, cols)
                } else {
                    (n, n)
                }
            }
        };
        (rows.max(2), cols.max(2))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub rows: usize,
    pub cols: usize,
    pub cell_size: f32,
    // Surface position of dot (0, 0)
    pub origin: Vec2,
    pub capture_radius_factor: f32,
}

impl Layout {
    /// Lays out `grid` centred on a surface of size `surface`, leaving
    /// `margin` units of slack as the available area.
    pub fn new(grid: GridSize, surface: Vec2, margin: f32, capture_radius_factor: f32) -> Self {
        let max_width = (surface.x - margin).max(1.0);
        let max_height = (surface.y - margin).max(1.0);

        let (rows, cols) = grid.dimensions(max_width, max_height);

        let cell_width = (max_width / (cols - 1) as f32).floor();
        let cell_height = (max_height / (rows - 1) as f32).floor();
        let cell_size = cell_width.min(cell_height).clamp(MIN_CELL_SIZE, MAX_CELL_SIZE);

        let mut layout = Self {
            rows,
            cols,
            cell_size,
            origin: Vec2::ZERO,
            capture_radius_factor,
        };
        layout.center_in(surface);
        layout
    }

    // Size of the board canvas including padding
    pub fn board_size(&self) -> Vec2 {
        vec2(
            (self.cols - 1) as f32 * self.cell_size + BOARD_PADDING * 2.0,
            (self.rows - 1) as f32 * self.cell_size + BOARD_PADDING * 2.0,
        )
    }

    // Re-centre after the surface is resized; the lattice itself never changes
    pub fn center_in(&mut self, surface: Vec2) {
        let board = self.board_size();
        self.origin = vec2(
            (surface.x - board.x) / 2.0 + BOARD_PADDING,
            (surface.y - board.y) / 2.0 + BOARD_PADDING,
        );
    }

    pub fn dot_position(&self, dot: Dot) -> Vec2 {
        self.origin + vec2(dot.col as f32, dot.row as f32) * self.cell_size
    }

    pub fn square_center(&self, square: SquareKey) -> Vec2 {
        self.origin + vec2(square.col as f32 + 0.5, square.row as f32 + 0.5) * self.cell_size
    }

    pub fn capture_radius(&self) -> f32 {
        self.cell_size * self.capture_radius_factor
    }

    /// The lattice point nearest to `point`, if the point lies inside the
    /// grid and within the capture radius of that dot.
    pub fn nearest_dot(&self, point: Vec2) -> Option<Dot> {
        let local = (point - self.origin) / self.cell_size;
        let col = local.x.round();
        let row = local.y.round();

        if row < 0.0 || col < 0.0 || row >= self.rows as f32 || col >= self.cols as f32 {
            return None;
        }

        let dot = Dot::new(row as usize, col as usize);
        let radius = self.capture_radius();
        if point.distance_squared(self.dot_position(dot)) <= radius * radius {
            Some(dot)
        } else {
            None
        }
    }
}
