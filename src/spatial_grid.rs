/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for efficient neighbor lookups.
 * It divides the surface into square buckets, so a neighbor query only looks
 * at the 3x3 block of buckets around a position instead of every particle.
 *
 * The scan is exact as long as the bucket side is at least the query radius.
 */

use nannou::prelude::*;

pub struct SpatialGrid {
    pub cell_size: f32,
    pub cols: usize,
    pub rows: usize,
    cells: Vec<Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32, bounds: Vec2) -> Self {
        let cell_size = cell_size.max(1.0);
        let cols = ((bounds.x / cell_size).ceil() as usize).max(1);
        let rows = ((bounds.y / cell_size).ceil() as usize).max(1);

        Self {
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
        }
    }

    // Bucket coordinates of a position, clamped onto the grid
    #[inline]
    pub fn cell_coords(&self, pos: Point2) -> (usize, usize) {
        let x = (pos.x / self.cell_size).floor().clamp(0.0, (self.cols - 1) as f32) as usize;
        let y = (pos.y / self.cell_size).floor().clamp(0.0, (self.rows - 1) as f32) as usize;
        (x, y)
    }

    // Clear the grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    // Insert a particle index into the grid
    #[inline]
    pub fn insert(&mut self, index: usize, position: Point2) {
        let (x, y) = self.cell_coords(position);
        self.cells[y * self.cols + x].push(index);
    }

    // Clear and refill from the current positions
    pub fn rebuild(&mut self, positions: &[Point2]) {
        self.clear();
        for (i, &position) in positions.iter().enumerate() {
            self.insert(i, position);
        }
    }

    pub fn cell(&self, x: usize, y: usize) -> &[usize] {
        &self.cells[y * self.cols + x]
    }

    // Indices in the bucket containing `position` and the 8 around it
    pub fn nearby(&self, position: Point2, out: &mut Vec<usize>) {
        out.clear();
        let (grid_x, grid_y) = self.cell_coords(position);

        let min_y = grid_y.saturating_sub(1);
        let max_y = (grid_y + 1).min(self.rows - 1);
        let min_x = grid_x.saturating_sub(1);
        let max_x = (grid_x + 1).min(self.cols - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                out.extend_from_slice(self.cell(x, y));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_round_up() {
        let grid = SpatialGrid::new(100.0, vec2(250.0, 100.0));
        assert_eq!((grid.cols, grid.rows), (3, 1));
    }

    #[test]
    fn test_rebuild_assigns_buckets() {
        let mut grid = SpatialGrid::new(100.0, vec2(300.0, 300.0));
        grid.rebuild(&[pt2(10.0, 10.0), pt2(150.0, 20.0), pt2(299.0, 299.0), pt2(300.0, 300.0)]);

        assert_eq!(grid.cell(0, 0), &[0]);
        assert_eq!(grid.cell(1, 0), &[1]);
        // A point exactly on the far edge is clamped into the last bucket
        assert_eq!(grid.cell(2, 2), &[2, 3]);
        assert_eq!(grid.len(), 4);

        grid.rebuild(&[]);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_nearby_scans_three_by_three() {
        let mut grid = SpatialGrid::new(100.0, vec2(500.0, 500.0));
        let positions = [
            pt2(250.0, 250.0), // centre bucket
            pt2(150.0, 150.0), // diagonal neighbor bucket
            pt2(350.0, 250.0), // right neighbor bucket
            pt2(450.0, 250.0), // two buckets away
            pt2(50.0, 50.0),   // two buckets away
        ];
        grid.rebuild(&positions);

        let mut nearby = Vec::new();
        grid.nearby(pt2(250.0, 250.0), &mut nearby);
        nearby.sort_unstable();
        assert_eq!(nearby, vec![0, 1, 2]);
    }

    #[test]
    fn test_nearby_at_corner_stays_in_bounds() {
        let mut grid = SpatialGrid::new(100.0, vec2(200.0, 200.0));
        grid.rebuild(&[pt2(0.0, 0.0), pt2(199.0, 199.0)]);
        let mut nearby = Vec::new();
        grid.nearby(pt2(0.0, 0.0), &mut nearby);
        nearby.sort_unstable();
        assert_eq!(nearby, vec![0, 1]);
    }
}
