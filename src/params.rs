/*
 * Flock Parameters Module
 *
 * This module defines the FlockParams struct that contains the tunable
 * parameters of the background flock. They come from the config file and
 * can be adjusted live from the debug panel, which is why the struct also
 * carries a snapshot for change detection.
 */

use serde::{Deserialize, Serialize};

// Parameters for the flock that can be adjusted via config or UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockParams {
    pub num_particles: usize,
    // Side of a spatial grid bucket, should be >= neighborhood_radius
    pub grid_cell_size: f32,
    pub neighborhood_radius: f32,
    pub max_speed: f32,
    pub max_force: f32,
    // Neighbors closer than this push the particle away
    pub separation_distance: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub alignment_scale: f32,
    pub cohesion_scale: f32,
    pub min_size: f32,
    pub max_size: f32,
    // Particle opacity on the in-game background
    pub dimmed_alpha: f32,
    pub palette: Vec<String>,

    // Internal state for tracking changes
    #[serde(skip)]
    previous_values: Option<ParamSnapshot>,
}

// A snapshot of parameter values used for change detection
#[derive(Debug, Clone, PartialEq)]
struct ParamSnapshot {
    num_particles: usize,
    neighborhood_radius: f32,
    max_speed: f32,
    max_force: f32,
    separation_weight: f32,
    alignment_weight: f32,
    cohesion_weight: f32,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            num_particles: 150,
            grid_cell_size: 100.0,
            neighborhood_radius: 100.0,
            max_speed: 2.0,
            max_force: 0.05,
            separation_distance: 25.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            alignment_scale: 0.1,
            cohesion_scale: 0.01,
            min_size: 3.0,
            max_size: 7.0,
            dimmed_alpha: 0.3,
            palette: [
                "#FF0000", "#FF4500", "#FF6B00", "#FF8C00", "#FFA500",
                "#FFD700", "#FFFF00", "#00FF00", "#00FF7F", "#00FFFF",
                "#0080FF", "#0000FF", "#4B0082", "#8B00FF", "#FF00FF",
                "#FF1493", "#FF69B4", "#00CED1", "#20B2AA", "#3CB371",
                "#9370DB", "#BA55D3", "#FF6347", "#FF4500", "#DC143C",
            ]
            .iter()
            .map(|color| color.to_string())
            .collect(),
            previous_values: None,
        }
    }
}

/// What changed since the last snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParamChanges {
    pub num_particles_changed: bool,
    pub any_changed: bool,
}

impl FlockParams {
    // Bucket side actually used: never smaller than the neighborhood radius,
    // otherwise a 3x3 bucket scan could miss a true neighbor
    pub fn effective_cell_size(&self) -> f32 {
        self.grid_cell_size.max(self.neighborhood_radius).max(1.0)
    }

    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&mut self) {
        self.previous_values = Some(self.snapshot());
    }

    fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            num_particles: self.num_particles,
            neighborhood_radius: self.neighborhood_radius,
            max_speed: self.max_speed,
            max_force: self.max_force,
            separation_weight: self.separation_weight,
            alignment_weight: self.alignment_weight,
            cohesion_weight: self.cohesion_weight,
        }
    }

    // Check if any parameters have changed since the last snapshot
    pub fn detect_changes(&self) -> ParamChanges {
        // Without a previous snapshot nothing has changed
        let Some(prev) = &self.previous_values else {
            return ParamChanges::default();
        };

        let current = self.snapshot();
        ParamChanges {
            num_particles_changed: current.num_particles != prev.num_particles,
            any_changed: current != *prev,
        }
    }

    // Get parameter ranges for UI sliders
    pub fn num_particles_range() -> std::ops::RangeInclusive<usize> {
        0..=2000
    }

    pub fn max_speed_range() -> std::ops::RangeInclusive<f32> {
        0.5..=10.0
    }

    pub fn weight_range() -> std::ops::RangeInclusive<f32> {
        0.0..=3.0
    }

    pub fn radius_range() -> std::ops::RangeInclusive<f32> {
        10.0..=200.0
    }
}
