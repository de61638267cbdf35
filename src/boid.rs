/*
 * Boid Module
 *
 * This module defines the Boid struct, one particle of the background flock.
 * Each boid follows three main rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * Positions live on the surface (origin top-left, y down) and wrap around
 * its edges, so the flock moves on a torus.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::config::parse_hex_color;
use crate::params::FlockParams;

#[derive(Clone, Debug, PartialEq)]
pub struct Boid {
    pub position: Point2,
    pub velocity: Vec2,
    pub color: Rgb<u8>,
    pub size: f32,
    pub neighborhood_radius: f32,
    pub max_speed: f32,
    pub max_force: f32,
}

impl Boid {
    pub fn new(position: Point2, velocity: Vec2, params: &FlockParams) -> Self {
        Self {
            position,
            velocity,
            color: rgb(220, 220, 220),
            size: params.min_size,
            neighborhood_radius: params.neighborhood_radius,
            max_speed: params.max_speed,
            max_force: params.max_force,
        }
    }

    // Random position on the surface, random heading, colour and size
    pub fn random<R: Rng>(rng: &mut R, bounds: Vec2, params: &FlockParams) -> Self {
        let position = pt2(rng.gen_range(0.0..bounds.x.max(1.0)), rng.gen_range(0.0..bounds.y.max(1.0)));
        let velocity = vec2(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));

        let mut boid = Self::new(position, velocity, params);

        if !params.palette.is_empty() {
            let pick = &params.palette[rng.gen_range(0..params.palette.len())];
            // The palette is validated when the config loads
            if let Ok(color) = parse_hex_color(pick) {
                boid.color = color;
            }
        }
        if params.max_size > params.min_size {
            boid.size = rng.gen_range(params.min_size..params.max_size);
        }

        boid
    }

    // Apply a steering force directly to the velocity
    pub fn apply_force(&mut self, force: Vec2) {
        self.velocity += force;
    }

    // Rescale the velocity if it exceeds max speed
    pub fn limit_speed(&mut self) {
        let speed_squared = self.velocity.length_squared();
        if speed_squared > self.max_speed * self.max_speed {
            self.velocity *= self.max_speed / speed_squared.sqrt();
        }
    }

    // Move by one step of velocity
    pub fn update(&mut self) {
        self.position += self.velocity;
    }

    // Wrap the boid around the surface edges
    pub fn wrap_edges(&mut self, bounds: Vec2) {
        self.position.x = wrap(self.position.x, bounds.x);
        self.position.y = wrap(self.position.y, bounds.y);
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

// Map a coordinate into [0, extent)
fn wrap(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return value;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to exactly `extent` for tiny negative inputs
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}
