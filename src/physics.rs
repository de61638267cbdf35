/*
 * Physics Module
 *
 * This module runs the background flock: a fixed population of boids that
 * is stepped once per physics tick and never grows or shrinks on its own.
 *
 * Optimized for performance by:
 * - Using spatial partitioning for efficient neighbor lookups
 * - Using squared distances in the neighbor filter
 * - Combining the three rules into one force per boid
 * - Reusing the neighbor buffer across boids
 *
 * Every boid in a step sees the same snapshot of positions and velocities,
 * so the result does not depend on iteration order.
 */

use nannou::prelude::*;
use rand::Rng;
use tracing::debug;

use crate::boid::Boid;
use crate::params::FlockParams;
use crate::spatial_grid::SpatialGrid;

/// Where the flock is being shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    Welcome,
    // Behind the board, drawn dimmed
    GameBackground,
}

pub struct Flock {
    boids: Vec<Boid>,
    params: FlockParams,
    spatial_grid: SpatialGrid,
    bounds: Vec2,
    surface: Surface,
    running: bool,
    // Scratch buffers reused every step
    positions: Vec<Point2>,
    velocities: Vec<Vec2>,
    nearby: Vec<usize>,
}

impl Flock {
    // Create a randomly seeded flock covering `bounds`
    pub fn new<R: Rng>(params: FlockParams, bounds: Vec2, rng: &mut R) -> Self {
        let boids = (0..params.num_particles)
            .map(|_| Boid::random(rng, bounds, &params))
            .collect();
        Self::with_boids(params, bounds, boids)
    }

    pub fn with_boids(params: FlockParams, bounds: Vec2, boids: Vec<Boid>) -> Self {
        let spatial_grid = SpatialGrid::new(params.effective_cell_size(), bounds);
        Self {
            boids,
            params,
            spatial_grid,
            bounds,
            surface: Surface::Welcome,
            running: true,
            positions: Vec::new(),
            velocities: Vec::new(),
            nearby: Vec::with_capacity(64),
        }
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn params(&self) -> &FlockParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut FlockParams {
        &mut self.params
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn is_dimmed(&self) -> bool {
        self.surface == Surface::GameBackground
    }

    // Opacity the renderer should use for particles
    pub fn particle_alpha(&self) -> f32 {
        if self.is_dimmed() {
            self.params.dimmed_alpha
        } else {
            1.0
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    // Adopt a new surface size; boids outside it wrap back in
    pub fn resize(&mut self, bounds: Vec2) {
        self.bounds = bounds;
        self.spatial_grid = SpatialGrid::new(self.params.effective_cell_size(), bounds);
        for boid in &mut self.boids {
            boid.wrap_edges(bounds);
        }
    }

    // Switch between the welcome surface and the dimmed in-game background
    pub fn move_to(&mut self, surface: Surface, bounds: Vec2) {
        debug!("Flock moving to {:?} ({:.0}x{:.0})", surface, bounds.x, bounds.y);
        self.surface = surface;
        self.resize(bounds);
        self.start();
    }

    // Replace the population, e.g. after the particle count changed
    pub fn reseed<R: Rng>(&mut self, rng: &mut R) {
        let bounds = self.bounds;
        let params = &self.params;
        self.boids = (0..params.num_particles)
            .map(|_| Boid::random(rng, bounds, params))
            .collect();
    }

    // Push edited limits into the existing boids and resize the grid buckets
    pub fn apply_params(&mut self) {
        for boid in &mut self.boids {
            boid.neighborhood_radius = self.params.neighborhood_radius;
            boid.max_speed = self.params.max_speed;
            boid.max_force = self.params.max_force;
        }
        let cell_size = self.params.effective_cell_size();
        if (cell_size - self.spatial_grid.cell_size).abs() > f32::EPSILON {
            self.spatial_grid = SpatialGrid::new(cell_size, self.bounds);
        }
    }

    /// Advance every boid by one step. Does nothing while stopped.
    pub fn update(&mut self) {
        if !self.running {
            return;
        }

        // Snapshot positions and velocities, then bucket the positions
        self.positions.clear();
        self.positions.extend(self.boids.iter().map(|boid| boid.position));
        self.velocities.clear();
        self.velocities.extend(self.boids.iter().map(|boid| boid.velocity));
        self.spatial_grid.rebuild(&self.positions);

        for i in 0..self.boids.len() {
            self.spatial_grid.nearby(self.positions[i], &mut self.nearby);

            let boid = &mut self.boids[i];
            let steering = flocking_force(i, boid, &self.positions, &self.velocities, &self.nearby, &self.params);

            boid.apply_force(steering);
            boid.limit_speed();
            boid.update();
            boid.wrap_edges(self.bounds);
        }
    }
}

/// Combined separation, alignment and cohesion for boid `index`.
///
/// `nearby` holds candidate indices from the spatial grid; only those within
/// the boid's neighborhood radius count.
pub fn flocking_force(
    index: usize,
    boid: &Boid,
    positions: &[Point2],
    velocities: &[Vec2],
    nearby: &[usize],
    params: &FlockParams,
) -> Vec2 {
    let position = positions[index];
    let radius_sq = boid.neighborhood_radius * boid.neighborhood_radius;
    let separation_sq = params.separation_distance * params.separation_distance;

    let mut separation = Vec2::ZERO;
    let mut alignment = Vec2::ZERO;
    let mut cohesion = Vec2::ZERO;
    let mut count = 0;

    for &other in nearby {
        if other == index {
            continue;
        }

        let offset = positions[other] - position;
        let d_squared = offset.length_squared();
        if d_squared <= 0.0 || d_squared >= radius_sq {
            continue;
        }
        count += 1;

        // Separation: unit vector away from close neighbors
        if d_squared < separation_sq {
            separation -= offset / d_squared.sqrt();
        }

        alignment += velocities[other];
        cohesion += positions[other];
    }

    if count > 0 {
        alignment /= count as f32;
        cohesion = cohesion / count as f32 - position;
    }

    let force = boid.max_force;
    separation * (params.separation_weight * force)
        + alignment * (params.alignment_weight * force * params.alignment_scale)
        + cohesion * (params.cohesion_weight * force * params.cohesion_scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn separation_only() -> FlockParams {
        let mut params = FlockParams::default();
        params.alignment_weight = 0.0;
        params.cohesion_weight = 0.0;
        params
    }

    #[test]
    fn test_separation_pushes_close_pair_apart() {
        let params = separation_only();
        let boids = vec![
            Boid::new(pt2(100.0, 100.0), Vec2::ZERO, &params),
            Boid::new(pt2(110.0, 100.0), Vec2::ZERO, &params),
        ];
        let mut flock = Flock::with_boids(params, vec2(400.0, 400.0), boids);

        let before = flock.boids()[0].position.distance_squared(flock.boids()[1].position);
        flock.update();
        let after = flock.boids()[0].position.distance_squared(flock.boids()[1].position);

        assert!(after > before);
        assert!(flock.boids()[0].velocity.x < 0.0);
        assert!(flock.boids()[1].velocity.x > 0.0);
    }

    #[test]
    fn test_distant_boids_do_not_interact() {
        let params = FlockParams::default();
        let boids = vec![
            Boid::new(pt2(50.0, 50.0), vec2(1.0, 0.0), &params),
            Boid::new(pt2(350.0, 350.0), vec2(0.0, 1.0), &params),
        ];
        let mut flock = Flock::with_boids(params, vec2(400.0, 400.0), boids);
        flock.update();
        assert_eq!(flock.boids()[0].velocity, vec2(1.0, 0.0));
        assert_eq!(flock.boids()[1].velocity, vec2(0.0, 1.0));
    }

    #[test]
    fn test_alignment_and_cohesion_pull_toward_neighbor() {
        let mut params = FlockParams::default();
        params.separation_weight = 0.0;
        let boids = vec![
            Boid::new(pt2(100.0, 100.0), Vec2::ZERO, &params),
            Boid::new(pt2(160.0, 100.0), vec2(0.0, 1.0), &params),
        ];
        let flock = Flock::with_boids(params, vec2(400.0, 400.0), boids);

        let positions: Vec<Point2> = flock.boids().iter().map(|b| b.position).collect();
        let velocities: Vec<Vec2> = flock.boids().iter().map(|b| b.velocity).collect();
        let force = flocking_force(0, &flock.boids()[0], &positions, &velocities, &[0, 1], flock.params());

        // cohesion: 60 * 0.05 * 0.01, alignment: 1 * 0.05 * 0.1
        assert!((force.x - 0.03).abs() < 1e-6);
        assert!((force.y - 0.005).abs() < 1e-6);
    }

    #[test]
    fn test_speed_is_clamped_after_update() {
        let params = FlockParams::default();
        let max_speed = params.max_speed;
        let mut rng = StdRng::seed_from_u64(42);
        let mut flock = Flock::new(params, vec2(800.0, 600.0), &mut rng);

        for _ in 0..20 {
            flock.update();
            for boid in flock.boids() {
                assert!(boid.speed() <= max_speed + 1e-4);
            }
        }
    }

    #[test]
    fn test_stopped_flock_does_not_move() {
        let params = FlockParams::default();
        let boids = vec![Boid::new(pt2(10.0, 10.0), vec2(1.0, 1.0), &params)];
        let mut flock = Flock::with_boids(params, vec2(100.0, 100.0), boids);

        flock.stop();
        flock.update();
        assert_eq!(flock.boids()[0].position, pt2(10.0, 10.0));

        flock.start();
        flock.update();
        assert_eq!(flock.boids()[0].position, pt2(11.0, 11.0));
    }

    #[test]
    fn test_move_to_game_background_dims_and_rewraps() {
        let params = FlockParams::default();
        let dimmed_alpha = params.dimmed_alpha;
        let boids = vec![Boid::new(pt2(700.0, 500.0), Vec2::ZERO, &params)];
        let mut flock = Flock::with_boids(params, vec2(800.0, 600.0), boids);
        assert_eq!(flock.particle_alpha(), 1.0);

        flock.stop();
        flock.move_to(Surface::GameBackground, vec2(400.0, 300.0));
        assert!(flock.is_dimmed());
        assert!(flock.is_running());
        assert_eq!(flock.particle_alpha(), dimmed_alpha);
        assert_eq!(flock.boids()[0].position, pt2(300.0, 200.0));

        flock.move_to(Surface::Welcome, vec2(800.0, 600.0));
        assert!(!flock.is_dimmed());
    }

    #[test]
    fn test_reseed_matches_particle_count() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut flock = Flock::new(FlockParams::default(), vec2(800.0, 600.0), &mut rng);
        assert_eq!(flock.boids().len(), 150);

        flock.params_mut().num_particles = 12;
        flock.reseed(&mut rng);
        assert_eq!(flock.boids().len(), 12);
    }
}
