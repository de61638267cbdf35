// Property tests for the background flock

use dots_and_boxes::boid::Boid;
use dots_and_boxes::params::FlockParams;
use dots_and_boxes::physics::Flock;
use nannou::prelude::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn params(count: usize, max_speed: f32) -> FlockParams {
    let mut params = FlockParams::default();
    params.num_particles = count;
    params.max_speed = max_speed;
    params
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn speeds_stay_clamped(seed in any::<u64>(), count in 1usize..120, max_speed in 0.5f32..5.0, steps in 1usize..30) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut flock = Flock::new(params(count, max_speed), vec2(800.0, 600.0), &mut rng);
        for _ in 0..steps {
            flock.update();
        }
        for boid in flock.boids() {
            prop_assert!(boid.speed() <= max_speed + 1e-3);
        }
    }

    #[test]
    fn positions_stay_on_the_surface(seed in any::<u64>(), width in 50f32..1200.0, height in 50f32..900.0, steps in 1usize..40) {
        let mut rng = StdRng::seed_from_u64(seed);
        let bounds = vec2(width, height);
        let mut flock = Flock::new(params(60, 4.0), bounds, &mut rng);
        for _ in 0..steps {
            flock.update();
        }
        for boid in flock.boids() {
            prop_assert!(boid.position.x >= 0.0 && boid.position.x < width);
            prop_assert!(boid.position.y >= 0.0 && boid.position.y < height);
        }
    }

    #[test]
    fn close_pairs_move_apart(gap in 1f32..20.0) {
        let mut flock_params = FlockParams::default();
        flock_params.alignment_weight = 0.0;
        flock_params.cohesion_weight = 0.0;
        let left = Boid::new(pt2(200.0, 200.0), Vec2::ZERO, &flock_params);
        let right = Boid::new(pt2(200.0 + gap, 200.0), Vec2::ZERO, &flock_params);
        let mut flock = Flock::with_boids(flock_params, vec2(400.0, 400.0), vec![left, right]);

        flock.update();
        let boids = flock.boids();
        prop_assert!(boids[0].velocity.x < 0.0);
        prop_assert!(boids[1].velocity.x > 0.0);
        prop_assert!(boids[1].position.x - boids[0].position.x > gap);
    }
}
