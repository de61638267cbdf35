/*
 * Effects Module
 *
 * Cosmetic, time-driven animation state for the board. None of it affects
 * the game rules.
 *
 * Every effect is an entry in a TimedEffects collection: a payload with a
 * start time and a duration, dropped once `now - start >= duration`.
 * Burst particles additionally integrate velocity and gravity once per
 * physics step.
 */

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use nannou::prelude::*;
use rand::Rng;

use crate::board::{LineKey, Placement, Player, SquareKey};
use crate::config::EffectsConfig;
use crate::layout::Layout;

// Downward acceleration applied to burst particles every step
pub const BURST_GRAVITY: f32 = 0.15;

// Steps per second the burst decay rates are expressed against
const STEPS_PER_SECOND: f32 = 60.0;

#[derive(Clone, Debug)]
pub struct TimedEffect<T> {
    pub started: Instant,
    pub duration: Duration,
    pub payload: T,
}

impl<T> TimedEffect<T> {
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.age(now) < self.duration
    }

    // Fraction of the lifetime elapsed, in [0, 1]
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.age(now).as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

/// A collection of expiring effects sharing one lifetime rule.
#[derive(Clone, Debug)]
pub struct TimedEffects<T> {
    entries: Vec<TimedEffect<T>>,
}

impl<T> Default for TimedEffects<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> TimedEffects<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, now: Instant, duration: Duration, payload: T) {
        self.entries.push(TimedEffect { started: now, duration, payload });
    }

    pub fn retain_active(&mut self, now: Instant) {
        self.entries.retain(|effect| effect.is_active(now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedEffect<T>> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TimedEffect<T>> {
        self.entries.iter_mut()
    }

    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&TimedEffect<T>> {
        self.entries.iter().find(|effect| predicate(&effect.payload))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// A freshly drawn line, highlighted for a short while
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePulse {
    pub line: LineKey,
    pub player: Player,
}

// Scale and fade-in of a newly owned square
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SquareEase {
    pub square: SquareKey,
    pub player: Player,
}

// Pop that rises above a completed square
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Celebration {
    pub center: Vec2,
    pub player: Player,
}

// Contact ring under a finger
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchRipple {
    pub position: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstParticle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub player: Player,
    pub size: f32,
}

impl BurstParticle {
    pub fn step(&mut self) {
        self.position += self.velocity;
        self.velocity.y += BURST_GRAVITY;
    }
}

// Scale and alpha of a square easing in: cubic ease-out from 0.3 to 1
pub fn square_ease(progress: f32) -> (f32, f32) {
    let eased = 1.0 - (1.0 - progress).powi(3);
    (0.3 + eased * 0.7, (progress * 2.0).min(1.0))
}

// Scale, alpha and upward offset of a celebration pop
pub fn celebration_curve(progress: f32) -> (f32, f32, f32) {
    let grow = if progress < 0.5 { progress * 2.0 } else { 1.0 };
    let alpha = if progress < 0.5 { 1.0 } else { 1.0 - (progress - 0.5) * 2.0 };
    (0.5 + grow * 1.5, alpha, progress * -20.0)
}

// Radius and alpha of a touch ripple
pub fn ripple_curve(progress: f32) -> (f32, f32) {
    (10.0 + progress * 15.0, 1.0 - progress)
}

// Extra stroke weight of a pulsing line, fading to nothing
pub fn pulse_strength(progress: f32, now_secs: f32) -> f32 {
    let wave = 0.5 + 0.5 * (now_secs * 10.0).sin();
    (1.0 - progress) * wave
}

/// All cosmetic effects of one game.
#[derive(Clone, Debug)]
pub struct BoardEffects {
    pub pulses: TimedEffects<LinePulse>,
    pub squares: TimedEffects<SquareEase>,
    pub celebrations: TimedEffects<Celebration>,
    pub ripples: TimedEffects<TouchRipple>,
    pub bursts: TimedEffects<BurstParticle>,
    config: EffectsConfig,
}

impl BoardEffects {
    pub fn new(config: EffectsConfig) -> Self {
        Self {
            pulses: TimedEffects::new(),
            squares: TimedEffects::new(),
            celebrations: TimedEffects::new(),
            ripples: TimedEffects::new(),
            bursts: TimedEffects::new(),
            config,
        }
    }

    // Animation hook for a committed line
    pub fn on_placement<R: Rng>(&mut self, now: Instant, placement: &Placement, layout: &Layout, rng: &mut R) {
        self.pulses.push(
            now,
            Duration::from_millis(self.config.line_pulse_ms),
            LinePulse { line: placement.line, player: placement.player },
        );

        for &square in &placement.completed {
            let center = layout.square_center(square);
            self.squares.push(
                now,
                Duration::from_millis(self.config.square_ease_ms),
                SquareEase { square, player: placement.player },
            );
            self.celebrations.push(
                now,
                Duration::from_millis(self.config.celebration_ms),
                Celebration { center, player: placement.player },
            );
            self.spawn_burst(now, center, placement.player, rng);
        }
    }

    // Evenly spaced outward burst with randomised speed, size and decay
    fn spawn_burst<R: Rng>(&mut self, now: Instant, center: Vec2, player: Player, rng: &mut R) {
        let count = self.config.burst_particles.max(1);
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            let speed = rng.gen_range(1.0..3.0);
            let size = rng.gen_range(1.5..3.5);
            let decay: f32 = rng.gen_range(0.015..0.025);

            // Life drains by `decay` per step, so it lasts 1/decay steps
            let lifetime = Duration::from_secs_f32(1.0 / decay / STEPS_PER_SECOND);

            self.bursts.push(
                now,
                lifetime,
                BurstParticle {
                    position: center,
                    velocity: vec2(angle.cos(), angle.sin()) * speed,
                    player,
                    size,
                },
            );
        }
    }

    pub fn add_ripple(&mut self, now: Instant, position: Vec2) {
        self.ripples.push(
            now,
            Duration::from_millis(self.config.touch_ripple_ms),
            TouchRipple { position },
        );
    }

    // One physics step of burst particle motion
    pub fn step(&mut self) {
        for effect in self.bursts.iter_mut() {
            effect.payload.step();
        }
    }

    pub fn retain_active(&mut self, now: Instant) {
        self.pulses.retain_active(now);
        self.squares.retain_active(now);
        self.celebrations.retain_active(now);
        self.ripples.retain_active(now);
        self.bursts.retain_active(now);
    }

    pub fn is_idle(&self) -> bool {
        self.pulses.is_empty()
            && self.squares.is_empty()
            && self.celebrations.is_empty()
            && self.ripples.is_empty()
            && self.bursts.is_empty()
    }
}
