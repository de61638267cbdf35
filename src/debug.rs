/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * to be displayed in the debug overlay.
 *
 * Includes metrics for:
 * - FPS (frames per second)
 * - Frame time
 * - Number of flock particles
 * - Fixed physics steps run in the last frame
 */

use std::time::Duration;

#[derive(Clone, Debug, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub particle_count: usize,
    pub physics_steps_per_frame: usize,
    // Whether the last frame redrew the scene
    pub rendered: bool,
}

impl DebugInfo {
    pub fn frame_time_ms(&self) -> f64 {
        self.frame_time.as_secs_f64() * 1000.0
    }

    pub fn lines(&self) -> [String; 4] {
        [
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time_ms()),
            format!("Particles: {}", self.particle_count),
            format!("Physics steps: {}", self.physics_steps_per_frame),
        ]
    }
}
