//! One simulation tick over a whole scene
//!
//! Pass order is fixed: step every ball, reflect every ball, one pairwise
//! overlap pass, then a settle clamp so the pairwise pass cannot leave a
//! center outside its band.

use glam::Vec3;

use super::scene::Scene;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Table tilt, m/s² (only x and y move the ball)
    pub acceleration: Vec3,
    /// Wall time covered by this tick
    pub elapsed_ms: f32,
}

impl TickInput {
    pub fn new(acceleration: Vec3, elapsed_ms: f32) -> Self {
        Self {
            acceleration,
            elapsed_ms,
        }
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Rail bounces resolved during stepping, all balls and axes
    pub rail_bounces: u32,
    /// Balls that ran out of bounce budget
    pub stalled: u32,
    /// Balls mirrored back by `reflect`
    pub reflected: u32,
    /// Overlapping pairs found by the pairwise pass
    pub overlapping_pairs: u32,
}

/// Advance the scene by one tick
pub fn tick(scene: &mut Scene, input: &TickInput) -> TickReport {
    let mut report = TickReport::default();

    {
        let (table, balls) = scene.split_mut();
        for ball in balls {
            let outcome = ball.step(table, input.acceleration, input.elapsed_ms);
            report.rail_bounces += outcome.total_bounces();
            if outcome.stalled.iter().any(|&s| s) {
                report.stalled += 1;
            }
        }
    }

    {
        let (table, balls) = scene.split_mut();
        for ball in balls {
            if ball.reflect(table) {
                report.reflected += 1;
            }
        }
    }

    report.overlapping_pairs = scene.resolve_overlaps() as u32;

    // Settle
    let (table, balls) = scene.split_mut();
    for ball in balls {
        ball.clamp_to(table);
    }

    report
}
