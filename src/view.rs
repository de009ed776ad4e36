//! Plain-data structs handed to the renderer
//!
//! The presentation layer draws each ball as a disc plus a small marker at
//! the tip of the ball's north vector. Nothing else of the simulation is
//! exposed to it.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque ARGB colour / identity tag of a ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BallColor(pub u32);

impl BallColor {
    /// Normalized `[r, g, b, a]`
    pub fn to_rgba(self) -> [f32; 4] {
        let channel = |shift: u32| ((self.0 >> shift) & 0xFF) as f32 / 255.0;
        [channel(16), channel(8), channel(0), channel(24)]
    }
}

/// Per-ball render instance
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BallView {
    pub center: [f32; 2],
    /// Orientation marker position (center + radius · north, projected)
    pub marker: [f32; 2],
    pub color: [f32; 4],
    pub radius: f32,
}

impl BallView {
    pub fn new(center: Vec2, marker: Vec2, radius: f32, color: BallColor) -> Self {
        Self {
            center: center.to_array(),
            marker: marker.to_array(),
            color: color.to_rgba(),
            radius,
        }
    }
}

/// Colors for scene elements
pub mod colors {
    use super::BallColor;

    pub const IVORY: BallColor = BallColor(0xFFFF_FFF0);
    pub const RED: BallColor = BallColor(0xFFFF_0000);
    pub const BLUE: BallColor = BallColor(0xFF1E_40C8);
    pub const YELLOW: BallColor = BallColor(0xFFFF_D700);
    /// Table felt
    pub const FELT: BallColor = BallColor(0xFF2E_7D32);

    /// Cycled through when a scene spawns several balls
    pub const PALETTE: [BallColor; 4] = [IVORY, RED, BLUE, YELLOW];
}
