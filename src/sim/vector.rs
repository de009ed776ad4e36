//! Vector helpers on top of `glam::Vec3`
//!
//! glam covers length, dot and cross products. The table works in the xy
//! plane with z pinned to the ball radius, so the extra accessors here are
//! planar length and spherical angles.

use glam::{Vec2, Vec3};
use std::f32::consts::PI;

use crate::consts::GEOMETRY_EPSILON;

/// The simulation's 3-component vector
pub type Vector3 = Vec3;

/// Planar and spherical accessors for [`Vector3`]
pub trait Spherical {
    /// Length of the xy projection
    fn length2d(&self) -> f32;
    /// Angle in `[0, 2π)` with `x = r·cos(φ)`, `y = r·sin(φ)`, `r = length2d()`
    fn azimuth(&self) -> f32;
    /// Angle in `[0, π]` with `z = |v|·cos(θ)`
    fn polar_angle(&self) -> f32;
    /// Drop the z component
    fn planar(&self) -> Vec2;
}

impl Spherical for Vec3 {
    #[inline]
    fn length2d(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    fn azimuth(&self) -> f32 {
        let r = self.length2d();
        if r <= GEOMETRY_EPSILON {
            return 0.0;
        }
        let c = self.x / r;
        let s = (self.y / r).clamp(-1.0, 1.0);

        // asin only covers [-π/2, π/2]; pick the quadrant from the cosine sign
        let phi = if c >= 0.0 && s >= 0.0 {
            s.asin()
        } else if c < 0.0 {
            PI - s.asin()
        } else {
            2.0 * PI + s.asin()
        };

        // -0.0 and rounding can land exactly on 2π
        if phi >= 2.0 * PI { 0.0 } else { phi }
    }

    fn polar_angle(&self) -> f32 {
        let r = self.length();
        if r <= GEOMETRY_EPSILON {
            return 0.0;
        }
        (self.z / r).clamp(-1.0, 1.0).acos()
    }

    #[inline]
    fn planar(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Lift a planar vector back to 3D at height `z`
#[inline]
pub fn from_planar(v: Vec2, z: f32) -> Vec3 {
    Vec3::new(v.x, v.y, z)
}

/// Unit vector at azimuth `phi` in the xy plane
#[inline]
pub fn planar_direction(phi: f32) -> Vec2 {
    Vec2::new(phi.cos(), phi.sin())
}
