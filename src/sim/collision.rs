//! Ball-ball collisions
//!
//! Stateless functions over two balls. Contact is planar: centers share the
//! same z, so only the xy line of centers matters.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::vector::{Spherical, from_planar};
use crate::consts::GEOMETRY_EPSILON;

/// How velocities are exchanged along the line of centers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionModel {
    /// Swap the along-line components of every overlapping pair.
    /// Exact only for equal masses.
    #[default]
    EqualMass,
    /// Swap like `EqualMass`, but leave pairs already moving apart alone
    EqualMassApproaching,
    /// 1D elastic collision weighted by mass
    MassWeighted,
}

/// Whether the two discs overlap (touching does not count)
pub fn overlaps(a: &Ball, b: &Ball) -> bool {
    let d = b.center().planar() - a.center().planar();
    let reach = a.radius() + b.radius();
    d.length_squared() < reach * reach
}

/// Unit vector from `a` to `b` and the center distance.
/// `None` when the centers (nearly) coincide.
fn line_of_centers(a: &Ball, b: &Ball) -> Option<(Vec2, f32)> {
    let d = b.center().planar() - a.center().planar();
    let dist = d.length();
    if dist <= GEOMETRY_EPSILON {
        return None;
    }
    Some((d / dist, dist))
}

/// Push two overlapping balls apart along the line of centers, half the
/// penetration each, so they end exactly tangent.
///
/// Returns `false` (and moves nothing) when the centers coincide.
pub fn undo_overlap(a: &mut Ball, b: &mut Ball) -> bool {
    let Some((n, dist)) = line_of_centers(a, b) else {
        log::debug!("Coincident ball centers, skipping overlap correction");
        return false;
    };
    let depth = a.radius() + b.radius() - dist;
    let half = from_planar(n * (depth * 0.5), 0.0);
    a.shift_center(-half);
    b.shift_center(half);
    true
}

/// Exchange velocity along the line of centers; perpendicular components are
/// untouched.
///
/// Returns `false` when the centers coincide, or under
/// `EqualMassApproaching` when the balls are already moving apart.
pub fn resolve_collision(a: &mut Ball, b: &mut Ball, model: CollisionModel) -> bool {
    let Some((n, _)) = line_of_centers(a, b) else {
        return false;
    };
    let va = a.velocity().planar();
    let vb = b.velocity().planar();
    let ua = va.dot(n);
    let ub = vb.dot(n);

    let (ua_after, ub_after) = match model {
        CollisionModel::EqualMass => (ub, ua),
        CollisionModel::EqualMassApproaching => {
            // b moves away from a along n
            if ub - ua >= 0.0 {
                return false;
            }
            (ub, ua)
        }
        CollisionModel::MassWeighted => {
            let (ma, mb) = (a.mass(), b.mass());
            let total = ma + mb;
            (
                ((ma - mb) * ua + 2.0 * mb * ub) / total,
                (2.0 * ma * ua + (mb - ma) * ub) / total,
            )
        }
    };

    a.set_velocity(va + n * (ua_after - ua));
    b.set_velocity(vb + n * (ub_after - ub));
    true
}

/// Separate and collide `a` and `b` if they overlap. Returns whether they did.
pub fn collide_if_overlapping(a: &mut Ball, b: &mut Ball, model: CollisionModel) -> bool {
    if !overlaps(a, b) {
        return false;
    }
    if undo_overlap(a, b) {
        resolve_collision(a, b, model);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SurfaceBounds;
    use crate::view::colors;

    fn table() -> SurfaceBounds {
        SurfaceBounds::new(0, 1000, 0, 1000).unwrap()
    }

    fn ball(x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        Ball::new(Vec2::new(x, y), 50.0, colors::IVORY, &table())
            .unwrap()
            .with_velocity(Vec2::new(vx, vy))
    }

    fn distance(a: &Ball, b: &Ball) -> f32 {
        (b.center() - a.center()).length()
    }

    #[test]
    fn test_overlap_detection() {
        let a = ball(100.0, 500.0, 0.0, 0.0);
        assert!(overlaps(&a, &ball(199.0, 500.0, 0.0, 0.0)));
        // Exactly tangent is not an overlap
        assert!(!overlaps(&a, &ball(200.0, 500.0, 0.0, 0.0)));
        assert!(!overlaps(&a, &ball(300.0, 300.0, 0.0, 0.0)));
    }

    #[test]
    fn test_head_on_equal_mass_swap() {
        let mut a = ball(100.0, 500.0, 300.0, 0.0);
        let mut b = ball(190.0, 500.0, -300.0, 0.0);

        assert!(undo_overlap(&mut a, &mut b));
        assert!((distance(&a, &b) - 100.0).abs() < 1e-4);
        assert!((a.center().x - 95.0).abs() < 1e-4);
        assert!((b.center().x - 195.0).abs() < 1e-4);

        assert!(resolve_collision(&mut a, &mut b, CollisionModel::EqualMass));
        assert!((a.velocity().x + 300.0).abs() < 1e-3);
        assert!((b.velocity().x - 300.0).abs() < 1e-3);
        assert!(a.velocity().y.abs() < 1e-3);
        assert!(b.velocity().y.abs() < 1e-3);
    }

    #[test]
    fn test_glancing_keeps_perpendicular_component() {
        // Line of centers along x; a also moves along y
        let mut a = ball(400.0, 500.0, 200.0, 80.0);
        let mut b = ball(490.0, 500.0, 0.0, -20.0);

        assert!(collide_if_overlapping(&mut a, &mut b, CollisionModel::EqualMass));
        assert!(a.velocity().x.abs() < 1e-3);
        assert!((a.velocity().y - 80.0).abs() < 1e-3);
        assert!((b.velocity().x - 200.0).abs() < 1e-3);
        assert!((b.velocity().y + 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_separating_overlap_still_swaps() {
        let mut a = ball(400.0, 500.0, -50.0, 0.0);
        let mut b = ball(480.0, 500.0, 50.0, 0.0);
        assert!(collide_if_overlapping(&mut a, &mut b, CollisionModel::EqualMass));
        assert!((a.velocity().x - 50.0).abs() < 1e-4);
        assert!((b.velocity().x + 50.0).abs() < 1e-4);
        assert!(((b.center() - a.center()).length() - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_approaching_model_leaves_separating_pair() {
        let mut a = ball(400.0, 500.0, -50.0, 0.0);
        let mut b = ball(480.0, 500.0, 50.0, 0.0);
        assert!(collide_if_overlapping(&mut a, &mut b, CollisionModel::EqualMassApproaching));
        assert_eq!(a.velocity().x, -50.0);
        assert_eq!(b.velocity().x, 50.0);

        // Approaching pairs swap as usual
        let mut a = ball(400.0, 500.0, 50.0, 0.0);
        let mut b = ball(480.0, 500.0, -50.0, 0.0);
        assert!(resolve_collision(&mut a, &mut b, CollisionModel::EqualMassApproaching));
        assert!((a.velocity().x + 50.0).abs() < 1e-4);
        assert!((b.velocity().x - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_coincident_centers_are_skipped() {
        let mut a = ball(500.0, 500.0, 10.0, 0.0);
        let mut b = ball(500.0, 500.0, -10.0, 0.0);
        assert!(overlaps(&a, &b));
        assert!(!undo_overlap(&mut a, &mut b));
        assert!(!resolve_collision(&mut a, &mut b, CollisionModel::EqualMass));
        assert_eq!(a.center(), b.center());
        assert!(a.center().is_finite() && a.velocity().is_finite());
    }

    #[test]
    fn test_mass_weighted_conserves_momentum() {
        let mut a = ball(100.0, 500.0, 400.0, 0.0).with_mass(0.34).unwrap();
        let mut b = ball(195.0, 500.0, 0.0, 0.0);
        let before = a.velocity() * a.mass() + b.velocity() * b.mass();

        assert!(collide_if_overlapping(&mut a, &mut b, CollisionModel::MassWeighted));
        let after = a.velocity() * a.mass() + b.velocity() * b.mass();
        assert!((before - after).length() < 1e-3);

        // Heavy ball keeps moving forward, light ball leaves faster
        assert!(a.velocity().x > 0.0);
        assert!(b.velocity().x > a.velocity().x);
    }

    #[test]
    fn test_mass_weighted_equals_swap_for_equal_masses() {
        let mut a1 = ball(300.0, 300.0, 120.0, 40.0);
        let mut b1 = ball(370.0, 370.0, -60.0, 10.0);
        let mut a2 = a1.clone();
        let mut b2 = b1.clone();

        collide_if_overlapping(&mut a1, &mut b1, CollisionModel::EqualMass);
        collide_if_overlapping(&mut a2, &mut b2, CollisionModel::MassWeighted);
        assert!((a1.velocity() - a2.velocity()).length() < 1e-3);
        assert!((b1.velocity() - b2.velocity()).length() < 1e-3);
    }
}
