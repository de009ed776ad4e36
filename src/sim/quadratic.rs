//! Real roots of `a·t² + b·t + c = 0`
//!
//! Used to find the exact time a ball under constant acceleration reaches a
//! rail line. Only roots at or after "now" are interesting, so the solver
//! reports the smaller non-negative root alongside both roots.

/// Real roots, ascending
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Roots {
    None,
    /// Linear equation (`a == 0`)
    One(f32),
    Two(f32, f32),
}

impl Roots {
    /// Smallest root satisfying `pred`
    fn first_where(self, pred: impl Fn(f32) -> bool) -> Option<f32> {
        match self {
            Roots::None => None,
            Roots::One(t) => pred(t).then_some(t),
            Roots::Two(t1, t2) => {
                if pred(t1) {
                    Some(t1)
                } else if pred(t2) {
                    Some(t2)
                } else {
                    None
                }
            }
        }
    }
}

/// Result of [`solve`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Smaller non-negative root, if any
    pub root: Option<f32>,
    /// All real roots
    pub roots: Roots,
}

/// Solve `a·t² + b·t + c = 0`.
///
/// `a == 0` degenerates to the linear equation `b·t + c = 0`; when `b` is
/// also zero there is no usable root. A negative discriminant gives no root.
pub fn solve(a: f32, b: f32, c: f32) -> Solution {
    let roots = roots(a, b, c);
    Solution {
        root: roots.first_where(|t| t >= 0.0),
        roots,
    }
}

/// Smallest root strictly after `t_min`
pub fn earliest_root_after(a: f32, b: f32, c: f32, t_min: f32) -> Option<f32> {
    roots(a, b, c).first_where(|t| t > t_min)
}

fn roots(a: f32, b: f32, c: f32) -> Roots {
    if a == 0.0 {
        if b == 0.0 {
            return Roots::None;
        }
        return Roots::One(-c / b);
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 || disc.is_nan() {
        return Roots::None;
    }

    // q avoids cancellation between -b and sqrt(disc)
    let sqrt_disc = disc.sqrt();
    let q = -0.5 * (b + b.signum() * sqrt_disc);
    if q == 0.0 {
        // b == 0 and disc == 0 force c == 0: double root at the origin
        return Roots::Two(0.0, 0.0);
    }

    let r1 = q / a;
    let r2 = c / q;
    if r1 <= r2 {
        Roots::Two(r1, r2)
    } else {
        Roots::Two(r2, r1)
    }
}
