//! A ball rolling on the table
//!
//! Units: positions in device units (dp), velocity in dp/s, acceleration in
//! m/s² (scaled by the table's units-per-meter), elapsed time in ms.
//!
//! Rail handling treats x and y as two independent 1D problems. For each axis
//! the naive end-of-interval position is projected; when it leaves the band
//! the exact contact time is solved, the ball is placed on the rail, its axis
//! velocity is reversed and damped, and the rest of the interval is retried.
//! This is not equivalent to picking the single earliest rail across both
//! axes and recursing: for simultaneous corner impacts the x bounce is
//! resolved over the whole interval before the y bounce is considered.

use glam::{Vec2, Vec3};

use super::quadratic;
use super::table::{Axis, Rail, SurfaceBounds};
use super::vector::{Spherical, from_planar};
use crate::consts::*;
use crate::error::SetupError;
use crate::view::{BallColor, BallView};

/// Orientation frame fixed to the ball (north, east and their cross product)
///
/// Stepping does not rotate the frame yet; it keeps its construction value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub north: Vec3,
    pub east: Vec3,
    pub normal: Vec3,
}

impl Default for Orientation {
    fn default() -> Self {
        let h = std::f32::consts::FRAC_1_SQRT_2;
        let north = Vec3::new(h, 0.0, h);
        let east = Vec3::new(h, 0.0, -h);
        Self {
            north,
            east,
            normal: north.cross(east),
        }
    }
}

/// What happened during one [`Ball::step`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Rail bounces resolved, indexed by [`Axis::index`]
    pub bounces: [u32; 2],
    /// Axes whose bounce budget ran out with a contact still pending
    pub stalled: [bool; 2],
}

impl StepOutcome {
    pub fn total_bounces(&self) -> u32 {
        self.bounces[0] + self.bounces[1]
    }
}

/// A rigid sphere on the table
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    center: Vec3,
    orientation: Orientation,
    velocity: Vec3,
    radius: f32,
    mass: f32,
    color: BallColor,
}

impl Ball {
    /// Place a ball at rest at `position` on `table`.
    pub fn new(
        position: Vec2,
        radius: f32,
        color: BallColor,
        table: &SurfaceBounds,
    ) -> Result<Self, SetupError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SetupError::InvalidRadius(radius));
        }
        if !table.fits(radius) {
            return Err(SetupError::BallDoesNotFit {
                radius,
                width: table.width(),
                height: table.height(),
            });
        }
        let in_band = Axis::BOTH.iter().all(|&axis| {
            let (lo, hi) = table.band(axis, radius);
            let p = axis_of(position, axis);
            p >= lo && p <= hi
        });
        if !in_band {
            return Err(SetupError::OutOfBounds {
                x: position.x,
                y: position.y,
            });
        }

        Ok(Self {
            center: from_planar(position, radius),
            orientation: Orientation::default(),
            velocity: Vec3::ZERO,
            radius,
            mass: DEFAULT_BALL_MASS,
            color,
        })
    }

    pub fn with_mass(mut self, mass: f32) -> Result<Self, SetupError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(SetupError::InvalidMass(mass));
        }
        self.mass = mass;
        Ok(self)
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.set_velocity(velocity);
        self
    }

    /// Impose a planar velocity (dp/s). z stays zero.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = from_planar(velocity, 0.0);
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn color(&self) -> BallColor {
        self.color
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    /// Point drawn as the orientation marker
    pub fn marker_point(&self) -> Vec3 {
        self.center + self.orientation.north * self.radius
    }

    /// Angular velocity (rad/s) for rolling without slipping at the current
    /// velocity. Not yet applied to the orientation frame.
    pub fn rolling_spin(&self) -> Vec3 {
        Vec3::Z.cross(self.velocity) / self.radius
    }

    pub fn view(&self) -> BallView {
        BallView::new(self.center.planar(), self.marker_point().planar(), self.radius, self.color)
    }

    /// Translate the center. Rails are not checked.
    pub fn shift_center(&mut self, delta: Vec3) {
        self.center += delta;
    }

    /// Advance by `elapsed_ms` under constant `acceleration` (m/s²),
    /// bouncing off rails on the way. The center ends inside the band.
    pub fn step(
        &mut self,
        table: &SurfaceBounds,
        acceleration: Vec3,
        elapsed_ms: f32,
    ) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        let secs = if elapsed_ms.is_finite() && elapsed_ms >= 0.0 {
            elapsed_ms / 1000.0
        } else {
            log::warn!("Ignoring invalid elapsed time {} ms", elapsed_ms);
            0.0
        };

        let accel = acceleration.planar() * table.units_per_meter();

        let threatened = Axis::BOTH
            .iter()
            .any(|&axis| self.threatened_rail(table, axis, axis_of(accel, axis), secs).is_some());

        if !threatened {
            for axis in Axis::BOTH {
                self.integrate_axis(axis, axis_of(accel, axis), secs);
            }
        } else {
            for axis in Axis::BOTH {
                let (bounces, stalled) = self.advance_axis(table, axis, axis_of(accel, axis), secs);
                outcome.bounces[axis.index()] = bounces;
                outcome.stalled[axis.index()] = stalled;
            }
        }

        self.clamp_to(table);
        outcome
    }

    /// Resolve one axis over `secs`, bouncing at most `MAX_RAIL_BOUNCES` times.
    /// `accel` is already in dp/s².
    fn advance_axis(&mut self, table: &SurfaceBounds, axis: Axis, accel: f32, secs: f32) -> (u32, bool) {
        let restitution = table.rail_restitution();
        let (lo, hi) = table.band(axis, self.radius);
        let mut remaining = secs;
        let mut bounces = 0;

        while let Some(rail) = self.threatened_rail(table, axis, accel, remaining) {
            if bounces == MAX_RAIL_BOUNCES {
                log::debug!(
                    "{:?} axis still hitting {:?} rail after {} bounces, dropping {:.5}s",
                    axis,
                    rail,
                    bounces,
                    remaining
                );
                return (bounces, true);
            }
            bounces += 1;

            let boundary = match rail {
                Rail::Low => lo,
                Rail::High => hi,
            };
            let pos = axis_of3(self.center, axis);
            let vel = axis_of3(self.velocity, axis);

            // ½·a·t² + v·t + (p - boundary) = 0
            let t = quadratic::earliest_root_after(0.5 * accel, vel, pos - boundary, TIME_EPSILON)
                .unwrap_or(TIME_EPSILON)
                .min(remaining);

            let contact_vel = (vel + accel * t).abs() * restitution;
            let bounced = match rail {
                Rail::Low => contact_vel,
                Rail::High => -contact_vel,
            };
            set_axis(&mut self.center, axis, boundary);
            set_axis(&mut self.velocity, axis, bounced);
            remaining -= t;
        }

        self.integrate_axis(axis, accel, remaining);
        (bounces, false)
    }

    /// Rail the naive projection over `secs` would cross, if any
    fn threatened_rail(&self, table: &SurfaceBounds, axis: Axis, accel: f32, secs: f32) -> Option<Rail> {
        let (lo, hi) = table.band(axis, self.radius);
        let projected = project(axis_of3(self.center, axis), axis_of3(self.velocity, axis), accel, secs);
        if projected < lo {
            Some(Rail::Low)
        } else if projected > hi {
            Some(Rail::High)
        } else {
            None
        }
    }

    fn integrate_axis(&mut self, axis: Axis, accel: f32, secs: f32) {
        let pos = axis_of3(self.center, axis);
        let vel = axis_of3(self.velocity, axis);
        set_axis(&mut self.center, axis, project(pos, vel, accel, secs));
        set_axis(&mut self.velocity, axis, vel + accel * secs);
    }

    /// Cheap overshoot correction: a center more than `REFLECT_TOLERANCE`
    /// past a rail line is mirrored back across it and the matching velocity
    /// component is reversed and damped. Returns whether anything changed.
    pub fn reflect(&mut self, table: &SurfaceBounds) -> bool {
        let restitution = table.rail_restitution();
        let mut changed = false;

        for axis in [Axis::Y, Axis::X] {
            let (lo, hi) = table.band(axis, self.radius);
            let pos = axis_of3(self.center, axis);
            let mirrored = if pos <= lo - REFLECT_TOLERANCE {
                2.0 * lo - pos
            } else if pos >= hi + REFLECT_TOLERANCE {
                2.0 * hi - pos
            } else {
                continue;
            };
            let damped = -axis_of3(self.velocity, axis) * restitution;
            set_axis(&mut self.center, axis, mirrored.max(lo).min(hi));
            set_axis(&mut self.velocity, axis, damped);
            changed = true;
        }
        changed
    }

    /// Hard clamp of the center into the band on both axes.
    /// NaN collapses onto the low rail.
    pub fn clamp_to(&mut self, table: &SurfaceBounds) {
        for axis in Axis::BOTH {
            let (lo, hi) = table.band(axis, self.radius);
            let pos = axis_of3(self.center, axis);
            set_axis(&mut self.center, axis, pos.max(lo).min(hi));
        }
    }

    /// Whether the center lies inside the band on both axes
    pub fn in_bounds(&self, table: &SurfaceBounds) -> bool {
        Axis::BOTH.iter().all(|&axis| {
            let (lo, hi) = table.band(axis, self.radius);
            let pos = axis_of3(self.center, axis);
            pos >= lo && pos <= hi
        })
    }
}

/// `p + v·t + ½·a·t²`
#[inline]
fn project(pos: f32, vel: f32, accel: f32, secs: f32) -> f32 {
    pos + vel * secs + 0.5 * accel * secs * secs
}

#[inline]
fn axis_of(v: Vec2, axis: Axis) -> f32 {
    match axis {
        Axis::X => v.x,
        Axis::Y => v.y,
    }
}

#[inline]
fn axis_of3(v: Vec3, axis: Axis) -> f32 {
    match axis {
        Axis::X => v.x,
        Axis::Y => v.y,
    }
}

#[inline]
fn set_axis(v: &mut Vec3, axis: Axis, value: f32) {
    match axis {
        Axis::X => v.x = value,
        Axis::Y => v.y = value,
    }
}
