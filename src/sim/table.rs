//! The rectangular play surface
//!
//! A `SurfaceBounds` is built once per surface sizing event and shared by
//! every ball on it. The physics step only reads it; `resize` is the single
//! mutator and re-validates.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SetupError;

/// One of the two planar axes. z is pinned to the ball radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// A rail is the low or high boundary line of an axis.
/// With screen coordinates, Low/Y is the top rail and High/Y the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rail {
    Low,
    High,
}

/// Physical coefficients of the table cloth and rails
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coefficients {
    /// Proportion of vertical force (0.005-0.015)
    pub rolling_friction: f32,
    /// Proportion of vertical force (0.15-0.4)
    pub sliding_friction: f32,
    /// rad/s² (5-15)
    pub spin_deceleration: f32,
    /// Ratio of rail-normal speed after to before impact (0.6-0.9).
    /// Also sqrt(h/H) for a ball dropped from H bouncing to h.
    pub rail_restitution: f32,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            rolling_friction: DEFAULT_ROLLING_FRICTION,
            sliding_friction: DEFAULT_SLIDING_FRICTION,
            spin_deceleration: DEFAULT_SPIN_DECELERATION,
            rail_restitution: DEFAULT_RAIL_RESTITUTION,
        }
    }
}

impl Coefficients {
    pub fn validate(&self) -> Result<(), SetupError> {
        let r = self.rail_restitution;
        if !(r > 0.0 && r < 1.0) {
            return Err(SetupError::InvalidRestitution(r));
        }
        for (name, value) in [
            ("rolling_friction", self.rolling_friction),
            ("sliding_friction", self.sliding_friction),
            ("spin_deceleration", self.spin_deceleration),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SetupError::InvalidCoefficient { name, value });
            }
        }
        Ok(())
    }
}

/// Extents of the play area plus its physical coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceBounds {
    x_min: i32,
    x_max: i32,
    y_min: i32,
    y_max: i32,
    coefficients: Coefficients,
    units_per_meter: f32,
}

impl SurfaceBounds {
    /// Table with mid-range coefficients
    pub fn new(x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Result<Self, SetupError> {
        Self::with_coefficients(x_min, x_max, y_min, y_max, Coefficients::default())
    }

    pub fn with_coefficients(
        x_min: i32,
        x_max: i32,
        y_min: i32,
        y_max: i32,
        coefficients: Coefficients,
    ) -> Result<Self, SetupError> {
        check_extents(x_min, x_max, y_min, y_max)?;
        coefficients.validate()?;
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
            coefficients,
            units_per_meter: DEFAULT_UNITS_PER_METER,
        })
    }

    /// Override the device scale (dp per meter of table)
    pub fn with_units_per_meter(mut self, units_per_meter: f32) -> Result<Self, SetupError> {
        if !units_per_meter.is_finite() || units_per_meter <= 0.0 {
            return Err(SetupError::InvalidScale(units_per_meter));
        }
        self.units_per_meter = units_per_meter;
        Ok(self)
    }

    /// Apply new extents (surface resize). Coefficients are kept.
    /// On error the table is left unchanged.
    pub fn resize(&mut self, x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Result<(), SetupError> {
        check_extents(x_min, x_max, y_min, y_max)?;
        self.x_min = x_min;
        self.x_max = x_max;
        self.y_min = y_min;
        self.y_max = y_max;
        Ok(())
    }

    #[inline]
    pub fn x_min(&self) -> i32 {
        self.x_min
    }

    #[inline]
    pub fn x_max(&self) -> i32 {
        self.x_max
    }

    #[inline]
    pub fn y_min(&self) -> i32 {
        self.y_min
    }

    #[inline]
    pub fn y_max(&self) -> i32 {
        self.y_max
    }

    pub fn width(&self) -> i32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> i32 {
        self.y_max - self.y_min
    }

    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    #[inline]
    pub fn rail_restitution(&self) -> f32 {
        self.coefficients.rail_restitution
    }

    #[inline]
    pub fn units_per_meter(&self) -> f32 {
        self.units_per_meter
    }

    /// Rail line coordinates of an axis
    #[inline]
    pub fn extent(&self, axis: Axis) -> (f32, f32) {
        match axis {
            Axis::X => (self.x_min as f32, self.x_max as f32),
            Axis::Y => (self.y_min as f32, self.y_max as f32),
        }
    }

    /// Range the center of a ball of `radius` may occupy on `axis`
    #[inline]
    pub fn band(&self, axis: Axis, radius: f32) -> (f32, f32) {
        let (min, max) = self.extent(axis);
        (min + radius, max - radius)
    }

    /// Whether a ball of `radius` fits between both pairs of rails
    pub fn fits(&self, radius: f32) -> bool {
        2.0 * radius <= self.width() as f32 && 2.0 * radius <= self.height() as f32
    }
}

fn check_extents(x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Result<(), SetupError> {
    if x_min >= x_max {
        return Err(SetupError::InvalidBounds {
            axis: Axis::X,
            min: x_min,
            max: x_max,
        });
    }
    if y_min >= y_max {
        return Err(SetupError::InvalidBounds {
            axis: Axis::Y,
            min: y_min,
            max: y_max,
        });
    }
    Ok(())
}
