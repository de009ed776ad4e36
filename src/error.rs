//! Error types
//!
//! Physics operations never fail at runtime; degenerate cases are absorbed
//! (see `sim::ball` and `sim::collision`). Errors only come from building a
//! table or ball with invalid parameters, or from reading settings.

use crate::sim::Axis;

/// Rejected construction or resize parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum SetupError {
    /// `min >= max` on an axis
    InvalidBounds { axis: Axis, min: i32, max: i32 },
    /// Restitution outside the open interval (0, 1)
    InvalidRestitution(f32),
    /// A friction/deceleration coefficient that is negative or not finite
    InvalidCoefficient { name: &'static str, value: f32 },
    /// Device units per meter must be positive
    InvalidScale(f32),
    /// Radius must be positive and finite
    InvalidRadius(f32),
    /// Mass must be positive and finite
    InvalidMass(f32),
    /// Ball diameter exceeds the table on some axis
    BallDoesNotFit { radius: f32, width: i32, height: i32 },
    /// Start position outside the band the ball center may occupy
    OutOfBounds { x: f32, y: f32 },
}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::InvalidBounds { axis, min, max } => {
                write!(f, "Invalid {:?} bounds: min {} must be below max {}", axis, min, max)
            }
            SetupError::InvalidRestitution(r) => {
                write!(f, "Rail restitution {} outside (0, 1)", r)
            }
            SetupError::InvalidCoefficient { name, value } => {
                write!(f, "Coefficient {} must be finite and non-negative, got {}", name, value)
            }
            SetupError::InvalidScale(s) => write!(f, "Units per meter must be positive, got {}", s),
            SetupError::InvalidRadius(r) => write!(f, "Ball radius must be positive, got {}", r),
            SetupError::InvalidMass(m) => write!(f, "Ball mass must be positive, got {}", m),
            SetupError::BallDoesNotFit {
                radius,
                width,
                height,
            } => write!(
                f,
                "Ball of radius {} does not fit a {}x{} table",
                radius, width, height
            ),
            SetupError::OutOfBounds { x, y } => {
                write!(f, "Ball center ({}, {}) is outside the table", x, y)
            }
        }
    }
}

impl std::error::Error for SetupError {}

/// Failure reading or writing the settings file.
#[derive(Debug)]
pub enum ConfigError {
    /// File system error
    Io(std::io::Error),
    /// JSON parse or encode error
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}
