//! Rolling Ball - a sphere rolling on a tilted rectangular table
//!
//! Core modules:
//! - `sim`: Physics core (integration, rail bounces, ball-ball collisions)
//! - `host`: Tick loop thread and frame snapshots for a presentation layer
//! - `tilt`: Synthetic accelerometer for running without a device
//! - `view`: Plain-data structs handed to the renderer
//! - `settings`: JSON configuration

pub mod error;
pub mod host;
pub mod settings;
pub mod sim;
pub mod tilt;
pub mod view;

pub use error::{ConfigError, SetupError};
pub use host::Host;
pub use settings::Settings;

/// Simulation constants
pub mod consts {
    /// Device units (dp) per meter of table surface
    pub const DEFAULT_UNITS_PER_METER: f32 = 6400.0;

    /// Smallest time step (seconds) the rail solver will take.
    /// Guarantees forward progress when a contact time is degenerate.
    pub const TIME_EPSILON: f32 = 1.0e-4;
    /// Rail bounces resolved per axis per step before giving up on the axis
    pub const MAX_RAIL_BOUNCES: u32 = 5;
    /// Penetration (dp) tolerated before `Ball::reflect` mirrors the center
    pub const REFLECT_TOLERANCE: f32 = 1.0;
    /// Below this length a direction is considered undefined
    pub const GEOMETRY_EPSILON: f32 = 10.0 * f32::MIN_POSITIVE;

    /// Ball defaults (a pool ball: 2.25in, 6oz)
    pub const DEFAULT_BALL_RADIUS: f32 = 50.0;
    pub const DEFAULT_BALL_MASS: f32 = 0.17;

    /// Table coefficient mid values
    pub const DEFAULT_ROLLING_FRICTION: f32 = 0.01; // 0.005-0.015 of vertical force
    pub const DEFAULT_SLIDING_FRICTION: f32 = 0.25; // 0.15-0.4 of vertical force
    pub const DEFAULT_SPIN_DECELERATION: f32 = 10.0; // 5-15 rad/s²
    pub const DEFAULT_RAIL_RESTITUTION: f32 = 0.75; // 0.6-0.9

    /// Host loop pacing
    pub const TICK_INTERVAL_MS: u64 = 10;
    /// Longest interval handed to a single tick (prevents huge jumps after a stall)
    pub const MAX_ELAPSED_MS: f32 = 100.0;
    /// Accelerometer sample period (~50 Hz)
    pub const SENSOR_INTERVAL_MS: u64 = 20;
}
