//! Simulation core
//!
//! Pure and synchronous:
//! - Time only enters through the elapsed time of each tick
//! - Stable iteration order (by ball ID)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod input;
pub mod quadratic;
pub mod scene;
pub mod table;
pub mod tick;
pub mod vector;

pub use ball::{Ball, Orientation, StepOutcome};
pub use collision::{CollisionModel, collide_if_overlapping, overlaps, resolve_collision, undo_overlap};
pub use input::AccelerationMailbox;
pub use scene::{BallId, Scene};
pub use table::{Axis, Coefficients, Rail, SurfaceBounds};
pub use tick::{TickInput, TickReport, tick};
pub use vector::{Spherical, Vector3};
