//! Simulation settings
//!
//! Read from a JSON file at startup. Every field has a default, so a partial
//! file (or none at all) still yields a usable table.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, SetupError};
use crate::sim::{Axis, Ball, CollisionModel, Coefficients, Scene, SurfaceBounds};
use crate::view::{BallColor, colors};

/// Table extents and physics. The origin is (0, 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub width: i32,
    pub height: i32,
    pub coefficients: Coefficients,
    /// Device units per meter of table
    pub units_per_meter: f32,
    /// Surface colour for the presentation layer
    pub color: BallColor,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            coefficients: Coefficients::default(),
            units_per_meter: DEFAULT_UNITS_PER_METER,
            color: colors::FELT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallSettings {
    pub radius: f32,
    /// kg
    pub mass: f32,
    pub start_x: f32,
    pub start_y: f32,
    pub color: BallColor,
    /// Extra balls are laid out in a row after the first
    pub count: u32,
}

impl Default for BallSettings {
    fn default() -> Self {
        Self {
            radius: DEFAULT_BALL_RADIUS,
            mass: DEFAULT_BALL_MASS,
            start_x: 300.0,
            start_y: 300.0,
            color: colors::IVORY,
            count: 1,
        }
    }
}

/// Timing of the background threads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    pub tick_interval_ms: u64,
    /// Longer gaps between ticks (suspend, debugger) are clamped to this
    pub max_elapsed_ms: f32,
    pub sensor_interval_ms: u64,
    pub sensor_seed: u64,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            max_elapsed_ms: MAX_ELAPSED_MS,
            sensor_interval_ms: SENSOR_INTERVAL_MS,
            sensor_seed: 0x5EED,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub table: TableSettings,
    pub ball: BallSettings,
    pub collision_model: CollisionModel,
    pub host: HostSettings,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Written to a temporary file, then renamed into place
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, self.to_json()?)?;
        fs::rename(&tmp, path)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn build_table(&self) -> Result<SurfaceBounds, SetupError> {
        let t = &self.table;
        SurfaceBounds::with_coefficients(0, t.width, 0, t.height, t.coefficients)?
            .with_units_per_meter(t.units_per_meter)
    }

    /// Table plus `ball.count` balls at rest. The first sits at the start
    /// position; the rest follow in rows, one and a quarter diameters apart.
    pub fn build_scene(&self) -> Result<Scene, SetupError> {
        let table = self.build_table()?;
        let mut scene = Scene::new(table).with_collision_model(self.collision_model);

        let b = &self.ball;
        let spacing = 2.5 * b.radius;
        let (_, x_hi) = scene.table().band(Axis::X, b.radius);
        let mut position = Vec2::new(b.start_x, b.start_y);

        for i in 0..b.count {
            if i > 0 {
                position.x += spacing;
                if position.x > x_hi {
                    position.x = b.start_x;
                    position.y += spacing;
                }
            }
            let color = if i == 0 {
                b.color
            } else {
                colors::PALETTE[i as usize % colors::PALETTE.len()]
            };
            let ball = Ball::new(position, b.radius, color, scene.table())?.with_mass(b.mass)?;
            scene.add_ball(ball)?;
        }

        log::info!("Built scene with {} ball(s)", scene.len());
        Ok(scene)
    }
}
