//! Latest-value slot for the table tilt
//!
//! The sensor side publishes whenever a reading arrives; the tick side takes
//! a snapshot once per tick. Only the newest reading matters, so the slot is
//! a single value rather than a queue.

use std::sync::{Arc, Mutex, PoisonError};

use glam::Vec3;

/// Shared single-slot acceleration mailbox. Clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct AccelerationMailbox {
    slot: Arc<Mutex<Vec3>>,
}

impl AccelerationMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored acceleration (m/s²)
    pub fn publish(&self, acceleration: Vec3) {
        // A panicking writer cannot leave a Vec3 half-written
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = acceleration;
    }

    /// Publish a raw accelerometer reading in device axes.
    /// x and z are flipped to table axes.
    pub fn publish_device_axes(&self, raw: [f32; 3]) {
        self.publish(Vec3::new(-raw[0], raw[1], -raw[2]));
    }

    /// Latest published acceleration, zero if nothing was published yet
    pub fn snapshot(&self) -> Vec3 {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
