//! Synthetic tilt sensor
//!
//! Stands in for a device accelerometer: the table wanders between random
//! tilts, easing toward each new target so the ball sees smooth input.
//! Same seed, same readings.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use std::f32::consts::TAU;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::AccelerationMailbox;
use crate::sim::vector::{from_planar, planar_direction};

/// Standard gravity, m/s². Carried on z; only x and y move the ball.
pub const GRAVITY: f32 = 9.81;

#[derive(Debug, Clone)]
pub struct TiltSource {
    rng: Pcg32,
    current: Vec3,
    target: Vec3,
    /// Largest planar tilt, m/s²
    max_tilt: f32,
    /// Fraction of the remaining gap closed per sample
    smoothing: f32,
    /// Samples between new targets
    hold: u32,
    until_retarget: u32,
}

impl TiltSource {
    pub fn new(seed: u64, max_tilt: f32) -> Self {
        let max_tilt = if max_tilt.is_finite() { max_tilt.abs() } else { 0.0 };
        Self {
            rng: Pcg32::seed_from_u64(seed),
            current: Vec3::new(0.0, 0.0, GRAVITY),
            target: Vec3::new(0.0, 0.0, GRAVITY),
            max_tilt,
            smoothing: 0.1,
            hold: 50,
            until_retarget: 0,
        }
    }

    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing.clamp(0.0, 1.0);
        self
    }

    pub fn with_hold(mut self, samples: u32) -> Self {
        self.hold = samples.max(1);
        self
    }

    /// Next reading in table axes
    pub fn sample(&mut self) -> Vec3 {
        if self.until_retarget == 0 {
            self.target = self.random_target();
            self.until_retarget = self.hold;
        }
        self.until_retarget -= 1;

        self.current += (self.target - self.current) * self.smoothing;
        self.current
    }

    /// Random downhill direction and strength, gravity on z
    fn random_target(&mut self) -> Vec3 {
        if self.max_tilt == 0.0 {
            return Vec3::new(0.0, 0.0, GRAVITY);
        }
        let azimuth = self.rng.random_range(0.0..TAU);
        let strength = self.rng.random_range(0.0..=self.max_tilt);
        from_planar(planar_direction(azimuth) * strength, GRAVITY)
    }

    /// Publish a sample into `mailbox` every `interval` until `running`
    /// clears.
    pub fn spawn_producer(
        mut self,
        mailbox: AccelerationMailbox,
        running: Arc<AtomicBool>,
        interval: Duration,
    ) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new().name("tilt-sensor".into()).spawn(move || {
            log::debug!("Tilt producer started, interval {:?}", interval);
            while running.load(Ordering::Acquire) {
                mailbox.publish(self.sample());
                thread::sleep(interval);
            }
            log::debug!("Tilt producer stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_readings() {
        let mut a = TiltSource::new(7, 3.0);
        let mut b = TiltSource::new(7, 3.0);
        for _ in 0..200 {
            assert_eq!(a.sample(), b.sample());
        }
        let mut c = TiltSource::new(8, 3.0);
        let differs = (0..200).any(|_| a.sample() != c.sample());
        assert!(differs);
    }

    #[test]
    fn test_readings_stay_within_tilt() {
        let mut source = TiltSource::new(1, 2.0).with_smoothing(0.5).with_hold(3);
        for _ in 0..1000 {
            let s = source.sample();
            assert!(s.x.abs() <= 2.0 + 1e-5);
            assert!(s.y.abs() <= 2.0 + 1e-5);
            assert_eq!(s.z, GRAVITY);
        }
    }

    #[test]
    fn test_targets_within_tilt_disc() {
        let mut source = TiltSource::new(21, 2.5);
        let mut spread = [false; 4];
        for _ in 0..400 {
            let target = source.random_target();
            assert!(target.truncate().length() <= 2.5 + 1e-5);
            assert_eq!(target.z, GRAVITY);
            let quadrant = (target.x >= 0.0) as usize * 2 + (target.y >= 0.0) as usize;
            spread[quadrant] = true;
        }
        // Every downhill direction turns up
        assert!(spread.iter().all(|&hit| hit));
    }

    #[test]
    fn test_eases_toward_target() {
        let mut source = TiltSource::new(3, 4.0).with_hold(1000);
        let first = source.sample();
        let target = source.target;
        let gap = (target - first).length();
        let second = source.sample();
        assert!((target - second).length() < gap || gap == 0.0);
    }

    #[test]
    fn test_level_source() {
        let mut source = TiltSource::new(5, 0.0);
        assert_eq!(source.sample(), Vec3::new(0.0, 0.0, GRAVITY));
    }

    #[test]
    fn test_producer_publishes_until_stopped() {
        let mailbox = AccelerationMailbox::new();
        let running = Arc::new(AtomicBool::new(true));
        let handle = TiltSource::new(11, 2.0)
            .spawn_producer(mailbox.clone(), running.clone(), Duration::from_millis(1))
            .unwrap();

        let mut published = false;
        for _ in 0..500 {
            if mailbox.snapshot().z == GRAVITY {
                published = true;
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
        running.store(false, Ordering::Release);
        handle.join().unwrap();
        assert!(published);
    }
}
