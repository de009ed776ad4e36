//! Host loop
//!
//! Owns the scene behind a mutex and drives it from a background tick
//! thread. Ticks and frame snapshots take the same lock, so a frame always
//! shows a completed tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::SetupError;
use crate::settings::{HostSettings, Settings};
use crate::sim::{AccelerationMailbox, Scene, TickInput, TickReport, tick};
use crate::view::BallView;

pub struct Host {
    scene: Arc<Mutex<Scene>>,
    mailbox: AccelerationMailbox,
    running: Arc<AtomicBool>,
    timing: HostSettings,
    worker: Option<JoinHandle<()>>,
}

impl Host {
    pub fn new(scene: Scene, timing: HostSettings) -> Self {
        Self {
            scene: Arc::new(Mutex::new(scene)),
            mailbox: AccelerationMailbox::new(),
            running: Arc::new(AtomicBool::new(false)),
            timing,
            worker: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SetupError> {
        Ok(Self::new(settings.build_scene()?, settings.host.clone()))
    }

    /// Mailbox the sensor side publishes into
    pub fn mailbox(&self) -> AccelerationMailbox {
        self.mailbox.clone()
    }

    /// Flag that stays set while the tick thread runs. Producers feeding the
    /// mailbox can share it to stop with the host.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn timing(&self) -> &HostSettings {
        &self.timing
    }

    /// Spawn the tick thread. Does nothing if it is already running.
    pub fn start(&mut self) -> std::io::Result<()> {
        if self.worker.is_some() {
            log::warn!("Host already running");
            return Ok(());
        }
        self.running.store(true, Ordering::Release);

        let scene = self.scene.clone();
        let mailbox = self.mailbox.clone();
        let running = self.running.clone();
        let interval = Duration::from_millis(self.timing.tick_interval_ms);
        let max_elapsed_ms = self.timing.max_elapsed_ms;

        let spawned = thread::Builder::new().name("tick".into()).spawn(move || {
            let mut last = Instant::now();
            while running.load(Ordering::Acquire) {
                let now = Instant::now();
                let elapsed_ms = clamp_elapsed(now.duration_since(last), max_elapsed_ms);
                last = now;

                let input = TickInput::new(mailbox.snapshot(), elapsed_ms);
                let report = tick(&mut lock_scene(&scene), &input);
                if report.stalled > 0 {
                    log::debug!("{} ball(s) ran out of rail bounces this tick", report.stalled);
                }
                thread::sleep(interval);
            }
        });

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                log::info!("Host started, tick every {:?}", interval);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    /// Stop and join the tick thread. Safe to call more than once.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::error!("Tick thread panicked");
            } else {
                log::info!("Host stopped");
            }
        }
    }

    /// Run one tick on the calling thread with the current mailbox value
    pub fn tick_once(&self, elapsed_ms: f32) -> TickReport {
        let input = TickInput::new(self.mailbox.snapshot(), elapsed_ms);
        tick(&mut self.lock(), &input)
    }

    /// Render snapshot of every ball
    pub fn frame(&self) -> Vec<BallView> {
        self.lock().views()
    }

    /// Surface size changed
    pub fn resize(&self, x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Result<(), SetupError> {
        self.lock().resize(x_min, x_max, y_min, y_max)
    }

    /// Run `f` with the scene locked
    pub fn with_scene<R>(&self, f: impl FnOnce(&mut Scene) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Scene> {
        lock_scene(&self.scene)
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Poisoning is recovered: the scene stays usable after a panicking tick.
fn lock_scene(scene: &Mutex<Scene>) -> MutexGuard<'_, Scene> {
    scene.lock().unwrap_or_else(PoisonError::into_inner)
}

fn clamp_elapsed(elapsed: Duration, max_elapsed_ms: f32) -> f32 {
    (elapsed.as_secs_f32() * 1000.0).min(max_elapsed_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SurfaceBounds;
    use crate::view::colors;
    use glam::{Vec2, Vec3};

    fn host() -> Host {
        let mut scene = Scene::new(SurfaceBounds::new(0, 1000, 0, 1000).unwrap());
        scene.spawn_ball(Vec2::new(500.0, 500.0), 50.0, colors::IVORY).unwrap();
        Host::new(scene, HostSettings::default())
    }

    #[test]
    fn test_clamp_elapsed() {
        assert_eq!(clamp_elapsed(Duration::from_millis(16), 100.0), 16.0);
        assert_eq!(clamp_elapsed(Duration::from_secs(5), 100.0), 100.0);
    }

    #[test]
    fn test_tick_once_uses_mailbox() {
        let host = host();
        host.mailbox().publish(Vec3::new(0.0, 1.0, 9.8));
        host.tick_once(100.0);
        let frame = host.frame();
        // ½ · 1 · 6400 · 0.1² = 32
        assert!((frame[0].center[1] - 532.0).abs() < 1e-3);
        assert_eq!(frame[0].center[0], 500.0);
    }

    #[test]
    fn test_resize_goes_through_scene() {
        let host = host();
        assert!(host.resize(0, 50, 0, 1000).is_err());
        host.resize(0, 500, 0, 500).unwrap();
        host.with_scene(|scene| assert_eq!(scene.table().width(), 500));
        // Ball at 500 was past the new band edge at 450; the frame already shows it on the rail
        assert_eq!(host.frame()[0].center, [450.0, 450.0]);
        host.tick_once(0.0);
        assert_eq!(host.frame()[0].center, [450.0, 450.0]);
    }

    #[test]
    fn test_stop_without_start() {
        let mut host = host();
        host.stop();
        host.stop();
        assert!(!host.is_running());
    }
}
