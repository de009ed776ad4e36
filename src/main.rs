//! Rolling Ball entry point
//!
//! Headless run: builds the scene from a settings file, feeds it from the
//! synthetic tilt sensor and logs ball positions until the run time is up.
//!
//! Usage: `rolling-ball [settings.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Rolling Ball starting...");

    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the embedding page; nothing to run here
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::thread;
    use std::time::{Duration, Instant};

    use rolling_ball::tilt::TiltSource;
    use rolling_ball::{Host, Settings};

    const DEFAULT_RUN_SECS: u64 = 5;
    const REPORT_INTERVAL: Duration = Duration::from_millis(500);
    const MAX_TILT: f32 = 3.0;

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load(path),
            None => {
                log::info!("No settings file given, using defaults");
                Settings::default()
            }
        };
        let run_for = match args.next() {
            Some(secs) => Duration::from_secs(secs.parse()?),
            None => Duration::from_secs(DEFAULT_RUN_SECS),
        };

        log::info!(
            "Table {}x{}, surface colour {:08X}",
            settings.table.width,
            settings.table.height,
            settings.table.color.0
        );
        let mut host = Host::from_settings(&settings)?;
        // Start first: the producer runs only while the host's flag is set
        host.start()?;
        let sensor = TiltSource::new(settings.host.sensor_seed, MAX_TILT).spawn_producer(
            host.mailbox(),
            host.running_flag(),
            Duration::from_millis(settings.host.sensor_interval_ms),
        )?;

        let started = Instant::now();
        while started.elapsed() < run_for {
            thread::sleep(REPORT_INTERVAL);
            let tilt = host.mailbox().snapshot();
            for (i, ball) in host.frame().iter().enumerate() {
                log::info!(
                    "ball {} at ({:.1}, {:.1}) tilt ({:.2}, {:.2})",
                    i,
                    ball.center[0],
                    ball.center[1],
                    tilt.x,
                    tilt.y
                );
            }
        }

        host.stop();
        if sensor.join().is_err() {
            log::error!("Tilt sensor thread panicked");
        }
        log::info!("Rolling Ball finished after {:?}", started.elapsed());
        Ok(())
    }
}
