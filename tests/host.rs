//! Host loop driven across threads: tick thread, tilt producer and a
//! reader taking frames while the scene moves.

use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};
use rolling_ball::settings::HostSettings;
use rolling_ball::sim::{Scene, SurfaceBounds};
use rolling_ball::tilt::TiltSource;
use rolling_ball::view::{BallView, colors};
use rolling_ball::{Host, Settings};

const WIDTH: f32 = 1000.0;
const HEIGHT: f32 = 1000.0;

fn fast_timing() -> HostSettings {
    HostSettings {
        tick_interval_ms: 1,
        ..HostSettings::default()
    }
}

fn host_with_balls(count: usize) -> Host {
    let mut scene = Scene::new(SurfaceBounds::new(0, WIDTH as i32, 0, HEIGHT as i32).unwrap());
    for i in 0..count {
        let x = 150.0 + 150.0 * i as f32;
        scene.spawn_ball(Vec2::new(x, 500.0), 50.0, colors::PALETTE[i % 4]).unwrap();
    }
    Host::new(scene, fast_timing())
}

fn in_table(view: &BallView) -> bool {
    let [x, y] = view.center;
    x >= view.radius && x <= WIDTH - view.radius && y >= view.radius && y <= HEIGHT - view.radius
}

/// Poll `cond` for up to two seconds
fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    false
}

#[test]
fn test_tick_thread_moves_ball_under_tilt() {
    let mut host = host_with_balls(1);
    host.mailbox().publish(Vec3::new(0.0, 2.0, 9.8));
    host.start().unwrap();
    assert!(host.is_running());

    // Tilted toward +y: the ball rolls down and keeps bouncing near the high rail
    let moved = wait_for(|| host.frame()[0].center[1] > 600.0);
    host.stop();

    assert!(moved, "ball at {:?}", host.frame()[0].center);
    assert_eq!(host.frame()[0].center[0], 150.0);
    assert!(!host.is_running());
    assert!(in_table(&host.frame()[0]));
}

#[test]
fn test_frames_stay_in_table_while_ticking() {
    let mut host = host_with_balls(4);
    host.with_scene(|scene| {
        let ids: Vec<_> = scene.ids().collect();
        for (i, id) in ids.into_iter().enumerate() {
            let v = Vec2::from_angle(i as f32) * 3000.0;
            if let Some(ball) = scene.get_mut(id) {
                ball.set_velocity(v);
            }
        }
    });
    host.mailbox().publish(Vec3::new(-3.0, 1.5, 9.8));
    host.start().unwrap();

    let started = Instant::now();
    let mut frames = 0;
    while started.elapsed() < Duration::from_millis(200) {
        let frame = host.frame();
        assert_eq!(frame.len(), 4);
        for view in &frame {
            assert!(in_table(view), "ball escaped: {:?}", view.center);
        }
        frames += 1;
    }
    host.stop();
    assert!(frames > 0);
}

#[test]
fn test_tilt_producer_feeds_host() {
    let mut host = host_with_balls(1);
    host.start().unwrap();
    let producer = TiltSource::new(99, 3.0)
        .spawn_producer(host.mailbox(), host.running_flag(), Duration::from_millis(1))
        .unwrap();

    let mailbox = host.mailbox();
    assert!(wait_for(|| mailbox.snapshot() != Vec3::ZERO));

    // Stopping the host also stops the producer
    host.stop();
    producer.join().unwrap();
}

#[test]
fn test_resize_while_running() {
    let mut host = host_with_balls(2);
    host.start().unwrap();
    host.resize(0, 600, 0, 400).unwrap();
    assert!(host.resize(0, 60, 0, 400).is_err());

    assert!(wait_for(|| {
        host.frame()
            .iter()
            .all(|v| v.center[0] <= 550.0 && v.center[1] <= 350.0)
    }));
    host.stop();
}

#[test]
fn test_drop_stops_tick_thread() {
    let running = {
        let mut host = host_with_balls(1);
        host.start().unwrap();
        host.running_flag()
    };
    assert!(!running.load(Ordering::Acquire));
}

#[test]
fn test_start_twice_keeps_one_thread() {
    let mut host = host_with_balls(1);
    host.start().unwrap();
    host.start().unwrap();
    host.stop();
    assert!(!host.is_running());
    host.stop();
}

#[test]
fn test_from_default_settings() {
    let host = Host::from_settings(&Settings::default()).unwrap();
    let frame = host.frame();
    assert_eq!(frame.len(), 1);
    assert_eq!(frame[0].center, [300.0, 300.0]);
    assert_eq!(frame[0].color, colors::IVORY.to_rgba());
    assert_eq!(host.timing().tick_interval_ms, 10);
}

#[test]
fn test_device_axes_reach_the_ball() {
    let host = host_with_balls(1);
    // Device x is mirrored: a positive raw x tilts the ball toward -x
    host.mailbox().publish_device_axes([1.0, 0.0, -9.8]);
    host.tick_once(50.0);
    let [x, y] = host.frame()[0].center;
    assert!(x < 150.0);
    assert_eq!(y, 500.0);
}
