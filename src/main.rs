use std::f64::consts::FRAC_PI_4;
use std::path::Path;

use glam::DVec3;
use orbitcam::camera::Camera;
use orbitcam::controls::{CameraControls, FitOptions};
use orbitcam::dispatch::ControlsEvent;
use orbitcam::options::ControlsOptions;
use orbitcam::rest::MotionHandle;
use orbitcam::util::bounds::Aabb;
use orbitcam::util::frame_timing::FrameClock;

/// Give up on a motion that has not settled after this many frames.
const MAX_FRAMES: u32 = 600;

fn load_options(arg: Option<String>) -> ControlsOptions {
    let Some(path) = arg else {
        return ControlsOptions::default();
    };
    match ControlsOptions::load(Path::new(&path)) {
        Ok(options) => {
            log::info!("loaded options preset {path}");
            options
        }
        Err(e) => {
            log::error!("{e}; using default options");
            ControlsOptions::default()
        }
    }
}

/// Tick the controller at the clock's rate until `handle` resolves.
fn run_until_rest(
    controls: &mut CameraControls,
    clock: &mut FrameClock,
    handle: &MotionHandle,
    label: &str,
) {
    let mut frames = 0;
    while !handle.is_resolved() && frames < MAX_FRAMES {
        if !clock.should_tick() {
            std::thread::sleep(clock.until_next_frame());
            continue;
        }
        let dt = clock.tick();
        let _ = controls.update(dt);
        frames += 1;
    }
    // One more tick so the camera sleeps.
    let _ = controls.update(clock.tick());

    let p = controls.camera().position;
    log::info!(
        "{label}: {frames} frames, camera at ({:.3}, {:.3}, {:.3}), distance {:.3}",
        p.x,
        p.y,
        p.z,
        controls.distance()
    );
}

fn main() {
    env_logger::init();

    let options = load_options(std::env::args().nth(1));
    let mut controls = CameraControls::new(Camera::default(), options);
    for event in [
        ControlsEvent::Wake,
        ControlsEvent::Rest,
        ControlsEvent::Sleep,
        ControlsEvent::TransitionStart,
    ] {
        let _ = controls.add_event_listener(event, |e| log::debug!("event: {e}"));
    }

    let mut clock = FrameClock::new(60);

    let handle = controls.rotate_to(FRAC_PI_4, FRAC_PI_4, true);
    run_until_rest(&mut controls, &mut clock, &handle, "rotate_to");

    let handle = controls.dolly_to(10.0, true);
    run_until_rest(&mut controls, &mut clock, &handle, "dolly_to");

    let model = Aabb::new(DVec3::new(-2.0, 0.0, -1.0), DVec3::new(2.0, 1.5, 1.0));
    let handle = controls.fit_to_box(&model, true, FitOptions::default());
    run_until_rest(&mut controls, &mut clock, &handle, "fit_to_box");

    let handle = controls.reset(true);
    run_until_rest(&mut controls, &mut clock, &handle, "reset");

    match controls.to_json() {
        Ok(json) => log::info!("state: {json}"),
        Err(e) => log::error!("{e}"),
    }
}
