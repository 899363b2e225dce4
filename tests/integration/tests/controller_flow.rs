//! Integration tests for controllers and overlay components
//!
//! These tests verify the controller side of a session:
//! - Progress polling and chrome fade-out
//! - Full screen, tiny screen and back navigation
//! - Device orientation following
//! - The stock component set reacting to playback

use anyhow::Result;
use std::collections::HashMap;
use std::thread;
use videoview::backend::BackendEvent;
use videoview::controller::{OrientationSample, VideoController};
use videoview::platform::{ContainerParent, Platform, ScreenOrientation};
use videoview::player::{DisplayMode, PlaybackState, PlayerControl};
use videoview::PlayerConfig;
use videoview_integration_tests::Scenario;

#[test]
fn test_progress_reported_while_playing() -> Result<()> {
    let scenario = Scenario::new()?;
    let (controller, probe) = scenario.probed_controller();

    scenario.start();
    assert!(controller.is_progress_running());
    assert_eq!(probe.last_progress(), Some((60_000, 0)));

    scenario.advance(1_000);
    assert_eq!(probe.last_progress(), Some((60_000, 1_000)));

    scenario.session.pause();
    assert!(!controller.is_progress_running());
    let reports = probe.progress_reports();
    scenario.advance(3_000);
    assert_eq!(probe.progress_reports(), reports);

    Ok(())
}

#[test]
fn test_chrome_fades_out() -> Result<()> {
    let scenario = Scenario::new()?;
    let (controller, probe) = scenario.probed_controller();
    scenario.start();

    controller.show();
    assert!(controller.is_showing());
    assert_eq!(probe.visibility(), vec![true]);

    scenario.advance(3_999);
    assert!(controller.is_showing());

    scenario.advance(1);
    assert!(!controller.is_showing());
    assert_eq!(probe.visibility(), vec![true, false]);

    Ok(())
}

#[test]
fn test_locked_chrome_stays_put() -> Result<()> {
    let scenario = Scenario::new()?;
    let (controller, probe) = scenario.probed_controller();
    scenario.start();
    scenario.session.start_full_screen();

    controller.show();
    controller.set_locked(true);
    assert_eq!(probe.locks(), vec![true]);

    controller.hide();
    assert_eq!(probe.visibility(), vec![true]);

    // Back is swallowed while locked
    assert!(scenario.session.on_back_pressed());
    assert!(scenario.session.is_full_screen());

    Ok(())
}

#[test]
fn test_back_press_leaves_full_screen() -> Result<()> {
    let scenario = Scenario::new()?;
    scenario.standard_controller();
    scenario.start();

    scenario.session.start_full_screen();
    assert_eq!(scenario.platform.container_parent(), ContainerParent::Decor);
    assert!(scenario.platform.system_bars_hidden());
    assert_eq!(scenario.recorder.modes().last(), Some(&DisplayMode::FullScreen));

    assert!(scenario.session.on_back_pressed());
    assert_eq!(scenario.session.display_mode(), DisplayMode::Normal);
    assert_eq!(scenario.platform.container_parent(), ContainerParent::Root);
    assert!(!scenario.platform.system_bars_hidden());
    assert_eq!(
        scenario.platform.requested_orientation(),
        ScreenOrientation::Portrait
    );

    assert!(!scenario.session.on_back_pressed());
    Ok(())
}

#[test]
fn test_full_screen_needs_decor() -> Result<()> {
    let scenario = Scenario::new()?;
    scenario.platform.set_has_decor(false);
    scenario.start();

    scenario.session.start_full_screen();
    assert!(!scenario.session.is_full_screen());
    assert!(scenario.platform.container_moves().is_empty());
    Ok(())
}

#[test]
fn test_tiny_screen_overlay() -> Result<()> {
    let scenario = Scenario::new()?;
    let (controller, _probe) = scenario.probed_controller();
    scenario.start();

    scenario.session.start_tiny_screen();
    assert!(scenario.session.is_tiny_screen());
    assert_eq!(
        scenario.platform.container_parent(),
        ContainerParent::ContentOverlay {
            width: 540,
            height: 303
        }
    );
    assert!(!controller.is_orientation_listening());

    scenario.session.stop_tiny_screen();
    assert_eq!(scenario.session.display_mode(), DisplayMode::Normal);
    assert_eq!(scenario.platform.container_parent(), ContainerParent::Root);
    Ok(())
}

#[test]
fn test_orientation_follows_device() -> Result<()> {
    let mut config = PlayerConfig::default();
    config.display.enable_orientation = true;
    let scenario = Scenario::builder().config(config).build()?;
    scenario.session.set_url("/sdcard/movie.mp4", HashMap::new());
    let (controller, _probe) = scenario.probed_controller();
    scenario.start();
    assert!(controller.is_orientation_listening());
    assert!(scenario.platform.sensor_enabled());

    // Sensor readings arrive from their own thread
    let sensor = controller.orientation_sensor();
    let reporter = thread::spawn(move || sensor.report(OrientationSample::Degrees(270)));
    assert!(reporter.join().expect("sensor thread"));
    scenario.looper.run_pending();

    assert!(scenario.session.is_full_screen());
    assert_eq!(
        scenario.platform.requested_orientation(),
        ScreenOrientation::Landscape
    );

    scenario.clock.advance(400);
    controller
        .orientation_sensor()
        .report(OrientationSample::Degrees(0));
    scenario.looper.run_pending();
    assert!(!scenario.session.is_full_screen());
    assert_eq!(
        scenario.platform.requested_orientation(),
        ScreenOrientation::Portrait
    );

    Ok(())
}

#[test]
fn test_lock_blocks_orientation() -> Result<()> {
    let scenario = Scenario::new()?;
    let (controller, _probe) = scenario.probed_controller();
    scenario.start();
    scenario.session.start_full_screen();
    assert!(controller.is_orientation_listening());

    controller.set_locked(true);
    controller
        .orientation_sensor()
        .report(OrientationSample::Degrees(90));
    scenario.looper.run_pending();

    assert!(scenario.session.is_full_screen());
    assert_eq!(
        scenario.platform.requested_orientation(),
        ScreenOrientation::Portrait
    );
    Ok(())
}

#[test]
fn test_release_resets_controller() -> Result<()> {
    let scenario = Scenario::new()?;
    let (controller, probe) = scenario.probed_controller();
    scenario.start();
    scenario.session.start_full_screen();
    controller.set_locked(true);

    scenario.session.release();
    assert!(!controller.is_locked());
    assert!(!controller.is_showing());
    assert!(!controller.is_progress_running());
    assert!(!scenario.platform.keep_screen_on());
    assert!(probe.wrapper().is_some());
    Ok(())
}

#[test]
fn test_default_components_follow_playback() -> Result<()> {
    let scenario = Scenario::new()?;
    let standard = scenario.standard_controller();
    let components = standard.add_default_control_components("Movie", false);
    let vod = components.vod.clone().expect("vod bar");

    assert!(components.prepare.is_visible());
    assert!(components.prepare.click());
    assert!(components.prepare.is_loading());
    assert!(standard.loading().is_visible());

    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Playing);
    assert!(!components.prepare.is_visible());
    assert!(!standard.loading().is_visible());
    assert!(vod.is_visible());
    assert_eq!(vod.total_text(), "01:00");

    scenario.advance(60_000);
    assert_eq!(scenario.state(), PlaybackState::Completed);
    assert!(components.complete.is_visible());
    assert!(!vod.is_visible());

    components.complete.click_replay();
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Playing);
    assert!(!components.complete.is_visible());

    Ok(())
}

#[test]
fn test_error_view_retries() -> Result<()> {
    let scenario = Scenario::new()?;
    let standard = scenario.standard_controller();
    let components = standard.add_default_control_components("Movie", false);
    scenario.start();

    scenario
        .handle()
        .expect("backend created")
        .emit(BackendEvent::Error);
    scenario.looper.run_pending();
    assert!(components.error.is_visible());

    components.error.click_retry();
    assert!(!components.error.is_visible());
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Playing);

    Ok(())
}

#[test]
fn test_title_and_lock_in_full_screen() -> Result<()> {
    let scenario = Scenario::new()?;
    let standard = scenario.standard_controller();
    let components = standard.add_default_control_components("Movie", false);
    scenario.start();

    standard.controller().show();
    assert!(!components.title.is_visible());
    assert!(!standard.lock_button().is_visible());

    scenario.session.start_full_screen();
    assert!(components.title.is_visible());
    assert!(standard.lock_button().is_visible());
    assert_eq!(components.title.title(), "Movie");

    standard.click_lock();
    assert!(standard.controller().is_locked());
    assert!(standard.lock_button().is_selected());
    assert!(!components.title.is_visible());

    standard.click_lock();
    components.title.click_back();
    assert!(!scenario.session.is_full_screen());
    assert!(!components.title.is_visible());

    Ok(())
}

#[test]
fn test_live_components_disable_seek() -> Result<()> {
    let scenario = Scenario::new()?;
    let standard = scenario.standard_controller();
    let components = standard.add_default_control_components("Live", true);
    assert!(components.vod.is_none());
    let live = components.live.clone().expect("live bar");

    scenario.start();
    standard.controller().show();
    assert!(live.is_visible());
    assert!(live.is_playing());

    live.click_refresh();
    assert_eq!(scenario.state(), PlaybackState::Preparing);
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Playing);

    Ok(())
}
