//! Integration tests for the video session
//!
//! These tests drive a session on the simulated backend through:
//! - Start, pause, resume and completion
//! - Progress restore and save
//! - Audio focus loss and regain
//! - Backend errors and stale events
//! - Metered network consent

use anyhow::Result;
use serial_test::serial;
use std::collections::HashMap;
use std::rc::Rc;
use videoview::backend::{BackendEvent, InfoCode, SimPhase, SimulatedMedia};
use videoview::platform::NetworkType;
use videoview::player::{
    FileProgressStore, FocusChange, PlaybackState, PlayerControl, ProgressStore, SessionRegistry,
    VideoSession,
};
use videoview::PlayerConfig;
use videoview_integration_tests::{memory_store, Scenario, TestFixture};

const MOVIE: &str = "/sdcard/movie.mp4";

#[test]
fn test_start_reaches_playing() -> Result<()> {
    let scenario = Scenario::new()?;
    assert_eq!(scenario.state(), PlaybackState::Idle);

    scenario.session.start();
    assert_eq!(scenario.state(), PlaybackState::Preparing);
    assert!(scenario.platform.keep_screen_on());
    assert!(scenario.focus.is_held());

    scenario.looper.run_pending();
    assert_eq!(
        scenario.recorder.states(),
        vec![
            PlaybackState::Preparing,
            PlaybackState::Prepared,
            PlaybackState::Playing
        ]
    );
    assert!(scenario.session.is_playing());
    assert_eq!(scenario.session.duration(), 60_000);
    assert_eq!(scenario.session.video_size(), (1280, 720));

    let handle = scenario.handle().expect("backend created");
    assert_eq!(handle.source().as_deref(), Some(MOVIE));
    assert_eq!(handle.phase(), SimPhase::Started);

    Ok(())
}

#[test]
fn test_pause_resume_and_complete() -> Result<()> {
    let scenario = Scenario::new()?;
    scenario.start();

    scenario.session.pause();
    assert_eq!(scenario.state(), PlaybackState::Paused);
    assert!(!scenario.platform.keep_screen_on());
    assert!(!scenario.focus.is_held());

    // Time does not move while paused
    scenario.advance(5_000);
    assert_eq!(scenario.session.current_position(), 0);

    scenario.session.resume();
    assert_eq!(scenario.state(), PlaybackState::Playing);
    assert!(scenario.platform.keep_screen_on());
    assert_eq!(scenario.focus.request_count(), 2);

    scenario.advance(60_000);
    assert_eq!(scenario.state(), PlaybackState::Completed);
    assert!(!scenario.platform.keep_screen_on());
    assert_eq!(scenario.session.current_position(), 0);

    Ok(())
}

#[test]
fn test_seek_reads_back_position() -> Result<()> {
    let scenario = Scenario::new()?;
    scenario.start();
    assert_eq!(scenario.session.duration(), 60_000);

    scenario.session.seek_to(30_000);
    assert_eq!(scenario.session.current_position(), 30_000);

    scenario.advance(1_000);
    assert_eq!(scenario.session.current_position(), 31_000);
    Ok(())
}

#[test]
fn test_start_after_completion_is_ignored() -> Result<()> {
    let scenario = Scenario::new()?;
    scenario.start();
    scenario.advance(60_000);
    assert_eq!(scenario.state(), PlaybackState::Completed);
    scenario.recorder.clear();

    scenario.session.start();
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Completed);
    assert!(scenario.recorder.states().is_empty());
    assert!(!scenario.platform.keep_screen_on());

    // Restarting goes through replay
    scenario.session.replay(true);
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Playing);
    assert!(scenario.platform.keep_screen_on());
    assert_eq!(scenario.factory.created_count(), 1);
    assert_eq!(scenario.handle().map(|h| h.position()), Some(0));

    Ok(())
}

#[test]
fn test_start_after_error_is_ignored() -> Result<()> {
    let scenario = Scenario::new()?;
    scenario.start();
    scenario
        .handle()
        .expect("backend created")
        .emit(BackendEvent::Error);
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Error);

    scenario.session.start();
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Error);
    assert_eq!(scenario.factory.created_count(), 1);

    Ok(())
}

#[test]
fn test_looping_wraps_around() -> Result<()> {
    let mut config = PlayerConfig::default();
    config.playback.looping = true;
    let scenario = Scenario::builder().config(config).build()?;
    scenario.session.set_url(MOVIE, HashMap::new());
    scenario.start();

    let handle = scenario.handle().expect("backend created");
    assert!(handle.is_looping());
    scenario.advance(70_000);
    assert_eq!(scenario.state(), PlaybackState::Playing);
    assert_eq!(handle.position(), 10_000);

    Ok(())
}

#[test]
fn test_progress_restored_and_saved() -> Result<()> {
    let store = memory_store();
    store.save(MOVIE, 20_000);
    let scenario = Scenario::builder().progress_store(store.clone()).build()?;
    scenario.session.set_url(MOVIE, HashMap::new());

    scenario.start();
    assert_eq!(scenario.state(), PlaybackState::Playing);
    let handle = scenario.handle().expect("backend created");
    assert_eq!(handle.position(), 20_000);

    scenario.advance(5_000);
    scenario.session.release();
    assert_eq!(scenario.state(), PlaybackState::Idle);
    assert_eq!(store.get(MOVIE), 25_000);

    Ok(())
}

#[test]
fn test_completion_clears_progress() -> Result<()> {
    let store = memory_store();
    store.save(MOVIE, 50_000);
    let scenario = Scenario::builder().progress_store(store.clone()).build()?;
    scenario.session.set_url(MOVIE, HashMap::new());

    scenario.start();
    scenario.advance(10_000);
    assert_eq!(scenario.state(), PlaybackState::Completed);
    assert_eq!(store.get(MOVIE), 0);
    assert!(store.is_empty());

    Ok(())
}

#[test]
fn test_skip_position_when_play() -> Result<()> {
    let scenario = Scenario::new()?;
    scenario.session.skip_position_when_play(42_000);
    scenario.start();

    assert_eq!(scenario.handle().map(|h| h.position()), Some(42_000));
    Ok(())
}

#[test]
fn test_file_progress_survives_sessions() -> Result<()> {
    let fixture = TestFixture::new()?;

    {
        let store = Rc::new(FileProgressStore::open(fixture.progress_path())?);
        let scenario = Scenario::builder().progress_store(store).build()?;
        scenario.session.set_url(MOVIE, HashMap::new());
        scenario.start();
        scenario.advance(12_000);
        scenario.session.release();
    }
    assert!(fixture.progress_path().exists());

    let reopened = Rc::new(FileProgressStore::open(fixture.progress_path())?);
    assert_eq!(reopened.get(MOVIE), 12_000);

    let scenario = Scenario::builder().progress_store(reopened).build()?;
    scenario.session.set_url(MOVIE, HashMap::new());
    scenario.start();
    assert_eq!(scenario.handle().map(|h| h.position()), Some(12_000));

    Ok(())
}

#[test]
fn test_focus_loss_pauses_and_gain_resumes() -> Result<()> {
    let scenario = Scenario::new()?;
    scenario.start();
    assert_eq!(scenario.focus.request_count(), 1);

    scenario.focus.notify(FocusChange::Loss);
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Paused);

    scenario.focus.notify(FocusChange::Gain);
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Playing);
    assert_eq!(scenario.handle().map(|h| h.volume()), Some((1.0, 1.0)));

    Ok(())
}

#[test]
fn test_focus_duck_lowers_volume() -> Result<()> {
    let scenario = Scenario::new()?;
    scenario.start();

    scenario.focus.notify(FocusChange::LossTransientCanDuck);
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Playing);
    assert_eq!(scenario.handle().map(|h| h.volume()), Some((0.1, 0.1)));

    Ok(())
}

#[test]
fn test_duck_keeps_mute() -> Result<()> {
    let scenario = Scenario::new()?;
    scenario.start();
    scenario.session.set_mute(true);

    scenario.focus.notify(FocusChange::LossTransientCanDuck);
    scenario.looper.run_pending();
    assert_eq!(scenario.handle().map(|h| h.volume()), Some((0.0, 0.0)));

    Ok(())
}

#[test]
fn test_focus_disabled_never_requests() -> Result<()> {
    let scenario = Scenario::new()?;
    scenario.session.set_enable_audio_focus(false);
    scenario.start();

    assert_eq!(scenario.state(), PlaybackState::Playing);
    assert_eq!(scenario.focus.request_count(), 0);
    Ok(())
}

#[test]
#[serial]
fn test_env_disables_audio_focus() -> Result<()> {
    let fixture = TestFixture::new()?;
    let path = fixture.path().join("config.toml");
    PlayerConfig::default().save_to(&path)?;

    std::env::set_var("VIDEOVIEW_ENABLE_AUDIO_FOCUS", "false");
    let config = PlayerConfig::load_from(&path);
    std::env::remove_var("VIDEOVIEW_ENABLE_AUDIO_FOCUS");

    let scenario = Scenario::builder().config(config?).build()?;
    scenario.session.set_url(MOVIE, HashMap::new());
    scenario.start();
    assert_eq!(scenario.focus.request_count(), 0);
    Ok(())
}

#[test]
fn test_backend_error_then_retry() -> Result<()> {
    let scenario = Scenario::new()?;
    scenario.start();

    let handle = scenario.handle().expect("backend created");
    handle.emit(BackendEvent::Error);
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Error);
    assert!(!scenario.platform.keep_screen_on());
    assert_eq!(scenario.session.duration(), 0);

    scenario.session.replay(false);
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Playing);

    Ok(())
}

#[test]
fn test_prepare_failure_reports_error() -> Result<()> {
    let media = SimulatedMedia {
        fail_prepare: true,
        ..SimulatedMedia::default()
    };
    let scenario = Scenario::builder().media(media).build()?;
    scenario.session.set_url(MOVIE, HashMap::new());

    scenario.start();
    assert_eq!(scenario.state(), PlaybackState::Error);
    Ok(())
}

#[test]
fn test_buffering_round_trip() -> Result<()> {
    let scenario = Scenario::new()?;
    scenario.start();
    let handle = scenario.handle().expect("backend created");

    handle.emit(BackendEvent::Info {
        code: InfoCode::BufferingStart,
        extra: 0,
    });
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Buffering);

    handle.emit(BackendEvent::Info {
        code: InfoCode::BufferingEnd,
        extra: 0,
    });
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Buffered);
    assert!(scenario.session.is_playing());

    Ok(())
}

#[test]
fn test_repeated_rendering_start_is_ignored() -> Result<()> {
    let media = SimulatedMedia {
        repeat_rendering_start: true,
        ..SimulatedMedia::default()
    };
    let scenario = Scenario::builder().media(media).build()?;
    scenario.session.set_url(MOVIE, HashMap::new());
    scenario.start();
    scenario.session.pause();
    scenario.recorder.clear();

    // A native player re-reporting the first frame must not undo the pause
    scenario
        .handle()
        .expect("backend created")
        .emit(BackendEvent::Info {
            code: InfoCode::RenderingStart,
            extra: 0,
        });
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Paused);
    assert!(scenario.recorder.states().is_empty());

    Ok(())
}

#[test]
fn test_invisible_container_pauses_on_first_frame() -> Result<()> {
    let scenario = Scenario::new()?;
    scenario.platform.set_visible(false);
    scenario.start();

    assert_eq!(scenario.state(), PlaybackState::Paused);
    assert_eq!(scenario.recorder.states().last(), Some(&PlaybackState::Paused));
    assert!(scenario.recorder.states().contains(&PlaybackState::Playing));
    Ok(())
}

#[test]
fn test_events_from_released_backend_are_dropped() -> Result<()> {
    let scenario = Scenario::new()?;
    scenario.start();
    let first = scenario.handle().expect("backend created");
    let generation = scenario.session.generation();

    // Queued before release, delivered after
    first.emit(BackendEvent::Error);
    scenario.session.release();
    scenario.looper.run_pending();
    assert_eq!(scenario.state(), PlaybackState::Idle);
    assert!(scenario.session.generation() > generation);

    if let Some(worker) = scenario.session.take_release_worker() {
        worker.join().expect("release worker");
    }
    assert!(first.is_released());

    scenario.start();
    assert_eq!(scenario.state(), PlaybackState::Playing);
    assert_eq!(scenario.factory.created_count(), 2);

    Ok(())
}

#[test]
fn test_metered_network_waits_for_consent() -> Result<()> {
    let scenario = Scenario::builder().build()?;
    scenario.platform.set_network(NetworkType::Mobile);
    scenario
        .session
        .set_url("https://cdn.example.com/clip.m3u8", HashMap::new());

    scenario.start();
    assert_eq!(scenario.state(), PlaybackState::StartAborted);
    assert_eq!(scenario.factory.created_count(), 0);

    scenario.ctx.set_play_on_mobile_network(true);
    scenario.start();
    assert_eq!(scenario.state(), PlaybackState::Playing);
    Ok(())
}

#[test]
fn test_registry_replaces_and_releases() -> Result<()> {
    let scenario = Scenario::new()?;
    let registry = SessionRegistry::new();
    scenario.start();
    registry.add("feed", scenario.session.clone());

    let other = VideoSession::new(scenario.ctx.clone());
    other.set_url("/sdcard/other.mp4", HashMap::new());
    registry.add("feed", other.clone());
    assert_eq!(scenario.state(), PlaybackState::Idle);
    assert_eq!(registry.len(), 1);
    assert!(registry
        .get("feed")
        .map_or(false, |s| Rc::ptr_eq(&s, &other)));

    registry.release_by_tag("feed", true);
    assert!(registry.is_empty());
    Ok(())
}
