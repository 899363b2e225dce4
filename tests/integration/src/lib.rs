//! Integration test utilities for VideoView
//!
//! This module provides common utilities for integration testing including:
//! - A scenario builder wiring a session to headless services
//! - Recording listeners and components
//! - Temporary directories for file-backed stores

use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;
use videoview::backend::{SimulatedBackendFactory, SimulatedHandle, SimulatedMedia};
use videoview::controller::{ControlComponent, ControlWrapper, Controller, StandardController};
use videoview::platform::{HeadlessAudioFocus, HeadlessPlatform};
use videoview::player::{
    DisplayMode, Looper, ManualClock, MemoryProgressStore, OnStateChangeListener, PlaybackState,
    PlayerContext, PlayerControl, ProgressStore, VideoSession,
};
use videoview::PlayerConfig;

/// Test fixture owning a temporary directory
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Get the path to the temporary directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Location for a progress file inside the fixture
    pub fn progress_path(&self) -> PathBuf {
        self.path().join("progress.json")
    }
}

/// Builder for a [`Scenario`]
pub struct ScenarioBuilder {
    config: PlayerConfig,
    media: SimulatedMedia,
    store: Option<Rc<dyn ProgressStore>>,
}

impl ScenarioBuilder {
    pub fn config(mut self, config: PlayerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn media(mut self, media: SimulatedMedia) -> Self {
        self.media = media;
        self
    }

    pub fn progress_store(mut self, store: Rc<dyn ProgressStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<Scenario> {
        let clock = Rc::new(ManualClock::new());
        let looper = Looper::with_clock(clock.clone());
        let platform = Rc::new(HeadlessPlatform::new());
        let focus = Rc::new(HeadlessAudioFocus::new());
        let factory = SimulatedBackendFactory::new(self.media);

        let mut builder = PlayerContext::builder()
            .looper(looper.clone())
            .config(self.config)
            .platform(platform.clone())
            .container_host(platform.clone())
            .focus_system(focus.clone())
            .backend_factory(Rc::new(factory.clone()));
        if let Some(store) = self.store {
            builder = builder.progress_store(store);
        }
        let ctx = builder.build()?;
        let session = VideoSession::new(ctx.clone());
        let recorder = Rc::new(StateRecorder::default());
        session.add_on_state_change_listener(recorder.clone());

        Ok(Scenario {
            ctx,
            clock,
            looper,
            platform,
            focus,
            factory,
            session,
            recorder,
        })
    }
}

/// A session wired to headless services and a simulated backend
///
/// Time only moves through [`Scenario::advance`].
pub struct Scenario {
    pub ctx: Rc<PlayerContext>,
    pub clock: Rc<ManualClock>,
    pub looper: Looper,
    pub platform: Rc<HeadlessPlatform>,
    pub focus: Rc<HeadlessAudioFocus>,
    pub factory: SimulatedBackendFactory,
    pub session: Rc<VideoSession>,
    pub recorder: Rc<StateRecorder>,
}

impl Scenario {
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder {
            config: PlayerConfig::default(),
            media: SimulatedMedia::default(),
            store: None,
        }
    }

    /// Default scenario playing a local file
    pub fn new() -> Result<Self> {
        let scenario = Self::builder().build()?;
        scenario.session.set_url("/sdcard/movie.mp4", HashMap::new());
        Ok(scenario)
    }

    /// Attach a standard controller with the default component set
    pub fn standard_controller(&self) -> StandardController {
        let standard = StandardController::new(&self.ctx);
        self.session
            .set_video_controller(Some(standard.controller().clone()));
        standard
    }

    /// Attach a bare controller holding a [`ProbeComponent`]
    pub fn probed_controller(&self) -> (Rc<Controller>, Rc<ProbeComponent>) {
        let controller = Controller::new(&self.ctx);
        let probe = Rc::new(ProbeComponent::default());
        controller.add_control_component(probe.clone(), false);
        self.session.set_video_controller(Some(controller.clone()));
        (controller, probe)
    }

    /// Start and deliver everything the backend posted
    pub fn start(&self) {
        self.session.start();
        self.looper.run_pending();
    }

    /// Move both the media clock and the owner clock forward
    pub fn advance(&self, ms: u64) {
        if let Some(handle) = self.handle() {
            handle.advance(ms);
        }
        self.clock.advance(ms);
        self.looper.run_pending();
    }

    pub fn handle(&self) -> Option<SimulatedHandle> {
        self.factory.last_handle()
    }

    pub fn state(&self) -> PlaybackState {
        self.session.play_state()
    }
}

/// Listener recording every transition it sees
#[derive(Default)]
pub struct StateRecorder {
    states: RefCell<Vec<PlaybackState>>,
    modes: RefCell<Vec<DisplayMode>>,
}

impl StateRecorder {
    pub fn states(&self) -> Vec<PlaybackState> {
        self.states.borrow().clone()
    }

    pub fn modes(&self) -> Vec<DisplayMode> {
        self.modes.borrow().clone()
    }

    pub fn clear(&self) {
        self.states.borrow_mut().clear();
        self.modes.borrow_mut().clear();
    }
}

impl OnStateChangeListener for StateRecorder {
    fn on_player_state_changed(&self, mode: DisplayMode) {
        self.modes.borrow_mut().push(mode);
    }

    fn on_play_state_changed(&self, state: PlaybackState) {
        self.states.borrow_mut().push(state);
    }
}

/// Control component recording what the controller tells it
#[derive(Default)]
pub struct ProbeComponent {
    wrapper: RefCell<Option<ControlWrapper>>,
    visibility: RefCell<Vec<bool>>,
    progress: RefCell<Vec<(u64, u64)>>,
    locks: RefCell<Vec<bool>>,
}

impl ProbeComponent {
    pub fn wrapper(&self) -> Option<ControlWrapper> {
        self.wrapper.borrow().clone()
    }

    pub fn visibility(&self) -> Vec<bool> {
        self.visibility.borrow().clone()
    }

    /// Last (duration, position) pair reported
    pub fn last_progress(&self) -> Option<(u64, u64)> {
        self.progress.borrow().last().copied()
    }

    pub fn progress_reports(&self) -> usize {
        self.progress.borrow().len()
    }

    pub fn locks(&self) -> Vec<bool> {
        self.locks.borrow().clone()
    }
}

impl ControlComponent for ProbeComponent {
    fn bind(&self, wrapper: ControlWrapper) {
        *self.wrapper.borrow_mut() = Some(wrapper);
    }

    fn on_visibility_changed(&self, visible: bool, _animated: bool) {
        self.visibility.borrow_mut().push(visible);
    }

    fn on_progress(&self, duration: u64, position: u64) {
        self.progress.borrow_mut().push((duration, position));
    }

    fn on_lock_state_changed(&self, locked: bool) {
        self.locks.borrow_mut().push(locked);
    }
}

/// Memory store shared between a scenario and the test body
pub fn memory_store() -> Rc<MemoryProgressStore> {
    Rc::new(MemoryProgressStore::new())
}
