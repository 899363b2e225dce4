//! The playback session
//!
//! A [`VideoSession`] is the root of one player instance. It owns the
//! playback and display state, the backend adapter, the render surface,
//! the audio focus arbiter and its controller, and it is the only thing
//! that ever changes [`PlaybackState`] or [`DisplayMode`].
//!
//! All methods run on the owner thread. Backend events, focus changes and
//! sensor readings arrive through the looper and are handled in
//! [`InboundHandler::handle_inbound`].

use crate::backend::{
    BackendAdapter, BackendEvent, EventSink, InfoCode, LocalDescriptor, MediaSource,
};
use crate::controller::Controller;
use crate::platform::{ContainerHost, ContainerParent, Platform};
use crate::player::audio_focus::{AudioFocusArbiter, AudioFocusListener, FocusChange};
use crate::player::context::PlayerContext;
use crate::player::looper::{Inbound, InboundHandler, PostHandle};
use crate::player::{DisplayMode, OnStateChangeListener, PlaybackState, PlayerControl};
use crate::surface::{RenderSurface, ScaleMode, Screenshot};
use crate::utils::config::PlayerConfig;
use log::{debug, error, info, warn};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Mutable session state kept behind one `RefCell`
///
/// Never borrowed across a state fan-out.
struct SessionInner {
    source: Option<MediaSource>,
    adapter: Option<BackendAdapter>,
    surface: Option<Box<dyn RenderSurface>>,
    focus: Option<AudioFocusArbiter>,

    /// Restore position before prepare, last known position afterwards
    current_position: u64,
    video_size: (u32, u32),
    muted: bool,
    looping: bool,
    enable_audio_focus: bool,
    scale_mode: ScaleMode,
    mirrored: bool,
    tiny_screen_size: Option<(u32, u32)>,
    release_worker: Option<JoinHandle<()>>,
}

impl SessionInner {
    fn new(config: &PlayerConfig) -> Self {
        Self {
            source: None,
            adapter: None,
            surface: None,
            focus: None,
            current_position: 0,
            video_size: (0, 0),
            muted: false,
            looping: config.playback.looping,
            enable_audio_focus: config.playback.enable_audio_focus,
            scale_mode: config.display.screen_scale,
            mirrored: false,
            tiny_screen_size: None,
            release_worker: None,
        }
    }

    fn progress_key(&self) -> Option<String> {
        self.source
            .as_ref()
            .and_then(|s| s.progress_key())
            .map(str::to_owned)
    }
}

/// One player instance
pub struct VideoSession {
    weak_self: Weak<VideoSession>,
    ctx: Rc<PlayerContext>,
    host: Rc<dyn ContainerHost>,
    post: PostHandle,
    play_state: Cell<PlaybackState>,
    display_mode: Cell<DisplayMode>,
    generation: Cell<u64>,
    inner: RefCell<SessionInner>,
    controller: RefCell<Option<Rc<Controller>>>,
    listeners: RefCell<Vec<Rc<dyn OnStateChangeListener>>>,
}

impl VideoSession {
    /// Create a session hosted by the context's container host
    pub fn new(ctx: Rc<PlayerContext>) -> Rc<Self> {
        let host = ctx.container_host().clone();
        Self::with_container_host(ctx, host)
    }

    /// Create a session whose container lives in `host`
    pub fn with_container_host(ctx: Rc<PlayerContext>, host: Rc<dyn ContainerHost>) -> Rc<Self> {
        let inner = SessionInner::new(ctx.config());
        Rc::new_cyclic(|weak_self: &Weak<VideoSession>| {
            let handler: Weak<dyn InboundHandler> = weak_self.clone();
            let post = ctx.looper().register(handler);
            Self {
                weak_self: weak_self.clone(),
                ctx,
                host,
                post,
                play_state: Cell::new(PlaybackState::Idle),
                display_mode: Cell::new(DisplayMode::Normal),
                generation: Cell::new(0),
                inner: RefCell::new(inner),
                controller: RefCell::new(None),
                listeners: RefCell::new(Vec::new()),
            }
        })
    }

    fn platform(&self) -> &Rc<dyn Platform> {
        self.ctx.platform()
    }

    /// Play media from a locator
    ///
    /// # Arguments
    ///
    /// * `url` - Media locator; a locator without a scheme is a local path
    /// * `headers` - Extra request headers for network sources
    pub fn set_url<S: Into<String>>(&self, url: S, headers: HashMap<String, String>) {
        self.set_source(MediaSource::Url {
            url: url.into(),
            headers,
        });
    }

    /// Play media from an open local file
    pub fn set_descriptor(&self, descriptor: Arc<LocalDescriptor>) {
        self.set_source(MediaSource::Descriptor(descriptor));
    }

    pub fn set_source(&self, source: MediaSource) {
        self.inner.borrow_mut().source = Some(source);
    }

    pub fn source(&self) -> Option<MediaSource> {
        self.inner.borrow().source.clone()
    }

    /// Position to start from on the next first play
    ///
    /// A position remembered by the progress store takes precedence.
    pub fn skip_position_when_play(&self, position_ms: u64) {
        self.inner.borrow_mut().current_position = position_ms;
    }

    pub fn set_volume(&self, left: f32, right: f32) {
        if let Some(adapter) = self.inner.borrow_mut().adapter.as_mut() {
            adapter.set_volume(left, right);
        }
    }

    pub fn set_looping(&self, looping: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.looping = looping;
        if let Some(adapter) = inner.adapter.as_mut() {
            adapter.set_looping(looping);
        }
    }

    /// Whether the next first play takes audio focus
    pub fn set_enable_audio_focus(&self, enable: bool) {
        self.inner.borrow_mut().enable_audio_focus = enable;
    }

    /// Size of the floating tiny-screen box
    ///
    /// Defaults to half the screen width at 16:9.
    pub fn set_tiny_screen_size(&self, width: u32, height: u32) {
        self.inner.borrow_mut().tiny_screen_size = Some((width, height));
    }

    fn tiny_screen_size(&self) -> (u32, u32) {
        if let Some(size) = self.inner.borrow().tiny_screen_size {
            return size;
        }
        let width = self.platform().screen_size().0 / 2;
        (width, width * 9 / 16)
    }

    /// Attach a controller, detaching the previous one
    pub fn set_video_controller(&self, controller: Option<Rc<Controller>>) {
        let previous = self.controller.replace(controller.clone());
        if let Some(previous) = previous {
            previous.unbind_player();
        }
        if let Some(controller) = controller {
            let player: Weak<dyn PlayerControl> = self.weak_self.clone();
            controller.bind_player(player);
        }
    }

    pub fn video_controller(&self) -> Option<Rc<Controller>> {
        self.controller.borrow().clone()
    }

    pub fn add_on_state_change_listener(&self, listener: Rc<dyn OnStateChangeListener>) {
        let mut listeners = self.listeners.borrow_mut();
        if !listeners.iter().any(|l| same_listener(l, &listener)) {
            listeners.push(listener);
        }
    }

    pub fn remove_on_state_change_listener(&self, listener: &Rc<dyn OnStateChangeListener>) {
        self.listeners.borrow_mut().retain(|l| !same_listener(l, listener));
    }

    pub fn clear_on_state_change_listeners(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Back navigation, forwarded to the controller
    ///
    /// # Returns
    ///
    /// True when the event was consumed
    pub fn on_back_pressed(&self) -> bool {
        let controller = self.controller.borrow().clone();
        controller.map_or(false, |c| c.on_back_pressed())
    }

    /// Resume playback paused by [`PlayerControl::pause`]
    pub fn resume(&self) {
        if !self.play_state.get().is_playable() {
            return;
        }
        let resumed = {
            let mut inner = self.inner.borrow_mut();
            match inner.adapter.as_mut() {
                Some(adapter) if !adapter.is_playing() => {
                    adapter.start();
                    true
                }
                _ => false,
            }
        };
        if resumed {
            self.set_play_state(PlaybackState::Playing);
            self.request_focus();
            self.platform().set_keep_screen_on(true);
        }
    }

    /// Stop playback and free the backend, surface and focus
    ///
    /// Backend teardown continues on a background thread; the session is
    /// `Idle` as soon as this returns.
    pub fn release(&self) {
        if self.play_state.get() == PlaybackState::Idle {
            return;
        }
        info!("releasing session");
        self.refresh_position();

        let (adapter, surface, source, focus) = {
            let mut inner = self.inner.borrow_mut();
            (
                inner.adapter.take(),
                inner.surface.take(),
                inner.source.clone(),
                inner.focus.take(),
            )
        };

        if let Some(adapter) = adapter {
            let worker = adapter.release();
            self.inner.borrow_mut().release_worker = worker;
        }
        if let Some(mut surface) = surface {
            surface.release();
        }
        if let Some(MediaSource::Descriptor(descriptor)) = &source {
            descriptor.close();
        }
        if let Some(mut focus) = focus {
            focus.abandon_focus();
        }
        self.platform().set_keep_screen_on(false);
        self.save_progress();

        {
            let mut inner = self.inner.borrow_mut();
            inner.current_position = 0;
            inner.video_size = (0, 0);
        }
        self.generation.set(self.generation.get() + 1);
        self.set_play_state(PlaybackState::Idle);
    }

    /// Persist the current position for the current source
    pub fn save_progress(&self) {
        let store = match self.ctx.progress_store() {
            Some(store) => store.clone(),
            None => return,
        };
        self.refresh_position();
        let (key, position) = {
            let inner = self.inner.borrow();
            (inner.progress_key(), inner.current_position)
        };
        if let Some(key) = key {
            if position > 0 {
                debug!("saving progress {}ms for {}", position, key);
                store.save(&key, position);
            }
        }
    }

    /// Measure the surface for the given bounds
    pub fn measure(&self, width: u32, height: u32) -> (u32, u32) {
        match self.inner.borrow_mut().surface.as_mut() {
            Some(surface) => surface.measure(width, height),
            None => (width, height),
        }
    }

    /// Generation of the live backend instance
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Worker tearing down the last released backend, if still held
    pub fn take_release_worker(&self) -> Option<JoinHandle<()>> {
        self.inner.borrow_mut().release_worker.take()
    }

    fn is_in_playback_state(&self) -> bool {
        self.play_state.get().is_playable() && self.inner.borrow().adapter.is_some()
    }

    fn refresh_position(&self) {
        if !self.play_state.get().is_playable() {
            return;
        }
        let mut inner = self.inner.borrow_mut();
        if let Some(position) = inner.adapter.as_ref().map(|a| a.current_position()) {
            inner.current_position = position;
        }
    }

    fn show_net_warning(&self) -> bool {
        let remote = matches!(&self.inner.borrow().source, Some(source) if !source.is_local());
        remote && self.platform().network_type().is_metered() && !self.ctx.play_on_mobile_network()
    }

    fn start_play(&self) -> bool {
        if self.show_net_warning() {
            info!("metered network, waiting for consent before playing");
            self.set_play_state(PlaybackState::StartAborted);
            return false;
        }

        let (enable_focus, key) = {
            let inner = self.inner.borrow();
            (inner.enable_audio_focus, inner.progress_key())
        };
        if enable_focus {
            let listener = AudioFocusListener::new(self.post.clone());
            let arbiter = AudioFocusArbiter::new(self.ctx.focus_system().clone(), listener);
            self.inner.borrow_mut().focus = Some(arbiter);
        }
        if let (Some(store), Some(key)) = (self.ctx.progress_store(), key) {
            let saved = store.get(&key);
            if saved > 0 {
                debug!("restoring {} to {}ms", key, saved);
                self.inner.borrow_mut().current_position = saved;
            }
        }

        if !self.init_player() {
            self.set_play_state(PlaybackState::Error);
            return false;
        }
        self.add_display();
        self.start_prepare(false)
    }

    fn init_player(&self) -> bool {
        let backend = match self.ctx.backend_factory().create() {
            Ok(backend) => backend,
            Err(e) => {
                error!("could not create a media backend: {}", e);
                return false;
            }
        };

        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        let mut adapter = BackendAdapter::new(backend, EventSink::new(self.post.clone(), generation));
        adapter.init();

        let mut inner = self.inner.borrow_mut();
        adapter.set_looping(inner.looping);
        if inner.muted {
            adapter.set_volume(0.0, 0.0);
        }
        if let Some(previous) = inner.adapter.replace(adapter) {
            inner.release_worker = previous.release();
        }
        debug!("backend generation {} ready", generation);
        true
    }

    fn add_display(&self) {
        let created = self.ctx.surface_factory().create();
        let mut inner = self.inner.borrow_mut();
        let SessionInner {
            adapter,
            surface,
            scale_mode,
            mirrored,
            ..
        } = &mut *inner;

        if let Some(mut previous) = surface.take() {
            previous.release();
        }
        match created {
            Ok(mut created) => {
                if let Some(adapter) = adapter.as_mut() {
                    created.attach(adapter);
                }
                created.set_scale_mode(*scale_mode);
                created.set_mirrored(*mirrored);
                *surface = Some(created);
            }
            Err(e) => {
                warn!("no render surface, playing without display: {}", e);
                if let Some(adapter) = adapter.as_mut() {
                    adapter.set_display(None);
                }
            }
        }
    }

    fn start_prepare(&self, reset: bool) -> bool {
        let prepared = {
            let mut inner = self.inner.borrow_mut();
            let SessionInner {
                adapter,
                source,
                looping,
                ..
            } = &mut *inner;
            match (adapter.as_mut(), source.as_ref()) {
                (Some(adapter), Some(source)) => {
                    if reset {
                        adapter.reset();
                        adapter.set_looping(*looping);
                    }
                    if adapter.set_source(source) {
                        adapter.prepare_async();
                    }
                    true
                }
                (None, _) => {
                    warn!("no backend to prepare");
                    false
                }
                (_, None) => {
                    warn!("no media source set");
                    false
                }
            }
        };

        if prepared {
            self.set_play_state(PlaybackState::Preparing);
            self.set_player_state(self.display_mode.get());
        } else {
            self.set_play_state(PlaybackState::Error);
        }
        prepared
    }

    fn start_in_playback_state(&self) {
        let started = match self.inner.borrow_mut().adapter.as_mut() {
            Some(adapter) => {
                adapter.start();
                true
            }
            None => false,
        };
        if started {
            self.set_play_state(PlaybackState::Playing);
        }
    }

    /// Pause the backend without touching focus or keep-awake
    fn pause_playback(&self) -> bool {
        if !self.play_state.get().is_playable() {
            return false;
        }
        let paused = {
            let mut inner = self.inner.borrow_mut();
            match inner.adapter.as_mut() {
                Some(adapter) if adapter.is_playing() => {
                    adapter.pause();
                    true
                }
                _ => false,
            }
        };
        if paused {
            self.set_play_state(PlaybackState::Paused);
        }
        paused
    }

    fn request_focus(&self) {
        if let Some(focus) = self.inner.borrow_mut().focus.as_mut() {
            focus.request_focus();
        }
    }

    fn abandon_focus(&self) {
        if let Some(focus) = self.inner.borrow_mut().focus.as_mut() {
            focus.abandon_focus();
        }
    }

    fn with_surface<F: FnOnce(&mut dyn RenderSurface)>(&self, f: F) {
        if let Some(surface) = self.inner.borrow_mut().surface.as_mut() {
            f(surface.as_mut());
        }
    }

    fn set_play_state(&self, state: PlaybackState) {
        let previous = self.play_state.replace(state);
        if previous != state {
            info!("play state {} -> {}", previous, state);
        }

        let controller = self.controller.borrow().clone();
        if let Some(controller) = controller {
            controller.set_play_state(state);
        }
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener.on_play_state_changed(state);
        }
    }

    fn set_player_state(&self, mode: DisplayMode) {
        let previous = self.display_mode.replace(mode);
        if previous != mode {
            info!("display mode {} -> {}", previous, mode);
        }

        let controller = self.controller.borrow().clone();
        if let Some(controller) = controller {
            controller.set_player_state(mode);
        }
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener.on_player_state_changed(mode);
        }
    }

    fn on_backend_event(&self, generation: u64, event: BackendEvent) {
        let admitted = {
            let mut inner = self.inner.borrow_mut();
            match inner.adapter.as_mut() {
                Some(adapter) if adapter.generation() == generation => adapter.admit(&event),
                _ => {
                    debug!("dropping {:?} from stale backend generation {}", event, generation);
                    return;
                }
            }
        };
        if !admitted {
            return;
        }

        match event {
            BackendEvent::Prepared => self.on_prepared(),
            BackendEvent::Error => {
                warn!("backend reported an error");
                self.platform().set_keep_screen_on(false);
                self.set_play_state(PlaybackState::Error);
            }
            BackendEvent::Completion => {
                self.platform().set_keep_screen_on(false);
                let key = {
                    let mut inner = self.inner.borrow_mut();
                    inner.current_position = 0;
                    inner.progress_key()
                };
                if let (Some(store), Some(key)) = (self.ctx.progress_store(), key) {
                    store.save(&key, 0);
                }
                self.set_play_state(PlaybackState::Completed);
            }
            BackendEvent::Info { code, extra } => match code {
                InfoCode::BufferingStart => self.set_play_state(PlaybackState::Buffering),
                InfoCode::BufferingEnd => self.set_play_state(PlaybackState::Buffered),
                InfoCode::RenderingStart => {
                    self.set_play_state(PlaybackState::Playing);
                    if !self.host.is_visible() {
                        debug!("container not visible, pausing");
                        self.pause();
                    }
                }
                InfoCode::RotationChanged => {
                    let degrees = extra.rem_euclid(360) as u32;
                    self.with_surface(|s| s.set_rotation(degrees));
                }
                InfoCode::Other(code) => debug!("backend info {} ({})", code, extra),
            },
            BackendEvent::VideoSizeChanged { width, height } => {
                let mut inner = self.inner.borrow_mut();
                inner.video_size = (width, height);
                let scale_mode = inner.scale_mode;
                if let Some(surface) = inner.surface.as_mut() {
                    surface.set_scale_mode(scale_mode);
                    surface.set_video_size(width, height);
                }
            }
        }
    }

    fn on_prepared(&self) {
        self.set_play_state(PlaybackState::Prepared);
        if self.play_state.get() != PlaybackState::Prepared {
            return;
        }

        let mut inner = self.inner.borrow_mut();
        let position = inner.current_position;
        if let Some(adapter) = inner.adapter.as_mut() {
            if position > 0 {
                debug!("seeking to restored position {}ms", position);
                adapter.seek_to(position);
            }
            adapter.start();
        }
    }

    fn on_focus_change(&self, change: FocusChange) {
        let playing = self.is_playing();
        let actions = {
            let mut inner = self.inner.borrow_mut();
            let muted = inner.muted;
            match inner.focus.as_mut() {
                Some(focus) => focus.on_focus_change(change, playing, muted),
                None => {
                    debug!("focus change {:?} without an arbiter", change);
                    return;
                }
            }
        };

        if let Some(volume) = actions.volume {
            self.set_volume(volume, volume);
        }
        if actions.pause {
            self.pause_playback();
        }
        if actions.resume {
            self.start();
        }
    }
}

fn same_listener(a: &Rc<dyn OnStateChangeListener>, b: &Rc<dyn OnStateChangeListener>) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

impl PlayerControl for VideoSession {
    fn start(&self) {
        let started = match self.play_state.get() {
            PlaybackState::Idle | PlaybackState::StartAborted => self.start_play(),
            PlaybackState::Preparing | PlaybackState::Completed | PlaybackState::Error => {
                debug!("start ignored in {}", self.play_state.get());
                false
            }
            _ => {
                self.start_in_playback_state();
                true
            }
        };
        if started {
            self.platform().set_keep_screen_on(true);
            self.request_focus();
        }
    }

    fn pause(&self) {
        if self.pause_playback() {
            self.abandon_focus();
            self.platform().set_keep_screen_on(false);
        }
    }

    fn duration(&self) -> u64 {
        if !self.is_in_playback_state() {
            return 0;
        }
        self.inner.borrow().adapter.as_ref().map_or(0, |a| a.duration())
    }

    fn current_position(&self) -> u64 {
        if !self.is_in_playback_state() {
            return 0;
        }
        self.refresh_position();
        self.inner.borrow().current_position
    }

    fn seek_to(&self, position_ms: u64) {
        if !self.is_in_playback_state() {
            return;
        }
        if let Some(adapter) = self.inner.borrow_mut().adapter.as_mut() {
            adapter.seek_to(position_ms);
        }
    }

    fn is_playing(&self) -> bool {
        self.is_in_playback_state()
            && self.inner.borrow().adapter.as_ref().map_or(false, |a| a.is_playing())
    }

    fn buffered_percentage(&self) -> u8 {
        self.inner
            .borrow()
            .adapter
            .as_ref()
            .map_or(0, |a| a.buffered_percentage())
    }

    fn start_full_screen(&self) {
        if self.display_mode.get() == DisplayMode::FullScreen {
            return;
        }
        if !self.host.has_decor() {
            warn!("no decoration host, cannot enter full screen");
            return;
        }
        self.host.set_system_bars_hidden(true);
        self.host.move_container(ContainerParent::Decor);
        self.set_player_state(DisplayMode::FullScreen);
    }

    fn stop_full_screen(&self) {
        if self.display_mode.get() != DisplayMode::FullScreen {
            return;
        }
        self.host.set_system_bars_hidden(false);
        self.host.move_container(ContainerParent::Root);
        self.set_player_state(DisplayMode::Normal);
    }

    fn is_full_screen(&self) -> bool {
        self.display_mode.get() == DisplayMode::FullScreen
    }

    fn set_mute(&self, mute: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.muted = mute;
        if let Some(adapter) = inner.adapter.as_mut() {
            let volume = if mute { 0.0 } else { 1.0 };
            adapter.set_volume(volume, volume);
        }
    }

    fn is_mute(&self) -> bool {
        self.inner.borrow().muted
    }

    fn set_screen_scale(&self, mode: ScaleMode) {
        self.inner.borrow_mut().scale_mode = mode;
        self.with_surface(|s| s.set_scale_mode(mode));
    }

    fn set_speed(&self, speed: f32) {
        if !self.is_in_playback_state() {
            return;
        }
        if let Some(adapter) = self.inner.borrow_mut().adapter.as_mut() {
            adapter.set_speed(speed);
        }
    }

    fn speed(&self) -> f32 {
        if !self.is_in_playback_state() {
            return 1.0;
        }
        self.inner.borrow().adapter.as_ref().map_or(1.0, |a| a.speed())
    }

    fn tcp_speed(&self) -> u64 {
        self.inner.borrow().adapter.as_ref().map_or(0, |a| a.tcp_speed())
    }

    fn replay(&self, reset_position: bool) {
        if reset_position {
            self.inner.borrow_mut().current_position = 0;
        }
        if self.inner.borrow().adapter.is_none() {
            self.start();
            return;
        }
        self.add_display();
        self.start_prepare(true);
        self.platform().set_keep_screen_on(true);
    }

    fn set_mirror_rotation(&self, enable: bool) {
        self.inner.borrow_mut().mirrored = enable;
        self.with_surface(|s| s.set_mirrored(enable));
    }

    fn screenshot(&self) -> Option<Screenshot> {
        self.inner.borrow().surface.as_ref().and_then(|s| s.screenshot())
    }

    fn video_size(&self) -> (u32, u32) {
        self.inner.borrow().video_size
    }

    fn set_rotation(&self, degrees: u32) {
        self.with_surface(|s| s.set_rotation(degrees));
    }

    fn start_tiny_screen(&self) {
        if self.display_mode.get() == DisplayMode::TinyScreen {
            return;
        }
        let (width, height) = self.tiny_screen_size();
        self.host.move_container(ContainerParent::ContentOverlay { width, height });
        self.set_player_state(DisplayMode::TinyScreen);
    }

    fn stop_tiny_screen(&self) {
        if self.display_mode.get() != DisplayMode::TinyScreen {
            return;
        }
        self.host.move_container(ContainerParent::Root);
        self.set_player_state(DisplayMode::Normal);
    }

    fn is_tiny_screen(&self) -> bool {
        self.display_mode.get() == DisplayMode::TinyScreen
    }

    fn play_state(&self) -> PlaybackState {
        self.play_state.get()
    }

    fn display_mode(&self) -> DisplayMode {
        self.display_mode.get()
    }

    fn set_play_on_mobile_network(&self, allow: bool) {
        self.ctx.set_play_on_mobile_network(allow);
    }
}

impl InboundHandler for VideoSession {
    fn handle_inbound(&self, message: Inbound) {
        match message {
            Inbound::Backend { generation, event } => self.on_backend_event(generation, event),
            Inbound::AudioFocus(change) => self.on_focus_change(change),
            Inbound::Orientation(sample) => debug!("session ignores orientation {:?}", sample),
        }
    }
}

impl Drop for VideoSession {
    fn drop(&mut self) {
        self.ctx.looper().unregister(self.post.target());
        if let Some(adapter) = self.inner.get_mut().adapter.take() {
            debug!("session dropped without release, tearing down backend");
            adapter.release();
        }
    }
}
