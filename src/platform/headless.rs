//! In-memory platform services
//!
//! `HeadlessPlatform` records every request the widget makes and answers
//! queries from settable state, so a session can run without a device.

use super::{AudioFocusSystem, ContainerHost, ContainerParent, NetworkType, Platform, ScreenOrientation};
use crate::player::audio_focus::{AudioFocusListener, FocusChange};
use parking_lot::Mutex;

#[derive(Debug)]
struct DeviceState {
    network: NetworkType,
    screen: (u32, u32),
    density: f32,
    volume: u32,
    max_volume: u32,
    brightness: f32,
    keep_screen_on: bool,
    orientation: ScreenOrientation,
    sensor_enabled: bool,
    cutout_height: Option<u32>,
    cutout_short_edges: bool,
    parent: ContainerParent,
    has_decor: bool,
    bars_hidden: bool,
    visible: bool,
    moves: Vec<ContainerParent>,
}

/// Platform and container host backed by plain state
#[derive(Debug)]
pub struct HeadlessPlatform {
    state: Mutex<DeviceState>,
}

impl HeadlessPlatform {
    /// A 1080x1920 portrait device on Wi-Fi with a 15-step volume
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DeviceState {
                network: NetworkType::Wifi,
                screen: (1080, 1920),
                density: 3.0,
                volume: 7,
                max_volume: 15,
                brightness: -1.0,
                keep_screen_on: false,
                orientation: ScreenOrientation::Portrait,
                sensor_enabled: false,
                cutout_height: None,
                cutout_short_edges: false,
                parent: ContainerParent::Root,
                has_decor: true,
                bars_hidden: false,
                visible: true,
                moves: Vec::new(),
            }),
        }
    }

    pub fn set_network(&self, network: NetworkType) {
        self.state.lock().network = network;
    }

    pub fn set_screen(&self, width: u32, height: u32, density: f32) {
        let mut state = self.state.lock();
        state.screen = (width, height);
        state.density = density;
    }

    pub fn set_volume_levels(&self, volume: u32, max_volume: u32) {
        let mut state = self.state.lock();
        state.max_volume = max_volume;
        state.volume = volume.min(max_volume);
    }

    pub fn set_cutout(&self, height: Option<u32>) {
        self.state.lock().cutout_height = height;
    }

    pub fn set_visible(&self, visible: bool) {
        self.state.lock().visible = visible;
    }

    pub fn set_has_decor(&self, has_decor: bool) {
        self.state.lock().has_decor = has_decor;
    }

    pub fn keep_screen_on(&self) -> bool {
        self.state.lock().keep_screen_on
    }

    pub fn sensor_enabled(&self) -> bool {
        self.state.lock().sensor_enabled
    }

    pub fn container_parent(&self) -> ContainerParent {
        self.state.lock().parent
    }

    /// Every container move, oldest first
    pub fn container_moves(&self) -> Vec<ContainerParent> {
        self.state.lock().moves.clone()
    }

    pub fn system_bars_hidden(&self) -> bool {
        self.state.lock().bars_hidden
    }

    pub fn cutout_short_edges(&self) -> bool {
        self.state.lock().cutout_short_edges
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HeadlessPlatform {
    fn network_type(&self) -> NetworkType {
        self.state.lock().network
    }

    fn screen_size(&self) -> (u32, u32) {
        self.state.lock().screen
    }

    fn density(&self) -> f32 {
        self.state.lock().density
    }

    fn stream_volume(&self) -> u32 {
        self.state.lock().volume
    }

    fn max_stream_volume(&self) -> u32 {
        self.state.lock().max_volume
    }

    fn set_stream_volume(&self, index: u32) {
        let mut state = self.state.lock();
        state.volume = index.min(state.max_volume);
    }

    fn window_brightness(&self) -> f32 {
        self.state.lock().brightness
    }

    fn set_window_brightness(&self, brightness: f32) {
        self.state.lock().brightness = brightness;
    }

    fn set_keep_screen_on(&self, keep_on: bool) {
        self.state.lock().keep_screen_on = keep_on;
    }

    fn requested_orientation(&self) -> ScreenOrientation {
        self.state.lock().orientation
    }

    fn set_requested_orientation(&self, orientation: ScreenOrientation) {
        self.state.lock().orientation = orientation;
    }

    fn set_orientation_sensor_enabled(&self, enabled: bool) {
        self.state.lock().sensor_enabled = enabled;
    }

    fn has_display_cutout(&self) -> bool {
        self.state.lock().cutout_height.is_some()
    }

    fn cutout_height(&self) -> u32 {
        self.state.lock().cutout_height.unwrap_or(0)
    }

    fn set_cutout_short_edges(&self, enabled: bool) {
        self.state.lock().cutout_short_edges = enabled;
    }
}

impl ContainerHost for HeadlessPlatform {
    fn move_container(&self, parent: ContainerParent) {
        let mut state = self.state.lock();
        state.parent = parent;
        state.moves.push(parent);
    }

    fn has_decor(&self) -> bool {
        self.state.lock().has_decor
    }

    fn set_system_bars_hidden(&self, hidden: bool) {
        self.state.lock().bars_hidden = hidden;
    }

    fn is_visible(&self) -> bool {
        self.state.lock().visible
    }
}

#[derive(Default)]
struct FocusState {
    grant: bool,
    held: bool,
    requests: u32,
    listener: Option<AudioFocusListener>,
}

/// Audio focus service that grants on request by default
///
/// Tests drive focus changes through [`HeadlessAudioFocus::notify`], which
/// behaves like the system calling back from its own thread.
pub struct HeadlessAudioFocus {
    state: Mutex<FocusState>,
}

impl HeadlessAudioFocus {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FocusState {
                grant: true,
                ..FocusState::default()
            }),
        }
    }

    /// Whether requests are granted immediately
    pub fn set_grant(&self, grant: bool) {
        self.state.lock().grant = grant;
    }

    pub fn is_held(&self) -> bool {
        self.state.lock().held
    }

    pub fn request_count(&self) -> u32 {
        self.state.lock().requests
    }

    /// Deliver a focus change to the most recent requester
    pub fn notify(&self, change: FocusChange) {
        let listener = {
            let mut state = self.state.lock();
            state.held = matches!(change, FocusChange::Gain | FocusChange::GainTransient);
            state.listener.clone()
        };
        if let Some(listener) = listener {
            listener.on_focus_change(change);
        }
    }
}

impl Default for HeadlessAudioFocus {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioFocusSystem for HeadlessAudioFocus {
    fn request_focus(&self, listener: AudioFocusListener) -> bool {
        let mut state = self.state.lock();
        state.requests += 1;
        state.listener = Some(listener);
        state.held = state.grant;
        state.grant
    }

    fn abandon_focus(&self) {
        let mut state = self.state.lock();
        state.held = false;
        state.listener = None;
    }
}
