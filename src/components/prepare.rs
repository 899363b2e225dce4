use super::bound;
use crate::controller::{ControlComponent, ControlWrapper};
use crate::player::{PlaybackState, PlayerControl};
use log::info;
use std::cell::{Cell, RefCell};

/// Cover shown before playback starts
///
/// Carries the thumbnail, the start button, a loading spinner and the
/// metered-network warning with its "play anyway" confirmation.
pub struct PrepareView {
    wrapper: RefCell<Option<ControlWrapper>>,
    visible: Cell<bool>,
    thumb_visible: Cell<bool>,
    start_visible: Cell<bool>,
    loading: Cell<bool>,
    net_warning: Cell<bool>,
    click_start: Cell<bool>,
}

impl PrepareView {
    pub fn new() -> Self {
        Self {
            wrapper: RefCell::new(None),
            visible: Cell::new(true),
            thumb_visible: Cell::new(true),
            start_visible: Cell::new(true),
            loading: Cell::new(false),
            net_warning: Cell::new(false),
            click_start: Cell::new(false),
        }
    }

    /// Make a click anywhere on the cover start playback
    pub fn set_click_start(&self) {
        self.click_start.set(true);
    }

    /// The cover was clicked
    ///
    /// # Returns
    ///
    /// True when the click started playback
    pub fn click(&self) -> bool {
        if !self.click_start.get() {
            return false;
        }
        match bound(&self.wrapper) {
            Some(wrapper) => {
                wrapper.start();
                true
            }
            None => false,
        }
    }

    /// The user accepted playing over a metered network
    pub fn confirm_net_warning(&self) {
        self.net_warning.set(false);
        if let Some(wrapper) = bound(&self.wrapper) {
            info!("playback over metered network confirmed");
            wrapper.set_play_on_mobile_network(true);
            wrapper.start();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn is_thumb_visible(&self) -> bool {
        self.thumb_visible.get()
    }

    pub fn is_start_visible(&self) -> bool {
        self.start_visible.get()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn is_net_warning_visible(&self) -> bool {
        self.net_warning.get()
    }
}

impl Default for PrepareView {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlComponent for PrepareView {
    fn bind(&self, wrapper: ControlWrapper) {
        *self.wrapper.borrow_mut() = Some(wrapper);
    }

    fn on_play_state_changed(&self, state: PlaybackState) {
        match state {
            PlaybackState::Preparing => {
                self.visible.set(true);
                self.start_visible.set(false);
                self.net_warning.set(false);
                self.loading.set(true);
            }
            PlaybackState::Playing
            | PlaybackState::Paused
            | PlaybackState::Error
            | PlaybackState::Buffering
            | PlaybackState::Buffered
            | PlaybackState::Completed => self.visible.set(false),
            PlaybackState::Idle => {
                self.visible.set(true);
                self.loading.set(false);
                self.net_warning.set(false);
                self.start_visible.set(true);
                self.thumb_visible.set(true);
            }
            PlaybackState::StartAborted => {
                self.visible.set(true);
                self.net_warning.set(true);
            }
            PlaybackState::Prepared => {}
        }
    }
}
