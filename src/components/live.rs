use super::{bound, cutout_padding, Padding};
use crate::controller::{ControlComponent, ControlWrapper};
use crate::player::{DisplayMode, PlaybackState, PlayerControl};
use std::cell::{Cell, RefCell};

/// Bottom bar for live streams: play toggle, refresh and full screen
#[derive(Default)]
pub struct LiveControlView {
    wrapper: RefCell<Option<ControlWrapper>>,
    visible: Cell<bool>,
    playing: Cell<bool>,
    padding: Cell<Padding>,
}

impl LiveControlView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn click_play(&self) {
        if let Some(wrapper) = bound(&self.wrapper) {
            wrapper.toggle_play();
        }
    }

    /// Reconnect to the stream
    pub fn click_refresh(&self) {
        if let Some(wrapper) = bound(&self.wrapper) {
            wrapper.replay(true);
        }
    }

    pub fn click_full_screen(&self) {
        if let Some(wrapper) = bound(&self.wrapper) {
            wrapper.toggle_full_screen();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn is_playing(&self) -> bool {
        self.playing.get()
    }

    pub fn padding(&self) -> Padding {
        self.padding.get()
    }
}

impl ControlComponent for LiveControlView {
    fn bind(&self, wrapper: ControlWrapper) {
        *self.wrapper.borrow_mut() = Some(wrapper);
    }

    fn on_visibility_changed(&self, visible: bool, _animated: bool) {
        self.visible.set(visible);
    }

    fn on_play_state_changed(&self, state: PlaybackState) {
        match state {
            PlaybackState::Playing => self.playing.set(true),
            PlaybackState::Paused => self.playing.set(false),
            PlaybackState::Buffering | PlaybackState::Buffered => {
                let playing = bound(&self.wrapper).map_or(false, |w| w.is_playing());
                self.playing.set(playing);
            }
            _ => self.visible.set(false),
        }
    }

    fn on_player_state_changed(&self, _mode: DisplayMode) {
        if let Some(wrapper) = bound(&self.wrapper) {
            self.padding.set(cutout_padding(&wrapper));
        }
    }

    fn on_lock_state_changed(&self, locked: bool) {
        self.on_visibility_changed(!locked, false);
    }
}
