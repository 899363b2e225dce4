use super::bound;
use crate::controller::{ControlComponent, ControlWrapper};
use crate::player::{PlaybackState, PlayerControl};
use std::cell::{Cell, RefCell};

/// Screen shown when playback fails, with a retry button
#[derive(Default)]
pub struct ErrorView {
    wrapper: RefCell<Option<ControlWrapper>>,
    visible: Cell<bool>,
}

impl ErrorView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retry from the last known position
    pub fn click_retry(&self) {
        self.visible.set(false);
        if let Some(wrapper) = bound(&self.wrapper) {
            wrapper.replay(false);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }
}

impl ControlComponent for ErrorView {
    fn bind(&self, wrapper: ControlWrapper) {
        *self.wrapper.borrow_mut() = Some(wrapper);
    }

    fn on_play_state_changed(&self, state: PlaybackState) {
        match state {
            PlaybackState::Error => self.visible.set(true),
            PlaybackState::Idle => self.visible.set(false),
            _ => {}
        }
    }
}
