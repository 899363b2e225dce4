use super::{bound, cutout_padding, Padding};
use crate::controller::{ControlComponent, ControlWrapper, VideoController};
use crate::platform::ScreenOrientation;
use crate::player::{DisplayMode, PlaybackState, PlayerControl};
use std::cell::{Cell, RefCell};

/// Screen shown when playback reaches the end
#[derive(Default)]
pub struct CompleteView {
    wrapper: RefCell<Option<ControlWrapper>>,
    visible: Cell<bool>,
    stop_full_screen_visible: Cell<bool>,
    padding: Cell<Padding>,
}

impl CompleteView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play again from the start
    pub fn click_replay(&self) {
        if let Some(wrapper) = bound(&self.wrapper) {
            wrapper.replay(true);
        }
    }

    /// Leave full screen from the end screen
    pub fn click_stop_full_screen(&self) {
        let wrapper = match bound(&self.wrapper) {
            Some(wrapper) => wrapper,
            None => return,
        };
        if wrapper.is_full_screen() {
            wrapper.request_orientation(ScreenOrientation::Portrait);
            wrapper.stop_full_screen();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn is_stop_full_screen_visible(&self) -> bool {
        self.stop_full_screen_visible.get()
    }

    pub fn padding(&self) -> Padding {
        self.padding.get()
    }
}

impl ControlComponent for CompleteView {
    fn bind(&self, wrapper: ControlWrapper) {
        *self.wrapper.borrow_mut() = Some(wrapper);
    }

    fn on_play_state_changed(&self, state: PlaybackState) {
        if state == PlaybackState::Completed {
            let full_screen = bound(&self.wrapper).map_or(false, |w| w.is_full_screen());
            self.visible.set(true);
            self.stop_full_screen_visible.set(full_screen);
        } else {
            self.visible.set(false);
        }
    }

    fn on_player_state_changed(&self, mode: DisplayMode) {
        match mode {
            DisplayMode::FullScreen => self.stop_full_screen_visible.set(true),
            DisplayMode::Normal => self.stop_full_screen_visible.set(false),
            DisplayMode::TinyScreen => {}
        }
        if let Some(wrapper) = bound(&self.wrapper) {
            self.padding.set(cutout_padding(&wrapper));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::testing::Harness;
    use std::rc::Rc;

    #[test]
    fn test_shown_on_completion_and_replays() {
        let harness = Harness::new();
        let controller = harness.controller();
        let complete = Rc::new(CompleteView::new());
        controller.add_control_component(complete.clone(), false);

        harness.play();
        harness.session.start_full_screen();
        let handle = harness.factory.last_handle().unwrap();
        handle.advance(60_000);
        harness.looper.run_pending();

        assert_eq!(harness.session.play_state(), PlaybackState::Completed);
        assert!(complete.is_visible());
        assert!(complete.is_stop_full_screen_visible());

        complete.click_stop_full_screen();
        assert!(!harness.session.is_full_screen());
        assert!(!complete.is_stop_full_screen_visible());

        complete.click_replay();
        assert_eq!(harness.session.play_state(), PlaybackState::Preparing);
        assert!(!complete.is_visible());
    }
}
