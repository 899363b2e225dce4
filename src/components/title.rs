use super::{bound, cutout_padding, Padding};
use crate::controller::{ControlComponent, ControlWrapper, VideoController};
use crate::platform::ScreenOrientation;
use crate::player::{DisplayMode, PlaybackState, PlayerControl};
use std::cell::{Cell, RefCell};

/// Title bar, only ever shown in full screen
pub struct TitleView {
    wrapper: RefCell<Option<ControlWrapper>>,
    title: RefCell<String>,
    visible: Cell<bool>,
    /// Marquee scrolling of a long title
    selected: Cell<bool>,
    padding: Cell<Padding>,
}

impl TitleView {
    pub fn new(title: &str) -> Self {
        Self {
            wrapper: RefCell::new(None),
            title: RefCell::new(title.to_string()),
            visible: Cell::new(false),
            selected: Cell::new(false),
            padding: Cell::new(Padding::default()),
        }
    }

    pub fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    pub fn padding(&self) -> Padding {
        self.padding.get()
    }

    /// Back arrow: leave full screen
    pub fn click_back(&self) {
        let wrapper = match bound(&self.wrapper) {
            Some(wrapper) => wrapper,
            None => return,
        };
        if wrapper.is_full_screen() {
            wrapper.request_orientation(ScreenOrientation::Portrait);
            wrapper.stop_full_screen();
        }
    }

    fn is_full_screen(&self) -> bool {
        bound(&self.wrapper).map_or(false, |w| w.is_full_screen())
    }
}

impl ControlComponent for TitleView {
    fn bind(&self, wrapper: ControlWrapper) {
        *self.wrapper.borrow_mut() = Some(wrapper);
    }

    fn on_visibility_changed(&self, visible: bool, _animated: bool) {
        if self.is_full_screen() {
            self.visible.set(visible);
        }
    }

    fn on_play_state_changed(&self, state: PlaybackState) {
        if !state.is_active() {
            self.visible.set(false);
        }
    }

    fn on_player_state_changed(&self, mode: DisplayMode) {
        let wrapper = match bound(&self.wrapper) {
            Some(wrapper) => wrapper,
            None => return,
        };
        if mode == DisplayMode::FullScreen {
            if wrapper.is_showing() && !wrapper.is_locked() {
                self.visible.set(true);
            }
            self.selected.set(true);
        } else {
            self.visible.set(false);
            self.selected.set(false);
        }
        self.padding.set(cutout_padding(&wrapper));
    }

    fn on_lock_state_changed(&self, locked: bool) {
        if self.is_full_screen() {
            self.visible.set(!locked);
        }
    }
}
