use super::bound;
use crate::controller::{ControlComponent, ControlWrapper, GestureComponent, VideoController};
use crate::player::PlaybackState;
use crate::utils::string_for_time;
use std::cell::{Cell, RefCell};

/// Icon shown in the slide feedback box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureIcon {
    #[default]
    FastForward,
    FastRewind,
    Brightness,
    VolumeOff,
    VolumeUp,
}

/// Centered feedback box shown while a slide gesture is in progress
#[derive(Default)]
pub struct GestureView {
    wrapper: RefCell<Option<ControlWrapper>>,
    visible: Cell<bool>,
    center_visible: Cell<bool>,
    icon: Cell<GestureIcon>,
    text: RefCell<String>,
    percent_visible: Cell<bool>,
    percent: Cell<u8>,
}

impl GestureView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Whether the feedback box is up
    pub fn is_center_visible(&self) -> bool {
        self.center_visible.get()
    }

    pub fn icon(&self) -> GestureIcon {
        self.icon.get()
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Percentage bar value, when the bar is shown
    pub fn percent(&self) -> Option<u8> {
        if self.percent_visible.get() {
            Some(self.percent.get())
        } else {
            None
        }
    }

    fn show_percent(&self, icon: GestureIcon, percent: u8) {
        self.percent_visible.set(true);
        self.icon.set(icon);
        self.percent.set(percent);
        *self.text.borrow_mut() = format!("{}%", percent);
    }
}

impl ControlComponent for GestureView {
    fn bind(&self, wrapper: ControlWrapper) {
        *self.wrapper.borrow_mut() = Some(wrapper);
    }

    fn on_play_state_changed(&self, state: PlaybackState) {
        self.visible.set(state.is_active());
    }

    fn as_gesture(&self) -> Option<&dyn GestureComponent> {
        Some(self)
    }
}

impl GestureComponent for GestureView {
    fn on_start_slide(&self) {
        if let Some(wrapper) = bound(&self.wrapper) {
            wrapper.hide();
        }
        self.center_visible.set(true);
    }

    fn on_stop_slide(&self) {
        self.center_visible.set(false);
    }

    fn on_position_change(&self, slide_position: u64, current_position: u64, duration: u64) {
        self.percent_visible.set(false);
        self.icon.set(if slide_position > current_position {
            GestureIcon::FastForward
        } else {
            GestureIcon::FastRewind
        });
        *self.text.borrow_mut() = format!(
            "{}/{}",
            string_for_time(slide_position),
            string_for_time(duration)
        );
    }

    fn on_brightness_change(&self, percent: u8) {
        self.show_percent(GestureIcon::Brightness, percent);
    }

    fn on_volume_change(&self, percent: u8) {
        let icon = if percent == 0 {
            GestureIcon::VolumeOff
        } else {
            GestureIcon::VolumeUp
        };
        self.show_percent(icon, percent);
    }
}
