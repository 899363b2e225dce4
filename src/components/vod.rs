use super::{bound, cutout_padding, Padding};
use crate::controller::{ControlComponent, ControlWrapper, VideoController};
use crate::player::{DisplayMode, PlaybackState, PlayerControl};
use crate::utils::string_for_time;
use std::cell::{Cell, RefCell};

/// Resolution of the seek bar
pub const PROGRESS_MAX: u32 = 1000;

/// Bottom bar for on-demand media
///
/// Holds the play toggle, a seek bar with buffered progress, position and
/// duration text, and a thin progress line shown while the chrome is
/// hidden.
pub struct VodControlView {
    wrapper: RefCell<Option<ControlWrapper>>,
    visible: Cell<bool>,
    bar_visible: Cell<bool>,
    bottom_progress_visible: Cell<bool>,
    show_bottom_progress: Cell<bool>,
    playing: Cell<bool>,
    seek_enabled: Cell<bool>,
    progress: Cell<u32>,
    secondary_progress: Cell<u32>,
    dragging: Cell<bool>,
    current_text: RefCell<String>,
    total_text: RefCell<String>,
    padding: Cell<Padding>,
}

impl VodControlView {
    pub fn new() -> Self {
        Self {
            wrapper: RefCell::new(None),
            visible: Cell::new(false),
            bar_visible: Cell::new(false),
            bottom_progress_visible: Cell::new(false),
            show_bottom_progress: Cell::new(true),
            playing: Cell::new(false),
            seek_enabled: Cell::new(false),
            progress: Cell::new(0),
            secondary_progress: Cell::new(0),
            dragging: Cell::new(false),
            current_text: RefCell::new(string_for_time(0)),
            total_text: RefCell::new(string_for_time(0)),
            padding: Cell::new(Padding::default()),
        }
    }

    /// Show the thin progress line while the chrome is hidden
    pub fn set_show_bottom_progress(&self, show: bool) {
        self.show_bottom_progress.set(show);
    }

    pub fn click_play(&self) {
        if let Some(wrapper) = bound(&self.wrapper) {
            wrapper.toggle_play();
        }
    }

    pub fn click_full_screen(&self) {
        if let Some(wrapper) = bound(&self.wrapper) {
            wrapper.toggle_full_screen();
        }
    }

    /// The user grabbed the seek bar
    pub fn start_tracking(&self) {
        self.dragging.set(true);
        if let Some(wrapper) = bound(&self.wrapper) {
            wrapper.stop_progress();
            wrapper.stop_fade_out();
        }
    }

    /// The seek bar was dragged to `progress` out of [`PROGRESS_MAX`]
    pub fn drag_to(&self, progress: u32) {
        let duration = bound(&self.wrapper).map_or(0, |w| w.duration());
        let position = position_for(duration, progress);
        *self.current_text.borrow_mut() = string_for_time(position);
    }

    /// The user let go of the seek bar; seeks to the chosen position
    pub fn stop_tracking(&self, progress: u32) {
        let wrapper = bound(&self.wrapper);
        if let Some(wrapper) = &wrapper {
            wrapper.seek_to(position_for(wrapper.duration(), progress));
        }
        self.dragging.set(false);
        if let Some(wrapper) = &wrapper {
            wrapper.start_progress();
            wrapper.start_fade_out();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn is_bar_visible(&self) -> bool {
        self.bar_visible.get()
    }

    pub fn is_bottom_progress_visible(&self) -> bool {
        self.bottom_progress_visible.get()
    }

    /// Whether the play button shows the playing state
    pub fn is_playing(&self) -> bool {
        self.playing.get()
    }

    pub fn is_seek_enabled(&self) -> bool {
        self.seek_enabled.get()
    }

    pub fn progress(&self) -> u32 {
        self.progress.get()
    }

    pub fn secondary_progress(&self) -> u32 {
        self.secondary_progress.get()
    }

    pub fn current_text(&self) -> String {
        self.current_text.borrow().clone()
    }

    pub fn total_text(&self) -> String {
        self.total_text.borrow().clone()
    }

    pub fn padding(&self) -> Padding {
        self.padding.get()
    }

    fn reset_progress(&self) {
        self.progress.set(0);
        self.secondary_progress.set(0);
    }
}

impl Default for VodControlView {
    fn default() -> Self {
        Self::new()
    }
}

fn position_for(duration: u64, progress: u32) -> u64 {
    duration * u64::from(progress.min(PROGRESS_MAX)) / u64::from(PROGRESS_MAX)
}

impl ControlComponent for VodControlView {
    fn bind(&self, wrapper: ControlWrapper) {
        *self.wrapper.borrow_mut() = Some(wrapper);
    }

    fn on_visibility_changed(&self, visible: bool, _animated: bool) {
        self.bar_visible.set(visible);
        if self.show_bottom_progress.get() {
            self.bottom_progress_visible.set(!visible);
        }
    }

    fn on_play_state_changed(&self, state: PlaybackState) {
        match state {
            PlaybackState::Idle | PlaybackState::Completed => {
                self.visible.set(false);
                self.reset_progress();
            }
            PlaybackState::StartAborted
            | PlaybackState::Preparing
            | PlaybackState::Prepared
            | PlaybackState::Error => self.visible.set(false),
            PlaybackState::Playing => {
                self.playing.set(true);
                let wrapper = bound(&self.wrapper);
                let showing = wrapper.as_ref().map_or(false, |w| w.is_showing());
                if self.show_bottom_progress.get() {
                    self.bar_visible.set(showing);
                    self.bottom_progress_visible.set(!showing);
                } else {
                    self.bar_visible.set(false);
                }
                self.visible.set(true);
                if let Some(wrapper) = wrapper {
                    wrapper.start_progress();
                }
            }
            PlaybackState::Paused => self.playing.set(false),
            PlaybackState::Buffering | PlaybackState::Buffered => {
                let playing = bound(&self.wrapper).map_or(false, |w| w.is_playing());
                self.playing.set(playing);
            }
        }
    }

    fn on_player_state_changed(&self, _mode: DisplayMode) {
        if let Some(wrapper) = bound(&self.wrapper) {
            self.padding.set(cutout_padding(&wrapper));
        }
    }

    fn on_progress(&self, duration: u64, position: u64) {
        if self.dragging.get() {
            return;
        }

        if duration > 0 {
            self.seek_enabled.set(true);
            let progress = position.min(duration) * u64::from(PROGRESS_MAX) / duration;
            self.progress.set(progress as u32);
        } else {
            self.seek_enabled.set(false);
        }

        let buffered = bound(&self.wrapper).map_or(0, |w| w.buffered_percentage());
        // Backends rarely report a full buffer; treat 95% as complete.
        if buffered >= 95 {
            self.secondary_progress.set(PROGRESS_MAX);
        } else {
            self.secondary_progress.set(u32::from(buffered) * 10);
        }

        *self.total_text.borrow_mut() = string_for_time(duration);
        *self.current_text.borrow_mut() = string_for_time(position);
    }

    fn on_lock_state_changed(&self, locked: bool) {
        self.on_visibility_changed(!locked, false);
    }
}
