//! Facade handed to overlay components

use super::{SlideEvent, VideoController};
use crate::platform::ScreenOrientation;
use crate::player::{DisplayMode, PlaybackState, PlayerControl};
use crate::surface::{ScaleMode, Screenshot};
use std::rc::{Rc, Weak};

/// Forwards to a player and a controller without owning either
///
/// Once the session or controller is dropped every call becomes a no-op
/// returning a neutral value.
#[derive(Clone)]
pub struct ControlWrapper {
    player: Weak<dyn PlayerControl>,
    controller: Weak<dyn VideoController>,
}

impl ControlWrapper {
    pub fn new(player: Weak<dyn PlayerControl>, controller: Weak<dyn VideoController>) -> Self {
        Self { player, controller }
    }

    fn player(&self) -> Option<Rc<dyn PlayerControl>> {
        self.player.upgrade()
    }

    fn controller(&self) -> Option<Rc<dyn VideoController>> {
        self.controller.upgrade()
    }

    /// Whether the wrapped session is still alive
    pub fn is_attached(&self) -> bool {
        self.player.strong_count() > 0
    }

    /// Pause if playing, start otherwise
    pub fn toggle_play(&self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Enter or leave full screen, turning the screen with it
    pub fn toggle_full_screen(&self) {
        if self.is_full_screen() {
            self.request_orientation(ScreenOrientation::Portrait);
            self.stop_full_screen();
        } else {
            self.request_orientation(ScreenOrientation::Landscape);
            self.start_full_screen();
        }
    }

    /// Enter or leave full screen, turning the screen only for wide video
    pub fn toggle_full_screen_by_video_size(&self) {
        let (width, height) = self.video_size();
        let wide = width > height;
        if self.is_full_screen() {
            self.stop_full_screen();
            if wide {
                self.request_orientation(ScreenOrientation::Portrait);
            }
        } else {
            self.start_full_screen();
            if wide {
                self.request_orientation(ScreenOrientation::Landscape);
            }
        }
    }

    pub fn toggle_lock_state(&self) {
        self.set_locked(!self.is_locked());
    }

    pub fn toggle_show_state(&self) {
        if self.is_showing() {
            self.hide();
        } else {
            self.show();
        }
    }
}

impl PlayerControl for ControlWrapper {
    fn start(&self) {
        if let Some(player) = self.player() {
            player.start();
        }
    }

    fn pause(&self) {
        if let Some(player) = self.player() {
            player.pause();
        }
    }

    fn duration(&self) -> u64 {
        self.player().map_or(0, |p| p.duration())
    }

    fn current_position(&self) -> u64 {
        self.player().map_or(0, |p| p.current_position())
    }

    fn seek_to(&self, position_ms: u64) {
        if let Some(player) = self.player() {
            player.seek_to(position_ms);
        }
    }

    fn is_playing(&self) -> bool {
        self.player().map_or(false, |p| p.is_playing())
    }

    fn buffered_percentage(&self) -> u8 {
        self.player().map_or(0, |p| p.buffered_percentage())
    }

    fn start_full_screen(&self) {
        if let Some(player) = self.player() {
            player.start_full_screen();
        }
    }

    fn stop_full_screen(&self) {
        if let Some(player) = self.player() {
            player.stop_full_screen();
        }
    }

    fn is_full_screen(&self) -> bool {
        self.player().map_or(false, |p| p.is_full_screen())
    }

    fn set_mute(&self, mute: bool) {
        if let Some(player) = self.player() {
            player.set_mute(mute);
        }
    }

    fn is_mute(&self) -> bool {
        self.player().map_or(false, |p| p.is_mute())
    }

    fn set_screen_scale(&self, mode: ScaleMode) {
        if let Some(player) = self.player() {
            player.set_screen_scale(mode);
        }
    }

    fn set_speed(&self, speed: f32) {
        if let Some(player) = self.player() {
            player.set_speed(speed);
        }
    }

    fn speed(&self) -> f32 {
        self.player().map_or(1.0, |p| p.speed())
    }

    fn tcp_speed(&self) -> u64 {
        self.player().map_or(0, |p| p.tcp_speed())
    }

    fn replay(&self, reset_position: bool) {
        if let Some(player) = self.player() {
            player.replay(reset_position);
        }
    }

    fn set_mirror_rotation(&self, enable: bool) {
        if let Some(player) = self.player() {
            player.set_mirror_rotation(enable);
        }
    }

    fn screenshot(&self) -> Option<Screenshot> {
        self.player().and_then(|p| p.screenshot())
    }

    fn video_size(&self) -> (u32, u32) {
        self.player().map_or((0, 0), |p| p.video_size())
    }

    fn set_rotation(&self, degrees: u32) {
        if let Some(player) = self.player() {
            player.set_rotation(degrees);
        }
    }

    fn start_tiny_screen(&self) {
        if let Some(player) = self.player() {
            player.start_tiny_screen();
        }
    }

    fn stop_tiny_screen(&self) {
        if let Some(player) = self.player() {
            player.stop_tiny_screen();
        }
    }

    fn is_tiny_screen(&self) -> bool {
        self.player().map_or(false, |p| p.is_tiny_screen())
    }

    fn play_state(&self) -> PlaybackState {
        self.player().map_or(PlaybackState::Idle, |p| p.play_state())
    }

    fn display_mode(&self) -> DisplayMode {
        self.player().map_or(DisplayMode::Normal, |p| p.display_mode())
    }

    fn set_play_on_mobile_network(&self, allow: bool) {
        if let Some(player) = self.player() {
            player.set_play_on_mobile_network(allow);
        }
    }
}

impl VideoController for ControlWrapper {
    fn start_fade_out(&self) {
        if let Some(controller) = self.controller() {
            controller.start_fade_out();
        }
    }

    fn stop_fade_out(&self) {
        if let Some(controller) = self.controller() {
            controller.stop_fade_out();
        }
    }

    fn is_showing(&self) -> bool {
        self.controller().map_or(false, |c| c.is_showing())
    }

    fn set_locked(&self, locked: bool) {
        if let Some(controller) = self.controller() {
            controller.set_locked(locked);
        }
    }

    fn is_locked(&self) -> bool {
        self.controller().map_or(false, |c| c.is_locked())
    }

    fn start_progress(&self) {
        if let Some(controller) = self.controller() {
            controller.start_progress();
        }
    }

    fn stop_progress(&self) {
        if let Some(controller) = self.controller() {
            controller.stop_progress();
        }
    }

    fn show(&self) {
        if let Some(controller) = self.controller() {
            controller.show();
        }
    }

    fn hide(&self) {
        if let Some(controller) = self.controller() {
            controller.hide();
        }
    }

    fn has_cutout(&self) -> bool {
        self.controller().map_or(false, |c| c.has_cutout())
    }

    fn cutout_height(&self) -> u32 {
        self.controller().map_or(0, |c| c.cutout_height())
    }

    fn request_orientation(&self, orientation: ScreenOrientation) {
        if let Some(controller) = self.controller() {
            controller.request_orientation(orientation);
        }
    }

    fn requested_orientation(&self) -> ScreenOrientation {
        self.controller()
            .map_or(ScreenOrientation::Unspecified, |c| c.requested_orientation())
    }

    fn dispatch_slide(&self, event: SlideEvent) {
        if let Some(controller) = self.controller() {
            controller.dispatch_slide(event);
        }
    }
}
