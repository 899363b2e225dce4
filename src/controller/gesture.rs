//! Touch gesture interpretation
//!
//! Each touch sequence latches at most one slide mode on its first move
//! past the touch slop: horizontal drags seek, vertical drags on the right
//! half change the stream volume and on the left half the window
//! brightness. Taps that never leave the slop are single or double taps.

use super::{ControlComponent, ControlWrapper, SlideEvent, VideoController};
use crate::platform::{is_edge, Platform};
use crate::player::looper::{Looper, TaskId};
use crate::player::{DisplayMode, PlaybackState, PlayerControl};
use crate::utils::clamp;
use log::{debug, trace};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Milliseconds of seek per full view width of horizontal drag
pub const SEEK_RANGE_MS: f64 = 120_000.0;

/// Movement in dp below which a touch is still a tap
pub const TOUCH_SLOP_DP: f32 = 8.0;

/// Window in which a second tap counts as a double tap
pub const DOUBLE_TAP_TIMEOUT_MS: u64 = 300;

/// Raw touch input in view coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Cancel,
}

/// What the current touch sequence is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMode {
    /// Not past the slop yet
    Undetermined,
    Seek,
    Brightness,
    Volume,
    /// Rejected for the rest of the sequence
    Ignored,
}

impl GestureMode {
    fn is_latched(&self) -> bool {
        matches!(self, GestureMode::Seek | GestureMode::Brightness | GestureMode::Volume)
    }
}

/// Seek target for a horizontal drag
///
/// Dragging left (`delta_x > 0`, measured as start minus current) moves
/// forward, the inverse of the usual scrub direction where dragging right
/// seeks ahead. The result is clamped to `[0, duration]`.
pub fn seek_target(current_ms: u64, duration_ms: u64, delta_x: f32, width: f32) -> u64 {
    if width <= 0.0 {
        return current_ms.min(duration_ms);
    }
    let offset = delta_x as f64 / width as f64 * SEEK_RANGE_MS;
    clamp(current_ms as f64 + offset, 0.0, duration_ms as f64) as u64
}

/// Window brightness for a vertical drag, in [0, 1]
///
/// A negative start brightness follows the system and counts as 0.5.
pub fn brightness_level(start: f32, delta_y: f32, height: f32) -> f32 {
    let start = if start < 0.0 { 0.5 } else { start };
    if height <= 0.0 {
        return clamp(start, 0.0, 1.0);
    }
    clamp(delta_y * 2.0 / height + start, 0.0, 1.0)
}

/// Stream volume index for a vertical drag, in [0, max]
pub fn volume_index(start: u32, max: u32, delta_y: f32, height: f32) -> f32 {
    let max = max as f32;
    if height <= 0.0 {
        return clamp(start as f32, 0.0, max);
    }
    clamp(start as f32 + delta_y * 2.0 / height * max, 0.0, max)
}

/// `value` as a percentage of `max`, in [0, 100]
pub fn percent(value: f32, max: f32) -> u8 {
    if max <= 0.0 {
        return 0;
    }
    clamp(value / max * 100.0, 0.0, 100.0) as u8
}

struct GestureContext {
    start_x: f32,
    start_y: f32,
    start_volume: u32,
    start_brightness: f32,
    mode: GestureMode,
    pending_seek: Option<u64>,
    past_slop: bool,
}

/// Work to do once the context borrow is released
enum SlideStep {
    Seek { target: u64, current: u64, duration: u64 },
    Brightness(f32),
    Volume { index: f32, max: u32 },
}

/// Gesture handling for a controller
///
/// Attached to a [`Controller`](super::Controller) as an internal
/// component so it tracks play state and display mode, and dispatches
/// slide feedback through the wrapper to gesture-capable components.
pub struct GestureArbiter {
    weak_self: Weak<GestureArbiter>,
    platform: Rc<dyn Platform>,
    looper: Looper,
    wrapper: RefCell<Option<ControlWrapper>>,
    play_state: Cell<PlaybackState>,
    gesture_enabled: Cell<bool>,
    slide_enabled: Cell<bool>,
    can_change_position: Cell<bool>,
    enable_in_normal: Cell<bool>,
    view_size: Cell<Option<(u32, u32)>>,
    context: RefCell<Option<GestureContext>>,
    last_tap_ms: Cell<Option<u64>>,
    single_tap_task: Cell<Option<TaskId>>,
}

impl GestureArbiter {
    pub fn new(platform: Rc<dyn Platform>, looper: Looper) -> Rc<Self> {
        Rc::new_cyclic(|weak_self| Self {
            weak_self: weak_self.clone(),
            platform,
            looper,
            wrapper: RefCell::new(None),
            play_state: Cell::new(PlaybackState::Idle),
            gesture_enabled: Cell::new(true),
            slide_enabled: Cell::new(true),
            can_change_position: Cell::new(true),
            enable_in_normal: Cell::new(true),
            view_size: Cell::new(None),
            context: RefCell::new(None),
            last_tap_ms: Cell::new(None),
            single_tap_task: Cell::new(None),
        })
    }

    /// Enable or disable gestures entirely
    pub fn set_gesture_enabled(&self, enabled: bool) {
        self.gesture_enabled.set(enabled);
    }

    /// Allow horizontal drags to seek; live streams turn this off
    pub fn set_can_change_position(&self, can: bool) {
        self.can_change_position.set(can);
    }

    /// Allow slides outside full screen
    pub fn set_enable_in_normal(&self, enable: bool) {
        self.enable_in_normal.set(enable);
    }

    /// Size of the touch area; the screen size is used until set
    pub fn set_view_size(&self, width: u32, height: u32) {
        self.view_size.set(Some((width, height)));
    }

    /// Mode of the touch sequence in progress
    pub fn mode(&self) -> Option<GestureMode> {
        self.context.borrow().as_ref().map(|c| c.mode)
    }

    /// Seek that will be issued when the current drag ends
    pub fn pending_seek(&self) -> Option<u64> {
        self.context.borrow().as_ref().and_then(|c| c.pending_seek)
    }

    fn view_size(&self) -> (f32, f32) {
        let (w, h) = self
            .view_size
            .get()
            .unwrap_or_else(|| self.platform.screen_size());
        (w as f32, h as f32)
    }

    fn wrapper(&self) -> Option<ControlWrapper> {
        self.wrapper.borrow().clone()
    }

    /// Feed one touch event
    ///
    /// # Returns
    ///
    /// True when the event was consumed by a slide
    pub fn on_touch(&self, event: TouchEvent) -> bool {
        match event {
            TouchEvent::Down { x, y } => {
                self.on_down(x, y);
                false
            }
            TouchEvent::Move { x, y } => self.on_move(x, y),
            TouchEvent::Up { .. } => {
                let context = self.context.borrow_mut().take();
                match context {
                    Some(context) if !context.past_slop => {
                        self.on_tap();
                        false
                    }
                    Some(context) => self.finish(context, true),
                    None => false,
                }
            }
            TouchEvent::Cancel => {
                let context = self.context.borrow_mut().take();
                context.map_or(false, |c| self.finish(c, false))
            }
        }
    }

    fn on_down(&self, x: f32, y: f32) {
        let rejected = !self.gesture_enabled.get()
            || is_edge(self.platform.as_ref(), x, y)
            || !self.play_state.get().is_active();
        if rejected {
            trace!("touch down at ({}, {}) rejected for sliding", x, y);
        }

        *self.context.borrow_mut() = Some(GestureContext {
            start_x: x,
            start_y: y,
            start_volume: self.platform.stream_volume(),
            start_brightness: self.platform.window_brightness(),
            mode: if rejected {
                GestureMode::Ignored
            } else {
                GestureMode::Undetermined
            },
            pending_seek: None,
            past_slop: false,
        });
    }

    fn on_move(&self, x: f32, y: f32) -> bool {
        let wrapper = match self.wrapper() {
            Some(wrapper) => wrapper,
            None => return false,
        };
        let blocked = !self.play_state.get().is_active() || !self.slide_enabled.get() || wrapper.is_locked();
        let (width, height) = self.view_size();

        let (started, step) = {
            let mut guard = self.context.borrow_mut();
            let context = match guard.as_mut() {
                Some(context) => context,
                None => return false,
            };

            if !context.past_slop {
                let slop = TOUCH_SLOP_DP * self.platform.density();
                if (x - context.start_x).abs() < slop && (y - context.start_y).abs() < slop {
                    return false;
                }
                context.past_slop = true;
            }
            if context.mode == GestureMode::Ignored || blocked {
                return false;
            }

            let mut started = false;
            if context.mode == GestureMode::Undetermined {
                let dx = (x - context.start_x).abs();
                let dy = (y - context.start_y).abs();
                context.mode = if dx >= dy {
                    if self.can_change_position.get() {
                        GestureMode::Seek
                    } else {
                        GestureMode::Ignored
                    }
                } else if x > width / 2.0 {
                    GestureMode::Volume
                } else {
                    GestureMode::Brightness
                };
                debug!("gesture latched as {:?}", context.mode);
                if context.mode == GestureMode::Ignored {
                    return false;
                }
                started = true;
            }

            let step = match context.mode {
                GestureMode::Seek => {
                    let current = wrapper.current_position();
                    let duration = wrapper.duration();
                    let target = seek_target(current, duration, context.start_x - x, width);
                    context.pending_seek = Some(target);
                    SlideStep::Seek {
                        target,
                        current,
                        duration,
                    }
                }
                GestureMode::Brightness => SlideStep::Brightness(brightness_level(
                    context.start_brightness,
                    context.start_y - y,
                    height,
                )),
                _ => {
                    let max = self.platform.max_stream_volume();
                    SlideStep::Volume {
                        index: volume_index(context.start_volume, max, context.start_y - y, height),
                        max,
                    }
                }
            };
            (started, step)
        };

        if started {
            wrapper.dispatch_slide(SlideEvent::Start);
        }
        match step {
            SlideStep::Seek {
                target,
                current,
                duration,
            } => wrapper.dispatch_slide(SlideEvent::Position {
                slide_position: target,
                current_position: current,
                duration,
            }),
            SlideStep::Brightness(level) => {
                self.platform.set_window_brightness(level);
                wrapper.dispatch_slide(SlideEvent::Brightness(percent(level, 1.0)));
            }
            SlideStep::Volume { index, max } => {
                self.platform.set_stream_volume(index as u32);
                wrapper.dispatch_slide(SlideEvent::Volume(percent(index, max as f32)));
            }
        }
        true
    }

    fn finish(&self, context: GestureContext, commit: bool) -> bool {
        if !context.mode.is_latched() {
            return false;
        }
        let wrapper = match self.wrapper() {
            Some(wrapper) => wrapper,
            None => return false,
        };
        wrapper.dispatch_slide(SlideEvent::Stop);
        if commit {
            if let Some(target) = context.pending_seek {
                debug!("gesture seek to {}ms", target);
                wrapper.seek_to(target);
            }
        }
        true
    }

    fn on_tap(&self) {
        let now = self.looper.now_ms();
        match self.last_tap_ms.take() {
            Some(last) if now.saturating_sub(last) <= DOUBLE_TAP_TIMEOUT_MS => {
                if let Some(task) = self.single_tap_task.take() {
                    self.looper.cancel(task);
                }
                self.on_double_tap();
            }
            _ => {
                self.last_tap_ms.set(Some(now));
                let weak = self.weak_self.clone();
                let task = self.looper.post_delayed(DOUBLE_TAP_TIMEOUT_MS, move || {
                    if let Some(arbiter) = weak.upgrade() {
                        arbiter.on_single_tap_confirmed();
                    }
                });
                self.single_tap_task.set(Some(task));
            }
        }
    }

    fn on_single_tap_confirmed(&self) {
        self.single_tap_task.set(None);
        self.last_tap_ms.set(None);
        if !self.play_state.get().is_active() {
            return;
        }
        if let Some(wrapper) = self.wrapper() {
            wrapper.toggle_show_state();
        }
    }

    fn on_double_tap(&self) {
        let wrapper = match self.wrapper() {
            Some(wrapper) => wrapper,
            None => return,
        };
        if !wrapper.is_locked() && self.play_state.get().is_active() {
            wrapper.toggle_play();
        }
    }
}

impl ControlComponent for GestureArbiter {
    fn bind(&self, wrapper: ControlWrapper) {
        *self.wrapper.borrow_mut() = Some(wrapper);
    }

    fn on_play_state_changed(&self, state: PlaybackState) {
        self.play_state.set(state);
    }

    fn on_player_state_changed(&self, mode: DisplayMode) {
        match mode {
            DisplayMode::Normal => self.slide_enabled.set(self.enable_in_normal.get()),
            DisplayMode::FullScreen => self.slide_enabled.set(true),
            DisplayMode::TinyScreen => {}
        }
    }
}
