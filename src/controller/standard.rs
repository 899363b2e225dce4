//! Ready-made controller for on-demand and live playback
//!
//! [`StandardController`] combines a base [`Controller`] with gesture
//! handling, a lock button and a loading indicator, and can populate itself
//! with the stock overlay components.

use super::gesture::{GestureArbiter, TouchEvent};
use super::{ControlComponent, ControlWrapper, Controller, VideoController};
use crate::components::{
    CompleteView, ErrorView, GestureView, LiveControlView, PrepareView, TitleView, VodControlView,
};
use crate::player::context::PlayerContext;
use crate::player::{DisplayMode, PlaybackState, PlayerControl};
use log::info;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Full-screen lock toggle
///
/// Shown together with the chrome while in full screen. It is an internal
/// component, so it keeps receiving visibility changes while locked.
#[derive(Default)]
pub struct LockButton {
    wrapper: RefCell<Option<ControlWrapper>>,
    visible: Cell<bool>,
    selected: Cell<bool>,
}

impl LockButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Whether the button shows the locked state
    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    /// Toggle the controller lock
    pub fn click(&self) {
        let wrapper = self.wrapper.borrow().clone();
        if let Some(wrapper) = wrapper {
            wrapper.toggle_lock_state();
        }
    }

    fn is_full_screen(&self) -> bool {
        self.wrapper
            .borrow()
            .as_ref()
            .map_or(false, |w| w.is_full_screen())
    }
}

impl ControlComponent for LockButton {
    fn bind(&self, wrapper: ControlWrapper) {
        *self.wrapper.borrow_mut() = Some(wrapper);
    }

    fn on_visibility_changed(&self, visible: bool, _animated: bool) {
        if self.is_full_screen() {
            self.visible.set(visible);
        }
    }

    fn on_play_state_changed(&self, state: PlaybackState) {
        match state {
            PlaybackState::Idle => self.selected.set(false),
            PlaybackState::Completed => {
                self.visible.set(false);
                self.selected.set(false);
            }
            _ => {}
        }
    }

    fn on_player_state_changed(&self, mode: DisplayMode) {
        let showing = self.wrapper.borrow().as_ref().map_or(false, |w| w.is_showing());
        match mode {
            DisplayMode::Normal => self.visible.set(false),
            DisplayMode::FullScreen => self.visible.set(showing),
            DisplayMode::TinyScreen => {}
        }
    }

    fn on_lock_state_changed(&self, locked: bool) {
        self.selected.set(locked);
        info!("{}", if locked { "controls locked" } else { "controls unlocked" });
    }
}

/// Spinner shown while preparing or buffering
#[derive(Default)]
pub struct LoadingIndicator {
    visible: Cell<bool>,
}

impl LoadingIndicator {
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }
}

impl ControlComponent for LoadingIndicator {
    fn bind(&self, _wrapper: ControlWrapper) {}

    fn on_play_state_changed(&self, state: PlaybackState) {
        self.visible.set(matches!(
            state,
            PlaybackState::Preparing | PlaybackState::Buffering
        ));
    }
}

/// Components added by [`StandardController::add_default_control_components`]
pub struct DefaultComponents {
    pub complete: Rc<CompleteView>,
    pub error: Rc<ErrorView>,
    pub prepare: Rc<PrepareView>,
    pub title: Rc<TitleView>,
    /// Present for on-demand media
    pub vod: Option<Rc<VodControlView>>,
    /// Present for live streams
    pub live: Option<Rc<LiveControlView>>,
    pub gesture: Rc<GestureView>,
}

/// Controller with gestures, a lock button and the stock components
pub struct StandardController {
    controller: Rc<Controller>,
    gesture: Rc<GestureArbiter>,
    lock: Rc<LockButton>,
    loading: Rc<LoadingIndicator>,
}

impl StandardController {
    pub fn new(ctx: &PlayerContext) -> Self {
        let controller = Controller::new(ctx);
        let gesture = GestureArbiter::new(ctx.platform().clone(), ctx.looper().clone());
        let lock = Rc::new(LockButton::new());
        let loading = Rc::new(LoadingIndicator::default());

        controller.add_internal_component(gesture.clone());
        controller.add_internal_component(lock.clone());
        controller.add_internal_component(loading.clone());

        Self {
            controller,
            gesture,
            lock,
            loading,
        }
    }

    /// The controller to attach to a session
    pub fn controller(&self) -> &Rc<Controller> {
        &self.controller
    }

    pub fn gesture(&self) -> &Rc<GestureArbiter> {
        &self.gesture
    }

    pub fn lock_button(&self) -> &Rc<LockButton> {
        &self.lock
    }

    pub fn loading(&self) -> &Rc<LoadingIndicator> {
        &self.loading
    }

    /// Route a touch on the player area to the gesture arbiter
    pub fn on_touch_event(&self, event: TouchEvent) -> bool {
        self.gesture.on_touch(event)
    }

    pub fn click_lock(&self) {
        self.lock.click();
    }

    /// Add the stock overlay components
    ///
    /// # Arguments
    ///
    /// * `title` - Text for the full-screen title bar
    /// * `is_live` - Live streams get a live bar and cannot seek by gesture
    pub fn add_default_control_components(&self, title: &str, is_live: bool) -> DefaultComponents {
        let complete = Rc::new(CompleteView::new());
        let error = Rc::new(ErrorView::new());
        let prepare = Rc::new(PrepareView::new());
        prepare.set_click_start();
        let title = Rc::new(TitleView::new(title));

        self.controller.add_control_component(complete.clone(), false);
        self.controller.add_control_component(error.clone(), false);
        self.controller.add_control_component(prepare.clone(), false);
        self.controller.add_control_component(title.clone(), false);

        let (vod, live) = if is_live {
            let live = Rc::new(LiveControlView::new());
            self.controller.add_control_component(live.clone(), false);
            (None, Some(live))
        } else {
            let vod = Rc::new(VodControlView::new());
            self.controller.add_control_component(vod.clone(), false);
            (Some(vod), None)
        };

        let gesture = Rc::new(GestureView::new());
        self.controller.add_control_component(gesture.clone(), false);
        self.gesture.set_can_change_position(!is_live);

        DefaultComponents {
            complete,
            error,
            prepare,
            title,
            vod,
            live,
            gesture,
        }
    }
}
