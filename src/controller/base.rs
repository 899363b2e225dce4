//! Base controller: component fan-out, chrome visibility, progress and
//! orientation following

use super::orientation::{OrientationArbiter, OrientationBucket, OrientationSensor};
use super::registry::ComponentRegistry;
use super::{ControlComponent, ControlWrapper, SlideEvent, VideoController};
use crate::platform::{Platform, ScreenOrientation};
use crate::player::context::PlayerContext;
use crate::player::looper::{Inbound, InboundHandler, Looper, PostHandle, TaskId};
use crate::player::{DisplayMode, PlaybackState, PlayerControl};
use log::{debug, info};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Delay until the next progress tick
///
/// Ticks land just after each whole second of media time, scaled by the
/// playback speed, and never less than 1 ms apart.
pub fn progress_delay(position_ms: u64, speed: f32) -> u64 {
    let speed = if speed > 0.0 { speed } else { 1.0 };
    let remaining = 1000 - position_ms % 1000;
    ((remaining as f32 / speed) as u64).max(1)
}

/// Controller shared by a session and its components
///
/// Session state changes arrive through [`set_play_state`] and
/// [`set_player_state`]. They are fanned out to registered components in
/// registration order, then to internal components, and only then does the
/// controller apply its own reactions.
///
/// [`set_play_state`]: Controller::set_play_state
/// [`set_player_state`]: Controller::set_player_state
pub struct Controller {
    weak_self: Weak<Controller>,
    looper: Looper,
    platform: Rc<dyn Platform>,
    post: PostHandle,
    registry: RefCell<ComponentRegistry>,
    internal: RefCell<Vec<Rc<dyn ControlComponent>>>,
    wrapper: RefCell<Option<ControlWrapper>>,
    showing: Cell<bool>,
    locked: Cell<bool>,
    dismiss_timeout_ms: Cell<u64>,
    fade_task: Cell<Option<TaskId>>,
    progress_task: Cell<Option<TaskId>>,
    enable_orientation: Cell<bool>,
    adapt_cutout: bool,
    cutout: Cell<Option<u32>>,
    orientation: RefCell<OrientationArbiter>,
    orientation_listening: Cell<bool>,
}

impl Controller {
    pub fn new(ctx: &PlayerContext) -> Rc<Self> {
        let display = ctx.config().display.clone();
        let looper = ctx.looper().clone();
        let platform = ctx.platform().clone();

        Rc::new_cyclic(|weak_self: &Weak<Controller>| {
            let handler: Weak<dyn InboundHandler> = weak_self.clone();
            let post = looper.register(handler);
            Self {
                weak_self: weak_self.clone(),
                looper,
                platform,
                post,
                registry: RefCell::new(ComponentRegistry::new()),
                internal: RefCell::new(Vec::new()),
                wrapper: RefCell::new(None),
                showing: Cell::new(false),
                locked: Cell::new(false),
                dismiss_timeout_ms: Cell::new(display.dismiss_timeout_ms),
                fade_task: Cell::new(None),
                progress_task: Cell::new(None),
                enable_orientation: Cell::new(display.enable_orientation),
                adapt_cutout: display.adapt_cutout,
                cutout: Cell::new(None),
                orientation: RefCell::new(OrientationArbiter::new()),
                orientation_listening: Cell::new(false),
            }
        })
    }

    /// Bind to a player; every component is rebound to the new wrapper
    pub fn bind_player(&self, player: Weak<dyn PlayerControl>) {
        let controller: Weak<dyn VideoController> = self.weak_self.clone();
        let wrapper = ControlWrapper::new(player, controller);
        *self.wrapper.borrow_mut() = Some(wrapper.clone());
        self.check_cutout();

        for component in self.components() {
            component.bind(wrapper.clone());
        }
    }

    /// Detach from the current player
    pub fn unbind_player(&self) {
        self.stop_progress();
        self.stop_fade_out();
        *self.wrapper.borrow_mut() = None;
    }

    /// The wrapper components are bound with, once a player is bound
    pub fn wrapper(&self) -> Option<ControlWrapper> {
        self.wrapper.borrow().clone()
    }

    /// Attach a component
    ///
    /// Private components get every notification but stay out of
    /// [`visual_stack`](Self::visual_stack) and are dropped when playback
    /// returns to idle.
    pub fn add_control_component(&self, component: Rc<dyn ControlComponent>, private: bool) {
        if !self.registry.borrow_mut().add(component.clone(), private) {
            return;
        }
        if let Some(wrapper) = self.wrapper() {
            component.bind(wrapper);
        }
    }

    /// Attach a component that lives as long as the controller
    ///
    /// Internal components are notified after registered ones, receive
    /// visibility changes even while locked, and survive every removal.
    pub fn add_internal_component(&self, component: Rc<dyn ControlComponent>) {
        self.internal.borrow_mut().push(component.clone());
        if let Some(wrapper) = self.wrapper() {
            component.bind(wrapper);
        }
    }

    pub fn remove_control_component(&self, component: &Rc<dyn ControlComponent>) -> bool {
        self.registry.borrow_mut().remove(component)
    }

    pub fn remove_all_private_components(&self) {
        self.registry.borrow_mut().remove_all_private();
    }

    pub fn remove_all_control_components(&self) {
        self.registry.borrow_mut().clear();
    }

    /// Non-private components, most recently added first
    pub fn visual_stack(&self) -> Vec<Rc<dyn ControlComponent>> {
        self.registry.borrow().visual_stack()
    }

    pub fn component_count(&self) -> usize {
        self.registry.borrow().len()
    }

    fn registered(&self) -> Vec<Rc<dyn ControlComponent>> {
        self.registry.borrow().snapshot()
    }

    fn internals(&self) -> Vec<Rc<dyn ControlComponent>> {
        self.internal.borrow().clone()
    }

    fn components(&self) -> Vec<Rc<dyn ControlComponent>> {
        let mut all = self.registered();
        all.extend(self.internals());
        all
    }

    /// Hide the chrome after this many milliseconds; 0 keeps it up
    pub fn set_dismiss_timeout(&self, timeout_ms: u64) {
        self.dismiss_timeout_ms.set(timeout_ms);
    }

    pub fn dismiss_timeout(&self) -> u64 {
        self.dismiss_timeout_ms.get()
    }

    /// Follow the device orientation in normal display mode too
    pub fn set_enable_orientation(&self, enable: bool) {
        self.enable_orientation.set(enable);
    }

    pub fn is_orientation_listening(&self) -> bool {
        self.orientation_listening.get()
    }

    /// Handle for delivering sensor readings from any thread
    pub fn orientation_sensor(&self) -> OrientationSensor {
        OrientationSensor::new(self.post.clone())
    }

    pub fn is_progress_running(&self) -> bool {
        self.progress_task.get().is_some()
    }

    /// Session play state changed
    pub fn set_play_state(&self, state: PlaybackState) {
        debug!("fanning out play state {}", state);
        for component in self.components() {
            component.on_play_state_changed(state);
        }

        match state {
            PlaybackState::Idle => {
                self.set_orientation_listening(false);
                self.orientation.borrow_mut().reset();
                self.locked.set(false);
                self.showing.set(false);
                self.stop_fade_out();
                self.remove_all_private_components();
            }
            PlaybackState::Completed => {
                self.locked.set(false);
                self.showing.set(false);
                self.stop_fade_out();
            }
            PlaybackState::Error => {
                self.showing.set(false);
                self.stop_fade_out();
            }
            _ => {}
        }

        if state == PlaybackState::Playing {
            self.start_progress();
        } else {
            self.stop_progress();
        }
    }

    /// Session display mode changed
    pub fn set_player_state(&self, mode: DisplayMode) {
        debug!("fanning out display mode {}", mode);
        for component in self.components() {
            component.on_player_state_changed(mode);
        }

        match mode {
            DisplayMode::Normal => self.set_orientation_listening(self.enable_orientation.get()),
            DisplayMode::FullScreen => self.set_orientation_listening(true),
            DisplayMode::TinyScreen => self.set_orientation_listening(false),
        }
        if self.cutout.get().is_some() {
            self.platform.set_cutout_short_edges(mode == DisplayMode::FullScreen);
        }
    }

    /// Back navigation
    ///
    /// # Returns
    ///
    /// True when the controller consumed the event
    pub fn on_back_pressed(&self) -> bool {
        if self.locked.get() {
            self.show();
            info!("back pressed while locked, unlock first");
            return true;
        }
        match self.wrapper() {
            Some(wrapper) if wrapper.is_full_screen() => {
                self.request_orientation(ScreenOrientation::Portrait);
                wrapper.stop_full_screen();
                true
            }
            _ => false,
        }
    }

    fn check_cutout(&self) {
        let cutout = if self.adapt_cutout && self.platform.has_display_cutout() {
            Some(self.platform.cutout_height())
        } else {
            None
        };
        self.cutout.set(cutout);
    }

    fn set_orientation_listening(&self, enabled: bool) {
        if self.orientation_listening.replace(enabled) != enabled {
            debug!("orientation listener {}", if enabled { "enabled" } else { "disabled" });
            self.platform.set_orientation_sensor_enabled(enabled);
        }
    }

    fn handle_visibility(&self, visible: bool, animated: bool) {
        if !self.locked.get() {
            for component in self.registered() {
                component.on_visibility_changed(visible, animated);
            }
        }
        for component in self.internals() {
            component.on_visibility_changed(visible, animated);
        }
    }

    fn progress_tick(&self) {
        self.progress_task.set(None);
        let wrapper = match self.wrapper() {
            Some(wrapper) => wrapper,
            None => return,
        };

        let duration = wrapper.duration();
        let position = wrapper.current_position();
        for component in self.components() {
            component.on_progress(duration, position);
        }

        if self.progress_task.get().is_some() || !wrapper.is_playing() {
            return;
        }
        let delay = progress_delay(position, wrapper.speed());
        let weak = self.weak_self.clone();
        let task = self.looper.post_delayed(delay, move || {
            if let Some(controller) = weak.upgrade() {
                controller.progress_tick();
            }
        });
        self.progress_task.set(Some(task));
    }

    fn on_orientation_bucket(&self, bucket: OrientationBucket) {
        if self.locked.get() {
            return;
        }
        let wrapper = match self.wrapper() {
            Some(wrapper) => wrapper,
            None => return,
        };

        info!("device turned to {:?}", bucket);
        match bucket {
            OrientationBucket::Portrait => {
                if !self.enable_orientation.get() {
                    return;
                }
                self.platform.set_requested_orientation(ScreenOrientation::Portrait);
                wrapper.stop_full_screen();
            }
            OrientationBucket::Landscape | OrientationBucket::ReverseLandscape => {
                self.platform.set_requested_orientation(bucket.screen_orientation());
                if wrapper.is_full_screen() {
                    self.set_player_state(DisplayMode::FullScreen);
                } else {
                    wrapper.start_full_screen();
                }
            }
        }
    }
}

impl VideoController for Controller {
    fn start_fade_out(&self) {
        self.stop_fade_out();
        let timeout = self.dismiss_timeout_ms.get();
        if timeout == 0 {
            return;
        }
        let weak = self.weak_self.clone();
        let task = self.looper.post_delayed(timeout, move || {
            if let Some(controller) = weak.upgrade() {
                controller.fade_task.set(None);
                controller.hide();
            }
        });
        self.fade_task.set(Some(task));
    }

    fn stop_fade_out(&self) {
        if let Some(task) = self.fade_task.take() {
            self.looper.cancel(task);
        }
    }

    fn is_showing(&self) -> bool {
        self.showing.get()
    }

    fn set_locked(&self, locked: bool) {
        self.locked.set(locked);
        debug!("fanning out lock state {}", locked);
        for component in self.components() {
            component.on_lock_state_changed(locked);
        }
    }

    fn is_locked(&self) -> bool {
        self.locked.get()
    }

    fn start_progress(&self) {
        if self.progress_task.get().is_some() {
            return;
        }
        let weak = self.weak_self.clone();
        let task = self.looper.post(move || {
            if let Some(controller) = weak.upgrade() {
                controller.progress_tick();
            }
        });
        self.progress_task.set(Some(task));
    }

    fn stop_progress(&self) {
        if let Some(task) = self.progress_task.take() {
            self.looper.cancel(task);
        }
    }

    fn show(&self) {
        if self.showing.get() {
            return;
        }
        self.showing.set(true);
        self.handle_visibility(true, true);
        self.start_fade_out();
    }

    fn hide(&self) {
        if !self.showing.get() {
            return;
        }
        self.stop_fade_out();
        self.showing.set(false);
        self.handle_visibility(false, true);
    }

    fn has_cutout(&self) -> bool {
        self.cutout.get().is_some()
    }

    fn cutout_height(&self) -> u32 {
        self.cutout.get().unwrap_or(0)
    }

    fn request_orientation(&self, orientation: ScreenOrientation) {
        self.orientation.borrow_mut().note_manual_request(orientation);
        self.platform.set_requested_orientation(orientation);
    }

    fn requested_orientation(&self) -> ScreenOrientation {
        self.platform.requested_orientation()
    }

    fn dispatch_slide(&self, event: SlideEvent) {
        for component in self.components() {
            if let Some(gesture) = component.as_gesture() {
                event.deliver(gesture);
            }
        }
    }
}

impl InboundHandler for Controller {
    fn handle_inbound(&self, message: Inbound) {
        match message {
            Inbound::Orientation(sample) => {
                if !self.orientation_listening.get() {
                    return;
                }
                let now = self.looper.now_ms();
                let bucket = self.orientation.borrow_mut().on_sample(sample, now);
                if let Some(bucket) = bucket {
                    self.on_orientation_bucket(bucket);
                }
            }
            other => debug!("controller ignores {:?}", other),
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.looper.unregister(self.post.target());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{SimulatedBackendFactory, SimulatedMedia};
    use crate::controller::OrientationSample;
    use crate::platform::HeadlessPlatform;
    use crate::player::looper::ManualClock;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl ControlComponent for Recorder {
        fn bind(&self, _wrapper: ControlWrapper) {
            self.events.borrow_mut().push("bind".to_string());
        }

        fn on_visibility_changed(&self, visible: bool, _animated: bool) {
            self.events.borrow_mut().push(format!("visible {}", visible));
        }

        fn on_play_state_changed(&self, state: PlaybackState) {
            self.events.borrow_mut().push(format!("state {}", state));
        }

        fn on_lock_state_changed(&self, locked: bool) {
            self.events.borrow_mut().push(format!("locked {}", locked));
        }
    }

    fn fixture() -> (Rc<Controller>, Rc<ManualClock>, Rc<HeadlessPlatform>, Looper) {
        let clock = Rc::new(ManualClock::new());
        let looper = Looper::with_clock(clock.clone());
        let platform = Rc::new(HeadlessPlatform::new());
        let ctx = PlayerContext::builder()
            .looper(looper.clone())
            .platform(platform.clone())
            .backend_factory(Rc::new(SimulatedBackendFactory::new(SimulatedMedia::default())))
            .build()
            .unwrap();
        (Controller::new(&ctx), clock, platform, looper)
    }

    #[test]
    fn test_progress_delay() {
        assert_eq!(progress_delay(0, 1.0), 1000);
        assert_eq!(progress_delay(10_250, 1.0), 750);
        assert_eq!(progress_delay(10_250, 2.0), 375);
        assert_eq!(progress_delay(999, 1.0), 1);
        assert_eq!(progress_delay(500, 0.0), 500);
    }

    #[test]
    fn test_private_components_get_events_but_not_drawn() {
        let (controller, _clock, _platform, _looper) = fixture();
        let a = Rc::new(Recorder::default());
        let b = Rc::new(Recorder::default());
        controller.add_control_component(a.clone(), false);
        controller.add_control_component(b.clone(), true);

        controller.set_play_state(PlaybackState::Preparing);
        assert_eq!(controller.visual_stack().len(), 1);
        assert_eq!(*a.events.borrow(), vec!["state preparing"]);
        assert_eq!(*b.events.borrow(), vec!["state preparing"]);

        controller.set_play_state(PlaybackState::Idle);
        assert_eq!(controller.component_count(), 1);
    }

    #[test]
    fn test_show_fades_out_after_timeout() {
        let (controller, clock, _platform, looper) = fixture();
        let a = Rc::new(Recorder::default());
        controller.add_control_component(a.clone(), false);

        controller.show();
        assert!(controller.is_showing());
        clock.advance(3999);
        looper.run_pending();
        assert!(controller.is_showing());
        clock.advance(1);
        looper.run_pending();
        assert!(!controller.is_showing());
        assert_eq!(*a.events.borrow(), vec!["visible true", "visible false"]);
    }

    #[test]
    fn test_visibility_suppressed_while_locked() {
        let (controller, _clock, _platform, _looper) = fixture();
        let a = Rc::new(Recorder::default());
        controller.add_control_component(a.clone(), false);

        controller.set_locked(true);
        controller.show();
        assert!(controller.is_showing());
        assert_eq!(*a.events.borrow(), vec!["locked true"]);

        assert!(controller.on_back_pressed());
    }

    #[test]
    fn test_idle_unlocks_silently() {
        let (controller, _clock, _platform, _looper) = fixture();
        let a = Rc::new(Recorder::default());
        controller.add_control_component(a.clone(), false);
        controller.set_locked(true);
        controller.set_play_state(PlaybackState::Idle);

        assert!(!controller.is_locked());
        assert_eq!(*a.events.borrow(), vec!["locked true", "state idle"]);
    }

    #[test]
    fn test_display_mode_drives_orientation_listener() {
        let (controller, _clock, platform, _looper) = fixture();
        controller.set_player_state(DisplayMode::FullScreen);
        assert!(controller.is_orientation_listening());
        assert!(platform.sensor_enabled());

        controller.set_player_state(DisplayMode::Normal);
        assert!(!platform.sensor_enabled());

        controller.set_enable_orientation(true);
        controller.set_player_state(DisplayMode::Normal);
        assert!(platform.sensor_enabled());

        controller.set_player_state(DisplayMode::TinyScreen);
        assert!(!platform.sensor_enabled());
    }

    #[test]
    fn test_samples_ignored_while_not_listening() {
        let (controller, _clock, platform, looper) = fixture();
        let sensor = controller.orientation_sensor();
        assert!(sensor.report(OrientationSample::Degrees(270)));
        looper.run_pending();
        assert_eq!(platform.requested_orientation(), ScreenOrientation::Portrait);
    }

    #[test]
    fn test_bind_adapts_to_cutout() {
        let (controller, _clock, platform, _looper) = fixture();
        platform.set_cutout(Some(80));
        let player: Weak<dyn PlayerControl> = Weak::<crate::player::VideoSession>::new();
        controller.bind_player(player);
        assert!(controller.has_cutout());
        assert_eq!(controller.cutout_height(), 80);

        controller.set_player_state(DisplayMode::FullScreen);
        assert!(platform.cutout_short_edges());
    }
}
