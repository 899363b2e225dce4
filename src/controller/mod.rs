//! Controller layer for VideoView
//!
//! A [`Controller`] sits between a session and its overlay components. It
//! owns the [`ComponentRegistry`], the lock and showing flags, the chrome
//! fade-out timer, the progress poll and orientation following. Components
//! never see the session or the controller directly; they are bound to a
//! [`ControlWrapper`] that forwards to both.

pub mod base;
pub mod gesture;
pub mod orientation;
pub mod registry;
pub mod standard;
pub mod wrapper;

pub use base::Controller;
pub use gesture::{GestureArbiter, GestureMode, TouchEvent};
pub use orientation::{OrientationArbiter, OrientationBucket, OrientationSample, OrientationSensor};
pub use registry::ComponentRegistry;
pub use standard::{DefaultComponents, LoadingIndicator, LockButton, StandardController};
pub use wrapper::ControlWrapper;

use crate::platform::ScreenOrientation;
use crate::player::{DisplayMode, PlaybackState};

/// Overlay component attached to a controller
///
/// Only [`bind`](ControlComponent::bind) is required. A component keeps
/// the wrapper it is bound with and reacts to the notifications it cares
/// about.
pub trait ControlComponent {
    /// Hand the component its wrapper; called once per binding
    fn bind(&self, wrapper: ControlWrapper);

    /// The chrome was shown or hidden
    ///
    /// `animated` is a transition hint for the view layer.
    fn on_visibility_changed(&self, _visible: bool, _animated: bool) {}

    fn on_play_state_changed(&self, _state: PlaybackState) {}

    fn on_player_state_changed(&self, _mode: DisplayMode) {}

    /// Periodic progress while playing
    fn on_progress(&self, _duration: u64, _position: u64) {}

    fn on_lock_state_changed(&self, _locked: bool) {}

    /// Gesture feedback capability, if the component has one
    fn as_gesture(&self) -> Option<&dyn GestureComponent> {
        None
    }
}

/// Receiver of slide feedback from the gesture arbiter
pub trait GestureComponent {
    fn on_start_slide(&self);

    fn on_stop_slide(&self);

    /// A seek is being dragged to `slide_position`
    fn on_position_change(&self, slide_position: u64, current_position: u64, duration: u64);

    /// Brightness changed, 0 to 100
    fn on_brightness_change(&self, percent: u8);

    /// Stream volume changed, 0 to 100
    fn on_volume_change(&self, percent: u8);
}

/// One slide notification, dispatched to every gesture-capable component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideEvent {
    Start,
    Stop,
    Position {
        slide_position: u64,
        current_position: u64,
        duration: u64,
    },
    Brightness(u8),
    Volume(u8),
}

impl SlideEvent {
    /// Deliver this event to one receiver
    pub fn deliver(&self, target: &dyn GestureComponent) {
        match *self {
            SlideEvent::Start => target.on_start_slide(),
            SlideEvent::Stop => target.on_stop_slide(),
            SlideEvent::Position {
                slide_position,
                current_position,
                duration,
            } => target.on_position_change(slide_position, current_position, duration),
            SlideEvent::Brightness(percent) => target.on_brightness_change(percent),
            SlideEvent::Volume(percent) => target.on_volume_change(percent),
        }
    }
}

/// Controller operations reachable from components
pub trait VideoController {
    /// (Re)arm the timer that hides the chrome
    fn start_fade_out(&self);

    fn stop_fade_out(&self);

    fn is_showing(&self) -> bool;

    fn set_locked(&self, locked: bool);

    fn is_locked(&self) -> bool;

    /// Start polling progress for `on_progress`
    fn start_progress(&self);

    fn stop_progress(&self);

    /// Show the chrome and arm the fade-out
    fn show(&self);

    fn hide(&self);

    /// Whether the device has a display cutout being adapted to
    fn has_cutout(&self) -> bool;

    fn cutout_height(&self) -> u32;

    /// Request a screen orientation on behalf of the user
    fn request_orientation(&self, orientation: ScreenOrientation);

    fn requested_orientation(&self) -> ScreenOrientation;

    /// Fan a slide notification out to gesture-capable components
    fn dispatch_slide(&self, event: SlideEvent);
}
