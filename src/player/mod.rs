//! Player session module for VideoView
//!
//! This module holds the playback session and everything it owns directly:
//! the owner-thread looper, playback/display state, audio focus handling,
//! progress persistence and the process-scoped context sessions are built
//! from.

pub mod audio_focus;
pub mod context;
pub mod looper;
pub mod manager;
pub mod progress;
pub mod session;
pub mod state;

pub use audio_focus::{AudioFocusArbiter, AudioFocusListener, AudioFocusState, FocusActions, FocusChange};
pub use context::{PlayerContext, PlayerContextBuilder};
pub use looper::{Clock, Inbound, InboundHandler, Looper, ManualClock, PostHandle, SystemClock, TaskId};
pub use manager::SessionRegistry;
pub use progress::{FileProgressStore, MemoryProgressStore, ProgressStore};
pub use session::VideoSession;
pub use state::{DisplayMode, PlaybackState};

use crate::surface::{ScaleMode, Screenshot};

/// Playback operations reachable from the controller layer
///
/// Implemented by [`VideoSession`] and forwarded by the
/// [`ControlWrapper`](crate::controller::ControlWrapper). Everything takes
/// `&self`; the implementor keeps its state behind interior mutability so
/// components can call back while a notification is being fanned out.
pub trait PlayerControl {
    /// Start playback, preparing the source first if needed
    fn start(&self);

    /// Pause playback if it is running
    fn pause(&self);

    /// Media duration in milliseconds, 0 when unknown
    fn duration(&self) -> u64;

    /// Current position in milliseconds, 0 when not playable
    fn current_position(&self) -> u64;

    /// Seek to a position
    ///
    /// # Arguments
    ///
    /// * `position_ms` - Target position in milliseconds
    fn seek_to(&self, position_ms: u64);

    fn is_playing(&self) -> bool;

    /// Buffered share of the media, 0 to 100
    fn buffered_percentage(&self) -> u8;

    fn start_full_screen(&self);
    fn stop_full_screen(&self);
    fn is_full_screen(&self) -> bool;

    fn set_mute(&self, mute: bool);
    fn is_mute(&self) -> bool;

    fn set_screen_scale(&self, mode: ScaleMode);

    fn set_speed(&self, speed: f32);

    /// Playback rate, 1.0 when not playable
    fn speed(&self) -> f32;

    /// Network throughput reported by the backend
    fn tcp_speed(&self) -> u64;

    /// Prepare the current source again
    ///
    /// # Arguments
    ///
    /// * `reset_position` - Start from the beginning instead of the last position
    fn replay(&self, reset_position: bool);

    fn set_mirror_rotation(&self, enable: bool);

    /// Capture the current frame, if the surface can
    fn screenshot(&self) -> Option<Screenshot>;

    /// Intrinsic video size, width first
    fn video_size(&self) -> (u32, u32);

    fn set_rotation(&self, degrees: u32);

    fn start_tiny_screen(&self);
    fn stop_tiny_screen(&self);
    fn is_tiny_screen(&self) -> bool;

    fn play_state(&self) -> PlaybackState;
    fn display_mode(&self) -> DisplayMode;

    /// Allow playback on a metered network from now on
    fn set_play_on_mobile_network(&self, allow: bool);
}

/// Observer of a session's state changes
///
/// Both methods default to doing nothing so listeners implement only
/// what they need.
pub trait OnStateChangeListener {
    fn on_player_state_changed(&self, _mode: DisplayMode) {}

    fn on_play_state_changed(&self, _state: PlaybackState) {}
}
