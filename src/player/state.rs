//! Playback and display state for VideoView
//!
//! The two axes are independent: a session can be `Paused` in
//! `FullScreen`, `Buffering` in `TinyScreen`, and so on. Only the session
//! changes them; everyone else observes.

use std::fmt;

/// Phase of media progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackState {
    /// Nothing loaded, or released
    #[default]
    Idle,

    /// `prepare_async` issued, waiting for the backend
    Preparing,

    /// Backend reported prepared
    Prepared,

    /// Frames are rendering
    Playing,

    /// Paused by the user or by focus loss
    Paused,

    /// Stalled waiting for data
    Buffering,

    /// Recovered from a stall
    Buffered,

    /// Reached the end of the media
    Completed,

    /// The backend failed
    Error,

    /// First play was refused on a metered network
    StartAborted,
}

impl PlaybackState {
    /// States in which the backend accepts start, pause and seek
    pub fn is_playable(&self) -> bool {
        matches!(
            self,
            PlaybackState::Prepared
                | PlaybackState::Playing
                | PlaybackState::Paused
                | PlaybackState::Buffering
                | PlaybackState::Buffered
        )
    }

    /// States in which gestures and taps act on playback
    ///
    /// Same as [`is_playable`](Self::is_playable) minus `Prepared`.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            PlaybackState::Playing
                | PlaybackState::Paused
                | PlaybackState::Buffering
                | PlaybackState::Buffered
        )
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Preparing => "preparing",
            PlaybackState::Prepared => "prepared",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Buffering => "buffering",
            PlaybackState::Buffered => "buffered",
            PlaybackState::Completed => "completed",
            PlaybackState::Error => "error",
            PlaybackState::StartAborted => "start aborted",
        };
        f.write_str(name)
    }
}

/// Phase of on-screen presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    #[default]
    Normal,
    FullScreen,
    TinyScreen,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisplayMode::Normal => "normal",
            DisplayMode::FullScreen => "full screen",
            DisplayMode::TinyScreen => "tiny screen",
        };
        f.write_str(name)
    }
}
