//! Platform services consumed by VideoView
//!
//! The widget core never talks to an OS directly. Device queries (network
//! type, screen metrics, stream volume, brightness, orientation requests,
//! display cutout), the view hierarchy hosting the player container, and
//! the system audio focus service are reached through the traits here.
//! [`headless`] provides in-memory implementations.

pub mod headless;

pub use headless::{HeadlessAudioFocus, HeadlessPlatform};

use crate::player::audio_focus::AudioFocusListener;

/// Kind of network the device is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkType {
    NoNetwork,
    /// Network state could not be queried
    Closed,
    Ethernet,
    Wifi,
    /// Metered cellular network
    Mobile,
    Unknown,
}

impl NetworkType {
    /// Whether playing on this network needs explicit user consent
    pub fn is_metered(&self) -> bool {
        matches!(self, NetworkType::Mobile)
    }
}

/// Requested screen orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenOrientation {
    Unspecified,
    Portrait,
    Landscape,
    ReverseLandscape,
}

/// Where the player container is parented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerParent {
    /// Its own place in the application layout
    Root,

    /// The window decoration, covering the whole screen
    Decor,

    /// A floating box over the application content
    ContentOverlay { width: u32, height: u32 },
}

/// Device services
pub trait Platform {
    fn network_type(&self) -> NetworkType;

    /// Screen size in pixels, width first
    fn screen_size(&self) -> (u32, u32);

    /// Pixels per density-independent unit
    fn density(&self) -> f32;

    /// Current media stream volume index
    fn stream_volume(&self) -> u32;

    fn max_stream_volume(&self) -> u32;

    fn set_stream_volume(&self, index: u32);

    /// Window brightness in [0,1], negative when following the system
    fn window_brightness(&self) -> f32;

    fn set_window_brightness(&self, brightness: f32);

    fn set_keep_screen_on(&self, keep_on: bool);

    fn requested_orientation(&self) -> ScreenOrientation;

    fn set_requested_orientation(&self, orientation: ScreenOrientation);

    /// Start or stop delivering orientation sensor samples
    fn set_orientation_sensor_enabled(&self, enabled: bool);

    fn has_display_cutout(&self) -> bool;

    /// Height of the cutout area in pixels
    fn cutout_height(&self) -> u32;

    /// Let content extend into the cutout area
    fn set_cutout_short_edges(&self, enabled: bool);
}

/// View hierarchy hosting one player container
pub trait ContainerHost {
    /// Re-parent the container
    fn move_container(&self, parent: ContainerParent);

    /// Whether a decoration host exists for full screen
    fn has_decor(&self) -> bool;

    fn set_system_bars_hidden(&self, hidden: bool);

    /// Whether the container is currently on screen
    fn is_visible(&self) -> bool;
}

/// System audio focus service
#[cfg_attr(test, mockall::automock)]
pub trait AudioFocusSystem {
    /// Ask for focus; returns true on an immediate grant
    ///
    /// Later changes are reported through `listener`.
    fn request_focus(&self, listener: AudioFocusListener) -> bool;

    /// Give focus back
    fn abandon_focus(&self);
}

/// Whether a touch point lies within 40 dp of any screen edge
pub fn is_edge(platform: &dyn Platform, x: f32, y: f32) -> bool {
    let margin = 40.0 * platform.density();
    let (width, height) = platform.screen_size();
    x < margin || x > width as f32 - margin || y < margin || y > height as f32 - margin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_edge() {
        let platform = HeadlessPlatform::new();
        platform.set_screen(1080, 1920, 2.0);

        assert!(is_edge(&platform, 10.0, 500.0));
        assert!(is_edge(&platform, 1000.0, 500.0));
        assert!(is_edge(&platform, 500.0, 1850.0));
        assert!(!is_edge(&platform, 540.0, 960.0));
    }

    #[test]
    fn test_metered_network() {
        assert!(NetworkType::Mobile.is_metered());
        assert!(!NetworkType::Wifi.is_metered());
        assert!(!NetworkType::Ethernet.is_metered());
    }
}
