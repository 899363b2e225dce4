//! Device orientation following
//!
//! Raw sensor angles arrive from any thread through an
//! [`OrientationSensor`]. On the owner thread the [`OrientationArbiter`]
//! debounces them and maps them to coarse buckets; the controller reacts to
//! bucket changes by entering or leaving full screen.

use crate::platform::ScreenOrientation;
use crate::player::looper::{Inbound, PostHandle};
use log::{debug, trace};

/// Samples closer together than this are dropped
pub const SAMPLE_INTERVAL_MS: u64 = 300;

/// One orientation sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationSample {
    /// Device rotation in degrees, [0, 360)
    Degrees(u32),

    /// The device is lying flat
    Unknown,
}

/// Coarse device orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationBucket {
    Portrait,
    ReverseLandscape,
    Landscape,
}

impl OrientationBucket {
    /// Bucket an angle; angles between buckets map to none
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            d if d > 350 || d < 10 => Some(OrientationBucket::Portrait),
            81..=99 => Some(OrientationBucket::ReverseLandscape),
            261..=279 => Some(OrientationBucket::Landscape),
            _ => None,
        }
    }

    pub fn degrees(&self) -> u32 {
        match self {
            OrientationBucket::Portrait => 0,
            OrientationBucket::ReverseLandscape => 90,
            OrientationBucket::Landscape => 270,
        }
    }

    /// Screen orientation to request for this bucket
    pub fn screen_orientation(&self) -> ScreenOrientation {
        match self {
            OrientationBucket::Portrait => ScreenOrientation::Portrait,
            OrientationBucket::ReverseLandscape => ScreenOrientation::ReverseLandscape,
            OrientationBucket::Landscape => ScreenOrientation::Landscape,
        }
    }

    fn matches_request(&self, request: ScreenOrientation) -> bool {
        match (self, request) {
            (OrientationBucket::Portrait, ScreenOrientation::Portrait) => true,
            (OrientationBucket::Landscape, ScreenOrientation::Landscape) => true,
            (OrientationBucket::ReverseLandscape, ScreenOrientation::Landscape) => true,
            (OrientationBucket::ReverseLandscape, ScreenOrientation::ReverseLandscape) => true,
            _ => false,
        }
    }
}

/// Thread-safe entry point for sensor readings
#[derive(Debug, Clone)]
pub struct OrientationSensor {
    post: PostHandle,
}

impl OrientationSensor {
    pub(crate) fn new(post: PostHandle) -> Self {
        Self { post }
    }

    /// Report one reading; returns false once the controller is gone
    pub fn report(&self, sample: OrientationSample) -> bool {
        self.post.post(Inbound::Orientation(sample))
    }
}

/// Debounce and bucket state
#[derive(Debug)]
pub struct OrientationArbiter {
    last_bucket: Option<OrientationBucket>,
    last_sample_ms: Option<u64>,
    manual_request: Option<ScreenOrientation>,
}

impl Default for OrientationArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl OrientationArbiter {
    /// Start out assuming the device is upright
    pub fn new() -> Self {
        Self {
            last_bucket: Some(OrientationBucket::Portrait),
            last_sample_ms: None,
            manual_request: None,
        }
    }

    /// Feed one sample taken at `now_ms`
    ///
    /// # Returns
    ///
    /// The bucket the device just entered, if the controller should react
    pub fn on_sample(&mut self, sample: OrientationSample, now_ms: u64) -> Option<OrientationBucket> {
        if let Some(last) = self.last_sample_ms {
            if now_ms.saturating_sub(last) < SAMPLE_INTERVAL_MS {
                trace!("orientation sample within debounce window dropped");
                return None;
            }
        }
        self.last_sample_ms = Some(now_ms);

        let degrees = match sample {
            OrientationSample::Degrees(degrees) => degrees,
            OrientationSample::Unknown => {
                self.last_bucket = None;
                return None;
            }
        };

        let bucket = OrientationBucket::from_degrees(degrees)?;
        if self.last_bucket == Some(bucket) {
            return None;
        }

        // A suppressed bucket is not recorded, so the next sample in it fires
        if let Some(request) = self.manual_request {
            if bucket.matches_request(request) {
                debug!("orientation {:?} matches the manual request, suppressed", bucket);
                self.manual_request = None;
                return None;
            }
        }
        self.last_bucket = Some(bucket);
        Some(bucket)
    }

    /// Remember an orientation the user asked for explicitly
    pub fn note_manual_request(&mut self, orientation: ScreenOrientation) {
        self.manual_request = Some(orientation);
    }

    /// Back to upright with no pending request
    pub fn reset(&mut self) {
        self.last_bucket = Some(OrientationBucket::Portrait);
        self.manual_request = None;
    }

    pub fn last_bucket(&self) -> Option<OrientationBucket> {
        self.last_bucket
    }
}
