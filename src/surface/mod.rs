//! Rendering surface abstraction for VideoView
//!
//! A surface is the thing video frames end up on. The session creates one
//! per first-play through a [`SurfaceFactory`], attaches it to the backend
//! adapter and keeps it informed of the intrinsic video size, rotation
//! and scale mode. Measuring against those lives in [`MeasureHelper`].

mod measure;
mod offscreen;

pub use measure::MeasureHelper;
pub use offscreen::{OffscreenSurface, OffscreenSurfaceFactory};

use crate::backend::BackendAdapter;
use crate::utils::error::{Result, VideoViewError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the video is fitted into the surface bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Fit inside the bounds keeping the video aspect ratio
    #[default]
    Default,

    /// Force a 16:9 box
    #[serde(rename = "16:9")]
    Ratio16x9,

    /// Force a 4:3 box
    #[serde(rename = "4:3")]
    Ratio4x3,

    /// Stretch to the bounds
    MatchParent,

    /// Intrinsic video size
    Original,

    /// Fill the bounds keeping the aspect ratio, cropping overflow
    CenterCrop,
}

impl FromStr for ScaleMode {
    type Err = VideoViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(ScaleMode::Default),
            "16:9" | "16_9" => Ok(ScaleMode::Ratio16x9),
            "4:3" | "4_3" => Ok(ScaleMode::Ratio4x3),
            "match_parent" => Ok(ScaleMode::MatchParent),
            "original" => Ok(ScaleMode::Original),
            "center_crop" => Ok(ScaleMode::CenterCrop),
            other => Err(VideoViewError::Config(format!("Unknown scale mode '{}'", other))),
        }
    }
}

/// Captured frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,

    /// Tightly packed RGBA pixels
    pub rgba: Vec<u8>,
}

/// Contract every rendering surface implements
pub trait RenderSurface {
    /// Connect the surface to a backend
    fn attach(&mut self, adapter: &mut BackendAdapter);

    /// Intrinsic video size reported by the backend
    fn set_video_size(&mut self, width: u32, height: u32);

    /// Rotation in degrees reported by the stream
    fn set_rotation(&mut self, degrees: u32);

    fn set_scale_mode(&mut self, mode: ScaleMode);

    /// Horizontally mirror the output
    fn set_mirrored(&mut self, mirrored: bool);

    /// Capture the current frame, if the surface can
    fn screenshot(&self) -> Option<Screenshot>;

    /// Measure against the given bounds and return the resulting size
    fn measure(&mut self, width: u32, height: u32) -> (u32, u32);

    /// Free the surface
    fn release(&mut self);
}

/// Creates surfaces; one per first-play or replay
pub trait SurfaceFactory {
    fn create(&self) -> Result<Box<dyn RenderSurface>>;
}

impl<F> SurfaceFactory for F
where
    F: Fn() -> Result<Box<dyn RenderSurface>>,
{
    fn create(&self) -> Result<Box<dyn RenderSurface>> {
        self()
    }
}
