//! Surface without pixels
//!
//! Tracks everything a real surface would (attachment, video size,
//! rotation, scale mode, mirroring) and measures with [`MeasureHelper`],
//! but never holds a frame. Used headless and in tests.

use super::{MeasureHelper, RenderSurface, ScaleMode, Screenshot, SurfaceFactory};
use crate::backend::{BackendAdapter, DisplayHandle};
use crate::utils::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_DISPLAY: AtomicU64 = AtomicU64::new(1);

/// Measuring surface with no frame storage
#[derive(Debug)]
pub struct OffscreenSurface {
    handle: DisplayHandle,
    measure: MeasureHelper,
    mirrored: bool,
    attached: bool,
    released: bool,
    measured: (u32, u32),
}

impl OffscreenSurface {
    pub fn new() -> Self {
        Self {
            handle: DisplayHandle(NEXT_DISPLAY.fetch_add(1, Ordering::Relaxed)),
            measure: MeasureHelper::new(),
            mirrored: false,
            attached: false,
            released: false,
            measured: (0, 0),
        }
    }

    pub fn handle(&self) -> DisplayHandle {
        self.handle
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Size from the most recent [`RenderSurface::measure`] call
    pub fn measured_size(&self) -> (u32, u32) {
        self.measured
    }

    pub fn helper(&self) -> &MeasureHelper {
        &self.measure
    }
}

impl Default for OffscreenSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for OffscreenSurface {
    fn attach(&mut self, adapter: &mut BackendAdapter) {
        self.attached = adapter.set_display(Some(self.handle));
    }

    fn set_video_size(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.measure.set_video_size(width, height);
        }
    }

    fn set_rotation(&mut self, degrees: u32) {
        self.measure.set_rotation(degrees);
    }

    fn set_scale_mode(&mut self, mode: ScaleMode) {
        self.measure.set_scale_mode(mode);
    }

    fn set_mirrored(&mut self, mirrored: bool) {
        self.mirrored = mirrored;
    }

    fn screenshot(&self) -> Option<Screenshot> {
        None
    }

    fn measure(&mut self, width: u32, height: u32) -> (u32, u32) {
        self.measured = self.measure.measure(width, height);
        self.measured
    }

    fn release(&mut self) {
        self.attached = false;
        self.released = true;
    }
}

/// Factory for [`OffscreenSurface`]
#[derive(Debug, Clone, Copy, Default)]
pub struct OffscreenSurfaceFactory;

impl SurfaceFactory for OffscreenSurfaceFactory {
    fn create(&self) -> Result<Box<dyn RenderSurface>> {
        Ok(Box::new(OffscreenSurface::new()))
    }
}
