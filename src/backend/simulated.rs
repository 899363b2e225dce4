//! Deterministic in-process backend
//!
//! `SimulatedBackend` follows the usual native player state diagram
//! (idle → initialized → prepared → started/paused/completed → stopped)
//! without decoding anything. Time only moves when a [`SimulatedHandle`]
//! advances it, which makes the backend useful for the demo binary and
//! for tests.

use super::{
    BackendError, BackendEvent, BackendFactory, BackendResult, DisplayHandle, EventSink, InfoCode,
    MediaBackend, MediaSource,
};
use crate::utils::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Description of the media a simulated backend pretends to play
#[derive(Debug, Clone)]
pub struct SimulatedMedia {
    /// Media duration in milliseconds
    pub duration_ms: u64,

    /// Intrinsic video width
    pub width: u32,

    /// Intrinsic video height
    pub height: u32,

    /// Reported network throughput
    pub tcp_speed: u64,

    /// Rotation hint reported right after preparation
    pub rotation: Option<i32>,

    /// Report rendering-start on every start and seek, like some native players do
    pub repeat_rendering_start: bool,

    /// Make `prepare_async` fail
    pub fail_prepare: bool,
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self {
            duration_ms: 60_000,
            width: 1280,
            height: 720,
            tcp_speed: 0,
            rotation: None,
            repeat_rendering_start: false,
            fail_prepare: false,
        }
    }
}

/// Lifecycle phase of a simulated backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    Idle,
    Initialized,
    Prepared,
    Started,
    Paused,
    Completed,
    Stopped,
    Released,
}

#[derive(Debug)]
struct Timeline {
    phase: SimPhase,
    source: Option<String>,
    position_ms: u64,
    speed: f32,
    looping: bool,
    volume: (f32, f32),
    sink: Option<EventSink>,
    rendered: bool,
    display: Option<DisplayHandle>,
}

impl Timeline {
    fn emit(&self, event: BackendEvent) {
        if let Some(sink) = &self.sink {
            sink.emit(event);
        }
    }

    fn is_prepared(&self) -> bool {
        matches!(
            self.phase,
            SimPhase::Prepared | SimPhase::Started | SimPhase::Paused | SimPhase::Completed
        )
    }
}

/// A backend that plays nothing, deterministically
pub struct SimulatedBackend {
    media: SimulatedMedia,
    timeline: Arc<Mutex<Timeline>>,
}

/// Control handle for a [`SimulatedBackend`], usable from any thread
#[derive(Clone)]
pub struct SimulatedHandle {
    media: SimulatedMedia,
    timeline: Arc<Mutex<Timeline>>,
}

impl SimulatedBackend {
    /// Create a backend and the handle that drives its clock
    pub fn new(media: SimulatedMedia) -> (Self, SimulatedHandle) {
        let timeline = Arc::new(Mutex::new(Timeline {
            phase: SimPhase::Idle,
            source: None,
            position_ms: 0,
            speed: 1.0,
            looping: false,
            volume: (1.0, 1.0),
            sink: None,
            rendered: false,
            display: None,
        }));

        let handle = SimulatedHandle {
            media: media.clone(),
            timeline: timeline.clone(),
        };
        (Self { media, timeline }, handle)
    }
}

impl MediaBackend for SimulatedBackend {
    fn init(&mut self, events: EventSink) -> BackendResult {
        let mut t = self.timeline.lock();
        if t.phase == SimPhase::Released {
            return Err(BackendError::InvalidState("init"));
        }
        t.sink = Some(events);
        t.phase = SimPhase::Idle;
        Ok(())
    }

    fn set_source(&mut self, source: &MediaSource) -> BackendResult {
        let mut t = self.timeline.lock();
        if t.phase != SimPhase::Idle {
            return Err(BackendError::InvalidState("set_source"));
        }

        let label = match source {
            MediaSource::Url { url, .. } => url.clone(),
            MediaSource::Descriptor(descriptor) => {
                if descriptor.try_clone_file().is_none() {
                    return Err(BackendError::InvalidState("set_source"));
                }
                format!("descriptor@{}", descriptor.start_offset())
            }
        };
        t.source = Some(label);
        t.phase = SimPhase::Initialized;
        Ok(())
    }

    fn set_display(&mut self, display: Option<DisplayHandle>) -> BackendResult {
        let mut t = self.timeline.lock();
        if t.phase == SimPhase::Released {
            return Err(BackendError::InvalidState("set_display"));
        }
        t.display = display;
        Ok(())
    }

    fn start(&mut self) -> BackendResult {
        let mut t = self.timeline.lock();
        if !t.is_prepared() {
            return Err(BackendError::InvalidState("start"));
        }
        if t.phase == SimPhase::Completed {
            t.position_ms = 0;
        }
        t.phase = SimPhase::Started;
        if !t.rendered || self.media.repeat_rendering_start {
            t.rendered = true;
            t.emit(BackendEvent::Info {
                code: InfoCode::RenderingStart,
                extra: 0,
            });
        }
        Ok(())
    }

    fn pause(&mut self) -> BackendResult {
        let mut t = self.timeline.lock();
        match t.phase {
            SimPhase::Started | SimPhase::Paused => {
                t.phase = SimPhase::Paused;
                Ok(())
            }
            _ => Err(BackendError::InvalidState("pause")),
        }
    }

    fn stop(&mut self) -> BackendResult {
        let mut t = self.timeline.lock();
        if t.is_prepared() || t.phase == SimPhase::Stopped {
            t.phase = SimPhase::Stopped;
            Ok(())
        } else {
            Err(BackendError::InvalidState("stop"))
        }
    }

    fn prepare_async(&mut self) -> BackendResult {
        let mut t = self.timeline.lock();
        if !matches!(t.phase, SimPhase::Initialized | SimPhase::Stopped) || self.media.fail_prepare {
            return Err(BackendError::InvalidState("prepare_async"));
        }
        t.phase = SimPhase::Prepared;
        t.rendered = false;
        t.emit(BackendEvent::Prepared);
        t.emit(BackendEvent::VideoSizeChanged {
            width: self.media.width,
            height: self.media.height,
        });
        if let Some(degrees) = self.media.rotation {
            t.emit(BackendEvent::Info {
                code: InfoCode::RotationChanged,
                extra: degrees,
            });
        }
        Ok(())
    }

    fn reset(&mut self) -> BackendResult {
        let mut t = self.timeline.lock();
        if t.phase == SimPhase::Released {
            return Err(BackendError::InvalidState("reset"));
        }
        t.phase = SimPhase::Idle;
        t.source = None;
        t.position_ms = 0;
        t.rendered = false;
        Ok(())
    }

    fn release(&mut self) {
        let mut t = self.timeline.lock();
        t.phase = SimPhase::Released;
        t.sink = None;
        t.display = None;
    }

    fn seek_to(&mut self, position_ms: u64) -> BackendResult {
        let mut t = self.timeline.lock();
        if !t.is_prepared() {
            return Err(BackendError::InvalidState("seek_to"));
        }
        t.position_ms = position_ms.min(self.media.duration_ms);
        if t.phase == SimPhase::Started && self.media.repeat_rendering_start {
            t.emit(BackendEvent::Info {
                code: InfoCode::RenderingStart,
                extra: 0,
            });
        }
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.timeline.lock().phase == SimPhase::Started
    }

    fn current_position(&self) -> u64 {
        self.timeline.lock().position_ms
    }

    fn duration(&self) -> u64 {
        if self.timeline.lock().is_prepared() {
            self.media.duration_ms
        } else {
            0
        }
    }

    fn buffered_percentage(&self) -> u8 {
        if self.timeline.lock().is_prepared() {
            100
        } else {
            0
        }
    }

    fn tcp_speed(&self) -> u64 {
        self.media.tcp_speed
    }

    fn speed(&self) -> f32 {
        self.timeline.lock().speed
    }

    fn set_speed(&mut self, speed: f32) -> BackendResult {
        if speed <= 0.0 {
            return Err(BackendError::InvalidState("set_speed"));
        }
        self.timeline.lock().speed = speed;
        Ok(())
    }

    fn set_looping(&mut self, looping: bool) -> BackendResult {
        self.timeline.lock().looping = looping;
        Ok(())
    }

    fn set_volume(&mut self, left: f32, right: f32) -> BackendResult {
        self.timeline.lock().volume = (left, right);
        Ok(())
    }
}

impl SimulatedHandle {
    /// Move the media clock forward by `ms` of wall time
    ///
    /// Reaching the end reports completion, or wraps around when looping.
    pub fn advance(&self, ms: u64) {
        let mut t = self.timeline.lock();
        if t.phase != SimPhase::Started {
            return;
        }

        let duration = self.media.duration_ms;
        t.position_ms += (ms as f64 * t.speed as f64) as u64;
        if t.position_ms >= duration {
            if t.looping && duration > 0 {
                t.position_ms %= duration;
            } else {
                t.position_ms = duration;
                t.phase = SimPhase::Completed;
                t.emit(BackendEvent::Completion);
            }
        }
    }

    /// Inject an arbitrary event, as a native player would
    pub fn emit(&self, event: BackendEvent) {
        self.timeline.lock().emit(event);
    }

    pub fn phase(&self) -> SimPhase {
        self.timeline.lock().phase
    }

    pub fn position(&self) -> u64 {
        self.timeline.lock().position_ms
    }

    pub fn volume(&self) -> (f32, f32) {
        self.timeline.lock().volume
    }

    pub fn is_looping(&self) -> bool {
        self.timeline.lock().looping
    }

    pub fn source(&self) -> Option<String> {
        self.timeline.lock().source.clone()
    }

    pub fn display(&self) -> Option<DisplayHandle> {
        self.timeline.lock().display
    }

    pub fn is_released(&self) -> bool {
        self.timeline.lock().phase == SimPhase::Released
    }
}

/// Factory producing [`SimulatedBackend`]s and remembering their handles
#[derive(Clone, Default)]
pub struct SimulatedBackendFactory {
    media: SimulatedMedia,
    created: Arc<Mutex<Vec<SimulatedHandle>>>,
}

impl SimulatedBackendFactory {
    pub fn new(media: SimulatedMedia) -> Self {
        Self {
            media,
            created: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle of the most recently created backend
    pub fn last_handle(&self) -> Option<SimulatedHandle> {
        self.created.lock().last().cloned()
    }

    /// Number of backends created so far
    pub fn created_count(&self) -> usize {
        self.created.lock().len()
    }
}

impl BackendFactory for SimulatedBackendFactory {
    fn create(&self) -> Result<Box<dyn MediaBackend>> {
        let (backend, handle) = SimulatedBackend::new(self.media.clone());
        self.created.lock().push(handle);
        Ok(Box::new(backend))
    }
}
