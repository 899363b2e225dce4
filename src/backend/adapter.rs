//! Uniform wrapper around a [`MediaBackend`]

use super::{BackendEvent, BackendResult, DisplayHandle, EventSink, InfoCode, MediaBackend, MediaSource};
use log::{debug, warn};
use std::thread::JoinHandle;

/// Wraps a backend instance for the session
///
/// Failed calls never propagate: they are logged and re-raised as
/// [`BackendEvent::Error`] through the sink. Incoming events are filtered
/// by [`BackendAdapter::admit`] before the session acts on them.
pub struct BackendAdapter {
    /// The wrapped backend; taken on release
    backend: Box<dyn MediaBackend>,

    /// Sink shared with the backend
    sink: EventSink,

    /// Set by `prepare_async`, cleared by the first rendering-start
    rendering_armed: bool,
}

impl BackendAdapter {
    pub fn new(backend: Box<dyn MediaBackend>, sink: EventSink) -> Self {
        Self {
            backend,
            sink,
            rendering_armed: false,
        }
    }

    fn guard(&self, result: BackendResult) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("backend call failed: {}", e);
                self.sink.emit(BackendEvent::Error);
                false
            }
        }
    }

    /// Initialize the backend with this adapter's sink
    pub fn init(&mut self) -> bool {
        let result = self.backend.init(self.sink.clone());
        self.guard(result)
    }

    pub fn set_source(&mut self, source: &MediaSource) -> bool {
        let result = self.backend.set_source(source);
        self.guard(result)
    }

    pub fn set_display(&mut self, display: Option<DisplayHandle>) -> bool {
        let result = self.backend.set_display(display);
        self.guard(result)
    }

    pub fn start(&mut self) -> bool {
        let result = self.backend.start();
        self.guard(result)
    }

    pub fn pause(&mut self) -> bool {
        let result = self.backend.pause();
        self.guard(result)
    }

    pub fn stop(&mut self) -> bool {
        let result = self.backend.stop();
        self.guard(result)
    }

    /// Start preparing and arm the rendering-start gate
    pub fn prepare_async(&mut self) -> bool {
        self.rendering_armed = true;
        let result = self.backend.prepare_async();
        self.guard(result)
    }

    pub fn reset(&mut self) -> bool {
        let result = self.backend.reset();
        self.guard(result)
    }

    pub fn seek_to(&mut self, position_ms: u64) -> bool {
        let result = self.backend.seek_to(position_ms);
        self.guard(result)
    }

    pub fn set_speed(&mut self, speed: f32) -> bool {
        let result = self.backend.set_speed(speed);
        self.guard(result)
    }

    pub fn set_looping(&mut self, looping: bool) -> bool {
        let result = self.backend.set_looping(looping);
        self.guard(result)
    }

    pub fn set_volume(&mut self, left: f32, right: f32) -> bool {
        let result = self.backend.set_volume(left, right);
        self.guard(result)
    }

    pub fn is_playing(&self) -> bool {
        self.backend.is_playing()
    }

    pub fn current_position(&self) -> u64 {
        self.backend.current_position()
    }

    pub fn duration(&self) -> u64 {
        self.backend.duration()
    }

    pub fn buffered_percentage(&self) -> u8 {
        self.backend.buffered_percentage().min(100)
    }

    pub fn tcp_speed(&self) -> u64 {
        self.backend.tcp_speed()
    }

    pub fn speed(&self) -> f32 {
        self.backend.speed()
    }

    /// Generation of the wrapped backend instance
    pub fn generation(&self) -> u64 {
        self.sink.generation()
    }

    /// Decide whether an event should reach the session
    ///
    /// Rendering-start passes once per prepare cycle; size changes with a
    /// zero dimension are dropped.
    pub fn admit(&mut self, event: &BackendEvent) -> bool {
        match event {
            BackendEvent::Info {
                code: InfoCode::RenderingStart,
                ..
            } => {
                if self.rendering_armed {
                    self.rendering_armed = false;
                    true
                } else {
                    debug!("repeated rendering-start suppressed");
                    false
                }
            }
            BackendEvent::VideoSizeChanged { width, height } => *width > 0 && *height > 0,
            _ => true,
        }
    }

    /// Tear the backend down on a background thread
    ///
    /// Returns as soon as the worker is spawned; the handle lets callers
    /// wait for teardown if they need to.
    pub fn release(self) -> Option<JoinHandle<()>> {
        let mut backend = self.backend;
        let generation = self.sink.generation();
        let spawned = std::thread::Builder::new()
            .name(format!("backend-release-{}", generation))
            .spawn(move || {
                backend.release();
                debug!("backend generation {} released", generation);
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("could not spawn release worker: {}", e);
                None
            }
        }
    }
}
