//! Media backend abstraction for VideoView
//!
//! A backend is whatever actually decodes and plays media. The session never
//! talks to one directly; it goes through a [`BackendAdapter`], which turns
//! every failed call into a single [`BackendEvent::Error`] and filters the
//! event stream before it reaches the owner thread.

mod adapter;
mod simulated;

pub use adapter::BackendAdapter;
pub use simulated::{SimPhase, SimulatedBackend, SimulatedBackendFactory, SimulatedHandle, SimulatedMedia};

use crate::player::looper::{Inbound, PostHandle};
use crate::utils::error::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// The one failure a backend call may report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The operation is not valid in the backend's current state
    #[error("invalid operation for current backend state: {0}")]
    InvalidState(&'static str),
}

/// Result type for backend calls
pub type BackendResult = std::result::Result<(), BackendError>;

/// Info codes carried by [`BackendEvent::Info`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoCode {
    /// First video frame was rendered
    RenderingStart,

    /// Playback stalled waiting for data
    BufferingStart,

    /// Enough data is buffered to continue
    BufferingEnd,

    /// The stream carries a rotation hint; `extra` holds the degrees
    RotationChanged,

    /// Any other backend-specific code
    Other(i32),
}

impl InfoCode {
    /// Map a raw numeric info code
    pub fn from_raw(code: i32) -> Self {
        match code {
            3 => InfoCode::RenderingStart,
            701 => InfoCode::BufferingStart,
            702 => InfoCode::BufferingEnd,
            10001 => InfoCode::RotationChanged,
            other => InfoCode::Other(other),
        }
    }

    /// The raw numeric code
    pub fn raw(&self) -> i32 {
        match self {
            InfoCode::RenderingStart => 3,
            InfoCode::BufferingStart => 701,
            InfoCode::BufferingEnd => 702,
            InfoCode::RotationChanged => 10001,
            InfoCode::Other(code) => *code,
        }
    }
}

/// Events a backend reports through its [`EventSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendEvent {
    /// Playback failed
    Error,

    /// Playback reached the end of the media
    Completion,

    /// Informational event
    Info { code: InfoCode, extra: i32 },

    /// `prepare_async` finished
    Prepared,

    /// Intrinsic video size became known or changed
    VideoSizeChanged { width: u32, height: u32 },
}

/// Thread-safe sink a backend reports its events into
///
/// Events are tagged with the generation of the backend instance so the
/// session can drop anything a released backend still emits.
#[derive(Debug, Clone)]
pub struct EventSink {
    post: PostHandle,
    generation: u64,
}

impl EventSink {
    pub fn new(post: PostHandle, generation: u64) -> Self {
        Self { post, generation }
    }

    /// Enqueue an event for the owner thread
    pub fn emit(&self, event: BackendEvent) {
        if !self.post.post(Inbound::Backend {
            generation: self.generation,
            event,
        }) {
            log::debug!("event {:?} dropped, owner loop is gone", event);
        }
    }

    /// Generation of the backend instance this sink belongs to
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Opaque handle to the display a surface renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayHandle(pub u64);

/// A local media file opened by the embedding application
///
/// The session closes the descriptor when it is released.
#[derive(Debug)]
pub struct LocalDescriptor {
    file: Mutex<Option<File>>,
    start_offset: u64,
    length: Option<u64>,
}

impl LocalDescriptor {
    /// Open a file for playback from its beginning
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_file(file, 0, None))
    }

    /// Wrap an already opened file, optionally restricted to a byte range
    pub fn from_file(file: File, start_offset: u64, length: Option<u64>) -> Self {
        Self {
            file: Mutex::new(Some(file)),
            start_offset,
            length,
        }
    }

    /// Whether the descriptor is still open
    pub fn is_open(&self) -> bool {
        self.file.lock().is_some()
    }

    /// Close the descriptor; later calls are no-ops
    pub fn close(&self) {
        if self.file.lock().take().is_some() {
            log::debug!("local descriptor closed");
        }
    }

    /// Duplicate the underlying file handle for a backend
    pub fn try_clone_file(&self) -> Option<File> {
        self.file.lock().as_ref().and_then(|f| f.try_clone().ok())
    }

    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    pub fn length(&self) -> Option<u64> {
        self.length
    }
}

/// Where the media comes from
#[derive(Debug, Clone)]
pub enum MediaSource {
    /// Locator plus optional request headers
    Url {
        url: String,
        headers: HashMap<String, String>,
    },

    /// Local file descriptor
    Descriptor(Arc<LocalDescriptor>),
}

impl MediaSource {
    /// A locator without headers
    pub fn url<S: Into<String>>(url: S) -> Self {
        MediaSource::Url {
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    /// Whether playing this source never touches the network
    pub fn is_local(&self) -> bool {
        match self {
            MediaSource::Descriptor(_) => true,
            MediaSource::Url { url, .. } => match url.split_once("://") {
                Some((scheme, _)) => matches!(
                    scheme.to_ascii_lowercase().as_str(),
                    "file" | "android.resource" | "rawresource" | "asset"
                ),
                None => true,
            },
        }
    }

    /// Key under which playback progress is persisted
    pub fn progress_key(&self) -> Option<&str> {
        match self {
            MediaSource::Url { url, .. } => Some(url.as_str()),
            MediaSource::Descriptor(_) => None,
        }
    }
}

/// Contract every media backend implements
///
/// Calls run on the owner thread except [`MediaBackend::release`], which is
/// handed to a background thread because native teardown may block.
pub trait MediaBackend: Send {
    /// Initialize the backend and hand it the event sink
    fn init(&mut self, events: EventSink) -> BackendResult;

    /// Set the media to play
    fn set_source(&mut self, source: &MediaSource) -> BackendResult;

    /// Attach or detach the display surface
    fn set_display(&mut self, display: Option<DisplayHandle>) -> BackendResult;

    fn start(&mut self) -> BackendResult;
    fn pause(&mut self) -> BackendResult;
    fn stop(&mut self) -> BackendResult;

    /// Begin asynchronous preparation; completion is reported as [`BackendEvent::Prepared`]
    fn prepare_async(&mut self) -> BackendResult;

    /// Return to the uninitialized-source state so a new source can be set
    fn reset(&mut self) -> BackendResult;

    /// Free all native resources; may block
    fn release(&mut self);

    /// Seek to a position in milliseconds
    fn seek_to(&mut self, position_ms: u64) -> BackendResult;

    fn is_playing(&self) -> bool;
    fn current_position(&self) -> u64;
    fn duration(&self) -> u64;
    fn buffered_percentage(&self) -> u8;

    /// Network throughput in bytes per second, 0 when unknown
    fn tcp_speed(&self) -> u64;

    fn speed(&self) -> f32;
    fn set_speed(&mut self, speed: f32) -> BackendResult;
    fn set_looping(&mut self, looping: bool) -> BackendResult;
    fn set_volume(&mut self, left: f32, right: f32) -> BackendResult;
}

/// Creates backend instances; one per first-play
pub trait BackendFactory {
    fn create(&self) -> Result<Box<dyn MediaBackend>>;
}

impl<F> BackendFactory for F
where
    F: Fn() -> Result<Box<dyn MediaBackend>>,
{
    fn create(&self) -> Result<Box<dyn MediaBackend>> {
        self()
    }
}
