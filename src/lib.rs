//! VideoView - embeddable video playback widget core
//!
//! A [`VideoSession`] drives a pluggable media backend through a dual-axis
//! state model ([`PlaybackState`] × [`DisplayMode`]) and fans every change
//! out to a [`Controller`] and the overlay components attached to it.
//!
//! Everything except backend teardown runs on a single owner thread.
//! Backend events, audio focus changes and orientation readings reach that
//! thread through the [`Looper`]; call [`Looper::run_pending`] or
//! [`Looper::poll`] from the owner loop to deliver them.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::rc::Rc;
//! use videoview::backend::{SimulatedBackendFactory, SimulatedMedia};
//! use videoview::controller::StandardController;
//! use videoview::player::{PlayerContext, PlayerControl, VideoSession};
//!
//! let ctx = PlayerContext::builder()
//!     .backend_factory(Rc::new(SimulatedBackendFactory::new(SimulatedMedia::default())))
//!     .build()?;
//! let session = VideoSession::new(ctx.clone());
//! let standard = StandardController::new(&ctx);
//! standard.add_default_control_components("Demo", false);
//! session.set_video_controller(Some(standard.controller().clone()));
//! session.set_url("/media/demo.mp4", HashMap::new());
//! session.start();
//! ctx.looper().run_pending();
//! # Ok::<(), videoview::VideoViewError>(())
//! ```

pub mod backend;
pub mod components;
pub mod controller;
pub mod platform;
pub mod player;
pub mod surface;
pub mod utils;

pub use controller::{ControlComponent, ControlWrapper, Controller, StandardController, VideoController};
pub use player::{
    DisplayMode, Looper, PlaybackState, PlayerContext, PlayerControl, SessionRegistry, VideoSession,
};
pub use utils::{PlayerConfig, Result, VideoViewError};
