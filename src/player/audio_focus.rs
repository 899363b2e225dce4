//! Audio focus arbitration
//!
//! The system may report focus changes from any thread. An
//! [`AudioFocusListener`] drops consecutive duplicates and forwards the
//! rest to the owner loop, where the session feeds them to its
//! [`AudioFocusArbiter`] together with the current playing/muted flags and
//! applies the returned [`FocusActions`].

use crate::platform::AudioFocusSystem;
use crate::player::looper::{Inbound, PostHandle};
use log::{debug, warn};
use parking_lot::Mutex;
use std::rc::Rc;
use std::sync::Arc;

/// Focus change reported by the system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    Gain,
    GainTransient,
    Loss,
    LossTransient,
    LossTransientCanDuck,
}

/// What the arbiter believes it currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFocusState {
    #[default]
    None,
    Granted,
    TransientLoss,
    TransientDuckLoss,
    PermanentLoss,
}

/// Thread-safe receiver of system focus callbacks
#[derive(Debug, Clone)]
pub struct AudioFocusListener {
    post: PostHandle,
    last: Arc<Mutex<Option<FocusChange>>>,
}

impl AudioFocusListener {
    pub fn new(post: PostHandle) -> Self {
        Self {
            post,
            last: Arc::new(Mutex::new(None)),
        }
    }

    /// Called by the focus system, possibly off the owner thread
    pub fn on_focus_change(&self, change: FocusChange) {
        {
            let mut last = self.last.lock();
            if *last == Some(change) {
                return;
            }
            *last = Some(change);
        }
        if !self.post.post(Inbound::AudioFocus(change)) {
            debug!("focus change {:?} dropped, owner loop is gone", change);
        }
    }

    /// Forget the last change so the next one is always forwarded
    pub fn reset(&self) {
        *self.last.lock() = None;
    }
}

/// Side effects the session must apply after a focus change
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FocusActions {
    /// Resume playback
    pub resume: bool,

    /// Pause playback, keeping focus
    pub pause: bool,

    /// New backend volume for both channels
    pub volume: Option<f32>,
}

/// Owner-thread focus bookkeeping for one session
pub struct AudioFocusArbiter {
    system: Rc<dyn AudioFocusSystem>,
    listener: AudioFocusListener,
    state: AudioFocusState,
    start_requested: bool,
    paused_for_loss: bool,
}

impl AudioFocusArbiter {
    pub fn new(system: Rc<dyn AudioFocusSystem>, listener: AudioFocusListener) -> Self {
        Self {
            system,
            listener,
            state: AudioFocusState::None,
            start_requested: false,
            paused_for_loss: false,
        }
    }

    /// Ask the system for focus
    ///
    /// Returns true if focus is held afterwards. A refused request is
    /// remembered so a later grant resumes playback.
    pub fn request_focus(&mut self) -> bool {
        if self.state == AudioFocusState::Granted {
            return true;
        }

        if self.system.request_focus(self.listener.clone()) {
            self.state = AudioFocusState::Granted;
            true
        } else {
            warn!("audio focus not granted, playing without focus handling");
            self.start_requested = true;
            false
        }
    }

    /// Give focus back and forget any pending resume
    pub fn abandon_focus(&mut self) {
        self.system.abandon_focus();
        self.listener.reset();
        self.state = AudioFocusState::None;
        self.start_requested = false;
        self.paused_for_loss = false;
    }

    /// Apply a focus change delivered on the owner thread
    pub fn on_focus_change(&mut self, change: FocusChange, playing: bool, muted: bool) -> FocusActions {
        let mut actions = FocusActions::default();
        match change {
            FocusChange::Gain | FocusChange::GainTransient => {
                self.state = AudioFocusState::Granted;
                if self.start_requested || self.paused_for_loss {
                    actions.resume = true;
                    self.start_requested = false;
                    self.paused_for_loss = false;
                }
                if !muted {
                    actions.volume = Some(1.0);
                }
            }
            FocusChange::Loss | FocusChange::LossTransient => {
                self.state = if change == FocusChange::Loss {
                    AudioFocusState::PermanentLoss
                } else {
                    AudioFocusState::TransientLoss
                };
                if playing {
                    self.paused_for_loss = true;
                    actions.pause = true;
                }
            }
            FocusChange::LossTransientCanDuck => {
                self.state = AudioFocusState::TransientDuckLoss;
                if playing && !muted {
                    actions.volume = Some(0.1);
                }
            }
        }
        debug!("audio focus {:?} -> {:?}, {:?}", change, self.state, actions);
        actions
    }

    pub fn state(&self) -> AudioFocusState {
        self.state
    }

    pub fn is_paused_for_loss(&self) -> bool {
        self.paused_for_loss
    }

    pub fn is_start_requested(&self) -> bool {
        self.start_requested
    }
}
