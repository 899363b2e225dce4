//! Owner-thread task queue
//!
//! Every piece of session state lives on one owner thread. Backends, the
//! audio focus system and the orientation sensor may call in from any
//! thread; they hold a [`PostHandle`] and enqueue an [`Inbound`] message
//! which the [`Looper`] later dispatches on the owner thread. Owner-only
//! work (progress polling, the chrome fade-out) is scheduled as delayed
//! closures on the same looper.

use crate::backend::BackendEvent;
use crate::controller::orientation::OrientationSample;
use crate::player::audio_focus::FocusChange;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, trace};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

/// Identifies the owner-side handler a message is addressed to
pub type HandlerId = u64;

/// Messages that may be produced on any thread
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Event raised by a backend instance of the given generation
    Backend {
        generation: u64,
        event: BackendEvent,
    },

    /// Audio focus change reported by the system
    AudioFocus(FocusChange),

    /// Raw orientation sensor sample
    Orientation(OrientationSample),
}

/// Owner-thread receiver of [`Inbound`] messages
pub trait InboundHandler {
    /// Handle one message on the owner thread
    fn handle_inbound(&self, message: Inbound);
}

/// Monotonic millisecond time source
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by [`Instant`]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to
#[derive(Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

struct Envelope {
    target: HandlerId,
    message: Inbound,
}

/// Thread-safe handle used to enqueue messages for one handler
#[derive(Clone)]
pub struct PostHandle {
    tx: Sender<Envelope>,
    target: HandlerId,
}

impl PostHandle {
    /// Enqueue a message; returns false once the looper is gone
    pub fn post(&self, message: Inbound) -> bool {
        self.tx
            .send(Envelope {
                target: self.target,
                message,
            })
            .is_ok()
    }

    /// The handler this handle posts to
    pub fn target(&self) -> HandlerId {
        self.target
    }
}

impl std::fmt::Debug for PostHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostHandle").field("target", &self.target).finish()
    }
}

/// Token identifying a scheduled owner-thread task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

struct DelayedTask {
    id: TaskId,
    due_ms: u64,
    task: Box<dyn FnOnce()>,
}

struct LooperInner {
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
    handlers: RefCell<HashMap<HandlerId, Weak<dyn InboundHandler>>>,
    tasks: RefCell<Vec<DelayedTask>>,
    next_id: Cell<u64>,
    clock: Rc<dyn Clock>,
}

/// Owner-thread message and timer queue
///
/// Cloning a `Looper` yields another handle to the same queue.
#[derive(Clone)]
pub struct Looper {
    inner: Rc<LooperInner>,
}

impl Looper {
    /// Create a looper driven by the system clock
    pub fn new() -> Self {
        Self::with_clock(Rc::new(SystemClock::new()))
    }

    /// Create a looper driven by the given clock
    pub fn with_clock(clock: Rc<dyn Clock>) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            inner: Rc::new(LooperInner {
                tx,
                rx,
                handlers: RefCell::new(HashMap::new()),
                tasks: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
                clock,
            }),
        }
    }

    /// Current time according to the looper's clock
    pub fn now_ms(&self) -> u64 {
        self.inner.clock.now_ms()
    }

    fn next_id(&self) -> u64 {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        id
    }

    /// Register an inbound handler and get the handle that posts to it
    pub fn register(&self, handler: Weak<dyn InboundHandler>) -> PostHandle {
        let id = self.next_id();
        self.inner.handlers.borrow_mut().insert(id, handler);
        PostHandle {
            tx: self.inner.tx.clone(),
            target: id,
        }
    }

    /// Forget a handler; messages still queued for it are dropped
    pub fn unregister(&self, id: HandlerId) {
        self.inner.handlers.borrow_mut().remove(&id);
    }

    /// Schedule a closure to run on the owner thread as soon as possible
    pub fn post<F: FnOnce() + 'static>(&self, task: F) -> TaskId {
        self.post_delayed(0, task)
    }

    /// Schedule a closure to run on the owner thread after `delay_ms`
    pub fn post_delayed<F: FnOnce() + 'static>(&self, delay_ms: u64, task: F) -> TaskId {
        let id = TaskId(self.next_id());
        let due_ms = self.now_ms() + delay_ms;
        trace!("scheduled task {:?} due at {}ms", id, due_ms);
        self.inner.tasks.borrow_mut().push(DelayedTask {
            id,
            due_ms,
            task: Box::new(task),
        });
        id
    }

    /// Cancel a scheduled task; returns false if it already ran
    pub fn cancel(&self, id: TaskId) -> bool {
        let mut tasks = self.inner.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        before != tasks.len()
    }

    /// Whether the given task is still waiting to run
    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.inner.tasks.borrow().iter().any(|t| t.id == id)
    }

    /// Number of scheduled owner-thread tasks
    pub fn pending_tasks(&self) -> usize {
        self.inner.tasks.borrow().len()
    }

    fn take_due_task(&self) -> Option<DelayedTask> {
        let now = self.now_ms();
        let mut tasks = self.inner.tasks.borrow_mut();
        let index = tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i)?;
        Some(tasks.remove(index))
    }

    fn next_due_ms(&self) -> Option<u64> {
        self.inner.tasks.borrow().iter().map(|t| t.due_ms).min()
    }

    fn dispatch(&self, envelope: Envelope) {
        let handler = self
            .inner
            .handlers
            .borrow()
            .get(&envelope.target)
            .and_then(Weak::upgrade);

        match handler {
            Some(handler) => handler.handle_inbound(envelope.message),
            None => debug!(
                "dropping {:?} for unregistered handler {}",
                envelope.message, envelope.target
            ),
        }
    }

    /// Run every queued message and every due task
    ///
    /// # Returns
    ///
    /// The number of messages and tasks that were run
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            while let Ok(envelope) = self.inner.rx.try_recv() {
                self.dispatch(envelope);
                ran += 1;
            }

            match self.take_due_task() {
                Some(task) => {
                    (task.task)();
                    ran += 1;
                }
                None => break,
            }
        }
        ran
    }

    /// Block for up to `timeout` waiting for work, then run what is ready
    pub fn poll(&self, timeout: Duration) -> usize {
        let wait = match self.next_due_ms() {
            Some(due) => timeout.min(Duration::from_millis(due.saturating_sub(self.now_ms()))),
            None => timeout,
        };

        let mut ran = 0;
        match self.inner.rx.recv_timeout(wait) {
            Ok(envelope) => {
                self.dispatch(envelope);
                ran += 1;
            }
            Err(RecvTimeoutError::Timeout) => {}
            // The looper owns a sender, so the channel cannot disconnect.
            Err(RecvTimeoutError::Disconnected) => {}
        }
        ran + self.run_pending()
    }
}

impl Default for Looper {
    fn default() -> Self {
        Self::new()
    }
}
