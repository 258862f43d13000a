//! Deferred-task scheduling
//!
//! The debounce controller never owns a timer facility itself. It is handed a
//! [`Scheduler`] that can run a task after a delay and cancel it again.
//!
//! Two hosts are provided:
//! - [`ManualScheduler`]: simulated time, advanced explicitly. Deterministic,
//!   used by tests and by the timeline replay.
//! - [`LocalScheduler`]: real timers on a tokio current-thread runtime.

pub mod local;
pub mod manual;

pub use local::LocalScheduler;
pub use manual::ManualScheduler;

use std::rc::Rc;
use std::time::Duration;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce()>;

/// Handle to a scheduled task, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// "Run this after `delay`" plus "never mind".
///
/// Implementations must not run `task` before `schedule` returns, and must
/// treat cancelling an unknown or already-fired id as a no-op.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerId;
    fn cancel(&self, id: TimerId);
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    fn schedule(&self, delay: Duration, task: Task) -> TimerId {
        (**self).schedule(delay, task)
    }

    fn cancel(&self, id: TimerId) {
        (**self).cancel(id)
    }
}
