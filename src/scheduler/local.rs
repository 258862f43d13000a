//! Real timers on a tokio current-thread runtime
//!
//! Tasks are spawned with `tokio::task::spawn_local`, so a
//! [`LocalScheduler`] must be used from inside a `tokio::task::LocalSet`.
//! A panic in a fired task is reported by tokio as a panicked task; there is
//! no caller left to hand it to.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::{Scheduler, Task, TimerId};
use crate::clock::Clock;

#[derive(Default)]
struct Handles {
    next_id: u64,
    running: HashMap<u64, JoinHandle<()>>,
}

/// Scheduler and clock backed by `tokio::time`. Clones share the same tasks.
#[derive(Clone)]
pub struct LocalScheduler {
    origin: Instant,
    handles: Rc<RefCell<Handles>>,
}

impl LocalScheduler {
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            handles: Rc::new(RefCell::new(Handles::default())),
        }
    }

    /// Number of spawned timers that have neither fired nor been cancelled.
    pub fn pending_tasks(&self) -> usize {
        self.handles.borrow().running.len()
    }
}

impl Default for LocalScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for LocalScheduler {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Scheduler for LocalScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerId {
        let mut handles = self.handles.borrow_mut();
        let id = handles.next_id;
        handles.next_id += 1;

        let registry = Rc::downgrade(&self.handles);
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().running.remove(&id);
            }
            task();
        });
        handles.running.insert(id, handle);
        TimerId::from_raw(id)
    }

    fn cancel(&self, id: TimerId) {
        if let Some(handle) = self.handles.borrow_mut().running.remove(&id.raw()) {
            log::trace!("local scheduler: aborting timer {}", id.raw());
            handle.abort();
        }
    }
}

impl fmt::Debug for LocalScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalScheduler")
            .field("elapsed", &self.origin.elapsed())
            .field("pending_tasks", &self.pending_tasks())
            .finish()
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod local_tests;
