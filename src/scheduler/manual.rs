//! Simulated clock and task queue
//!
//! Time only moves when [`ManualScheduler::advance`] or
//! [`ManualScheduler::advance_to`] is called. Every task due at or before the
//! target time runs before the call returns, so a timer due at `t` is always
//! processed before anything the caller does at `t`.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use super::{Scheduler, Task, TimerId};
use crate::clock::Clock;

#[derive(Default)]
struct Queue {
    now: Duration,
    next_id: u64,
    /// Keyed by (deadline, id) so equal deadlines run in scheduling order
    tasks: BTreeMap<(Duration, u64), Task>,
    deadlines: HashMap<u64, Duration>,
}

impl Queue {
    /// Remove the earliest task if it is due by `limit`.
    fn pop_due(&mut self, limit: Option<Duration>) -> Option<(Duration, Task)> {
        let (&(deadline, id), _) = self.tasks.first_key_value()?;
        if limit.is_some_and(|limit| deadline > limit) {
            return None;
        }
        let task = self.tasks.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        Some((deadline, task))
    }
}

/// Simulated time source and scheduler. Clones share the same timeline.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<Queue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time.
    pub fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    /// Number of scheduled tasks that have neither fired nor been cancelled.
    pub fn pending_tasks(&self) -> usize {
        self.queue.borrow().tasks.len()
    }

    /// Deadline of the earliest scheduled task.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue
            .borrow()
            .tasks
            .first_key_value()
            .map(|(&(deadline, _), _)| deadline)
    }

    pub fn advance(&self, by: Duration) {
        let target = self.now().saturating_add(by);
        self.advance_to(target);
    }

    /// Move the clock to `target`, running every task due on the way.
    ///
    /// A target in the past leaves the clock where it is.
    pub fn advance_to(&self, target: Duration) {
        self.run_due(Some(target));
        let mut queue = self.queue.borrow_mut();
        if target > queue.now {
            queue.now = target;
        }
    }

    /// Run tasks in deadline order until the queue is empty.
    pub fn run_until_idle(&self) {
        self.run_due(None);
    }

    fn run_due(&self, limit: Option<Duration>) {
        loop {
            // Borrow released before the task runs; tasks may schedule more
            let next = {
                let mut queue = self.queue.borrow_mut();
                let next = queue.pop_due(limit);
                if let Some((deadline, _)) = &next {
                    queue.now = queue.now.max(*deadline);
                }
                next
            };
            let Some((deadline, task)) = next else {
                break;
            };
            log::trace!("manual scheduler: firing task due at {:?}", deadline);
            task();
        }
    }
}

impl Clock for ManualScheduler {
    fn now(&self) -> Duration {
        ManualScheduler::now(self)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerId {
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        let deadline = queue.now.saturating_add(delay);
        queue.tasks.insert((deadline, id), task);
        queue.deadlines.insert(id, deadline);
        TimerId::from_raw(id)
    }

    fn cancel(&self, id: TimerId) {
        let mut queue = self.queue.borrow_mut();
        if let Some(deadline) = queue.deadlines.remove(&id.raw()) {
            queue.tasks.remove(&(deadline, id.raw()));
        }
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queue = self.queue.borrow();
        f.debug_struct("ManualScheduler")
            .field("now", &queue.now)
            .field("pending_tasks", &queue.tasks.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "manual_tests.rs"]
mod manual_tests;
