//! The debounced proxy and its control surface
//!
//! A [`Debounced`] wraps an action `FnMut(C, A) -> R`. Calling it records the
//! arguments and caller context, decides whether to execute now (leading edge)
//! and arranges a deferred trailing edge through the injected [`Scheduler`].
//! Every call returns the result of the most recent execution, which is not
//! necessarily one triggered by that call.
//!
//! ## Call decision
//!
//! A call is *forced* when nothing has executed since construction (or since
//! `cancel`), or when `max_wait` has elapsed since the last execution.
//!
//! | forced | timer outstanding | effect                                        |
//! |--------|-------------------|-----------------------------------------------|
//! | yes    | no                | run now if `leading`, then start the timer    |
//! | yes    | yes               | restart the timer if `max_wait` is set        |
//! | no     | no                | start the timer                               |
//! | no     | yes               | nothing, the running timer keeps its deadline |
//!
//! With `max_wait` set, a timer is never scheduled past the max-wait deadline
//! (last execution, or window start before the first execution, plus
//! `max_wait`). Restarting on every forced call therefore cannot postpone the
//! trailing edge indefinitely.
//!
//! ## Failures
//!
//! The state borrow is released while the action runs, so a panicking action
//! leaves consistent state behind. A panic during a call or `flush` unwinds to
//! that caller. A panic in a timer-fired trailing edge unwinds into the
//! scheduler host. Fallible actions should return `Result`, which reaches the
//! triggering caller as the returned value.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::options::DebounceOptions;
use super::state::{DebounceState, PendingCall};
use crate::clock::Clock;
use crate::error::DebounceError;
use crate::scheduler::Scheduler;

type Action<C, A, R> = Box<dyn FnMut(C, A) -> R>;

/// What a call does after recording its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallStep {
    /// Opens a window: maybe run the leading edge, then start the timer
    OpenWindow,
    /// Replace the outstanding timer with a fresh `wait`
    RestartTimer,
    StartTimer,
    Hold,
}

struct Inner<C, A, R> {
    options: DebounceOptions,
    state: RefCell<DebounceState<C, A, R>>,
    action: RefCell<Action<C, A, R>>,
    /// Set while the action runs
    running: Cell<bool>,
    clock: Box<dyn Clock>,
    scheduler: Box<dyn Scheduler>,
}

impl<C, A, R> Drop for Inner<C, A, R> {
    fn drop(&mut self) {
        if let Some(id) = self.state.get_mut().pending_timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

/// Clears the running flag even if the action panics
struct RunningGuard<'a>(&'a Cell<bool>);

impl<'a> RunningGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// A debounced action with `cancel` and `flush` attached.
///
/// Cloning is cheap; clones share the same state and timer. Dropping the last
/// clone cancels the outstanding timer.
pub struct Debounced<C, A, R> {
    inner: Rc<Inner<C, A, R>>,
}

impl<C, A, R> Clone for Debounced<C, A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C, A, R> Debounced<C, A, R>
where
    C: 'static,
    A: 'static,
    R: Clone + 'static,
{
    pub fn new<F>(
        action: F,
        options: DebounceOptions,
        clock: impl Clock + 'static,
        scheduler: impl Scheduler + 'static,
    ) -> Self
    where
        F: FnMut(C, A) -> R + 'static,
    {
        log::debug!(
            "debounce: created wait={:?} leading={} trailing={} max_wait={:?}",
            options.wait,
            options.leading,
            options.trailing,
            options.max_wait
        );
        if options.is_inert() {
            log::warn!("debounce: neither leading nor trailing is enabled, the action will never run");
        }
        Self {
            inner: Rc::new(Inner {
                options,
                state: RefCell::new(DebounceState::new()),
                action: RefCell::new(Box::new(action)),
                running: Cell::new(false),
                clock: Box::new(clock),
                scheduler: Box::new(scheduler),
            }),
        }
    }

    /// Call with an explicit caller context.
    ///
    /// A call made from inside this proxy's own action is recorded as pending
    /// and left to the trailing edge; it never executes immediately.
    pub fn call_with_context(&self, context: C, args: A) -> Option<R> {
        let options = self.inner.options;
        let now = self.inner.clock.now();

        if self.inner.running.get() {
            log::debug!("debounce: call from inside the action at {:?}, deferring", now);
            let has_timer = {
                let mut state = self.inner.state.borrow_mut();
                state.record_call(now, context, args);
                state.has_timer()
            };
            if !has_timer {
                self.start_timer(now);
            }
            return self.last_result();
        }

        let step = {
            let mut state = self.inner.state.borrow_mut();
            state.record_call(now, context, args);
            let forced = state.is_forced(now, options.max_wait);
            match (forced, state.has_timer()) {
                (true, false) => CallStep::OpenWindow,
                (true, true) if options.max_wait.is_some() => CallStep::RestartTimer,
                (false, false) => CallStep::StartTimer,
                _ => CallStep::Hold,
            }
        };
        log::trace!("debounce: call at {:?} -> {:?}", now, step);

        match step {
            CallStep::OpenWindow => {
                self.inner.state.borrow_mut().open_window(now);
                if options.leading {
                    log::debug!("debounce: leading edge at {:?}", now);
                    self.invoke_pending(now);
                }
                self.start_timer(now);
            }
            CallStep::RestartTimer | CallStep::StartTimer => self.start_timer(now),
            CallStep::Hold => {}
        }

        self.last_result()
    }

    /// Cancel the outstanding trailing edge and start a fresh window sequence.
    ///
    /// Pending arguments are dropped without executing. Idempotent.
    pub fn cancel(&self) {
        let timer = {
            let mut state = self.inner.state.borrow_mut();
            state.reset();
            state.pending_timer.take()
        };
        if let Some(id) = timer {
            log::debug!("debounce: cancelled pending timer");
            self.inner.scheduler.cancel(id);
        }
    }

    /// Run the trailing edge now if a timer is outstanding.
    ///
    /// Returns the fresh result, or the last stored result when nothing was
    /// outstanding. A re-entrant flush is ignored with a warning.
    pub fn flush(&self) -> Option<R> {
        match self.try_flush() {
            Ok(result) => result,
            Err(err) => {
                log::warn!("debounce: {}", err);
                self.last_result()
            }
        }
    }

    pub fn try_flush(&self) -> Result<Option<R>, DebounceError> {
        if self.inner.running.get() {
            return Err(DebounceError::Reentrant);
        }

        let timer = self.inner.state.borrow_mut().pending_timer.take();
        match timer {
            Some(id) => {
                self.inner.scheduler.cancel(id);
                let now = self.inner.clock.now();
                log::debug!("debounce: flush at {:?}", now);
                Ok(self.trailing_edge(now))
            }
            None => Ok(self.last_result()),
        }
    }

    /// True while a trailing-edge timer is outstanding.
    pub fn is_pending(&self) -> bool {
        self.inner.state.borrow().has_timer()
    }

    pub fn options(&self) -> DebounceOptions {
        self.inner.options
    }

    pub fn last_result(&self) -> Option<R> {
        self.inner.state.borrow().last_result().cloned()
    }

    pub fn last_call_time(&self) -> Option<Duration> {
        self.inner.state.borrow().last_call_time()
    }

    pub fn last_invoke_time(&self) -> Option<Duration> {
        self.inner.state.borrow().last_invoke_time()
    }

    /// Cancel any outstanding timer and schedule a new one for `wait`,
    /// capped at the max-wait deadline.
    fn start_timer(&self, now: Duration) {
        let weak: Weak<Inner<C, A, R>> = Rc::downgrade(&self.inner);
        let options = self.inner.options;
        let mut state = self.inner.state.borrow_mut();
        if let Some(previous) = state.pending_timer.take() {
            self.inner.scheduler.cancel(previous);
        }
        let delay = match state.max_wait_deadline(options.max_wait) {
            Some(deadline) => options.wait.min(deadline.saturating_sub(now)),
            None => options.wait,
        };
        let id = self.inner.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    Debounced { inner }.on_timer();
                }
            }),
        );
        state.pending_timer = Some(id);
    }

    fn on_timer(&self) {
        if self.inner.running.get() {
            log::warn!("debounce: timer fired while the action was running, skipping");
            self.inner.state.borrow_mut().pending_timer = None;
            return;
        }
        let now = self.inner.clock.now();
        log::trace!("debounce: timer fired at {:?}", now);
        self.trailing_edge(now);
    }

    fn trailing_edge(&self, now: Duration) -> Option<R> {
        let pending = {
            let mut state = self.inner.state.borrow_mut();
            state.pending_timer = None;
            if self.inner.options.trailing {
                state.take_for_invoke(now)
            } else {
                state.clear_pending();
                None
            }
        };
        match pending {
            Some(call) => {
                log::debug!("debounce: trailing edge at {:?}", now);
                Some(self.execute(call))
            }
            None => self.last_result(),
        }
    }

    fn invoke_pending(&self, now: Duration) {
        let pending = self.inner.state.borrow_mut().take_for_invoke(now);
        if let Some(call) = pending {
            self.execute(call);
        }
    }

    /// Run the action with no state borrow held, then store its result.
    fn execute(&self, call: PendingCall<C, A>) -> R {
        let result = {
            let _guard = RunningGuard::enter(&self.inner.running);
            let mut action = self.inner.action.borrow_mut();
            (&mut *action)(call.context, call.args)
        };
        self.inner.state.borrow_mut().store_result(result.clone());
        result
    }
}

impl<A, R> Debounced<(), A, R>
where
    A: 'static,
    R: Clone + 'static,
{
    /// Call without a caller context.
    pub fn call(&self, args: A) -> Option<R> {
        self.call_with_context((), args)
    }
}

impl<C, A, R> fmt::Debug for Debounced<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.try_borrow();
        f.debug_struct("Debounced")
            .field("options", &self.inner.options)
            .field(
                "pending",
                &state.as_ref().map(|state| state.has_timer()).ok(),
            )
            .field("running", &self.inner.running.get())
            .finish()
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
