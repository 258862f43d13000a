//! Scheduling state owned by one debounce controller

use std::time::Duration;

use crate::scheduler::TimerId;

/// Arguments and caller context of the most recent call, kept as one value so
/// they are always present or absent together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCall<C, A> {
    pub context: C,
    pub args: A,
}

/// Everything a debounce controller remembers between calls.
#[derive(Debug)]
pub struct DebounceState<C, A, R> {
    /// The one outstanding trailing-edge task, if any
    pub(crate) pending_timer: Option<TimerId>,
    pending: Option<PendingCall<C, A>>,
    last_call_time: Option<Duration>,
    /// `None` means never invoked (or reset by cancel)
    last_invoke_time: Option<Duration>,
    /// When the current window sequence opened; anchors `max_wait` until the
    /// first execution
    window_start: Option<Duration>,
    last_result: Option<R>,
}

impl<C, A, R> Default for DebounceState<C, A, R> {
    fn default() -> Self {
        Self {
            pending_timer: None,
            pending: None,
            last_call_time: None,
            last_invoke_time: None,
            window_start: None,
            last_result: None,
        }
    }
}

impl<C, A, R> DebounceState<C, A, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending call and stamp the call time.
    pub fn record_call(&mut self, now: Duration, context: C, args: A) {
        self.pending = Some(PendingCall { context, args });
        self.last_call_time = Some(now);
    }

    /// A call is forced when nothing has run yet in this window sequence, or
    /// when `max_wait` has elapsed since the last execution.
    pub fn is_forced(&self, now: Duration, max_wait: Option<Duration>) -> bool {
        match self.last_invoke_time {
            None => true,
            Some(last) => max_wait.is_some_and(|max| now.saturating_sub(last) >= max),
        }
    }

    /// Mark the start of a window that opened with no timer outstanding.
    pub fn open_window(&mut self, now: Duration) {
        if self.last_invoke_time.is_none() {
            self.window_start = Some(now);
        }
    }

    /// Latest time the trailing edge may fire without breaking `max_wait`.
    ///
    /// Measured from the last execution, or from the window start when
    /// nothing has executed yet. A deadline past `Duration::MAX` means no cap.
    pub fn max_wait_deadline(&self, max_wait: Option<Duration>) -> Option<Duration> {
        let anchor = self.last_invoke_time.or(self.window_start)?;
        anchor.checked_add(max_wait?)
    }

    /// Hand out the pending call for execution at `now`.
    ///
    /// Clears the pending data and stamps the invoke time. Returns `None`
    /// (and leaves the invoke time alone) when nothing is pending.
    pub fn take_for_invoke(&mut self, now: Duration) -> Option<PendingCall<C, A>> {
        let pending = self.pending.take()?;
        self.last_invoke_time = Some(self.last_invoke_time.map_or(now, |last| last.max(now)));
        Some(pending)
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    pub fn store_result(&mut self, result: R) {
        self.last_result = Some(result);
    }

    /// Forget pending data and the last invoke time; the next call opens a
    /// fresh window.
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_invoke_time = None;
        self.window_start = None;
    }

    pub fn has_pending_call(&self) -> bool {
        self.pending.is_some()
    }

    pub fn has_timer(&self) -> bool {
        self.pending_timer.is_some()
    }

    pub fn last_call_time(&self) -> Option<Duration> {
        self.last_call_time
    }

    pub fn last_invoke_time(&self) -> Option<Duration> {
        self.last_invoke_time
    }

    pub fn last_result(&self) -> Option<&R> {
        self.last_result.as_ref()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
