//! Debounce controller
//!
//! Coalesces bursts of calls into a bounded number of executions of a wrapped
//! action. See [`Debounced`] for the call, `cancel` and `flush` semantics.

pub mod controller;
pub mod options;
pub mod state;

pub use controller::Debounced;
pub use options::DebounceOptions;
pub use state::DebounceState;

use crate::clock::Clock;
use crate::scheduler::Scheduler;

/// Wraps an action that needs no caller context.
///
/// Shorthand for [`Debounced::new`] with `()` as the context type.
pub fn debounce<A, R, F>(
    mut action: F,
    options: DebounceOptions,
    clock: impl Clock + 'static,
    scheduler: impl Scheduler + 'static,
) -> Debounced<(), A, R>
where
    A: 'static,
    R: Clone + 'static,
    F: FnMut(A) -> R + 'static,
{
    Debounced::new(move |(), args| action(args), options, clock, scheduler)
}
