//! Timeline replay
//!
//! A timeline is a recorded sequence of timed operations (`call`, `flush`,
//! `cancel`) against one debounced action. Replaying it on a simulated clock
//! shows exactly which calls would have executed, when, and through which
//! edge.
//!
//! ```json
//! [
//!   { "at": 0,    "op": "call", "arg": "Tom" },
//!   { "at": 1000, "op": "call", "arg": "Jerry" },
//!   { "at": 6000, "op": "flush" },
//!   { "at": 7000, "op": "cancel" }
//! ]
//! ```

pub mod model;
pub mod replay;

pub use model::{Entry, Operation, Timeline};
pub use replay::{Execution, OperationOutcome, Report, Trigger, replay};
