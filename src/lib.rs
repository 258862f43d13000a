//! settle library - debounce controller with pluggable clocks and schedulers
//!
//! The binary replays recorded call timelines through [`debounce::Debounced`];
//! everything it uses is exposed here.

pub mod clock;
pub mod config;
pub mod debounce;
pub mod error;
pub mod scheduler;
pub mod timeline;

// Re-export commonly used types for convenience
pub use clock::{Clock, SystemClock};
pub use debounce::{DebounceOptions, Debounced, debounce};
pub use error::DebounceError;
pub use scheduler::{LocalScheduler, ManualScheduler, Scheduler, TimerId};
