use std::time::Duration;

/// Edge and timing configuration for a [`Debounced`](super::Debounced) action.
///
/// `Duration` cannot be negative, so every value of this type is valid.
/// Signed millisecond values from config files are checked in
/// [`DebounceConfig::to_options`](crate::config::DebounceConfig::to_options).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceOptions {
    /// Delay before the trailing edge fires
    pub wait: Duration,
    /// Execute on the call that opens a window
    pub leading: bool,
    /// Execute when the window closes
    pub trailing: bool,
    /// Upper bound on time between executions while calls keep arriving
    pub max_wait: Option<Duration>,
}

impl DebounceOptions {
    /// Trailing-only debounce with no max wait.
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            leading: false,
            trailing: true,
            max_wait: None,
        }
    }

    pub fn with_leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    pub fn with_trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }

    /// A `max_wait` shorter than `wait` is kept as is: forcing wins.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// True when the action can never run (neither edge enabled).
    pub fn is_inert(&self) -> bool {
        !self.leading && !self.trailing
    }
}

impl Default for DebounceOptions {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}
