// Configuration type definitions

use std::time::Duration;

use serde::Deserialize;

use crate::debounce::DebounceOptions;
use crate::error::DebounceError;

/// Debounce defaults section
///
/// Durations are signed milliseconds so a negative value can be reported
/// instead of failing the whole file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DebounceConfig {
    #[serde(default = "default_wait_ms")]
    pub wait_ms: i64,
    #[serde(default)]
    pub leading: bool,
    #[serde(default = "default_trailing")]
    pub trailing: bool,
    #[serde(default)]
    pub max_wait_ms: Option<i64>,
}

fn default_wait_ms() -> i64 {
    300
}

fn default_trailing() -> bool {
    true
}

impl Default for DebounceConfig {
    fn default() -> Self {
        DebounceConfig {
            wait_ms: default_wait_ms(),
            leading: false,
            trailing: default_trailing(),
            max_wait_ms: None,
        }
    }
}

impl DebounceConfig {
    /// Validate into typed options. Negative durations are rejected.
    pub fn to_options(&self) -> Result<DebounceOptions, DebounceError> {
        let wait = non_negative_millis("wait_ms", self.wait_ms)?;
        let mut options = DebounceOptions::new(wait)
            .with_leading(self.leading)
            .with_trailing(self.trailing);
        if let Some(max_wait_ms) = self.max_wait_ms {
            options = options.with_max_wait(non_negative_millis("max_wait_ms", max_wait_ms)?);
        }
        Ok(options)
    }
}

fn non_negative_millis(name: &str, value: i64) -> Result<Duration, DebounceError> {
    u64::try_from(value)
        .map(Duration::from_millis)
        .map_err(|_| DebounceError::InvalidConfig(format!("{} must not be negative, got {}", name, value)))
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub debounce: DebounceConfig,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
