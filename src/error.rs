use thiserror::Error;

#[derive(Debug, Error)]
pub enum DebounceError {
    #[error("Invalid debounce configuration: {0}")]
    InvalidConfig(String),

    #[error("Debounced function flushed from inside its own action")]
    Reentrant,

    #[error("Invalid timeline: {0}")]
    InvalidTimeline(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
