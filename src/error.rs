//! Error types for event extraction and calendar generation.

use thiserror::Error;

/// Errors that can occur while building the event calendar.
///
/// Every variant is fatal to the current generation pass: callers
/// propagate them up to the host build instead of recovering, so a bad
/// event field aborts generation rather than silently dropping the event.
#[derive(Error, Debug)]
pub enum EventCalError {
    #[error("Unable to parse the '{field}' field in the event named '{event}'")]
    Timestamp { field: String, event: String },

    #[error(
        "Unknown time multiplier '{token}' in the 'event-duration' field \
         of the '{event}' event. Supported multipliers are: w d h m s"
    )]
    UnknownUnit { token: String, event: String },

    #[error("Unable to parse '{token}' in the 'event-duration' field of the '{event}' event")]
    MalformedDuration { token: String, event: String },

    #[error("Either 'event-end' or 'event-duration' must be specified in the event named '{event}'")]
    MissingEndSpec { event: String },

    #[error("Recurrence rule error: {0}")]
    Rule(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for eventcal operations.
pub type EventCalResult<T> = Result<T, EventCalError>;
