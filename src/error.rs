//! Error types for the timer engine

use thiserror::Error;

/// Failures the timer subsystem can report.
///
/// None of these are fatal to the host: invalid durations are rejected before
/// any state change, and the remaining variants are logged on degraded paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// The requested duration cannot be armed (zero length or out of range)
    #[error("invalid duration: {0}")]
    InvalidDuration(&'static str),

    /// The clock reads earlier than the instant the countdown was armed at
    #[error("clock skew anomaly: clock reads {behind_ms}ms before the arm time")]
    ClockSkewAnomaly { behind_ms: u64 },

    /// The alert tone could not be played
    #[error("alert tone device unavailable: {0}")]
    ToneDeviceUnavailable(String),

    /// The engine was constructed outside a tokio runtime
    #[error("no tokio runtime available to drive timer processes")]
    NoRuntime,
}
