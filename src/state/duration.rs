//! Countdown duration and remaining-time formatting

use std::{fmt, time::Duration};
use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// An hours/minutes/seconds span as entered by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerDuration {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl TimerDuration {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self { hours, minutes, seconds }
    }

    pub fn total_secs(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    pub fn as_std(&self) -> Duration {
        Duration::from_secs(self.total_secs())
    }

    /// Check the duration can be armed, returning it unchanged if so.
    ///
    /// Fields are not bounded individually: `0:90:00` is ninety minutes.
    pub fn validate(self) -> Result<Self, TimerError> {
        if self.total_secs() == 0 {
            return Err(TimerError::InvalidDuration("duration must be longer than zero"));
        }
        Ok(self)
    }
}

impl fmt::Display for TimerDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_remaining(self.as_std()))
    }
}

/// Format remaining time as `HH:MM:SS` from one hour up, `MM:SS` below.
///
/// Partial seconds round up so a running countdown never reads `00:00`.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = whole_secs(remaining);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Seconds in `remaining`, counting a partial second as a whole one
pub fn whole_secs(remaining: Duration) -> u64 {
    if remaining.subsec_nanos() > 0 {
        remaining.as_secs() + 1
    } else {
        remaining.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_short_and_long_spans() {
        assert_eq!(format_remaining(Duration::from_secs(65)), "01:05");
        assert_eq!(format_remaining(Duration::from_secs(3599)), "59:59");
        assert_eq!(format_remaining(Duration::from_secs(3600)), "01:00:00");
        assert_eq!(format_remaining(Duration::from_secs(36_000 + 61)), "10:01:01");
        assert_eq!(format_remaining(Duration::ZERO), "00:00");
    }

    #[test]
    fn partial_seconds_round_up() {
        assert_eq!(format_remaining(Duration::from_millis(400)), "00:01");
        assert_eq!(format_remaining(Duration::from_millis(59_001)), "01:00");
    }

    #[test]
    fn zero_duration_is_rejected() {
        assert_eq!(
            TimerDuration::new(0, 0, 0).validate(),
            Err(TimerError::InvalidDuration("duration must be longer than zero"))
        );
    }

    #[test]
    fn overflowing_fields_are_accepted() {
        let ninety_minutes = TimerDuration::new(0, 90, 0);
        assert_eq!(ninety_minutes.validate(), Ok(ninety_minutes));
        assert_eq!(ninety_minutes.total_secs(), 5400);
        assert_eq!(ninety_minutes.to_string(), "01:30:00");

        assert!(TimerDuration::new(120, 0, 0).validate().is_ok());
        assert!(TimerDuration::new(0, 0, 75).validate().is_ok());
    }

    #[test]
    fn total_secs_does_not_overflow() {
        let longest = TimerDuration::new(u32::MAX, u32::MAX, u32::MAX);
        assert_eq!(
            longest.total_secs(),
            u64::from(u32::MAX) * 3600 + u64::from(u32::MAX) * 60 + u64::from(u32::MAX)
        );
    }
}
