//! Countdown scheduling
//!
//! [`CountdownScheduler`] owns the single armed countdown of an engine. It
//! computes remaining time against an injected [`Clock`] and reports expiry
//! exactly once per arm cycle. The periodic re-evaluation process itself is
//! spawned by the engine; the scheduler keeps its handle so that stopping or
//! re-arming cancels it.

use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::Instant};
use tracing::{debug, warn};

use crate::{clock::Clock, error::TimerError, state::TimerDuration};

/// The countdown currently armed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedCountdown {
    pub armed_at: Instant,
    pub end_time: Instant,
    pub duration: TimerDuration,
    pub is_active: bool,
}

/// Outcome of one periodic evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Time remains
    Tick(Duration),
    /// Remaining time reached zero; the countdown is now inactive
    Expired,
    /// The evaluation belongs to a countdown that was stopped or replaced
    Stale,
}

pub struct CountdownScheduler {
    clock: Arc<dyn Clock>,
    armed: Option<ArmedCountdown>,
    epoch: u64,
    ticker: Option<JoinHandle<()>>,
}

impl CountdownScheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            armed: None,
            epoch: 0,
            ticker: None,
        }
    }

    /// Arm a countdown, replacing any running one.
    ///
    /// Returns the epoch the periodic process must present on evaluation.
    /// An invalid duration leaves the current countdown untouched.
    pub fn start(&mut self, duration: TimerDuration) -> Result<u64, TimerError> {
        let duration = duration.validate()?;
        let now = self.clock.now();
        let end_time = now
            .checked_add(duration.as_std())
            .ok_or(TimerError::InvalidDuration("duration is too long"))?;
        self.stop();

        self.epoch += 1;
        self.armed = Some(ArmedCountdown {
            armed_at: now,
            end_time,
            duration,
            is_active: true,
        });
        debug!("Countdown armed for {} (epoch {})", duration, self.epoch);
        Ok(self.epoch)
    }

    /// Keep the handle of the periodic process for the current epoch
    pub fn attach_ticker(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.ticker.replace(handle) {
            previous.abort();
        }
    }

    /// Cancel the countdown; returns whether one was running
    pub fn stop(&mut self) -> bool {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
        self.epoch += 1;
        match self.armed.as_mut() {
            Some(armed) if armed.is_active => {
                armed.is_active = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.armed.map_or(false, |armed| armed.is_active)
    }

    /// Time left before expiry, zero when nothing is running
    pub fn remaining(&self) -> Duration {
        match self.armed {
            Some(armed) if armed.is_active => {
                armed.end_time.saturating_duration_since(self.clock.now())
            }
            _ => Duration::ZERO,
        }
    }

    /// Re-evaluate the countdown on behalf of the process armed at `epoch`
    pub fn evaluate(&mut self, epoch: u64) -> CountdownStep {
        let armed = match self.armed.as_mut() {
            Some(armed) if armed.is_active && epoch == self.epoch => armed,
            _ => return CountdownStep::Stale,
        };

        let now = self.clock.now();
        if now < armed.armed_at {
            let behind_ms = armed.armed_at.duration_since(now).as_millis() as u64;
            warn!("{}; treating countdown as expired", TimerError::ClockSkewAnomaly { behind_ms });
            armed.is_active = false;
            // The expiring process exits on its own
            self.ticker = None;
            return CountdownStep::Expired;
        }

        let remaining = armed.end_time.saturating_duration_since(now);
        if remaining.is_zero() {
            armed.is_active = false;
            self.ticker = None;
            CountdownStep::Expired
        } else {
            CountdownStep::Tick(remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn scheduler() -> (Arc<ManualClock>, CountdownScheduler) {
        let clock = Arc::new(ManualClock::new(Instant::now()));
        let scheduler = CountdownScheduler::new(clock.clone());
        (clock, scheduler)
    }

    #[test]
    fn remaining_counts_down_and_clamps() {
        let (clock, mut scheduler) = scheduler();
        scheduler.start(TimerDuration::new(0, 0, 5)).unwrap();
        assert_eq!(scheduler.remaining(), Duration::from_secs(5));

        clock.advance(Duration::from_secs(2));
        assert_eq!(scheduler.remaining(), Duration::from_secs(3));

        clock.advance(Duration::from_secs(10));
        assert_eq!(scheduler.remaining(), Duration::ZERO);
    }

    #[test]
    fn expires_exactly_once() {
        let (clock, mut scheduler) = scheduler();
        let epoch = scheduler.start(TimerDuration::new(0, 0, 2)).unwrap();

        clock.advance(Duration::from_secs(1));
        assert_eq!(scheduler.evaluate(epoch), CountdownStep::Tick(Duration::from_secs(1)));

        clock.advance(Duration::from_secs(1));
        assert_eq!(scheduler.evaluate(epoch), CountdownStep::Expired);
        assert!(!scheduler.is_active());
        assert_eq!(scheduler.evaluate(epoch), CountdownStep::Stale);
        assert_eq!(scheduler.remaining(), Duration::ZERO);
    }

    #[test]
    fn invalid_duration_keeps_running_countdown() {
        let (_clock, mut scheduler) = scheduler();
        let epoch = scheduler.start(TimerDuration::new(0, 1, 0)).unwrap();

        assert!(scheduler.start(TimerDuration::default()).is_err());
        assert!(scheduler.is_active());
        assert_eq!(scheduler.evaluate(epoch), CountdownStep::Tick(Duration::from_secs(60)));
    }

    #[test]
    fn long_durations_arm_without_field_bounds() {
        let (clock, mut scheduler) = scheduler();
        scheduler.start(TimerDuration::new(0, 90, 0)).unwrap();
        assert_eq!(scheduler.remaining(), Duration::from_secs(5400));

        let epoch = scheduler.start(TimerDuration::new(120, 0, 0)).unwrap();
        clock.advance(Duration::from_secs(3600));
        assert_eq!(
            scheduler.evaluate(epoch),
            CountdownStep::Tick(Duration::from_secs(119 * 3600))
        );
    }

    #[test]
    fn largest_duration_arms_without_overflow() {
        let (clock, mut scheduler) = scheduler();
        let huge = TimerDuration::new(u32::MAX, 59, 59);
        let epoch = scheduler.start(huge).unwrap();
        assert_eq!(scheduler.remaining(), huge.as_std());

        clock.advance(Duration::from_secs(1));
        assert_eq!(
            scheduler.evaluate(epoch),
            CountdownStep::Tick(huge.as_std() - Duration::from_secs(1))
        );
    }

    #[test]
    fn restart_supersedes_previous_epoch() {
        let (_clock, mut scheduler) = scheduler();
        let first = scheduler.start(TimerDuration::new(0, 0, 30)).unwrap();
        let second = scheduler.start(TimerDuration::new(0, 0, 10)).unwrap();

        assert_ne!(first, second);
        assert_eq!(scheduler.evaluate(first), CountdownStep::Stale);
        assert_eq!(scheduler.remaining(), Duration::from_secs(10));
    }

    #[test]
    fn stop_is_idempotent() {
        let (_clock, mut scheduler) = scheduler();
        assert!(!scheduler.stop());

        let epoch = scheduler.start(TimerDuration::new(0, 0, 30)).unwrap();
        assert!(scheduler.stop());
        assert!(!scheduler.stop());
        assert_eq!(scheduler.evaluate(epoch), CountdownStep::Stale);
        assert_eq!(scheduler.remaining(), Duration::ZERO);
    }

    #[test]
    fn clock_running_backwards_expires_immediately() {
        let (clock, mut scheduler) = scheduler();
        let epoch = scheduler.start(TimerDuration::new(0, 10, 0)).unwrap();

        clock.rewind(Duration::from_secs(5));
        assert_eq!(scheduler.evaluate(epoch), CountdownStep::Expired);
        assert!(!scheduler.is_active());
    }
}
