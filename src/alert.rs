//! Alert lifecycle
//!
//! [`AlertController`] tracks the single alert session of an engine: whether
//! it is active, the flash flag, and the handles of its three periodic
//! processes (flash, tone repeat, ceiling). The processes are spawned by the
//! engine and present the session epoch on every callback.

use std::time::Duration;
use serde::{Deserialize, Serialize};
use tokio::{task::JoinHandle, time::Instant};

/// Cadence of an alert's periodic processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertTiming {
    pub flash_interval: Duration,
    pub tone_repeat_interval: Duration,
    /// Ceiling after which the alert is force-ended
    pub max_duration: Duration,
}

impl Default for AlertTiming {
    fn default() -> Self {
        Self {
            flash_interval: Duration::from_millis(500),
            tone_repeat_interval: Duration::from_secs(2),
            max_duration: Duration::from_secs(60),
        }
    }
}

/// An active alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertSession {
    pub started_at: Instant,
    pub flash_on: bool,
    pub timing: AlertTiming,
}

pub struct AlertController {
    timing: AlertTiming,
    session: Option<AlertSession>,
    epoch: u64,
    processes: Vec<JoinHandle<()>>,
}

impl AlertController {
    pub fn new(timing: AlertTiming) -> Self {
        Self {
            timing,
            session: None,
            epoch: 0,
            processes: Vec::new(),
        }
    }

    pub fn timing(&self) -> AlertTiming {
        self.timing
    }

    /// Open a session with the flash flag on.
    ///
    /// Returns the new session epoch, or `None` when a session is already
    /// active.
    pub fn begin(&mut self, now: Instant) -> Option<u64> {
        if self.session.is_some() {
            return None;
        }
        self.epoch += 1;
        self.session = Some(AlertSession {
            started_at: now,
            flash_on: true,
            timing: self.timing,
        });
        Some(self.epoch)
    }

    /// Keep the handles of the current session's periodic processes
    pub fn attach(&mut self, handles: impl IntoIterator<Item = JoinHandle<()>>) {
        self.processes.extend(handles);
    }

    /// Close the session and cancel its processes; returns whether one was open
    pub fn end(&mut self) -> bool {
        for handle in self.processes.drain(..) {
            handle.abort();
        }
        self.epoch += 1;
        self.session.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// When the active session began
    pub fn started_at(&self) -> Option<Instant> {
        self.session.map(|session| session.started_at)
    }

    pub fn flash_on(&self) -> bool {
        self.session.map_or(false, |session| session.flash_on)
    }

    /// Whether `epoch` identifies the active session
    pub fn is_current(&self, epoch: u64) -> bool {
        self.session.is_some() && epoch == self.epoch
    }

    /// Invert the flash flag for the session at `epoch`, returning the new value
    pub fn toggle_flash(&mut self, epoch: u64) -> Option<bool> {
        if epoch != self.epoch {
            return None;
        }
        let session = self.session.as_mut()?;
        session.flash_on = !session.flash_on;
        Some(session.flash_on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_is_idempotent() {
        let mut alert = AlertController::new(AlertTiming::default());
        let epoch = alert.begin(Instant::now());
        assert!(epoch.is_some());
        let started_at = alert.started_at();
        assert!(alert.begin(Instant::now()).is_none());
        assert!(alert.is_active());
        assert_eq!(alert.started_at(), started_at);
        assert!(alert.flash_on());
    }

    #[test]
    fn end_is_idempotent_and_invalidates_epoch() {
        let mut alert = AlertController::new(AlertTiming::default());
        let epoch = alert.begin(Instant::now()).unwrap();
        assert!(alert.end());
        assert!(!alert.end());
        assert!(!alert.is_current(epoch));
        assert_eq!(alert.toggle_flash(epoch), None);
        assert!(!alert.flash_on());
        assert_eq!(alert.started_at(), None);
    }

    #[test]
    fn flash_strictly_alternates() {
        let mut alert = AlertController::new(AlertTiming::default());
        let epoch = alert.begin(Instant::now()).unwrap();
        let flags: Vec<_> = (0..5).map(|_| alert.toggle_flash(epoch).unwrap()).collect();
        assert_eq!(flags, vec![false, true, false, true, false]);
    }

    #[test]
    fn new_session_gets_new_epoch() {
        let mut alert = AlertController::new(AlertTiming::default());
        let first = alert.begin(Instant::now()).unwrap();
        alert.end();
        let second = alert.begin(Instant::now()).unwrap();
        assert_ne!(first, second);
        assert!(alert.is_current(second));
        assert_eq!(alert.toggle_flash(first), None);
    }
}
