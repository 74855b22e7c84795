//! Engine state and snapshot structures

use serde::{Deserialize, Serialize};

use super::TimerDuration;

/// Derived state of a timer engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Idle,
    Running,
    Alerting,
    /// A re-armed countdown runs while the previous alert is undismissed
    RunningAndAlerting,
}

impl EngineState {
    /// Derive the state from the countdown and alert activity flags
    pub fn from_flags(countdown_active: bool, alert_active: bool) -> Self {
        match (countdown_active, alert_active) {
            (false, false) => Self::Idle,
            (true, false) => Self::Running,
            (false, true) => Self::Alerting,
            (true, true) => Self::RunningAndAlerting,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running | Self::RunningAndAlerting)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Point-in-time view of an engine, as reported to hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub state: EngineState,
    pub remaining_seconds: u64,
    pub display: String,
    pub flash_on: bool,
    pub auto_repeat: bool,
    pub last_duration: TimerDuration,
}

impl EngineSnapshot {
    /// Remaining seconds only while a countdown is running
    pub fn remaining_seconds(&self) -> Option<u64> {
        if self.state.is_running() {
            Some(self.remaining_seconds)
        } else {
            None
        }
    }
}
