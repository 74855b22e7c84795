//! Outbound notifications a host renders

use serde::{Deserialize, Serialize};

use super::EngineState;

/// Notification emitted by a timer engine.
///
/// The engine never touches presentation state itself; hosts subscribe to
/// these and render captions, flashing, and tones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// Periodic countdown update while time remains
    Tick { remaining_seconds: u64 },
    /// The countdown reached zero (once per arm cycle)
    Expired,
    /// Caption text changed
    DisplayUpdate { text: String },
    /// Alert visual flag on or off
    VisualAlertState { on: bool },
    /// Play one alert tone now
    PlayToneNow,
    /// An alert just began; pause unrelated activity such as other audio
    ElapsedSignal,
    /// The alert ended, by dismissal or by the ceiling when `forced`
    AlertEnded { forced: bool },
    StateChanged { state: EngineState },
}
