//! Alert tone output

use std::io::Write;
use tracing::debug;

use crate::error::TimerError;

/// Plays one alert tone per call.
///
/// Called from the tone-repeat process with the engine unlocked, so a slow
/// device delays only the next tone. A failure is logged and the call is
/// retried on the next repeat interval.
pub trait ToneDevice: Send + Sync + 'static {
    fn play_tone(&self) -> Result<(), TimerError>;
}

/// Rings the terminal bell on stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl ToneDevice for TerminalBell {
    fn play_tone(&self) -> Result<(), TimerError> {
        let mut stderr = std::io::stderr().lock();
        stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .map_err(|e| TimerError::ToneDeviceUnavailable(format!("terminal bell: {}", e)))
    }
}

/// Tone device that plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentTone;

impl ToneDevice for SilentTone {
    fn play_tone(&self) -> Result<(), TimerError> {
        debug!("Tone muted");
        Ok(())
    }
}
