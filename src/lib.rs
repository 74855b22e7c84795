//! Countdown Alarm - A countdown timer engine with a persistent alarm
//!
//! This library provides a per-window timer engine: arm a countdown, watch the
//! remaining time, and on expiry raise a flashing, ringing alert that stays
//! until the user interacts with the host or a ceiling ends it. Auto-repeat
//! re-arms the countdown on every expiry.

pub mod alert;
pub mod api;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod dismissal;
pub mod engine;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use alert::AlertTiming;
pub use api::create_router;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use dismissal::{DismissalWatchpoint, PointerButton, RawInteractionEvent, SurfaceRegion};
pub use engine::{EngineOptions, TimerEngine};
pub use error::TimerError;
pub use state::{AppState, EngineEvent, EngineSnapshot, EngineState, TimerDuration};
pub use utils::signals::shutdown_signal;
