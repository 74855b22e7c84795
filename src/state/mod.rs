//! State management module
//!
//! This module contains the timer's data model and the host-facing state.

pub mod app_state;
pub mod duration;
pub mod engine_state;
pub mod events;

// Re-export main types
pub use app_state::AppState;
pub use duration::{format_remaining, whole_secs, TimerDuration};
pub use engine_state::{EngineSnapshot, EngineState};
pub use events::EngineEvent;
