//! External collaborator module
//!
//! This module contains the seams to the outside world the engine drives:
//! the alert tone device and the persisted settings store.

pub mod settings;
pub mod tone;

// Re-export main types
pub use settings::{JsonSettingsStore, MemorySettingsStore, PersistedSettings, SettingsStore};
pub use tone::{SilentTone, TerminalBell, ToneDevice};
