//! Background tasks module
//!
//! This module contains the periodic processes behind a timer engine and the
//! host's event renderer.

pub(crate) mod periodic;
pub mod renderer;

// Re-export main functions
pub use renderer::render_events_task;
