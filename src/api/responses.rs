//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{EngineSnapshot, TimerDuration};

/// Body of POST /timer/start; all fields absent arms the last-used duration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRequest {
    pub hours: Option<u32>,
    pub minutes: Option<u32>,
    pub seconds: Option<u32>,
}

impl StartRequest {
    /// The requested duration, or `None` when nothing was entered
    pub fn duration(&self) -> Option<TimerDuration> {
        if self.hours.is_none() && self.minutes.is_none() && self.seconds.is_none() {
            return None;
        }
        Some(TimerDuration::new(
            self.hours.unwrap_or(0),
            self.minutes.unwrap_or(0),
            self.seconds.unwrap_or(0),
        ))
    }
}

/// Body of POST /timer/auto-repeat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoRepeatRequest {
    pub enabled: bool,
}

/// API response structure for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: EngineSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: EngineSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    pub fn ok(message: String, timer: EngineSnapshot) -> Self {
        Self::new("ok".to_string(), message, timer)
    }

    pub fn error(message: String, timer: EngineSnapshot) -> Self {
        Self::new("error".to_string(), message, timer)
    }
}

/// Response to POST /interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionResponse {
    pub dismissed: bool,
    pub timer: EngineSnapshot,
}

/// Status response with timer and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: EngineSnapshot,
    pub timer_remaining_seconds: Option<u64>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
