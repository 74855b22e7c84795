//! Alert dismissal by raw host interaction
//!
//! Hosts feed every pointer press (including clicks on the window frame and
//! title bar), key press, and window activation into a
//! [`DismissalWatchpoint`]. The watchpoint does not judge intent: while an
//! alert is active the first event ends it, and everything else is ignored.

use std::{fmt, sync::Weak};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::EngineShared;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

/// Part of the host surface an event landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceRegion {
    #[default]
    Client,
    /// Frame decorations: title bar, borders, caption buttons
    NonClient,
}

/// Interaction notification produced by the host's input system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawInteractionEvent {
    PointerDown {
        button: PointerButton,
        #[serde(default)]
        region: SurfaceRegion,
    },
    KeyDown {
        key_code: u32,
    },
    Activated,
}

/// Relays raw interaction events into alert dismissal
#[derive(Clone)]
pub struct DismissalWatchpoint {
    engine: Weak<EngineShared>,
}

impl DismissalWatchpoint {
    pub(crate) fn new(engine: Weak<EngineShared>) -> Self {
        Self { engine }
    }

    /// Relay one event; returns whether it dismissed an alert
    pub fn relay(&self, event: RawInteractionEvent) -> bool {
        let Some(engine) = self.engine.upgrade() else {
            return false;
        };
        engine.dismiss(event)
    }

    /// Relay events from `events` until the sender side closes
    pub async fn run(self, mut events: mpsc::Receiver<RawInteractionEvent>) {
        info!("Starting dismissal watchpoint");
        while let Some(event) = events.recv().await {
            if !self.relay(event) {
                debug!("Ignored {:?}", event);
            }
        }
        info!("Dismissal watchpoint finished");
    }
}

impl fmt::Display for RawInteractionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointerDown { button, region } => {
                write!(f, "{:?} pointer press ({:?})", button, region)
            }
            Self::KeyDown { key_code } => write!(f, "key press {}", key_code),
            Self::Activated => f.write_str("window activation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_parse_from_host_json() {
        let event: RawInteractionEvent =
            serde_json::from_str(r#"{"kind":"pointer_down","button":"right","region":"non_client"}"#)
                .unwrap();
        assert_eq!(
            event,
            RawInteractionEvent::PointerDown {
                button: PointerButton::Right,
                region: SurfaceRegion::NonClient,
            }
        );

        let event: RawInteractionEvent =
            serde_json::from_str(r#"{"kind":"pointer_down","button":"left"}"#).unwrap();
        assert_eq!(
            event,
            RawInteractionEvent::PointerDown {
                button: PointerButton::Left,
                region: SurfaceRegion::Client,
            }
        );

        let event: RawInteractionEvent = serde_json::from_str(r#"{"kind":"activated"}"#).unwrap();
        assert_eq!(event, RawInteractionEvent::Activated);
    }

    #[test]
    fn detached_watchpoint_ignores_events() {
        let watchpoint = DismissalWatchpoint::new(Weak::new());
        assert!(!watchpoint.relay(RawInteractionEvent::KeyDown { key_code: 13 }));
    }
}
