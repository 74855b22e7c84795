//! Event renderer background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::{engine::TimerEngine, state::EngineEvent};

/// Background task that renders engine notifications to the log.
///
/// Stands in for the window caption and background of a graphical host.
pub async fn render_events_task(engine: Arc<TimerEngine>) {
    info!("Starting event renderer task");

    let mut events = engine.subscribe();
    // Release our handle so dropping the host's engine closes the channel
    drop(engine);

    loop {
        match events.recv().await {
            Ok(EngineEvent::DisplayUpdate { text }) => info!("Caption: {}", text),
            Ok(EngineEvent::StateChanged { state }) => info!("State: {:?}", state),
            Ok(EngineEvent::ElapsedSignal) => info!("Alert raised, pausing other activity"),
            Ok(EngineEvent::AlertEnded { forced }) => {
                info!("Alert ended{}", if forced { " (ceiling reached)" } else { "" })
            }
            Ok(EngineEvent::VisualAlertState { on }) => {
                debug!("Background {}", if on { "highlighted" } else { "normal" })
            }
            Ok(other) => debug!("Event: {:?}", other),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Renderer lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("Event renderer task finished");
}
