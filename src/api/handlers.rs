//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::{dismissal::RawInteractionEvent, state::AppState};
use super::responses::{
    ApiResponse, AutoRepeatRequest, HealthResponse, InteractionResponse, StartRequest,
    StatusResponse,
};

/// Handle POST /timer/start - Arm a countdown
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartRequest>,
) -> Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)> {
    let result = match request.duration() {
        Some(duration) => state.engine.start(duration).map(|()| duration),
        None => state.engine.start_last(),
    };

    match result {
        Ok(duration) => {
            state.record_action("start");
            info!("Start endpoint called - countdown armed for {}", duration);
            Ok(Json(ApiResponse::ok(
                format!("Countdown started for {}", duration),
                state.engine.snapshot(),
            )))
        }
        Err(e) => {
            warn!("Rejected start request: {}", e);
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::error(e.to_string(), state.engine.snapshot())),
            ))
        }
    }
}

/// Handle POST /timer/stop - Cancel countdown and alert
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.engine.stop();
    state.record_action("stop");
    info!("Stop endpoint called");
    Json(ApiResponse::ok("Timer stopped".to_string(), state.engine.snapshot()))
}

/// Handle POST /timer/auto-repeat - Toggle auto-repeat
pub async fn auto_repeat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AutoRepeatRequest>,
) -> Json<ApiResponse> {
    state.engine.set_auto_repeat(request.enabled);
    state.record_action(if request.enabled { "auto-repeat-on" } else { "auto-repeat-off" });
    Json(ApiResponse::ok(
        format!(
            "Auto-repeat {}",
            if request.enabled { "enabled" } else { "disabled" }
        ),
        state.engine.snapshot(),
    ))
}

/// Handle POST /interaction - Relay a raw host interaction event
pub async fn interaction_handler(
    State(state): State<Arc<AppState>>,
    Json(event): Json<RawInteractionEvent>,
) -> Json<InteractionResponse> {
    let dismissed = state.watchpoint.relay(event);
    if dismissed {
        state.record_action("dismiss");
    }
    Json(InteractionResponse {
        dismissed,
        timer: state.engine.snapshot(),
    })
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timer = state.engine.snapshot();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer_remaining_seconds: timer.remaining_seconds(),
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /events - Stream engine notifications as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.engine.subscribe();

    let events = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let sse = Event::default()
                        .json_data(&event)
                        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()));
                    return Some((Ok::<_, Infallible>(sse), receiver));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
