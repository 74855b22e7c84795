//! Countdown Alarm - A countdown timer with a persistent alarm
//!
//! This is the main entry point for the countdown-alarm application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_alarm::{
    api::create_router,
    config::Config,
    engine::TimerEngine,
    services::{JsonSettingsStore, SettingsStore, SilentTone, TerminalBell, ToneDevice},
    state::AppState,
    tasks::render_events_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_alarm={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-alarm v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, settings={}, alert ceiling={}s",
          config.host, config.port, config.settings.display(), config.alert_ceiling);

    let settings: Arc<dyn SettingsStore> = Arc::new(JsonSettingsStore::new(config.settings.clone())?);
    let tone: Arc<dyn ToneDevice> = if config.mute {
        Arc::new(SilentTone)
    } else {
        Arc::new(TerminalBell)
    };

    // Create the timer engine for this host
    let engine = Arc::new(TimerEngine::new(config.engine_options(), settings, tone)?);

    // Start rendering engine notifications
    tokio::spawn(render_events_task(Arc::clone(&engine)));

    let state = Arc::new(AppState::new(Arc::clone(&engine), config.port, config.host.clone()));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/start       - Arm a countdown ({{hours, minutes, seconds}} or last used)");
    info!("  POST /timer/stop        - Cancel countdown and alert");
    info!("  POST /timer/auto-repeat - Toggle auto-repeat ({{enabled}})");
    info!("  POST /interaction       - Relay a pointer, key, or activation event");
    info!("  GET  /status            - Current timer status");
    info!("  GET  /events            - Server-sent engine notifications");
    info!("  GET  /health            - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    engine.dispose();
    info!("Server shutdown complete");
    Ok(())
}
