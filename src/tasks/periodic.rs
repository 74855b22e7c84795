//! Periodic processes driving a timer engine
//!
//! Each process holds only a weak reference to its engine and the epoch it was
//! spawned for. It exits once the engine is gone or reports its epoch stale.

use std::{sync::Weak, time::Duration};
use tokio::time::{interval, interval_at, sleep, Instant, MissedTickBehavior};
use tracing::debug;

use crate::engine::EngineShared;

/// Re-evaluates the countdown every `period` until it expires or is replaced
pub(crate) async fn countdown_ticker(engine: Weak<EngineShared>, epoch: u64, period: Duration) {
    let mut ticks = interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticks.tick().await;
        let Some(engine) = engine.upgrade() else { break };
        if engine.on_countdown_tick(epoch).is_break() {
            break;
        }
    }
    debug!("Countdown process {} finished", epoch);
}

/// Inverts the alert visual flag every `period`
pub(crate) async fn flash_process(engine: Weak<EngineShared>, epoch: u64, period: Duration) {
    let mut ticks = interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticks.tick().await;
        let Some(engine) = engine.upgrade() else { break };
        if engine.on_flash_tick(epoch).is_break() {
            break;
        }
    }
    debug!("Flash process {} finished", epoch);
}

/// Plays a tone right away and then every `period`
pub(crate) async fn tone_process(engine: Weak<EngineShared>, epoch: u64, period: Duration) {
    let mut ticks = interval(period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticks.tick().await;
        let Some(engine) = engine.upgrade() else { break };
        if engine.on_tone_tick(epoch).is_break() {
            break;
        }
    }
    debug!("Tone process {} finished", epoch);
}

/// Force-ends the alert once `ceiling` has elapsed
pub(crate) async fn alert_ceiling(engine: Weak<EngineShared>, epoch: u64, ceiling: Duration) {
    sleep(ceiling).await;
    if let Some(engine) = engine.upgrade() {
        engine.on_alert_ceiling(epoch);
    }
}
