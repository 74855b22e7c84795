//! Timer engine: the composition root
//!
//! [`TimerEngine`] wires the countdown scheduler, the alert controller, and
//! the dismissal watchpoint together. Every transition, whether it comes from
//! a host call or from a periodic process, runs under the single core lock and
//! publishes its events before releasing it, so transitions are totally
//! ordered and a cancelled process can never mutate a newer session.

use std::{
    fmt,
    ops::ControlFlow,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};
use tokio::{runtime::Handle, sync::broadcast};
use tracing::{debug, info, warn};

use crate::{
    alert::{AlertController, AlertTiming},
    clock::{Clock, SystemClock},
    countdown::{CountdownScheduler, CountdownStep},
    dismissal::DismissalWatchpoint,
    error::TimerError,
    services::{SettingsStore, ToneDevice},
    state::{format_remaining, whole_secs, EngineEvent, EngineSnapshot, EngineState, TimerDuration},
    tasks::periodic,
};

/// Tunables for one engine instance
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Period of the countdown re-evaluation process
    pub tick_period: Duration,
    pub alert: AlertTiming,
    /// Caption shown while nothing runs
    pub idle_caption: String,
    /// Caption shown while an alert is active
    pub alert_message: String,
    /// Capacity of the outbound event channel
    pub event_capacity: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            alert: AlertTiming::default(),
            idle_caption: "Timer".to_string(),
            alert_message: "Time's up!".to_string(),
            event_capacity: 256,
        }
    }
}

/// Countdown timer with a persistent alarm, one per host window
pub struct TimerEngine {
    shared: Arc<EngineShared>,
}

impl TimerEngine {
    /// Create an engine on the system clock.
    ///
    /// Must be called from within a tokio runtime; the engine spawns its
    /// periodic processes there.
    pub fn new(
        options: EngineOptions,
        settings: Arc<dyn SettingsStore>,
        tone: Arc<dyn ToneDevice>,
    ) -> Result<Self, TimerError> {
        Self::with_clock(options, settings, tone, Arc::new(SystemClock))
    }

    pub fn with_clock(
        options: EngineOptions,
        settings: Arc<dyn SettingsStore>,
        tone: Arc<dyn ToneDevice>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TimerError> {
        let runtime = Handle::try_current().map_err(|_| TimerError::NoRuntime)?;
        let persisted = settings.load();
        let (events, _) = broadcast::channel(options.event_capacity.max(1));

        info!(
            "Timer engine ready: last duration {}, auto-repeat {}",
            persisted.last_duration, persisted.auto_repeat
        );

        let shared = Arc::new_cyclic(|me| EngineShared {
            me: me.clone(),
            core: Mutex::new(EngineCore {
                countdown: CountdownScheduler::new(clock.clone()),
                alert: AlertController::new(options.alert),
                auto_repeat: persisted.auto_repeat,
                last_duration: persisted.last_duration,
                caption: options.idle_caption.clone(),
                state: EngineState::Idle,
            }),
            events,
            clock,
            tone,
            settings,
            runtime,
            tick_period: options.tick_period,
            idle_caption: options.idle_caption,
            alert_message: options.alert_message,
        });

        Ok(Self { shared })
    }

    /// Arm a countdown, replacing any running one. An active alert is kept.
    pub fn start(&self, duration: TimerDuration) -> Result<(), TimerError> {
        self.shared.start(duration)
    }

    /// Arm the last-used duration
    pub fn start_last(&self) -> Result<TimerDuration, TimerError> {
        let duration = self.shared.lock().last_duration;
        self.shared.start(duration)?;
        Ok(duration)
    }

    /// Cancel the countdown and any alert; a no-op while idle
    pub fn stop(&self) {
        self.shared.stop();
    }

    /// End the active alert; returns whether one was active
    pub fn dismiss(&self) -> bool {
        self.shared.dismiss("explicit dismissal")
    }

    pub fn set_auto_repeat(&self, enabled: bool) {
        self.shared.lock().auto_repeat = enabled;
        info!("Auto-repeat set to: {}", enabled);
        if let Err(e) = self.shared.settings.save_auto_repeat(enabled) {
            warn!("Failed to persist auto-repeat flag: {:#}", e);
        }
    }

    pub fn auto_repeat(&self) -> bool {
        self.shared.lock().auto_repeat
    }

    pub fn remaining(&self) -> Duration {
        self.shared.lock().countdown.remaining()
    }

    pub fn state(&self) -> EngineState {
        self.shared.lock().current_state()
    }

    pub fn is_alerting(&self) -> bool {
        self.shared.lock().alert.is_active()
    }

    pub fn last_duration(&self) -> TimerDuration {
        self.shared.lock().last_duration
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let core = self.shared.lock();
        EngineSnapshot {
            state: core.current_state(),
            remaining_seconds: whole_secs(core.countdown.remaining()),
            display: core.caption.clone(),
            flash_on: core.alert.flash_on(),
            auto_repeat: core.auto_repeat,
            last_duration: core.last_duration,
        }
    }

    /// Subscribe to outbound notifications
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.shared.events.subscribe()
    }

    /// Relay for raw host interaction events
    pub fn watchpoint(&self) -> DismissalWatchpoint {
        DismissalWatchpoint::new(Arc::downgrade(&self.shared))
    }

    /// Cancel every periodic process without emitting notifications
    pub fn dispose(&self) {
        let mut core = self.shared.lock();
        core.countdown.stop();
        core.alert.end();
        core.state = EngineState::Idle;
        debug!("Timer engine disposed");
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Engine internals shared with the periodic processes
pub(crate) struct EngineShared {
    me: Weak<EngineShared>,
    core: Mutex<EngineCore>,
    events: broadcast::Sender<EngineEvent>,
    clock: Arc<dyn Clock>,
    tone: Arc<dyn ToneDevice>,
    settings: Arc<dyn SettingsStore>,
    runtime: Handle,
    tick_period: Duration,
    idle_caption: String,
    alert_message: String,
}

struct EngineCore {
    countdown: CountdownScheduler,
    alert: AlertController,
    auto_repeat: bool,
    last_duration: TimerDuration,
    /// Caption last published
    caption: String,
    /// State last published
    state: EngineState,
}

impl EngineCore {
    fn current_state(&self) -> EngineState {
        EngineState::from_flags(self.countdown.is_active(), self.alert.is_active())
    }
}

impl EngineShared {
    fn lock(&self) -> MutexGuard<'_, EngineCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: EngineEvent) {
        // Having no subscribers is fine
        let _ = self.events.send(event);
    }

    fn start(&self, duration: TimerDuration) -> Result<(), TimerError> {
        {
            let mut core = self.lock();
            self.arm(&mut core, duration)?;
            info!("Countdown started for {}", duration);
            self.publish(&mut core);
        }

        if let Err(e) = self.settings.save_duration(duration) {
            warn!("Failed to persist last duration: {:#}", e);
        }
        Ok(())
    }

    fn stop(&self) {
        let mut core = self.lock();
        let countdown_stopped = core.countdown.stop();
        let alert_ended = self.end_alert(&mut core, false);
        if !countdown_stopped && !alert_ended {
            debug!("Stop requested while idle");
            return;
        }
        info!("Timer stopped");
        self.publish(&mut core);
    }

    pub(crate) fn dismiss(&self, cause: impl fmt::Display) -> bool {
        let mut core = self.lock();
        if !self.end_alert(&mut core, false) {
            return false;
        }
        info!("Alert dismissed by {}", cause);
        self.publish(&mut core);
        true
    }

    pub(crate) fn on_countdown_tick(&self, epoch: u64) -> ControlFlow<()> {
        let mut core = self.lock();
        match core.countdown.evaluate(epoch) {
            CountdownStep::Stale => ControlFlow::Break(()),
            CountdownStep::Tick(remaining) => {
                debug!("Countdown tick: {} remaining", format_remaining(remaining));
                self.emit(EngineEvent::Tick {
                    remaining_seconds: whole_secs(remaining),
                });
                self.publish(&mut core);
                ControlFlow::Continue(())
            }
            CountdownStep::Expired => {
                info!("Countdown expired");
                self.emit(EngineEvent::Expired);

                if core.auto_repeat {
                    let duration = core.last_duration;
                    match self.arm(&mut core, duration) {
                        Ok(()) => info!("Auto-repeat re-armed countdown for {}", duration),
                        Err(e) => warn!("Auto-repeat could not re-arm: {}", e),
                    }
                }

                self.begin_alert(&mut core);
                self.publish(&mut core);
                ControlFlow::Break(())
            }
        }
    }

    pub(crate) fn on_flash_tick(&self, epoch: u64) -> ControlFlow<()> {
        let mut core = self.lock();
        match core.alert.toggle_flash(epoch) {
            Some(on) => {
                self.emit(EngineEvent::VisualAlertState { on });
                ControlFlow::Continue(())
            }
            None => ControlFlow::Break(()),
        }
    }

    pub(crate) fn on_tone_tick(&self, epoch: u64) -> ControlFlow<()> {
        let core = self.lock();
        if !core.alert.is_current(epoch) {
            return ControlFlow::Break(());
        }
        self.emit(EngineEvent::PlayToneNow);
        // The device may be slow; transitions must not wait on it
        drop(core);

        if let Err(e) = self.tone.play_tone() {
            warn!("{}; alert continues visually", e);
        }
        ControlFlow::Continue(())
    }

    pub(crate) fn on_alert_ceiling(&self, epoch: u64) {
        let mut core = self.lock();
        if !core.alert.is_current(epoch) {
            return;
        }
        let active_for = core
            .alert
            .started_at()
            .map(|started_at| self.clock.now().saturating_duration_since(started_at))
            .unwrap_or_default();
        info!(
            "Alert reached its ceiling after {}s without dismissal, ending it",
            active_for.as_secs()
        );
        self.end_alert(&mut core, true);
        self.publish(&mut core);
    }

    fn arm(&self, core: &mut EngineCore, duration: TimerDuration) -> Result<(), TimerError> {
        let epoch = core.countdown.start(duration)?;
        let handle = self.runtime.spawn(periodic::countdown_ticker(
            self.me.clone(),
            epoch,
            self.tick_period,
        ));
        core.countdown.attach_ticker(handle);
        core.last_duration = duration;
        Ok(())
    }

    fn begin_alert(&self, core: &mut EngineCore) {
        let Some(epoch) = core.alert.begin(self.clock.now()) else {
            debug!("Alert already active, keeping the current session");
            return;
        };

        let timing = core.alert.timing();
        core.alert.attach([
            self.runtime.spawn(periodic::flash_process(
                self.me.clone(),
                epoch,
                timing.flash_interval,
            )),
            self.runtime.spawn(periodic::tone_process(
                self.me.clone(),
                epoch,
                timing.tone_repeat_interval,
            )),
            self.runtime.spawn(periodic::alert_ceiling(
                self.me.clone(),
                epoch,
                timing.max_duration,
            )),
        ]);

        info!("Alert started");
        self.emit(EngineEvent::ElapsedSignal);
        self.emit(EngineEvent::VisualAlertState { on: true });
    }

    fn end_alert(&self, core: &mut EngineCore, forced: bool) -> bool {
        if !core.alert.end() {
            return false;
        }
        self.emit(EngineEvent::VisualAlertState { on: false });
        self.emit(EngineEvent::AlertEnded { forced });
        true
    }

    /// Publish caption and state changes caused by the last transition
    fn publish(&self, core: &mut EngineCore) {
        let caption = match (core.alert.is_active(), core.countdown.is_active()) {
            (true, true) => format!(
                "{} Next in {}",
                self.alert_message,
                format_remaining(core.countdown.remaining())
            ),
            (true, false) => self.alert_message.clone(),
            (false, true) => format_remaining(core.countdown.remaining()),
            (false, false) => self.idle_caption.clone(),
        };
        if caption != core.caption {
            core.caption = caption.clone();
            self.emit(EngineEvent::DisplayUpdate { text: caption });
        }

        let state = core.current_state();
        if state != core.state {
            debug!("Engine state {:?} -> {:?}", core.state, state);
            core.state = state;
            self.emit(EngineEvent::StateChanged { state });
        }
    }
}
