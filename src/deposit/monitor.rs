//! Deposit lifecycle monitoring.
//!
//! A watched deposit runs two independent timers: a one-second countdown
//! that forces expiry when the payment window elapses, and a status poller
//! asking the deposit collaborator where the payment stands. Both feed one
//! compare-and-set state cell - whichever observes a terminal condition
//! first wins, and the loser's write is a no-op. There is no path out of a
//! terminal state.

use crate::api::DepositApi;
use crate::config::DepositConfig;
use crate::state::{DepositDescriptor, DepositState};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Events surfaced to the host while a deposit is being watched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositEvent {
    /// One countdown tick. Purely for display.
    Countdown { remaining_secs: u64 },
    /// The lifecycle reached a new state.
    StateChanged(DepositState),
}

/// Attempt the only legal lifecycle transition: out of `Pending`.
///
/// Returns `true` if the write happened. Once any terminal state is set,
/// every later attempt is a no-op, which is what serializes the race between
/// the countdown and the poller.
pub(crate) fn transition(tx: &watch::Sender<DepositState>, to: DepositState) -> bool {
    tx.send_if_modified(|state| {
        if state.is_terminal() {
            false
        } else {
            *state = to;
            true
        }
    })
}

/// Watches a single deposit until it reaches a terminal state.
///
/// Both timers stop deterministically when a terminal state is reached, when
/// [`DepositMonitor::cancel`] is called, or when the monitor is dropped.
/// The expiry window is the collaborator-supplied `expires_at` when present,
/// otherwise the configured window; client-side timing is a fallback, not an
/// authority (a suspended process will still expire late).
pub struct DepositMonitor {
    descriptor: DepositDescriptor,
    expires_at: DateTime<Utc>,
    state_tx: watch::Sender<DepositState>,
    events: mpsc::UnboundedSender<DepositEvent>,
    countdown_task: JoinHandle<()>,
    poll_task: JoinHandle<()>,
}

impl DepositMonitor {
    /// Start watching a deposit. Spawns the countdown and the poller.
    pub fn start(
        descriptor: DepositDescriptor,
        api: Arc<dyn DepositApi>,
        config: &DepositConfig,
        events: mpsc::UnboundedSender<DepositEvent>,
    ) -> Self {
        let window = Self::effective_window(&descriptor, config);
        let (state_tx, _) = watch::channel(DepositState::Pending);

        info!(
            deposit_id = %descriptor.deposit_id,
            window_secs = window.as_secs(),
            "watching deposit"
        );

        let countdown_task = Self::spawn_countdown(
            state_tx.clone(),
            events.clone(),
            descriptor.deposit_id.clone(),
            window,
        );
        let poll_task = Self::spawn_poller(
            state_tx.clone(),
            events.clone(),
            descriptor.deposit_id.clone(),
            api,
            config.poll_interval(),
        );

        Self {
            expires_at: Utc::now() + chrono::Duration::from_std(window).unwrap_or_default(),
            descriptor,
            state_tx,
            events,
            countdown_task,
            poll_task,
        }
    }

    /// The descriptor being watched.
    pub fn descriptor(&self) -> &DepositDescriptor {
        &self.descriptor
    }

    /// The watched deposit's ID.
    pub fn deposit_id(&self) -> &str {
        &self.descriptor.deposit_id
    }

    /// When the payment window closes.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// The current lifecycle state.
    pub fn state(&self) -> DepositState {
        *self.state_tx.borrow()
    }

    /// Subscribe to lifecycle state changes.
    pub fn subscribe(&self) -> watch::Receiver<DepositState> {
        self.state_tx.subscribe()
    }

    /// Abort the watch on user request.
    ///
    /// Forces `Pending -> Cancelled` (a no-op if a terminal state already
    /// landed) and stops both timers immediately.
    pub fn cancel(&self) {
        if transition(&self.state_tx, DepositState::Cancelled) {
            info!(deposit_id = %self.deposit_id(), "deposit watch cancelled");
            let _ = self
                .events
                .send(DepositEvent::StateChanged(DepositState::Cancelled));
        }
        self.countdown_task.abort();
        self.poll_task.abort();
    }

    fn effective_window(descriptor: &DepositDescriptor, config: &DepositConfig) -> Duration {
        match descriptor.expires_at {
            Some(at) => (at - Utc::now())
                .to_std()
                .unwrap_or(COUNTDOWN_TICK)
                .max(COUNTDOWN_TICK),
            None => config.window(),
        }
    }

    fn spawn_countdown(
        state_tx: watch::Sender<DepositState>,
        events: mpsc::UnboundedSender<DepositEvent>,
        deposit_id: String,
        window: Duration,
    ) -> JoinHandle<()> {
        let mut state_rx = state_tx.subscribe();
        let mut remaining = window.as_secs().max(1);

        tokio::spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + COUNTDOWN_TICK, COUNTDOWN_TICK);
            loop {
                tokio::select! {
                    _ = ticks.tick() => {
                        remaining = remaining.saturating_sub(1);
                        let _ = events.send(DepositEvent::Countdown { remaining_secs: remaining });
                        if remaining == 0 {
                            if transition(&state_tx, DepositState::Expired) {
                                info!(deposit_id = %deposit_id, "deposit window elapsed");
                                let _ = events.send(DepositEvent::StateChanged(DepositState::Expired));
                            }
                            break;
                        }
                    }
                    changed = state_rx.changed() => {
                        if changed.is_err() || state_rx.borrow_and_update().is_terminal() {
                            break;
                        }
                    }
                }
            }
        })
    }

    fn spawn_poller(
        state_tx: watch::Sender<DepositState>,
        events: mpsc::UnboundedSender<DepositEvent>,
        deposit_id: String,
        api: Arc<dyn DepositApi>,
        poll_interval: Duration,
    ) -> JoinHandle<()> {
        let mut state_rx = state_tx.subscribe();

        tokio::spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + poll_interval, poll_interval);
            ticks.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticks.tick() => {
                        match api.deposit_status(&deposit_id).await {
                            Ok(status) if status.is_terminal() => {
                                if transition(&state_tx, status) {
                                    info!(
                                        deposit_id = %deposit_id,
                                        state = %status,
                                        "deposit reached terminal state"
                                    );
                                    let _ = events.send(DepositEvent::StateChanged(status));
                                }
                                break;
                            }
                            Ok(status) => {
                                debug!(deposit_id = %deposit_id, state = %status, "deposit still pending");
                            }
                            // A failed poll must not fail a deposit that may
                            // still confirm; leave the state alone and retry
                            // on the next interval.
                            Err(error) => {
                                warn!(deposit_id = %deposit_id, error = %error, "status poll failed, will retry");
                            }
                        }
                    }
                    changed = state_rx.changed() => {
                        if changed.is_err() || state_rx.borrow_and_update().is_terminal() {
                            break;
                        }
                    }
                }
            }
        })
    }
}

impl Drop for DepositMonitor {
    fn drop(&mut self) {
        self.countdown_task.abort();
        self.poll_task.abort();
    }
}
