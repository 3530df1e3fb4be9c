//! Fixed-interval action dispatch.
//!
//! A [`PollingTask`] sends an action into a [`Store`] every `period` until it
//! is stopped or dropped. Each tick only dispatches: it does not wait for the
//! effects of the previous tick, so slow effects from consecutive ticks
//! overlap instead of delaying the schedule.

use crate::{Store, StoreError};
use optiflow_core::reducer::Reducer;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Shortest period accepted; a zero period would spin.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a running polling loop
///
/// The loop is cancelled when the handle is dropped, so a polling task never
/// outlives its owner. Use [`PollingTask::stop`] to cancel and also wait for
/// the loop to exit.
#[derive(Debug)]
pub struct PollingTask {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
    period: Duration,
}

impl PollingTask {
    /// Start dispatching `make_action()` into `store` every `period`
    ///
    /// The first dispatch happens one full period after the call.
    #[must_use]
    pub fn spawn<S, A, E, R, F>(store: Store<S, A, E, R>, period: Duration, make_action: F) -> Self
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
        F: Fn() -> A + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let cancel = CancellationToken::new();
        let ticks = Arc::new(AtomicU64::new(0));

        let handle = tokio::spawn(poll_loop(
            store,
            period,
            make_action,
            cancel.clone(),
            Arc::clone(&ticks),
        ));

        tracing::info!(period_ms = period.as_millis(), "Polling task started");

        Self {
            cancel,
            handle: Some(handle),
            ticks,
            period,
        }
    }

    /// Number of actions dispatched so far
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Interval between dispatches
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Whether the loop is still running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Cancel the loop and wait for it to exit
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TaskJoinError`] if the loop task panicked.
    pub async fn stop(mut self) -> Result<(), StoreError> {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            handle.await?;
        }
        Ok(())
    }
}

impl Drop for PollingTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop<S, A, E, R, F>(
    store: Store<S, A, E, R>,
    period: Duration,
    make_action: F,
    cancel: CancellationToken,
    ticks: Arc<AtomicU64>,
) where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    F: Fn() -> A + Send + 'static,
{
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let tick = ticks.fetch_add(1, Ordering::AcqRel) + 1;
                metrics::counter!("polling.ticks.total").increment(1);
                tracing::debug!(tick, "Polling tick");

                if let Err(error) = store.send(make_action()).await {
                    tracing::info!(%error, "Store rejected polling action, stopping");
                    break;
                }
            }
        }
    }

    tracing::info!(ticks = ticks.load(Ordering::Acquire), "Polling task stopped");
}
