// ── Poll scheduler ──
//
// Owns the poll registry: at most one repeating timer per router. Each
// timer is a background task that spawns a fetch on every tick, so slow
// fetches overlap rather than delaying the cadence.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::fetcher::{DataFetcher, SeriesSource, spawn_fetch};
use crate::model::RouterId;

/// Live timer for one router.
struct PollHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Per-router repeating timers driving a shared [`DataFetcher`].
pub struct PollScheduler<S> {
    fetcher: Arc<DataFetcher<S>>,
    registry: HashMap<RouterId, PollHandle>,
}

impl<S: SeriesSource> PollScheduler<S> {
    pub fn new(fetcher: Arc<DataFetcher<S>>) -> Self {
        Self {
            fetcher,
            registry: HashMap::new(),
        }
    }

    pub fn fetcher(&self) -> &Arc<DataFetcher<S>> {
        &self.fetcher
    }

    /// Start polling `router` every `every`, replacing any existing timer.
    ///
    /// The first fetch happens one full period after the call. The timer
    /// stops on its own when `lifetime` is cancelled.
    pub fn start(&mut self, router: &RouterId, every: Duration, lifetime: &CancellationToken) {
        if every.is_zero() {
            warn!(router = %router, "refusing to poll with a zero interval");
            return;
        }
        if let Some(previous) = self.registry.remove(router) {
            previous.cancel.cancel();
            debug!(router = %router, "replacing existing poll timer");
        }

        let cancel = lifetime.child_token();
        let task = tokio::spawn(poll_task(
            Arc::clone(&self.fetcher),
            router.clone(),
            every,
            cancel.clone(),
            lifetime.clone(),
        ));
        debug!(router = %router, interval = ?every, "poll timer started");
        self.registry
            .insert(router.clone(), PollHandle { cancel, task });
    }

    /// Cancel and remove the timer for `router`. No-op if absent.
    pub fn stop(&mut self, router: &RouterId) -> bool {
        match self.registry.remove(router) {
            Some(handle) => {
                handle.cancel.cancel();
                debug!(router = %router, "poll timer stopped");
                true
            }
            None => {
                debug!(router = %router, "stop: no active timer");
                false
            }
        }
    }

    /// Cancel and remove every timer.
    pub fn stop_all(&mut self) {
        let count = self.registry.len();
        for (_, handle) in self.registry.drain() {
            handle.cancel.cancel();
        }
        if count > 0 {
            info!(count, "all poll timers stopped");
        }
    }

    pub fn is_polling(&self, router: &RouterId) -> bool {
        self.registry
            .get(router)
            .is_some_and(|h| !h.task.is_finished())
    }

    /// Routers with a registered timer, sorted.
    pub fn active_routers(&self) -> Vec<RouterId> {
        let mut routers: Vec<_> = self.registry.keys().cloned().collect();
        routers.sort();
        routers
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

impl<S> Drop for PollScheduler<S> {
    fn drop(&mut self) {
        for handle in self.registry.values() {
            handle.cancel.cancel();
        }
    }
}

/// Timer loop for one router.
///
/// `cancel` stops the timer; `lifetime` is the panel token handed to each
/// fetch so a closed panel discards late responses.
async fn poll_task<S: SeriesSource>(
    fetcher: Arc<DataFetcher<S>>,
    router: RouterId,
    every: Duration,
    cancel: CancellationToken,
    lifetime: CancellationToken,
) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                debug!(router = %router, "poll tick");
                drop(spawn_fetch(&fetcher, &router, &lifetime));
            }
        }
    }
}
