// ── Data fetcher ──
//
// One asynchronous read per call. Success redraws the router's container
// and stamps its last-sync time; failure replaces the container with an
// inline error. Neither outcome touches the poll registry.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use routerwatch_api::{GraphClient, GraphPayload};

use crate::board::{ChartBoard, UNABLE_TO_LOAD};
use crate::chart::ChartSpec;
use crate::clock::sync_stamp_now;
use crate::convert::series_from_payload;
use crate::error::CoreError;
use crate::model::RouterId;

/// Anything that can produce the raw series for a router.
///
/// `GraphClient` is the production source; tests substitute in-memory fakes.
pub trait SeriesSource: Send + Sync + 'static {
    fn fetch(
        &self,
        router: &RouterId,
    ) -> impl Future<Output = Result<GraphPayload, routerwatch_api::Error>> + Send;
}

impl SeriesSource for GraphClient {
    fn fetch(
        &self,
        router: &RouterId,
    ) -> impl Future<Output = Result<GraphPayload, routerwatch_api::Error>> + Send {
        self.fetch_series(router.as_str())
    }
}

/// What happened to one fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Chart redrawn with fresh data.
    Rendered,
    /// Container now shows the inline error.
    Failed(CoreError),
    /// The panel closed before the response arrived; nothing was written.
    Discarded,
}

/// Fetches a router's series and writes the result to the board.
pub struct DataFetcher<S> {
    source: S,
    board: Arc<ChartBoard>,
}

impl<S: SeriesSource> DataFetcher<S> {
    pub fn new(source: S, board: Arc<ChartBoard>) -> Self {
        Self { source, board }
    }

    pub fn board(&self) -> &Arc<ChartBoard> {
        &self.board
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch once for `router`.
    ///
    /// `lifetime` is the owning panel's token. If it is cancelled while the
    /// request is in flight, the response is dropped without touching the
    /// container.
    pub async fn fetch(&self, router: &RouterId, lifetime: &CancellationToken) -> FetchOutcome {
        let result = tokio::select! {
            biased;
            () = lifetime.cancelled() => {
                debug!(router = %router, "panel closed, fetch abandoned");
                return FetchOutcome::Discarded;
            }
            r = self.source.fetch(router) => r,
        };

        if lifetime.is_cancelled() {
            debug!(router = %router, "panel closed, response discarded");
            return FetchOutcome::Discarded;
        }

        let container = router.container();
        let series = result
            .map_err(|e| match CoreError::from(e) {
                CoreError::MalformedSeries { reason, .. } => CoreError::MalformedSeries {
                    router: router.to_string(),
                    reason,
                },
                other => other,
            })
            .and_then(|payload| series_from_payload(router, payload));

        match series {
            Ok(series) => {
                debug!(router = %router, samples = series.len(), "series fetched");
                self.board.render(&container, ChartSpec::from_series(&series));
                self.board.mark_synced(&container, sync_stamp_now());
                FetchOutcome::Rendered
            }
            Err(e) => {
                warn!(router = %router, error = %e, transient = e.is_transient(), "graph fetch failed");
                self.board.show_error(&container, UNABLE_TO_LOAD);
                FetchOutcome::Failed(e)
            }
        }
    }
}

/// Run one fetch on its own task so the caller never waits on the network.
pub(crate) fn spawn_fetch<S: SeriesSource>(
    fetcher: &Arc<DataFetcher<S>>,
    router: &RouterId,
    lifetime: &CancellationToken,
) -> JoinHandle<FetchOutcome> {
    let fetcher = Arc::clone(fetcher);
    let router = router.clone();
    let lifetime = lifetime.clone();
    tokio::spawn(async move { fetcher.fetch(&router, &lifetime).await })
}

/// Fetch once for `router` after `delay`.
///
/// Only the panel `lifetime` cancels the wait, so pausing the poll timer
/// leaves this fetch in place while closing the panel drops it.
pub(crate) fn spawn_delayed_fetch<S: SeriesSource>(
    fetcher: &Arc<DataFetcher<S>>,
    router: &RouterId,
    delay: Duration,
    lifetime: &CancellationToken,
) -> JoinHandle<FetchOutcome> {
    let fetcher = Arc::clone(fetcher);
    let router = router.clone();
    let lifetime = lifetime.clone();
    tokio::spawn(async move {
        tokio::select! {
            biased;
            () = lifetime.cancelled() => {
                debug!(router = %router, "panel closed before initial fetch");
                return FetchOutcome::Discarded;
            }
            () = tokio::time::sleep(delay) => {}
        }
        debug!(router = %router, "initial fetch");
        fetcher.fetch(&router, &lifetime).await
    })
}
