#![allow(clippy::unwrap_used)]
// Scheduler and panel controller behavior under paused tokio time.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use routerwatch_api::{GraphPayload, RawTimestamp, UrlTemplate};
use routerwatch_core::{
    AxisScale, ChartBoard, ContainerContent, Controls, DashboardConfig, DataFetcher, PanelController,
    PanelState, PollScheduler, RouterId, SeriesSource, TraceMode, UNABLE_TO_LOAD,
};

// ── Fake series source ──────────────────────────────────────────────

#[derive(Default)]
struct FakeState {
    calls: HashMap<String, usize>,
    failing: HashSet<String>,
    delay: Option<Duration>,
}

/// In-memory source counting calls per router.
#[derive(Clone, Default)]
struct FakeSource {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSource {
    fn calls(&self, router: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(router)
            .copied()
            .unwrap_or(0)
    }

    fn fail(&self, router: &str) {
        self.state.lock().unwrap().failing.insert(router.to_owned());
    }

    fn respond_after(&self, delay: Duration) {
        self.state.lock().unwrap().delay = Some(delay);
    }
}

impl SeriesSource for FakeSource {
    fn fetch(
        &self,
        router: &RouterId,
    ) -> impl Future<Output = Result<GraphPayload, routerwatch_api::Error>> + Send {
        let state = Arc::clone(&self.state);
        let key = router.to_string();
        async move {
            let (delay, failing) = {
                let mut s = state.lock().unwrap();
                *s.calls.entry(key.clone()).or_default() += 1;
                (s.delay, s.failing.contains(&key))
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if failing {
                return Err(routerwatch_api::Error::Http {
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            Ok(sample_payload(&key))
        }
    }
}

fn sample_payload(sid: &str) -> GraphPayload {
    GraphPayload {
        ts: vec![
            RawTimestamp::Number(1.0),
            RawTimestamp::Number(2.0),
            RawTimestamp::Number(3.0),
        ],
        qst: vec![5.0, 6.0, 7.0],
        dst: vec![1.0, 2.0, 1.0],
        ucl_q: vec![10.0, 10.0, 10.0],
        ucl_d: vec![4.0, 4.0, 4.0],
        sid: sid.to_owned(),
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn router(id: &str) -> RouterId {
    RouterId::new(id).unwrap()
}

fn config(initial_delay: Duration) -> DashboardConfig {
    DashboardConfig::new(UrlTemplate::with_default_placeholder("http://localhost/graph/none").unwrap())
        .with_poll_interval(Duration::from_millis(1000))
        .with_initial_fetch_delay(initial_delay)
}

fn setup(initial_delay: Duration) -> (PanelController<FakeSource>, FakeSource) {
    let source = FakeSource::default();
    let board = Arc::new(ChartBoard::new());
    let controller = PanelController::new(config(initial_delay), source.clone(), board);
    (controller, source)
}

async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// ── Poll scheduler ──────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn start_twice_keeps_one_timer() {
    let source = FakeSource::default();
    let fetcher = Arc::new(DataFetcher::new(source.clone(), Arc::new(ChartBoard::new())));
    let mut scheduler = PollScheduler::new(fetcher);
    let lifetime = CancellationToken::new();
    let r1 = router("R1");

    scheduler.start(&r1, Duration::from_millis(1000), &lifetime);
    scheduler.start(&r1, Duration::from_millis(1000), &lifetime);
    assert_eq!(scheduler.len(), 1);

    sleep_ms(3500).await;
    assert_eq!(source.calls("R1"), 3);
}

#[tokio::test(start_paused = true)]
async fn stop_halts_fetches_until_restarted() {
    let source = FakeSource::default();
    let fetcher = Arc::new(DataFetcher::new(source.clone(), Arc::new(ChartBoard::new())));
    let mut scheduler = PollScheduler::new(fetcher);
    let lifetime = CancellationToken::new();
    let r1 = router("R1");

    scheduler.start(&r1, Duration::from_millis(1000), &lifetime);
    sleep_ms(1500).await;
    assert_eq!(source.calls("R1"), 1);

    assert!(scheduler.stop(&r1));
    assert!(!scheduler.stop(&r1));
    assert!(!scheduler.is_polling(&r1));
    sleep_ms(3000).await;
    assert_eq!(source.calls("R1"), 1);

    scheduler.start(&r1, Duration::from_millis(1000), &lifetime);
    sleep_ms(1100).await;
    assert_eq!(source.calls("R1"), 2);
}

#[tokio::test(start_paused = true)]
async fn stop_all_clears_registry() {
    let source = FakeSource::default();
    let fetcher = Arc::new(DataFetcher::new(source.clone(), Arc::new(ChartBoard::new())));
    let mut scheduler = PollScheduler::new(fetcher);
    let lifetime = CancellationToken::new();

    scheduler.start(&router("R2"), Duration::from_millis(1000), &lifetime);
    scheduler.start(&router("R1"), Duration::from_millis(1000), &lifetime);
    assert_eq!(scheduler.active_routers(), vec![router("R1"), router("R2")]);

    scheduler.stop_all();
    assert!(scheduler.is_empty());
    sleep_ms(2500).await;
    assert_eq!(source.calls("R1") + source.calls("R2"), 0);
}

#[tokio::test(start_paused = true)]
async fn zero_interval_is_ignored() {
    let source = FakeSource::default();
    let fetcher = Arc::new(DataFetcher::new(source.clone(), Arc::new(ChartBoard::new())));
    let mut scheduler = PollScheduler::new(fetcher);

    scheduler.start(&router("R1"), Duration::ZERO, &CancellationToken::new());
    assert!(scheduler.is_empty());
}

// ── Panel controller ────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn select_fetches_after_delay_then_every_interval() {
    let (mut ctl, source) = setup(Duration::from_millis(500));
    let r1 = router("R1");

    ctl.select(&r1);
    assert_eq!(ctl.state(&r1), Some(PanelState::Polling));
    assert_eq!(ctl.selected(), Some(&r1));
    let loading = ctl.board().container(&r1.container()).unwrap();
    assert!(matches!(loading.content, ContainerContent::Loading { .. }));

    sleep_ms(400).await;
    assert_eq!(source.calls("R1"), 0);
    sleep_ms(200).await;
    assert_eq!(source.calls("R1"), 1);
    sleep_ms(2900).await; // t = 3500ms
    assert_eq!(source.calls("R1"), 4);
}

#[tokio::test(start_paused = true)]
async fn pause_stops_fetches_until_resume() {
    let (mut ctl, source) = setup(Duration::from_millis(500));
    let r1 = router("R1");

    ctl.select(&r1);
    sleep_ms(600).await;
    assert_eq!(source.calls("R1"), 1);

    assert!(ctl.pause(&r1));
    assert_eq!(ctl.state(&r1), Some(PanelState::Paused));
    assert!(!ctl.is_polling(&r1));
    sleep_ms(3000).await;
    assert_eq!(source.calls("R1"), 1);

    assert!(ctl.resume(&r1));
    assert_eq!(ctl.state(&r1), Some(PanelState::Polling));
    sleep_ms(1100).await;
    assert_eq!(source.calls("R1"), 2);
}

#[tokio::test(start_paused = true)]
async fn pause_during_initial_delay_keeps_initial_fetch() {
    let (mut ctl, source) = setup(Duration::from_millis(500));
    let r1 = router("R1");

    ctl.select(&r1);
    sleep_ms(100).await;
    assert!(ctl.pause(&r1));

    sleep_ms(3000).await;
    assert_eq!(source.calls("R1"), 1);
    let container = ctl.board().container(&r1.container()).unwrap();
    assert!(matches!(container.content, ContainerContent::Chart(_)));
    let controls = ctl.controls(&r1).unwrap();
    assert!(controls.resume);
    assert!(!controls.pause);

    assert!(ctl.resume(&r1));
    sleep_ms(1100).await;
    assert_eq!(source.calls("R1"), 2);
}

#[tokio::test(start_paused = true)]
async fn close_during_initial_delay_drops_initial_fetch() {
    let (mut ctl, source) = setup(Duration::from_millis(500));
    let r1 = router("R1");

    ctl.select(&r1);
    sleep_ms(100).await;
    assert!(ctl.close(&r1));

    sleep_ms(3000).await;
    assert_eq!(source.calls("R1"), 0);
    assert!(ctl.board().container(&r1.container()).is_none());
}

#[tokio::test(start_paused = true)]
async fn pausing_one_router_leaves_others_polling() {
    let (mut ctl, source) = setup(Duration::from_millis(500));
    let (a, b) = (router("A"), router("B"));

    ctl.select(&a);
    ctl.select(&b);
    assert!(ctl.pause(&a));

    sleep_ms(3500).await;
    // A still gets its initial fetch, but no ticks
    assert_eq!(source.calls("A"), 1);
    assert_eq!(source.calls("B"), 4);
    assert_eq!(ctl.active_routers(), vec![b.clone()]);
    assert_eq!(ctl.state(&b), Some(PanelState::Polling));
}

#[tokio::test(start_paused = true)]
async fn successful_fetch_draws_four_traces_on_log_axis() {
    let (mut ctl, _source) = setup(Duration::ZERO);
    let r1 = router("R1");

    ctl.select(&r1);
    sleep_ms(10).await;

    let container = ctl.board().container(&r1.container()).unwrap();
    assert_eq!(r1.container().as_str(), "graphR1");
    let ContainerContent::Chart(spec) = &container.content else {
        panic!("expected a chart, got {:?}", container.content);
    };
    assert_eq!(spec.traces.len(), 4);
    let modes: Vec<_> = spec.traces.iter().map(|t| t.mode).collect();
    assert_eq!(
        modes,
        vec![
            TraceMode::Markers,
            TraceMode::Markers,
            TraceMode::Lines,
            TraceMode::Lines
        ]
    );
    assert_eq!(spec.layout.y_scale, AxisScale::Log);
    assert_eq!(spec.layout.title, "R1 graph");
    assert!(container.last_sync.is_some());

    let controls = ctl.controls(&r1).unwrap();
    assert!(controls.pause);
    assert!(!controls.resume);
    assert!(controls.expand);
    assert!(controls.last_sync.is_some());
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_shows_error_and_keeps_polling() {
    let (mut ctl, source) = setup(Duration::from_millis(500));
    let r2 = router("R2");
    source.fail("R2");

    ctl.select(&r2);
    sleep_ms(2500).await;

    assert_eq!(source.calls("R2"), 3);
    let container = ctl.board().container(&r2.container()).unwrap();
    assert_eq!(
        container.content,
        ContainerContent::Error {
            message: UNABLE_TO_LOAD.into()
        }
    );
    assert!(ctl.is_polling(&r2));
    assert_eq!(ctl.active_routers(), vec![r2.clone()]);
    assert_eq!(ctl.state(&r2), Some(PanelState::Polling));
    // no successful fetch yet, so no controls
    assert_eq!(ctl.controls(&r2).unwrap(), Controls::default());
}

#[tokio::test(start_paused = true)]
async fn deselected_panel_still_receives_responses() {
    let (mut ctl, _source) = setup(Duration::ZERO);
    let (r1, r2) = (router("R1"), router("R2"));

    ctl.select(&r1);
    ctl.select(&r2);
    assert_eq!(ctl.selected(), Some(&r2));
    sleep_ms(10).await;

    let c1 = ctl.board().container(&r1.container()).unwrap();
    assert!(matches!(c1.content, ContainerContent::Chart(_)));
    let open: Vec<_> = ctl.panels().map(|p| p.router().clone()).collect();
    assert_eq!(open, vec![r1, r2]);
}

#[tokio::test(start_paused = true)]
async fn slow_fetches_overlap_without_delaying_ticks() {
    let (mut ctl, source) = setup(Duration::ZERO);
    let r1 = router("R1");
    source.respond_after(Duration::from_millis(2500));

    ctl.select(&r1);
    sleep_ms(3100).await;

    // immediate fetch plus ticks at 1s, 2s, 3s, none of them finished waiting
    assert_eq!(source.calls("R1"), 4);
    assert!(ctl.is_polling(&r1));
}

#[tokio::test(start_paused = true)]
async fn reselecting_open_panel_keeps_its_chart() {
    let (mut ctl, source) = setup(Duration::ZERO);
    let (r1, r2) = (router("R1"), router("R2"));

    ctl.select(&r1);
    sleep_ms(10).await;
    ctl.select(&r2);
    source.respond_after(Duration::from_millis(200));

    ctl.select(&r1);
    let container = ctl.board().container(&r1.container()).unwrap();
    assert!(matches!(container.content, ContainerContent::Chart(_)));
    assert!(container.last_sync.is_some());
    assert_eq!(ctl.selected(), Some(&r1));
}

#[tokio::test(start_paused = true)]
async fn close_discards_in_flight_response() {
    let (mut ctl, source) = setup(Duration::ZERO);
    let r1 = router("R1");
    source.respond_after(Duration::from_millis(2000));

    ctl.select(&r1);
    sleep_ms(500).await;
    assert_eq!(source.calls("R1"), 1);

    assert!(ctl.close(&r1));
    assert_eq!(ctl.state(&r1), Some(PanelState::Closed));
    assert_eq!(ctl.selected(), None);

    sleep_ms(3000).await;
    assert!(ctl.board().container(&r1.container()).is_none());
    assert_eq!(source.calls("R1"), 1);
    assert_eq!(ctl.panels().count(), 0);
}

#[tokio::test(start_paused = true)]
async fn reselecting_closed_router_opens_fresh_panel() {
    let (mut ctl, source) = setup(Duration::ZERO);
    let r1 = router("R1");

    ctl.select(&r1);
    sleep_ms(10).await;
    ctl.close(&r1);

    ctl.select(&r1);
    assert_eq!(ctl.state(&r1), Some(PanelState::Polling));
    sleep_ms(10).await;
    assert_eq!(source.calls("R1"), 2);
    let container = ctl.board().container(&r1.container()).unwrap();
    assert!(matches!(container.content, ContainerContent::Chart(_)));
}

#[tokio::test(start_paused = true)]
async fn expand_defaults_to_selected_and_refetches() {
    let (mut ctl, source) = setup(Duration::ZERO);
    let r1 = router("R1");

    ctl.select(&r1);
    sleep_ms(10).await;
    assert_eq!(source.calls("R1"), 1);

    assert!(ctl.expand(None));
    assert_eq!(ctl.expanded(), Some(&r1));
    sleep_ms(10).await;
    assert_eq!(source.calls("R1"), 2);
    let controls = ctl.controls(&r1).unwrap();
    assert!(!controls.expand);
    assert!(controls.compress);
    assert_eq!(ctl.state(&r1), Some(PanelState::Polling));

    assert!(ctl.compress());
    assert_eq!(ctl.expanded(), None);
    sleep_ms(10).await;
    assert_eq!(source.calls("R1"), 3);
}

#[tokio::test(start_paused = true)]
async fn unknown_routers_are_no_ops() {
    let (mut ctl, source) = setup(Duration::ZERO);
    let ghost = router("ghost");

    assert!(!ctl.pause(&ghost));
    assert!(!ctl.resume(&ghost));
    assert!(!ctl.close(&ghost));
    assert!(!ctl.refresh(&ghost));
    assert!(!ctl.expand(None));
    assert!(!ctl.compress());
    assert_eq!(ctl.state(&ghost), None);
    assert_eq!(ctl.controls(&ghost), None);

    sleep_ms(10).await;
    assert_eq!(source.calls("ghost"), 0);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_everything() {
    let (mut ctl, source) = setup(Duration::from_millis(500));
    let (r1, r2) = (router("R1"), router("R2"));

    ctl.select(&r1);
    ctl.select(&r2);
    ctl.shutdown();

    sleep_ms(3000).await;
    assert_eq!(source.calls("R1") + source.calls("R2"), 0);
    assert!(ctl.active_routers().is_empty());
    assert_eq!(ctl.state(&r1), Some(PanelState::Closed));
}
