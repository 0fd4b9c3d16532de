// ── Panel controller ──
//
// Reacts to user actions and drives the scheduler and the chart board.
// All registry mutation happens here through `&mut self`; fetch tasks only
// ever write to the board.

use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use routerwatch_api::GraphClient;

use crate::board::ChartBoard;
use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::fetcher::{DataFetcher, SeriesSource, spawn_delayed_fetch, spawn_fetch};
use crate::model::{ContainerId, Controls, PanelState, RouterId};
use crate::scheduler::PollScheduler;

/// One router panel.
#[derive(Debug)]
pub struct Panel {
    router: RouterId,
    container: ContainerId,
    state: PanelState,
    /// Cancelled when the panel closes; in-flight fetches watch it.
    lifetime: CancellationToken,
}

impl Panel {
    fn open(router: RouterId) -> Self {
        Self {
            container: router.container(),
            router,
            state: PanelState::Idle,
            lifetime: CancellationToken::new(),
        }
    }

    pub fn router(&self) -> &RouterId {
        &self.router
    }

    pub fn container(&self) -> &ContainerId {
        &self.container
    }

    pub fn state(&self) -> PanelState {
        self.state
    }
}

/// Owns every panel, the poll registry, and the selection.
pub struct PanelController<S> {
    config: DashboardConfig,
    scheduler: PollScheduler<S>,
    board: Arc<ChartBoard>,
    panels: HashMap<RouterId, Panel>,
    /// Open panels in the order they were opened.
    order: Vec<RouterId>,
    selected: Option<RouterId>,
    expanded: Option<RouterId>,
}

impl PanelController<GraphClient> {
    /// Build a controller talking to the configured HTTP endpoint.
    pub fn from_config(config: DashboardConfig, board: Arc<ChartBoard>) -> Result<Self, CoreError> {
        let client = GraphClient::new(config.graph_url.clone(), &config.transport)?;
        Ok(Self::new(config, client, board))
    }
}

impl<S: SeriesSource> PanelController<S> {
    pub fn new(config: DashboardConfig, source: S, board: Arc<ChartBoard>) -> Self {
        let fetcher = Arc::new(DataFetcher::new(source, Arc::clone(&board)));
        Self {
            config,
            scheduler: PollScheduler::new(fetcher),
            board,
            panels: HashMap::new(),
            order: Vec::new(),
            selected: None,
            expanded: None,
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Open (or re-open) the panel for `router` and start polling it.
    ///
    /// A fresh panel shows the loading indicator until its first response;
    /// an already open panel keeps its chart. The first fetch runs after the
    /// configured initial delay rather than waiting a full interval, and
    /// pausing before then does not cancel it.
    pub fn select(&mut self, router: &RouterId) {
        let reopen = self
            .panels
            .get(router)
            .is_none_or(|p| !p.state.is_open());
        if reopen {
            self.panels.insert(router.clone(), Panel::open(router.clone()));
            self.order.push(router.clone());
            info!(router = %router, "panel opened");
        }

        self.selected = Some(router.clone());

        let Some(panel) = self.panels.get_mut(router) else {
            return;
        };
        if reopen {
            self.board
                .show_loading(&panel.container, &self.config.loading_indicator);
        }
        panel.state = PanelState::Polling;

        let lifetime = panel.lifetime.clone();
        self.scheduler
            .start(router, self.config.poll_interval, &lifetime);
        let fetcher = self.scheduler.fetcher();
        if self.config.initial_fetch_delay.is_zero() {
            drop(spawn_fetch(fetcher, router, &lifetime));
        } else {
            drop(spawn_delayed_fetch(
                fetcher,
                router,
                self.config.initial_fetch_delay,
                &lifetime,
            ));
        }
    }

    /// Stop polling `router` without closing its panel.
    pub fn pause(&mut self, router: &RouterId) -> bool {
        let Some(panel) = self.panels.get_mut(router) else {
            debug!(router = %router, "pause: unknown panel");
            return false;
        };
        if panel.state != PanelState::Polling {
            debug!(router = %router, state = %panel.state, "pause: panel not polling");
            return false;
        }
        self.scheduler.stop(router);
        panel.state = PanelState::Paused;
        self.selected = Some(router.clone());
        info!(router = %router, "panel paused");
        true
    }

    /// Restart polling a paused panel. The next fetch is one interval away.
    pub fn resume(&mut self, router: &RouterId) -> bool {
        let Some(panel) = self.panels.get_mut(router) else {
            debug!(router = %router, "resume: unknown panel");
            return false;
        };
        if panel.state != PanelState::Paused {
            debug!(router = %router, state = %panel.state, "resume: panel not paused");
            return false;
        }
        self.scheduler
            .start(router, self.config.poll_interval, &panel.lifetime);
        panel.state = PanelState::Polling;
        self.selected = Some(router.clone());
        info!(router = %router, "panel resumed");
        true
    }

    /// Show one panel across the whole viewport and refetch it.
    ///
    /// With no argument the selected router is expanded. Polling state is
    /// left as it is.
    pub fn expand(&mut self, router: Option<&RouterId>) -> bool {
        let Some(target) = router.or(self.selected.as_ref()).cloned() else {
            debug!("expand: nothing selected");
            return false;
        };
        if !self.is_open(&target) {
            debug!(router = %target, "expand: unknown panel");
            return false;
        }
        self.expanded = Some(target.clone());
        self.selected = Some(target.clone());
        info!(router = %target, "panel expanded");
        self.refresh(&target)
    }

    /// Return to the panel grid and refetch the panel that was expanded.
    pub fn compress(&mut self) -> bool {
        let Some(router) = self.expanded.take() else {
            debug!("compress: nothing expanded");
            return false;
        };
        info!(router = %router, "panel compressed");
        self.refresh(&router)
    }

    /// Stop polling, discard in-flight responses, and remove the chart.
    pub fn close(&mut self, router: &RouterId) -> bool {
        let Some(panel) = self.panels.get_mut(router) else {
            debug!(router = %router, "close: unknown panel");
            return false;
        };
        if !panel.state.is_open() {
            debug!(router = %router, "close: panel already closed");
            return false;
        }
        self.scheduler.stop(router);
        panel.lifetime.cancel();
        self.board.clear(&panel.container);
        panel.state = PanelState::Closed;

        self.order.retain(|r| r != router);
        if self.selected.as_ref() == Some(router) {
            self.selected = None;
        }
        if self.expanded.as_ref() == Some(router) {
            self.expanded = None;
        }
        info!(router = %router, "panel closed");
        true
    }

    /// Fetch `router` once, right now, regardless of its timer.
    pub fn refresh(&self, router: &RouterId) -> bool {
        let Some(panel) = self.panels.get(router).filter(|p| p.state.is_open()) else {
            debug!(router = %router, "refresh: unknown panel");
            return false;
        };
        drop(spawn_fetch(self.scheduler.fetcher(), router, &panel.lifetime));
        true
    }

    /// Stop every timer and close every panel.
    pub fn shutdown(&mut self) {
        self.scheduler.stop_all();
        for panel in self.panels.values_mut() {
            panel.lifetime.cancel();
            panel.state = PanelState::Closed;
        }
        self.order.clear();
        self.selected = None;
        self.expanded = None;
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self, router: &RouterId) -> Option<PanelState> {
        self.panels.get(router).map(Panel::state)
    }

    pub fn selected(&self) -> Option<&RouterId> {
        self.selected.as_ref()
    }

    pub fn expanded(&self) -> Option<&RouterId> {
        self.expanded.as_ref()
    }

    /// Controls to offer for `router`'s panel.
    ///
    /// Nothing is offered until the panel has shown data once.
    pub fn controls(&self, router: &RouterId) -> Option<Controls> {
        let panel = self.panels.get(router).filter(|p| p.state.is_open())?;
        let last_sync = self
            .board
            .container(&panel.container)
            .and_then(|c| c.last_sync.clone());
        let Some(stamp) = last_sync else {
            return Some(Controls::default());
        };

        let expanded = self.expanded.as_ref() == Some(router);
        Some(Controls {
            pause: panel.state == PanelState::Polling,
            resume: panel.state == PanelState::Paused,
            expand: !expanded,
            compress: expanded,
            last_sync: Some(stamp),
        })
    }

    /// Open panels in the order they were opened.
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.order.iter().filter_map(|r| self.panels.get(r))
    }

    pub fn is_open(&self, router: &RouterId) -> bool {
        self.panels.get(router).is_some_and(|p| p.state.is_open())
    }

    pub fn is_polling(&self, router: &RouterId) -> bool {
        self.scheduler.is_polling(router)
    }

    /// Routers with a live poll timer.
    pub fn active_routers(&self) -> Vec<RouterId> {
        self.scheduler.active_routers()
    }

    pub fn board(&self) -> &Arc<ChartBoard> {
        &self.board
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }
}
