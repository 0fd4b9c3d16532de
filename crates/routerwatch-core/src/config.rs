// ── Runtime configuration ──
//
// Settings the dashboard runs with. Built by the binary from a config
// profile and CLI flags; this crate never reads files itself.

use std::time::Duration;

use routerwatch_api::{TransportConfig, UrlTemplate};

use crate::model::RouterId;

/// Poll interval used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Delay between selecting a router and its first fetch.
pub const DEFAULT_INITIAL_FETCH_DELAY: Duration = Duration::from_millis(500);

/// Loading indicator label used when none is configured.
pub const DEFAULT_LOADING_INDICATOR: &str = "Loading…";

/// Configuration for a [`PanelController`](crate::PanelController).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Endpoint template; the placeholder is replaced by the router id.
    pub graph_url: UrlTemplate,
    /// Routers offered for selection, in display order.
    pub routers: Vec<RouterId>,
    /// Period between polls of one panel.
    pub poll_interval: Duration,
    /// Delay before the first fetch after selection. Zero fetches at once.
    pub initial_fetch_delay: Duration,
    /// Text shown next to the loading indicator.
    pub loading_indicator: String,
    /// HTTP transport settings.
    pub transport: TransportConfig,
}

impl DashboardConfig {
    /// Defaults for everything except the endpoint.
    pub fn new(graph_url: UrlTemplate) -> Self {
        Self {
            graph_url,
            routers: Vec::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            initial_fetch_delay: DEFAULT_INITIAL_FETCH_DELAY,
            loading_indicator: DEFAULT_LOADING_INDICATOR.to_owned(),
            transport: TransportConfig::default(),
        }
    }

    #[must_use]
    pub fn with_routers(mut self, routers: Vec<RouterId>) -> Self {
        self.routers = routers;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, every: Duration) -> Self {
        self.poll_interval = every;
        self
    }

    #[must_use]
    pub fn with_initial_fetch_delay(mut self, delay: Duration) -> Self {
        self.initial_fetch_delay = delay;
        self
    }
}
