//! Read-only snapshot of controller state, rebuilt for every frame.

use std::sync::Arc;
use std::time::Duration;

use routerwatch_core::{
    Container, Controls, PanelController, PanelState, RouterId, SeriesSource,
};

/// One open panel as the UI sees it.
#[derive(Debug, Clone)]
pub struct PanelView {
    pub router: RouterId,
    pub state: PanelState,
    pub controls: Controls,
    pub container: Option<Arc<Container>>,
}

/// Everything a component needs to draw.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    /// Configured routers plus any opened ad hoc, in list order.
    pub routers: Vec<RouterId>,
    /// Open panels in the order they were opened.
    pub panels: Vec<PanelView>,
    pub selected: Option<RouterId>,
    pub expanded: Option<RouterId>,
    pub poll_interval: Duration,
}

impl DashboardView {
    pub fn capture<S: SeriesSource>(controller: &PanelController<S>) -> Self {
        let board = controller.board();
        let panels: Vec<PanelView> = controller
            .panels()
            .map(|p| PanelView {
                router: p.router().clone(),
                state: p.state(),
                controls: controller.controls(p.router()).unwrap_or_default(),
                container: board.container(p.container()),
            })
            .collect();

        let mut routers = controller.config().routers.clone();
        for panel in &panels {
            if !routers.contains(&panel.router) {
                routers.push(panel.router.clone());
            }
        }

        Self {
            routers,
            panels,
            selected: controller.selected().cloned(),
            expanded: controller.expanded().cloned(),
            poll_interval: controller.config().poll_interval,
        }
    }

    pub fn panel(&self, router: &RouterId) -> Option<&PanelView> {
        self.panels.iter().find(|p| &p.router == router)
    }

    /// Panel state for `router`, `Idle` when it has no open panel.
    pub fn state_of(&self, router: &RouterId) -> PanelState {
        self.panel(router).map_or(PanelState::Idle, |p| p.state)
    }
}
