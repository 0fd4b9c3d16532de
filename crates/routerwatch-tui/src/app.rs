//! Application core: event loop, key mapping, action dispatch.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use routerwatch_core::{PanelController, SeriesSource};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::{PanelGrid, RouterList};
use crate::theme;
use crate::tui::Tui;
use crate::view::DashboardView;

const TICK_RATE: Duration = Duration::from_millis(250);
const RENDER_RATE: Duration = Duration::from_millis(33);
const ROUTER_LIST_WIDTH: u16 = 24;

/// Top-level application state and event loop.
pub struct App<S> {
    controller: PanelController<S>,
    router_list: RouterList,
    panel_grid: PanelGrid,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl<S: SeriesSource> App<S> {
    pub fn new(controller: PanelController<S>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            router_list: RouterList::default(),
            panel_grid: PanelGrid::default(),
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
        }
    }

    /// Run until the user quits. Stops every poll timer on the way out.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut events = EventReader::new(TICK_RATE, RENDER_RATE, self.controller.board().subscribe());
        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render | Event::BoardChanged => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    let view = DashboardView::capture(&self.controller);
                    tui.draw(|frame| self.render(frame, &view))?;
                }
            }
        }

        events.stop();
        self.controller.shutdown();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key to an action. Panel keys act on the selected router.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        let selected = self.controller.selected().cloned();
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (KeyModifiers::NONE, KeyCode::Char('q')) => {
                return Ok(Some(Action::Quit));
            }
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char('p')) => return Ok(selected.map(Action::Pause)),
            (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(selected.map(Action::Resume)),
            (KeyModifiers::NONE, KeyCode::Char('x')) => return Ok(selected.map(Action::Close)),
            (KeyModifiers::NONE, KeyCode::Char('f')) => return Ok(selected.map(Action::Refresh)),
            (KeyModifiers::NONE, KeyCode::Char('e')) => return Ok(Some(Action::ToggleExpand)),
            (KeyModifiers::NONE, KeyCode::Esc) if self.controller.expanded().is_some() => {
                return Ok(Some(Action::ToggleExpand));
            }
            _ => {}
        }

        let view = DashboardView::capture(&self.controller);
        self.router_list.handle_key_event(key, &view)
    }

    /// Apply one action to the controller or the components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        if !matches!(action, Action::Tick | Action::Render) {
            debug!("action: {action}");
        }

        match action {
            Action::Quit => self.running = false,
            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Select(router) => self.controller.select(router),
            Action::Pause(router) => {
                self.controller.pause(router);
            }
            Action::Resume(router) => {
                self.controller.resume(router);
            }
            Action::ToggleExpand => {
                if self.controller.expanded().is_some() {
                    self.controller.compress();
                } else {
                    self.controller.expand(None);
                }
            }
            Action::Close(router) => {
                self.controller.close(router);
            }
            Action::Refresh(router) => {
                self.controller.refresh(router);
            }

            Action::Resize(..) | Action::Render => {}

            Action::Tick | Action::CursorUp | Action::CursorDown => {
                let view = DashboardView::capture(&self.controller);
                for component in [
                    &mut self.router_list as &mut dyn Component,
                    &mut self.panel_grid,
                ] {
                    if let Some(follow_up) = component.update(action, &view)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame, view: &DashboardView) {
        let [content, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

        if view.expanded.is_some() {
            self.panel_grid.render(frame, content, view);
        } else {
            let [list, panels] = Layout::horizontal([
                Constraint::Length(ROUTER_LIST_WIDTH),
                Constraint::Min(1),
            ])
            .areas(content);
            self.router_list.render(frame, list, view);
            self.panel_grid.render(frame, panels, view);
        }

        render_status_bar(frame, status, view);

        if self.help_visible {
            render_help_overlay(frame, frame.area());
        }
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let mut spans = vec![Span::raw(" ")];
    match &view.selected {
        Some(router) => {
            spans.push(Span::styled(router.to_string(), theme::title_style()));
            spans.push(Span::styled(
                format!(" {}", view.state_of(router)),
                Style::default().fg(theme::DIM_WHITE),
            ));
        }
        None => spans.push(Span::styled("no router selected", theme::key_hint())),
    }
    spans.push(Span::styled(
        format!(
            " │ every {} │ ? help  q quit",
            humantime::format_duration(view.poll_interval)
        ),
        theme::key_hint(),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 44u16.min(area.width.saturating_sub(4));
    let height = 14u16.min(area.height.saturating_sub(2));
    let help_area = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, help_area);
    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let keys = [
        ("↑/↓ j/k", "Move in router list"),
        ("Enter", "Open / poll router"),
        ("p", "Pause selected panel"),
        ("r", "Resume selected panel"),
        ("e", "Expand / compress"),
        ("f", "Refresh now"),
        ("x", "Close selected panel"),
        ("?", "This help"),
        ("q", "Quit"),
    ];
    let mut lines = vec![Line::from("")];
    lines.extend(keys.iter().map(|(key, label)| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(*label, theme::key_hint()),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("        Esc or ? to close", theme::key_hint())));
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use routerwatch_api::{GraphPayload, UrlTemplate};
    use routerwatch_core::{ChartBoard, DashboardConfig, PanelState, RouterId};

    struct Offline;

    impl SeriesSource for Offline {
        fn fetch(
            &self,
            _router: &RouterId,
        ) -> impl Future<Output = Result<GraphPayload, routerwatch_api::Error>> + Send {
            async {
                Err(routerwatch_api::Error::Http {
                    status: 503,
                    message: "offline".into(),
                })
            }
        }
    }

    fn app() -> App<Offline> {
        let config = DashboardConfig::new(
            UrlTemplate::with_default_placeholder("http://localhost/graph/none").unwrap(),
        )
        .with_routers(vec![RouterId::new("R1").unwrap(), RouterId::new("R2").unwrap()]);
        App::new(PanelController::new(config, Offline, Arc::new(ChartBoard::new())))
    }

    fn press(app: &mut App<Offline>, code: KeyCode) -> Option<Action> {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn screen(app: &App<Offline>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let view = DashboardView::capture(&app.controller);
        terminal.draw(|frame| app.render(frame, &view)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn global_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(press(&mut app, KeyCode::Char('e')), Some(Action::ToggleExpand));
        // nothing selected yet
        assert_eq!(press(&mut app, KeyCode::Char('p')), None);
    }

    #[test]
    fn help_swallows_other_keys() {
        let mut app = app();
        app.process_action(&Action::ToggleHelp).unwrap();
        assert_eq!(press(&mut app, KeyCode::Char('q')), None);
        assert_eq!(press(&mut app, KeyCode::Esc), Some(Action::ToggleHelp));
    }

    #[tokio::test]
    async fn enter_pause_expand_flow() {
        let mut app = app();
        let r1 = RouterId::new("R1").unwrap();

        let select = press(&mut app, KeyCode::Enter).unwrap();
        assert_eq!(select, Action::Select(r1.clone()));
        app.process_action(&select).unwrap();
        assert_eq!(app.controller.state(&r1), Some(PanelState::Polling));

        let pause = press(&mut app, KeyCode::Char('p')).unwrap();
        assert_eq!(pause, Action::Pause(r1.clone()));
        app.process_action(&pause).unwrap();
        assert_eq!(app.controller.state(&r1), Some(PanelState::Paused));

        app.process_action(&Action::ToggleExpand).unwrap();
        assert_eq!(app.controller.expanded(), Some(&r1));
        let text = screen(&app);
        assert!(!text.contains("Routers"));
        assert!(text.contains("R1"));

        assert_eq!(press(&mut app, KeyCode::Esc), Some(Action::ToggleExpand));
        app.process_action(&Action::ToggleExpand).unwrap();
        assert_eq!(app.controller.expanded(), None);
        assert!(screen(&app).contains("Routers"));
    }

    #[tokio::test]
    async fn close_removes_panel() {
        let mut app = app();
        let r2 = RouterId::new("R2").unwrap();
        app.process_action(&Action::Select(r2.clone())).unwrap();
        app.process_action(&Action::Close(r2.clone())).unwrap();
        assert_eq!(app.controller.state(&r2), Some(PanelState::Closed));
        assert!(screen(&app).contains("Select a router and press Enter"));
    }
}
