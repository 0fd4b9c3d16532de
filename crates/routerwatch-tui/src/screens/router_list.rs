//! Router list: pick a router and press Enter to open its panel.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState};

use routerwatch_core::PanelState;

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::view::DashboardView;

#[derive(Debug, Default)]
pub struct RouterList {
    cursor: usize,
}

impl RouterList {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

impl Component for RouterList {
    fn handle_key_event(&mut self, key: KeyEvent, view: &DashboardView) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
            KeyCode::Enter => view.routers.get(self.cursor).cloned().map(Action::Select),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action, view: &DashboardView) -> Result<Option<Action>> {
        match action {
            Action::CursorUp => self.cursor = self.cursor.saturating_sub(1),
            Action::CursorDown => self.cursor = self.cursor.saturating_add(1),
            _ => {}
        }
        self.clamp(view.routers.len());
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &DashboardView) {
        let items: Vec<ListItem> = view
            .routers
            .iter()
            .map(|router| {
                let (glyph, style) = match view.state_of(router) {
                    PanelState::Polling => ("●", Style::default().fg(theme::SUCCESS_GREEN)),
                    PanelState::Paused => ("‖", Style::default().fg(theme::ELECTRIC_YELLOW)),
                    PanelState::Idle | PanelState::Closed => ("○", theme::key_hint()),
                };
                let name_style = if view.selected.as_ref() == Some(router) {
                    theme::title_style()
                } else {
                    theme::list_row()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {glyph} "), style),
                    Span::styled(router.to_string(), name_style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(Span::styled(" Routers ", theme::title_style()))
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(theme::border_default()),
            )
            .highlight_style(theme::list_selected());

        let mut state = ListState::default().with_selected(
            (!view.routers.is_empty()).then_some(self.cursor.min(view.routers.len() - 1)),
        );
        frame.render_stateful_widget(list, area, &mut state);
    }
}
