//! Panel area: every open panel in a grid, or one panel across the whole
//! area while expanded.

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;
use throbber_widgets_tui::ThrobberState;

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::view::{DashboardView, PanelView};
use crate::widgets::panel::render_panel;

#[derive(Default)]
pub struct PanelGrid {
    throbber_state: ThrobberState,
}

impl PanelGrid {
    fn render_one(&self, frame: &mut Frame, area: Rect, panel: &PanelView, view: &DashboardView) {
        let focused = view.selected.as_ref() == Some(&panel.router);
        render_panel(frame, area, panel, &self.throbber_state, focused);
    }
}

impl Component for PanelGrid {
    fn update(&mut self, action: &Action, _view: &DashboardView) -> Result<Option<Action>> {
        if matches!(action, Action::Tick) {
            self.throbber_state.calc_next();
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &DashboardView) {
        if let Some(panel) = view.expanded.as_ref().and_then(|r| view.panel(r)) {
            self.render_one(frame, area, panel, view);
            return;
        }

        if view.panels.is_empty() {
            frame.render_widget(
                Paragraph::new("Select a router and press Enter")
                    .style(theme::key_hint())
                    .alignment(Alignment::Center),
                area,
            );
            return;
        }

        let (cols, rows) = grid_shape(view.panels.len());
        let row_areas = Layout::vertical(vec![Constraint::Fill(1); rows]).split(area);
        for (row_area, chunk) in row_areas.iter().zip(view.panels.chunks(cols)) {
            let cells = Layout::horizontal(vec![Constraint::Fill(1); cols]).split(*row_area);
            for (cell, panel) in cells.iter().zip(chunk) {
                self.render_one(frame, *cell, panel, view);
            }
        }
    }
}

/// Columns and rows for `n` panels: as square as possible, wider than tall.
fn grid_shape(n: usize) -> (usize, usize) {
    let mut cols = 1;
    while cols * cols < n {
        cols += 1;
    }
    (cols, n.div_ceil(cols))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn grid_is_roughly_square() {
        assert_eq!(grid_shape(1), (1, 1));
        assert_eq!(grid_shape(2), (2, 1));
        assert_eq!(grid_shape(3), (2, 2));
        assert_eq!(grid_shape(5), (3, 2));
        assert_eq!(grid_shape(9), (3, 3));
    }
}
