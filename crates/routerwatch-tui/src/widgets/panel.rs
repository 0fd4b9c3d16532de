//! One router panel: chart (or spinner / error) plus a control footer.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use throbber_widgets_tui::{Throbber, ThrobberState};

use routerwatch_core::clock::last_sync_label;
use routerwatch_core::{ContainerContent, Controls, PanelState};

use crate::theme;
use crate::view::PanelView;
use crate::widgets::chart::render_chart;

pub fn render_panel(
    frame: &mut Frame,
    area: Rect,
    panel: &PanelView,
    throbber: &ThrobberState,
    focused: bool,
) {
    let [body, footer] = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

    let title = match panel.container.as_deref().map(|c| &c.content) {
        Some(ContainerContent::Chart(spec)) => spec.layout.title.clone(),
        _ => panel.router.to_string(),
    };
    let block = Block::default()
        .title(Line::from(vec![
            Span::styled(format!(" {title} "), theme::title_style()),
            state_badge(panel.state),
        ]))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        });

    match panel.container.as_deref().map(|c| &c.content) {
        Some(ContainerContent::Chart(spec)) => render_chart(frame, body, spec, block),
        Some(ContainerContent::Error { message }) => {
            let inner = block.inner(body);
            frame.render_widget(block, body);
            let [_, row, _] = Layout::vertical([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .areas(inner);
            frame.render_widget(
                Paragraph::new(message.as_str())
                    .style(theme::error_text())
                    .alignment(Alignment::Center),
                row,
            );
        }
        Some(ContainerContent::Loading { label }) => {
            render_loading(frame, body, block, label, throbber);
        }
        None => render_loading(frame, body, block, "", throbber),
    }

    frame.render_widget(Paragraph::new(controls_line(&panel.controls)), footer);
}

fn render_loading(frame: &mut Frame, area: Rect, block: Block<'_>, label: &str, state: &ThrobberState) {
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let [_, row, _] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(inner);

    let throbber = Throbber::default()
        .label(format!(" {label}"))
        .style(Style::default().fg(theme::NEON_CYAN))
        .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
    frame.render_stateful_widget(throbber, row, &mut state.clone());
}

fn state_badge(state: PanelState) -> Span<'static> {
    match state {
        PanelState::Polling => Span::styled("● polling ", Style::default().fg(theme::SUCCESS_GREEN)),
        PanelState::Paused => Span::styled("‖ paused ", Style::default().fg(theme::ELECTRIC_YELLOW)),
        PanelState::Idle => Span::styled("○ idle ", theme::key_hint()),
        PanelState::Closed => Span::styled("× closed ", Style::default().fg(theme::ERROR_RED)),
    }
}

/// Footer: last sync stamp and the keys that apply right now.
pub fn controls_line(controls: &Controls) -> Line<'static> {
    let mut spans = Vec::new();
    if let Some(stamp) = &controls.last_sync {
        spans.push(Span::styled(format!(" {} ", last_sync_label(stamp)), theme::key_hint()));
    }
    let hints = [
        (controls.pause, "p", "pause"),
        (controls.resume, "r", "resume"),
        (controls.expand, "e", "expand"),
        (controls.compress, "e", "compress"),
    ];
    for (_, key, label) in hints.into_iter().filter(|(shown, _, _)| *shown) {
        spans.push(Span::styled(format!(" {key} "), theme::key_hint_key()));
        spans.push(Span::styled(label, theme::key_hint()));
    }
    Line::from(spans)
}
