//! Header — app name, view tabs and the loading indicator.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId, View},
    app_state::AppState,
    component::Component,
    theme::{style_accent, C_ACCENT, C_MUTED, C_PRIMARY, C_SECONDARY},
};

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct Header {
    frame: usize,
}

impl Header {
    pub fn new() -> Self {
        Self { frame: 0 }
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Header {
    fn id(&self) -> ComponentId {
        ComponentId::Header
    }

    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn tick(&mut self, state: &AppState) -> Vec<Action> {
        if state.loading {
            self.frame = (self.frame + 1) % SPINNER.len();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        let [left, right] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(24)]).areas(area);

        let mut spans = vec![Span::styled(" ♪ lofichill ", style_accent()), Span::raw("  ")];
        for view in View::ALL {
            let style = if view == state.view {
                Style::default()
                    .fg(C_PRIMARY)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(C_SECONDARY)
            };
            spans.push(Span::styled(view.label(), style));
            spans.push(Span::styled("  ·  ", Style::default().fg(C_MUTED)));
        }
        spans.pop();
        frame.render_widget(Paragraph::new(Line::from(spans)), left);

        let mut status = Vec::new();
        if state.loading {
            status.push(Span::styled(
                format!("{} loading ", SPINNER[self.frame]),
                Style::default().fg(C_ACCENT),
            ));
        }
        status.push(Span::styled("? help ", Style::default().fg(C_MUTED)));
        frame.render_widget(
            Paragraph::new(Line::from(status)).right_aligned(),
            right,
        );
    }
}
