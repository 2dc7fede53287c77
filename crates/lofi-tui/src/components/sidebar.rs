//! Sidebar — view navigation.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId, View},
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_LIKED, C_MUTED, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
    widgets::pane_chrome::pane_chrome,
};

pub struct Sidebar {
    selected: usize,
}

impl Sidebar {
    pub fn new() -> Self {
        Self { selected: 0 }
    }

    fn selected_view(&self) -> View {
        View::ALL[self.selected.min(View::ALL.len() - 1)]
    }
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Sidebar {
    fn id(&self) -> ComponentId {
        ComponentId::Sidebar
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                vec![Action::SwitchView(self.selected_view())]
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(View::ALL.len() - 1);
                vec![Action::SwitchView(self.selected_view())]
            }
            KeyCode::Enter => vec![
                Action::SwitchView(self.selected_view()),
                Action::FocusPane(self.selected_view().component()),
            ],
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        let row = event.row.saturating_sub(area.y + 1) as usize;
        match View::ALL.get(row) {
            Some(&view) => {
                self.selected = row;
                vec![Action::SwitchView(view)]
            }
            None => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::SwitchView(view) = action {
            if let Some(pos) = View::ALL.iter().position(|v| v == view) {
                self.selected = pos;
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome("Library", Some('1'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = View::ALL
            .iter()
            .map(|&view| {
                let active = view == state.view;
                let marker = if active { "▌" } else { " " };
                let label_style = if active {
                    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(C_SECONDARY)
                };
                let mut spans = vec![
                    Span::styled(marker, Style::default().fg(C_ACCENT)),
                    Span::styled(format!(" {}", view.label()), label_style),
                ];
                if view == View::LikedSongs {
                    spans.push(Span::styled(
                        format!(" ♥ {}", state.favorites.len()),
                        Style::default().fg(if state.favorites.is_empty() {
                            C_MUTED
                        } else {
                            C_LIKED
                        }),
                    ));
                }
                let line = Line::from(spans);
                if active && focused {
                    line.style(Style::default().bg(C_SELECTION_BG))
                } else {
                    line
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PlayerMode;
    use lofi_proto::protocol::PlayerState;
    use ratatui::crossterm::event::KeyModifiers;

    #[test]
    fn test_moving_selection_switches_view() {
        let state = AppState::new(PlayerState::new(0.8), PlayerMode::Full, Vec::new());
        let mut sidebar = Sidebar::new();
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        let actions = sidebar.handle_key(down, &state);
        assert!(matches!(actions.as_slice(), [Action::SwitchView(View::Search)]));
        sidebar.handle_key(down, &state);
        let actions = sidebar.handle_key(down, &state);
        assert!(matches!(actions.as_slice(), [Action::SwitchView(View::LikedSongs)]));

        sidebar.on_action(&Action::SwitchView(View::Home), &state);
        let actions = sidebar.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &state);
        assert!(matches!(
            actions.as_slice(),
            [Action::SwitchView(View::Home), Action::FocusPane(ComponentId::Home)]
        ));
    }
}
