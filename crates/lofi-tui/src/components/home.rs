//! Home view — the "Trending" list.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Span,
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::track_list::{ListOutcome, TrackList},
    theme::{C_ACCENT, C_TOAST_WARNING},
    widgets::pane_chrome::{pane_chrome, Badge},
};

pub struct Home {
    tracks: TrackList,
}

impl Home {
    pub fn new() -> Self {
        Self {
            tracks: TrackList::new(true),
        }
    }

    pub fn sync(&mut self, state: &AppState) {
        self.tracks.sync(&state.home_tracks);
    }

    pub fn is_typing(&self) -> bool {
        self.tracks.is_filtering()
    }

    fn outcome_actions(&self, outcome: ListOutcome) -> Vec<Action> {
        match outcome {
            ListOutcome::Activate(track) => vec![Action::PlayTrack {
                track,
                playlist: self.tracks.tracks().to_vec(),
            }],
            _ => vec![],
        }
    }
}

impl Default for Home {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Home {
    fn id(&self) -> ComponentId {
        ComponentId::Home
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match self.tracks.handle_key(key) {
            ListOutcome::Ignored => match key.code {
                KeyCode::Char('f') => self
                    .tracks
                    .selected()
                    .map(|t| vec![Action::ToggleLike(t.clone())])
                    .unwrap_or_default(),
                _ => vec![],
            },
            other => self.outcome_actions(other),
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        let mut inner = pane_chrome("Trending", Some('2'), false, None).inner(area);
        if state.home_note.is_some() {
            inner.y += 1;
            inner.height = inner.height.saturating_sub(1);
        }
        let outcome = self.tracks.handle_mouse(event, inner);
        self.outcome_actions(outcome)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let text = if state.loading && state.home_tracks.is_empty() {
            "loading…".to_string()
        } else {
            state.home_tracks.len().to_string()
        };
        let badge = Some(Badge {
            text,
            color: C_ACCENT,
        });
        let block = pane_chrome("Trending", Some('2'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let list_area = match &state.home_note {
            Some(note) => {
                let [note_area, rest] =
                    Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!("  {}", note),
                        Style::default().fg(C_TOAST_WARNING),
                    )),
                    note_area,
                );
                rest
            }
            None => inner,
        };

        let empty = if state.loading {
            "loading tracks…"
        } else {
            "no tracks available"
        };
        self.tracks.draw(frame, list_area, focused, empty, state);
    }
}
