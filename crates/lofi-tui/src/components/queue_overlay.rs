//! QueueOverlay — popup listing the playlist with the current track marked.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use lofi_proto::track::position_of;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::help_overlay::centered_rect,
    theme::{C_MUTED, C_OVERLAY_BG, C_PANEL_BORDER_FOCUSED, C_PLAYING, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
    widgets::text::truncate,
};

pub const EMPTY_MESSAGE: &str = "No tracks in queue";

pub struct QueueOverlay {
    pub visible: bool,
    selected: usize,
    list_state: ListState,
}

impl QueueOverlay {
    pub fn new() -> Self {
        Self {
            visible: false,
            selected: 0,
            list_state: ListState::default(),
        }
    }

    fn open(&mut self, state: &AppState) {
        self.visible = true;
        self.selected = state.player.current_index().unwrap_or(0);
    }
}

impl Default for QueueOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for QueueOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::QueueOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        let playlist = &state.player.playlist;
        match key.code {
            KeyCode::Esc | KeyCode::Char('Q') | KeyCode::Char('q') => {
                return vec![Action::ToggleQueue];
            }
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(playlist.len().saturating_sub(1));
            }
            KeyCode::Enter => {
                if let Some(track) = playlist.get(self.selected) {
                    return vec![
                        Action::PlayTrack {
                            track: track.clone(),
                            playlist: playlist.clone(),
                        },
                        Action::ToggleQueue,
                    ];
                }
            }
            _ => {}
        }
        // consume everything else while open
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        if let Action::ToggleQueue = action {
            if self.visible {
                self.visible = false;
            } else {
                self.open(state);
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !self.visible {
            return;
        }
        let playlist = &state.player.playlist;
        let height = (playlist.len() as u16 + 2).clamp(5, area.height.saturating_sub(4).max(5));
        let popup = centered_rect(60, height, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(C_PANEL_BORDER_FOCUSED))
            .title(Span::styled(
                format!(" Queue ({}) ", playlist.len()),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(C_OVERLAY_BG));
        let inner = block.inner(popup);
        frame.render_widget(Clear, popup);
        frame.render_widget(block, popup);

        if playlist.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {}", EMPTY_MESSAGE),
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }

        let current = state
            .player
            .current
            .as_ref()
            .and_then(|c| position_of(playlist, c));
        let width = inner.width.saturating_sub(6) as usize;
        let items: Vec<ListItem> = playlist
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let is_current = current == Some(i);
                let (marker, style) = if is_current {
                    (
                        "▶",
                        Style::default().fg(C_PLAYING).add_modifier(Modifier::BOLD),
                    )
                } else {
                    (" ", Style::default().fg(C_SECONDARY))
                };
                let line = Line::from(vec![
                    Span::styled(format!(" {} ", marker), Style::default().fg(C_PLAYING)),
                    Span::styled(truncate(&track.label(), width), style),
                ]);
                ListItem::new(line)
            })
            .collect();

        self.selected = self.selected.min(playlist.len() - 1);
        self.list_state.select(Some(self.selected));
        let list = List::new(items).highlight_style(Style::default().bg(C_SELECTION_BG));
        frame.render_stateful_widget(list, inner, &mut self.list_state);
    }
}
