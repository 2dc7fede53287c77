//! TrackList — the selectable track table shared by Home, Search and Liked
//! Songs.  Owns selection, scrolling, the optional `/` filter and row
//! rendering; the owning view turns its outcomes into actions.

use std::time::Instant;

use lofi_proto::protocol::PlaybackStatus;
use lofi_proto::track::Track;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::app_state::AppState;
use crate::theme::{C_LIKED, C_MUTED, C_PAUSED, C_PLAYING, C_PRIMARY, C_SECONDARY, C_SELECTION_BG};
use crate::widgets::{
    filter_input::{FilterAction, FilterInput},
    scrollable_list::ScrollableList,
    text::fit,
};

/// What a key or click did to the list.
#[derive(Debug, PartialEq)]
pub enum ListOutcome {
    /// Consumed; nothing for the owner to do.
    Handled,
    /// The owner may handle the key itself.
    Ignored,
    /// Enter or double-click on a row.
    Activate(Track),
    FilterOpened,
    FilterClosed,
}

pub struct TrackList {
    list: ScrollableList<Track>,
    filter_input: FilterInput,
    filterable: bool,
    last_click: Option<(usize, Instant)>,
}

fn track_matches(track: &Track, query: &str) -> bool {
    let q = query.to_lowercase();
    track.title.to_lowercase().contains(&q) || track.artist.to_lowercase().contains(&q)
}

impl TrackList {
    pub fn new(filterable: bool) -> Self {
        Self {
            list: ScrollableList::new(track_matches),
            filter_input: FilterInput::new("/ ", "filter..."),
            filterable,
            last_click: None,
        }
    }

    /// Replace the rows, keeping the selected track selected when it is still listed.
    pub fn sync(&mut self, tracks: &[Track]) {
        let selected = self.list.selected_item().cloned();
        self.list.set_items(tracks.to_vec());
        if let Some(sel) = selected {
            self.list.select_where(|t| t.same_as(&sel));
        }
    }

    /// Every listed track in order, unfiltered.  Used as the playlist.
    pub fn tracks(&self) -> &[Track] {
        &self.list.items
    }

    pub fn selected(&self) -> Option<&Track> {
        self.list.selected_item()
    }

    pub fn is_filtering(&self) -> bool {
        self.filter_input.is_active()
    }

    pub fn select_first(&mut self) {
        self.list.select_first();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ListOutcome {
        if self.filter_input.is_active() {
            match key.code {
                KeyCode::Up => {
                    self.list.select_up(1);
                    return ListOutcome::Handled;
                }
                KeyCode::Down => {
                    self.list.select_down(1);
                    return ListOutcome::Handled;
                }
                _ => {}
            }
            return match self.filter_input.handle_key(key) {
                FilterAction::Changed(q) => {
                    self.list.set_filter(&q);
                    ListOutcome::Handled
                }
                FilterAction::Confirmed => ListOutcome::FilterClosed,
                FilterAction::Cancelled => {
                    self.list.set_filter("");
                    ListOutcome::FilterClosed
                }
                FilterAction::None => ListOutcome::Handled,
            };
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter => {
                return match self.list.selected_item() {
                    Some(track) => ListOutcome::Activate(track.clone()),
                    None => ListOutcome::Handled,
                };
            }
            KeyCode::Char('/') if self.filterable => {
                self.filter_input.activate();
                return ListOutcome::FilterOpened;
            }
            _ => return ListOutcome::Ignored,
        }
        ListOutcome::Handled
    }

    /// `area` is the list's inner area (inside any borders).
    pub fn handle_mouse(&mut self, event: MouseEvent, area: Rect) -> ListOutcome {
        let rel_row = event.row.saturating_sub(area.y) as usize;
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let now = Instant::now();
                let is_double = self
                    .last_click
                    .is_some_and(|(row, t)| row == rel_row && t.elapsed().as_millis() < 400);
                if !self.list.handle_click(rel_row) {
                    self.last_click = None;
                    return ListOutcome::Handled;
                }
                if is_double {
                    self.last_click = None;
                    if let Some(track) = self.list.selected_item() {
                        return ListOutcome::Activate(track.clone());
                    }
                } else {
                    self.last_click = Some((rel_row, now));
                }
            }
            _ => return ListOutcome::Ignored,
        }
        ListOutcome::Handled
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, empty_message: &str, state: &AppState) {
        if area.height == 0 {
            return;
        }
        let filter_h = u16::from(self.filter_input.is_active());
        let list_area = Rect {
            height: area.height - filter_h,
            ..area
        };

        if self.list.is_empty() {
            let msg = if self.list.total_len() > 0 {
                "no tracks match filter"
            } else {
                empty_message
            };
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {}", msg), Style::default().fg(C_MUTED))),
                list_area,
            );
        } else {
            let height = list_area.height as usize;
            self.list.ensure_visible(height);
            let selected_row = self.list.selected_in_view();
            let width = list_area.width as usize;
            let items: Vec<ListItem> = self
                .list
                .visible_items(height)
                .into_iter()
                .enumerate()
                .map(|(row, (idx, track))| {
                    render_row(track, idx, row == selected_row, focused, width, state)
                })
                .collect();
            frame.render_widget(List::new(items), list_area);
        }

        if self.filter_input.is_active() {
            let filter_area = Rect {
                y: area.y + area.height - 1,
                height: 1,
                ..area
            };
            self.filter_input.draw(frame, filter_area);
        }
    }
}

/// `  3  ▶ Title                  Artist            ♥  3:20`
fn render_row<'a>(
    track: &Track,
    idx: usize,
    selected: bool,
    focused: bool,
    width: usize,
    state: &AppState,
) -> ListItem<'a> {
    let is_current = state.is_current(track);
    let (marker, marker_color) = match (is_current, state.player.status) {
        (true, PlaybackStatus::Playing) => ("▶", C_PLAYING),
        (true, _) => ("⏸", C_PAUSED),
        (false, _) => (" ", C_MUTED),
    };
    let heart = if state.is_favorite(track) { "♥" } else { " " };
    let duration = track.duration.as_deref().unwrap_or("");

    // fixed columns: number 5, marker 2, heart 3, duration 7
    let flexible = width.saturating_sub(17);
    let title_w = flexible * 3 / 5;
    let artist_w = flexible - title_w;

    let title_color = if is_current {
        marker_color
    } else if selected {
        C_PRIMARY
    } else {
        C_SECONDARY
    };
    let mut title_style = Style::default().fg(title_color);
    if is_current || (selected && focused) {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }

    let line = Line::from(vec![
        Span::styled(format!("{:>4} ", idx + 1), Style::default().fg(C_MUTED)),
        Span::styled(format!("{} ", marker), Style::default().fg(marker_color)),
        Span::styled(fit(&track.title, title_w), title_style),
        Span::styled(fit(&track.artist, artist_w), Style::default().fg(C_SECONDARY)),
        Span::styled(format!(" {} ", heart), Style::default().fg(C_LIKED)),
        Span::styled(format!("{:>6} ", fit(duration, 6).trim_end()), Style::default().fg(C_MUTED)),
    ]);

    let item = ListItem::new(line);
    if selected {
        item.style(Style::default().bg(C_SELECTION_BG))
    } else {
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn tracks() -> Vec<Track> {
        vec![
            Track::new("Rainy Window", "Kyoto Loops").with_id(1i64),
            Track::new("Coffee Steam", "Cozy Beats").with_id(2i64),
            Track::new("Night Train", "Kyoto Loops").with_id(3i64),
        ]
    }

    #[test]
    fn test_enter_activates_selected_track() {
        let mut list = TrackList::new(false);
        list.sync(&tracks());
        assert_eq!(list.handle_key(key(KeyCode::Down)), ListOutcome::Handled);
        let ListOutcome::Activate(track) = list.handle_key(key(KeyCode::Enter)) else {
            panic!("expected activation");
        };
        assert_eq!(track.title, "Coffee Steam");
        // not filterable: '/' is left to the owner
        assert_eq!(list.handle_key(key(KeyCode::Char('/'))), ListOutcome::Ignored);
    }

    #[test]
    fn test_filter_by_artist() {
        let mut list = TrackList::new(true);
        list.sync(&tracks());
        assert_eq!(list.handle_key(key(KeyCode::Char('/'))), ListOutcome::FilterOpened);
        for c in "cozy".chars() {
            list.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(list.selected().map(|t| t.title.as_str()), Some("Coffee Steam"));
        // the playlist is never filtered
        assert_eq!(list.tracks().len(), 3);
        assert_eq!(list.handle_key(key(KeyCode::Enter)), ListOutcome::FilterClosed);
        assert!(!list.is_filtering());
    }

    #[test]
    fn test_sync_keeps_selected_track() {
        let mut list = TrackList::new(false);
        list.sync(&tracks());
        list.handle_key(key(KeyCode::End));
        let mut reordered = tracks();
        reordered.reverse();
        list.sync(&reordered);
        assert_eq!(list.selected().map(|t| t.title.as_str()), Some("Night Train"));
    }
}
