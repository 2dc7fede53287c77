//! Search view — query box plus results.  Typing is debounced; the query is
//! sent once the text has been still for the configured delay.

use std::time::{Duration, Instant};

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};

use crate::{
    action::{Action, ComponentId, View},
    app_state::AppState,
    component::Component,
    components::track_list::{ListOutcome, TrackList},
    theme::C_ACCENT,
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::{pane_chrome, Badge},
    },
};

pub struct SearchView {
    input: FilterInput,
    results: TrackList,
    debounce: Duration,
    /// Latest text and when it was typed, until it is sent.
    pending: Option<(String, Instant)>,
}

impl SearchView {
    pub fn new(debounce: Duration) -> Self {
        Self {
            input: FilterInput::new("search: ", "songs, artists…"),
            results: TrackList::new(false),
            debounce,
            pending: None,
        }
    }

    pub fn sync(&mut self, state: &AppState) {
        self.results.sync(&state.search_results);
    }

    pub fn is_typing(&self) -> bool {
        self.input.is_active()
    }

    fn query_changed(&mut self, query: String, now: Instant) {
        self.pending = Some((query, now));
    }

    /// The query to send, once it has been still for the debounce delay.
    pub fn poll_debounce(&mut self, now: Instant) -> Option<String> {
        let (_, typed_at) = self.pending.as_ref()?;
        if now.duration_since(*typed_at) < self.debounce {
            return None;
        }
        self.pending.take().map(|(query, _)| query)
    }

    /// Send whatever is pending right away.
    fn flush(&mut self) -> Vec<Action> {
        self.pending
            .take()
            .map(|(query, _)| vec![Action::Search(query)])
            .unwrap_or_default()
    }

    fn leave_input(&mut self) -> Vec<Action> {
        self.input.deactivate();
        self.results.select_first();
        self.flush()
    }

    fn results_title(state: &AppState) -> String {
        if state.search_query.is_empty() {
            "Results".to_string()
        } else {
            format!("Results for \"{}\"", state.search_query)
        }
    }

    fn empty_message(state: &AppState) -> String {
        if state.searching {
            "Searching…".to_string()
        } else if state.search_query.is_empty() {
            "Type to search for tracks".to_string()
        } else {
            format!("No results for \"{}\"", state.search_query)
        }
    }
}

impl Component for SearchView {
    fn id(&self) -> ComponentId {
        ComponentId::Search
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        if self.input.is_active() {
            if key.code == KeyCode::Down {
                return self.leave_input();
            }
            return match self.input.handle_key(key) {
                FilterAction::Changed(q) => {
                    self.query_changed(q, Instant::now());
                    vec![]
                }
                FilterAction::Confirmed => {
                    self.input.deactivate();
                    self.results.select_first();
                    // Enter sends immediately, even an unchanged query
                    self.pending = None;
                    vec![Action::Search(self.input.text().to_string())]
                }
                FilterAction::Cancelled => self.flush(),
                FilterAction::None => vec![],
            };
        }

        match self.results.handle_key(key) {
            ListOutcome::Activate(track) => vec![Action::PlayTrack {
                track,
                playlist: self.results.tracks().to_vec(),
            }],
            ListOutcome::Ignored => match key.code {
                KeyCode::Char('/') | KeyCode::Char('i') => {
                    self.input.activate();
                    vec![]
                }
                KeyCode::Char('f') => self
                    .results
                    .selected()
                    .map(|t| vec![Action::ToggleLike(t.clone())])
                    .unwrap_or_default(),
                _ => vec![],
            },
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        let [input_area, list_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
        if event.row < input_area.y + input_area.height {
            self.input.activate();
            return vec![];
        }
        let inner = pane_chrome("", None, false, None).inner(list_area);
        match self.results.handle_mouse(event, inner) {
            ListOutcome::Activate(track) => vec![Action::PlayTrack {
                track,
                playlist: self.results.tracks().to_vec(),
            }],
            _ => vec![],
        }
    }

    fn tick(&mut self, _state: &AppState) -> Vec<Action> {
        self.poll_debounce(Instant::now())
            .map(|query| vec![Action::Search(query)])
            .unwrap_or_default()
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::SwitchView(View::Search) = action {
            self.input.activate();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let [input_area, list_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

        let typing = focused && self.input.is_active();
        let input_block = pane_chrome("Search", Some('2'), typing, None);
        let input_inner = input_block.inner(input_area);
        frame.render_widget(input_block, input_area);
        self.input.draw(frame, input_inner);

        let title = Self::results_title(state);
        let badge = (!state.search_results.is_empty()).then(|| Badge {
            text: state.search_results.len().to_string(),
            color: C_ACCENT,
        });
        let block = pane_chrome(&title, None, focused && !typing, badge);
        let inner = block.inner(list_area);
        frame.render_widget(block, list_area);
        let empty = Self::empty_message(state);
        self.results
            .draw(frame, inner, focused && !typing, &empty, state);
    }
}
