//! Liked Songs view.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::track_list::{ListOutcome, TrackList},
    theme::C_LIKED,
    widgets::pane_chrome::{pane_chrome, Badge},
};

pub const EMPTY_MESSAGE: &str = "You haven't liked any songs yet.";

pub struct LikedSongs {
    tracks: TrackList,
}

impl LikedSongs {
    pub fn new() -> Self {
        Self {
            tracks: TrackList::new(true),
        }
    }

    pub fn sync(&mut self, state: &AppState) {
        self.tracks.sync(&state.favorites);
    }

    pub fn is_typing(&self) -> bool {
        self.tracks.is_filtering()
    }

    fn activate(&self, outcome: ListOutcome) -> Vec<Action> {
        match outcome {
            // the favorites list is the playlist
            ListOutcome::Activate(track) => vec![Action::PlayTrack {
                track,
                playlist: self.tracks.tracks().to_vec(),
            }],
            _ => vec![],
        }
    }
}

impl Default for LikedSongs {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for LikedSongs {
    fn id(&self) -> ComponentId {
        ComponentId::LikedSongs
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match self.tracks.handle_key(key) {
            ListOutcome::Ignored => match key.code {
                KeyCode::Char('d') | KeyCode::Char('f') | KeyCode::Delete => self
                    .tracks
                    .selected()
                    .and_then(|t| t.id.clone())
                    .map(|id| vec![Action::RemoveLike(id)])
                    .unwrap_or_default(),
                _ => vec![],
            },
            other => self.activate(other),
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        let inner = pane_chrome("Liked Songs", Some('2'), false, None).inner(area);
        let outcome = self.tracks.handle_mouse(event, inner);
        self.activate(outcome)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = Some(Badge {
            text: format!("♥ {}", state.favorites.len()),
            color: C_LIKED,
        });
        let block = pane_chrome("Liked Songs", Some('2'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.tracks.draw(frame, inner, focused, EMPTY_MESSAGE, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PlayerMode;
    use lofi_proto::protocol::PlayerState;
    use lofi_proto::track::{Track, TrackId};
    use ratatui::crossterm::event::KeyModifiers;

    #[test]
    fn test_play_uses_favorites_as_playlist_and_delete_removes() {
        let favorites = vec![
            Track::new("A", "x").with_id(1i64),
            Track::new("B", "x").with_id(2i64),
        ];
        let state = AppState::new(PlayerState::new(0.8), PlayerMode::Full, favorites.clone());
        let mut view = LikedSongs::new();
        view.sync(&state);

        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);
        view.handle_key(press(KeyCode::Down), &state);
        let actions = view.handle_key(press(KeyCode::Enter), &state);
        let [Action::PlayTrack { track, playlist }] = actions.as_slice() else {
            panic!("expected play, got {:?}", actions);
        };
        assert_eq!(track.title, "B");
        assert_eq!(playlist, &favorites);

        let actions = view.handle_key(press(KeyCode::Char('d')), &state);
        assert!(matches!(actions.as_slice(), [Action::RemoveLike(TrackId::Num(2))]));
    }
}
