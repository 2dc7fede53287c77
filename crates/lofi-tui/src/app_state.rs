//! AppState — shared read-only data passed to all components during render/event.
//!
//! Components read this for player and library state, but never mutate it.
//! The App event-loop is the only thing that writes to AppState.

use lofi_proto::protocol::PlayerState;
use lofi_proto::track::Track;

use crate::action::View;
use crate::layout::PlayerMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// A text box has the keyboard; single-letter shortcuts are off.
    Typing,
}

pub struct AppState {
    // ── Player ───────────────────────────────────────────────────────────────
    /// Latest snapshot published by the player core.
    pub player: PlayerState,
    pub player_mode: PlayerMode,

    // ── Library ──────────────────────────────────────────────────────────────
    pub favorites: Vec<Track>,
    pub home_tracks: Vec<Track>,
    /// Inline note under the Home list when it shows offline tracks.
    pub home_note: Option<String>,
    pub search_results: Vec<Track>,
    /// Query the current results belong to.
    pub search_query: String,
    pub searching: bool,
    /// Any fetch in flight.
    pub loading: bool,

    // ── UI ───────────────────────────────────────────────────────────────────
    pub view: View,
    pub input_mode: InputMode,
}

impl AppState {
    pub fn new(player: PlayerState, player_mode: PlayerMode, favorites: Vec<Track>) -> Self {
        Self {
            player,
            player_mode,
            favorites,
            home_tracks: Vec::new(),
            home_note: None,
            search_results: Vec::new(),
            search_query: String::new(),
            searching: false,
            loading: false,
            view: View::default(),
            input_mode: InputMode::default(),
        }
    }

    pub fn is_favorite(&self, track: &Track) -> bool {
        track.id.is_some() && self.favorites.iter().any(|f| f.id == track.id)
    }

    /// Whether `track` is the one loaded in the player.
    pub fn is_current(&self, track: &Track) -> bool {
        self.player
            .current
            .as_ref()
            .is_some_and(|current| current.same_as(track))
    }
}
