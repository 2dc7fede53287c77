//! Action enum — all user-initiated intents.

use lofi_proto::protocol::SkipDirection;
use lofi_proto::track::{Track, TrackId};

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Header,
    Sidebar,
    Home,
    Search,
    LikedSongs,
    PlayerBar,
    QueueOverlay,
    HelpOverlay,
}

/// The three top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Search,
    LikedSongs,
}

impl View {
    pub const ALL: [View; 3] = [View::Home, View::Search, View::LikedSongs];

    pub fn label(self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Search => "Search",
            View::LikedSongs => "Liked Songs",
        }
    }

    /// The component that renders this view.
    pub fn component(self) -> ComponentId {
        match self {
            View::Home => ComponentId::Home,
            View::Search => ComponentId::Search,
            View::LikedSongs => ComponentId::LikedSongs,
        }
    }
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Playback ─────────────────────────────────────────────────────────────
    /// Play `track`, making `playlist` the list skips walk.
    PlayTrack { track: Track, playlist: Vec<Track> },
    PlayRandom,
    TogglePlay,
    SeekRelative(f64),
    Skip(SkipDirection),
    Volume(f32),
    ToggleShuffle,
    ToggleRepeat,

    // ── Library ──────────────────────────────────────────────────────────────
    ToggleLike(Track),
    RemoveLike(TrackId),

    // ── Search ───────────────────────────────────────────────────────────────
    /// Debounced query from the search box.
    Search(String),

    // ── Navigation ───────────────────────────────────────────────────────────
    SwitchView(View),
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleMini,
    ToggleQueue,
    ToggleHelp,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Resize(u16, u16),
}
