//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks:
//!   terminal input, player broadcasts and finished track queries.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Player commands flow out through `core_tx`.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{self as term, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use lofi_proto::config::Config;
use lofi_proto::favorites::Favorites;
use lofi_proto::gateway::TrackGateway;
use lofi_proto::protocol::{PlayerCommand, PlayerState, SkipDirection};
use lofi_proto::session::Session;
use lofi_proto::track::Track;

use crate::core::{CoreEvent, SharedPlayerState};
use crate::tracks::{Concern, LoadState, QueryEvent, QueryOutcome, TrackQuery};
use crate::BroadcastMessage;

use crate::{
    action::{Action, ComponentId, View},
    app_state::{AppState, InputMode},
    component::Component,
    components::{
        header::Header, help_overlay::HelpOverlay, home::Home, liked_songs::LikedSongs,
        player_bar::PlayerBar, queue_overlay::QueueOverlay, search::SearchView, sidebar::Sidebar,
    },
    focus::FocusRing,
    layout::LayoutState,
    widgets::toast::ToastManager,
};

const SIDEBAR_WIDTH: u16 = 22;
const SIDEBAR_WIDTH_MINI: u16 = 16;

// ── Internal messages ─────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum AppMessage {
    /// A crossterm input event.
    Event(Event),
    /// Fresh player snapshot.
    StateUpdated(PlayerState),
    /// The player wants this track next (skip or end of track).
    TrackChangeRequested(Track),
    Log(String),
    /// A track query finished.
    Query(QueryOutcome),
}

/// Rects of the last frame, for mouse hit-testing.
#[derive(Debug, Clone, Copy, Default)]
struct PaneAreas {
    sidebar: Rect,
    content: Rect,
    player_bar: Rect,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    // Components
    header: Header,
    sidebar: Sidebar,
    home: Home,
    search: SearchView,
    liked: LikedSongs,
    player_bar: PlayerBar,
    queue_overlay: QueueOverlay,
    help_overlay: HelpOverlay,

    state: AppState,
    query: TrackQuery<TrackGateway>,
    /// Taken by `run`, which forwards outcomes into the message channel.
    query_rx: Option<mpsc::Receiver<QueryOutcome>>,
    favorites: Favorites,
    session: Session,

    core_tx: mpsc::Sender<CoreEvent>,
    player_state: SharedPlayerState,

    layout: LayoutState,
    focus: FocusRing,
    toast: ToastManager,
    stream_spinner: bool,
    pane_areas: PaneAreas,

    seek_step: f64,
    volume_step: f32,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: &Config,
        gateway: TrackGateway,
        fallback: Vec<Track>,
        favorites: Favorites,
        session: Session,
        core_tx: mpsc::Sender<CoreEvent>,
        player_state: SharedPlayerState,
    ) -> Self {
        let width = term::size()
            .map(|(w, _)| w)
            .unwrap_or(config.ui.mini_breakpoint_cols);
        let layout = LayoutState::new(config.ui.mini_breakpoint_cols, width);
        let (query_tx, query_rx) = mpsc::channel::<QueryOutcome>(64);

        let mut state = AppState::new(
            PlayerState::new(config.player.default_volume),
            layout.mode(),
            favorites.load(),
        );
        let query = TrackQuery::new(gateway, fallback, query_tx);
        state.home_tracks = query.home_tracks().to_vec();

        let mut focus = FocusRing::new(vec![ComponentId::Sidebar, View::Home.component()]);
        focus.set(View::Home.component());

        let mut app = Self {
            header: Header::new(),
            sidebar: Sidebar::new(),
            home: Home::new(),
            search: SearchView::new(Duration::from_millis(config.ui.search_debounce_ms)),
            liked: LikedSongs::new(),
            player_bar: PlayerBar::new(),
            queue_overlay: QueueOverlay::new(),
            help_overlay: HelpOverlay::new(),
            state,
            query,
            query_rx: Some(query_rx),
            favorites,
            session,
            core_tx,
            player_state,
            layout,
            focus,
            toast: ToastManager::new(),
            stream_spinner: false,
            pane_areas: PaneAreas::default(),
            seek_step: config.player.seek_step_secs,
            volume_step: config.player.volume_step,
            should_quit: false,
        };
        app.home.sync(&app.state);
        app.liked.sync(&app.state);
        app
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self, mut broadcast_rx: broadcast::Receiver<BroadcastMessage>) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Background task: broadcast receiver (PlayerCore → AppMessage) ─────
        let bc_tx = tx.clone();
        let bc_state = self.player_state.clone();
        tokio::spawn(async move {
            loop {
                match broadcast_rx.recv().await {
                    Ok(msg) => {
                        let app_msg = match msg {
                            BroadcastMessage::StateUpdated => {
                                let state = bc_state.read().await.clone();
                                AppMessage::StateUpdated(state)
                            }
                            BroadcastMessage::TrackChangeRequested(track) => {
                                AppMessage::TrackChangeRequested(track)
                            }
                            BroadcastMessage::Log(s) => AppMessage::Log(s),
                        };
                        if bc_tx.send(app_msg).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("broadcast receiver lagged by {} messages", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        // ── Background task: query outcomes → AppMessage ──────────────────────
        if let Some(mut query_rx) = self.query_rx.take() {
            let q_tx = tx.clone();
            tokio::spawn(async move {
                while let Some(outcome) = query_rx.recv().await {
                    if q_tx.send(AppMessage::Query(outcome)).await.is_err() {
                        break;
                    }
                }
            });
        }

        // ── Initial load ──────────────────────────────────────────────────────
        self.query.load_trending();
        self.resume_session().await;
        self.sync_query();

        // Toast expiry check + spinner animation
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Component maintenance tick (search debounce, header spinner).
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    const MAX_DRAIN: usize = 256;
                    self.handle_message(msg).await;
                    let mut drained = 0usize;
                    while drained < MAX_DRAIN {
                        let Ok(next) = rx.try_recv() else { break };
                        drained += 1;
                        self.handle_message(next).await;
                    }
                    needs_redraw = true;
                }

                _ = ui_tick.tick() => {
                    let tick_actions: Vec<Action> = {
                        let s = &self.state;
                        let mut all = Vec::new();
                        all.extend(self.header.tick(s));
                        all.extend(self.search.tick(s));
                        all
                    };
                    for action in tick_actions {
                        self.dispatch(action).await;
                    }
                    needs_redraw = true;
                }

                _ = toast_tick.tick() => {
                    if !self.toast.is_empty() {
                        self.toast.tick();
                        needs_redraw = true;
                    }
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        info!("lofichill: leaving UI");
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// Reload the last track at its saved position.
    async fn resume_session(&mut self) {
        let Some(track) = self.session.load_current_track() else {
            return;
        };
        let resume_at = self.session.load_progress();
        info!(
            "resuming {} at {:.1}s",
            track.label(),
            resume_at.unwrap_or(0.0)
        );
        let events = self.query.change_track(track, resume_at);
        self.apply_query_events(events).await;
    }

    // ── Message handler ───────────────────────────────────────────────────────

    async fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return;
                    }
                    let actions = self.handle_key(key);
                    for a in actions {
                        self.dispatch(a).await;
                    }
                    // text boxes open and close without emitting actions
                    self.sync_input_mode();
                }
                Event::Mouse(mouse) => {
                    let actions = self.handle_mouse(mouse);
                    for a in actions {
                        self.dispatch(a).await;
                    }
                    self.sync_input_mode();
                }
                Event::Resize(w, h) => {
                    self.dispatch(Action::Resize(w, h)).await;
                }
                _ => {}
            },

            AppMessage::StateUpdated(player) => {
                if player.rev >= self.state.player.rev {
                    self.state.player = player;
                }
            }

            AppMessage::TrackChangeRequested(track) => {
                debug!("track change requested: {}", track.label());
                let events = self.query.change_track(track, None);
                self.apply_query_events(events).await;
            }

            AppMessage::Log(msg) => {
                self.toast.error(msg);
            }

            AppMessage::Query(outcome) => {
                let was_trending = matches!(outcome, QueryOutcome::Trending { .. });
                let events = self.query.apply(outcome);
                self.apply_query_events(events).await;
                if was_trending && self.state.player.playlist.is_empty() {
                    // a resumed track should be able to skip within trending
                    let tracks = self.query.home_tracks().to_vec();
                    if !tracks.is_empty() {
                        self.send_cmd(PlayerCommand::SetPlaylist { tracks }).await;
                    }
                }
            }
        }
    }

    async fn apply_query_events(&mut self, events: Vec<QueryEvent>) {
        for event in events {
            match event {
                QueryEvent::Publish { track, resume_at } => {
                    self.send_cmd(PlayerCommand::Load { track, resume_at }).await;
                }
                QueryEvent::SetPlaylist(tracks) => {
                    self.send_cmd(PlayerCommand::SetPlaylist { tracks }).await;
                }
                QueryEvent::Warn(msg) => self.toast.warning(msg),
                QueryEvent::Updated => {}
            }
        }
        self.sync_query();
    }

    /// Copy the query lists and load states into `AppState`.
    fn sync_query(&mut self) {
        self.state.home_tracks = self.query.home_tracks().to_vec();
        self.state.home_note = self.query.trending_note().map(str::to_string);
        self.state.search_results = self.query.search_results().to_vec();
        self.state.search_query = self.query.last_query().to_string();
        self.state.searching = self.query.state(Concern::Search) == LoadState::Loading;
        self.state.loading = self.query.is_loading();
        self.home.sync(&self.state);
        self.search.sync(&self.state);

        let resolving = self.query.state(Concern::Change) == LoadState::Loading
            || self.query.state(Concern::Random) == LoadState::Loading;
        if resolving && !self.stream_spinner {
            self.toast.spinner("Loading track…");
            self.stream_spinner = true;
        } else if !resolving && self.stream_spinner {
            self.toast.dismiss_spinner();
            self.stream_spinner = false;
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let normal = self.state.input_mode == InputMode::Normal;

        // Global keys — always active regardless of focus/mode
        match key.code {
            KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE && normal => {
                if !self.help_overlay.visible && !self.queue_overlay.visible {
                    return vec![Action::Quit];
                }
            }
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit];
            }
            KeyCode::Char('?') if normal => {
                return vec![Action::ToggleHelp];
            }
            _ => {}
        }

        // Help overlay captures all keys when visible
        if self.help_overlay.visible {
            let actions = self.help_overlay.handle_key(key, &self.state);
            if !actions.is_empty() {
                return actions;
            }
            // Any other key closes the overlay
            return vec![Action::ToggleHelp];
        }

        if self.queue_overlay.visible {
            return self.queue_overlay.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            _ => {}
        }

        if normal {
            if let Some(actions) = self.global_key(key) {
                return actions;
            }
        }

        // Dispatch to the focused component
        let s = &self.state;
        match self.focus.current() {
            Some(ComponentId::Sidebar) => self.sidebar.handle_key(key, s),
            Some(ComponentId::Home) => self.home.handle_key(key, s),
            Some(ComponentId::Search) => self.search.handle_key(key, s),
            Some(ComponentId::LikedSongs) => self.liked.handle_key(key, s),
            _ => vec![],
        }
    }

    /// Shortcuts that work from any pane while nothing is being typed.
    fn global_key(&self, key: KeyEvent) -> Option<Vec<Action>> {
        let player = &self.state.player;

        if let Some(actions) = transport_key(key.code, player, self.seek_step) {
            return Some(actions);
        }

        let actions = match key.code {
            KeyCode::Char('+') | KeyCode::Char('=') => {
                vec![Action::Volume(player.volume + self.volume_step)]
            }
            KeyCode::Char('-') => vec![Action::Volume(player.volume - self.volume_step)],
            KeyCode::Char('s') => vec![Action::ToggleShuffle],
            KeyCode::Char('r') => vec![Action::ToggleRepeat],
            KeyCode::Char('R') => vec![Action::PlayRandom],
            KeyCode::Char('m') => vec![Action::ToggleMini],
            KeyCode::Char('Q') => vec![Action::ToggleQueue],
            KeyCode::Char('1') => vec![Action::FocusPane(ComponentId::Sidebar)],
            KeyCode::Char('2') => vec![Action::FocusPane(self.state.view.component())],
            _ => return None,
        };
        Some(actions)
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click || self.help_overlay.visible || self.queue_overlay.visible {
            return vec![];
        }

        let col = event.column;
        let row = event.row;

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let areas = self.pane_areas;
        let s = &self.state;

        if hit(areas.player_bar, col, row) {
            return self.player_bar.handle_mouse(event, areas.player_bar, s);
        }

        let (id, mut actions) = if hit(areas.sidebar, col, row) {
            (
                ComponentId::Sidebar,
                self.sidebar.handle_mouse(event, areas.sidebar, s),
            )
        } else if hit(areas.content, col, row) {
            let area = areas.content;
            let actions = match s.view {
                View::Home => self.home.handle_mouse(event, area, s),
                View::Search => self.search.handle_mouse(event, area, s),
                View::LikedSongs => self.liked.handle_mouse(event, area, s),
            };
            (s.view.component(), actions)
        } else {
            return vec![];
        };

        // Focus follows the click.
        if !self.focus.is_focused(id) {
            actions.insert(0, Action::FocusPane(id));
        }
        actions
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) {
        // Broadcast to all components first so overlays and views can react.
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.header.on_action(&action, s));
            out.extend(self.sidebar.on_action(&action, s));
            out.extend(self.home.on_action(&action, s));
            out.extend(self.search.on_action(&action, s));
            out.extend(self.liked.on_action(&action, s));
            out.extend(self.player_bar.on_action(&action, s));
            out.extend(self.queue_overlay.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action).await;

        // Secondary actions (depth-limited to 1 level)
        for a in secondary {
            self.apply_action(a).await;
        }

        self.sync_input_mode();
    }

    async fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            // ── Playback ──────────────────────────────────────────────────────
            Action::PlayTrack { track, playlist } => {
                self.send_cmd(PlayerCommand::SetPlaylist { tracks: playlist })
                    .await;
                let events = self.query.change_track(track, None);
                self.apply_query_events(events).await;
            }
            Action::PlayRandom => {
                let events = self.query.play_random();
                self.apply_query_events(events).await;
            }
            Action::TogglePlay => self.send_cmd(PlayerCommand::TogglePlay).await,
            Action::SeekRelative(seconds) => {
                self.send_cmd(PlayerCommand::SeekRelative { seconds }).await;
            }
            Action::Skip(direction) => self.send_cmd(PlayerCommand::Skip { direction }).await,
            Action::Volume(value) => {
                self.send_cmd(PlayerCommand::SetVolume {
                    value: value.clamp(0.0, 1.0),
                })
                .await;
            }
            Action::ToggleShuffle => {
                let on = !self.state.player.shuffle;
                self.send_cmd(PlayerCommand::ToggleShuffle).await;
                self.toast
                    .info(if on { "Shuffle on" } else { "Shuffle off" });
            }
            Action::ToggleRepeat => {
                let on = !self.state.player.repeat;
                self.send_cmd(PlayerCommand::ToggleRepeat).await;
                self.toast.info(if on { "Repeat on" } else { "Repeat off" });
            }

            // ── Library ───────────────────────────────────────────────────────
            Action::ToggleLike(track) => {
                if track.id.is_none() {
                    self.toast.warning("This track can't be liked");
                    return;
                }
                let toggled = self.favorites.toggle(&track);
                self.state.favorites = toggled.favorites;
                self.liked.sync(&self.state);
                if toggled.liked {
                    self.toast.success("Added to Liked Songs");
                } else {
                    self.toast.info("Removed from Liked Songs");
                }
            }
            Action::RemoveLike(id) => {
                self.state.favorites = self.favorites.remove(&id);
                self.liked.sync(&self.state);
                self.toast.info("Removed from Liked Songs");
            }

            // ── Search ────────────────────────────────────────────────────────
            Action::Search(query) => {
                let events = self.query.search(&query);
                self.apply_query_events(events).await;
            }

            // ── Navigation ────────────────────────────────────────────────────
            Action::SwitchView(view) => {
                self.state.view = view;
                self.focus
                    .set_items(vec![ComponentId::Sidebar, view.component()]);
            }
            Action::FocusNext => {
                self.focus.next();
            }
            Action::FocusPrev => {
                self.focus.prev();
            }
            Action::FocusPane(id) => self.focus.set(id),

            // ── UI toggles ────────────────────────────────────────────────────
            Action::ToggleMini => {
                self.layout.toggle();
                self.state.player_mode = self.layout.mode();
            }
            // Overlays flip their own visibility in `on_action`.
            Action::ToggleQueue | Action::ToggleHelp => {}

            // ── System ────────────────────────────────────────────────────────
            Action::Quit => self.should_quit = true,
            Action::Resize(width, _) => {
                if self.layout.on_resize(width) {
                    debug!("player mode → {:?}", self.layout.mode());
                }
                self.state.player_mode = self.layout.mode();
            }
        }
    }

    // ── Draw ──────────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;
        let area = frame.area();

        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        // ── Outer layout: header | body | player bar ─────────────────────────
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(PlayerBar::height(self.state.player_mode)),
            ])
            .split(area);

        self.header.draw(frame, outer[0], false, &self.state);

        let sidebar_width = if self.layout.is_mini() {
            SIDEBAR_WIDTH_MINI
        } else {
            SIDEBAR_WIDTH
        };
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
            .split(outer[1]);

        let sidebar_focused = self.focus.is_focused(ComponentId::Sidebar);
        self.sidebar.draw(frame, body[0], sidebar_focused, &self.state);

        let content_focused = self.focus.is_focused(self.state.view.component());
        match self.state.view {
            View::Home => self.home.draw(frame, body[1], content_focused, &self.state),
            View::Search => self.search.draw(frame, body[1], content_focused, &self.state),
            View::LikedSongs => self.liked.draw(frame, body[1], content_focused, &self.state),
        }

        self.player_bar.draw(frame, outer[2], false, &self.state);

        self.pane_areas = PaneAreas {
            sidebar: body[0],
            content: body[1],
            player_bar: outer[2],
        };

        // ── Overlays (on top of everything) ──────────────────────────────────
        self.queue_overlay.draw(frame, area, true, &self.state);
        self.help_overlay.draw(frame, area, false, &self.state);

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }

    async fn send_cmd(&self, cmd: PlayerCommand) {
        if self.core_tx.send(CoreEvent::Command(cmd)).await.is_err() {
            warn!("player core is gone; command dropped");
        }
    }

    /// Typing mode follows whichever focused view has a text box open.
    fn sync_input_mode(&mut self) {
        let typing = match self.focus.current() {
            Some(ComponentId::Home) => self.home.is_typing(),
            Some(ComponentId::Search) => self.search.is_typing(),
            Some(ComponentId::LikedSongs) => self.liked.is_typing(),
            _ => false,
        };
        self.state.input_mode = if typing {
            InputMode::Typing
        } else {
            InputMode::Normal
        };
    }
}

/// Transport shortcuts.  None of them do anything until a track is loaded.
fn transport_key(code: KeyCode, player: &PlayerState, seek_step: f64) -> Option<Vec<Action>> {
    if !player.has_track() {
        return None;
    }
    match code {
        KeyCode::Char(' ') => Some(vec![Action::TogglePlay]),
        KeyCode::Left => Some(vec![Action::SeekRelative(-seek_step)]),
        KeyCode::Right => Some(vec![Action::SeekRelative(seek_step)]),
        KeyCode::Char('n') => Some(vec![Action::Skip(SkipDirection::Next)]),
        KeyCode::Char('p') => Some(vec![Action::Skip(SkipDirection::Prev)]),
        KeyCode::Char('l') => player
            .current
            .clone()
            .map(|track| vec![Action::ToggleLike(track)]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSPORT: [KeyCode; 5] = [
        KeyCode::Char(' '),
        KeyCode::Left,
        KeyCode::Right,
        KeyCode::Char('n'),
        KeyCode::Char('p'),
    ];

    #[test]
    fn test_transport_keys_inactive_without_track() {
        let player = PlayerState::new(0.8);
        for code in TRANSPORT {
            assert!(transport_key(code, &player, 5.0).is_none(), "{:?}", code);
        }
        assert!(transport_key(KeyCode::Char('l'), &player, 5.0).is_none());
    }

    #[test]
    fn test_transport_keys_map_with_track_loaded() {
        let mut player = PlayerState::new(0.8);
        player.current = Some(Track::new("Rainy Desk", "x").with_id(1i64));

        let action = |code| {
            transport_key(code, &player, 5.0)
                .and_then(|actions| actions.into_iter().next())
        };
        assert!(matches!(action(KeyCode::Char(' ')), Some(Action::TogglePlay)));
        assert!(matches!(action(KeyCode::Left), Some(Action::SeekRelative(s)) if s == -5.0));
        assert!(matches!(action(KeyCode::Right), Some(Action::SeekRelative(s)) if s == 5.0));
        assert!(matches!(
            action(KeyCode::Char('n')),
            Some(Action::Skip(SkipDirection::Next))
        ));
        assert!(matches!(
            action(KeyCode::Char('p')),
            Some(Action::Skip(SkipDirection::Prev))
        ));
        assert!(matches!(
            action(KeyCode::Char('l')),
            Some(Action::ToggleLike(t)) if t.title == "Rainy Desk"
        ));
        assert!(action(KeyCode::Char('x')).is_none());
    }
}
