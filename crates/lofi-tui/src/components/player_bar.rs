//! PlayerBar — the persistent bottom player, in mini (one line) or full mode.

use lofi_proto::protocol::{PlaybackStatus, PlayerState};
use ratatui::crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Borders, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    layout::PlayerMode,
    theme::{C_ACCENT, C_LIKED, C_MUTED, C_PAUSED, C_PLAYING, C_PRIMARY, C_SECONDARY},
    widgets::{
        pane_chrome::pane_chrome_borders,
        progress_bar::{draw_progress, draw_volume, fmt_time, smooth_bar},
        text::truncate,
    },
};

pub const PLACEHOLDER: &str = "Select a track to start playing";

pub struct PlayerBar;

impl PlayerBar {
    pub fn new() -> Self {
        Self
    }

    /// Rows the bar needs, border included.
    pub fn height(mode: PlayerMode) -> u16 {
        match mode {
            PlayerMode::Mini => 2,
            PlayerMode::Full => 5,
        }
    }

    fn status_icon(player: &PlayerState) -> Span<'static> {
        match player.status {
            PlaybackStatus::Playing => Span::styled("▶", Style::default().fg(C_PLAYING)),
            PlaybackStatus::Paused => Span::styled("⏸", Style::default().fg(C_PAUSED)),
            PlaybackStatus::Empty => Span::styled("■", Style::default().fg(C_MUTED)),
        }
    }

    fn flag(on: bool, label: &'static str) -> Span<'static> {
        let style = if on {
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_MUTED)
        };
        Span::styled(label, style)
    }

    fn draw_mini(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let player = &state.player;
        let Some(track) = &player.current else {
            return;
        };
        let time = format!(
            " {}/{} ",
            fmt_time(player.position_secs),
            fmt_time(player.duration_secs)
        );
        let heart = if state.is_favorite(track) { " ♥" } else { "" };
        let flags_w = 8;
        let bar_w = (area.width as usize / 5).clamp(4, 24);
        let label_w = (area.width as usize)
            .saturating_sub(2 + time.len() + bar_w + flags_w + heart.len());

        let spans = vec![
            Self::status_icon(player),
            Span::raw(" "),
            Span::styled(
                truncate(&track.label(), label_w),
                Style::default().fg(C_PRIMARY),
            ),
            Span::styled(heart, Style::default().fg(C_LIKED)),
            Span::styled(time, Style::default().fg(C_SECONDARY)),
            Span::styled(
                smooth_bar(player.progress(), bar_w),
                Style::default().fg(C_PLAYING),
            ),
            Span::raw("  "),
            Self::flag(player.shuffle, "⇄"),
            Span::raw(" "),
            Self::flag(player.repeat, "↻"),
        ];
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_full(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let player = &state.player;
        let Some(track) = &player.current else {
            return;
        };
        let [info, controls, progress, volume] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let mut info_spans = vec![
            Self::status_icon(player),
            Span::raw(" "),
            Span::styled(
                truncate(&track.title, area.width as usize / 2),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  ", Style::default()),
            Span::styled(
                truncate(&track.artist, area.width as usize / 3),
                Style::default().fg(C_SECONDARY),
            ),
        ];
        if state.is_favorite(track) {
            info_spans.push(Span::styled("  ♥", Style::default().fg(C_LIKED)));
        }
        frame.render_widget(Paragraph::new(Line::from(info_spans)), info);

        let key = |k: &'static str| Span::styled(k, Style::default().fg(C_MUTED));
        let play_label = if player.is_playing() { " pause" } else { " play" };
        let control_spans = vec![
            Span::styled("⏮", Style::default().fg(C_PRIMARY)),
            key(" p   "),
            Span::styled("⏯", Style::default().fg(C_PRIMARY)),
            key(" space"),
            Span::styled(play_label, Style::default().fg(C_SECONDARY)),
            Span::raw("   "),
            Span::styled("⏭", Style::default().fg(C_PRIMARY)),
            key(" n   "),
            Self::flag(player.shuffle, "⇄ shuffle"),
            key(" s   "),
            Self::flag(player.repeat, "↻ repeat"),
            key(" r   "),
            Span::styled("♥", Style::default().fg(C_LIKED)),
            key(" l"),
        ];
        frame.render_widget(Paragraph::new(Line::from(control_spans)), controls);

        draw_progress(frame, progress, player.position_secs, player.duration_secs);
        let vol_w = volume.width.min(40);
        draw_volume(frame, Rect { width: vol_w, ..volume }, player.volume);
    }
}

impl Default for PlayerBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PlayerBar {
    fn id(&self) -> ComponentId {
        ComponentId::PlayerBar
    }

    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    /// Click plays/pauses; the wheel changes volume.
    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        if !state.player.has_track() {
            return vec![];
        }
        let volume = state.player.volume;
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => vec![Action::TogglePlay],
            MouseEventKind::ScrollUp => vec![Action::Volume(volume + 0.05)],
            MouseEventKind::ScrollDown => vec![Action::Volume(volume - 0.05)],
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        let block = pane_chrome_borders("", None, false, None, Borders::TOP);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if !state.player.has_track() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {}", PLACEHOLDER),
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }

        match state.player_mode {
            PlayerMode::Mini => self.draw_mini(frame, inner, state),
            PlayerMode::Full => self.draw_full(frame, inner, state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lofi_proto::track::Track;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(state: &AppState, width: u16) -> String {
        let height = PlayerBar::height(state.player_mode);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| PlayerBar::new().draw(f, f.area(), false, state))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_placeholder_when_empty() {
        let state = AppState::new(PlayerState::new(0.8), PlayerMode::Full, Vec::new());
        assert!(render(&state, 80).contains(PLACEHOLDER));
    }

    #[test]
    fn test_mini_and_full_show_the_same_track() {
        let mut player = PlayerState::new(0.8);
        player.current = Some(Track::new("Midnight Study", "Cozy Beats").with_id(1i64));
        player.status = PlaybackStatus::Playing;
        player.duration_secs = 200.0;
        player.position_secs = 65.0;

        let mini = AppState::new(player.clone(), PlayerMode::Mini, Vec::new());
        let out = render(&mini, 90);
        assert!(out.contains("Midnight Study"));
        assert!(out.contains("1:05/3:20"));

        let full = AppState::new(player, PlayerMode::Full, Vec::new());
        let out = render(&full, 90);
        assert!(out.contains("Midnight Study"));
        assert!(out.contains("80%"));
    }
}
