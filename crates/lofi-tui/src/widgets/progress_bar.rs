//! Smooth Unicode progress and volume bars.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_ACCENT, C_MUTED, C_PLAYING, C_SECONDARY};

const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// `width` cells filled to `fraction` (0.0..=1.0) at eighth-cell resolution.
pub fn smooth_bar(fraction: f64, width: usize) -> String {
    let eighths = (fraction.clamp(0.0, 1.0) * width as f64 * 8.0) as usize;
    let full_blocks = eighths / 8;
    let partial = eighths % 8;

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..full_blocks.min(width) {
        bar.push('█');
    }
    if full_blocks < width {
        bar.push(BLOCKS[partial]);
        for _ in (full_blocks + 1)..width {
            bar.push(' ');
        }
    }
    bar
}

/// Render `elapsed ▕bar▏ total` in `area`.
pub fn draw_progress(frame: &mut Frame, area: Rect, position_secs: f64, duration_secs: f64) {
    if area.width < 4 || area.height == 0 {
        return;
    }

    let left_label = fmt_time(position_secs);
    let right_label = fmt_time(duration_secs);
    let label_w = (left_label.len() + right_label.len() + 2) as u16;
    let bar_w = area.width.saturating_sub(label_w).max(4) as usize;
    let progress = if duration_secs > 0.0 {
        position_secs / duration_secs
    } else {
        0.0
    };

    let spans = vec![
        Span::styled(format!("{} ", left_label), Style::default().fg(C_SECONDARY)),
        Span::styled(smooth_bar(progress, bar_w), Style::default().fg(C_PLAYING)),
        Span::styled(format!(" {}", right_label), Style::default().fg(C_MUTED)),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render `vol ▕bar▏ 80%` in `area`.
pub fn draw_volume(frame: &mut Frame, area: Rect, volume: f32) {
    if area.width < 8 || area.height == 0 {
        return;
    }
    let pct = format!(" {:>3}%", (volume.clamp(0.0, 1.0) * 100.0).round() as u32);
    let bar_w = area.width.saturating_sub(4 + pct.len() as u16) as usize;
    let spans = vec![
        Span::styled("vol ", Style::default().fg(C_MUTED)),
        Span::styled(smooth_bar(volume as f64, bar_w), Style::default().fg(C_ACCENT)),
        Span::styled(pct, Style::default().fg(C_SECONDARY)),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn fmt_time(secs: f64) -> String {
    if !(secs > 0.0) {
        return "0:00".to_string();
    }
    let s = secs as u64;
    let h = s / 3600;
    let m = (s % 3600) / 60;
    let s = s % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_time() {
        assert_eq!(fmt_time(0.0), "0:00");
        assert_eq!(fmt_time(-3.0), "0:00");
        assert_eq!(fmt_time(f64::NAN), "0:00");
        assert_eq!(fmt_time(65.9), "1:05");
        assert_eq!(fmt_time(3723.0), "1:02:03");
    }

    #[test]
    fn test_smooth_bar_width_is_stable() {
        for fraction in [0.0, 0.33, 0.5, 1.0, 2.0] {
            assert_eq!(smooth_bar(fraction, 10).chars().count(), 10);
        }
        assert_eq!(smooth_bar(1.0, 4), "████");
        assert_eq!(smooth_bar(0.5, 4), "██  ");
    }
}
