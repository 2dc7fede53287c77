//! Mini/full player mode.  Pure presentation: nothing here reaches the player.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMode {
    Mini,
    Full,
}

impl PlayerMode {
    fn for_width(width: u16, breakpoint: u16) -> Self {
        if width < breakpoint {
            PlayerMode::Mini
        } else {
            PlayerMode::Full
        }
    }

    fn flipped(self) -> Self {
        match self {
            PlayerMode::Mini => PlayerMode::Full,
            PlayerMode::Full => PlayerMode::Mini,
        }
    }
}

/// Follows the terminal width across the breakpoint; an explicit toggle
/// holds until the width next crosses it.
#[derive(Debug, Clone)]
pub struct LayoutState {
    breakpoint: u16,
    width: u16,
    mode: PlayerMode,
}

impl LayoutState {
    pub fn new(breakpoint: u16, width: u16) -> Self {
        Self {
            breakpoint,
            width,
            mode: PlayerMode::for_width(width, breakpoint),
        }
    }

    pub fn mode(&self) -> PlayerMode {
        self.mode
    }

    pub fn is_mini(&self) -> bool {
        self.mode == PlayerMode::Mini
    }

    pub fn toggle(&mut self) {
        self.mode = self.mode.flipped();
    }

    /// Returns true when the mode changed.
    pub fn on_resize(&mut self, width: u16) -> bool {
        let before = PlayerMode::for_width(self.width, self.breakpoint);
        let after = PlayerMode::for_width(width, self.breakpoint);
        self.width = width;
        if before != after && self.mode != after {
            self.mode = after;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_mode_follows_width() {
        assert_eq!(LayoutState::new(100, 80).mode(), PlayerMode::Mini);
        assert_eq!(LayoutState::new(100, 100).mode(), PlayerMode::Full);
    }

    #[test]
    fn test_crossing_breakpoint_switches_mode() {
        let mut layout = LayoutState::new(100, 140);
        assert!(layout.on_resize(90));
        assert!(layout.is_mini());
        assert!(layout.on_resize(120));
        assert_eq!(layout.mode(), PlayerMode::Full);
    }

    #[test]
    fn test_toggle_holds_until_next_crossing() {
        let mut layout = LayoutState::new(100, 140);
        layout.toggle();
        assert!(layout.is_mini());
        // resizing on the same side keeps the explicit choice
        assert!(!layout.on_resize(130));
        assert!(layout.is_mini());
        // crossing into the narrow side agrees with it already
        assert!(!layout.on_resize(80));
        assert!(layout.is_mini());
        layout.toggle();
        assert_eq!(layout.mode(), PlayerMode::Full);
        assert!(!layout.on_resize(150));
        assert!(layout.on_resize(60));
        assert!(layout.is_mini());
    }
}
