//! Commands accepted by the player engine and the state it publishes.

use serde::{Deserialize, Serialize};

use crate::track::{position_of, Track};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipDirection {
    Next,
    Prev,
}

/// Messages sent from the UI to the player engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum PlayerCommand {
    /// Make `track` current and start playing it.  `resume_at` is applied
    /// once, when the first usable duration is reported.
    Load {
        track: Track,
        #[serde(default)]
        resume_at: Option<f64>,
    },
    TogglePlay,
    Seek { seconds: f64 },
    SeekRelative { seconds: f64 },
    SetVolume { value: f32 },
    Skip { direction: SkipDirection },
    SetPlaylist { tracks: Vec<Track> },
    ToggleRepeat,
    ToggleShuffle,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    /// No track selected.
    #[default]
    Empty,
    Paused,
    Playing,
}

/// Snapshot of the engine.  `rev` increases on every change.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PlayerState {
    #[serde(default)]
    pub rev: u64,
    pub current: Option<Track>,
    #[serde(default)]
    pub playlist: Vec<Track>,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub volume: f32,
    #[serde(default)]
    pub repeat: bool,
    #[serde(default)]
    pub shuffle: bool,
    pub status: PlaybackStatus,
}

impl PlayerState {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    pub fn has_track(&self) -> bool {
        self.current.is_some()
    }

    /// Index of the current track within the playlist, by identity.
    pub fn current_index(&self) -> Option<usize> {
        position_of(&self.playlist, self.current.as_ref()?)
    }

    /// Playback progress in `[0, 1]`; 0 while the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration_secs > 0.0 {
            (self.position_secs / self.duration_secs).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_shape() {
        let cmd = PlayerCommand::Skip {
            direction: SkipDirection::Prev,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"cmd":"Skip","direction":"Prev"}"#);

        let load: PlayerCommand =
            serde_json::from_str(r#"{"cmd":"Load","track":{"id":3,"title":"x","artist":"y"}}"#)
                .unwrap();
        match load {
            PlayerCommand::Load { track, resume_at } => {
                assert_eq!(track.title, "x");
                assert!(resume_at.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_current_index_and_progress() {
        let a = Track::new("a", "x").with_id(1i64);
        let b = Track::new("b", "x").with_id(2i64);
        let mut state = PlayerState::new(1.5);
        assert_eq!(state.volume, 1.0);
        assert_eq!(state.current_index(), None);
        assert_eq!(state.progress(), 0.0);

        state.playlist = vec![a, b.clone()];
        state.current = Some(b);
        state.position_secs = 30.0;
        state.duration_secs = 120.0;
        assert_eq!(state.current_index(), Some(1));
        assert_eq!(state.progress(), 0.25);
    }
}
