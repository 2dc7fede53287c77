//! Resume state: last current track and playback position.

use tracing::{debug, warn};

use crate::store::{LocalStore, CURRENT_TRACK_KEY, PROGRESS_KEY};
use crate::track::Track;

#[derive(Debug, Clone)]
pub struct Session {
    store: LocalStore,
}

impl Session {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn save_current_track(&self, track: &Track) {
        if let Err(e) = self.store.set_json(CURRENT_TRACK_KEY, track) {
            warn!("session: failed to save current track: {:#}", e);
        }
    }

    pub fn load_current_track(&self) -> Option<Track> {
        self.store.get_json(CURRENT_TRACK_KEY)
    }

    /// Only positive positions are written.
    pub fn save_progress(&self, secs: f64) {
        if !(secs > 0.0) {
            return;
        }
        if let Err(e) = self.store.set(PROGRESS_KEY, &secs.to_string()) {
            warn!("session: failed to save progress: {:#}", e);
        }
    }

    pub fn load_progress(&self) -> Option<f64> {
        let raw = self.store.get(PROGRESS_KEY)?;
        match raw.trim().parse::<f64>() {
            Ok(secs) if secs.is_finite() && secs >= 0.0 => Some(secs),
            _ => {
                debug!("session: discarding unreadable progress {:?}", raw);
                self.store.remove(PROGRESS_KEY);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_zero_progress_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(LocalStore::open(dir.path()));
        assert!(session.load_current_track().is_none());
        assert!(session.load_progress().is_none());

        let track = Track::new("Chill Horizon", "LoFi Vibes")
            .with_id(2i64)
            .with_url("/music/chill-horizon.mp3");
        session.save_current_track(&track);
        session.save_progress(0.0);
        assert!(session.load_progress().is_none());
        session.save_progress(42.5);

        assert_eq!(session.load_current_track(), Some(track));
        assert_eq!(session.load_progress(), Some(42.5));
    }

    #[test]
    fn test_garbage_progress_is_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path());
        store.set(PROGRESS_KEY, "NaN-ish").unwrap();
        let session = Session::new(store.clone());
        assert!(session.load_progress().is_none());
        assert!(store.get(PROGRESS_KEY).is_none());
    }
}
