//! Liked tracks, persisted as a JSON array under [`FAVORITES_KEY`].
//!
//! Membership is by track id.  Tracks without an id can be shown but never
//! liked.

use tracing::{info, warn};

use crate::store::{LocalStore, FAVORITES_KEY};
use crate::track::{Track, TrackId};

/// Result of [`Favorites::toggle`].
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteToggle {
    pub favorites: Vec<Track>,
    /// Whether the track is liked after the toggle.
    pub liked: bool,
}

#[derive(Debug, Clone)]
pub struct Favorites {
    store: LocalStore,
}

impl Favorites {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Current list.  Never fails; a corrupt entry is cleared and read as empty.
    pub fn load(&self) -> Vec<Track> {
        self.store
            .get_json::<Vec<Track>>(FAVORITES_KEY)
            .unwrap_or_default()
    }

    pub fn save(&self, list: &[Track]) {
        if let Err(e) = self.store.set_json(FAVORITES_KEY, list) {
            warn!("favorites: save failed: {:#}", e);
        }
    }

    pub fn is_favorite(&self, track: &Track) -> bool {
        match &track.id {
            Some(id) => contains(&self.load(), id),
            None => false,
        }
    }

    /// Like when absent, unlike when present.
    pub fn toggle(&self, track: &Track) -> FavoriteToggle {
        let mut favorites = self.load();
        let Some(id) = track.id.as_ref() else {
            return FavoriteToggle {
                favorites,
                liked: false,
            };
        };

        let liked = if contains(&favorites, id) {
            favorites.retain(|t| t.id.as_ref() != Some(id));
            info!("favorites: unliked {}", track.label());
            false
        } else {
            favorites.push(track.clone());
            info!("favorites: liked {}", track.label());
            true
        };
        self.save(&favorites);
        FavoriteToggle { favorites, liked }
    }

    pub fn remove(&self, id: &TrackId) -> Vec<Track> {
        let mut favorites = self.load();
        let before = favorites.len();
        favorites.retain(|t| t.id.as_ref() != Some(id));
        if favorites.len() != before {
            self.save(&favorites);
        }
        favorites
    }
}

fn contains(list: &[Track], id: &TrackId) -> bool {
    list.iter().any(|t| t.id.as_ref() == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn favorites() -> (tempfile::TempDir, Favorites) {
        let dir = tempfile::tempdir().unwrap();
        let favs = Favorites::new(LocalStore::open(dir.path()));
        (dir, favs)
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let (_dir, favs) = favorites();
        let track = Track::new("Dreamscape", "Soft Static").with_id(5i64);

        let first = favs.toggle(&track);
        assert!(first.liked);
        assert_eq!(first.favorites, vec![track.clone()]);
        assert!(favs.is_favorite(&track));

        let second = favs.toggle(&track);
        assert!(!second.liked);
        assert!(second.favorites.is_empty());
        assert!(favs.load().is_empty());
    }

    #[test]
    fn test_double_toggle_restores_membership() {
        let (_dir, favs) = favorites();
        let existing = vec![
            Track::new("a", "x").with_id(1i64),
            Track::new("b", "y").with_id("yt-2"),
        ];
        favs.save(&existing);

        for track in [
            Track::new("c", "z").with_id(3i64),
            Track::new("a", "x").with_id(1i64),
        ] {
            favs.toggle(&track);
            favs.toggle(&track);
            let ids: Vec<_> = favs.load().into_iter().filter_map(|t| t.id).collect();
            let mut expected: Vec<_> = existing.iter().filter_map(|t| t.id.clone()).collect();
            let mut got = ids;
            expected.sort_by_key(|id| id.to_string());
            got.sort_by_key(|id| id.to_string());
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_toggle_without_id_is_noop() {
        let (_dir, favs) = favorites();
        let outcome = favs.toggle(&Track::new("Loose", "Track"));
        assert!(!outcome.liked);
        assert!(outcome.favorites.is_empty());
        assert!(!favs.is_favorite(&Track::new("Loose", "Track")));
    }

    #[test]
    fn test_invalid_json_loads_empty_and_clears_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path());
        store.set(FAVORITES_KEY, "[{\"id\": 1, ").unwrap();
        let favs = Favorites::new(store.clone());
        assert!(favs.load().is_empty());
        assert!(store.get(FAVORITES_KEY).is_none());
    }

    #[test]
    fn test_remove_by_id() {
        let (_dir, favs) = favorites();
        favs.save(&[
            Track::new("a", "x").with_id(1i64),
            Track::new("b", "y").with_id(2i64),
        ]);
        let left = favs.remove(&TrackId::Num(1));
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].title, "b");
        assert_eq!(favs.load(), left);
    }
}
