//! Fallback track catalog, read from a user-supplied TOML file.
//!
//! ```toml
//! [[track]]
//! id = 1
//! title = "Midnight Study"
//! artist = "Cozy Beats"
//! url = "https://example.com/midnight.mp3"
//! cover = "https://example.com/midnight.jpg"
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

use crate::track::Track;

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    track: Vec<Track>,
}

pub fn parse_catalog(content: &str) -> anyhow::Result<Vec<Track>> {
    let file: CatalogFile = toml::from_str(content)?;
    Ok(file.track)
}

/// Tracks listed in `path`.  A missing file is an empty catalog; an
/// unreadable one is logged and treated the same way.
pub fn load_catalog(path: &Path) -> Vec<Track> {
    if !path.exists() {
        debug!("catalog: {} not present", path.display());
        return Vec::new();
    }
    let result = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))
        .and_then(|content| parse_catalog(&content));
    match result {
        Ok(tracks) => {
            debug!("catalog: {} tracks from {}", tracks.len(), path.display());
            tracks
        }
        Err(e) => {
            warn!("catalog: ignoring {}: {:#}", path.display(), e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackId;

    #[test]
    fn test_parse_tables() {
        let tracks = parse_catalog(
            r#"
            [[track]]
            id = 1
            title = "Midnight Study"
            artist = "Cozy Beats"
            url = "/music/midnight-study.mp3"

            [[track]]
            id = "yt-abc"
            artist = "Kyoto Loops"
            thumbnail = "https://i/abc.jpg"
            "#,
        )
        .unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, Some(TrackId::Num(1)));
        assert_eq!(tracks[0].stream_url(), Some("/music/midnight-study.mp3"));
        assert_eq!(tracks[1].title, crate::track::UNKNOWN_TITLE);
        assert_eq!(tracks[1].artwork(), "https://i/abc.jpg");
    }

    #[test]
    fn test_missing_and_broken_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_catalog(&dir.path().join("none.toml")).is_empty());

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[[track]\ntitle = ").unwrap();
        assert!(load_catalog(&broken).is_empty());
    }
}
