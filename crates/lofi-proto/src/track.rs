//! Track data model shared by the gateway, the stores and the player.
//!
//! The backend has drifted over time and a track may carry its artwork under
//! `cover`, `image`, `album_cover` or (for search hits) `thumbnail`.  All of
//! them are kept as-is on the wire; [`Track::artwork`] is the single place
//! that resolves them.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNKNOWN_TITLE: &str = "Unknown Track";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Backend identifier of a track.  Jamendo-style sources use integers,
/// video-backed search results use opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackId {
    Num(i64),
    Text(String),
}

impl TrackId {
    /// Whether this id can be handed to `GET /stream/{id}`.
    pub fn is_resolvable(&self) -> bool {
        match self {
            TrackId::Num(_) => true,
            TrackId::Text(s) => !s.trim().is_empty(),
        }
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackId::Num(n) => write!(f, "{}", n),
            TrackId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TrackId {
    fn from(n: i64) -> Self {
        TrackId::Num(n)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        TrackId::Text(s.to_string())
    }
}

/// A playable item.  `title` and `artist` are always populated; `url` may be
/// missing until the stream has been resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTrack")]
pub struct Track {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<TrackId>,
    pub title: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Lenient wire shape.  Missing or blank title/artist fall back to the
/// "Unknown" placeholders, `thumbnail` is read as `image`.
#[derive(Deserialize)]
struct RawTrack {
    #[serde(default)]
    id: Option<TrackId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    cover: Option<String>,
    #[serde(default, alias = "thumbnail")]
    image: Option<String>,
    #[serde(default)]
    album_cover: Option<String>,
    #[serde(default)]
    duration: Option<String>,
}

impl From<RawTrack> for Track {
    fn from(raw: RawTrack) -> Self {
        Self {
            id: raw.id,
            title: non_blank(raw.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            artist: non_blank(raw.artist).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            url: raw.url,
            cover: raw.cover,
            image: raw.image,
            album_cover: raw.album_cover,
            duration: raw.duration,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Response of `GET /stream/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl Track {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            artist: artist.into(),
            url: None,
            cover: None,
            image: None,
            album_cover: None,
            duration: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<TrackId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Artwork URL: first non-empty of `cover`, `image`, `album_cover`, else "".
    pub fn artwork(&self) -> &str {
        [&self.cover, &self.image, &self.album_cover]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }

    /// Playable URL, if one has been resolved.
    pub fn stream_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    /// The id to resolve a stream with, when there is one worth asking about.
    pub fn resolvable_id(&self) -> Option<&TrackId> {
        self.id.as_ref().filter(|id| id.is_resolvable())
    }

    /// Canonical identity: ids when both sides have one, `(title, artist)`
    /// when neither does.  A track with an id never matches one without.
    pub fn same_as(&self, other: &Track) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.title == other.title && self.artist == other.artist,
            _ => false,
        }
    }

    /// Merge a resolved stream over this track.  Descriptor fields win when
    /// non-empty; the track's own values are the fallback.
    pub fn with_stream(&self, stream: StreamDescriptor) -> Track {
        let mut merged = self.clone();
        if !stream.url.is_empty() {
            merged.url = Some(stream.url);
        }
        if let Some(title) = non_blank(stream.title) {
            merged.title = title;
        }
        if let Some(artist) = non_blank(stream.artist) {
            merged.artist = artist;
        }
        if let Some(thumb) = non_blank(stream.thumbnail) {
            merged.image = Some(thumb);
        }
        merged
    }

    /// "Title — Artist" for logs and toasts.
    pub fn label(&self) -> String {
        format!("{} — {}", self.title, self.artist)
    }
}

/// Position of `track` in `list` under [`Track::same_as`].
pub fn position_of(list: &[Track], track: &Track) -> Option<usize> {
    list.iter().position(|t| t.same_as(track))
}
