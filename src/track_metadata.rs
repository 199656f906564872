use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Title substituted when a catalog reports no usable title.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Author substituted when a catalog reports no usable author.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Track shape as it arrives from a search backend, before normalization.
/// Every field the backend may omit is optional here and nowhere else.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTrack {
    pub identifier: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub duration_ms: Option<u64>,
    pub uri: Option<String>,
    pub album: Option<String>,
    pub external_id: Option<String>,
}

/// Provenance attached to a track that was resolved on a different catalog
/// than the one named in the original query. Display metadata only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAnnotation {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub external_id: Option<String>,
    pub source_id: Option<String>,
    pub uri: Option<String>,
}

/// Canonical playable track. Built from a [`RawTrack`] exactly once, at the
/// boundary; the rest of the crate reads these fields without fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub identifier: String,
    pub title: String,
    pub author: String,
    #[serde(with = "humantime_serde")]
    pub duration: Option<Duration>,
    pub uri: Option<String>,
    pub album: Option<String>,
    pub external_id: Option<String>,
    pub source: Option<SourceAnnotation>,
}

impl From<RawTrack> for Track {
    fn from(raw: RawTrack) -> Self {
        Self {
            identifier: non_empty(raw.identifier).unwrap_or_else(|| "unknown".to_string()),
            title: non_empty(raw.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            author: non_empty(raw.author).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            duration: raw
                .duration_ms
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
            uri: raw.uri,
            album: raw.album,
            external_id: raw.external_id,
            source: None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl Track {
    /// Title and author joined into a rebuilt search query. The boundary
    /// placeholders are left out so a track without usable metadata yields
    /// an empty string and the caller can refuse to retry it.
    pub fn search_terms(&self) -> String {
        let mut terms = String::new();
        if self.title != UNKNOWN_TITLE {
            terms.push_str(&self.title);
        }
        if self.author != UNKNOWN_ARTIST {
            if !terms.is_empty() {
                terms.push(' ');
            }
            terms.push_str(&self.author);
        }
        terms
    }
}

/// Identity string used for retry bookkeeping: identifier and title joined
/// with an underscore. Two tracks reporting the same identifier and title
/// are one logical track, even across separate search results.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackKey(String);

impl TrackKey {
    pub fn of(track: &Track) -> Self {
        let id = fallback_unknown(&track.identifier);
        let title = fallback_unknown(&track.title);
        Self(format!("{}_{}", id, title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn fallback_unknown(value: &str) -> &str {
    if value.trim().is_empty() { "unknown" } else { value }
}

/// Format a duration into a human-readable string (e.g., "3:45" or "1:23:45")
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
