use crate::track_metadata::Track;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a search capability call that never produced a payload.
/// The resolver recovers from all of these locally by moving to the next
/// candidate query.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Search backend unreachable: {0}")]
    Unreachable(String),

    #[error("Search request failed: {0}")]
    RequestFailed(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// How a successful search payload is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// A direct match or search listing; candidates for one track.
    Single,
    /// A multi-track playlist or album load.
    Playlist,
}

/// Payload returned by a search capability call that reached the backend.
#[derive(Debug, Clone)]
pub enum SearchReply {
    /// Zero or more tracks with their load tag.
    Loaded { kind: LoadKind, tracks: Vec<Track> },
    /// The backend answered but tagged the payload itself as an error.
    Failed { message: String },
}

impl SearchReply {
    pub fn tracks(tracks: Vec<Track>) -> Self {
        Self::Loaded {
            kind: LoadKind::Single,
            tracks,
        }
    }

    pub fn playlist(tracks: Vec<Track>) -> Self {
        Self::Loaded {
            kind: LoadKind::Playlist,
            tracks,
        }
    }

    pub fn empty() -> Self {
        Self::tracks(Vec::new())
    }
}

/// Requester context forwarded to the capability unmodified. Also keys the
/// per-guild alternatives store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub guild_id: Option<u64>,
    pub channel_id: Option<u64>,
    pub requester: Option<String>,
}

impl RequestContext {
    pub fn for_guild(guild_id: u64, channel_id: u64) -> Self {
        Self {
            guild_id: Some(guild_id),
            channel_id: Some(channel_id),
            requester: None,
        }
    }
}

/// Search capability supplied by the playback backend collaborator.
///
/// Implementations are expected to be cheap to call repeatedly; the
/// resolver issues one call per candidate query, strictly in order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, ctx: &RequestContext) -> ProviderResult<SearchReply>;
}
