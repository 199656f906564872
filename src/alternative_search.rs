use crate::search_provider::{RequestContext, SearchProvider, SearchReply};
use crate::track_metadata::Track;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Suffix terms used to surface different uploads of the same song.
const ALTERNATIVE_SUFFIXES: [&str; 5] = ["official", "audio", "music", "topic", "lyrics"];

/// Collects alternative versions of one song so a user can pick a specific
/// upload. Each suffixed variant contributes at most its top hit, and
/// duplicates (by identifier) are dropped.
pub struct AlternativeSearch {
    provider: Arc<dyn SearchProvider>,
    search_prefix: String,
}

impl AlternativeSearch {
    pub fn new(provider: Arc<dyn SearchProvider>, search_prefix: impl Into<String>) -> Self {
        Self {
            provider,
            search_prefix: search_prefix.into(),
        }
    }

    /// Run the suffixed variants in order and gather distinct top hits.
    /// A failing variant is skipped, never fatal.
    pub async fn collect(&self, query: &str, ctx: &RequestContext) -> Vec<Track> {
        let mut results: Vec<Track> = Vec::new();

        for suffix in ALTERNATIVE_SUFFIXES {
            let variant = format!("{}{} {}", self.search_prefix, query, suffix);
            debug!("Alternative variant: \"{}\"", variant);

            let reply = match self.provider.search(&variant, ctx).await {
                Ok(reply) => reply,
                Err(err) => {
                    warn!("Alternative search \"{}\" failed: {}", variant, err);
                    continue;
                }
            };

            let SearchReply::Loaded { tracks, .. } = reply else {
                continue;
            };

            let Some(track) = tracks.into_iter().next() else {
                continue;
            };

            if results.iter().any(|seen| seen.identifier == track.identifier) {
                continue;
            }
            results.push(track);
        }

        info!("Collected {} alternative versions for \"{}\"", results.len(), query);
        results
    }
}

/// Session store for collected alternatives, keyed by guild and channel so
/// concurrent channels never see each other's lists. Taking a list removes
/// it; one selection per search.
#[derive(Default)]
pub struct AlternativesStore {
    entries: DashMap<(u64, u64), Vec<Track>>,
}

impl AlternativesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, ctx: &RequestContext, tracks: Vec<Track>) {
        self.entries.insert(store_key(ctx), tracks);
    }

    pub fn take(&self, ctx: &RequestContext) -> Option<Vec<Track>> {
        self.entries.remove(&store_key(ctx)).map(|(_, tracks)| tracks)
    }

    pub fn contains(&self, ctx: &RequestContext) -> bool {
        self.entries.contains_key(&store_key(ctx))
    }
}

fn store_key(ctx: &RequestContext) -> (u64, u64) {
    (ctx.guild_id.unwrap_or(0), ctx.channel_id.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track_metadata::RawTrack;
    use pretty_assertions::assert_eq;

    fn track(id: &str) -> Track {
        Track::from(RawTrack {
            identifier: Some(id.to_string()),
            title: Some(format!("Track {}", id)),
            ..Default::default()
        })
    }

    #[test]
    fn store_take_removes_the_entry() {
        let store = AlternativesStore::new();
        let ctx = RequestContext::for_guild(1, 2);

        store.store(&ctx, vec![track("a"), track("b")]);
        assert!(store.contains(&ctx));

        let taken = store.take(&ctx).expect("stored list");
        assert_eq!(taken.len(), 2);
        assert!(!store.contains(&ctx));
        assert!(store.take(&ctx).is_none());
    }

    #[test]
    fn channels_are_isolated() {
        let store = AlternativesStore::new();
        let general = RequestContext::for_guild(1, 2);
        let other = RequestContext::for_guild(1, 3);

        store.store(&general, vec![track("a")]);
        assert!(store.take(&other).is_none());
        assert!(store.contains(&general));
    }
}
